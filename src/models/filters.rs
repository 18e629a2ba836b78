use serde::{Deserialize, Serialize};

/// Upper end of the price slider (EUR per month)
pub const PRICE_SLIDER_MAX: u32 = 2000;

/// Search constraints sent to the rentals API
///
/// An absent field leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalFilters {
    /// Location substring
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub tenant_preference: Option<String>,
    /// Minimum monthly price
    pub min_price: Option<u32>,
    /// Maximum monthly price
    pub max_price: Option<u32>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
}

impl RentalFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    pub fn tenant_preference(mut self, preference: impl Into<String>) -> Self {
        self.tenant_preference = Some(preference.into());
        self
    }

    pub fn price_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn min_bedrooms(mut self, rooms: u32) -> Self {
        self.min_bedrooms = Some(rooms);
        self
    }

    pub fn min_bathrooms(mut self, rooms: u32) -> Self {
        self.min_bathrooms = Some(rooms);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    CameraSingola,
    CameraDoppia,
    Appartamento,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::CameraSingola => "camera_singola",
            PropertyType::CameraDoppia => "camera_doppia",
            PropertyType::Appartamento => "appartamento",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::CameraSingola => "Single Room",
            PropertyType::CameraDoppia => "Double Room",
            PropertyType::Appartamento => "Apartment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantPreference {
    Ragazza,
    Ragazzo,
    Indifferente,
}

impl TenantPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPreference::Ragazza => "ragazza",
            TenantPreference::Ragazzo => "ragazzo",
            TenantPreference::Indifferente => "indifferente",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenantPreference::Ragazza => "Female",
            TenantPreference::Ragazzo => "Male",
            TenantPreference::Indifferente => "No preference",
        }
    }
}

/// Editable search form state
///
/// `None` choices mean "any". The price range is a slider over
/// `0..=PRICE_SLIDER_MAX`; a bound only becomes a filter once it has moved
/// off its end of the slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub location: String,
    pub property_type: Option<PropertyType>,
    pub tenant_preference: Option<TenantPreference>,
    pub price_range: (u32, u32),
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            location: String::new(),
            property_type: None,
            tenant_preference: None,
            price_range: (0, PRICE_SLIDER_MAX),
            min_bedrooms: None,
            min_bathrooms: None,
        }
    }
}

impl SearchForm {
    /// Build a fresh filter set from the current form values
    pub fn to_filters(&self) -> RentalFilters {
        let location = self.location.trim();
        let (low, high) = self.price_range;

        RentalFilters {
            location: (!location.is_empty()).then(|| location.to_string()),
            property_type: self.property_type.map(|t| t.as_str().to_string()),
            tenant_preference: self.tenant_preference.map(|p| p.as_str().to_string()),
            min_price: (low > 0).then_some(low),
            max_price: (high < PRICE_SLIDER_MAX).then_some(high),
            min_bedrooms: self.min_bedrooms,
            min_bathrooms: self.min_bathrooms,
        }
    }

    /// Restore every field to "any" and return the (empty) filters to search with
    pub fn reset(&mut self) -> RentalFilters {
        *self = Self::default();
        self.to_filters()
    }
}

use crate::models::RentalFilters;

/// Ordered query parameters for a rentals request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    /// Start from the defined, non-empty fields of `filters`
    pub fn from_filters(filters: &RentalFilters) -> Self {
        let mut query = Self::default();
        query.push_text("location", filters.location.as_deref());
        query.push_text("property_type", filters.property_type.as_deref());
        query.push_text("tenant_preference", filters.tenant_preference.as_deref());
        query.push("min_price", filters.min_price);
        query.push("max_price", filters.max_price);
        query.push("min_bedrooms", filters.min_bedrooms);
        query.push("min_bathrooms", filters.min_bathrooms);
        query
    }

    pub fn push<T: ToString>(&mut self, key: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Like `push`, but blank strings count as absent
    pub fn push_text(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|(key, _)| *key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

pub mod filters;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use filters::{PropertyType, RentalFilters, SearchForm, TenantPreference};

/// Rental listing as returned by the rentals API
///
/// The record is owned by the API; missing fields decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rental {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub telegram_message_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_date: String,
    pub telephone: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub raw_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub property_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tenant_preference: String,
    pub availability_start: Option<String>,
    pub availability_end: Option<String>,
    pub num_bedrooms: Option<u32>,
    pub num_bathrooms: Option<u32>,
    pub flatmates_count: Option<u32>,
    pub has_extra_expenses: Option<bool>,
    pub extra_expenses_details: Option<String>,
    pub duration_to_leonardo_transit: Option<f64>,
    pub duration_to_bovisa_transit: Option<f64>,
    pub duration_to_leonardo_walking: Option<f64>,
    pub duration_to_bovisa_walking: Option<f64>,
}

impl Rental {
    /// When the listing was posted, if the API sent a parseable timestamp
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.message_date)
    }

    pub fn property_type_label(&self) -> String {
        humanize(&self.property_type)
    }

    pub fn tenant_preference_label(&self) -> String {
        humanize(&self.tenant_preference)
    }

    pub fn has_commute_info(&self) -> bool {
        [
            self.duration_to_leonardo_transit,
            self.duration_to_bovisa_transit,
            self.duration_to_leonardo_walking,
            self.duration_to_bovisa_walking,
        ]
        .iter()
        .any(|d| d.is_some_and(|m| m > 0.0))
    }

    /// One-line commute overview, e.g. "transit: Leonardo 12 min, Bovisa - | walking: ..."
    pub fn commute_summary(&self) -> String {
        format!(
            "transit: Leonardo {}, Bovisa {} | walking: Leonardo {}, Bovisa {}",
            format_minutes(self.duration_to_leonardo_transit),
            format_minutes(self.duration_to_bovisa_transit),
            format_minutes(self.duration_to_leonardo_walking),
            format_minutes(self.duration_to_bovisa_walking),
        )
    }
}

/// Response of the health check endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

/// Wire shape of the cursor-paginated rentals endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Rental>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
}

/// A JSON `null` decodes like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Turn a snake_case API value into a title-cased label
pub fn humanize(value: &str) -> String {
    value
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_minutes(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) => format!("{} min", m.round() as i64),
        None => "-".to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // The API sometimes omits the offset; those timestamps are UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn decodes_partial_rental_with_defaults() {
        let rental: Rental = serde_json::from_value(json!({
            "id": "r-1",
            "price": 650,
            "location": "Città Studi",
            "property_type": "camera_singola",
            "num_bedrooms": 1
        }))
        .unwrap();

        assert_eq!(rental.id, "r-1");
        assert_eq!(rental.price, 650.0);
        assert_eq!(rental.num_bedrooms, Some(1));
        assert_eq!(rental.telephone, None);
        assert!(rental.summary.is_empty());
    }

    #[test]
    fn null_scalars_decode_as_defaults() {
        let rentals: Vec<Rental> = serde_json::from_str(
            r#"[
                {"id": "a", "price": 650, "summary": "Room near Leonardo"},
                {"id": "b", "price": 700, "summary": null, "tenant_preference": null,
                 "sender_id": null, "message_date": null, "telephone": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(rentals.len(), 2);
        let second = &rentals[1];
        assert_eq!(second.id, "b");
        assert_eq!(second.price, 700.0);
        assert!(second.summary.is_empty());
        assert_eq!(second.tenant_preference_label(), "");
        assert_eq!(second.sender_id, 0);
        assert!(second.posted_at().is_none());
        assert_eq!(second.telephone, None);
    }

    #[test]
    fn null_page_fields_decode_as_empty() {
        let page: CursorPage =
            serde_json::from_value(json!({"items": null, "next_cursor": null, "has_more": null}))
                .unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn decodes_cursor_page_without_cursor() {
        let page: CursorPage = serde_json::from_value(json!({
            "items": [{"id": "a"}, {"id": "b"}],
            "has_more": false
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor, None);
        assert!(!page.has_more);
    }

    #[test]
    fn humanizes_snake_case_labels() {
        assert_eq!(humanize("camera_singola"), "Camera Singola");
        assert_eq!(humanize("appartamento"), "Appartamento");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(Some(12.4)), "12 min");
        assert_eq!(format_minutes(Some(12.5)), "13 min");
        assert_eq!(format_minutes(None), "-");
    }

    #[test]
    fn parses_posting_dates_with_and_without_offset() {
        let mut rental = Rental {
            message_date: "2024-09-01T10:30:00+02:00".to_string(),
            ..Default::default()
        };
        let posted = rental.posted_at().unwrap();
        assert_eq!(posted.hour(), 8);

        rental.message_date = "2024-09-01T10:30:00.123".to_string();
        let posted = rental.posted_at().unwrap();
        assert_eq!((posted.day(), posted.hour()), (1, 10));

        rental.message_date = "yesterday".to_string();
        assert!(rental.posted_at().is_none());
    }

    #[test]
    fn commute_info_requires_a_positive_duration() {
        let mut rental = Rental::default();
        assert!(!rental.has_commute_info());

        rental.duration_to_bovisa_walking = Some(18.0);
        assert!(rental.has_commute_info());
        assert_eq!(
            rental.commute_summary(),
            "transit: Leonardo -, Bovisa - | walking: Leonardo -, Bovisa 18 min"
        );
    }
}

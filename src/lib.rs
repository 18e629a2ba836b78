pub mod api;
pub mod config;
pub mod feed;
pub mod health;
pub mod models;

pub use api::{ApiError, RentalsClient};
pub use config::Config;
pub use feed::{CursorPaging, Feed, OffsetPaging};
pub use health::{HealthMonitor, HealthState};
pub use models::{Rental, RentalFilters, SearchForm};

pub mod client;
pub mod error;
pub mod query;
pub mod traits;

pub use client::RentalsClient;
pub use error::ApiError;
pub use query::Query;
pub use traits::{HealthProbe, RentalsApi};

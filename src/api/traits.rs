use crate::api::ApiError;
use crate::models::{CursorPage, HealthReport, Rental, RentalFilters};
use async_trait::async_trait;

/// Read access to the rentals API
/// The paging strategies only talk to this, so they can run against a fake
#[async_trait]
pub trait RentalsApi: Send + Sync {
    /// Offset-paginated listing: a plain array of rentals
    async fn fetch_list(
        &self,
        filters: &RentalFilters,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Rental>, ApiError>;

    /// Cursor-paginated listing
    async fn fetch_page(
        &self,
        filters: &RentalFilters,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<CursorPage, ApiError>;
}

/// Anything that can report whether the API is up
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<HealthReport, ApiError>;
}

use crate::api::{ApiError, RentalsApi};
use crate::models::{Rental, RentalFilters};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// One page of results plus the token for the page after it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<Rental>,
    pub next: Option<T>,
    pub has_more: bool,
}

#[async_trait]
pub trait PagingStrategy: Send + Sync {
    type Token: Clone + fmt::Debug + Send + Sync;

    /// Fetch the page at `token`, or the first page when `token` is `None`
    async fn fetch(
        &self,
        filters: &RentalFilters,
        token: Option<&Self::Token>,
        limit: u32,
    ) -> Result<Page<Self::Token>, ApiError>;

    fn name(&self) -> &'static str;
}

/// Offset paging: the token is the offset of the next page
pub struct OffsetPaging<A> {
    api: Arc<A>,
}

impl<A: RentalsApi> OffsetPaging<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: RentalsApi> PagingStrategy for OffsetPaging<A> {
    type Token = u32;

    async fn fetch(
        &self,
        filters: &RentalFilters,
        token: Option<&u32>,
        limit: u32,
    ) -> Result<Page<u32>, ApiError> {
        let offset = token.copied().unwrap_or(0);
        let items = self.api.fetch_list(filters, limit, offset).await?;
        let has_more = items.len() == limit as usize;

        Ok(Page {
            next: has_more.then(|| offset.saturating_add(limit)),
            items,
            has_more,
        })
    }

    fn name(&self) -> &'static str {
        "offset"
    }
}

/// Cursor paging: the token is the opaque cursor handed out by the API
pub struct CursorPaging<A> {
    api: Arc<A>,
}

impl<A: RentalsApi> CursorPaging<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: RentalsApi> PagingStrategy for CursorPaging<A> {
    type Token = String;

    async fn fetch(
        &self,
        filters: &RentalFilters,
        token: Option<&String>,
        limit: u32,
    ) -> Result<Page<String>, ApiError> {
        let page = self
            .api
            .fetch_page(filters, limit, token.map(String::as_str))
            .await?;

        Ok(Page {
            items: page.items,
            next: page.next_cursor.filter(|c| !c.is_empty()),
            has_more: page.has_more,
        })
    }

    fn name(&self) -> &'static str {
        "cursor"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::models::CursorPage;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub fn rental(id: &str) -> Rental {
        Rental {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn rentals(prefix: &str, count: usize) -> Vec<Rental> {
        (0..count).map(|i| rental(&format!("{}{}", prefix, i))).collect()
    }

    /// A request the fake API saw
    #[derive(Debug, Clone, PartialEq)]
    pub struct Seen {
        pub filters: RentalFilters,
        pub limit: u32,
        pub offset: Option<u32>,
        pub cursor: Option<String>,
    }

    /// Scripted API: answers with queued responses in order
    #[derive(Default)]
    pub struct FakeApi {
        lists: Mutex<VecDeque<Result<Vec<Rental>, ApiError>>>,
        pages: Mutex<VecDeque<Result<CursorPage, ApiError>>>,
        seen: Mutex<Vec<Seen>>,
    }

    impl FakeApi {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push_list(&self, result: Result<Vec<Rental>, ApiError>) {
            self.lists.lock().unwrap().push_back(result);
        }

        pub fn push_page(&self, result: Result<CursorPage, ApiError>) {
            self.pages.lock().unwrap().push_back(result);
        }

        pub fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RentalsApi for FakeApi {
        async fn fetch_list(
            &self,
            filters: &RentalFilters,
            limit: u32,
            offset: u32,
        ) -> Result<Vec<Rental>, ApiError> {
            self.seen.lock().unwrap().push(Seen {
                filters: filters.clone(),
                limit,
                offset: Some(offset),
                cursor: None,
            });
            self.lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_page(
            &self,
            filters: &RentalFilters,
            limit: u32,
            cursor: Option<&str>,
        ) -> Result<CursorPage, ApiError> {
            self.seen.lock().unwrap().push(Seen {
                filters: filters.clone(),
                limit,
                offset: None,
                cursor: cursor.map(str::to_string),
            });
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(CursorPage::default()))
        }
    }
}

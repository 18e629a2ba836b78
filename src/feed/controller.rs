use crate::api::ApiError;
use crate::feed::paging::{Page, PagingStrategy};
use crate::models::{Rental, RentalFilters};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Loading and pagination flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState {
    pub loading: bool,
    pub loading_more: bool,
    pub has_more: bool,
    /// A first page has arrived for the current search
    pub searched: bool,
    /// Pages loaded so far for the current search
    pub page: u32,
    pub error: Option<String>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self {
            loading: false,
            loading_more: false,
            has_more: true,
            searched: false,
            page: 0,
            error: None,
        }
    }
}

/// Snapshot of the flags the scroll trigger cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStatus {
    pub loading: bool,
    pub loading_more: bool,
    pub has_more: bool,
    pub searched: bool,
}

impl LoadStatus {
    pub fn busy(&self) -> bool {
        self.loading || self.loading_more
    }
}

/// What a view should show for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No search has succeeded yet
    NotSearched,
    Loading,
    /// Searched, nothing matched
    Empty,
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
}

/// A fetch issued by the feed, to be handed back to [`Feed::complete`]
///
/// Carries the generation it was issued under so a late answer for an older
/// search can be recognized and dropped. Dropping a ticket without completing
/// it releases the feed's loading guard.
#[derive(Debug)]
pub struct FetchTicket<T> {
    generation: u64,
    kind: FetchKind,
    filters: RentalFilters,
    token: Option<T>,
    limit: u32,
    lease: Arc<()>,
}

impl<T: Clone + Send + Sync> FetchTicket<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn token(&self) -> Option<&T> {
        self.token.as_ref()
    }

    pub async fn run<P>(&self, paging: &P) -> Result<Page<T>, ApiError>
    where
        P: PagingStrategy<Token = T> + ?Sized,
    {
        paging
            .fetch(&self.filters, self.token.as_ref(), self.limit)
            .await
    }
}

/// Accumulated, incrementally loaded list of rentals
pub struct Feed<P: PagingStrategy> {
    paging: Arc<P>,
    limit: u32,
    filters: RentalFilters,
    items: Vec<Rental>,
    ids: HashSet<String>,
    next: Option<P::Token>,
    state: LoadState,
    generation: u64,
    in_flight: Option<Weak<()>>,
}

impl<P: PagingStrategy> Feed<P> {
    pub fn new(paging: P, limit: u32) -> Self {
        Self::with_shared(Arc::new(paging), limit)
    }

    pub fn with_shared(paging: Arc<P>, limit: u32) -> Self {
        Self {
            paging,
            limit: limit.max(1),
            filters: RentalFilters::default(),
            items: Vec::new(),
            ids: HashSet::new(),
            next: None,
            state: LoadState::default(),
            generation: 0,
            in_flight: None,
        }
    }

    /// Replace the list with the first page for `filters`
    pub async fn load_initial(&mut self, filters: RentalFilters) -> bool {
        let ticket = self.begin_initial(filters);
        let result = ticket.run(self.paging.as_ref()).await;
        self.complete(ticket, result)
    }

    /// Append the next page, unless a load is running or the end was reached
    pub async fn load_more(&mut self) -> bool {
        let Some(ticket) = self.begin_more() else {
            return false;
        };
        let result = ticket.run(self.paging.as_ref()).await;
        self.complete(ticket, result)
    }

    /// Start a new search: resets the list and supersedes any fetch in flight
    pub fn begin_initial(&mut self, filters: RentalFilters) -> FetchTicket<P::Token> {
        self.generation += 1;
        self.items.clear();
        self.ids.clear();
        self.next = None;
        self.filters = filters;
        self.state = LoadState {
            loading: true,
            ..LoadState::default()
        };

        debug!(
            "Starting {} search #{} with {:?}",
            self.paging.name(),
            self.generation,
            self.filters
        );

        FetchTicket {
            generation: self.generation,
            kind: FetchKind::Initial,
            filters: self.filters.clone(),
            token: None,
            limit: self.limit,
            lease: self.lease(),
        }
    }

    pub fn begin_more(&mut self) -> Option<FetchTicket<P::Token>> {
        self.reclaim();
        if self.state.loading || self.state.loading_more {
            debug!("Load more skipped: a load is already running");
            return None;
        }
        if !self.state.searched || !self.state.has_more {
            return None;
        }
        let token = self.next.clone()?;

        self.state.loading_more = true;
        self.state.error = None;

        debug!("Loading page {} at {:?}", self.state.page + 1, token);

        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::More,
            filters: self.filters.clone(),
            token: Some(token),
            limit: self.limit,
            lease: self.lease(),
        })
    }

    /// Give up on a ticket without a result
    pub fn abandon(&mut self, ticket: FetchTicket<P::Token>) {
        drop(ticket);
        self.reclaim();
    }

    /// Clear the loading flags left behind by a ticket that was dropped
    /// without being completed. Returns whether anything was released.
    pub fn reclaim(&mut self) -> bool {
        if !self.ticket_lost() {
            return false;
        }
        warn!("Fetch for search #{} was dropped before completing", self.generation);
        self.in_flight = None;
        self.state.loading = false;
        self.state.loading_more = false;
        true
    }

    fn lease(&mut self) -> Arc<()> {
        let lease = Arc::new(());
        self.in_flight = Some(Arc::downgrade(&lease));
        lease
    }

    fn ticket_lost(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|lease| lease.strong_count() == 0)
    }

    /// Apply the outcome of a fetch. Returns false when it was stale and ignored.
    pub fn complete(
        &mut self,
        ticket: FetchTicket<P::Token>,
        result: Result<Page<P::Token>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale {:?} response from search #{} (current #{})",
                ticket.kind, ticket.generation, self.generation
            );
            return false;
        }
        self.in_flight = None;

        match ticket.kind {
            FetchKind::Initial => {
                self.state.loading = false;
                match result {
                    Ok(page) => {
                        let has_more = self.continues(&page);
                        self.next = if has_more { page.next } else { None };
                        self.append(page.items);
                        self.state.has_more = has_more;
                        self.state.searched = true;
                        self.state.page = 1;
                        info!(
                            "Loaded {} rentals (has more: {})",
                            self.items.len(),
                            has_more
                        );
                    }
                    Err(e) => {
                        warn!("Initial load failed: {}", e);
                        self.state.has_more = false;
                        self.state.error = Some(e.to_string());
                    }
                }
            }
            FetchKind::More => {
                self.state.loading_more = false;
                match result {
                    Ok(page) => {
                        let has_more = self.continues(&page);
                        self.next = if has_more { page.next } else { None };
                        if !page.items.is_empty() {
                            let added = self.append(page.items);
                            self.state.page += 1;
                            info!("Appended {} rentals, {} total", added, self.items.len());
                        }
                        self.state.has_more = has_more;
                    }
                    Err(e) => {
                        warn!("Load more failed: {}", e);
                        self.state.error = Some(e.to_string());
                    }
                }
            }
        }

        true
    }

    /// A page only continues the listing when it is full and points somewhere
    fn continues(&self, page: &Page<P::Token>) -> bool {
        page.has_more && page.next.is_some() && page.items.len() >= self.limit as usize
    }

    /// Push the rentals whose id is not held yet; returns how many were added
    fn append(&mut self, incoming: Vec<Rental>) -> usize {
        let before = self.items.len();
        for rental in incoming {
            if self.ids.insert(rental.id.clone()) {
                self.items.push(rental);
            } else {
                debug!("Skipping duplicate rental {}", rental.id);
            }
        }
        self.items.len() - before
    }

    pub fn items(&self) -> &[Rental] {
        &self.items
    }

    pub fn last_item_id(&self) -> Option<&str> {
        self.items.last().map(|r| r.id.as_str())
    }

    pub fn filters(&self) -> &RentalFilters {
        &self.filters
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn status(&self) -> LoadStatus {
        let lost = self.ticket_lost();
        LoadStatus {
            loading: self.state.loading && !lost,
            loading_more: self.state.loading_more && !lost,
            has_more: self.state.has_more,
            searched: self.state.searched,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        if self.state.loading && !self.ticket_lost() {
            FeedPhase::Loading
        } else if !self.state.searched {
            FeedPhase::NotSearched
        } else if self.items.is_empty() {
            FeedPhase::Empty
        } else {
            FeedPhase::Listing
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shared handle to the paging strategy, for running tickets on another task
    pub fn paging(&self) -> Arc<P> {
        Arc::clone(&self.paging)
    }
}

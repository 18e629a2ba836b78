pub mod controller;
pub mod paging;
pub mod sentinel;

pub use controller::{Feed, FeedPhase, FetchKind, FetchTicket, LoadState, LoadStatus};
pub use paging::{CursorPaging, OffsetPaging, Page, PagingStrategy};
pub use sentinel::{IntersectionEvent, ScrollTrigger, Viewport};

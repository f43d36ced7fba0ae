//! Result projector: derives the visible citation list from raw results.
//!
//! The raw list returned by the service is never mutated. Sorting, the
//! optional relevance cutoff and pagination all produce index orders or
//! slices over it, recomputed from (raw data, sort mode, reveal count).

pub mod cutoff;
pub mod paging;
pub mod sort;
pub mod view;

pub use paging::Pagination;
pub use view::{ProjectionKey, Projector};

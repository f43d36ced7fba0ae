//! Query orchestrator: validated queries, concurrent fan-out to both
//! recommendation endpoints, and the session state they feed.
//!
//! Every search is tagged with a monotonically increasing generation and a
//! cancellation token. Starting a new search cancels the previous token, and
//! a response is applied to the view only while its generation is current.

pub mod query;
pub mod session;

pub use query::{Query, MIN_QUERY_CHARS};
pub use session::{QueryOutcome, Recommendations, SearchSession, SearchTicket, SessionView};

//! Cooperative step scheduling for trellis compile passes.
//!
//! Every compiler step runs as its own tokio task so that a caller which stops
//! awaiting never cancels work that has already started. Callers keep the
//! strict step ordering by awaiting each [`JoinHandle`](tokio::task::JoinHandle)
//! before scheduling the next one.

mod class;
mod panic;
mod spawn;

pub use class::TaskClass;
pub use panic::{join_error_message, join_error_panic_message};
pub use spawn::{defer, spawn};

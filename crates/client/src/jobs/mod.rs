//! Search jobs: the dispatch-state machine and the job collection.

mod collection;
mod job;
mod poll;

pub use collection::JobCollection;
pub use job::Job;
pub use poll::PollPolicy;

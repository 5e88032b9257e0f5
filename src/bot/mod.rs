//! Event-driven surface: new blocks and vault logs are turned into
//! [`ChainEvent`]s and handed to a [`Dispatcher`] one at a time.

pub mod dispatch;
pub mod watch;

pub use dispatch::{ChainEvent, Dispatcher, Outcome};
pub use watch::{PollSummary, Watcher};

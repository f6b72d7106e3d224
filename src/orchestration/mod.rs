pub mod refresh;
pub mod store;

pub use refresh::{IngestResult, Refresher};
pub use store::EventStore;

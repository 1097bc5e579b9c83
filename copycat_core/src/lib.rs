pub mod analysis;
pub mod collector;
pub mod detector;
pub mod error;
pub mod model;
pub mod store;
#[cfg(test)]
mod test;

pub use analysis::{analyze, Analysis, Settings};
pub use collector::{Collector, Failure};
pub use detector::{detect, DEFAULT_SIMILARITY_THRESHOLD};
pub use error::*;
pub use model::{AccountRecord, Field, MatchEntry};
pub use store::Store;

pub mod classifier;
pub mod coordinator;
pub mod data_source;
pub mod error;

pub use classifier::{
    classify, Classification, ConnectionNotice, DisplayInstruction, MessageKey, Panel,
};
pub use coordinator::{CoordinatorState, RequestCoordinator, SearchAction};
pub use data_source::{FactsDataSource, HttpFactsDataSource};
pub use error::FactsClientError;

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod classifier_tests;

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod coordinator_tests;

#[cfg(test)]
#[path = "tests/data_source_tests.rs"]
mod data_source_tests;

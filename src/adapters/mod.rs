// Adapters layer: concrete implementations of the store and publisher ports.

pub mod memory;
pub mod rabbit_http;

pub use memory::{Dataset, InMemoryCaseStore, InMemoryQuestionnaireLinkStore};
pub use rabbit_http::HttpEventPublisher;

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliArgs, Command};
pub use config::TomlConfig;

pub use adapters::{
    Dataset, HttpEventPublisher, InMemoryCaseStore, InMemoryQuestionnaireLinkStore,
};
pub use crate::core::{
    case_service::CaseService, fulfilment::FulfilmentService, identifier::validate_case_id,
};
pub use domain::model::{
    Case, Destination, DomainEvent, FulfilmentRequest, QuestionnaireLink, UacQidCreated,
};
pub use utils::error::{CaseApiError, Result};

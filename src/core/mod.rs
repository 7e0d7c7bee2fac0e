pub mod case_service;
pub mod fulfilment;
pub mod identifier;

pub use crate::domain::model::{Case, DomainEvent, QuestionnaireLink};
pub use crate::domain::ports::{CaseStore, ConfigProvider, EventPublisher, QuestionnaireLinkStore};
pub use crate::utils::error::Result;

use crate::domain::model::{Case, Destination, DomainEvent, QuestionnaireLink};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CaseStore: Send + Sync {
    /// `None` and an empty list both mean no match.
    async fn find_by_uprn(&self, uprn: &str, valid_address_only: bool)
        -> Result<Option<Vec<Case>>>;
    async fn find_by_case_id(&self, case_id: Uuid) -> Result<Option<Case>>;
    async fn find_by_case_ref(&self, case_ref: i64) -> Result<Option<Case>>;
    /// CCS cases whose postcode matches ignoring case and whitespace.
    async fn find_ccs_by_postcode(&self, postcode: &str) -> Result<Vec<Case>>;
    async fn exists_by_case_id(&self, case_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait QuestionnaireLinkStore: Send + Sync {
    async fn find_by_qid(&self, qid: &str) -> Result<Option<QuestionnaireLink>>;
    async fn find_ccs_link_by_case_id(
        &self,
        case_id: Uuid,
        survey: &str,
    ) -> Result<Option<QuestionnaireLink>>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, destination: &Destination, event: &DomainEvent) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn events_exchange(&self) -> &str;
    fn fulfilment_event_routing_key(&self) -> &str;
}

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Survey tag carried by cases in the audit (CCS) sub-population.
pub const CCS_SURVEY: &str = "CCS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub case_id: Uuid,
    pub case_ref: i64,
    pub uprn: String,
    #[serde(default)]
    pub address_invalid: bool,
    pub survey: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub ccs_case: bool,
}

/// Association between a questionnaire id and the case it was issued for, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireLink {
    pub qid: String,
    #[serde(default)]
    pub uac: String,
    pub case: Option<Case>,
    #[serde(default)]
    pub ccs_case: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Payload of a previously emitted UAC/QID creation, echoed into fulfilment requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UacQidCreated {
    pub uac: String,
    pub qid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfilmentRequest {
    pub case_id: String,
    pub fulfilment_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_case_id: Option<String>,
    pub uac_qid_created: UacQidCreated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    FulfilmentRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date_time: DateTime<FixedOffset>,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventPayload {
    FulfilmentRequest(FulfilmentRequest),
}

/// Envelope published to the events exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event: EventHeader,
    pub payload: EventPayload,
}

impl DomainEvent {
    pub fn fulfilment_request(&self) -> Option<&FulfilmentRequest> {
        match &self.payload {
            EventPayload::FulfilmentRequest(request) => Some(request),
        }
    }
}

/// Exchange and routing key an event is published to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub exchange: String,
    pub routing_key: String,
}

impl Destination {
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }
}

/// Uppercased postcode with all whitespace removed.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

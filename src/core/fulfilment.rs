use crate::core::{ConfigProvider, EventPublisher};
use crate::domain::model::{
    Destination, DomainEvent, EventHeader, EventPayload, EventType, FulfilmentRequest,
    UacQidCreated,
};
use crate::utils::error::Result;
use chrono::Utc;
use uuid::Uuid;

/// Builds fulfilment-requested events and publishes them to the events exchange.
pub struct FulfilmentService<P: EventPublisher> {
    publisher: P,
    destination: Destination,
}

impl<P: EventPublisher> FulfilmentService<P> {
    pub fn new(publisher: P, destination: Destination) -> Self {
        Self {
            publisher,
            destination,
        }
    }

    pub fn from_config<C: ConfigProvider>(publisher: P, config: &C) -> Self {
        Self::new(
            publisher,
            Destination::new(config.events_exchange(), config.fulfilment_event_routing_key()),
        )
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// `case_id` is passed through as given; it is not validated here.
    /// Publish failures are returned unchanged.
    pub async fn build_and_send_fulfilment_request(
        &self,
        case_id: &str,
        fulfilment_code: &str,
        individual_case_id: Option<&str>,
        uac_qid_created: UacQidCreated,
    ) -> Result<()> {
        let individual_case_id = individual_case_id.filter(|id| !id.is_empty());

        let header = EventHeader {
            event_type: EventType::FulfilmentRequested,
            date_time: Utc::now().fixed_offset(),
            transaction_id: Uuid::new_v4().to_string(),
        };

        match individual_case_id {
            Some(individual_case_id) => tracing::debug!(
                case_id,
                individual_case_id,
                transaction_id = %header.transaction_id,
                "Sending fulfilment requested event"
            ),
            None => tracing::debug!(
                case_id,
                transaction_id = %header.transaction_id,
                "Sending fulfilment requested event"
            ),
        }

        let request = FulfilmentRequest {
            case_id: case_id.to_string(),
            fulfilment_code: fulfilment_code.to_string(),
            individual_case_id: individual_case_id.map(str::to_string),
            uac_qid_created,
        };

        let event = DomainEvent {
            event: header,
            payload: EventPayload::FulfilmentRequest(request),
        };

        self.publisher.publish(&self.destination, &event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CaseApiError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockPublisher {
        published: Arc<Mutex<Vec<(Destination, DomainEvent)>>>,
        fail_with: Option<String>,
    }

    impl MockPublisher {
        async fn published(&self) -> Vec<(Destination, DomainEvent)> {
            self.published.lock().await.clone()
        }
    }

    #[async_trait]
    impl EventPublisher for MockPublisher {
        async fn publish(&self, destination: &Destination, event: &DomainEvent) -> Result<()> {
            if let Some(message) = &self.fail_with {
                return Err(CaseApiError::Transport {
                    message: message.clone(),
                });
            }
            self.published
                .lock()
                .await
                .push((destination.clone(), event.clone()));
            Ok(())
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn events_exchange(&self) -> &str {
            "events"
        }

        fn fulfilment_event_routing_key(&self) -> &str {
            "event.fulfilment.request"
        }
    }

    fn uac_qid_created() -> UacQidCreated {
        UacQidCreated {
            uac: "abcd1234".to_string(),
            qid: "2120000000000100".to_string(),
            case_id: Some("11111111-1111-1111-1111-111111111111".to_string()),
        }
    }

    #[tokio::test]
    async fn test_publishes_to_configured_destination() {
        let publisher = MockPublisher::default();
        let service = FulfilmentService::from_config(publisher.clone(), &MockConfig);

        service
            .build_and_send_fulfilment_request(
                "11111111-1111-1111-1111-111111111111",
                "UACIT1",
                None,
                uac_qid_created(),
            )
            .await
            .unwrap();

        let published = publisher.published().await;
        assert_eq!(published.len(), 1);

        let (destination, event) = &published[0];
        assert_eq!(
            destination,
            &Destination::new("events", "event.fulfilment.request")
        );
        assert_eq!(event.event.event_type, EventType::FulfilmentRequested);
        assert!(Uuid::parse_str(&event.event.transaction_id).is_ok());

        let request = event.fulfilment_request().unwrap();
        assert_eq!(request.case_id, "11111111-1111-1111-1111-111111111111");
        assert_eq!(request.fulfilment_code, "UACIT1");
        assert_eq!(request.uac_qid_created, uac_qid_created());
    }

    #[tokio::test]
    async fn test_individual_case_id_omitted_when_absent_or_empty() {
        let publisher = MockPublisher::default();
        let service = FulfilmentService::from_config(publisher.clone(), &MockConfig);

        for individual_case_id in [None, Some("")] {
            service
                .build_and_send_fulfilment_request(
                    "case",
                    "UACHHT1",
                    individual_case_id,
                    uac_qid_created(),
                )
                .await
                .unwrap();
        }

        for (_, event) in publisher.published().await {
            assert_eq!(event.fulfilment_request().unwrap().individual_case_id, None);
            let json = serde_json::to_value(&event).unwrap();
            assert!(json["payload"]["fulfilmentRequest"]
                .get("individualCaseId")
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_individual_case_id_included_when_present() {
        let publisher = MockPublisher::default();
        let service = FulfilmentService::from_config(publisher.clone(), &MockConfig);

        service
            .build_and_send_fulfilment_request(
                "11111111-1111-1111-1111-111111111111",
                "UACIT1",
                Some("22222222-2222-2222-2222-222222222222"),
                uac_qid_created(),
            )
            .await
            .unwrap();

        let (_, event) = publisher.published().await.remove(0);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json["payload"]["fulfilmentRequest"]["individualCaseId"],
            "22222222-2222-2222-2222-222222222222"
        );
    }

    #[tokio::test]
    async fn test_case_id_is_not_validated() {
        let publisher = MockPublisher::default();
        let service = FulfilmentService::from_config(publisher.clone(), &MockConfig);

        service
            .build_and_send_fulfilment_request("not-a-uuid", "UACIT1", None, uac_qid_created())
            .await
            .unwrap();

        let (_, event) = publisher.published().await.remove(0);
        assert_eq!(event.fulfilment_request().unwrap().case_id, "not-a-uuid");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_not_deduplicated() {
        let publisher = MockPublisher::default();
        let service = FulfilmentService::from_config(publisher.clone(), &MockConfig);

        for _ in 0..2 {
            service
                .build_and_send_fulfilment_request("case", "UACIT1", None, uac_qid_created())
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let published = publisher.published().await;
        assert_eq!(published.len(), 2);
        let (first, second) = (&published[0].1.event, &published[1].1.event);
        assert_ne!(first.transaction_id, second.transaction_id);
        assert!(second.date_time > first.date_time);
    }

    #[tokio::test]
    async fn test_publish_failure_propagates() {
        let publisher = MockPublisher {
            fail_with: Some("connection refused".to_string()),
            ..Default::default()
        };
        let service = FulfilmentService::from_config(publisher, &MockConfig);

        let result = service
            .build_and_send_fulfilment_request("case", "UACIT1", None, uac_qid_created())
            .await;

        match result {
            Err(CaseApiError::Transport { message }) => assert_eq!(message, "connection refused"),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }
}

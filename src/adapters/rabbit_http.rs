use crate::core::{DomainEvent, EventPublisher};
use crate::domain::model::Destination;
use crate::utils::error::{CaseApiError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct PublishProperties {
    content_type: &'static str,
    delivery_mode: u8,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    properties: PublishProperties,
    routing_key: &'a str,
    payload: String,
    payload_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    routed: bool,
}

/// Publishes events through the RabbitMQ management HTTP API.
pub struct HttpEventPublisher {
    client: Client,
    base_url: Url,
    vhost: String,
    username: String,
    password: String,
}

impl HttpEventPublisher {
    pub fn new(
        endpoint: &str,
        vhost: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(endpoint).map_err(|e| CaseApiError::InvalidConfigValueError {
            field: "publisher.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            vhost: vhost.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// `{endpoint}/api/exchanges/{vhost}/{exchange}/publish`, segments percent-encoded.
    fn publish_url(&self, exchange: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CaseApiError::ConfigError {
                message: format!("Publisher endpoint '{}' cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(["api", "exchanges", self.vhost.as_str(), exchange, "publish"]);
        Ok(url)
    }
}

#[async_trait]
impl EventPublisher for HttpEventPublisher {
    async fn publish(&self, destination: &Destination, event: &DomainEvent) -> Result<()> {
        let url = self.publish_url(&destination.exchange)?;
        let body = PublishRequest {
            properties: PublishProperties {
                content_type: "application/json",
                delivery_mode: 2,
            },
            routing_key: &destination.routing_key,
            payload: serde_json::to_string(event)?,
            payload_encoding: "string",
        };

        tracing::debug!("Publishing event to: {}", url);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CaseApiError::Transport {
                message: format!("Broker rejected publish with status {}: {}", status, text),
            });
        }

        let result: PublishResponse = response.json().await?;
        if !result.routed {
            tracing::warn!(
                exchange = %destination.exchange,
                routing_key = %destination.routing_key,
                transaction_id = %event.event.transaction_id,
                "Event was not routed to any queue"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EventHeader, EventPayload, EventType, FulfilmentRequest, UacQidCreated};
    use chrono::Utc;
    use httpmock::prelude::*;

    fn event() -> DomainEvent {
        DomainEvent {
            event: EventHeader {
                event_type: EventType::FulfilmentRequested,
                date_time: Utc::now().fixed_offset(),
                transaction_id: "c45de4dc-3c3b-11e9-b210-d663bd873d93".to_string(),
            },
            payload: EventPayload::FulfilmentRequest(FulfilmentRequest {
                case_id: "11111111-1111-1111-1111-111111111111".to_string(),
                fulfilment_code: "UACHHT1".to_string(),
                individual_case_id: None,
                uac_qid_created: UacQidCreated {
                    uac: "abcd1234".to_string(),
                    qid: "0120000000000100".to_string(),
                    case_id: None,
                },
            }),
        }
    }

    fn publisher(endpoint: &str) -> HttpEventPublisher {
        HttpEventPublisher::new(endpoint, "census", "guest", "guest", Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_publish_posts_to_exchange() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/exchanges/census/events/publish")
                    .header_exists("authorization")
                    .body_contains("\"routing_key\":\"event.fulfilment.request\"")
                    .body_contains("FULFILMENT_REQUESTED");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({"routed": true}));
            })
            .await;

        let destination = Destination::new("events", "event.fulfilment.request");
        let result = publisher(&server.base_url())
            .publish(&destination, &event())
            .await;

        api_mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unrouted_event_is_not_an_error() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/exchanges/census/events/publish");
                then.status(200).json_body(serde_json::json!({"routed": false}));
            })
            .await;

        let destination = Destination::new("events", "unbound.key");
        let result = publisher(&server.base_url())
            .publish(&destination, &event())
            .await;

        api_mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_broker_error_is_transport_error() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/exchanges/census/events/publish");
                then.status(500).body("internal error");
            })
            .await;

        let destination = Destination::new("events", "event.fulfilment.request");
        let result = publisher(&server.base_url())
            .publish(&destination, &event())
            .await;

        api_mock.assert_async().await;
        match result {
            Err(CaseApiError::Transport { message }) => assert!(message.contains("500")),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_publish_url_encodes_default_vhost() {
        let publisher = HttpEventPublisher::new(
            "http://localhost:15672/",
            "/",
            "guest",
            "guest",
            Duration::from_secs(5),
        )
        .unwrap();

        let url = publisher.publish_url("events").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:15672/api/exchanges/%2F/events/publish"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = HttpEventPublisher::new("not a url", "/", "guest", "guest", Duration::from_secs(5));
        assert!(matches!(
            result,
            Err(CaseApiError::InvalidConfigValueError { .. })
        ));
    }
}

use poem_openapi::{OpenApi, param::Path, payload::{Json, PlainText}};

use super::ApiState;
use super::models::{
    CursorResponseDto, DeliveryResponseDto, PassResponseDto, PreferenceResponseDto,
    PreferenceUpdateDto,
};
use super::services::{health::HealthService, subscribers::SubscriberService};

pub struct BibleBotApi {
    pub state: ApiState,
}

#[OpenApi]
impl BibleBotApi {
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> PlainText<String> {
        tracing::debug!("handling /status");
        HealthService::new(&self.state).status_text().await
    }

    /// Next verse due for a subscriber
    #[oai(path = "/v1/subscribers/:subscriber/cursor", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, subscriber))]
    async fn get_cursor(&self, subscriber: Path<String>) -> CursorResponseDto {
        SubscriberService::new(&self.state).cursor(subscriber.0.trim()).await
    }

    #[oai(path = "/v1/subscribers/:subscriber/preference", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, subscriber))]
    async fn get_preference(&self, subscriber: Path<String>) -> PreferenceResponseDto {
        SubscriberService::new(&self.state)
            .preference(subscriber.0.trim())
            .await
    }

    /// Set how many verses a subscriber receives per delivery
    #[oai(path = "/v1/subscribers/:subscriber/preference", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, subscriber, body))]
    async fn put_preference(
        &self,
        subscriber: Path<String>,
        body: Json<PreferenceUpdateDto>,
    ) -> PreferenceResponseDto {
        SubscriberService::new(&self.state)
            .set_preference(subscriber.0.trim(), body.0.batch_size)
            .await
    }

    /// Deliver the next batch to one subscriber right away
    #[oai(path = "/v1/subscribers/:subscriber/deliveries", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, subscriber))]
    async fn deliver_now(&self, subscriber: Path<String>) -> DeliveryResponseDto {
        SubscriberService::new(&self.state)
            .deliver_now(subscriber.0.trim())
            .await
    }

    /// Run a full roster pass outside the daily schedule
    #[oai(path = "/v1/passes", method = "post")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn start_pass(&self) -> PassResponseDto {
        SubscriberService::new(&self.state).start_pass().await
    }
}

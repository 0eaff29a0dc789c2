use poem_openapi::payload::{Json, PlainText};

use crate::{
    api::{
        ApiState,
        models::{
            CursorDto, CursorResponseDto, DeliveryResponseDto, ErrorDto, PassResponseDto,
            PreferenceDto, PreferenceResponseDto,
        },
    },
    delivery::DeliveryError,
    domain::models::BatchSize,
};

pub struct SubscriberService<'a> {
    pub state: &'a ApiState,
}

impl<'a> SubscriberService<'a> {
    pub fn new(state: &'a ApiState) -> Self {
        Self { state }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn cursor(&self, subscriber: &str) -> CursorResponseDto {
        match self.state.cursors.get_or_start(subscriber, &self.state.catalog).await {
            Ok(next) => CursorResponseDto::Ok(Json(CursorDto {
                subscriber: subscriber.to_string(),
                next: next.into(),
            })),
            Err(e) => {
                tracing::error!(%subscriber, error = ?e, "failed to read cursor");
                CursorResponseDto::InternalError(Json(format!("cursor store error: {e}").into()))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn preference(&self, subscriber: &str) -> PreferenceResponseDto {
        match self.state.preferences.get(subscriber).await {
            Ok(size) => PreferenceResponseDto::Ok(Json(PreferenceDto {
                subscriber: subscriber.to_string(),
                batch_size: size.unwrap_or_default().get() as u32,
            })),
            Err(e) => PreferenceResponseDto::InternalError(Json(
                format!("preference store error: {e}").into(),
            )),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn set_preference(&self, subscriber: &str, requested: i64) -> PreferenceResponseDto {
        let size = BatchSize::clamped(requested);
        match self.state.preferences.set(subscriber, size).await {
            Ok(()) => PreferenceResponseDto::Ok(Json(PreferenceDto {
                subscriber: subscriber.to_string(),
                batch_size: size.get() as u32,
            })),
            Err(e) => {
                tracing::error!(%subscriber, error = ?e, "failed to store preference");
                PreferenceResponseDto::InternalError(Json(
                    format!("preference store error: {e}").into(),
                ))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn deliver_now(&self, subscriber: &str) -> DeliveryResponseDto {
        match self.state.engine.deliver_now(subscriber).await {
            Ok(report) => DeliveryResponseDto::Ok(Json(report.into())),
            Err(DeliveryError::Busy) => DeliveryResponseDto::Conflict(Json(ErrorDto {
                message: DeliveryError::Busy.to_string(),
            })),
            Err(DeliveryError::Failed(e)) => {
                tracing::error!(%subscriber, error = ?e, "on-demand delivery failed");
                DeliveryResponseDto::InternalError(Json(format!("delivery failed: {e}").into()))
            }
        }
    }

    /// Start a roster pass now. The engine rejects it again if something grabs
    /// the run lock between this check and the spawned task.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn start_pass(&self) -> PassResponseDto {
        if self.state.engine.is_running() {
            return PassResponseDto::Conflict(Json(ErrorDto {
                message: DeliveryError::Busy.to_string(),
            }));
        }
        let engine = self.state.engine.clone();
        let cancel = self.state.shutdown.clone();
        tokio::spawn(async move {
            match engine.run_pass(&cancel).await {
                Ok(report) => tracing::info!(pass_id = %report.pass_id, "manual pass complete"),
                Err(e) => tracing::warn!(error = %e, "manual pass not run"),
            }
        });
        PassResponseDto::Accepted(PlainText("pass started".into()))
    }
}

use poem_openapi::payload::PlainText;

use crate::api::ApiState;

pub struct HealthService<'a> {
    pub state: &'a ApiState,
}

impl<'a> HealthService<'a> {
    pub fn new(state: &'a ApiState) -> Self {
        Self { state }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        PlainText(format!(
            "bible_bot version={} books={} verses={} running={}",
            env!("CARGO_PKG_VERSION"),
            self.state.catalog.books().len(),
            self.state.catalog.total_verses(),
            self.state.engine.is_running()
        ))
    }
}

//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and adds a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cadence_app::{Scheduler, StepExecutor, TokioTimer};
    use cadence_domain::action::StepDefinition;
    use cadence_domain::step::{StepOutput, StepResult};
    use cadence_domain::time;
    use tower::ServiceExt;

    use super::*;

    struct StubExecutor;

    impl StepExecutor for StubExecutor {
        async fn execute(&self, step: &StepDefinition) -> StepResult {
            StepResult::passed(step, time::now(), StepOutput::Empty)
        }
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(AppState::new(Scheduler::spawn(StubExecutor, TokioTimer)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! HTTP form surface.
//!
//! `GET /` renders the empty form. `POST /predict` is the only trigger that
//! runs the classifier; nothing else renders a verdict.

use crate::error::FormError;
use crate::forms::FormKind;
use crate::metrics::FormMetrics;
use crate::models::inference::InferenceEngine;
use crate::render::{self, Outcome};
use crate::types::submission::FormSubmission;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<InferenceEngine>,
    metrics: Arc<FormMetrics>,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>, metrics: Arc<FormMetrics>) -> Self {
        Self { engine, metrics }
    }
}

/// Build the router for one form
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Failure of a predict request, rendered back into the form page
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{source}")]
    Invalid {
        form: FormKind,
        submission: FormSubmission,
        source: FormError,
    },

    #[error("inference failed: {source}")]
    Inference {
        form: FormKind,
        submission: FormSubmission,
        source: anyhow::Error,
    },
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match self {
            SubmitError::Invalid {
                form,
                submission,
                source,
            } => {
                let message = source.to_string();
                let body = render::page(form, &submission, Outcome::Invalid(&message));
                (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response()
            }
            SubmitError::Inference {
                form, submission, ..
            } => {
                let body = render::page(form, &submission, Outcome::Failure);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn show_form(State(state): State<AppState>) -> Html<String> {
    Html(render::page(
        state.engine.form(),
        &FormSubmission::new(),
        Outcome::Empty,
    ))
}

async fn predict(
    State(state): State<AppState>,
    Form(submission): Form<FormSubmission>,
) -> Result<Html<String>, SubmitError> {
    let form = state.engine.form();
    let span = info_span!("submission", submission_id = %Uuid::new_v4(), form = %form);

    handle_submission(state, form, submission)
        .instrument(span)
        .await
}

async fn handle_submission(
    state: AppState,
    form: FormKind,
    submission: FormSubmission,
) -> Result<Html<String>, SubmitError> {
    state.metrics.record_submission();

    let features = match state.engine.extract(&submission) {
        Ok(features) => features,
        Err(source) => {
            state.metrics.record_rejection();
            warn!(error = %source, "Submission rejected");
            return Err(SubmitError::Invalid {
                form,
                submission,
                source,
            });
        }
    };

    let start_time = Instant::now();
    let engine = state.engine.clone();
    let span = Span::current();
    let joined = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        engine.predict(&features)
    })
    .await;

    let result = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(source)) => {
            state.metrics.record_failure();
            error!(error = %source, "Inference failed");
            return Err(SubmitError::Inference {
                form,
                submission,
                source,
            });
        }
        Err(join_error) => {
            state.metrics.record_failure();
            error!(error = %join_error, "Inference task aborted");
            return Err(SubmitError::Inference {
                form,
                submission,
                source: join_error.into(),
            });
        }
    };

    let inference_time = start_time.elapsed();
    state.metrics.record_prediction(
        result.prediction.label,
        result.verdict.percentage,
        inference_time,
    );

    info!(
        label = %result.prediction.label,
        percentage = result.verdict.percentage,
        inference_time_us = inference_time.as_micros() as u64,
        "Prediction rendered"
    );

    Ok(Html(render::page(
        form,
        &submission,
        Outcome::Verdict(&result.verdict),
    )))
}

//! Draft handlers

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use domain::{EmailDraft, ProspectProfile};
use futures::{Stream, StreamExt};
use tracing::{info, instrument};

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Draft an email for the posted prospect
#[instrument(skip(state, prospect), fields(company = %prospect.company))]
pub async fn create_draft(
    State(state): State<AppState>,
    ValidatedJson(prospect): ValidatedJson<ProspectProfile>,
) -> Result<Json<EmailDraft>, ApiError> {
    let draft = state.pipeline.process(prospect).await?;
    info!(subject = %draft.email.subject, "Draft served");
    Ok(Json(draft))
}

/// Draft an email, streaming one SSE event per completed stage
///
/// Each event is named after its stage (or `error`) and carries the event
/// as JSON. Closing the connection stops the run after the stage in flight.
#[instrument(skip(state, prospect), fields(company = %prospect.company))]
pub async fn create_draft_stream(
    State(state): State<AppState>,
    ValidatedJson(prospect): ValidatedJson<ProspectProfile>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let events = state
        .pipeline
        .process_with_streaming(prospect)
        .map(|event| Event::default().event(event.name()).json_data(&event));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

//! Streaming variant of the draft pipeline
//!
//! The stream is pull-driven: a stage only runs when the consumer polls for
//! the next event, so dropping the stream stops the run after the stage in
//! flight.

use std::pin::Pin;

use domain::{DraftStage, DraftState, ProspectProfile};
use futures::{Stream, stream};
use serde::Serialize;
use tracing::{debug, error};

use super::{DraftPipeline, ParseBranch};

/// Progress notification emitted after each stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DraftEvent {
    /// A stage finished and wrote `value`
    Update {
        stage: DraftStage,
        value: String,
        branch: ParseBranch,
        attempts: u32,
    },
    /// The run was aborted
    Error { message: String },
}

impl DraftEvent {
    /// Event name used on the wire: the stage name, or `error`
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Update { stage, .. } => stage.as_str(),
            Self::Error { .. } => "error",
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Boxed event stream returned by [`DraftPipeline::process_with_streaming`]
pub type DraftEventStream = Pin<Box<dyn Stream<Item = DraftEvent> + Send>>;

enum Cursor {
    Next(DraftStage, Box<DraftState>),
    Done,
}

impl DraftPipeline {
    /// Draft an email, yielding one event per executed stage
    ///
    /// An unexpected failure yields a single [`DraftEvent::Error`] and ends
    /// the stream.
    pub fn process_with_streaming(&self, prospect: ProspectProfile) -> DraftEventStream {
        let state = DraftState::new(prospect.sanitized());
        self.stream_from(DraftStage::INITIAL, state)
    }

    pub(super) fn stream_from(&self, first: DraftStage, state: DraftState) -> DraftEventStream {
        let pipeline = self.clone();

        Box::pin(stream::unfold(
            Cursor::Next(first, Box::new(state)),
            move |cursor| {
                let pipeline = pipeline.clone();
                async move {
                    let Cursor::Next(stage, mut state) = cursor else {
                        return None;
                    };

                    match pipeline.execute_stage(stage, &mut state).await {
                        Ok(report) => {
                            let event = DraftEvent::Update {
                                stage,
                                value: state.field(stage).to_string(),
                                branch: report.branch,
                                attempts: report.attempts,
                            };
                            debug!(%stage, branch = ?report.branch, "Draft stage streamed");

                            let next = match state.next_stage(stage) {
                                Some(next) => Cursor::Next(next, state),
                                None => Cursor::Done,
                            };
                            Some((event, next))
                        },
                        Err(e) => {
                            error!(%stage, error = %e, "Draft stream aborted");
                            let event = DraftEvent::Error {
                                message: e.to_string(),
                            };
                            Some((event, Cursor::Done))
                        },
                    }
                }
            },
        ))
    }
}

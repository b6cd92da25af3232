//! Application services - Use case implementations

mod draft_pipeline;

pub use draft_pipeline::{
    DraftEvent, DraftEventStream, DraftPipeline, DraftRun, ParseBranch, ParseOutcome, Refinement,
    StageReport,
};

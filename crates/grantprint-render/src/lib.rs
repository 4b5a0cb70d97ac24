//! Rendering utilities for human surfaces (PR comments, job summaries).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::render_markdown;
pub use model::{
    RenderableAction, RenderableCounts, RenderableData, RenderableDecision, RenderableFinding,
    RenderableReport, RenderableSeverity, RenderableVerdictStatus,
};

//! Typed error hierarchy for the fabrik pipeline.
//!
//! Two enums cover the two subsystems:
//! - `AgentError` — failures invoking the external coding agent
//! - `PipelineError` — stage sequencing and dependency-graph failures

use std::path::PathBuf;
use thiserror::Error;

/// Errors from a single external-agent invocation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Failed to spawn agent process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write instruction file at {path}: {source}")]
    InstructionWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Agent failed after {attempts} attempts (last exit code {exit_code})")]
    Exhausted { attempts: u32, exit_code: i32 },
}

/// Errors from the stage pipeline and the dependency sequencer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unable to read architecture artifact at {path}. Check the architecture stage output.")]
    ArchitectureUnavailable { path: PathBuf },

    #[error("Unknown dependency '{dependency}' in module '{module}': no module with that name exists")]
    UnknownDependency { module: String, dependency: String },

    #[error("Circular dependency detected. Involved modules: {modules:?}")]
    CircularDependency { modules: Vec<String> },

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

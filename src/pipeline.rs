//! Enrichment pipeline launcher
//!
//! The pipeline regenerates the Parquet dataset from fresh upstream downloads.
//! It is an external program; this module only starts it and waits for it.

use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

use crate::config::PipelineConfig;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No pipeline command configured")]
    NotConfigured,

    #[error("Failed to start pipeline {program:?}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Pipeline failed: {status}")]
    Failed { code: Option<i32>, status: String },
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub elapsed: Duration,
}

/// Run the configured pipeline to completion.
///
/// The child inherits stdout and stderr so its progress output stays visible.
pub async fn launch_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    let (program, args) = config
        .command
        .split_first()
        .ok_or(PipelineError::NotConfigured)?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = &config.working_dir {
        command.current_dir(dir);
    }

    info!("Launching pipeline: {}", config.command.join(" "));
    let started = Instant::now();

    let status = command
        .status()
        .await
        .map_err(|source| PipelineError::Spawn {
            program: program.clone(),
            source,
        })?;

    let elapsed = started.elapsed();
    if !status.success() {
        error!("Pipeline failed after {:?}: {}", elapsed, status);
        return Err(PipelineError::Failed {
            code: status.code(),
            status: status.to_string(),
        });
    }

    info!("Pipeline finished in {:?}", elapsed);
    Ok(PipelineOutcome { elapsed })
}

//! Optional flat-file archive of accepted submissions.
//!
//! # Design Decisions
//! - Collaborator step, not part of the pipeline contract: an archive
//!   failure is logged and never surfaced to the caller
//! - Append-only JSON lines, one record per accepted submission
//! - Disabled by default

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::submission::Submission;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveRecord<'a> {
    #[serde(flatten)]
    submission: &'a Submission,
    received_at_ms: u64,
}

/// Append-only JSON-lines log of accepted submissions.
pub struct SubmissionArchive {
    path: PathBuf,
}

impl SubmissionArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one accepted submission.
    pub async fn append(&self, submission: &Submission) -> Result<(), ArchiveError> {
        let record = ArchiveRecord {
            submission,
            received_at_ms: epoch_millis(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

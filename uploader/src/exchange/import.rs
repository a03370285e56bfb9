use tracing::{info, instrument};

use super::client::{ExchangeClient, ExchangeRequest};
use super::response::Status;
use super::session::Session;
use super::transfer::FileJob;
use crate::constants::protocol;
use crate::errors::{ExchangeError, Result};

/// Counters for the import phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files: usize,
    pub polls: usize,
}

/// Import every job in order, stopping the run at the first failure.
pub async fn import_all(
    client: &ExchangeClient,
    session: &Session,
    jobs: &[FileJob],
    max_polls: Option<u32>,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for job in jobs {
        summary.polls += import_file(client, session, job, max_polls).await?;
        summary.files += 1;
    }
    info!(
        "Import finished: {} file(s), {} request(s)",
        summary.files, summary.polls
    );
    Ok(summary)
}

/// Poll `import` for one file until the server leaves `progress`.
///
/// Polls are issued back to back. Without `max_polls` the loop has no bound,
/// so a server that reports progress forever keeps the client waiting.
#[instrument(skip(client, session, job), fields(file = %job.server_visible_name))]
pub async fn import_file(
    client: &ExchangeClient,
    session: &Session,
    job: &FileJob,
    max_polls: Option<u32>,
) -> Result<usize> {
    let mut polls = 0usize;
    loop {
        let resp = client
            .send(
                ExchangeRequest::new(protocol::MODE_IMPORT)
                    .with_session(session)
                    .with_filename(&job.server_visible_name),
            )
            .await?;
        polls += 1;

        match resp.status {
            Status::Success => {
                info!("Imported {} after {} request(s)", job.server_visible_name, polls);
                return Ok(polls);
            }
            Status::Fail => {
                return Err(ExchangeError::Import {
                    filename: job.server_visible_name.clone(),
                    message: resp.message().to_string(),
                });
            }
            Status::Progress => {
                if let Some(cap) = max_polls {
                    if polls >= cap as usize {
                        return Err(ExchangeError::Import {
                            filename: job.server_visible_name.clone(),
                            message: format!(
                                "still in progress after {} requests: {}",
                                polls,
                                resp.message()
                            ),
                        });
                    }
                }
            }
        }
    }
}

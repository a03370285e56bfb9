//! Run orchestration for one exchange session
//!
//! A run moves strictly forward through
//! `Start → Authenticated → PolicyNegotiated → Uploaded → Imported → Done`
//! and drops to `Failed` from any state on the first error. There is no
//! partial success: either every file is imported or the run fails. Nothing
//! the server already accepted is rolled back.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::ClientConfig;
use crate::errors::{ExchangeError, Result};
use crate::exchange::{
    authenticate, import_all, negotiate_transfer, upload_all, Credentials, ExchangeClient,
    FileJob, ImportSummary, TransferPolicy, TransferSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Start,
    Authenticated,
    PolicyNegotiated,
    Uploaded,
    Imported,
    Done,
    Failed,
}

/// Everything a run needs that comes from the caller
#[derive(Debug, Clone)]
pub struct RunContext {
    pub endpoint: String,
    pub exchange_type: String,
    pub credentials: Credentials,
    pub jobs: Vec<FileJob>,
}

impl RunContext {
    /// Build the context, checking every input file before any network traffic
    pub fn new(
        endpoint: impl Into<String>,
        exchange_type: impl Into<String>,
        credentials: Credentials,
        files: &[PathBuf],
    ) -> Result<Self> {
        if files.is_empty() {
            return Err(ExchangeError::file_access("<none>", "no input files given"));
        }

        let jobs = files
            .iter()
            .map(|path| {
                let job = FileJob::from_path(path)?;
                job.check_readable()?;
                Ok(job)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            endpoint: endpoint.into(),
            exchange_type: exchange_type.into(),
            credentials,
            jobs,
        })
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub policy: TransferPolicy,
    pub transfer: TransferSummary,
    pub import: ImportSummary,
}

pub struct ExchangeRunner {
    context: RunContext,
    config: ClientConfig,
    state: RunState,
}

impl ExchangeRunner {
    pub fn new(context: RunContext, config: ClientConfig) -> Self {
        Self {
            context,
            config,
            state: RunState::Start,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the whole session. Consumes the runner's single lifecycle:
    /// a finished or failed runner stays in its terminal state.
    pub async fn run(&mut self) -> Result<RunReport> {
        if self.state != RunState::Start {
            return Err(ExchangeError::policy(format!(
                "run already finished in state {:?}",
                self.state
            )));
        }

        info!(
            "Starting exchange with {} (type {}, {} file(s))",
            self.context.endpoint,
            self.context.exchange_type,
            self.context.jobs.len()
        );

        match self.run_stages().await {
            Ok(report) => {
                self.advance(RunState::Done);
                Ok(report)
            }
            Err(e) => {
                self.advance(RunState::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<RunReport> {
        let client = ExchangeClient::new(
            &self.context.endpoint,
            &self.context.exchange_type,
            &self.config,
        )?;

        let session = authenticate(&client, &self.context.credentials).await?;
        self.advance(RunState::Authenticated);

        let policy = negotiate_transfer(&client, &session).await?;
        self.advance(RunState::PolicyNegotiated);

        let transfer = upload_all(
            &client,
            &session,
            &self.context.jobs,
            &policy,
            self.config.archive_dir.as_deref(),
        )
        .await?;
        self.advance(RunState::Uploaded);

        // Archive or not, the server imports each input file by its own name
        let import = import_all(
            &client,
            &session,
            &self.context.jobs,
            self.config.max_import_polls,
        )
        .await?;
        self.advance(RunState::Imported);

        Ok(RunReport {
            policy,
            transfer,
            import,
        })
    }

    fn advance(&mut self, next: RunState) {
        info!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

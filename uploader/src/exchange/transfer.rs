use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

use super::archive;
use super::client::{ExchangeClient, ExchangeRequest};
use super::session::{Session, TransferPolicy};
use crate::constants::protocol;
use crate::errors::{ExchangeError, Result};

/// A local file and the name the server knows it by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub source_path: PathBuf,
    pub server_visible_name: String,
}

impl FileJob {
    /// Job named after the base name of `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let source_path = path.into();
        let server_visible_name = source_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ExchangeError::file_access(
                    source_path.display().to_string(),
                    "path has no usable file name",
                )
            })?;
        Ok(Self {
            source_path,
            server_visible_name,
        })
    }

    pub fn with_name(path: impl Into<PathBuf>, name: String) -> Self {
        Self {
            source_path: path.into(),
            server_visible_name: name,
        }
    }

    /// Fail early if the source is not a readable regular file
    pub fn check_readable(&self) -> Result<()> {
        let display = self.source_path.display().to_string();
        let metadata = std::fs::metadata(&self.source_path)
            .map_err(|e| ExchangeError::file_access(display.clone(), e))?;
        if !metadata.is_file() {
            return Err(ExchangeError::file_access(display, "not a regular file"));
        }
        std::fs::File::open(&self.source_path)
            .map_err(|e| ExchangeError::file_access(display, e))?;
        Ok(())
    }
}

/// Counters for one uploaded file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileUpload {
    pub chunks: usize,
    pub bytes: u64,
}

/// Counters for the whole upload phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub files: usize,
    pub chunks: usize,
    pub bytes: u64,
    pub archived: bool,
}

impl TransferSummary {
    fn add(&mut self, upload: FileUpload) {
        self.files += 1;
        self.chunks += upload.chunks;
        self.bytes += upload.bytes;
    }
}

/// Upload every job, packed into one archive when the policy asks for it.
pub async fn upload_all(
    client: &ExchangeClient,
    session: &Session,
    jobs: &[FileJob],
    policy: &TransferPolicy,
    archive_dir: Option<&Path>,
) -> Result<TransferSummary> {
    let mut summary = TransferSummary {
        archived: policy.use_archive,
        ..Default::default()
    };

    if policy.use_archive {
        let packed = archive::build_archive(jobs, archive_dir).await?;
        let upload =
            upload_single_file(client, session, packed.job(), policy.chunk_size_bytes).await;
        packed.remove();
        summary.add(upload?);
    } else {
        for job in jobs {
            let upload = upload_single_file(client, session, job, policy.chunk_size_bytes).await?;
            summary.add(upload);
        }
    }

    info!(
        "Upload finished: {} file(s), {} chunk(s), {} bytes",
        summary.files, summary.chunks, summary.bytes
    );
    Ok(summary)
}

/// Send one file as consecutive `file` requests of at most `chunk_size` bytes.
///
/// An empty file still produces exactly one request with an empty body.
/// The first refused chunk stops the upload; what the server already
/// received stays there.
#[instrument(skip(client, session, job), fields(file = %job.server_visible_name))]
pub async fn upload_single_file(
    client: &ExchangeClient,
    session: &Session,
    job: &FileJob,
    chunk_size: usize,
) -> Result<FileUpload> {
    let chunk_size = chunk_size.max(1);
    let source = job.source_path.display().to_string();

    let mut file = File::open(&job.source_path)
        .await
        .map_err(|e| ExchangeError::file_access(source.clone(), e))?;

    let mut upload = FileUpload::default();
    loop {
        let chunk = read_chunk(&mut file, chunk_size)
            .await
            .map_err(|e| ExchangeError::file_access(source.clone(), e))?;

        if chunk.is_empty() && upload.chunks > 0 {
            break;
        }
        let len = chunk.len();

        let resp = client
            .send(
                ExchangeRequest::new(protocol::MODE_FILE)
                    .with_session(session)
                    .with_filename(&job.server_visible_name)
                    .with_body(chunk),
            )
            .await?;

        if !resp.status.is_success() {
            return Err(ExchangeError::Transfer {
                filename: job.server_visible_name.clone(),
                message: resp.message().to_string(),
            });
        }

        upload.chunks += 1;
        upload.bytes += len as u64;

        if len < chunk_size {
            break;
        }
    }

    info!(
        "Uploaded {} in {} chunk(s), {} bytes",
        job.server_visible_name, upload.chunks, upload.bytes
    );
    Ok(upload)
}

/// Read up to `limit` bytes; shorter only at end of file
async fn read_chunk(file: &mut File, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    file.take(limit as u64).read_to_end(&mut buf).await?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_job_uses_base_name() {
        let job = FileJob::from_path("/var/exchange/in/import.xml").unwrap();
        assert_eq!(job.server_visible_name, "import.xml");
        assert_eq!(job.source_path, PathBuf::from("/var/exchange/in/import.xml"));
    }

    #[test]
    fn test_check_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offers.xml");
        std::fs::write(&path, b"<offers/>").unwrap();

        assert!(FileJob::from_path(&path).unwrap().check_readable().is_ok());

        let missing = FileJob::from_path(dir.path().join("missing.xml")).unwrap();
        assert!(matches!(
            missing.check_readable(),
            Err(ExchangeError::FileAccess { .. })
        ));

        let directory = FileJob::with_name(dir.path(), "dir".to_string());
        assert!(matches!(
            directory.check_readable(),
            Err(ExchangeError::FileAccess { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_chunk_sizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![7u8; 25]).unwrap();

        let mut file = File::open(&path).await.unwrap();
        let mut sizes = Vec::new();
        loop {
            let chunk = read_chunk(&mut file, 10).await.unwrap();
            if chunk.is_empty() {
                break;
            }
            sizes.push(chunk.len());
        }
        assert_eq!(sizes, vec![10, 10, 5]);
    }
}

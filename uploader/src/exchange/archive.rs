//! Zip packaging of the input files for servers that accept archives.
//!
//! The archive lives in a named temp file owned by [`PackagedArchive`]; the
//! file is removed when the archive is dropped or explicitly removed.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::transfer::FileJob;
use crate::constants::transfer;
use crate::errors::{ExchangeError, Result};

#[derive(Debug)]
pub struct PackagedArchive {
    temp: NamedTempFile,
    job: FileJob,
    entries: usize,
}

impl PackagedArchive {
    /// Upload job pointing at the temp file under its generated name
    pub fn job(&self) -> &FileJob {
        &self.job
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Delete the temp file now instead of waiting for drop
    pub fn remove(self) {
        let path = self.temp.path().to_path_buf();
        if let Err(e) = self.temp.close() {
            warn!("Failed to remove temporary archive {}: {}", path.display(), e);
        }
    }
}

/// Unique server-visible archive name
pub fn generate_archive_name() -> String {
    format!(
        "{}{}{}",
        transfer::ARCHIVE_NAME_PREFIX,
        Uuid::new_v4().simple(),
        transfer::ARCHIVE_SUFFIX
    )
}

/// Pack every job into one zip, each entry keyed by its base name.
///
/// Jobs sharing a name collapse into one entry; the last one listed wins.
pub async fn build_archive(jobs: &[FileJob], dir: Option<&Path>) -> Result<PackagedArchive> {
    let jobs = jobs.to_vec();
    let dir = dir.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || build_archive_blocking(&jobs, dir))
        .await
        .map_err(|e| ExchangeError::file_access("archive", e))?
}

fn build_archive_blocking(jobs: &[FileJob], dir: Option<PathBuf>) -> Result<PackagedArchive> {
    let temp = match &dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| ExchangeError::file_access("temporary archive", e))?;

    let archive_path = temp.path().display().to_string();
    let zip_err = |e: zip::result::ZipError| ExchangeError::file_access(archive_path.clone(), e);

    let mut zip = ZipWriter::new(temp.as_file());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let packed = unique_by_name(jobs);
    for job in &packed {
        let mut source = std::fs::File::open(&job.source_path)
            .map_err(|e| ExchangeError::file_access(job.source_path.display().to_string(), e))?;

        zip.start_file(job.server_visible_name.as_str(), options)
            .map_err(zip_err)?;
        io::copy(&mut source, &mut zip)
            .map_err(|e| ExchangeError::file_access(job.source_path.display().to_string(), e))?;
    }

    let mut file = zip.finish().map_err(zip_err)?;
    file.flush()
        .map_err(|e| ExchangeError::file_access(archive_path.clone(), e))?;

    let name = generate_archive_name();
    info!(
        "Packed {} files into {} ({})",
        packed.len(),
        name,
        archive_path
    );

    let job = FileJob::with_name(temp.path(), name);
    Ok(PackagedArchive {
        temp,
        job,
        entries: packed.len(),
    })
}

/// Drop every job whose name reappears later in the list, keeping order
fn unique_by_name(jobs: &[FileJob]) -> Vec<&FileJob> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(jobs.len());
    for job in jobs.iter().rev() {
        if seen.insert(job.server_visible_name.as_str()) {
            kept.push(job);
        } else {
            warn!(
                "{} replaced in archive by a later file with the same name",
                job.source_path.display()
            );
        }
    }
    kept.reverse();
    kept
}

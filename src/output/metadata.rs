//! Information about a run, the program and the platform, written to `metadata.toml`.
use anyhow::{Context, Result};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build-time information written by `built`
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    program: ProgramMetadata,
    platform: PlatformMetadata,
}

/// Information about the run
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// Path to the dataset which was loaded
    dataset_path: &'a Path,
    /// When the run started
    datetime: String,
    /// Number of tracts in the dataset
    tract_count: usize,
}

/// Information about the program build
#[derive(Serialize)]
struct ProgramMetadata {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    is_debug: bool,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    /// Short commit hash, with a `-dirty` suffix for uncommitted changes
    git_commit_hash: String,
}

impl ProgramMetadata {
    fn current() -> Self {
        let git_commit_hash = match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("{hash}-dirty"),
            (Some(hash), _) => hash.to_string(),
            (None, _) => "unknown".to_string(),
        };

        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash,
        }
    }
}

/// The operating system and machine the program ran on, as reported by `uname`
#[derive(Serialize)]
struct PlatformMetadata {
    os: String,
    kernel: String,
    release: String,
    machine: String,
    hostname: String,
}

impl PlatformMetadata {
    fn current() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow::anyhow!("{err}"))
            .context("Unable to determine platform info")?;
        let text = |s: &OsStr| s.to_string_lossy().into_owned();

        Ok(Self {
            os: text(info.osname()),
            kernel: text(info.sysname()),
            release: text(info.release()),
            machine: text(info.machine()),
            hostname: text(info.nodename()),
        })
    }
}

/// Write metadata for a run on the dataset at `dataset_path` to the output folder
pub fn write_metadata(output_path: &Path, dataset_path: &Path, tract_count: usize) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata {
            dataset_path,
            datetime: Local::now().to_rfc2822(),
            tract_count,
        },
        program: ProgramMetadata::current(),
        platform: PlatformMetadata::current()?,
    };
    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_metadata() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), Path::new("demos/fairbanks"), 12).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let metadata: toml::Table = toml::from_str(&contents).unwrap();
        assert_eq!(metadata["run"]["dataset_path"].as_str(), Some("demos/fairbanks"));
        assert_eq!(metadata["run"]["tract_count"].as_integer(), Some(12));
        assert_eq!(
            metadata["program"]["name"].as_str(),
            Some(env!("CARGO_PKG_NAME"))
        );
        assert!(metadata["platform"].get("os").is_some());
    }
}

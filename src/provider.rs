/*!
 * Snapshot delivery
 *
 * The extraction pipeline only runs once a snapshot has been delivered. A
 * provider that does not deliver within the caller's timeout fails with
 * `ProviderError::Timeout` and the pipeline is never invoked.
 */

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::types::CapturedPage;

/// Default time allowed for a snapshot to arrive
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while obtaining a snapshot
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The snapshot did not arrive in time
    #[error("Snapshot not delivered within {0:?}")]
    Timeout(Duration),

    /// The provider stopped without delivering
    #[error("Snapshot unavailable: {0}")]
    Unavailable(String),

    /// IO error while reading the snapshot
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot could not be decoded
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something that can deliver an accessibility snapshot on request
pub trait SnapshotProvider {
    /// Request one snapshot, waiting at most `timeout` for it
    fn request_snapshot(&self, timeout: Duration) -> Result<CapturedPage, ProviderError>;
}

/// An already captured page delivers itself immediately
impl SnapshotProvider for CapturedPage {
    fn request_snapshot(&self, _timeout: Duration) -> Result<CapturedPage, ProviderError> {
        Ok(self.clone())
    }
}

/// Where a serialized snapshot is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Standard input
    Stdin,
    /// A JSON file
    File(PathBuf),
}

impl SnapshotSource {
    /// Interpret a command-line argument; `-` means stdin
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Read and decode the snapshot
    pub fn load(&self) -> Result<CapturedPage, ProviderError> {
        match self {
            Self::Stdin => Self::decode(io::stdin().lock()),
            Self::File(path) => Self::decode(BufReader::new(File::open(path)?)),
        }
    }

    fn decode<R: Read>(reader: R) -> Result<CapturedPage, ProviderError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads snapshots from a [`SnapshotSource`] on a worker thread
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    source: SnapshotSource,
}

impl FileSnapshotProvider {
    /// Create a provider for a source
    pub fn new(source: SnapshotSource) -> Self {
        Self { source }
    }

    /// The source this provider reads from
    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }
}

impl SnapshotProvider for FileSnapshotProvider {
    fn request_snapshot(&self, timeout: Duration) -> Result<CapturedPage, ProviderError> {
        let (tx, rx) = mpsc::channel();
        let source = self.source.clone();

        debug!("Requesting snapshot from {} (timeout {:?})", self.source, timeout);

        // The loader is detached; on timeout its late result is dropped
        thread::Builder::new()
            .name("snapshot-loader".to_string())
            .spawn(move || {
                let _ = tx.send(source.load());
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ProviderError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ProviderError::Unavailable(format!(
                "loader for {} exited without a result",
                self.source
            ))),
        }
    }
}

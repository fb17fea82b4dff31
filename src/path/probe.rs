use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Why an existence probe failed. Probe failures are row-local: the
/// classifier reports them as an `invalid` classification, never as a fatal
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Access to the path was denied.
    Denied(String),
    /// The path or its mount could not be reached.
    Unreachable(String),
    /// The probe exceeded the configured timeout.
    Timeout(u64),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Denied(msg) => write!(f, "access denied: {}", msg),
            ProbeError::Unreachable(msg) => write!(f, "unreachable: {}", msg),
            ProbeError::Timeout(secs) => write!(f, "probe timed out after {}s", secs),
        }
    }
}

/// Filesystem existence seam used by the path classifier.
///
/// One probe per candidate path; implementations must not write.
pub trait Probe {
    fn exists(&self, raw: &str) -> Result<bool, ProbeError>;

    /// Best-effort last-modified time of a path, in local time, for
    /// implementations that can read metadata.
    fn modified(&self, _raw: &str) -> Option<DateTime<Local>> {
        None
    }
}

/// Real filesystem probe. Inventory paths are recorded on foreign hosts, so
/// separators are normalised before touching the local filesystem.
#[derive(Debug, Clone)]
pub struct FsProbe {
    unc_enabled: bool,
}

impl FsProbe {
    pub fn new(unc_enabled: bool) -> Self {
        FsProbe { unc_enabled }
    }

    /// Backslash-separated paths are normalised to the local separator so
    /// Windows-recorded paths can be probed on any host.
    fn normalize(raw: &str) -> PathBuf {
        PathBuf::from(raw.replace('\\', "/"))
    }

    fn is_unc(raw: &str) -> bool {
        raw.starts_with("\\\\") || raw.starts_with("//")
    }
}

impl Probe for FsProbe {
    fn modified(&self, raw: &str) -> Option<DateTime<Local>> {
        let meta = std::fs::metadata(Self::normalize(raw)).ok()?;
        meta.modified().ok().map(DateTime::<Local>::from)
    }

    fn exists(&self, raw: &str) -> Result<bool, ProbeError> {
        if Self::is_unc(raw) && !self.unc_enabled {
            return Err(ProbeError::Unreachable(
                "UNC path probing is disabled".to_string(),
            ));
        }

        match std::fs::metadata(Self::normalize(raw)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(ProbeError::Denied(e.to_string()))
            }
            Err(e) => Err(ProbeError::Unreachable(e.to_string())),
        }
    }
}

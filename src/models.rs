use serde::{Deserialize, Serialize};

/// One inventory record: a discovered artifact on a host, paired with a CVE id.
///
/// Immutable once read from the table; a row's lifecycle is a single
/// classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRow {
    pub platform: Platform,
    pub raw_path: String,
    pub hostname: String,
    pub cve_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// Map a free-text platform name to a [`Platform`] using the configured
    /// set of Windows platform names.
    ///
    /// Names in `windows_names` match case-insensitively and exactly; any
    /// other name containing `linux` maps to [`Platform::Linux`].
    pub fn from_name(name: &str, windows_names: &[String]) -> Platform {
        let trimmed = name.trim();
        if windows_names
            .iter()
            .any(|w| w.trim().eq_ignore_ascii_case(trimmed))
        {
            return Platform::Windows;
        }
        if trimmed.to_lowercase().contains("linux") {
            return Platform::Linux;
        }
        Platform::Other
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
            Platform::Other => write!(f, "Other"),
        }
    }
}

/// Outcome of classifying one raw inventory path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    /// The path exists verbatim.
    Valid,
    /// Well-formed path with a recognised extension, but the file is absent.
    Missing,
    /// Empty/sentinel input, or the existence probe itself failed.
    Invalid,
    /// Unrepairable garbage.
    Malformed,
    /// Trailing garbage was discarded and the truncated path exists.
    Repaired,
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathStatus::Valid => write!(f, "valid"),
            PathStatus::Missing => write!(f, "missing"),
            PathStatus::Invalid => write!(f, "invalid"),
            PathStatus::Malformed => write!(f, "malformed"),
            PathStatus::Repaired => write!(f, "repaired"),
        }
    }
}

/// Produced fresh per row by the path classifier; never cached across rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathClassification {
    pub status: PathStatus,
    pub resolved_path: Option<String>,
    pub repair_note: Option<String>,
}

impl PathClassification {
    pub fn resolved(&self) -> bool {
        matches!(self.status, PathStatus::Valid | PathStatus::Repaired)
    }
}

/// File kind derived from the resolved path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Archive,
    Executable,
    Other,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Archive => write!(f, "archive"),
            FileKind::Executable => write!(f, "executable"),
            FileKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateReason {
    NotApplicablePlatform,
    FileKindUnsupported,
    PathUnresolved,
    Eligible,
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateReason::NotApplicablePlatform => write!(f, "not applicable platform"),
            GateReason::FileKindUnsupported => write!(f, "file kind unsupported"),
            GateReason::PathUnresolved => write!(f, "path unresolved"),
            GateReason::Eligible => write!(f, "eligible"),
        }
    }
}

/// Whether the expensive, format-specific version extraction should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionExtractionDecision {
    pub attempt: bool,
    pub reason: GateReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeblogicFlag {
    Y,
    N,
}

impl std::fmt::Display for WeblogicFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeblogicFlag::Y => write!(f, "Y"),
            WeblogicFlag::N => write!(f, "N"),
        }
    }
}

/// One CVE advisory record read from the CVE table.
///
/// Zero or more [`InventoryRow`]s may share this record's `id`; that is a
/// lookup relation only, the record owns no inventory rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CveRecord {
    pub id: String,
    pub description: String,
    pub references: String,
    pub affected_software: String,
}

/// Per-row classification result, written back to the inventory table and
/// rendered in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    /// Zero-based index into the inventory table.
    pub row: usize,
    pub hostname: String,
    pub cve_id: String,
    pub platform: Platform,
    pub raw_path: String,
    pub classification: PathClassification,
    pub file_kind: FileKind,
    pub decision: VersionExtractionDecision,
    /// RFC 3339 last-modified time of the resolved file, when readable.
    pub modified: Option<String>,
}

/// Per-record CVE classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CveOutcome {
    /// Zero-based index into the CVE table.
    pub row: usize,
    pub cve_id: String,
    pub flag: WeblogicFlag,
    pub signal: Option<String>,
    pub advisories: Vec<String>,
}

/// Everything a single run produced, in table order. Serialized as the JSON
/// report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub inventory: Vec<RowOutcome>,
    pub cves: Vec<CveOutcome>,
    pub skipped_host: usize,
}

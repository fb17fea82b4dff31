use crate::models::{
    FileKind, GateReason, PathClassification, Platform, VersionExtractionDecision,
};

/// Derive the file kind from a path's extension (case-insensitive).
pub fn file_kind_of(path: &str) -> FileKind {
    let last_segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let ext = match last_segment.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return FileKind::Other,
    };
    match ext.as_str() {
        "jar" | "war" | "ear" => FileKind::Archive,
        "exe" | "dll" => FileKind::Executable,
        _ => FileKind::Other,
    }
}

/// Decide whether version extraction should be attempted for a classified row.
///
/// Version extraction is expensive and format-specific; this gate skips
/// unreachable paths, binaries the declared host platform cannot run, and
/// formats nothing downstream knows how to parse. Rules are ordered, first
/// match wins.
pub fn decide(
    platform: Platform,
    file_kind: FileKind,
    classification: &PathClassification,
) -> VersionExtractionDecision {
    if !classification.resolved() {
        return VersionExtractionDecision {
            attempt: false,
            reason: GateReason::PathUnresolved,
        };
    }

    if file_kind == FileKind::Executable && platform != Platform::Windows {
        return VersionExtractionDecision {
            attempt: false,
            reason: GateReason::NotApplicablePlatform,
        };
    }

    if file_kind == FileKind::Other {
        return VersionExtractionDecision {
            attempt: false,
            reason: GateReason::FileKindUnsupported,
        };
    }

    VersionExtractionDecision {
        attempt: true,
        reason: GateReason::Eligible,
    }
}

use crate::models::{PathClassification, PathStatus, Platform};
use crate::path::probe::Probe;

/// Sentinel recorded by inventory exports when no path was captured.
const PATH_SENTINEL: &str = "N/A";

/// Extensions considered a plausible artifact suffix during repair and for
/// the missing-vs-malformed distinction.
const BINARY_EXTENSIONS: &[&str] = &["jar", "war", "ear", "zip", "exe", "dll", "so", "bin"];

/// Classify one raw inventory path against the declared platform.
///
/// Deterministic and idempotent for a fixed (platform, path, filesystem
/// state). Probe failures become an `invalid` classification with the error
/// captured in `repair_note`; a bad row never aborts the batch.
pub fn classify<P: Probe>(
    platform: Platform,
    raw_path: &str,
    probe: &P,
    repair_enabled: bool,
) -> PathClassification {
    let trimmed = raw_path.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PATH_SENTINEL) {
        return PathClassification {
            status: PathStatus::Invalid,
            resolved_path: None,
            repair_note: None,
        };
    }

    match probe.exists(trimmed) {
        Ok(true) => {
            return PathClassification {
                status: PathStatus::Valid,
                resolved_path: Some(trimmed.to_string()),
                repair_note: None,
            };
        }
        Ok(false) => {}
        Err(e) => return probe_failure(e.to_string()),
    }

    if repair_enabled {
        if let Some(result) = try_repair(trimmed, probe) {
            return result;
        }
    }

    if well_formed(platform, trimmed) && has_binary_extension(trimmed) {
        PathClassification {
            status: PathStatus::Missing,
            resolved_path: None,
            repair_note: None,
        }
    } else {
        PathClassification {
            status: PathStatus::Malformed,
            resolved_path: None,
            repair_note: None,
        }
    }
}

/// Heuristic repair: discard trailing whitespace-delimited garbage and keep
/// the longest prefix that ends in a plausible extension and exists.
///
/// Returns `None` when no candidate exists; the caller then decides between
/// missing and malformed.
fn try_repair<P: Probe>(trimmed: &str, probe: &P) -> Option<PathClassification> {
    let mut cut = trimmed.len();
    while let Some(idx) = trimmed[..cut].rfind(char::is_whitespace) {
        cut = idx;
        let candidate = trimmed[..idx].trim_end();
        if candidate.is_empty() {
            break;
        }
        if !has_binary_extension(candidate) {
            continue;
        }
        match probe.exists(candidate) {
            Ok(true) => {
                let discarded = trimmed[idx..].trim_start();
                return Some(PathClassification {
                    status: PathStatus::Repaired,
                    resolved_path: Some(candidate.to_string()),
                    repair_note: Some(format!("discarded trailing {:?}", discarded)),
                });
            }
            Ok(false) => continue,
            Err(e) => return Some(probe_failure(e.to_string())),
        }
    }
    None
}

fn probe_failure(note: String) -> PathClassification {
    PathClassification {
        status: PathStatus::Invalid,
        resolved_path: None,
        repair_note: Some(note),
    }
}

/// Whether the path ends in a recognised artifact extension (case-insensitive).
fn has_binary_extension(path: &str) -> bool {
    let last_segment = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Syntactic well-formedness of an absolute path for the declared platform.
fn well_formed(platform: Platform, path: &str) -> bool {
    match platform {
        Platform::Windows => windows_form(path),
        Platform::Linux => linux_form(path),
        // Declared platform is neither; accept either convention.
        Platform::Other => windows_form(path) || linux_form(path),
    }
}

/// Drive-letter (`C:\` / `C:/`) or UNC (`\\server\share`) form.
fn windows_form(path: &str) -> bool {
    if path.starts_with("\\\\") {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() > 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

fn linux_form(path: &str) -> bool {
    path.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::probe::{FsProbe, ProbeError};
    use std::collections::HashSet;

    /// Probe over a fixed set of existing paths.
    struct FakeProbe {
        existing: HashSet<String>,
        error: Option<ProbeError>,
    }

    impl FakeProbe {
        fn with(paths: &[&str]) -> Self {
            FakeProbe {
                existing: paths.iter().map(|p| p.to_string()).collect(),
                error: None,
            }
        }

        fn failing(error: ProbeError) -> Self {
            FakeProbe {
                existing: HashSet::new(),
                error: Some(error),
            }
        }
    }

    impl Probe for FakeProbe {
        fn exists(&self, raw: &str) -> Result<bool, ProbeError> {
            if let Some(e) = &self.error {
                return Err(e.clone());
            }
            Ok(self.existing.contains(raw))
        }
    }

    /// Probe that must never be consulted.
    struct PanicProbe;

    impl Probe for PanicProbe {
        fn exists(&self, raw: &str) -> Result<bool, ProbeError> {
            panic!("probe called for {:?}", raw);
        }
    }

    #[test]
    fn test_empty_and_sentinel_invalid_without_probe() {
        for platform in [Platform::Windows, Platform::Linux, Platform::Other] {
            for raw in ["", "   ", "N/A", "n/a", " N/A "] {
                let c = classify(platform, raw, &PanicProbe, true);
                assert_eq!(c.status, PathStatus::Invalid, "{:?} on {}", raw, platform);
                assert_eq!(c.resolved_path, None);
            }
        }
    }

    #[test]
    fn test_existing_path_is_valid_never_repaired() {
        let probe = FakeProbe::with(&["/opt/tomcat/lib/catalina.jar"]);
        let c = classify(Platform::Linux, "/opt/tomcat/lib/catalina.jar", &probe, true);
        assert_eq!(c.status, PathStatus::Valid);
        assert_eq!(
            c.resolved_path.as_deref(),
            Some("/opt/tomcat/lib/catalina.jar")
        );
        assert_eq!(c.repair_note, None);
    }

    #[test]
    fn test_windows_path_valid() {
        let raw = r"C:\Oracle\Middleware\wlserver\server\lib\weblogic.jar";
        let probe = FakeProbe::with(&[raw]);
        let c = classify(Platform::Windows, raw, &probe, true);
        assert_eq!(c.status, PathStatus::Valid);
    }

    #[test]
    fn test_trailing_garbage_repaired() {
        let jar = "/opt/oracle/middleware/wlserver/server/lib/weblogic.jar";
        let probe = FakeProbe::with(&[jar]);
        let raw = format!("{} extra_garbage_data", jar);
        let c = classify(Platform::Linux, &raw, &probe, true);
        assert_eq!(c.status, PathStatus::Repaired);
        assert_eq!(c.resolved_path.as_deref(), Some(jar));
        assert!(c.repair_note.unwrap().contains("extra_garbage_data"));
    }

    #[test]
    fn test_repair_discards_multiple_tokens() {
        let jar = "/usr/share/java/log4j-core-2.14.1.jar";
        let probe = FakeProbe::with(&[jar]);
        let raw = format!("{} some trailing junk", jar);
        let c = classify(Platform::Linux, &raw, &probe, true);
        assert_eq!(c.status, PathStatus::Repaired);
        assert_eq!(c.resolved_path.as_deref(), Some(jar));
    }

    #[test]
    fn test_repair_prefers_longest_existing_prefix() {
        // Both the spaced path and its shorter prefix exist; the longer one wins.
        let long = "/srv/apps/release candidate.jar";
        let short = "/srv/apps/release";
        let probe = FakeProbe::with(&[long, short]);
        let raw = format!("{} junk", long);
        let c = classify(Platform::Linux, &raw, &probe, true);
        assert_eq!(c.status, PathStatus::Repaired);
        assert_eq!(c.resolved_path.as_deref(), Some(long));
    }

    #[test]
    fn test_repair_disabled_garbage_stays_malformed() {
        let jar = "/opt/lib/app.jar";
        let probe = FakeProbe::with(&[jar]);
        let raw = format!("{} garbage", jar);
        let c = classify(Platform::Linux, &raw, &probe, false);
        assert_eq!(c.status, PathStatus::Malformed);
    }

    #[test]
    fn test_absent_well_formed_path_missing() {
        let probe = FakeProbe::with(&[]);
        let c = classify(
            Platform::Linux,
            "/invalid/path/does/not/exist.jar",
            &probe,
            true,
        );
        assert_eq!(c.status, PathStatus::Missing);
        assert_eq!(c.resolved_path, None);
    }

    #[test]
    fn test_absent_path_without_extension_malformed() {
        let probe = FakeProbe::with(&[]);
        let c = classify(Platform::Linux, "/usr/bin/curl", &probe, true);
        assert_eq!(c.status, PathStatus::Malformed);
    }

    #[test]
    fn test_relative_path_malformed() {
        let probe = FakeProbe::with(&[]);
        let c = classify(Platform::Linux, "lib/app.jar", &probe, true);
        assert_eq!(c.status, PathStatus::Malformed);
    }

    #[test]
    fn test_probe_failure_invalid_with_note() {
        let probe = FakeProbe::failing(ProbeError::Denied("permission denied".to_string()));
        let c = classify(Platform::Linux, "/root/secret.jar", &probe, true);
        assert_eq!(c.status, PathStatus::Invalid);
        assert!(c.repair_note.unwrap().contains("permission denied"));
    }

    #[test]
    fn test_idempotent() {
        let probe = FakeProbe::with(&["/opt/a.jar"]);
        let a = classify(Platform::Linux, "/opt/a.jar trailing", &probe, true);
        let b = classify(Platform::Linux, "/opt/a.jar trailing", &probe, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_windows_form_missing_vs_malformed() {
        let probe = FakeProbe::with(&[]);
        let c = classify(
            Platform::Windows,
            r"C:\Oracle\wlserver\server\lib\weblogic.jar",
            &probe,
            true,
        );
        assert_eq!(c.status, PathStatus::Missing);

        // Linux-form path declared as Windows is not well-formed for it.
        let c = classify(Platform::Windows, "/opt/lib/weblogic.jar", &probe, true);
        assert_eq!(c.status, PathStatus::Malformed);
    }

    #[test]
    fn test_real_filesystem_repair() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("weblogic.jar");
        std::fs::File::create(&jar).unwrap();

        let probe = FsProbe::new(false);
        let raw = format!("{} extra_garbage_data", jar.display());
        let c = classify(Platform::Linux, &raw, &probe, true);
        assert_eq!(c.status, PathStatus::Repaired);
        assert_eq!(c.resolved_path.as_deref(), Some(jar.to_str().unwrap()));
    }
}

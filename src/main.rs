//! `artifact-checkr` — classify inventoried artifact paths and cross-reference
//! CVE advisories, with WebLogic relevance detection.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Load the input workbook ([`source::Workbook`]); exit `2` if required
//!    inventory columns are missing.
//! 4. Scope inventory rows to the local hostname (unless `--all-hosts`).
//! 5. Classify each row's path and gate version extraction
//!    ([`path::classifier`], [`gate`]) in chunked worker batches with a
//!    bounded per-row probe timeout.
//! 6. Scan CVE records for Oracle advisories and WebLogic relevance
//!    ([`advisory`]).
//! 7. Write results back to named columns; `--output` saves the workbook.
//! 8. Render the requested report ([`report`]).
//!
//! Row-level failures are classifications, never fatal: the worst outcome for
//! any row is an `invalid`/`malformed` status, which is itself a reportable
//! result.

mod advisory;
mod cli;
mod config;
mod gate;
mod models;
mod path;
mod report;
mod source;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, ReportFormat};
use config::{load_config, Config};
use models::{
    CveOutcome, CveRecord, InventoryRow, PathClassification, PathStatus, Platform, RowOutcome,
    ScanReport,
};
use path::classifier;
use path::probe::{FsProbe, Probe, ProbeError};
use source::{
    Workbook, COL_FILE_EXISTS, COL_FILE_MOD_DATE, COL_FILE_STATUS, COL_ORACLE_ADVISORIES,
    COL_REPAIR_NOTE, COL_RESOLVED_PATH, COL_VERSION_EXTRACTION, COL_WEBLOGIC_FLAG,
    COL_WEBLOGIC_SIGNAL,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = cli
        .input
        .canonicalize()
        .unwrap_or_else(|_| cli.input.clone());
    let input_dir = input.parent().unwrap_or(Path::new("."));

    let config = load_config(input_dir, cli.config.as_deref())?;
    let mut workbook = Workbook::load(&input)?;

    // Validate required input columns; do not process or save if any are
    // missing
    let missing = missing_input_columns(&workbook, &config);
    if !missing.is_empty() {
        eprintln!("Required columns missing: {}", missing.join(", "));
        std::process::exit(2);
    }
    let inv_cols = &config.columns.inventory;

    if config.scan.duplicate_search_enabled && !cli.quiet {
        eprintln!(
            "  {} duplicate search is handled outside this tool; option ignored",
            "→".cyan()
        );
    }

    let local_host = cli.hostname.clone().unwrap_or_else(local_hostname);
    if !cli.quiet {
        eprintln!("  {} local hostname: {}", "→".cyan(), local_host);
    }

    // Scope rows to the local host
    let mut rows: Vec<(usize, InventoryRow)> = Vec::new();
    let mut skipped_host = 0usize;
    for i in 0..workbook.inventory.len() {
        let hostname = workbook.inventory.get(i, &inv_cols.hostname);
        if !cli.all_hosts && !hostname.eq_ignore_ascii_case(&local_host) {
            skipped_host += 1;
            continue;
        }
        let row = InventoryRow {
            platform: Platform::from_name(
                &workbook.inventory.get(i, &inv_cols.platform),
                &config.platform.windows,
            ),
            raw_path: workbook.inventory.get(i, &inv_cols.file_path),
            hostname,
            cve_id: workbook.inventory.get(i, &inv_cols.cve),
        };
        rows.push((i, row));
    }

    if !cli.quiet {
        eprintln!(
            "  {} {} inventory rows to classify, {} skipped (hostname mismatch)",
            "→".cyan(),
            rows.len(),
            skipped_host
        );
    }

    let probe = FsProbe::new(config.remote.unc_enabled);
    let outcomes = classify_rows(&rows, &config, probe, cli.quiet).await?;

    // CVE pipeline: cheap text scans, no probes
    let cve_cols = &config.columns.cve;
    let mut cve_outcomes: Vec<CveOutcome> = Vec::new();
    for i in 0..workbook.cves.len() {
        let record = CveRecord {
            id: workbook.cves.get(i, &cve_cols.id),
            description: workbook.cves.get(i, &cve_cols.description),
            references: workbook.cves.get(i, &cve_cols.references),
            affected_software: workbook.cves.get(i, &cve_cols.affected_software),
        };
        let advisories = advisory::scanner::extract_advisories(&record.references);
        let (flag, signal) = advisory::weblogic::classify(
            &record.description,
            &record.affected_software,
            &advisories,
        );
        cve_outcomes.push(CveOutcome {
            row: i,
            cve_id: record.id,
            flag,
            signal,
            advisories,
        });
    }

    // Write results back to named columns
    for outcome in &outcomes {
        let table = &mut workbook.inventory;
        let exists = if outcome.classification.resolved() { "Y" } else { "N" };
        table.set(outcome.row, COL_FILE_EXISTS, exists);
        table.set(
            outcome.row,
            COL_FILE_STATUS,
            &outcome.classification.status.to_string(),
        );
        table.set(
            outcome.row,
            COL_RESOLVED_PATH,
            outcome.classification.resolved_path.as_deref().unwrap_or(""),
        );
        table.set(
            outcome.row,
            COL_REPAIR_NOTE,
            outcome.classification.repair_note.as_deref().unwrap_or(""),
        );
        table.set(
            outcome.row,
            COL_FILE_MOD_DATE,
            outcome.modified.as_deref().unwrap_or(""),
        );
        table.set(
            outcome.row,
            COL_VERSION_EXTRACTION,
            &outcome.decision.reason.to_string(),
        );
    }
    for cve in &cve_outcomes {
        workbook.cves.set(cve.row, COL_WEBLOGIC_FLAG, &cve.flag.to_string());
        workbook.cves.set(
            cve.row,
            COL_WEBLOGIC_SIGNAL,
            cve.signal.as_deref().unwrap_or(""),
        );
        workbook
            .cves
            .set(cve.row, COL_ORACLE_ADVISORIES, &cve.advisories.join("; "));
    }

    let scan = ScanReport {
        inventory: outcomes,
        cves: cve_outcomes,
        skipped_host,
    };

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&scan, &input, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&scan)?);
        }
    }

    if let Some(output) = cli.output {
        workbook.save(&output)?;
        if !cli.quiet {
            eprintln!("  {} wrote {}", "→".cyan(), output.display());
        }
    }

    Ok(())
}

/// Names of configured input columns absent from the workbook. The CVE
/// table's columns are only required when a CVE table is present; a silently
/// empty read would flag every record `N`, so mismatches abort before any
/// row is processed.
fn missing_input_columns(workbook: &Workbook, config: &Config) -> Vec<String> {
    let inv = &config.columns.inventory;
    let mut missing: Vec<String> = workbook
        .inventory
        .missing_columns(&[
            inv.platform.as_str(),
            inv.file_path.as_str(),
            inv.hostname.as_str(),
            inv.cve.as_str(),
        ])
        .into_iter()
        .map(str::to_string)
        .collect();

    if !workbook.cves.is_empty() {
        let cve = &config.columns.cve;
        missing.extend(
            workbook
                .cves
                .missing_columns(&[
                    cve.id.as_str(),
                    cve.description.as_str(),
                    cve.references.as_str(),
                    cve.affected_software.as_str(),
                ])
                .into_iter()
                .map(str::to_string),
        );
    }

    missing
}

/// Classify inventory rows in chunked batches of blocking probe tasks, each
/// bounded by the configured timeout. A timed-out or panicked probe becomes
/// an `invalid` classification for that row only.
async fn classify_rows<P>(
    rows: &[(usize, InventoryRow)],
    config: &Config,
    probe: P,
    quiet: bool,
) -> Result<Vec<RowOutcome>>
where
    P: Probe + Clone + Send + 'static,
{
    use futures::future::join_all;

    const BATCH_SIZE: usize = 64;

    let repair = config.scan.invalid_path_detection;
    let timeout = Duration::from_secs(config.remote.unc_timeout);

    let pb = if !quiet {
        let pb = ProgressBar::new(rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut outcomes = Vec::with_capacity(rows.len());

    for batch in rows.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|(index, row)| {
                let index = *index;
                let row = row.clone();
                let probe = probe.clone();
                async move {
                    let fallback = row.clone();
                    let work = tokio::task::spawn_blocking(move || {
                        classify_one(index, row, &probe, repair)
                    });
                    match tokio::time::timeout(timeout, work).await {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(join_err)) => probe_failed_outcome(
                            index,
                            fallback,
                            format!("probe task failed: {}", join_err),
                        ),
                        Err(_) => probe_failed_outcome(
                            index,
                            fallback,
                            ProbeError::Timeout(timeout.as_secs()).to_string(),
                        ),
                    }
                }
            })
            .collect();

        for outcome in join_all(futures).await {
            outcomes.push(outcome);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(outcomes)
}

/// One row's full classification pass: path status, file kind, gate decision,
/// and best-effort modification time for resolved paths.
fn classify_one<P: Probe>(index: usize, row: InventoryRow, probe: &P, repair: bool) -> RowOutcome {
    let classification = classifier::classify(row.platform, &row.raw_path, probe, repair);

    let kind_source = classification
        .resolved_path
        .as_deref()
        .unwrap_or(row.raw_path.trim());
    let file_kind = gate::file_kind_of(kind_source);

    let decision = gate::decide(row.platform, file_kind, &classification);

    let modified = classification
        .resolved_path
        .as_deref()
        .and_then(|p| probe.modified(p))
        .map(|dt| dt.to_rfc3339());

    RowOutcome {
        row: index,
        hostname: row.hostname,
        cve_id: row.cve_id,
        platform: row.platform,
        raw_path: row.raw_path,
        classification,
        file_kind,
        decision,
        modified,
    }
}

fn probe_failed_outcome(index: usize, row: InventoryRow, note: String) -> RowOutcome {
    let classification = PathClassification {
        status: PathStatus::Invalid,
        resolved_path: None,
        repair_note: Some(note),
    };
    let file_kind = gate::file_kind_of(row.raw_path.trim());
    let decision = gate::decide(row.platform, file_kind, &classification);
    RowOutcome {
        row: index,
        hostname: row.hostname,
        cve_id: row.cve_id,
        platform: row.platform,
        raw_path: row.raw_path,
        classification,
        file_kind,
        decision,
        modified: None,
    }
}

/// Local hostname for row scoping: the OS hostname first, then the
/// `COMPUTERNAME`/`HOSTNAME` environment fallbacks. `HOSTNAME` is a shell
/// variable that is rarely exported, so the env vars alone are not enough.
fn local_hostname() -> String {
    if let Some(host) = os_hostname() {
        return host;
    }
    for key in ["COMPUTERNAME", "HOSTNAME"] {
        if let Ok(value) = std::env::var(key) {
            if !value.trim().is_empty() {
                return value.trim().to_string();
            }
        }
    }
    "UNKNOWN_HOST".to_string()
}

#[cfg(unix)]
fn os_hostname() -> Option<String> {
    use std::ffi::CStr;

    let mut buf = [0u8; 256];
    // SAFETY: buf outlives the call; the final byte is forced to NUL in case
    // gethostname truncated without terminating.
    let host = unsafe {
        if libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len() - 1) != 0 {
            return None;
        }
        buf[buf.len() - 1] = 0;
        CStr::from_ptr(buf.as_ptr() as *const libc::c_char)
            .to_str()
            .ok()?
            .trim()
            .to_string()
    };
    (!host.is_empty()).then_some(host)
}

#[cfg(not(unix))]
fn os_hostname() -> Option<String> {
    // COMPUTERNAME is always set on Windows; the env fallback covers it.
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classify_rows_is_row_local() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("app.jar");
        std::fs::File::create(&jar).unwrap();

        let rows = vec![
            (
                0,
                InventoryRow {
                    platform: Platform::Linux,
                    raw_path: jar.to_str().unwrap().to_string(),
                    hostname: "h".to_string(),
                    cve_id: "CVE-2024-0001".to_string(),
                },
            ),
            (
                1,
                InventoryRow {
                    platform: Platform::Linux,
                    raw_path: "N/A".to_string(),
                    hostname: "h".to_string(),
                    cve_id: "CVE-2024-0002".to_string(),
                },
            ),
            (
                2,
                InventoryRow {
                    platform: Platform::Linux,
                    raw_path: format!("{} trailing junk", jar.display()),
                    hostname: "h".to_string(),
                    cve_id: "CVE-2024-0003".to_string(),
                },
            ),
        ];

        let config = Config::default();
        let probe = FsProbe::new(false);
        let outcomes = classify_rows(&rows, &config, probe, true).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].classification.status, PathStatus::Valid);
        assert!(outcomes[0].decision.attempt);
        assert!(outcomes[0].modified.is_some());
        assert_eq!(outcomes[1].classification.status, PathStatus::Invalid);
        assert!(!outcomes[1].decision.attempt);
        assert_eq!(outcomes[2].classification.status, PathStatus::Repaired);
        assert_eq!(outcomes[2].file_kind, models::FileKind::Archive);
        assert!(outcomes[2].decision.attempt);
    }

    /// Probe that stalls on one path prefix and answers instantly elsewhere.
    #[derive(Clone)]
    struct StallProbe {
        slow_prefix: String,
        existing: String,
    }

    impl Probe for StallProbe {
        fn exists(&self, raw: &str) -> Result<bool, ProbeError> {
            if raw.starts_with(&self.slow_prefix) {
                std::thread::sleep(Duration::from_secs(3));
            }
            Ok(raw == self.existing)
        }
    }

    #[tokio::test]
    async fn test_probe_timeout_is_row_local() {
        let row = |path: &str, cve: &str| InventoryRow {
            platform: Platform::Linux,
            raw_path: path.to_string(),
            hostname: "h".to_string(),
            cve_id: cve.to_string(),
        };
        let rows = vec![
            (0, row("/opt/fast.jar", "CVE-2024-0005")),
            (1, row("/mnt/remote/slow.jar", "CVE-2024-0006")),
        ];
        let probe = StallProbe {
            slow_prefix: "/mnt/remote".to_string(),
            existing: "/opt/fast.jar".to_string(),
        };
        let mut config = Config::default();
        config.remote.unc_timeout = 1;

        let outcomes = classify_rows(&rows, &config, probe, true).await.unwrap();

        assert_eq!(outcomes[0].classification.status, PathStatus::Valid);
        assert!(outcomes[0].decision.attempt);
        assert_eq!(outcomes[1].classification.status, PathStatus::Invalid);
        assert!(!outcomes[1].decision.attempt);
        assert!(outcomes[1]
            .classification
            .repair_note
            .as_deref()
            .unwrap()
            .contains("timed out after 1s"));
    }

    #[test]
    fn test_missing_cve_columns_detected() {
        let workbook: Workbook = serde_json::from_str(
            r#"{
                "inventory": [
                    {"AFFECTED_PLATFORMS": "Linux", "XTRACT_PATH": "/opt/a.jar",
                     "HOSTNAME": "h", "CVE": "CVE-2020-14882"}
                ],
                "cves": [
                    {"CVE_ID": "CVE-2020-14882", "Summary": "Oracle WebLogic Server RCE",
                     "Links": "https://www.oracle.com/security-alerts/cpuoct2020.html",
                     "Product": "Oracle WebLogic Server 12.2.1.4"}
                ]
            }"#,
        )
        .unwrap();
        let config = Config::default();

        let missing = missing_input_columns(&workbook, &config);
        assert_eq!(
            missing,
            vec!["CveId", "Description", "References", "AffectedSoftware"]
        );
    }

    #[test]
    fn test_matching_columns_pass_validation() {
        let workbook: Workbook = serde_json::from_str(
            r#"{
                "inventory": [
                    {"AFFECTED_PLATFORMS": "Linux", "XTRACT_PATH": "/opt/a.jar",
                     "HOSTNAME": "h", "CVE": "CVE-2020-14882"}
                ],
                "cves": [
                    {"CveId": "CVE-2020-14882", "Description": "WebLogic RCE",
                     "References": "https://www.oracle.com/security-alerts/cpuoct2020.html",
                     "AffectedSoftware": "Oracle WebLogic Server 12.2.1.4"}
                ]
            }"#,
        )
        .unwrap();
        let config = Config::default();
        assert!(missing_input_columns(&workbook, &config).is_empty());
    }

    #[test]
    fn test_absent_cve_table_needs_no_cve_columns() {
        let workbook: Workbook = serde_json::from_str(
            r#"{
                "inventory": [
                    {"AFFECTED_PLATFORMS": "Linux", "XTRACT_PATH": "/opt/a.jar",
                     "HOSTNAME": "h", "CVE": "CVE-2024-0001"}
                ]
            }"#,
        )
        .unwrap();
        let config = Config::default();
        assert!(missing_input_columns(&workbook, &config).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_local_hostname_resolves_without_env() {
        // The OS query answers even when neither env var is exported.
        assert!(os_hostname().is_some());
        assert_ne!(local_hostname(), "UNKNOWN_HOST");
    }

    #[test]
    fn test_probe_failed_outcome_never_attempts() {
        let row = InventoryRow {
            platform: Platform::Windows,
            raw_path: r"\\fileserver\share\app.exe".to_string(),
            hostname: "h".to_string(),
            cve_id: "CVE-2024-0004".to_string(),
        };
        let outcome = probe_failed_outcome(7, row, ProbeError::Timeout(6).to_string());
        assert_eq!(outcome.row, 7);
        assert_eq!(outcome.classification.status, PathStatus::Invalid);
        assert!(!outcome.decision.attempt);
        assert!(outcome
            .classification
            .repair_note
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }
}

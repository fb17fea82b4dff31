use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{PathStatus, RowOutcome, ScanReport, WeblogicFlag};

/// Render a colored terminal report.
pub fn render(report: &ScanReport, path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = report.inventory.len();
    let count = |status: PathStatus| {
        report
            .inventory
            .iter()
            .filter(|o| o.classification.status == status)
            .count()
    };
    let valid = count(PathStatus::Valid);
    let repaired = count(PathStatus::Repaired);
    let missing = count(PathStatus::Missing);
    let invalid = count(PathStatus::Invalid);
    let malformed = count(PathStatus::Malformed);
    let eligible = report.inventory.iter().filter(|o| o.decision.attempt).count();

    let cve_total = report.cves.len();
    let weblogic = report
        .cves
        .iter()
        .filter(|c| c.flag == WeblogicFlag::Y)
        .count();
    let with_advisories = report.cves.iter().filter(|c| !c.advisories.is_empty()).count();

    if quiet {
        println!(
            "Rows: {}  Valid: {}  Repaired: {}  Missing: {}  Invalid: {}  Malformed: {}  Skipped: {}",
            total,
            valid.to_string().green(),
            repaired.to_string().cyan(),
            missing.to_string().yellow(),
            invalid.to_string().red(),
            malformed.to_string().red(),
            report.skipped_host,
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "artifact-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Input: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "INVENTORY".bold());
    println!(" │  {:<48} │", format!("Rows classified    : {}", total));
    println!(
        " │  {:<48} │",
        format!("Skipped (hostname) : {}", report.skipped_host)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Valid           : {:>4}", "✓".green(), valid)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Repaired        : {:>4}", "~".cyan(), repaired)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Missing         : {:>4}", "⚠".yellow(), missing)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Invalid         : {:>4}", "✗".red(), invalid)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Malformed       : {:>4}", "✗".red(), malformed)
    );
    println!(
        " │  {:<48} │",
        format!("Version-eligible   : {}", eligible)
    );
    println!(" │  {:<48} │", "CVE RECORDS".bold());
    println!(" │  {:<48} │", format!("Records scanned    : {}", cve_total));
    println!(
        " │  {:<48} │",
        format!("WebLogic-flagged   : {}", weblogic)
    );
    println!(
        " │  {:<48} │",
        format!("With advisories    : {}", with_advisories)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    // Problem rows first; valid rows only under --verbose
    let problems: Vec<&RowOutcome> = report
        .inventory
        .iter()
        .filter(|o| o.classification.status != PathStatus::Valid)
        .collect();

    if !problems.is_empty() {
        println!(
            " {} Rows requiring attention:\n",
            "[PATHS]".yellow().bold()
        );
        render_inventory_table(&problems);
        println!();
    }

    if verbose && valid > 0 {
        let valid_rows: Vec<&RowOutcome> = report
            .inventory
            .iter()
            .filter(|o| o.classification.status == PathStatus::Valid)
            .collect();
        println!(" {} Valid rows:\n", "[PASS]".green().bold());
        render_inventory_table(&valid_rows);
        println!();
    }

    if weblogic > 0 {
        println!(" {} WebLogic-relevant CVEs:\n", "[CVE]".red().bold());
        render_cve_table(report);
        println!();
    }

    Ok(())
}

fn render_inventory_table(outcomes: &[&RowOutcome]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Host").add_attribute(Attribute::Bold),
            Cell::new("CVE").add_attribute(Attribute::Bold),
            Cell::new("Platform").add_attribute(Attribute::Bold),
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Extraction").add_attribute(Attribute::Bold),
        ]);

    for outcome in outcomes {
        let status_color = match outcome.classification.status {
            PathStatus::Valid => Color::Green,
            PathStatus::Repaired => Color::Cyan,
            PathStatus::Missing => Color::Yellow,
            PathStatus::Invalid | PathStatus::Malformed => Color::Red,
        };

        let shown_path = outcome
            .classification
            .resolved_path
            .as_deref()
            .unwrap_or(&outcome.raw_path);

        table.add_row(vec![
            Cell::new(&outcome.hostname),
            Cell::new(&outcome.cve_id),
            Cell::new(outcome.platform.to_string()),
            Cell::new(shown_path),
            Cell::new(outcome.classification.status.to_string()).fg(status_color),
            Cell::new(outcome.file_kind.to_string()),
            Cell::new(outcome.decision.reason.to_string())
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn render_cve_table(report: &ScanReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("CVE").add_attribute(Attribute::Bold),
            Cell::new("Flag").add_attribute(Attribute::Bold),
            Cell::new("Signal").add_attribute(Attribute::Bold),
            Cell::new("Advisories").add_attribute(Attribute::Bold),
        ]);

    for cve in report.cves.iter().filter(|c| c.flag == WeblogicFlag::Y) {
        table.add_row(vec![
            Cell::new(&cve.cve_id),
            Cell::new(cve.flag.to_string())
                .fg(Color::Red)
                .set_alignment(CellAlignment::Center),
            Cell::new(cve.signal.as_deref().unwrap_or("")),
            Cell::new(cve.advisories.len().to_string()).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for analysis results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: summary table and filtered bar list for external tools
//! - **Markdown**: human-readable single-run reports and all-modes comparisons
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load. An unbounded profit factor is written as `inf` in
//! both JSON and CSV.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use seasonlab_core::domain::WeeklyBar;
use seasonlab_core::render::{fmt_percent, fmt_ratio, summary_row};
use seasonlab_core::table::SummaryColumn;
use seasonlab_core::{FilterMode, SummaryRow};

use crate::runner::{AnalysisResult, ModeComparison, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisResult` to pretty JSON.
pub fn export_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize AnalysisResult to JSON")
}

/// Deserialize an `AnalysisResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult =
        serde_json::from_str(json).context("failed to deserialize AnalysisResult from JSON")?;
    check_schema(result.schema_version)?;
    Ok(result)
}

/// Serialize a `ModeComparison` to pretty JSON.
pub fn export_comparison_json(cmp: &ModeComparison) -> Result<String> {
    serde_json::to_string_pretty(cmp).context("failed to serialize ModeComparison to JSON")
}

/// Deserialize a `ModeComparison`, rejecting unknown schema versions.
pub fn import_comparison_json(json: &str) -> Result<ModeComparison> {
    let cmp: ModeComparison =
        serde_json::from_str(json).context("failed to deserialize ModeComparison from JSON")?;
    check_schema(cmp.schema_version)?;
    for r in &cmp.results {
        check_schema(r.schema_version)?;
    }
    Ok(cmp)
}

fn check_schema(version: u32) -> Result<()> {
    if version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            version,
            SCHEMA_VERSION
        );
    }
    Ok(())
}

// ─── CSV export ─────────────────────────────────────────────────────

fn csv_float(v: f64) -> String {
    if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Export summary rows as CSV, one row per populated week.
///
/// Columns: week, count, wins, win_rate, avg_return, profit_factor,
/// sharpe_ratio, std_dev, max_return, min_return. Rates and returns are
/// fractions, not percentages.
pub fn export_summary_csv(rows: &[SummaryRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "week",
        "count",
        "wins",
        "win_rate",
        "avg_return",
        "profit_factor",
        "sharpe_ratio",
        "std_dev",
        "max_return",
        "min_return",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.week_number.to_string(),
            &r.count.to_string(),
            &r.wins.to_string(),
            &csv_float(r.win_rate),
            &csv_float(r.avg_return),
            &csv_float(r.profit_factor),
            &csv_float(r.sharpe_ratio),
            &csv_float(r.std_dev),
            &csv_float(r.max_return),
            &csv_float(r.min_return),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export bars as CSV with week, date, open, close and return columns.
pub fn export_bars_csv(bars: &[WeeklyBar]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["week", "date", "open", "close", "return"])?;
    for b in bars {
        wtr.write_record([
            &b.week_number.to_string(),
            &b.date.to_string(),
            &format!("{:.4}", b.open),
            &format!("{:.4}", b.close),
            &csv_float(b.weekly_return),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single analysis run.
///
/// Creates a directory named `{symbol}_{filter}_{timestamp}/` under
/// `output_dir` containing:
/// - `manifest.json` — the full `AnalysisResult`
/// - `summary.csv` — per-week statistics
/// - `bars.csv` — bars that survived the filter
/// - `report.md` — Markdown report
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &AnalysisResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}_{}",
        result.symbol,
        result.filter,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("summary.csv"), export_summary_csv(&result.summary)?)?;
    std::fs::write(run_dir.join("bars.csv"), export_bars_csv(&result.bars)?)?;
    std::fs::write(run_dir.join("report.md"), generate_report(result))?;

    Ok(run_dir)
}

/// Load an `AnalysisResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

/// Save an all-modes comparison as `comparison.json` + `comparison.md`.
pub fn save_comparison(cmp: &ModeComparison, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_compare_{}",
        cmp.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("comparison.json"), export_comparison_json(cmp)?)?;
    std::fs::write(run_dir.join("comparison.md"), generate_comparison(cmp))?;
    for r in &cmp.results {
        let name = format!("summary_{}.csv", r.filter);
        std::fs::write(run_dir.join(name), export_summary_csv(&r.summary)?)?;
    }

    Ok(run_dir)
}

// ─── Markdown reports ───────────────────────────────────────────────

fn push_summary_table(md: &mut String, rows: &[SummaryRow]) {
    let headers: Vec<&str> = SummaryColumn::ALL.iter().map(|c| c.header()).collect();
    md.push_str(&format!("| {} |\n", headers.join(" | ")));
    md.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
    for row in rows {
        md.push_str(&format!("| {} |\n", summary_row(row).cells.join(" | ")));
    }
}

/// Generate a Markdown report for a single analysis run.
pub fn generate_report(result: &AnalysisResult) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str(&format!("# Weekly Seasonality: {}\n\n", result.symbol));

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", result.symbol));
    md.push_str(&format!(
        "| Filter | {} ({}) |\n",
        result.filter.label(),
        result.filter
    ));
    if let (Some(first), Some(last)) = (result.first_date, result.last_date) {
        md.push_str(&format!("| Period | {first} to {last} |\n"));
    }
    md.push_str(&format!("| Source | {} |\n", result.source));
    md.push_str(&format!(
        "| Bars | {} of {} rows ({} after filter) |\n",
        result.bar_count, result.raw_count, result.filtered_count
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", result.dataset_hash));
    if result.has_synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    if !result.is_ready() {
        md.push_str(&format!("_{}_\n", result.status_message()));
        return md;
    }

    // Highlights
    md.push_str("## Highlights\n\n");
    if let Some(best) = result.best_week() {
        md.push_str(&format!(
            "- Best week: {} (avg {}, win rate {})\n",
            best.week_number,
            fmt_percent(best.avg_return, 2),
            fmt_percent(best.win_rate, 1)
        ));
    }
    if let Some(worst) = result.worst_week() {
        md.push_str(&format!(
            "- Worst week: {} (avg {}, win rate {})\n",
            worst.week_number,
            fmt_percent(worst.avg_return, 2),
            fmt_percent(worst.win_rate, 1)
        ));
    }
    if let Some(rate) = result.overall_win_rate() {
        md.push_str(&format!("- Overall win rate: {}\n", fmt_percent(rate, 1)));
    }
    md.push('\n');

    // Per-week statistics
    md.push_str("## Weekly Statistics\n\n");
    if let Some(sort) = result.sort {
        md.push_str(&format!(
            "Sorted by {} ({}).\n\n",
            sort.column,
            sort.direction.indicator()
        ));
    }
    push_summary_table(&mut md, &result.summary);
    md.push('\n');

    // Data Quality
    if !result.skipped.is_empty() || result.out_of_window > 0 {
        md.push_str("## Data Quality\n\n");
        for (reason, count) in &result.skipped {
            md.push_str(&format!("- Dropped {count} row(s): {reason}\n"));
        }
        if result.out_of_window > 0 {
            md.push_str(&format!(
                "- {} bar(s) outside the date window\n",
                result.out_of_window
            ));
        }
        md.push('\n');
    }

    md
}

/// Generate a Markdown comparison of every filter mode.
///
/// One row per week populated in any mode, showing count and average return
/// per mode; a mode with no bars in that week shows `-`.
pub fn generate_comparison(cmp: &ModeComparison) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str(&format!("# Filter Comparison: {}\n\n", cmp.symbol));
    md.push_str(&format!("Dataset hash: `{}`\n\n", cmp.dataset_hash));
    if cmp.has_synthetic {
        md.push_str("**SYNTHETIC DATA**\n\n");
    }

    // Overview
    md.push_str("## Overview\n\n");
    md.push_str("| Filter | Bars | Weeks | Win Rate | Status |\n");
    md.push_str("| --- | --- | --- | --- | --- |\n");
    for r in &cmp.results {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            r.filter,
            r.filtered_count,
            r.summary.len(),
            r.overall_win_rate()
                .map(|w| fmt_percent(w, 1))
                .unwrap_or_else(|| "-".into()),
            r.status_message()
        ));
    }
    md.push('\n');

    // Week by week
    let weeks: BTreeSet<u32> = cmp
        .results
        .iter()
        .flat_map(|r| r.summary.iter().map(|s| s.week_number))
        .collect();
    if weeks.is_empty() {
        return md;
    }

    md.push_str("## By Week\n\n");
    md.push_str("| Week |");
    for r in &cmp.results {
        md.push_str(&format!(" {} n | {} avg | {} PF |", r.filter, r.filter, r.filter));
    }
    md.push('\n');
    md.push('|');
    md.push_str(&" --- |".repeat(1 + 3 * cmp.results.len()));
    md.push('\n');

    for week in weeks {
        md.push_str(&format!("| {week} |"));
        for r in &cmp.results {
            match r.summary.iter().find(|s| s.week_number == week) {
                Some(s) => md.push_str(&format!(
                    " {} | {} | {} |",
                    s.count,
                    fmt_percent(s.avg_return, 2),
                    fmt_ratio(s.profit_factor)
                )),
                None => md.push_str(" - | - | - |"),
            }
        }
        md.push('\n');
    }
    md.push('\n');

    md
}

/// Result for one mode, for callers that only kept the comparison.
pub fn mode_result(cmp: &ModeComparison, mode: FilterMode) -> Result<&AnalysisResult> {
    cmp.get(mode)
        .with_context(|| format!("comparison has no result for filter '{mode}'"))
}

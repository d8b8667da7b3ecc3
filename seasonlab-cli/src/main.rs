//! SeasonLab CLI — weekly seasonality analysis commands.
//!
//! Commands:
//! - `analyze` — per-week-of-year statistics for one filter mode
//! - `compare` — the same dataset under every filter mode
//! - `synth` — write a synthetic weekly CSV to analyze later

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seasonlab_core::data::{generate_weekly_bars, SyntheticConfig};
use seasonlab_core::render::{detail_view, summary_view, RenderedTable};
use seasonlab_core::table::{SortDirection, SummaryColumn};
use seasonlab_core::FilterMode;
use seasonlab_runner::{
    export_json, run_all_modes, run_analysis, save_artifacts, save_comparison, AnalysisConfig,
    AnalysisResult, InputFormat, ModeComparison,
};

#[derive(Parser)]
#[command(
    name = "seasonlab",
    about = "SeasonLab CLI — weekly seasonality statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one filter mode and print the weekly statistics.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Filter: all, after-up or after-down.
        #[arg(long)]
        filter: Option<FilterMode>,

        /// Summary column to sort by (e.g. avg_return, win_rate, pf).
        #[arg(long)]
        sort: Option<SummaryColumn>,

        /// Sort descending instead of ascending.
        #[arg(long, default_value_t = false)]
        desc: bool,

        /// Which table(s) to print.
        #[arg(long, value_enum, default_value_t = View::Summary)]
        view: View,

        /// Print the result as JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze every filter mode over the same dataset.
    Compare {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write synthetic weekly bars as CSV.
    Synth {
        /// Symbol used to seed the generator.
        #[arg(long, default_value = "SPY")]
        symbol: String,

        /// Number of weekly bars.
        #[arg(long, default_value_t = 780)]
        weeks: usize,

        /// RNG seed mixed with the symbol.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First bar date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
}

/// Input and output options shared by `analyze` and `compare`.
#[derive(Args)]
struct InputArgs {
    /// Path to a TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file (CSV or saved chart JSON).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Input format. Defaults to the file extension.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Symbol label for reports.
    #[arg(long)]
    symbol: Option<String>,

    /// First bar date to include (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last bar date to include (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Use synthetic data when no input file is readable.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Output directory for artifacts.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not write artifacts.
    #[arg(long, default_value_t = false)]
    no_save: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    ChartJson,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Summary,
    Detail,
    Both,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seasonlab=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            filter,
            sort,
            desc,
            view,
            json,
        } => run_analyze_cmd(input, filter, sort, desc, view, json),
        Commands::Compare { input } => run_compare_cmd(input),
        Commands::Synth {
            symbol,
            weeks,
            seed,
            start,
            output,
        } => run_synth_cmd(&symbol, weeks, seed, start, output),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(args: &InputArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(path) = &args.input {
        config.input.path = Some(path.clone());
        // An explicit file disables the synthetic default unless asked for.
        config.input.synthetic = args.synthetic;
    } else if args.synthetic {
        config.input.synthetic = true;
    }
    if let Some(format) = args.format {
        config.input.format = match format {
            FormatArg::Csv => InputFormat::Csv,
            FormatArg::ChartJson => InputFormat::ChartJson,
        };
    }
    if let Some(symbol) = &args.symbol {
        config.input.symbol = symbol.clone();
    }
    if args.start.is_some() {
        config.analysis.start = args.start;
    }
    if args.end.is_some() {
        config.analysis.end = args.end;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run_analyze_cmd(
    args: InputArgs,
    filter: Option<FilterMode>,
    sort: Option<SummaryColumn>,
    desc: bool,
    view: View,
    json: bool,
) -> Result<()> {
    let mut config = build_config(&args)?;
    if let Some(mode) = filter {
        config.analysis.filter = mode;
    }
    if let Some(column) = sort {
        config.analysis.sort_by = Some(column);
    }
    if desc {
        config.analysis.direction = SortDirection::Descending;
    }

    let result = run_analysis(&config)?;

    if json {
        println!("{}", export_json(&result)?);
    } else {
        print_result(&result, view);
    }

    if !args.no_save {
        let run_dir = save_artifacts(&result, &config.output.dir)?;
        info!(dir = %run_dir.display(), "artifacts saved");
        if !json {
            println!("Artifacts saved to: {}", run_dir.display());
        }
    }

    Ok(())
}

fn run_compare_cmd(args: InputArgs) -> Result<()> {
    let config = build_config(&args)?;
    let cmp = run_all_modes(&config)?;

    print_comparison(&cmp);

    if !args.no_save {
        let run_dir = save_comparison(&cmp, &config.output.dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_synth_cmd(
    symbol: &str,
    weeks: usize,
    seed: u64,
    start: Option<NaiveDate>,
    output: PathBuf,
) -> Result<()> {
    let defaults = SyntheticConfig::default();
    let config = SyntheticConfig {
        weeks,
        seed,
        start: start.unwrap_or(defaults.start),
        ..defaults
    };
    let bars = generate_weekly_bars(symbol, &config);

    let mut wtr = csv::Writer::from_path(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    wtr.write_record(["date", "open", "close"])?;
    for bar in &bars {
        wtr.write_record([
            bar.date.map(|d| d.to_string()).unwrap_or_default(),
            bar.open.map(|v| format!("{v:.4}")).unwrap_or_default(),
            bar.close.map(|v| format!("{v:.4}")).unwrap_or_default(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} synthetic weekly bars for {symbol} to {}",
        bars.len(),
        output.display()
    );
    Ok(())
}

// ─── Console output ─────────────────────────────────────────────────

fn print_header(result: &AnalysisResult) {
    println!();
    println!("=== {} — {} ===", result.symbol, result.filter.label());
    if result.has_synthetic {
        println!("  WARNING: results computed on SYNTHETIC data");
    }
    if let (Some(first), Some(last)) = (result.first_date, result.last_date) {
        println!("  Period:   {first} to {last}");
    }
    println!(
        "  Bars:     {} of {} rows, {} after filter",
        result.bar_count, result.raw_count, result.filtered_count
    );
    for (reason, count) in &result.skipped {
        println!("  Skipped:  {count} ({reason})");
    }
    println!("  Dataset:  {}", &result.dataset_hash[..16.min(result.dataset_hash.len())]);
    println!();
}

fn print_table(table: &RenderedTable) {
    print!("{}", table.to_text());
    println!();
}

fn print_result(result: &AnalysisResult, view: View) {
    print_header(result);

    if !result.is_ready() {
        println!("{}", result.status_message());
        return;
    }

    if matches!(view, View::Summary | View::Both) {
        let mut table = summary_view(&result.summary);
        if let Some(sort) = result.sort {
            // Rows are already ordered by the typed sort.
            table.mark_sorted(sort.column.index(), sort.direction);
        }
        print_table(&table);
    }
    if matches!(view, View::Detail | View::Both) {
        print_table(&detail_view(&result.bars));
    }

    if let Some(best) = result.best_week() {
        println!(
            "Best week: {} ({:.2}% avg)",
            best.week_number,
            best.avg_return * 100.0
        );
    }
    if let Some(worst) = result.worst_week() {
        println!(
            "Worst week: {} ({:.2}% avg)",
            worst.week_number,
            worst.avg_return * 100.0
        );
    }
}

fn print_comparison(cmp: &ModeComparison) {
    for result in &cmp.results {
        print_header(result);
        if result.is_ready() {
            print_table(&summary_view(&result.summary));
        } else {
            println!("{}", result.status_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "seasonlab",
            "analyze",
            "--input",
            "spy.csv",
            "--filter",
            "after-down",
            "--sort",
            "avg_return",
            "--desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                input,
                filter,
                sort,
                desc,
                ..
            } => {
                assert_eq!(input.input, Some(PathBuf::from("spy.csv")));
                assert_eq!(filter, Some(FilterMode::AfterDown));
                assert_eq!(sort, Some(SummaryColumn::AvgReturn));
                assert!(desc);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert!(Cli::try_parse_from(["seasonlab", "analyze", "--filter", "sideways"]).is_err());
    }

    #[test]
    fn explicit_input_disables_synthetic_default() {
        let cli = Cli::try_parse_from(["seasonlab", "compare", "--input", "spy.json"]).unwrap();
        let Commands::Compare { input } = cli.command else {
            panic!("expected compare");
        };
        let config = build_config(&input).unwrap();
        assert!(!config.input.synthetic);
        assert_eq!(config.input.path, Some(PathBuf::from("spy.json")));
    }
}

// Entry point and high-level CLI flow.
//
// - Option [1] loads both CSV files, derives the country metrics and prints
//   load diagnostics. Loading again re-reads the files.
// - Option [2] builds the five chart specifications from the loaded tables
//   and exports them together with the enriched tables and summary.
// - `--batch` runs [1] then [2] once and exits.
mod charts;
mod config;
mod error;
mod loader;
mod lookup;
mod output;
mod regions;
mod types;
mod util;

use charts::{ChartSpec, Series};
use clap::Parser;
use config::Args;
use error::MetricsResult;
use loader::{Dataset, LoadReport, MetricsCache};
use log::{debug, error, info, LevelFilter};
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;
use types::SummaryStats;

/// Everything one run of the program needs: the parsed arguments and the
/// memoized tables. Passed explicitly to each handler.
struct Session {
    args: Args,
    cache: MetricsCache,
}

impl Session {
    fn new(args: Args) -> Self {
        let cache = MetricsCache::new(&args.countries, &args.sectors);
        Session { args, cache }
    }
}

#[derive(Serialize)]
struct SummaryExport<'a> {
    generated_at: String,
    #[serde(flatten)]
    stats: &'a SummaryStats,
    sectors_analyzed: usize,
    crisis_regions: usize,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    builder.parse_default_env();
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5}] {}",
            chrono::Local::now().format("%H:%M:%S"),
            record.level(),
            record.args()
        )
    });
    builder.init();
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_load_report(label: &str, report: &LoadReport) {
    println!(
        "{}: {} rows read, {} kept",
        label,
        util::format_int(report.total_rows),
        util::format_int(report.kept_rows)
    );
    let dropped = report.dropped_missing + report.dropped_non_positive;
    if dropped > 0 {
        println!(
            "  Note: {} rows dropped ({} missing values, {} non-positive values).",
            util::format_int(dropped),
            util::format_int(report.dropped_missing),
            util::format_int(report.dropped_non_positive)
        );
    }
    if report.parse_errors > 0 {
        println!(
            "  Note: {} rows skipped due to parse errors.",
            util::format_int(report.parse_errors)
        );
    }
    if !report.unresolved_codes.is_empty() {
        println!("  Info: no display name for {}", report.unresolved_codes.join(", "));
    }
    for field in &report.degenerate_fields {
        println!("  Warning: {} is constant; normalized to 0.0 for every row.", field);
    }
}

/// Handle option [1]. A second load drops the memoized tables and re-reads.
fn handle_load(session: &mut Session) -> MetricsResult<()> {
    let dataset = if session.cache.get().is_some() {
        info!("reloading source files");
        session.cache.reload()?
    } else {
        session.cache.get_or_load()?
    };
    println!("Processing dataset...");
    print_load_report("Countries", &dataset.country_report);
    print_load_report("Sectors", &dataset.sector_report);
    println!();
    Ok(())
}

fn build_charts(data: &Dataset) -> Vec<ChartSpec> {
    vec![
        charts::mismatch_leaderboard(&data.countries, config::LEADERBOARD_SIZE),
        charts::need_budget_quadrant(&data.countries, config::QUADRANT_ANNOTATIONS),
        charts::sector_coverage_gap(&data.sectors, config::SECTOR_TOP_N),
        charts::funding_equity(&data.countries),
        charts::efficiency_magnitude(&data.countries, config::BUBBLE_REFERENCE_SIZE),
    ]
}

/// Handle option [2]: write the enriched tables, the five chart specs, the
/// summary and the globe points, and print previews.
fn handle_generate(session: &Session) -> MetricsResult<()> {
    let Some(data) = session.cache.get() else {
        println!("Error: No data loaded. Please load the data first (option 1).\n");
        return Ok(());
    };
    let out = &session.args.out;
    output::ensure_dir(out)?;

    println!("Generating charts...");
    output::write_csv(&out.join("country_metrics.csv"), &data.countries)?;
    output::write_csv(&out.join("sector_benchmarking.csv"), &data.sectors)?;

    for chart in build_charts(data) {
        let path = output::write_chart(out, &chart)?;
        let points: usize = chart.series.iter().map(Series::len).sum();
        debug!("{}: {} series, {} points", chart.id, chart.series.len(), points);
        println!("  {} -> {}", chart.title, path.display());
    }
    println!();

    println!("Mismatch Leaderboard");
    println!("(Top {} by mismatch score)\n", config::LEADERBOARD_SIZE);
    output::preview_table_rows(
        &charts::leaderboard_rows(&data.countries, config::LEADERBOARD_SIZE),
        5,
    );

    println!("Sectoral Coverage Gap");
    println!("(Top {} sectors by people in need)\n", config::SECTOR_TOP_N);
    output::preview_table_rows(
        &charts::sector_coverage_rows(&data.sectors, config::SECTOR_TOP_N),
        5,
    );

    let stats = charts::summary_stats(&data.countries);
    let globe = regions::globe_points();
    let summary = SummaryExport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        stats: &stats,
        sectors_analyzed: data.sectors.len(),
        crisis_regions: globe.len(),
    };
    output::write_json(&out.join("summary.json"), &summary)?;
    output::write_json(&out.join("globe_points.json"), &globe)?;

    println!("Summary Stats (summary.json):");
    println!("  Countries analyzed: {}", util::format_int(stats.total_countries));
    println!("  Critical severity:  {}", util::format_int(stats.critical_countries));
    match (stats.max_mismatch, stats.max_mismatch_country.as_deref()) {
        (Some(score), Some(name)) => {
            println!("  Highest mismatch:   {} ({})", util::format_number(score, 3), name)
        }
        _ => println!("  Highest mismatch:   n/a"),
    }
    let entities = regions::entity_list();
    println!(
        "  Globe: {} crisis regions, A-Z from {}\n",
        entities.len(),
        entities.first().map(|r| r.name).unwrap_or("-")
    );
    info!("outputs saved to {}", out.display());
    Ok(())
}

fn run_batch(session: &mut Session) -> ExitCode {
    let result = handle_load(session).and_then(|_| handle_generate(session));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let batch = args.batch;
    let mut session = Session::new(args);

    if batch {
        return run_batch(&mut session);
    }

    loop {
        println!("H2C2 Humanitarian Metrics:");
        println!("[1] Load the data");
        println!("[2] Generate charts");
        println!("[3] Exit\n");
        match read_choice().as_str() {
            "1" => {
                if let Err(e) = handle_load(&mut session) {
                    error!("failed to load data: {}", e);
                    println!();
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate(&session) {
                    error!("failed to generate charts: {}", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" | "" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bundled(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
    }

    #[test]
    fn bundled_dataset_builds_every_chart() {
        let data = loader::load_dataset(
            &bundled(config::DEFAULT_COUNTRY_CSV),
            &bundled(config::DEFAULT_SECTOR_CSV),
        )
        .unwrap();
        assert_eq!(data.countries.len(), 23);
        assert_eq!(data.country_report.dropped_missing, 1);
        assert_eq!(data.country_report.unresolved_codes, vec!["XKX".to_string()]);
        assert_eq!(data.sectors.len(), 18);

        let charts = build_charts(&data);
        let ids: Vec<&str> = charts.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                "mismatch_leaderboard",
                "need_budget_quadrant",
                "sector_coverage_gap",
                "funding_equity",
                "efficiency_magnitude"
            ]
        );
        assert_eq!(charts[0].series[0].len(), 10);
        assert_eq!(charts[2].series[0].len(), 10);
        // XKX has no targeted figure.
        let bubbles: usize = charts[4].series.iter().map(Series::len).sum();
        assert_eq!(bubbles, 22);
    }

    #[test]
    fn generate_writes_all_exports() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = Args::parse_from([
            "h2c2",
            "--countries",
            bundled(config::DEFAULT_COUNTRY_CSV).to_str().unwrap(),
            "--sectors",
            bundled(config::DEFAULT_SECTOR_CSV).to_str().unwrap(),
            "--out",
            dir.path().to_str().unwrap(),
        ]);
        let mut session = Session::new(args);
        handle_load(&mut session).unwrap();
        handle_generate(&session).unwrap();
        for name in [
            "country_metrics.csv",
            "sector_benchmarking.csv",
            "chart_mismatch_leaderboard.json",
            "chart_need_budget_quadrant.json",
            "chart_sector_coverage_gap.json",
            "chart_funding_equity.json",
            "chart_efficiency_magnitude.json",
            "summary.json",
            "globe_points.json",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }
        let summary: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(summary["total_countries"], 23);
        assert_eq!(summary["crisis_regions"], 20);
    }
}

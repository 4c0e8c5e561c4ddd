// Command-line configuration and the fixed analysis constants.
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_COUNTRY_CSV: &str = "humanitarian_analysis_country_metrics.csv";
pub const DEFAULT_SECTOR_CSV: &str = "humanitarian_analysis_sector_benchmarking.csv";

pub const LEADERBOARD_SIZE: usize = 10;
pub const QUADRANT_ANNOTATIONS: usize = 5;
pub const SECTOR_TOP_N: usize = 10;
pub const QUADRANT_DIVIDER: f64 = 0.5;
/// Marker size reached by the largest bubble in the efficiency chart.
pub const BUBBLE_REFERENCE_SIZE: f64 = 60.0;
pub const FULL_COVERAGE: f64 = 1.0;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "h2c2",
    about = "Humanitarian need vs. funding metrics and chart specifications"
)]
pub struct Args {
    /// Country metrics CSV (Country ISO3, Population, In Need, revisedRequirements, Targeted).
    #[arg(long, default_value = DEFAULT_COUNTRY_CSV)]
    pub countries: PathBuf,

    /// Sector benchmarking CSV (Cluster, In Need, Targeted, Coverage).
    #[arg(long, default_value = DEFAULT_SECTOR_CSV)]
    pub sectors: PathBuf,

    /// Directory that receives the CSV/JSON exports.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Load and generate once, then exit without showing the menu.
    #[arg(long)]
    pub batch: bool,

    /// Debug-level logging (RUST_LOG still takes precedence).
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_dashboard_files() {
        let args = Args::parse_from(["h2c2"]);
        assert_eq!(args.countries, PathBuf::from(DEFAULT_COUNTRY_CSV));
        assert_eq!(args.sectors, PathBuf::from(DEFAULT_SECTOR_CSV));
        assert_eq!(args.out, PathBuf::from("."));
        assert!(!args.batch);
    }

    #[test]
    fn overrides_are_accepted() {
        let args = Args::parse_from(["h2c2", "--countries", "c.csv", "--out", "build", "--batch"]);
        assert_eq!(args.countries, PathBuf::from("c.csv"));
        assert_eq!(args.out, PathBuf::from("build"));
        assert!(args.batch);
    }
}

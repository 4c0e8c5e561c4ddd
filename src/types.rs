use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const COUNTRY_COLUMNS: [&str; 5] = [
    "Country ISO3",
    "Population",
    "In Need",
    "revisedRequirements",
    "Targeted",
];

pub const SECTOR_COLUMNS: [&str; 4] = ["Cluster", "In Need", "Targeted", "Coverage"];

/// One row of `humanitarian_analysis_country_metrics.csv` as it sits on disk.
/// Every cell is optional text; validation happens in the loader.
#[derive(Debug, Deserialize)]
pub struct RawCountryRow {
    #[serde(rename = "Country ISO3")]
    pub iso3: Option<String>,
    #[serde(rename = "Population")]
    pub population: Option<String>,
    #[serde(rename = "In Need")]
    pub in_need: Option<String>,
    #[serde(rename = "revisedRequirements")]
    pub revised_requirements: Option<String>,
    #[serde(rename = "Targeted")]
    pub targeted: Option<String>,
}

/// One row of `humanitarian_analysis_sector_benchmarking.csv`, cells decoded
/// lossily so a malformed byte never drops the sector.
#[derive(Debug)]
pub struct RawSectorRow {
    pub cluster: Option<String>,
    pub in_need: Option<String>,
    pub targeted: Option<String>,
    pub coverage: Option<String>,
}

/// Need-prevalence quartile bucket, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Bucket a value against the 25th/50th/75th percentile cut points.
    /// Each bucket is closed on its upper edge, so a value equal to `q25`
    /// is `Low` and only values strictly above `q75` are `Critical`.
    pub fn from_cut_points(value: f64, cuts: &QuartileCuts) -> Self {
        if value <= cuts.q25 {
            Severity::Low
        } else if value <= cuts.q50 {
            Severity::Medium
        } else if value <= cuts.q75 {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuartileCuts {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

/// Country row after validation and derivation. Built once per load and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    #[serde(rename = "CountryISO3")]
    pub iso3: String,
    #[serde(rename = "CountryName")]
    pub name: String,
    #[serde(rename = "Population")]
    pub population: f64,
    #[serde(rename = "InNeed")]
    pub people_in_need: f64,
    #[serde(rename = "RevisedRequirements")]
    pub revised_requirements: f64,
    #[serde(rename = "Targeted")]
    pub people_targeted: Option<f64>,
    #[serde(rename = "NeedPrevalence")]
    pub need_prevalence: f64,
    #[serde(rename = "BudgetPerPIN")]
    pub budget_per_pin: f64,
    #[serde(rename = "NeedPrevalenceNorm")]
    pub need_prevalence_norm: f64,
    #[serde(rename = "BudgetPerPINNorm")]
    pub budget_per_pin_norm: f64,
    #[serde(rename = "MismatchScore")]
    pub mismatch_score: f64,
    #[serde(rename = "SeverityQuartile")]
    pub severity: Severity,
    #[serde(rename = "TargetingEfficiency")]
    pub targeting_efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRecord {
    #[serde(rename = "Cluster")]
    pub code: String,
    #[serde(rename = "ClusterName")]
    pub name: String,
    #[serde(rename = "InNeed")]
    pub people_in_need: f64,
    #[serde(rename = "Targeted")]
    pub people_targeted: f64,
    #[serde(rename = "Coverage")]
    pub coverage: f64,
}

/// Headline numbers shown next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_countries: usize,
    pub critical_countries: usize,
    pub max_mismatch: Option<f64>,
    pub max_mismatch_country: Option<String>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LeaderboardRow {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "MismatchScore")]
    pub mismatch_score: String,
    #[tabled(rename = "InNeed")]
    pub people_in_need: String,
    #[tabled(rename = "BudgetPerPIN")]
    pub budget_per_pin: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SectorCoverageRow {
    #[tabled(rename = "Sector")]
    pub sector: String,
    #[tabled(rename = "InNeed")]
    pub people_in_need: String,
    #[tabled(rename = "Targeted")]
    pub people_targeted: String,
    #[tabled(rename = "Coverage")]
    pub coverage: String,
}

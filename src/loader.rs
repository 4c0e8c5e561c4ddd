use crate::error::{MetricsError, MetricsResult};
use crate::lookup::{country_name, is_known_country, is_known_sector, sector_name};
use crate::types::{
    CountryRecord, QuartileCuts, RawCountryRow, RawSectorRow, SectorRecord, Severity,
    COUNTRY_COLUMNS, SECTOR_COLUMNS,
};
use crate::util::{
    clean_text, min_max, min_max_scale, parse_f64_safe, quantile_sorted, safe_ratio,
    sort_ascending,
};
use csv::{ByteRecord, Reader, ReaderBuilder, Trim};
use log::{debug, info, warn};
use once_cell::unsync::OnceCell;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const FIELD_NEED_PREVALENCE: &str = "NeedPrevalence";
pub const FIELD_BUDGET_PER_PIN: &str = "BudgetPerPIN";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_missing: usize,
    pub dropped_non_positive: usize,
    pub parse_errors: usize,
    pub unresolved_codes: Vec<String>,
    pub degenerate_fields: Vec<&'static str>,
}

/// Country row that passed the load-boundary checks: every number needed
/// for a ratio is present and strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCountryRow {
    pub iso3: String,
    pub population: f64,
    pub people_in_need: f64,
    pub revised_requirements: f64,
    pub people_targeted: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Missing,
    NonPositive,
}

/// Both enriched tables from one load. Charts are only ever built from a
/// complete `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub countries: Vec<CountryRecord>,
    pub sectors: Vec<SectorRecord>,
    pub country_report: LoadReport,
    pub sector_report: LoadReport,
}

fn open_reader(path: &Path, required: &[&str]) -> MetricsResult<Reader<File>> {
    let file = File::open(path).map_err(|source| MetricsError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(file);
    // A directory opens fine on Linux; the read error only surfaces here.
    let headers = rdr.headers().map_err(|source| {
        if source.is_io_error() {
            MetricsError::DataUnavailable { path: path.to_path_buf(), source: source.into() }
        } else {
            MetricsError::Csv { path: path.to_path_buf(), source }
        }
    })?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(MetricsError::Schema { path: path.to_path_buf(), missing });
    }
    Ok(rdr)
}

/// Load-boundary checks for one country row. A blank `Country ISO3` counts
/// as missing, alongside population, in-need and requirements; a row
/// without a code would have no display name.
pub fn validate_country_row(row: RawCountryRow) -> Result<ValidCountryRow, DropReason> {
    let iso3 = clean_text(row.iso3.as_deref()).ok_or(DropReason::Missing)?;
    let population = parse_f64_safe(row.population.as_deref()).ok_or(DropReason::Missing)?;
    let people_in_need = parse_f64_safe(row.in_need.as_deref()).ok_or(DropReason::Missing)?;
    let revised_requirements =
        parse_f64_safe(row.revised_requirements.as_deref()).ok_or(DropReason::Missing)?;
    if population <= 0.0 || people_in_need <= 0.0 || revised_requirements <= 0.0 {
        return Err(DropReason::NonPositive);
    }
    Ok(ValidCountryRow {
        iso3,
        population,
        people_in_need,
        revised_requirements,
        people_targeted: parse_f64_safe(row.targeted.as_deref()),
    })
}

/// Derive every metric for an already-filtered set of rows.
///
/// Normalization bounds and quartile cut points come from `rows` as a whole,
/// so values are only comparable within one call. A flat column (min == max)
/// normalizes to 0.0 for every record; its name is returned alongside.
pub fn derive_country_metrics(rows: &[ValidCountryRow]) -> (Vec<CountryRecord>, Vec<&'static str>) {
    if rows.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let prevalence: Vec<f64> = rows.iter().map(|r| r.people_in_need / r.population).collect();
    let budget: Vec<f64> = rows
        .iter()
        .map(|r| r.revised_requirements / r.people_in_need)
        .collect();

    // Non-empty input, so both bounds exist.
    let (prev_min, prev_max) = min_max(&prevalence).unwrap_or((0.0, 0.0));
    let (budget_min, budget_max) = min_max(&budget).unwrap_or((0.0, 0.0));

    let mut degenerate = Vec::new();
    if min_max_scale(prev_max, prev_min, prev_max).is_none() {
        degenerate.push(FIELD_NEED_PREVALENCE);
    }
    if min_max_scale(budget_max, budget_min, budget_max).is_none() {
        degenerate.push(FIELD_BUDGET_PER_PIN);
    }

    let sorted = sort_ascending(prevalence.clone());
    let cuts = QuartileCuts {
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.50),
        q75: quantile_sorted(&sorted, 0.75),
    };

    let records = rows
        .iter()
        .zip(prevalence.iter().zip(budget.iter()))
        .map(|(row, (&need_prevalence, &budget_per_pin))| {
            let need_prevalence_norm =
                min_max_scale(need_prevalence, prev_min, prev_max).unwrap_or(0.0);
            let budget_per_pin_norm =
                min_max_scale(budget_per_pin, budget_min, budget_max).unwrap_or(0.0);
            CountryRecord {
                iso3: row.iso3.clone(),
                name: country_name(&row.iso3),
                population: row.population,
                people_in_need: row.people_in_need,
                revised_requirements: row.revised_requirements,
                people_targeted: row.people_targeted,
                need_prevalence,
                budget_per_pin,
                need_prevalence_norm,
                budget_per_pin_norm,
                mismatch_score: need_prevalence_norm - budget_per_pin_norm,
                severity: Severity::from_cut_points(need_prevalence, &cuts),
                targeting_efficiency: row.people_targeted.map(|t| t / row.people_in_need),
            }
        })
        .collect();
    (records, degenerate)
}

pub fn load_country_metrics(path: &Path) -> MetricsResult<(Vec<CountryRecord>, LoadReport)> {
    let mut rdr = open_reader(path, &COUNTRY_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut valid: Vec<ValidCountryRow> = Vec::new();

    for result in rdr.deserialize::<RawCountryRow>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("{}: skipping row {}: {}", path.display(), report.total_rows, e);
                report.parse_errors += 1;
                continue;
            }
        };
        match validate_country_row(raw) {
            Ok(row) => valid.push(row),
            Err(DropReason::Missing) => report.dropped_missing += 1,
            Err(DropReason::NonPositive) => report.dropped_non_positive += 1,
        }
    }

    for row in &valid {
        if !is_known_country(&row.iso3) && !report.unresolved_codes.contains(&row.iso3) {
            debug!("no display name for country code {}", row.iso3);
            report.unresolved_codes.push(row.iso3.clone());
        }
    }

    let (records, degenerate) = derive_country_metrics(&valid);
    for field in &degenerate {
        warn!("{} is constant across {} countries; normalized to 0.0", field, records.len());
    }
    report.degenerate_fields = degenerate;
    report.kept_rows = records.len();
    info!(
        "loaded {} of {} country rows from {}",
        report.kept_rows,
        report.total_rows,
        path.display()
    );
    Ok((records, report))
}

fn lossy_cell(record: &ByteRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

pub fn load_sector_benchmarking(path: &Path) -> MetricsResult<(Vec<SectorRecord>, LoadReport)> {
    let mut rdr = open_reader(path, &SECTOR_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    let headers = rdr
        .headers()
        .map_err(|source| MetricsError::Csv { path: path.to_path_buf(), source })?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (cluster_idx, need_idx, targeted_idx, coverage_idx) = (
        column("Cluster"),
        column("In Need"),
        column("Targeted"),
        column("Coverage"),
    );

    // Byte records with lossy decoding: a bad cell falls back to its
    // default instead of dropping the sector.
    for result in rdr.byte_records() {
        let record = result.map_err(|source| MetricsError::Csv { path: path.to_path_buf(), source })?;
        report.total_rows += 1;
        let raw = RawSectorRow {
            cluster: lossy_cell(&record, cluster_idx),
            in_need: lossy_cell(&record, need_idx),
            targeted: lossy_cell(&record, targeted_idx),
            coverage: lossy_cell(&record, coverage_idx),
        };
        let code = clean_text(raw.cluster.as_deref()).unwrap_or_else(|| "Unspecified".to_string());
        let people_in_need = parse_f64_safe(raw.in_need.as_deref()).unwrap_or(0.0);
        let people_targeted = parse_f64_safe(raw.targeted.as_deref()).unwrap_or(0.0);
        let coverage = parse_f64_safe(raw.coverage.as_deref())
            .unwrap_or_else(|| safe_ratio(people_targeted, people_in_need));
        if !is_known_sector(&code) && !report.unresolved_codes.contains(&code) {
            debug!("no display name for sector code {}", code);
            report.unresolved_codes.push(code.clone());
        }
        records.push(SectorRecord {
            name: sector_name(&code),
            code,
            people_in_need,
            people_targeted,
            coverage,
        });
    }

    report.kept_rows = records.len();
    info!("loaded {} sector rows from {}", report.kept_rows, path.display());
    Ok((records, report))
}

/// Run the full pipeline. Either both tables load or nothing is returned.
pub fn load_dataset(countries: &Path, sectors: &Path) -> MetricsResult<Dataset> {
    let (countries, country_report) = load_country_metrics(countries)?;
    let (sectors, sector_report) = load_sector_benchmarking(sectors)?;
    Ok(Dataset { countries, sectors, country_report, sector_report })
}

/// Memoized load result owned by the session. Only a successful load is
/// kept; an error leaves the cache empty so the next call reads again.
#[derive(Debug)]
pub struct MetricsCache {
    countries: PathBuf,
    sectors: PathBuf,
    cell: OnceCell<Dataset>,
}

impl MetricsCache {
    pub fn new(countries: impl Into<PathBuf>, sectors: impl Into<PathBuf>) -> Self {
        Self {
            countries: countries.into(),
            sectors: sectors.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_load(&self) -> MetricsResult<&Dataset> {
        self.cell
            .get_or_try_init(|| load_dataset(&self.countries, &self.sectors))
    }

    pub fn get(&self) -> Option<&Dataset> {
        self.cell.get()
    }

    /// Drop the memoized tables and read the files again.
    pub fn reload(&mut self) -> MetricsResult<&Dataset> {
        self.cell.take();
        self.get_or_load()
    }
}

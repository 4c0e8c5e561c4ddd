// Declarative chart specifications built from the enriched tables.
//
// Every builder is a pure function of its input slice; the renderer that
// consumes the JSON is expected to draw exactly what is described here.
use crate::config::{FULL_COVERAGE, QUADRANT_DIVIDER};
use crate::lookup::severity_color;
use crate::types::{CountryRecord, LeaderboardRow, SectorCoverageRow, SectorRecord, Severity, SummaryStats};
use crate::util::{
    format_count, format_number, mean, quantile_sorted, sample_stdev, sort_ascending,
};
use serde::Serialize;
use std::cmp::Ordering;

const PIN_COLOR: &str = "#ef4444";
const TARGETED_COLOR: &str = "#4ade80";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    HorizontalBar,
    Scatter,
    GroupedBar,
    Box,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub field: &'static str,
    pub scale: AxisScale,
}

impl Axis {
    fn linear(title: &str, field: &'static str) -> Self {
        Axis { title: title.to_string(), field, scale: AxisScale::Linear }
    }

    fn category(title: &str, field: &'static str) -> Self {
        Axis { title: title.to_string(), field, scale: AxisScale::Category }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    HorizontalBar,
    Markers,
    Box,
}

/// Data point coordinate: numeric for value axes, text for category axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Num(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sort_ascending(values.to_vec());
        Some(BoxStats {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            mean: mean(&sorted),
            stdev: sample_stdev(&sorted),
        })
    }
}

/// Area-based marker scaling. `size_ref = 2 * max / reference²`, so the
/// largest value renders at exactly `reference_size` and the rendered area
/// grows linearly with the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubbleScale {
    pub mode: &'static str,
    pub size_ref: f64,
    pub reference_size: f64,
}

impl BubbleScale {
    pub fn from_max(max_value: f64, reference_size: f64) -> Option<Self> {
        if max_value <= 0.0 || reference_size <= 0.0 {
            return None;
        }
        Some(BubbleScale {
            mode: "area",
            size_ref: 2.0 * max_value / (reference_size * reference_size),
            reference_size,
        })
    }

    /// Marker diameter for renderers without an area sizing mode.
    pub fn rendered_size(&self, value: f64) -> f64 {
        (2.0 * value.max(0.0) / self.size_ref).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub x: Vec<Datum>,
    pub y: Vec<Datum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_colors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hover_text: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marker_size: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marker_px: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubble: Option<BubbleScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BoxStats>,
}

impl Series {
    fn new(name: impl Into<String>, kind: SeriesKind) -> Self {
        Series {
            name: name.into(),
            kind,
            x: Vec::new(),
            y: Vec::new(),
            color: None,
            point_colors: Vec::new(),
            labels: Vec::new(),
            hover_text: Vec::new(),
            marker_size: Vec::new(),
            marker_px: Vec::new(),
            bubble: None,
            stats: None,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len().max(self.y.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAxis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub axis: LineAxis,
    pub value: f64,
    pub dashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub show_arrow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<ReferenceLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Need-vs-budget quadrant, split at 0.5 on both normalized axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quadrant {
    /// Low budget per person, high need.
    Overlooked,
    /// High budget per person, high need.
    Prioritized,
    /// Low budget per person, low need.
    Stable,
    /// High budget per person, low need.
    OverFunded,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Overlooked,
        Quadrant::Prioritized,
        Quadrant::Stable,
        Quadrant::OverFunded,
    ];

    /// `x` is normalized budget-per-person, `y` normalized need prevalence.
    /// A point sitting on a divider counts as high budget / low need.
    pub fn classify(x: f64, y: f64) -> Self {
        let high_budget = x >= QUADRANT_DIVIDER;
        let high_need = y > QUADRANT_DIVIDER;
        match (high_budget, high_need) {
            (false, true) => Quadrant::Overlooked,
            (true, true) => Quadrant::Prioritized,
            (false, false) => Quadrant::Stable,
            (true, false) => Quadrant::OverFunded,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Overlooked => "Overlooked",
            Quadrant::Prioritized => "Prioritized",
            Quadrant::Stable => "Stable",
            Quadrant::OverFunded => "Over-funded",
        }
    }

    /// Where the quadrant's caption sits on the unit square.
    fn caption_anchor(self) -> (f64, f64) {
        match self {
            Quadrant::Overlooked => (0.25, 0.98),
            Quadrant::Prioritized => (0.75, 0.98),
            Quadrant::Stable => (0.25, 0.02),
            Quadrant::OverFunded => (0.75, 0.02),
        }
    }
}

fn by_mismatch_desc(a: &&CountryRecord, b: &&CountryRecord) -> Ordering {
    b.mismatch_score
        .partial_cmp(&a.mismatch_score)
        .unwrap_or(Ordering::Equal)
}

/// The `n` highest mismatch scores, highest first. Ties keep input order.
pub fn top_mismatch(records: &[CountryRecord], n: usize) -> Vec<&CountryRecord> {
    let mut sorted: Vec<&CountryRecord> = records.iter().collect();
    sorted.sort_by(by_mismatch_desc);
    sorted.truncate(n);
    sorted
}

fn country_hover(r: &CountryRecord) -> String {
    format!(
        "<b>{}</b><br>Mismatch score: {:.3}<br>People in need: {}<br>Severity: {}",
        r.name,
        r.mismatch_score,
        format_count(r.people_in_need),
        r.severity.label()
    )
}

/// Horizontal bars of the `top_n` most mismatched countries, ascending so
/// the largest score is drawn at the top.
pub fn mismatch_leaderboard(records: &[CountryRecord], top_n: usize) -> ChartSpec {
    let mut top = top_mismatch(records, top_n);
    top.reverse();

    let mut series = Series::new("Mismatch score", SeriesKind::HorizontalBar);
    for r in &top {
        series.x.push(Datum::Num(r.mismatch_score));
        series.y.push(Datum::Text(r.name.clone()));
        series.point_colors.push(severity_color(r.severity).to_string());
        series.hover_text.push(country_hover(r));
    }

    ChartSpec {
        id: "mismatch_leaderboard",
        title: format!("Top {} Overlooked Crises: Need vs. Funding Mismatch", top_n),
        kind: ChartKind::HorizontalBar,
        x_axis: Axis::linear("Mismatch score (normalized need − normalized budget)", "MismatchScore"),
        y_axis: Axis::category("Country", "CountryName"),
        series: vec![series],
        lines: Vec::new(),
        annotations: Vec::new(),
    }
}

pub fn leaderboard_rows(records: &[CountryRecord], top_n: usize) -> Vec<LeaderboardRow> {
    top_mismatch(records, top_n)
        .into_iter()
        .enumerate()
        .map(|(idx, r)| LeaderboardRow {
            rank: idx + 1,
            country: r.name.clone(),
            mismatch_score: format_number(r.mismatch_score, 3),
            people_in_need: format_count(r.people_in_need),
            budget_per_pin: format_number(r.budget_per_pin, 2),
            severity: r.severity.label().to_string(),
        })
        .collect()
}

fn severity_groups(records: &[&CountryRecord]) -> Vec<(Severity, Vec<usize>)> {
    Severity::ALL
        .iter()
        .filter_map(|sev| {
            let idx: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.severity == *sev)
                .map(|(i, _)| i)
                .collect();
            if idx.is_empty() {
                None
            } else {
                Some((*sev, idx))
            }
        })
        .collect()
}

/// Scatter of normalized budget (x) against normalized need (y), one series
/// per severity bucket, with the `annotate` worst mismatches labelled.
pub fn need_budget_quadrant(records: &[CountryRecord], annotate: usize) -> ChartSpec {
    let all: Vec<&CountryRecord> = records.iter().collect();
    let mut series = Vec::new();
    for (sev, members) in severity_groups(&all) {
        let mut s = Series::new(sev.label(), SeriesKind::Markers);
        s.color = Some(severity_color(sev).to_string());
        for i in members {
            let r = all[i];
            s.x.push(Datum::Num(r.budget_per_pin_norm));
            s.y.push(Datum::Num(r.need_prevalence_norm));
            s.labels.push(r.name.clone());
            s.hover_text.push(format!(
                "<b>{}</b><br>Budget per person (norm): {:.3}<br>Need prevalence (norm): {:.3}<br>Quadrant: {}",
                r.name,
                r.budget_per_pin_norm,
                r.need_prevalence_norm,
                Quadrant::classify(r.budget_per_pin_norm, r.need_prevalence_norm).label()
            ));
        }
        series.push(s);
    }

    let mut annotations: Vec<Annotation> = Quadrant::ALL
        .iter()
        .map(|q| {
            let (x, y) = q.caption_anchor();
            Annotation { x, y, text: q.label().to_string(), show_arrow: false }
        })
        .collect();
    annotations.extend(top_mismatch(records, annotate).into_iter().map(|r| Annotation {
        x: r.budget_per_pin_norm,
        y: r.need_prevalence_norm,
        text: r.name.clone(),
        show_arrow: true,
    }));

    ChartSpec {
        id: "need_budget_quadrant",
        title: "Need vs. Budget Quadrant".to_string(),
        kind: ChartKind::Scatter,
        x_axis: Axis::linear("Budget per person in need (normalized)", "BudgetPerPINNorm"),
        y_axis: Axis::linear("Need prevalence (normalized)", "NeedPrevalenceNorm"),
        series,
        lines: vec![
            ReferenceLine { axis: LineAxis::X, value: QUADRANT_DIVIDER, dashed: true, label: None },
            ReferenceLine { axis: LineAxis::Y, value: QUADRANT_DIVIDER, dashed: true, label: None },
        ],
        annotations,
    }
}

fn top_sectors(sectors: &[SectorRecord], n: usize) -> Vec<&SectorRecord> {
    let mut sorted: Vec<&SectorRecord> = sectors.iter().collect();
    sorted.sort_by(|a, b| {
        b.people_in_need
            .partial_cmp(&a.people_in_need)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// People in need next to people targeted for the `top_n` largest sectors,
/// ascending by need.
pub fn sector_coverage_gap(sectors: &[SectorRecord], top_n: usize) -> ChartSpec {
    let mut top = top_sectors(sectors, top_n);
    top.reverse();

    let mut need = Series::new("People in Need", SeriesKind::HorizontalBar);
    need.color = Some(PIN_COLOR.to_string());
    let mut targeted = Series::new("People Targeted", SeriesKind::HorizontalBar);
    targeted.color = Some(TARGETED_COLOR.to_string());

    for s in &top {
        let pct = format_number(s.coverage * 100.0, 1);
        need.x.push(Datum::Num(s.people_in_need));
        need.y.push(Datum::Text(s.name.clone()));
        need.hover_text.push(format!(
            "<b>{}</b><br>People in need: {}<br>Coverage: {}%",
            s.name,
            format_count(s.people_in_need),
            pct
        ));
        targeted.x.push(Datum::Num(s.people_targeted));
        targeted.y.push(Datum::Text(s.name.clone()));
        targeted.hover_text.push(format!(
            "<b>{}</b><br>People targeted: {}<br>Coverage: {}%",
            s.name,
            format_count(s.people_targeted),
            pct
        ));
    }

    ChartSpec {
        id: "sector_coverage_gap",
        title: "Sectoral Coverage Gap".to_string(),
        kind: ChartKind::GroupedBar,
        x_axis: Axis::linear("People", "InNeed"),
        y_axis: Axis::category("Sector", "ClusterName"),
        series: vec![need, targeted],
        lines: Vec::new(),
        annotations: Vec::new(),
    }
}

pub fn sector_coverage_rows(sectors: &[SectorRecord], top_n: usize) -> Vec<SectorCoverageRow> {
    top_sectors(sectors, top_n)
        .into_iter()
        .map(|s| SectorCoverageRow {
            sector: s.name.clone(),
            people_in_need: format_count(s.people_in_need),
            people_targeted: format_count(s.people_targeted),
            coverage: format!("{}%", format_number(s.coverage * 100.0, 1)),
        })
        .collect()
}

/// Budget-per-person distribution per severity bucket on a log axis.
/// Buckets without members are left out.
pub fn funding_equity(records: &[CountryRecord]) -> ChartSpec {
    let series = Severity::ALL
        .iter()
        .filter_map(|sev| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.severity == *sev)
                .map(|r| r.budget_per_pin)
                .collect();
            let stats = BoxStats::from_values(&values)?;
            let mut s = Series::new(sev.label(), SeriesKind::Box);
            s.color = Some(severity_color(*sev).to_string());
            s.x = values.iter().map(|_| Datum::Text(sev.label().to_string())).collect();
            s.y = values.into_iter().map(Datum::Num).collect();
            s.stats = Some(stats);
            Some(s)
        })
        .collect();

    ChartSpec {
        id: "funding_equity",
        title: "Funding Equity by Severity".to_string(),
        kind: ChartKind::Box,
        x_axis: Axis::category("Severity quartile", "SeverityQuartile"),
        y_axis: Axis {
            title: "Budget per person in need (USD, log scale)".to_string(),
            field: "BudgetPerPIN",
            scale: AxisScale::Log,
        },
        series,
        lines: Vec::new(),
        annotations: Vec::new(),
    }
}

/// Targeting efficiency (x) against need prevalence (y) with marker area
/// proportional to people in need. Countries without a targeted figure are
/// not plotted.
pub fn efficiency_magnitude(records: &[CountryRecord], reference_size: f64) -> ChartSpec {
    let plotted: Vec<&CountryRecord> = records
        .iter()
        .filter(|r| r.targeting_efficiency.is_some())
        .collect();
    let max_pin = plotted.iter().map(|r| r.people_in_need).fold(0.0, f64::max);
    let scale = BubbleScale::from_max(max_pin, reference_size);

    let mut series = Vec::new();
    for (sev, members) in severity_groups(&plotted) {
        let mut s = Series::new(sev.label(), SeriesKind::Markers);
        s.color = Some(severity_color(sev).to_string());
        s.bubble = scale;
        for i in members {
            let r = plotted[i];
            let eff = r.targeting_efficiency.unwrap_or_default();
            s.x.push(Datum::Num(eff));
            s.y.push(Datum::Num(r.need_prevalence));
            s.labels.push(r.name.clone());
            s.marker_size.push(r.people_in_need);
            if let Some(scale) = scale {
                s.marker_px.push(scale.rendered_size(r.people_in_need));
            }
            s.hover_text.push(format!(
                "<b>{}</b><br>Targeting efficiency: {}%<br>Need prevalence: {}%<br>People in need: {}",
                r.name,
                format_number(eff * 100.0, 1),
                format_number(r.need_prevalence * 100.0, 1),
                format_count(r.people_in_need)
            ));
        }
        series.push(s);
    }

    ChartSpec {
        id: "efficiency_magnitude",
        title: "Targeting Efficiency vs. Crisis Magnitude".to_string(),
        kind: ChartKind::Bubble,
        x_axis: Axis::linear("Targeting efficiency (targeted / in need)", "TargetingEfficiency"),
        y_axis: Axis::linear("Need prevalence (in need / population)", "NeedPrevalence"),
        series,
        lines: vec![ReferenceLine {
            axis: LineAxis::X,
            value: FULL_COVERAGE,
            dashed: true,
            label: Some("Full coverage".to_string()),
        }],
        annotations: Vec::new(),
    }
}

pub fn summary_stats(records: &[CountryRecord]) -> SummaryStats {
    let worst = records.iter().fold(None::<&CountryRecord>, |best, r| match best {
        Some(b) if b.mismatch_score >= r.mismatch_score => Some(b),
        _ => Some(r),
    });
    SummaryStats {
        total_countries: records.len(),
        critical_countries: records
            .iter()
            .filter(|r| r.severity == Severity::Critical)
            .count(),
        max_mismatch: worst.map(|r| r.mismatch_score),
        max_mismatch_country: worst.map(|r| r.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, mismatch: f64, pin: f64, severity: Severity) -> CountryRecord {
        CountryRecord {
            iso3: name.to_string(),
            name: name.to_string(),
            population: pin * 2.0,
            people_in_need: pin,
            revised_requirements: pin * 100.0,
            people_targeted: Some(pin * 0.5),
            need_prevalence: 0.5,
            budget_per_pin: 100.0,
            need_prevalence_norm: (mismatch + 1.0) / 2.0,
            budget_per_pin_norm: (1.0 - mismatch) / 2.0,
            mismatch_score: mismatch,
            severity,
            targeting_efficiency: Some(0.5),
        }
    }

    fn sample(n: usize) -> Vec<CountryRecord> {
        (0..n)
            .map(|i| {
                let m = ((i * 7) % n) as f64 / n as f64 - 0.5;
                let sev = Severity::ALL[i % 4];
                record(&format!("C{:02}", i), m, 1000.0 * (i + 1) as f64, sev)
            })
            .collect()
    }

    fn nums(v: &[Datum]) -> Vec<f64> {
        v.iter()
            .map(|d| match d {
                Datum::Num(x) => *x,
                Datum::Text(_) => panic!("expected number"),
            })
            .collect()
    }

    #[test]
    fn leaderboard_is_top_ten_ascending() {
        let records = sample(23);
        let chart = mismatch_leaderboard(&records, 10);
        let scores = nums(&chart.series[0].x);
        assert_eq!(scores.len(), 10);
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));

        let shown: Vec<String> = chart.series[0]
            .y
            .iter()
            .map(|d| match d {
                Datum::Text(t) => t.clone(),
                Datum::Num(_) => panic!("expected category"),
            })
            .collect();
        let floor = scores[0];
        for r in records.iter().filter(|r| !shown.contains(&r.name)) {
            assert!(r.mismatch_score <= floor);
        }
    }

    #[test]
    fn leaderboard_handles_short_tables() {
        let records = sample(3);
        let chart = mismatch_leaderboard(&records, 10);
        assert_eq!(chart.series[0].len(), 3);
        assert!(mismatch_leaderboard(&[], 10).series[0].x.is_empty());
    }

    #[test]
    fn leaderboard_hover_text_formats_values() {
        let records = vec![record("Yemen", 0.81234, 21_600_000.0, Severity::Critical)];
        let chart = mismatch_leaderboard(&records, 10);
        assert_eq!(
            chart.series[0].hover_text[0],
            "<b>Yemen</b><br>Mismatch score: 0.812<br>People in need: 21,600,000<br>Severity: Critical"
        );
        assert_eq!(chart.series[0].point_colors[0], severity_color(Severity::Critical));
    }

    #[test]
    fn quadrant_classification() {
        assert_eq!(Quadrant::classify(0.1, 0.9), Quadrant::Overlooked);
        assert_eq!(Quadrant::classify(0.9, 0.9), Quadrant::Prioritized);
        assert_eq!(Quadrant::classify(0.1, 0.1), Quadrant::Stable);
        assert_eq!(Quadrant::classify(0.9, 0.1), Quadrant::OverFunded);
        assert_eq!(Quadrant::classify(0.5, 0.5), Quadrant::OverFunded);
    }

    #[test]
    fn quadrant_annotates_five_worst_and_draws_dividers() {
        let records = sample(12);
        let chart = need_budget_quadrant(&records, 5);
        let named: Vec<&Annotation> = chart.annotations.iter().filter(|a| a.show_arrow).collect();
        assert_eq!(named.len(), 5);
        let expected: Vec<String> = top_mismatch(&records, 5).iter().map(|r| r.name.clone()).collect();
        let got: Vec<String> = named.iter().map(|a| a.text.clone()).collect();
        assert_eq!(got, expected);
        assert_eq!(chart.lines.len(), 2);
        assert!(chart.lines.iter().all(|l| l.value == 0.5));
        let points: usize = chart.series.iter().map(|s| s.len()).sum();
        assert_eq!(points, 12);
    }

    #[test]
    fn sector_chart_keeps_top_ten_by_need() {
        let sectors: Vec<SectorRecord> = (0..14)
            .map(|i| SectorRecord {
                code: format!("S{}", i),
                name: format!("Sector {}", i),
                people_in_need: ((i * 5) % 14) as f64 * 1000.0,
                people_targeted: 10.0,
                coverage: 0.25,
            })
            .collect();
        let chart = sector_coverage_gap(&sectors, 10);
        assert_eq!(chart.series.len(), 2);
        let need = nums(&chart.series[0].x);
        assert_eq!(need.len(), 10);
        assert!(need.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(need[0], 4000.0);
        assert!(chart.series[0].hover_text[0].contains("Coverage: 25.0%"));
        assert!(chart.series[1].hover_text[0].contains("People targeted: 10"));
    }

    #[test]
    fn funding_equity_omits_empty_buckets() {
        let records = vec![
            record("A", 0.1, 10.0, Severity::Low),
            record("B", 0.2, 10.0, Severity::Critical),
            record("C", 0.3, 10.0, Severity::Critical),
        ];
        let chart = funding_equity(&records);
        assert_eq!(chart.y_axis.scale, AxisScale::Log);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Low", "Critical"]);
        let stats = chart.series[1].stats.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.stdev, 0.0);
        assert_eq!(chart.series[0].stats.unwrap().count, 1);
    }

    #[test]
    fn box_stats_summarise_values() {
        let stats = BoxStats::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.mean, 2.5);
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn largest_bubble_reaches_reference_size() {
        let records = sample(8);
        let chart = efficiency_magnitude(&records, 60.0);
        let scale = chart.series[0].bubble.unwrap();
        let max_pin = records.iter().map(|r| r.people_in_need).fold(0.0, f64::max);
        assert!((scale.size_ref - 2.0 * max_pin / 3600.0).abs() < 1e-12);
        assert!((scale.rendered_size(max_pin) - 60.0).abs() < 1e-9);

        let area_of = |v: f64| scale.rendered_size(v).powi(2);
        let max_area = area_of(max_pin);
        for r in &records {
            let area = area_of(r.people_in_need);
            if r.people_in_need < max_pin {
                assert!(area < max_area);
            }
            assert!((area / max_area - r.people_in_need / max_pin).abs() < 1e-9);
        }
        assert_eq!(chart.lines[0].value, 1.0);
        let points: usize = chart.series.iter().map(|s| s.marker_size.len()).sum();
        assert_eq!(points, 8);
        let largest = chart
            .series
            .iter()
            .flat_map(|s| s.marker_px.iter().copied())
            .fold(0.0, f64::max);
        assert!((largest - 60.0).abs() < 1e-9);
    }

    #[test]
    fn efficiency_chart_skips_untargeted_countries() {
        let mut records = sample(4);
        records[0].people_targeted = None;
        records[0].targeting_efficiency = None;
        let chart = efficiency_magnitude(&records, 60.0);
        let points: usize = chart.series.iter().map(|s| s.len()).sum();
        assert_eq!(points, 3);
        assert!(efficiency_magnitude(&[], 60.0).series.is_empty());
    }

    #[test]
    fn summary_reports_worst_country() {
        let records = vec![
            record("A", 0.1, 10.0, Severity::Critical),
            record("B", 0.7, 10.0, Severity::Low),
            record("C", 0.7, 10.0, Severity::Critical),
        ];
        let s = summary_stats(&records);
        assert_eq!(s.total_countries, 3);
        assert_eq!(s.critical_countries, 2);
        assert_eq!(s.max_mismatch, Some(0.7));
        assert_eq!(s.max_mismatch_country.as_deref(), Some("B"));
        assert_eq!(summary_stats(&[]).max_mismatch, None);
    }
}

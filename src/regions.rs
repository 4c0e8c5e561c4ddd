// Fixed crisis-region catalog behind the globe and the side entity list.
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisRegion {
    pub name: &'static str,
    /// 3 (medium) to 5 (critical).
    pub severity: u8,
    pub projects: u32,
    pub lat: f64,
    pub lon: f64,
    /// Health vulnerability index, 0-10.
    pub hvi: f64,
    /// Funding coverage in percent.
    pub funding_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobePoint {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub hvi: f64,
    pub fund: u32,
    pub severity: u8,
    pub severity_label: &'static str,
    pub color: &'static str,
    pub projects: u32,
}

fn region(
    name: &'static str,
    severity: u8,
    projects: u32,
    lat: f64,
    lon: f64,
    hvi: f64,
    funding_pct: u32,
) -> CrisisRegion {
    CrisisRegion { name, severity, projects, lat, lon, hvi, funding_pct }
}

static CRISIS_REGIONS: Lazy<Vec<CrisisRegion>> = Lazy::new(|| {
    vec![
        region("South Sudan", 5, 10, 7.0, 30.0, 8.9, 34),
        region("Yemen", 5, 8, 15.0, 48.0, 9.2, 28),
        region("Syria", 4, 12, 35.0, 38.0, 7.8, 45),
        region("Afghanistan", 5, 15, 34.0, 67.0, 8.6, 31),
        region("Somalia", 4, 7, 5.0, 46.0, 8.1, 38),
        region("DR Congo", 4, 9, -4.0, 21.0, 7.9, 42),
        region("Ethiopia", 3, 11, 9.0, 40.0, 6.5, 52),
        region("Nigeria", 3, 6, 9.0, 8.0, 6.2, 58),
        region("Haiti", 3, 5, 19.0, -72.0, 6.8, 48),
        region("Ukraine", 4, 14, 48.0, 31.0, 7.3, 65),
        region("Myanmar", 3, 8, 21.0, 95.0, 6.4, 44),
        region("Venezuela", 3, 4, 8.0, -66.0, 6.1, 36),
        region("Sudan", 4, 7, 15.0, 30.0, 7.6, 40),
        region("Burkina Faso", 3, 6, 12.0, -2.0, 6.3, 46),
        region("Mali", 3, 5, 17.0, -4.0, 6.7, 43),
        region("Colombia", 3, 6, 4.0, -72.0, 6.4, 41),
        region("Bangladesh", 3, 9, 23.0, 90.0, 6.6, 47),
        region("Palestine", 4, 8, 32.0, 35.0, 7.5, 39),
        region("Central African Rep.", 4, 5, 7.0, 21.0, 7.7, 35),
        region("Niger", 3, 4, 17.0, 8.0, 6.5, 42),
    ]
});

pub fn crisis_regions() -> &'static [CrisisRegion] {
    CRISIS_REGIONS.as_slice()
}

/// Globe colour for a severity level; anything below 4 shares the level-3 colour.
pub fn severity_level_color(level: u8) -> &'static str {
    match level {
        5 => "#ef4444",
        4 => "#f59e0b",
        _ => "#3b82f6",
    }
}

pub fn severity_level_label(level: u8) -> &'static str {
    match level {
        5 => "Critical",
        4 => "High",
        _ => "Medium",
    }
}

pub fn globe_points() -> Vec<GlobePoint> {
    crisis_regions()
        .iter()
        .map(|r| GlobePoint {
            name: r.name,
            lat: r.lat,
            lng: r.lon,
            hvi: r.hvi,
            fund: r.funding_pct,
            severity: r.severity,
            severity_label: severity_level_label(r.severity),
            color: severity_level_color(r.severity),
            projects: r.projects,
        })
        .collect()
}

/// Regions sorted A-Z by name.
pub fn entity_list() -> Vec<&'static CrisisRegion> {
    let mut list: Vec<&'static CrisisRegion> = crisis_regions().iter().collect();
    list.sort_by(|a, b| a.name.cmp(b.name));
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globe_points_follow_catalog_order() {
        let points = globe_points();
        assert_eq!(points.len(), 20);
        assert_eq!(points[0].name, "South Sudan");
        assert_eq!(points[0].color, "#ef4444");
        assert_eq!(points[2].severity_label, "High");
        assert_eq!(points[6].color, "#3b82f6");
    }

    #[test]
    fn entity_list_is_alphabetical() {
        let list = entity_list();
        assert_eq!(list.len(), 20);
        assert_eq!(list[0].name, "Afghanistan");
        assert!(list.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[test]
    fn unknown_levels_use_medium_colour() {
        assert_eq!(severity_level_color(1), severity_level_color(3));
        assert_eq!(severity_level_label(0), "Medium");
    }
}

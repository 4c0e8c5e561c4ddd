// Static display-name and colour tables.
use crate::types::Severity;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AFG", "Afghanistan"),
    ("BFA", "Burkina Faso"),
    ("CAF", "Central African Republic"),
    ("CMR", "Cameroon"),
    ("COD", "DR Congo"),
    ("COL", "Colombia"),
    ("ETH", "Ethiopia"),
    ("HTI", "Haiti"),
    ("MLI", "Mali"),
    ("MMR", "Myanmar"),
    ("MOZ", "Mozambique"),
    ("NER", "Niger"),
    ("NGA", "Nigeria"),
    ("PSE", "Palestine"),
    ("SDN", "Sudan"),
    ("SOM", "Somalia"),
    ("SSD", "South Sudan"),
    ("SYR", "Syria"),
    ("TCD", "Chad"),
    ("UKR", "Ukraine"),
    ("VEN", "Venezuela"),
    ("YEM", "Yemen"),
];

const SECTOR_NAMES: &[(&str, &str)] = &[
    ("CCM", "Camp Coordination / Management"),
    ("CSS", "Coordination & Support Services"),
    ("EDU", "Education"),
    ("ERY", "Early Recovery"),
    ("ETC", "Emergency Telecommunications"),
    ("FSC", "Food Security"),
    ("HEA", "Health"),
    ("LOG", "Logistics"),
    ("MPC", "Multipurpose Cash"),
    ("MS", "Multi-Sector"),
    ("NUT", "Nutrition"),
    ("PRO", "Protection"),
    ("PRO-CPN", "Child Protection"),
    ("PRO-GBV", "Gender-Based Violence"),
    ("PRO-HLP", "Housing, Land & Property"),
    ("PRO-MIN", "Mine Action"),
    ("SHL", "Shelter & NFI"),
    ("WSH", "Water, Sanitation & Hygiene"),
];

static COUNTRY_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRY_NAMES.iter().copied().collect());

static SECTOR_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SECTOR_NAMES.iter().copied().collect());

/// Display name for an ISO3 code; unmapped codes display as themselves.
pub fn country_name(iso3: &str) -> String {
    resolve(&COUNTRY_LOOKUP, iso3)
}

/// Display name for a cluster code; unmapped codes display as themselves.
pub fn sector_name(code: &str) -> String {
    resolve(&SECTOR_LOOKUP, code)
}

pub fn is_known_country(iso3: &str) -> bool {
    COUNTRY_LOOKUP.contains_key(iso3.trim())
}

pub fn is_known_sector(code: &str) -> bool {
    SECTOR_LOOKUP.contains_key(code.trim())
}

fn resolve(table: &HashMap<&'static str, &'static str>, code: &str) -> String {
    let code = code.trim();
    match table.get(code) {
        Some(name) => (*name).to_string(),
        None => code.to_string(),
    }
}

pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "#4ade80",
        Severity::Medium => "#3b82f6",
        Severity::High => "#f59e0b",
        Severity::Critical => "#ef4444",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(COUNTRY_LOOKUP.len(), 22);
        assert_eq!(SECTOR_LOOKUP.len(), 18);
    }

    #[test]
    fn unmapped_codes_fall_back_to_raw_code() {
        assert_eq!(country_name("SSD"), "South Sudan");
        assert_eq!(country_name("ZZZ"), "ZZZ");
        assert_eq!(sector_name(" HEA "), "Health");
        assert_eq!(sector_name("XYZ"), "XYZ");
        assert!(!is_known_country("ZZZ"));
    }

    #[test]
    fn every_severity_has_a_distinct_colour() {
        let mut colours: Vec<&str> = Severity::ALL.iter().map(|s| severity_color(*s)).collect();
        colours.dedup();
        assert_eq!(colours.len(), 4);
    }
}

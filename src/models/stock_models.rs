use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known plant codes, in registry order. Detection and expansion walk this
/// order, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SiteCode {
    #[serde(rename = "JUR")]
    Jur,
    #[serde(rename = "PAC")]
    Pac,
}

impl SiteCode {
    pub const REGISTRY: [SiteCode; 2] = [SiteCode::Jur, SiteCode::Pac];

    pub fn code(&self) -> &'static str {
        match self {
            SiteCode::Jur => "JUR",
            SiteCode::Pac => "PAC",
        }
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SiteCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SiteCode::REGISTRY
            .into_iter()
            .find(|site| site.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown site code: {}", wanted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    Available,
    LowStock,
    NoStock,
    Unclassified,
}

impl StatusClass {
    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Available => "Available",
            StatusClass::LowStock => "Low Stock",
            StatusClass::NoStock => "No Stock",
            StatusClass::Unclassified => "",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusClass {
    type Err = String;

    /// Parses a facet label such as "Low Stock", "lowstock" or "NO STOCK".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "available" => Ok(StatusClass::Available),
            "lowstock" => Ok(StatusClass::LowStock),
            "nostock" => Ok(StatusClass::NoStock),
            _ => Err(format!("unknown stock status: {}", s.trim())),
        }
    }
}

/// A row after header normalization. Every field is present; missing source
/// columns resolve to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub site: String,
    pub status: String,
    pub material_no: String,
    pub category: String,
    pub description: String,
    pub long_text: String,
}

/// A canonical record bound to at most one resolved plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRecord {
    pub site: Option<SiteCode>,
    pub status: String,
    pub status_class: StatusClass,
    pub material_no: String,
    pub category: String,
    pub description: String,
    pub long_text: String,
}

impl ExpandedRecord {
    /// Site code as displayed, empty when no known plant was recognized.
    pub fn site_label(&self) -> &'static str {
        self.site.map(|site| site.code()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSummary {
    pub site: SiteCode,
    pub available: usize,
    pub low: usize,
    pub none: usize,
    pub total: usize,
    pub available_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_code_parsing() {
        assert_eq!("jur".parse::<SiteCode>().unwrap(), SiteCode::Jur);
        assert_eq!(" PAC ".parse::<SiteCode>().unwrap(), SiteCode::Pac);
        assert!("XYZ".parse::<SiteCode>().is_err());
    }

    #[test]
    fn test_status_label_parsing() {
        assert_eq!("Low Stock".parse::<StatusClass>().unwrap(), StatusClass::LowStock);
        assert_eq!("no_stock".parse::<StatusClass>().unwrap(), StatusClass::NoStock);
        assert_eq!("AVAILABLE".parse::<StatusClass>().unwrap(), StatusClass::Available);
        assert!("unclassified".parse::<StatusClass>().is_err());
    }

    #[test]
    fn test_site_label_for_unresolved_record() {
        let record = ExpandedRecord {
            site: None,
            status: String::new(),
            status_class: StatusClass::Unclassified,
            material_no: "100".to_string(),
            category: String::new(),
            description: String::new(),
            long_text: String::new(),
        };
        assert_eq!(record.site_label(), "");
    }
}

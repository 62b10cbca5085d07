use crate::models::{SiteCode, StatusClass};

/// One step of the status classification chain.
pub struct StatusRule {
    pub predicate: fn(&str) -> bool,
    pub class: StatusClass,
}

/// Evaluated top to bottom against the lower-cased status text, first hit
/// wins. "No Availability" therefore lands on `NoStock`.
pub const STATUS_RULES: [StatusRule; 3] = [
    StatusRule {
        predicate: |s| s.contains("no"),
        class: StatusClass::NoStock,
    },
    StatusRule {
        predicate: |s| s.contains("low"),
        class: StatusClass::LowStock,
    },
    StatusRule {
        predicate: |s| s.contains("avail"),
        class: StatusClass::Available,
    },
];

pub fn classify_status(text: &str) -> StatusClass {
    let lowered = text.to_lowercase();
    STATUS_RULES
        .iter()
        .find(|rule| (rule.predicate)(&lowered))
        .map(|rule| rule.class)
        .unwrap_or(StatusClass::Unclassified)
}

/// Every registry code mentioned anywhere in `text`, in registry order.
pub fn detect_sites(text: &str) -> Vec<SiteCode> {
    let lowered = text.to_lowercase();
    SiteCode::REGISTRY
        .into_iter()
        .filter(|site| lowered.contains(&site.code().to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status("Available"), StatusClass::Available);
        assert_eq!(classify_status("  LOW stock "), StatusClass::LowStock);
        assert_eq!(classify_status("No Stock"), StatusClass::NoStock);
        assert_eq!(classify_status(""), StatusClass::Unclassified);
        assert_eq!(classify_status("On order"), StatusClass::Unclassified);
    }

    #[test]
    fn test_status_rule_priority() {
        assert_eq!(classify_status("No Availability"), StatusClass::NoStock);
        // "low" outranks "avail".
        assert_eq!(classify_status("Low availability"), StatusClass::LowStock);
        // Substring rules are literal: "Unavailable" contains "avail".
        assert_eq!(classify_status("Unavailable"), StatusClass::Available);
    }

    #[test]
    fn test_site_detection() {
        assert_eq!(detect_sites("JUR/PAC warehouse"), vec![SiteCode::Jur, SiteCode::Pac]);
        // Registry order, not text order.
        assert_eq!(detect_sites("pac & jur"), vec![SiteCode::Jur, SiteCode::Pac]);
        assert_eq!(detect_sites("Jurong"), vec![SiteCode::Jur]);
        assert!(detect_sites("Central store").is_empty());
        assert!(detect_sites("").is_empty());
    }
}

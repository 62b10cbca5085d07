use crate::models::{CanonicalRecord, ExpandedRecord, SiteCode};
use crate::processor::stock_classifier::{classify_status, detect_sites};

/// Splits a record into one record per recognized site code. A record with
/// no recognized code still yields exactly one record, with no site.
pub fn expand(record: CanonicalRecord) -> Vec<ExpandedRecord> {
    let sites: Vec<Option<SiteCode>> = match detect_sites(&record.site).as_slice() {
        [] => vec![None],
        found => found.iter().copied().map(Some).collect(),
    };

    let status_class = classify_status(&record.status);
    sites
        .into_iter()
        .map(|site| ExpandedRecord {
            site,
            status: record.status.clone(),
            status_class,
            material_no: record.material_no.clone(),
            category: record.category.clone(),
            description: record.description.clone(),
            long_text: record.long_text.clone(),
        })
        .collect()
}

pub fn expand_all<I>(records: I) -> Vec<ExpandedRecord>
where
    I: IntoIterator<Item = CanonicalRecord>,
{
    records.into_iter().flat_map(expand).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusClass;

    fn record(site: &str) -> CanonicalRecord {
        CanonicalRecord {
            site: site.to_string(),
            status: "Low stock".to_string(),
            material_no: "2002".to_string(),
            category: "Valves".to_string(),
            description: "Gate valve".to_string(),
            long_text: "DN50, PN16".to_string(),
        }
    }

    #[test]
    fn test_multi_site_expansion() {
        let expanded = expand(record("JUR/PAC warehouse"));
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].site, Some(SiteCode::Jur));
        assert_eq!(expanded[1].site, Some(SiteCode::Pac));

        for item in &expanded {
            assert_eq!(item.status, "Low stock");
            assert_eq!(item.status_class, StatusClass::LowStock);
            assert_eq!(item.material_no, "2002");
            assert_eq!(item.category, "Valves");
            assert_eq!(item.description, "Gate valve");
            assert_eq!(item.long_text, "DN50, PN16");
        }
    }

    #[test]
    fn test_unrecognized_site_is_kept() {
        let expanded = expand(record("Main yard"));
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].site, None);

        let expanded = expand(record(""));
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].site, None);
    }

    #[test]
    fn test_expansion_never_loses_rows() {
        let inputs = vec![record("JUR"), record("nowhere"), record("pac/jur"), record("")];
        let count = inputs.len();
        let expanded = expand_all(inputs);
        assert!(expanded.len() >= count);
        assert_eq!(expanded.len(), 5);
    }

    #[test]
    fn test_expansion_order_is_stable() {
        let first = expand(record("PAC + JUR"));
        let second = expand(record("PAC + JUR"));
        assert_eq!(first, second);
        assert_eq!(first[0].site, Some(SiteCode::Jur));
    }
}

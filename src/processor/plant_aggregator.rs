use crate::models::{ExpandedRecord, PlantSummary, SiteCode, StatusClass};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    available: usize,
    low: usize,
    none: usize,
}

/// Per-plant stock summary, best-stocked plant first. Records without a
/// site or with an unclassified status do not count.
pub fn summarize<'a, I>(records: I) -> Vec<PlantSummary>
where
    I: IntoIterator<Item = &'a ExpandedRecord>,
{
    let mut tallies: BTreeMap<SiteCode, Tally> = BTreeMap::new();

    for record in records {
        let Some(site) = record.site else {
            continue;
        };
        match record.status_class {
            StatusClass::Available => tallies.entry(site).or_default().available += 1,
            StatusClass::LowStock => tallies.entry(site).or_default().low += 1,
            StatusClass::NoStock => tallies.entry(site).or_default().none += 1,
            StatusClass::Unclassified => {}
        }
    }

    let mut summaries: Vec<PlantSummary> = tallies
        .into_iter()
        .map(|(site, tally)| {
            let total = tally.available + tally.low + tally.none;
            let available_pct = if total == 0 {
                0.0
            } else {
                tally.available as f64 / total as f64 * 100.0
            };
            PlantSummary {
                site,
                available: tally.available,
                low: tally.low,
                none: tally.none,
                total,
                available_pct,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.available_pct
            .partial_cmp(&a.available_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.site.code().cmp(b.site.code()))
    });

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: Option<SiteCode>, status: &str, status_class: StatusClass) -> ExpandedRecord {
        ExpandedRecord {
            site,
            status: status.to_string(),
            status_class,
            material_no: String::new(),
            category: String::new(),
            description: String::new(),
            long_text: String::new(),
        }
    }

    #[test]
    fn test_empty_summary() {
        let records: Vec<ExpandedRecord> = Vec::new();
        assert!(summarize(&records).is_empty());
    }

    #[test]
    fn test_counts_and_percentages() {
        let records = vec![
            record(Some(SiteCode::Jur), "Available", StatusClass::Available),
            record(Some(SiteCode::Jur), "Low", StatusClass::LowStock),
            record(Some(SiteCode::Jur), "No stock", StatusClass::NoStock),
            record(Some(SiteCode::Jur), "Available", StatusClass::Available),
            record(Some(SiteCode::Pac), "Available", StatusClass::Available),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].site, SiteCode::Pac);
        assert_eq!(summary[0].total, 1);
        assert_eq!(summary[0].available_pct, 100.0);

        assert_eq!(summary[1].site, SiteCode::Jur);
        assert_eq!(summary[1].available, 2);
        assert_eq!(summary[1].low, 1);
        assert_eq!(summary[1].none, 1);
        assert_eq!(summary[1].total, 4);
        assert_eq!(summary[1].available_pct, 50.0);
    }

    #[test]
    fn test_unresolved_and_unclassified_are_excluded() {
        let records = vec![
            record(None, "Available", StatusClass::Available),
            record(Some(SiteCode::Pac), "On order", StatusClass::Unclassified),
        ];
        assert!(summarize(&records).is_empty());
    }

    #[test]
    fn test_ties_break_on_site_code() {
        let records = vec![
            record(Some(SiteCode::Pac), "No", StatusClass::NoStock),
            record(Some(SiteCode::Jur), "Low", StatusClass::LowStock),
        ];
        let summary = summarize(&records);
        assert_eq!(summary[0].site, SiteCode::Jur);
        assert_eq!(summary[1].site, SiteCode::Pac);
        assert_eq!(summary[0].available_pct, 0.0);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let records = vec![
            record(Some(SiteCode::Pac), "Available", StatusClass::Available),
            record(Some(SiteCode::Jur), "Available", StatusClass::Available),
            record(Some(SiteCode::Jur), "No", StatusClass::NoStock),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        assert_eq!(summarize(&records), summarize(&records));
        assert_eq!(summarize(&records), summarize(&reversed));
    }
}

use crate::models::{ExpandedRecord, SiteCode, StatusClass};
use anyhow::{Result, anyhow};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Value a facet may carry to mean "no constraint".
pub const ALL_SENTINEL: &str = "all";

/// Exact-match constraints, combined with AND. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub site: Option<SiteCode>,
    pub category: Option<String>,
    pub status: Option<StatusClass>,
}

impl Facets {
    /// Builds facets from free-form values, treating blanks and "all" as unset.
    pub fn from_inputs(
        site: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self> {
        let site = facet_value(site)
            .map(|value| value.parse::<SiteCode>().map_err(|e| anyhow!(e)))
            .transpose()?;
        let status = facet_value(status)
            .map(|value| value.parse::<StatusClass>().map_err(|e| anyhow!(e)))
            .transpose()?;
        let category = facet_value(category).map(str::to_string);

        Ok(Facets {
            site,
            category,
            status,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.site.is_none() && self.category.is_none() && self.status.is_none()
    }

    pub fn matches(&self, record: &ExpandedRecord) -> bool {
        if let Some(site) = self.site {
            if record.site != Some(site) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status_class != status {
                return false;
            }
        }
        true
    }
}

fn facet_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

/// Free-text query against material number, description and long text.
/// An empty query matches everything.
pub fn matches_query(record: &ExpandedRecord, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }
    [&record.material_no, &record.description, &record.long_text]
        .iter()
        .any(|field| field.to_lowercase().contains(lowered_query))
}

/// Derives a filtered view. The source collection is only borrowed, so
/// clearing the filter means filtering the original collection again.
pub fn filter<'a, I>(records: I, query: &str, facets: &Facets) -> Vec<&'a ExpandedRecord>
where
    I: IntoIterator<Item = &'a ExpandedRecord>,
{
    let lowered_query = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches_query(record, &lowered_query) && facets.matches(record))
        .collect()
}

/// Number of pages for `total` items; never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 1-based page slice. Pages past the end come back empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

use crate::models::CanonicalRecord;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Site,
    Status,
    MaterialNo,
    Category,
    Description,
    LongText,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Site,
        CanonicalField::Status,
        CanonicalField::MaterialNo,
        CanonicalField::Category,
        CanonicalField::Description,
        CanonicalField::LongText,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Site => "site",
            CanonicalField::Status => "status",
            CanonicalField::MaterialNo => "material_no",
            CanonicalField::Category => "category",
            CanonicalField::Description => "description",
            CanonicalField::LongText => "long_text",
        }
    }

    fn slot(self, record: &mut CanonicalRecord) -> &mut String {
        match self {
            CanonicalField::Site => &mut record.site,
            CanonicalField::Status => &mut record.status,
            CanonicalField::MaterialNo => &mut record.material_no,
            CanonicalField::Category => &mut record.category,
            CanonicalField::Description => &mut record.description,
            CanonicalField::LongText => &mut record.long_text,
        }
    }
}

/// Second-stage matcher, consulted only when no exact candidate matched.
/// Receives the already-normalized header label.
pub trait FuzzyHeaderMatcher: Send + Sync {
    fn matches(&self, normalized_header: &str) -> bool;
}

/// Accepts a header containing every needle as an independent substring.
pub struct ContainsAll(pub &'static [&'static str]);

impl FuzzyHeaderMatcher for ContainsAll {
    fn matches(&self, normalized_header: &str) -> bool {
        self.0.iter().all(|needle| normalized_header.contains(needle))
    }
}

pub struct FieldRule {
    pub field: CanonicalField,
    /// Exact header candidates, highest priority first.
    pub candidates: Vec<&'static str>,
    pub fuzzy: Option<Box<dyn FuzzyHeaderMatcher>>,
}

/// Column index chosen for each canonical field, `None` when unmapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: [(CanonicalField, Option<usize>); 6],
}

impl ColumnMapping {
    pub fn column_for(&self, field: CanonicalField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, column)| *column)
    }

    pub fn unmapped_fields(&self) -> Vec<CanonicalField> {
        self.columns
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn apply(&self, row: &[String]) -> CanonicalRecord {
        let mut record = CanonicalRecord::default();
        for (field, column) in &self.columns {
            if let Some(value) = column.and_then(|i| row.get(i)) {
                *field.slot(&mut record) = value.clone();
            }
        }
        record
    }
}

pub struct SchemaNormalizer {
    rules: Vec<FieldRule>,
}

impl SchemaNormalizer {
    pub fn new() -> Self {
        let rules = vec![
            FieldRule {
                field: CanonicalField::Site,
                candidates: vec!["Site Location", "Site", "Plant", "Location", "Site Code"],
                fuzzy: None,
            },
            FieldRule {
                field: CanonicalField::Status,
                candidates: vec!["Status", "Stock Status", "Stock"],
                fuzzy: None,
            },
            FieldRule {
                field: CanonicalField::MaterialNo,
                candidates: vec!["Material", "Material No", "Material Number", "Material ID"],
                fuzzy: None,
            },
            FieldRule {
                field: CanonicalField::Category,
                candidates: vec!["Category", "Material Category", "Material Group"],
                fuzzy: None,
            },
            FieldRule {
                field: CanonicalField::Description,
                candidates: vec!["Description", "Material Description", "Short Text"],
                fuzzy: None,
            },
            // Long text is the column whose name drifts between exports.
            FieldRule {
                field: CanonicalField::LongText,
                candidates: vec!["Long text", "Long Text Description"],
                fuzzy: Some(Box::new(ContainsAll(&["long", "text"]))),
            },
        ];

        SchemaNormalizer { rules }
    }

    pub fn with_rules(rules: Vec<FieldRule>) -> Self {
        SchemaNormalizer { rules }
    }

    /// Resolves the header row once. Unmatched fields are logged and left
    /// unmapped so they read as empty strings.
    pub fn resolve(&self, header: &[String]) -> ColumnMapping {
        let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

        let columns = CanonicalField::ALL.map(|field| {
            let column = self
                .rules
                .iter()
                .find(|rule| rule.field == field)
                .and_then(|rule| self.match_rule(rule, &normalized));

            match column {
                Some(i) => debug!("Mapped column {:?} -> {}", header[i], field.name()),
                None => warn!("No column found for canonical field {}", field.name()),
            }
            (field, column)
        });

        ColumnMapping { columns }
    }

    /// Normalizes a single row against its header.
    pub fn normalize(&self, header: &[String], row: &[String]) -> CanonicalRecord {
        self.resolve(header).apply(row)
    }

    fn match_rule(&self, rule: &FieldRule, normalized: &[String]) -> Option<usize> {
        for candidate in &rule.candidates {
            let candidate = normalize_header(candidate);
            if let Some(i) = normalized.iter().position(|h| *h == candidate) {
                return Some(i);
            }
        }

        let fuzzy = rule.fuzzy.as_ref()?;
        normalized.iter().position(|h| fuzzy.matches(h))
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-cases and drops whitespace, separators and punctuation, so
/// "SITE LOCATION ", "site_location" and "Site-Location" compare equal.
pub fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

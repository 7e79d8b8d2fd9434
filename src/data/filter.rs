use std::collections::BTreeSet;

use super::model::{AuditDataset, AuditRecord, Dimension, FieldValue};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state.
///
/// Unlike a "no filter" default, an empty set means nothing is selected for
/// that dimension and no record passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub firm_names: BTreeSet<String>,
    pub years: BTreeSet<i64>,
    pub industries: BTreeSet<String>,
    pub ai_usage: BTreeSet<String>,
}

impl FilterSelection {
    /// Initialise a selection with every observed value selected.
    pub fn all(dataset: &AuditDataset) -> Self {
        let mut selection = FilterSelection::default();
        for dim in Dimension::ALL {
            selection.select_all(dim, dataset.options(dim));
        }
        selection
    }

    /// Whether a record passes all four dimension filters.
    pub fn allows(&self, rec: &AuditRecord) -> bool {
        self.firm_names.contains(rec.firm_name.as_str())
            && self.years.contains(&rec.year)
            && self.industries.contains(rec.industry_affected.as_str())
            && self.ai_usage.contains(rec.ai_used_for_auditing.as_str())
    }

    pub fn contains(&self, dim: Dimension, value: &FieldValue) -> bool {
        match (dim, value) {
            (Dimension::Year, FieldValue::Integer(y)) => self.years.contains(y),
            (Dimension::Year, FieldValue::Text(_)) => false,
            (_, FieldValue::Text(s)) => self.text_set(dim).is_some_and(|set| set.contains(s)),
            (_, FieldValue::Integer(_)) => false,
        }
    }

    /// Add `value` to the selection for `dim`. Values of the wrong kind for
    /// the dimension are ignored.
    pub fn insert(&mut self, dim: Dimension, value: &FieldValue) {
        match (dim, value) {
            (Dimension::Year, FieldValue::Integer(y)) => {
                self.years.insert(*y);
            }
            (_, FieldValue::Text(s)) => {
                if let Some(set) = self.text_set_mut(dim) {
                    set.insert(s.clone());
                }
            }
            _ => {}
        }
    }

    pub fn remove(&mut self, dim: Dimension, value: &FieldValue) {
        match (dim, value) {
            (Dimension::Year, FieldValue::Integer(y)) => {
                self.years.remove(y);
            }
            (_, FieldValue::Text(s)) => {
                if let Some(set) = self.text_set_mut(dim) {
                    set.remove(s);
                }
            }
            _ => {}
        }
    }

    /// Flip a single value in a dimension's selection.
    pub fn toggle(&mut self, dim: Dimension, value: &FieldValue) {
        if self.contains(dim, value) {
            self.remove(dim, value);
        } else {
            self.insert(dim, value);
        }
    }

    /// Select every value in `options` for `dim`.
    pub fn select_all(&mut self, dim: Dimension, options: &[FieldValue]) {
        for value in options {
            self.insert(dim, value);
        }
    }

    /// Deselect everything in `dim`.
    pub fn clear(&mut self, dim: Dimension) {
        match dim {
            Dimension::Year => self.years.clear(),
            _ => {
                if let Some(set) = self.text_set_mut(dim) {
                    set.clear();
                }
            }
        }
    }

    /// Number of selected values for `dim`.
    pub fn len(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Year => self.years.len(),
            _ => self.text_set(dim).map_or(0, BTreeSet::len),
        }
    }

    /// True when some dimension has nothing selected, i.e. no record can pass.
    pub fn is_any_empty(&self) -> bool {
        Dimension::ALL.iter().any(|&dim| self.len(dim) == 0)
    }

    fn text_set(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        match dim {
            Dimension::FirmName => Some(&self.firm_names),
            Dimension::IndustryAffected => Some(&self.industries),
            Dimension::AiUsedForAuditing => Some(&self.ai_usage),
            Dimension::Year => None,
        }
    }

    fn text_set_mut(&mut self, dim: Dimension) -> Option<&mut BTreeSet<String>> {
        match dim {
            Dimension::FirmName => Some(&mut self.firm_names),
            Dimension::IndustryAffected => Some(&mut self.industries),
            Dimension::AiUsedForAuditing => Some(&mut self.ai_usage),
            Dimension::Year => None,
        }
    }
}

/// Return indices of records that pass every dimension filter, ascending.
///
/// A record passes when its firm, year, industry and AI flag are each in the
/// corresponding selected set. An empty set for any dimension therefore yields
/// an empty result.
pub fn filtered_indices(records: &[AuditRecord], selection: &FilterSelection) -> Vec<usize> {
    if selection.is_any_empty() {
        return Vec::new();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.allows(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records that pass every dimension filter, in input order.
pub fn filter<'a>(records: &'a [AuditRecord], selection: &FilterSelection) -> Vec<&'a AuditRecord> {
    filtered_indices(records, selection)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

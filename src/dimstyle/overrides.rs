use std::collections::HashSet;

use crate::core::result::Result;
use crate::dimstyle::registry::{self, DimensionVariable};
use crate::dimstyle::style::lookup_name;
use crate::dimstyle::value::DimValue;

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideRecord {
    pub variable_id: i16,
    pub value: DimValue,
}

impl OverrideRecord {
    pub fn new(variable_id: i16, value: impl Into<DimValue>) -> Self {
        Self {
            variable_id,
            value: value.into(),
        }
    }

    pub fn by_name(name: &str, value: impl Into<DimValue>) -> Result<Self> {
        let var = lookup_name(name)?;
        let value = value.into();
        var.validate(&value)?;
        Ok(Self::new(var.id, value))
    }

    pub fn variable(&self) -> Option<&'static DimensionVariable> {
        registry::lookup_by_id(self.variable_id)
    }
}

// Duplicate ids are kept; the last occurrence wins when resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    records: Vec<OverrideRecord>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<OverrideRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OverrideRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OverrideRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_by_id(&self, variable_id: i16) -> Option<&DimValue> {
        self.records
            .iter()
            .rev()
            .find(|record| record.variable_id == variable_id)
            .map(|record| &record.value)
    }

    pub fn get(&self, name: &str) -> Option<&DimValue> {
        registry::lookup_by_name(name).and_then(|var| self.get_by_id(var.id))
    }

    pub fn with_override(&self, record: OverrideRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    pub fn without_variable(&self, variable_id: i16) -> Self {
        self.records
            .iter()
            .filter(|record| record.variable_id != variable_id)
            .cloned()
            .collect()
    }

    pub fn compacted(&self) -> Self {
        let mut seen = HashSet::new();
        let mut records: Vec<OverrideRecord> = self
            .records
            .iter()
            .rev()
            .filter(|record| seen.insert(record.variable_id))
            .cloned()
            .collect();
        records.reverse();
        Self { records }
    }
}

impl FromIterator<OverrideRecord> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = OverrideRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OverrideSet {
    type Item = &'a OverrideRecord;
    type IntoIter = std::slice::Iter<'a, OverrideRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::dimstyle::overrides::{OverrideRecord, OverrideSet};
use crate::dimstyle::registry;
use crate::dimstyle::style::{DimStyleDefinition, EffectiveStyle};

pub fn resolve(base: &DimStyleDefinition, overrides: &OverrideSet) -> Result<EffectiveStyle> {
    let mut style = base.clone();
    let mut seen = HashSet::new();
    for (index, record) in overrides.iter().enumerate() {
        let var = registry::lookup_by_id(record.variable_id).ok_or_else(|| {
            DwgError::new(
                ErrorKind::UnknownVariable,
                format!("unknown dimension variable id {}", record.variable_id),
            )
            .with_offset(index as u64)
            .with_variable(record.variable_id)
        })?;
        var.validate(&record.value)
            .map_err(|err| err.with_offset(index as u64))?;
        if !seen.insert(var.id) {
            debug!(variable = var.name, "later override supersedes earlier one");
        }
        style.replace(var.id, record.value.clone());
    }

    let overridden: BTreeSet<i16> = seen
        .into_iter()
        .filter(|&id| style.get_by_id(id) != base.get_by_id(id))
        .collect();
    debug!(
        style = base.name(),
        records = overrides.len(),
        changed = overridden.len(),
        "resolved effective dimension style"
    );
    Ok(EffectiveStyle::new(style, overridden))
}

pub fn diff(base: &DimStyleDefinition, target: &DimStyleDefinition) -> OverrideSet {
    target
        .iter()
        .filter(|(var, value)| base.get_by_id(var.id) != Some(*value))
        .map(|(var, value)| OverrideRecord::new(var.id, value.clone()))
        .collect()
}

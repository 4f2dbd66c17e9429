use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::dimstyle::registry::{self, DimensionVariable};
use crate::dimstyle::value::DimValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn from_measurement(measurement: i16) -> Result<Self> {
        match measurement {
            0 => Ok(UnitSystem::Imperial),
            1 => Ok(UnitSystem::Metric),
            other => Err(DwgError::new(
                ErrorKind::InvalidValue,
                format!("invalid $MEASUREMENT value: {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimStyleDefinition {
    name: String,
    values: BTreeMap<i16, DimValue>,
}

impl DimStyleDefinition {
    pub fn from_defaults(name: impl Into<String>, unit: UnitSystem) -> Self {
        let values = registry::variables()
            .iter()
            .map(|var| (var.id, var.default_for(unit)))
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn from_values(name: impl Into<String>, values: BTreeMap<i16, DimValue>) -> Result<Self> {
        for (&id, value) in &values {
            let var = registry::lookup_by_id(id).ok_or_else(|| {
                DwgError::new(ErrorKind::UnknownVariable, format!("unknown variable id {id}"))
                    .with_variable(id)
            })?;
            var.validate(value)?;
        }
        if let Some(missing) = registry::variables()
            .iter()
            .find(|var| !values.contains_key(&var.id))
        {
            return Err(DwgError::new(
                ErrorKind::InvalidValue,
                format!("style is missing a value for {}", missing.name),
            )
            .with_variable(missing.id));
        }
        Ok(Self {
            name: name.into(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&DimValue> {
        registry::lookup_by_name(name).and_then(|var| self.values.get(&var.id))
    }

    pub fn get_by_id(&self, variable_id: i16) -> Option<&DimValue> {
        self.values.get(&variable_id)
    }

    pub fn with_value(&self, name: &str, value: impl Into<DimValue>) -> Result<Self> {
        let var = lookup_name(name)?;
        let value = value.into();
        var.validate(&value)?;
        let mut out = self.clone();
        out.values.insert(var.id, value);
        Ok(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static DimensionVariable, &DimValue)> + '_ {
        self.values
            .iter()
            .filter_map(|(&id, value)| registry::lookup_by_id(id).map(|var| (var, value)))
    }

    pub(crate) fn replace(&mut self, variable_id: i16, value: DimValue) -> Option<DimValue> {
        self.values.insert(variable_id, value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveStyle {
    style: DimStyleDefinition,
    overridden: BTreeSet<i16>,
}

impl EffectiveStyle {
    pub(crate) fn new(style: DimStyleDefinition, overridden: BTreeSet<i16>) -> Self {
        Self { style, overridden }
    }

    pub fn base_name(&self) -> &str {
        self.style.name()
    }

    pub fn get(&self, name: &str) -> Option<&DimValue> {
        self.style.get(name)
    }

    pub fn get_by_id(&self, variable_id: i16) -> Option<&DimValue> {
        self.style.get_by_id(variable_id)
    }

    // ids whose value differs from the base style
    pub fn overridden(&self) -> impl Iterator<Item = i16> + '_ {
        self.overridden.iter().copied()
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        registry::lookup_by_name(name).is_some_and(|var| self.overridden.contains(&var.id))
    }

    pub fn as_definition(&self) -> &DimStyleDefinition {
        &self.style
    }

    pub fn into_definition(self) -> DimStyleDefinition {
        self.style
    }
}

#[derive(Debug, Clone, Default)]
pub struct DimStyleTable {
    styles: HashMap<String, DimStyleDefinition>,
}

impl DimStyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standard(unit: UnitSystem) -> Self {
        let mut table = Self::new();
        table.insert(DimStyleDefinition::from_defaults("Standard", unit));
        table
    }

    pub fn insert(&mut self, style: DimStyleDefinition) -> Option<DimStyleDefinition> {
        self.styles.insert(style.name().to_ascii_uppercase(), style)
    }

    pub fn get(&self, name: &str) -> Option<&DimStyleDefinition> {
        self.styles.get(&name.to_ascii_uppercase())
    }

    pub fn require(&self, name: &str) -> Result<&DimStyleDefinition> {
        self.get(name).ok_or_else(|| {
            DwgError::new(ErrorKind::UnknownStyle, format!("dimension style not found: {name}"))
        })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.values().map(|style| style.name()).collect();
        names.sort_unstable();
        names
    }
}

pub(crate) fn lookup_name(name: &str) -> Result<&'static DimensionVariable> {
    registry::lookup_by_name(name).ok_or_else(|| {
        DwgError::new(
            ErrorKind::UnknownVariable,
            format!("unknown dimension variable: {name}"),
        )
    })
}

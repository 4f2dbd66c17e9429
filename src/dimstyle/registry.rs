use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;
use std::sync::OnceLock;

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::dimstyle::style::UnitSystem;
use crate::dimstyle::value::DimValue;
use crate::xdata::token::{CODE_INT16, CODE_REAL, CODE_STRING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Real,
    Integer16,
    Boolean,
    String,
    NamedReference,
}

impl VarKind {
    pub fn group_code(self) -> u16 {
        match self {
            VarKind::Real => CODE_REAL,
            VarKind::Integer16 | VarKind::Boolean => CODE_INT16,
            VarKind::String | VarKind::NamedReference => CODE_STRING,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Real => "real",
            VarKind::Integer16 => "integer",
            VarKind::Boolean => "boolean",
            VarKind::String => "string",
            VarKind::NamedReference => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Any,
    Flag,
    Range(i16, i16),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Real(f64),
    Integer(i16),
    Text(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> DimValue {
        match self {
            DefaultValue::Real(value) => DimValue::Real(value),
            DefaultValue::Integer(value) => DimValue::Integer16(value),
            DefaultValue::Text(text) => DimValue::Text(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionVariable {
    pub id: i16,
    pub name: &'static str,
    pub kind: VarKind,
    pub domain: Domain,
    pub default_imperial: DefaultValue,
    pub default_metric: DefaultValue,
}

impl DimensionVariable {
    pub fn group_code(&self) -> u16 {
        self.kind.group_code()
    }

    pub fn default_for(&self, unit: UnitSystem) -> DimValue {
        match unit {
            UnitSystem::Imperial => self.default_imperial.to_value(),
            UnitSystem::Metric => self.default_metric.to_value(),
        }
    }

    pub fn validate(&self, value: &DimValue) -> Result<()> {
        if !value.fits_kind(self.kind) {
            return Err(self.invalid(format!(
                "{} expects a {} value, got {}",
                self.name,
                self.kind.as_str(),
                value.kind_name()
            )));
        }
        let Some(number) = value.as_i16() else {
            return Ok(());
        };
        match self.domain {
            Domain::Any => Ok(()),
            Domain::Flag if number == 0 || number == 1 => Ok(()),
            Domain::Flag => Err(self.invalid(format!("{} must be 0 or 1, got {number}", self.name))),
            Domain::Range(lo, hi) if (lo..=hi).contains(&number) => Ok(()),
            Domain::Range(lo, hi) => Err(self.invalid(format!(
                "{} must be in {lo}..={hi}, got {number}",
                self.name
            ))),
        }
    }

    fn invalid(&self, message: String) -> DwgError {
        DwgError::new(ErrorKind::InvalidValue, message).with_variable(self.id)
    }
}

const fn real(id: i16, name: &'static str, imperial: f64, metric: f64) -> DimensionVariable {
    DimensionVariable {
        id,
        name,
        kind: VarKind::Real,
        domain: Domain::Any,
        default_imperial: DefaultValue::Real(imperial),
        default_metric: DefaultValue::Real(metric),
    }
}

const fn flag(id: i16, name: &'static str, imperial: i16, metric: i16) -> DimensionVariable {
    DimensionVariable {
        id,
        name,
        kind: VarKind::Boolean,
        domain: Domain::Flag,
        default_imperial: DefaultValue::Integer(imperial),
        default_metric: DefaultValue::Integer(metric),
    }
}

const fn int(
    id: i16,
    name: &'static str,
    domain: Domain,
    imperial: i16,
    metric: i16,
) -> DimensionVariable {
    DimensionVariable {
        id,
        name,
        kind: VarKind::Integer16,
        domain,
        default_imperial: DefaultValue::Integer(imperial),
        default_metric: DefaultValue::Integer(metric),
    }
}

const fn text(id: i16, name: &'static str, default: &'static str) -> DimensionVariable {
    DimensionVariable {
        id,
        name,
        kind: VarKind::String,
        domain: Domain::Any,
        default_imperial: DefaultValue::Text(default),
        default_metric: DefaultValue::Text(default),
    }
}

const fn named(id: i16, name: &'static str, default: &'static str) -> DimensionVariable {
    DimensionVariable {
        kind: VarKind::NamedReference,
        ..text(id, name, default)
    }
}

const COLOR: Domain = Domain::Range(0, 256);
const DECIMALS: Domain = Domain::Range(0, 8);
const ZERO_SUPPRESSION: Domain = Domain::Range(0, 15);
const LINEWEIGHT: Domain = Domain::Range(-3, 211);

// Sorted by id.
static VARIABLES: [DimensionVariable; 76] = [
    text(3, "DIMPOST", ""),
    text(4, "DIMAPOST", ""),
    named(5, "DIMBLK", ""),
    named(6, "DIMBLK1", ""),
    named(7, "DIMBLK2", ""),
    real(40, "DIMSCALE", 1.0, 1.0),
    real(41, "DIMASZ", 0.18, 2.5),
    real(42, "DIMEXO", 0.0625, 0.625),
    real(43, "DIMDLI", 0.38, 3.75),
    real(44, "DIMEXE", 0.18, 1.25),
    real(45, "DIMRND", 0.0, 0.0),
    real(46, "DIMDLE", 0.0, 0.0),
    real(47, "DIMTP", 0.0, 0.0),
    real(48, "DIMTM", 0.0, 0.0),
    real(49, "DIMFXL", 1.0, 1.0),
    real(50, "DIMJOGANG", FRAC_PI_4, FRAC_PI_4),
    int(69, "DIMTFILL", Domain::Range(0, 2), 0, 0),
    int(70, "DIMTFILLCLR", COLOR, 0, 0),
    flag(71, "DIMTOL", 0, 0),
    flag(72, "DIMLIM", 0, 0),
    flag(73, "DIMTIH", 1, 0),
    flag(74, "DIMTOH", 1, 0),
    flag(75, "DIMSE1", 0, 0),
    flag(76, "DIMSE2", 0, 0),
    int(77, "DIMTAD", Domain::Range(0, 4), 0, 1),
    int(78, "DIMZIN", ZERO_SUPPRESSION, 0, 8),
    int(79, "DIMAZIN", Domain::Range(0, 3), 0, 3),
    int(90, "DIMARCSYM", Domain::Range(0, 2), 0, 0),
    real(140, "DIMTXT", 0.18, 2.5),
    real(141, "DIMCEN", 0.09, 2.5),
    real(142, "DIMTSZ", 0.0, 0.0),
    real(143, "DIMALTF", 25.4, 0.03937007874),
    real(144, "DIMLFAC", 1.0, 1.0),
    real(145, "DIMTVP", 0.0, 0.0),
    real(146, "DIMTFAC", 1.0, 1.0),
    real(147, "DIMGAP", 0.09, 0.625),
    real(148, "DIMALTRND", 0.0, 0.0),
    flag(170, "DIMALT", 0, 0),
    int(171, "DIMALTD", DECIMALS, 2, 3),
    flag(172, "DIMTOFL", 0, 1),
    flag(173, "DIMSAH", 0, 0),
    flag(174, "DIMTIX", 0, 0),
    flag(175, "DIMSOXD", 0, 0),
    int(176, "DIMCLRD", COLOR, 0, 0),
    int(177, "DIMCLRE", COLOR, 0, 0),
    int(178, "DIMCLRT", COLOR, 0, 0),
    int(179, "DIMADEC", Domain::Range(-1, 8), 0, 0),
    int(270, "DIMUNIT", Domain::Range(1, 8), 2, 2),
    int(271, "DIMDEC", DECIMALS, 4, 2),
    int(272, "DIMTDEC", DECIMALS, 4, 2),
    int(273, "DIMALTU", Domain::Range(1, 8), 2, 2),
    int(274, "DIMALTTD", DECIMALS, 2, 3),
    int(275, "DIMAUNIT", Domain::Range(0, 4), 0, 0),
    int(276, "DIMFRAC", Domain::Range(0, 2), 0, 0),
    int(277, "DIMLUNIT", Domain::Range(1, 6), 2, 2),
    int(278, "DIMDSEP", Domain::Any, 46, 44),
    int(279, "DIMTMOVE", Domain::Range(0, 2), 0, 0),
    int(280, "DIMJUST", Domain::Range(0, 4), 0, 0),
    flag(281, "DIMSD1", 0, 0),
    flag(282, "DIMSD2", 0, 0),
    int(283, "DIMTOLJ", Domain::Range(0, 2), 1, 0),
    int(284, "DIMTZIN", ZERO_SUPPRESSION, 0, 8),
    int(285, "DIMALTZ", ZERO_SUPPRESSION, 0, 0),
    int(286, "DIMALTTZ", ZERO_SUPPRESSION, 0, 0),
    int(287, "DIMFIT", Domain::Range(0, 5), 3, 3),
    flag(288, "DIMUPT", 0, 0),
    int(289, "DIMATFIT", Domain::Range(0, 3), 3, 3),
    flag(290, "DIMFXLON", 0, 0),
    flag(294, "DIMTXTDIRECTION", 0, 0),
    named(340, "DIMTXSTY", "Standard"),
    named(341, "DIMLDRBLK", ""),
    named(345, "DIMLTYPE", ""),
    named(346, "DIMLTEX1", ""),
    named(347, "DIMLTEX2", ""),
    int(371, "DIMLWD", LINEWEIGHT, -2, -2),
    int(372, "DIMLWE", LINEWEIGHT, -2, -2),
];

static NAME_INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();

fn name_index() -> &'static HashMap<&'static str, usize> {
    NAME_INDEX.get_or_init(|| {
        VARIABLES
            .iter()
            .enumerate()
            .map(|(index, var)| (var.name, index))
            .collect()
    })
}

pub fn variables() -> &'static [DimensionVariable] {
    &VARIABLES
}

pub fn lookup_by_name(name: &str) -> Option<&'static DimensionVariable> {
    let upper = name.to_ascii_uppercase();
    name_index().get(upper.as_str()).map(|&index| &VARIABLES[index])
}

pub fn lookup_by_id(variable_id: i16) -> Option<&'static DimensionVariable> {
    VARIABLES
        .binary_search_by_key(&variable_id, |var| var.id)
        .ok()
        .map(|index| &VARIABLES[index])
}

pub fn lookup_by_group_payload(
    group_code: u16,
    variable_id: i16,
) -> Option<&'static DimensionVariable> {
    lookup_by_id(variable_id).filter(|var| var.group_code() == group_code)
}

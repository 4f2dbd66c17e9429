pub mod encoder;
pub mod overrides;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod style;
pub mod value;

pub use encoder::{encode_overrides, encode_overrides_to_eed, encode_overrides_with_config};
pub use overrides::{OverrideRecord, OverrideSet};
pub use parser::{
    decode_entity_overrides, decode_overrides, decode_overrides_from_eed,
    decode_overrides_with_config,
};
pub use registry::{
    lookup_by_group_payload, lookup_by_id, lookup_by_name, DimensionVariable, Domain, VarKind,
};
pub use resolver::{diff, resolve};
pub use style::{DimStyleDefinition, DimStyleTable, EffectiveStyle, UnitSystem};
pub use value::DimValue;

const OVERRIDE_TYPE_CODES: [(u16, &str); 9] = [
    (0x14, "DIM_ORDINATE"),
    (0x15, "DIM_LINEAR"),
    (0x16, "DIM_ALIGNED"),
    (0x17, "DIM_ANG3PT"),
    (0x18, "DIM_ANG2LN"),
    (0x19, "DIM_RADIUS"),
    (0x1A, "DIM_DIAMETER"),
    (0x2D, "LEADER"),
    (0x2E, "TOLERANCE"),
];

pub fn carries_dimstyle_overrides(type_code: u16) -> bool {
    OVERRIDE_TYPE_CODES.iter().any(|(code, _)| *code == type_code)
}

pub fn override_type_name(type_code: u16) -> Option<&'static str> {
    OVERRIDE_TYPE_CODES
        .iter()
        .find(|(code, _)| *code == type_code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::{carries_dimstyle_overrides, override_type_name};

    #[test]
    fn dimension_leader_and_tolerance_carry_overrides() {
        assert!(carries_dimstyle_overrides(0x15));
        assert!(carries_dimstyle_overrides(0x2D));
        assert!(carries_dimstyle_overrides(0x2E));
        assert!(!carries_dimstyle_overrides(0x13));
        assert_eq!(override_type_name(0x1A), Some("DIM_DIAMETER"));
        assert_eq!(override_type_name(0x01), None);
    }
}

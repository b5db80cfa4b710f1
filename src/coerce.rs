//! Numeric value extraction across snapshot schema versions.
//!
//! Older store builds tagged some metrics (journal count) as `U8`/`Byte`;
//! current builds write every metric as `F64`. The accessor walks a fixed
//! precedence list so the migration rule is explicit and testable.

use crate::snapshot::NumericVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantTag {
    F64,
    F32,
    I64,
    I32,
    U8,
    Byte,
}

impl VariantTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantTag::F64 => "F64",
            VariantTag::F32 => "F32",
            VariantTag::I64 => "I64",
            VariantTag::I32 => "I32",
            VariantTag::U8 => "U8",
            VariantTag::Byte => "Byte",
        }
    }

    fn read(&self, variant: &NumericVariant) -> Option<f64> {
        match self {
            VariantTag::F64 => variant.f64,
            VariantTag::F32 => variant.f32.map(f64::from),
            VariantTag::I64 => variant.i64.map(|v| v as f64),
            VariantTag::I32 => variant.i32.map(f64::from),
            VariantTag::U8 => variant.u8.map(f64::from),
            VariantTag::Byte => variant.byte.map(f64::from),
        }
    }
}

/// Lookup order: current encodings first, legacy tags last.
pub const VARIANT_PRECEDENCE: [VariantTag; 6] = [
    VariantTag::F64,
    VariantTag::F32,
    VariantTag::I64,
    VariantTag::I32,
    VariantTag::U8,
    VariantTag::Byte,
];

/// First populated tag in precedence order, with its value.
pub fn resolve(variant: &NumericVariant) -> Option<(VariantTag, f64)> {
    VARIANT_PRECEDENCE
        .iter()
        .find_map(|tag| tag.read(variant).map(|value| (*tag, value)))
}

/// Numeric value of a point, or `None` when no recognised tag is set.
pub fn coerce(variant: &NumericVariant) -> Option<f64> {
    resolve(variant).map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_and_current_tags_agree() {
        let legacy = NumericVariant::legacy_u8(7);
        let current = NumericVariant::float(7.0);
        assert_eq!(coerce(&legacy), coerce(&current));
        assert_eq!(coerce(&legacy), Some(7.0));
    }

    #[test]
    fn current_tag_wins_in_transitional_point() {
        let both = NumericVariant {
            f64: Some(3.5),
            u8: Some(9),
            ..NumericVariant::default()
        };
        assert_eq!(resolve(&both), Some((VariantTag::F64, 3.5)));
    }

    #[test]
    fn byte_alias_is_last_resort() {
        let v = NumericVariant {
            byte: Some(4),
            ..NumericVariant::default()
        };
        let (tag, value) = resolve(&v).unwrap();
        assert_eq!(tag, VariantTag::Byte);
        assert_eq!(tag.as_str(), "Byte");
        assert_eq!(value, 4.0);
    }

    #[test]
    fn empty_variant_is_absent() {
        assert_eq!(coerce(&NumericVariant::default()), None);
    }

    #[test]
    fn integer_tags_widen() {
        let v = NumericVariant {
            i64: Some(-12),
            ..NumericVariant::default()
        };
        assert_eq!(coerce(&v), Some(-12.0));
    }
}

//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::{Tag, Version16Dot16};

use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Maxp {
    pub version: Version16Dot16,
    /// The number of glyphs in the font.
    pub num_glyphs: u16,
    /// Limits for TrueType outlines, present in version 1.0.
    pub truetype_limits: Option<TrueTypeLimits>,
}

/// The fields of a version 1.0 `maxp` table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrueTypeLimits {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    /// 1 if instructions do not use the twilight zone, 2 otherwise.
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    /// Maximum levels of recursion; 1 for simple components.
    pub max_component_depth: u16,
}

impl TrueTypeLimits {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(TrueTypeLimits {
            max_points: reader.read_u16()?,
            max_contours: reader.read_u16()?,
            max_composite_points: reader.read_u16()?,
            max_composite_contours: reader.read_u16()?,
            max_zones: reader.read_u16()?,
            max_twilight_points: reader.read_u16()?,
            max_storage: reader.read_u16()?,
            max_function_defs: reader.read_u16()?,
            max_instruction_defs: reader.read_u16()?,
            max_stack_elements: reader.read_u16()?,
            max_size_of_instructions: reader.read_u16()?,
            max_component_elements: reader.read_u16()?,
            max_component_depth: reader.read_u16()?,
        })
    }
}

impl FontTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");

    fn read_table(reader: &mut ByteReader<'_>, _: &Dependencies) -> Result<Self, ReadError> {
        let version: Version16Dot16 = reader.read()?;
        let num_glyphs = reader.read_u16()?;
        let truetype_limits = match version {
            Version16Dot16::VERSION_0_5 => None,
            Version16Dot16::VERSION_1_0 => Some(TrueTypeLimits::read(reader)?),
            other => return Err(ReadError::InvalidFormat(other.to_bits() as i64)),
        };
        Ok(Maxp {
            version,
            num_glyphs,
            truetype_limits,
        })
    }
}

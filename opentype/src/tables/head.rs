//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, LongDateTime, Tag};

use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The value of `magicNumber` in every valid `head` table.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: Fixed,
    /// Used when computing the checksum of the whole font.
    pub checksum_adjustment: u32,
    pub flags: u16,
    /// Valid range is from 16 to 16384.
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    /// Bounds for all glyphs in the font.
    pub bounds: BoundingBox<i16>,
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for short offsets in `loca`, 1 for long.
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    /// `true` if `loca` stores 32-bit offsets.
    pub fn has_long_loca(&self) -> bool {
        self.index_to_loc_format == 1
    }
}

impl FontTable for Head {
    const TAG: Tag = Tag::new(b"head");

    fn read_table(reader: &mut ByteReader<'_>, _: &Dependencies) -> Result<Self, ReadError> {
        let major_version = reader.read_u16()?;
        let minor_version = reader.read_u16()?;
        let font_revision = reader.read()?;
        let checksum_adjustment = reader.read_u32()?;
        let magic = reader.read_u32()?;
        if magic != MAGIC_NUMBER {
            return Err(ReadError::InvalidFormat(magic as i64));
        }
        Ok(Head {
            major_version,
            minor_version,
            font_revision,
            checksum_adjustment,
            flags: reader.read_u16()?,
            units_per_em: reader.read_u16()?,
            created: reader.read()?,
            modified: reader.read()?,
            bounds: BoundingBox::new(
                reader.read_i16()?,
                reader.read_i16()?,
                reader.read_i16()?,
                reader.read_i16()?,
            ),
            mac_style: reader.read_u16()?,
            lowest_rec_ppem: reader.read_u16()?,
            font_direction_hint: reader.read_i16()?,
            index_to_loc_format: reader.read_i16()?,
            glyph_data_format: reader.read_i16()?,
        })
    }
}

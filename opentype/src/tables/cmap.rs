//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use types::{GlyphId, Tag};

use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// A platform identifier, as used in `cmap` and `name`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformId {
    Unicode,
    Macintosh,
    /// Deprecated.
    Iso,
    Windows,
    Custom,
    Unknown(u16),
}

impl PlatformId {
    pub fn new(raw: u16) -> Self {
        match raw {
            0 => PlatformId::Unicode,
            1 => PlatformId::Macintosh,
            2 => PlatformId::Iso,
            3 => PlatformId::Windows,
            4 => PlatformId::Custom,
            other => PlatformId::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            PlatformId::Unicode => 0,
            PlatformId::Macintosh => 1,
            PlatformId::Iso => 2,
            PlatformId::Windows => 3,
            PlatformId::Custom => 4,
            PlatformId::Unknown(other) => other,
        }
    }
}

impl From<u16> for PlatformId {
    fn from(raw: u16) -> Self {
        PlatformId::new(raw)
    }
}

/// The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap {
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,
    // decoded subtables, keyed by offset; records often share a subtable
    subtables: BTreeMap<u32, CmapSubtable>,
}

/// Locates the subtable for one platform/encoding pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EncodingRecord {
    pub platform_id: PlatformId,
    pub encoding_id: u16,
    /// Offset from the start of the `cmap` table to the subtable.
    pub subtable_offset: u32,
}

impl Cmap {
    /// The subtable referenced by `record`.
    pub fn subtable(&self, record: &EncodingRecord) -> Option<&CmapSubtable> {
        self.subtables.get(&record.subtable_offset)
    }

    /// Iterate over each encoding record and its subtable.
    pub fn subtables(&self) -> impl Iterator<Item = (&EncodingRecord, &CmapSubtable)> + '_ {
        self.encoding_records
            .iter()
            .filter_map(|record| Some((record, self.subtable(record)?)))
    }

    /// Map a codepoint to a nominal glyph identifier
    ///
    /// This uses the first subtable, in record order, that maps the
    /// codepoint to a glyph other than `.notdef`.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.subtables()
            .filter_map(|(_, subtable)| subtable.map_codepoint(codepoint))
            .find(|gid| *gid != GlyphId::NOTDEF)
    }
}

impl FontTable for Cmap {
    const TAG: Tag = Tag::new(b"cmap");

    fn read_table(reader: &mut ByteReader<'_>, _: &Dependencies) -> Result<Self, ReadError> {
        let version = reader.read_u16()?;
        let num_tables = reader.read_u16()?;
        let encoding_records = (0..num_tables)
            .map(|_| {
                Ok(EncodingRecord {
                    platform_id: reader.read_u16()?.into(),
                    encoding_id: reader.read_u16()?,
                    subtable_offset: reader.read_u32()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;

        let mut subtables = BTreeMap::new();
        for record in &encoding_records {
            if subtables.contains_key(&record.subtable_offset) {
                continue;
            }
            reader.seek(record.subtable_offset as usize)?;
            let subtable = CmapSubtable::read(reader)?;
            subtables.insert(record.subtable_offset, subtable);
        }
        Ok(Cmap {
            version,
            encoding_records,
            subtables,
        })
    }
}

/// A decoded `cmap` subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CmapSubtable {
    Format0(Cmap0),
    Format4(Cmap4),
    Format6(Cmap6),
    Format12(Cmap12),
    /// A subtable in a format we do not decode.
    Unsupported { format: u16 },
}

impl CmapSubtable {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let start = reader.position();
        let format = reader.read_u16()?;
        match format {
            0 => Cmap0::read(reader).map(CmapSubtable::Format0),
            4 => Cmap4::read(reader, start).map(CmapSubtable::Format4),
            6 => Cmap6::read(reader).map(CmapSubtable::Format6),
            12 => Cmap12::read(reader).map(CmapSubtable::Format12),
            other => {
                log::debug!("skipping cmap subtable format {other}");
                Ok(CmapSubtable::Unsupported { format: other })
            }
        }
    }

    /// The format number of this subtable.
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Unsupported { format } => *format,
        }
    }

    /// Maps a codepoint using this subtable.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        match self {
            CmapSubtable::Format0(cmap0) => cmap0.map_codepoint(codepoint),
            CmapSubtable::Format4(cmap4) => cmap4.map_codepoint(codepoint),
            CmapSubtable::Format6(cmap6) => cmap6.map_codepoint(codepoint),
            CmapSubtable::Format12(cmap12) => cmap12.map_codepoint(codepoint),
            CmapSubtable::Unsupported { .. } => None,
        }
    }
}

/// Format 0: byte encoding table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap0 {
    pub language: u16,
    pub glyph_id_array: Vec<u8>,
}

impl Cmap0 {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;
        let glyph_id_array = reader.read_bytes(256)?.to_vec();
        Ok(Cmap0 {
            language,
            glyph_id_array,
        })
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let gid = *self.glyph_id_array.get(codepoint.into() as usize)?;
        Some(GlyphId::new(gid as u16))
    }
}

/// Format 4: segment mapping to delta values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap4 {
    pub language: u16,
    pub end_code: Vec<u16>,
    pub start_code: Vec<u16>,
    pub id_delta: Vec<i16>,
    pub id_range_offsets: Vec<u16>,
    pub glyph_id_array: Vec<u16>,
}

impl Cmap4 {
    // format through rangeShift
    const HEADER_LEN: usize = 14;

    fn read(reader: &mut ByteReader, start: usize) -> Result<Self, ReadError> {
        let length = reader.read_u16()? as usize;
        let language = reader.read_u16()?;
        let seg_count = reader.read_u16()? as usize / 2;
        // searchRange, entrySelector, rangeShift
        reader.skip(6)?;
        let end_code = reader.read_array(seg_count)?;
        let _reserved_pad = reader.read_u16()?;
        let start_code = reader.read_array(seg_count)?;
        let id_delta = reader.read_array(seg_count)?;
        let id_range_offsets = reader.read_array(seg_count)?;
        // some fonts have a bogus length, so don't let it take us past the table
        let used = reader.position() - start;
        debug_assert!(used >= Self::HEADER_LEN);
        let available = length.min(used + reader.remaining());
        let glyph_id_array = reader.read_array(available.saturating_sub(used) / 2)?;
        Ok(Cmap4 {
            language,
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.end_code.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = *self.start_code.get(i)?;
            if codepoint < start_code {
                hi = i;
            } else if codepoint > *self.end_code.get(i)? {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    /// Does the final phase of glyph id lookup.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = *self.id_delta.get(index)? as i32;
        let range_offset = *self.id_range_offsets.get(index)? as usize;
        if range_offset == 0 {
            return Some(GlyphId::new((codepoint as i32 + delta) as u16));
        }
        let mut offset = range_offset / 2 + (codepoint - start_code) as usize;
        offset = offset.saturating_sub(self.id_range_offsets.len() - index);
        let gid = *self.glyph_id_array.get(offset)?;
        (gid != 0).then_some(GlyphId::new((gid as i32 + delta) as u16))
    }
}

/// Format 6: trimmed table mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap6 {
    pub language: u16,
    pub first_code: u16,
    pub glyph_id_array: Vec<u16>,
}

impl Cmap6 {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;
        let first_code = reader.read_u16()?;
        let entry_count = reader.read_u16()? as usize;
        let glyph_id_array = reader.read_array(entry_count)?;
        Ok(Cmap6 {
            language,
            first_code,
            glyph_id_array,
        })
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let idx = codepoint.into().checked_sub(self.first_code as u32)?;
        self.glyph_id_array
            .get(idx as usize)
            .map(|gid| GlyphId::new(*gid))
    }
}

/// Format 12: segmented coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap12 {
    pub language: u32,
    pub groups: Vec<SequentialMapGroup>,
}

/// A run of consecutive codepoints mapped to consecutive glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl SequentialMapGroup {
    /// The codepoints covered by this group.
    pub fn char_codes(&self) -> RangeInclusive<u32> {
        self.start_char_code..=self.end_char_code
    }
}

impl Cmap12 {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let _reserved = reader.read_u16()?;
        let _length = reader.read_u32()?;
        let language = reader.read_u32()?;
        let num_groups = reader.read_u32()? as usize;
        // each group is 12 bytes
        if num_groups.saturating_mul(12) > reader.remaining() {
            return Err(ReadError::TableOverrun(Cmap::TAG));
        }
        let groups = (0..num_groups)
            .map(|_| {
                Ok(SequentialMapGroup {
                    start_char_code: reader.read_u32()?,
                    end_char_code: reader.read_u32()?,
                    start_glyph_id: reader.read_u32()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        Ok(Cmap12 { language, groups })
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let mut lo = 0;
        let mut hi = self.groups.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let group = self.groups.get(i)?;
            if codepoint < group.start_char_code {
                hi = i;
            } else if codepoint > group.end_char_code {
                lo = i + 1;
            } else {
                return Some(GlyphId::new(
                    group
                        .start_glyph_id
                        .wrapping_add(codepoint.wrapping_sub(group.start_char_code))
                        as u16,
                ));
            }
        }
        None
    }
}

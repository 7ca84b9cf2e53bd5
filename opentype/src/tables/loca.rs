//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use types::{GlyphId, Tag};

use super::{head::Head, maxp::Maxp};
use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The [loca] table.
///
/// Offsets are stored decoded: short offsets have already been multiplied
/// by two. There is one more offset than there are glyphs.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Loca {
    offsets: Vec<u32>,
    is_long: bool,
}

impl Loca {
    /// The number of glyphs with an entry in the table.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if the table stores 32-bit offsets.
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    /// The offset into `glyf` at index `idx`.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        self.offsets.get(idx).copied()
    }

    /// All offsets, including the trailing end offset.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// The range of `glyf` holding the data for `gid`.
    ///
    /// The range may be empty, for glyphs with no outline.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<Range<u32>, ReadError> {
        let idx = gid.to_u16() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::InvalidGlyphId(gid))?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::InvalidGlyphId(gid))?;
        Ok(start..end)
    }
}

impl FontTable for Loca {
    const TAG: Tag = Tag::new(b"loca");
    const DEPENDENCIES: &'static [Tag] = &[Head::TAG, Maxp::TAG];

    fn read_table(reader: &mut ByteReader<'_>, deps: &Dependencies) -> Result<Self, ReadError> {
        let head = deps.get::<Head>()?;
        let num_glyphs = deps.get::<Maxp>()?.num_glyphs as usize;
        let count = num_glyphs + 1;
        let (offsets, is_long) = match head.index_to_loc_format {
            0 => {
                let short = reader.read_array::<u16>(count)?;
                (short.into_iter().map(|off| off as u32 * 2).collect(), false)
            }
            1 => (reader.read_array::<u32>(count)?, true),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        if reader.remaining() > 0 {
            log::debug!("{} unused bytes at the end of 'loca'", reader.remaining());
        }
        Ok(Loca { offsets, is_long })
    }
}

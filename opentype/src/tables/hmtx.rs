//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{GlyphId, Tag};

use super::{hhea::Hhea, maxp::Maxp};
use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Hmtx {
    /// Paired advance width and left side bearing values for each glyph.
    pub h_metrics: Vec<LongMetric>,
    /// Left side bearings for glyph IDs greater than or equal to
    /// `h_metrics.len()`.
    pub left_side_bearings: Vec<i16>,
}

/// An advance paired with a side bearing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LongMetric {
    pub advance_width: u16,
    /// Left side bearing.
    pub lsb: i16,
}

impl Hmtx {
    /// The advance width for `gid`.
    ///
    /// Glyphs past the end of the long metrics share the last advance.
    pub fn advance(&self, gid: GlyphId) -> Option<u16> {
        self.h_metrics
            .get(gid.to_u16() as usize)
            .or_else(|| self.h_metrics.last())
            .map(|metric| metric.advance_width)
    }

    /// The left side bearing for `gid`.
    pub fn side_bearing(&self, gid: GlyphId) -> Option<i16> {
        let idx = gid.to_u16() as usize;
        match self.h_metrics.get(idx) {
            Some(metric) => Some(metric.lsb),
            None => self
                .left_side_bearings
                .get(idx - self.h_metrics.len())
                .copied(),
        }
    }
}

impl FontTable for Hmtx {
    const TAG: Tag = Tag::new(b"hmtx");
    const DEPENDENCIES: &'static [Tag] = &[Hhea::TAG, Maxp::TAG];

    fn read_table(reader: &mut ByteReader<'_>, deps: &Dependencies) -> Result<Self, ReadError> {
        let number_of_h_metrics = deps.get::<Hhea>()?.number_of_h_metrics as usize;
        let num_glyphs = deps.get::<Maxp>()?.num_glyphs as usize;
        let h_metrics = (0..number_of_h_metrics)
            .map(|_| {
                Ok(LongMetric {
                    advance_width: reader.read_u16()?,
                    lsb: reader.read_i16()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        let left_side_bearings = reader.read_array(num_glyphs.saturating_sub(number_of_h_metrics))?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }
}

#[cfg(test)]
mod tests {
    use opentype_test_data::bebuffer::BeBuffer;

    use super::*;
    use crate::test_helpers::{decode, deps};
    use crate::Table;

    fn hmtx_deps(number_of_h_metrics: u16, num_glyphs: u16) -> Dependencies {
        let hhea = Hhea {
            number_of_h_metrics,
            ..Default::default()
        };
        let maxp = Maxp {
            version: types::Version16Dot16::VERSION_0_5,
            num_glyphs,
            truetype_limits: None,
        };
        deps([Table::Hhea(hhea), Table::Maxp(maxp)])
    }

    #[test]
    fn trailing_side_bearings() {
        // one long metric, two more glyphs with only bearings
        let buf = BeBuffer::new()
            .push(500u16)
            .push(20i16)
            .extend([-10i16, 30]);
        let hmtx: Hmtx = decode(&buf, &hmtx_deps(1, 3)).unwrap();
        assert_eq!(hmtx.h_metrics.len(), 1);
        assert_eq!(hmtx.left_side_bearings, [-10, 30]);
        assert_eq!(hmtx.advance(GlyphId::new(0)), Some(500));
        assert_eq!(hmtx.advance(GlyphId::new(2)), Some(500));
        assert_eq!(hmtx.side_bearing(GlyphId::new(0)), Some(20));
        assert_eq!(hmtx.side_bearing(GlyphId::new(2)), Some(30));
        assert_eq!(hmtx.side_bearing(GlyphId::new(3)), None);
    }

    #[test]
    fn more_metrics_than_glyphs() {
        let buf = BeBuffer::new().extend([500u16, 0, 600, 0]);
        let hmtx: Hmtx = decode(&buf, &hmtx_deps(2, 1)).unwrap();
        assert_eq!(hmtx.h_metrics.len(), 2);
        assert!(hmtx.left_side_bearings.is_empty());
    }

    #[test]
    fn truncated() {
        let buf = BeBuffer::new().extend([500u16, 0]);
        assert_eq!(
            decode::<Hmtx>(&buf, &hmtx_deps(2, 2)),
            Err(ReadError::TableOverrun(Hmtx::TAG))
        );
    }
}

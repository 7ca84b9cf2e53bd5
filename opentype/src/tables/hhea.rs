//! the [hhea (Horizontal Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The size of a version 1.0 `hhea` table.
pub const HHEA_LEN: usize = 36;

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Hhea {
    pub major_version: u16,
    pub minor_version: u16,
    /// Typographic ascent.
    pub ascender: i16,
    /// Typographic descent.
    pub descender: i16,
    /// Typographic line gap.
    pub line_gap: i16,
    /// Maximum advance width value in 'hmtx' table.
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    /// Max(lsb + (xMax - xMin)).
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    /// 0 for current format.
    pub metric_data_format: i16,
    /// Number of advance widths in the 'hmtx' table.
    pub number_of_h_metrics: u16,
}

impl FontTable for Hhea {
    const TAG: Tag = Tag::new(b"hhea");

    fn read_table(reader: &mut ByteReader<'_>, _: &Dependencies) -> Result<Self, ReadError> {
        let major_version = reader.read_u16()?;
        let minor_version = reader.read_u16()?;
        let ascender = reader.read_i16()?;
        let descender = reader.read_i16()?;
        let line_gap = reader.read_i16()?;
        let advance_width_max = reader.read_u16()?;
        let min_left_side_bearing = reader.read_i16()?;
        let min_right_side_bearing = reader.read_i16()?;
        let x_max_extent = reader.read_i16()?;
        let caret_slope_rise = reader.read_i16()?;
        let caret_slope_run = reader.read_i16()?;
        let caret_offset = reader.read_i16()?;
        // four reserved int16 fields
        reader.skip(8)?;
        let metric_data_format = reader.read_i16()?;
        let number_of_h_metrics = reader.read_u16()?;
        Ok(Hhea {
            major_version,
            minor_version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use opentype_test_data::hhea;

    use super::*;
    use crate::test_helpers::decode;

    #[test]
    fn decode_scenario() {
        let hhea: Hhea = decode(hhea::SIMPLE, &Default::default()).unwrap();
        assert_eq!((hhea.major_version, hhea.minor_version), (1, 0));
        assert_eq!(hhea.ascender, 100);
        assert_eq!(hhea.descender, -100);
        assert_eq!(hhea.line_gap, 0);
        assert_eq!(hhea.advance_width_max, 750);
        assert_eq!(hhea.min_left_side_bearing, -200);
        assert_eq!(hhea.min_right_side_bearing, 0);
        assert_eq!(hhea.x_max_extent, 750);
        assert_eq!(hhea.caret_slope_rise, 0);
        assert_eq!(hhea.caret_slope_run, 0);
        assert_eq!(hhea.number_of_h_metrics, 5);
    }

    #[test]
    fn reserved_fields_are_ignored() {
        let mut bytes = hhea::SIMPLE.to_vec();
        bytes[24..32].copy_from_slice(&[0xFF; 8]);
        let hhea: Hhea = decode(&bytes, &Default::default()).unwrap();
        assert_eq!(hhea.number_of_h_metrics, 5);
    }

    #[test]
    fn truncated() {
        assert_eq!(
            decode::<Hhea>(&hhea::SIMPLE[..HHEA_LEN - 1], &Default::default()),
            Err(ReadError::TableOverrun(Hhea::TAG))
        );
    }

    #[test]
    fn wrong_tag() {
        let record = crate::TableRecord::new(Tag::new(b"vhea"), 0, 0, HHEA_LEN as u32);
        let reader = crate::FontData::new(hhea::SIMPLE).reader();
        assert_eq!(
            Hhea::decode(&reader, &record, &Default::default()),
            Err(ReadError::TagMismatch {
                expected: Hhea::TAG,
                found: Tag::new(b"vhea")
            })
        );
    }
}

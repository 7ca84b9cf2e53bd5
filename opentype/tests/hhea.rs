//! Decoding `hhea` from complete fonts and arbitrary offsets.

use opentype::tables::hhea::{Hhea, HHEA_LEN};
use opentype::types::Tag;
use opentype::{FontData, FontTable, ReadError, TableRecord};
use opentype_test_data::hhea::SIMPLE;
use pretty_assertions::assert_eq;

/// Write `hhea` back out in its on-disk layout.
fn encode(hhea: &Hhea) -> Vec<u8> {
    let mut out = Vec::with_capacity(HHEA_LEN);
    out.extend(hhea.major_version.to_be_bytes());
    out.extend(hhea.minor_version.to_be_bytes());
    for value in [
        hhea.ascender,
        hhea.descender,
        hhea.line_gap,
    ] {
        out.extend(value.to_be_bytes());
    }
    out.extend(hhea.advance_width_max.to_be_bytes());
    for value in [
        hhea.min_left_side_bearing,
        hhea.min_right_side_bearing,
        hhea.x_max_extent,
        hhea.caret_slope_rise,
        hhea.caret_slope_run,
        hhea.caret_offset,
    ] {
        out.extend(value.to_be_bytes());
    }
    out.extend([0u8; 8]);
    out.extend(hhea.metric_data_format.to_be_bytes());
    out.extend(hhea.number_of_h_metrics.to_be_bytes());
    out
}

fn decode_at(data: &[u8], offset: u32) -> Result<Hhea, ReadError> {
    let record = TableRecord::new(Hhea::TAG, 0, offset, HHEA_LEN as u32);
    Hhea::decode(&FontData::new(data).reader(), &record, &Default::default())
}

#[test]
fn round_trip() {
    let hhea = decode_at(SIMPLE, 0).unwrap();
    assert_eq!(encode(&hhea), SIMPLE);
}

#[test]
fn decode_at_offset() {
    let mut data = vec![0xAB; 100];
    data.extend_from_slice(SIMPLE);
    data.extend([0xCD; 7]);
    let hhea = decode_at(&data, 100).unwrap();
    assert_eq!(hhea, decode_at(SIMPLE, 0).unwrap());
    assert_eq!(hhea.number_of_h_metrics, 5);
}

#[test]
fn record_past_end_of_data() {
    let mut data = vec![0; 100];
    data.extend_from_slice(&SIMPLE[..20]);
    assert!(decode_at(&data, 100).is_err());
}

#[test]
fn short_record() {
    let record = TableRecord::new(Tag::new(b"hhea"), 0, 0, 30);
    assert_eq!(
        Hhea::decode(&FontData::new(SIMPLE).reader(), &record, &Default::default()),
        Err(ReadError::TableOverrun(Tag::new(b"hhea")))
    );
}

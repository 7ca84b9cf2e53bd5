//! Tests against complete font files.

use std::sync::{Arc, Barrier};

use opentype::tables::glyf::{Anchor, CurvePoint, GlyphDescription};
use opentype::types::{GlyphId, NameId, Tag};
use opentype::{Font, FontOptions, ReadError, Table, TableProvider};
use opentype_test_data::{font::simple_font, FontBuilder};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn simple() -> Font {
    init_logging();
    opentype::parse(simple_font()).unwrap()
}

#[test]
fn metadata() {
    let font = simple();
    assert_eq!(font.head().unwrap().units_per_em, 1000);
    assert_eq!(font.num_glyphs(), Ok(5));
    assert_eq!(font.hhea().unwrap().ascender, 100);
    assert_eq!(font.family_name().unwrap().as_deref(), Some("Test Sans"));
    assert_eq!(font.full_name().unwrap().as_deref(), Some("Test Sans Regular"));
    assert_eq!(
        font.name_string(NameId::SUBFAMILY_NAME).unwrap().as_deref(),
        Some("Regular")
    );
}

#[test]
fn character_map() {
    let font = simple();
    assert_eq!(font.map_codepoint(' '), Ok(Some(GlyphId::new(1))));
    assert_eq!(font.map_codepoint('C'), Ok(Some(GlyphId::new(4))));
    assert_eq!(font.map_codepoint('z'), Ok(None));
}

#[test]
fn metrics() {
    let font = simple();
    for (gid, (advance, lsb)) in opentype_test_data::font::H_METRICS.iter().enumerate() {
        let gid = GlyphId::new(gid as u16);
        assert_eq!(font.advance_width(gid), Ok(*advance));
        assert_eq!(font.hmtx().unwrap().side_bearing(gid), Some(*lsb));
    }
    assert_eq!(
        font.advance_width(GlyphId::new(5)),
        Err(ReadError::InvalidGlyphId(GlyphId::new(5)))
    );
}

#[test]
fn simple_glyph() {
    let font = simple();
    let glyph = font.glyph(GlyphId::new(2)).unwrap().unwrap();
    assert_eq!(glyph.number_of_contours, 2);
    let GlyphDescription::Simple(simple) = &glyph.description else {
        panic!("expected a simple glyph");
    };
    assert_eq!(simple.end_pts_of_contours, [5, 9]);
    assert!(simple.instructions.is_empty());
    assert_eq!(simple.num_points(), 10);
    assert_eq!(simple.flags.len(), 10);
    assert_eq!(simple.x_coordinates.len(), 10);
    assert_eq!(simple.y_coordinates.len(), 10);
    assert_eq!(simple.contours().collect::<Vec<_>>(), [0..6, 6..10]);
    let points = simple.points().collect::<Vec<_>>();
    assert_eq!(points[3], CurvePoint::off_curve(50, 150));
    assert_eq!(points[9], CurvePoint::on_curve(-16, 1000));
}

#[test]
fn composite_glyph() {
    let font = simple();
    let glyph = font.glyph(GlyphId::new(4)).unwrap().unwrap();
    let composite = glyph.as_composite().unwrap();
    let targets = composite
        .components
        .iter()
        .map(|component| component.glyph_index)
        .collect::<Vec<_>>();
    assert_eq!(targets, [GlyphId::new(0), GlyphId::new(3)]);
    assert_eq!(composite.components[1].anchor, Anchor::Offset { x: 300, y: -20 });
    // components are not resolved, but they can be looked up
    for gid in targets {
        assert!(font.glyph(gid).unwrap().is_some());
    }
}

#[test]
fn empty_glyph() {
    let font = simple();
    assert_eq!(font.glyph(GlyphId::new(1)), Ok(None));
}

#[test]
fn tables_are_shared() {
    let font = simple();
    let first = font.table(Tag::new(b"glyf")).unwrap();
    let second = font.table(Tag::new(b"glyf")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);

    let glyph = font.glyph(GlyphId::new(0)).unwrap().unwrap();
    assert!(Arc::ptr_eq(&glyph, &font.glyph(GlyphId::new(0)).unwrap().unwrap()));
}

#[test]
fn dependencies_are_decoded_first() {
    let font = simple();
    assert!(font.decoded_tables().is_empty());
    let glyf = font.table(Tag::new(b"glyf")).unwrap();
    assert_eq!(glyf.tag(), Tag::new(b"glyf"));
    assert_eq!(
        font.decoded_tables(),
        [
            Tag::new(b"glyf"),
            Tag::new(b"head"),
            Tag::new(b"loca"),
            Tag::new(b"maxp")
        ]
    );
    // the cached loca is the one glyf was built from
    let Table::Glyf(glyf) = glyf.as_ref() else {
        panic!("wrong table variant");
    };
    assert_eq!(glyf.num_glyphs(), font.maxp().unwrap().num_glyphs);
}

#[test]
fn missing_tables() {
    let font = simple();
    assert_eq!(
        font.table(Tag::new(b"GSUB")),
        Err(ReadError::NotPresent(Tag::new(b"GSUB")))
    );

    let font = Font::new(
        FontBuilder::new()
            .add_raw(Tag::new(b"head"), Vec::from(opentype_test_data::head::with_loca_format(0)))
            .add_raw(Tag::new(b"loca"), vec![0, 0, 0, 0])
            .add_raw(Tag::new(b"kern"), vec![0; 8])
            .build(),
    )
    .unwrap();
    assert_eq!(
        font.loca().unwrap_err(),
        ReadError::NotPresent(Tag::new(b"maxp"))
    );
    assert_eq!(
        font.table(Tag::new(b"kern")),
        Err(ReadError::UnsupportedTable(Tag::new(b"kern")))
    );
    // head still decodes
    assert!(font.head().is_ok());
}

#[test]
fn malformed_directory() {
    let mut data = simple_font();
    // claim one more table than the directory holds, and truncate the data
    // so the extra record cannot fit
    data[5] += 1;
    data.truncate(12 + 8 * 16 + 4);
    let err = Font::new(data).unwrap_err();
    assert!(err.is_malformed_directory(), "{err:?}");
}

#[test]
fn unknown_sfnt_version() {
    let mut data = simple_font();
    data[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert!(matches!(
        Font::new(data),
        Err(ReadError::MalformedDirectory(_))
    ));
}

#[test]
fn checksums() {
    let mut data = simple_font();
    let font = Font::new(data.clone()).unwrap();
    let hhea = font.directory().find(Tag::new(b"hhea")).unwrap();
    let options = FontOptions {
        verify_checksums: true,
        ..Default::default()
    };
    assert!(Font::with_options(data.clone(), options.clone()).is_ok());

    data[hhea.offset as usize + 4] ^= 0xFF;
    assert!(Font::new(data.clone()).is_ok());
    assert_eq!(
        Font::with_options(data, options).unwrap_err(),
        ReadError::ChecksumMismatch(Tag::new(b"hhea"))
    );
}

#[test]
fn concurrent_first_access() {
    const THREADS: usize = 8;
    let font = simple();
    let barrier = Barrier::new(THREADS);
    let (font, barrier) = (&font, &barrier);
    let results = std::thread::scope(|scope| {
        let handles = (0..THREADS)
            .map(|i| {
                scope.spawn(move || {
                    barrier.wait();
                    let glyph = font.glyph(GlyphId::new(2 + (i % 2) as u16)).unwrap();
                    (font.table(Tag::new(b"glyf")).unwrap(), glyph)
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    let (glyf, _) = &results[0];
    for (i, (table, glyph)) in results.iter().enumerate() {
        assert!(Arc::ptr_eq(glyf, table));
        let (_, same_glyph) = &results[i % 2];
        assert!(Arc::ptr_eq(
            glyph.as_ref().unwrap(),
            same_glyph.as_ref().unwrap()
        ));
    }
}

#[cfg(feature = "serde")]
#[test]
fn serialize_tables() {
    let font = simple();
    let head = font.table(Tag::new(b"head")).unwrap();
    let json = serde_json::to_value(head.as_ref()).unwrap();
    assert_eq!(json["Head"]["units_per_em"], 1000);
    let glyph = font.glyph(GlyphId::new(3)).unwrap().unwrap();
    let json = serde_json::to_string(glyph.as_ref()).unwrap();
    assert!(json.contains("\"number_of_contours\":1"));
}

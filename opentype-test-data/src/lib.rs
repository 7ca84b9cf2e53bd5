//! test data shared between the opentype crates.

pub mod bebuffer;
mod font_builder;

pub use font_builder::FontBuilder;

pub mod hhea {

    /// A 36-byte version 1.0 `hhea` table with five long metrics.
    #[rustfmt::skip]
    pub static SIMPLE: &[u8] = &[
        0x00, 0x01, 0x00, 0x00, // version 1.0
        0x00, 0x64,             // ascender 100
        0xFF, 0x9C,             // descender -100
        0x00, 0x00,             // lineGap 0
        0x02, 0xEE,             // advanceWidthMax 750
        0xFF, 0x38,             // minLeftSideBearing -200
        0x00, 0x00,             // minRightSideBearing 0
        0x02, 0xEE,             // xMaxExtent 750
        0x00, 0x00,             // caretSlopeRise 0
        0x00, 0x00,             // caretSlopeRun 0
        0x00, 0x00,             // caretOffset 0
        0x00, 0x00, 0x00, 0x00, // reserved
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,             // metricDataFormat 0
        0x00, 0x05,             // numberOfHMetrics 5
    ];
}

pub mod head {
    use crate::bebuffer::BeBuffer;

    /// A 54-byte `head` table with 1000 units per em and the given loca format.
    pub fn with_loca_format(index_to_loc_format: i16) -> BeBuffer {
        BeBuffer::new()
            .extend([1u16, 0]) // version 1.0
            .push(0x0001_0000u32) // fontRevision 1.0
            .push(0u32) // checksumAdjustment
            .push(0x5F0F_3CF5u32) // magicNumber
            .push(0u16) // flags
            .push(1000u16) // unitsPerEm
            .extend([0i64, 0]) // created, modified
            .extend([-16i16, 0, 450, 1000]) // xMin, yMin, xMax, yMax
            .push(0u16) // macStyle
            .push(8u16) // lowestRecPPEM
            .push(2i16) // fontDirectionHint
            .push(index_to_loc_format)
            .push(0i16) // glyphDataFormat
    }
}

pub mod maxp {
    use crate::bebuffer::BeBuffer;

    /// A version 0.5 `maxp` table.
    pub fn version_0_5(num_glyphs: u16) -> BeBuffer {
        BeBuffer::new().push(0x0000_5000u32).push(num_glyphs)
    }
}

pub mod glyf {

    /// Two contours of six and four points, one of them off curve.
    ///
    /// Absolute points: (0,0) (100,0) (100,100) (50,150)* (0,100) (0,50)
    /// and (200,0) (256,0) (256,1000) (-16,1000).
    #[rustfmt::skip]
    pub static TWO_CONTOURS: &[u8] = &[
        0x00, 0x02,             // numberOfContours 2
        0xFF, 0xF0, 0x00, 0x00, // xMin -16, yMin 0
        0x01, 0x00, 0x03, 0xE8, // xMax 256, yMax 1000
        0x00, 0x05, 0x00, 0x09, // endPtsOfContours [5, 9]
        0x00, 0x00,             // instructionLength 0
        // flags
        0x31, 0x33, 0x35, 0x26, 0x07, 0x15, 0x17, 0x33, 0x11, 0x21,
        // x coordinates
        0x64, 0x32, 0x32, 0xC8, 0x38, 0xFE, 0xF0,
        // y coordinates
        0x64, 0x32, 0x32, 0x32, 0x32, 0x03, 0xE8,
    ];

    /// A 400x700 rectangle with two bytes of instructions and one byte of
    /// padding.
    #[rustfmt::skip]
    pub static NOTDEF: &[u8] = &[
        0x00, 0x01,             // numberOfContours 1
        0x00, 0x32, 0x00, 0x00, // xMin 50, yMin 0
        0x01, 0xC2, 0x02, 0xBC, // xMax 450, yMax 700
        0x00, 0x03,             // endPtsOfContours [3]
        0x00, 0x02,             // instructionLength 2
        0xB0, 0x01,             // PUSHB[0] 1
        0x33, 0x21, 0x11, 0x21, // flags
        0x32, 0x01, 0x90, 0xFE, 0x70, // x coordinates
        0x02, 0xBC,             // y coordinates
        0x00,                   // padding
    ];

    /// Four on-curve points along the x axis, using a repeated flag.
    #[rustfmt::skip]
    pub static RULE: &[u8] = &[
        0x00, 0x01,             // numberOfContours 1
        0x00, 0x0A, 0x00, 0x00, // xMin 10, yMin 0
        0x00, 0x28, 0x00, 0x00, // xMax 40, yMax 0
        0x00, 0x03,             // endPtsOfContours [3]
        0x00, 0x00,             // instructionLength 0
        0x3B, 0x03,             // flags, repeated three times
        0x0A, 0x0A, 0x0A, 0x0A, // x coordinates
    ];

    /// Two components: glyph 0 scaled by half and offset by (5, -3), then
    /// glyph 3 offset by (300, -20), followed by one instruction.
    #[rustfmt::skip]
    pub static COMPOSITE: &[u8] = &[
        0xFF, 0xFF,             // numberOfContours -1
        0x00, 0x0A, 0x00, 0x00, // xMin 10, yMin 0
        0x01, 0xC2, 0x02, 0xBC, // xMax 450, yMax 700
        0x00, 0x2E,             // ARGS_ARE_XY_VALUES | ROUND_XY_TO_GRID | WE_HAVE_A_SCALE | MORE_COMPONENTS
        0x00, 0x00,             // glyphIndex 0
        0x05, 0xFD,             // (5, -3)
        0x20, 0x00,             // scale 0.5
        0x01, 0x03,             // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | WE_HAVE_INSTRUCTIONS
        0x00, 0x03,             // glyphIndex 3
        0x01, 0x2C, 0xFF, 0xEC, // (300, -20)
        0x00, 0x01, 0x2F,       // one instruction
        0x00,                   // padding
    ];

    /// One component positioned by matching point 3 to point 7.
    #[rustfmt::skip]
    pub static POINT_ANCHOR: &[u8] = &[
        0xFF, 0xFF,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,             // no flags
        0x00, 0x02,             // glyphIndex 2
        0x03, 0x07,             // points 3 and 7
    ];

    /// One component with an identity 2x2 transform.
    #[rustfmt::skip]
    pub static TWO_BY_TWO: &[u8] = &[
        0xFF, 0xFF,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x82,             // WE_HAVE_A_TWO_BY_TWO | ARGS_ARE_XY_VALUES
        0x00, 0x01,             // glyphIndex 1
        0x01, 0x02,             // (1, 2)
        0x40, 0x00, 0x00, 0x00, // xx 1.0, yx 0
        0x00, 0x00, 0x40, 0x00, // xy 0, yy 1.0
    ];
}

pub mod cmap {
    use crate::bebuffer::BeBuffer;

    /// A `cmap` with one Windows BMP subtable in format 4, mapping
    /// ' ' to glyph 1 and 'A'..='C' to glyphs 2..=4.
    pub fn simple_cmap() -> BeBuffer {
        BeBuffer::new()
            .extend([0u16, 1]) // version, numTables
            .extend([3u16, 1]) // platform, encoding
            .push(12u32) // subtableOffset
            .extend([4u16, 40, 0]) // format, length, language
            .extend([6u16, 4, 1, 2]) // segCountX2, searchRange, entrySelector, rangeShift
            .extend([0x20u16, 0x43, 0xFFFF]) // endCode
            .push(0u16) // reservedPad
            .extend([0x20u16, 0x41, 0xFFFF]) // startCode
            .extend([-31i16, -63, 1]) // idDelta
            .extend([0u16, 0, 0]) // idRangeOffsets
    }

    /// A format 4 subtable where 0x30..=0x32 are mapped through the glyph id
    /// array `[10, 0, 12]` with a delta of 1.
    pub fn cmap4_with_glyph_ids() -> BeBuffer {
        BeBuffer::new()
            .extend([4u16, 38, 0]) // format, length, language
            .extend([4u16, 4, 1, 0]) // segCountX2, searchRange, entrySelector, rangeShift
            .extend([0x32u16, 0xFFFF]) // endCode
            .push(0u16) // reservedPad
            .extend([0x30u16, 0xFFFF]) // startCode
            .extend([1i16, 1]) // idDelta
            .extend([4u16, 0]) // idRangeOffsets
            .extend([10u16, 0, 12]) // glyphIdArray
    }
}

pub mod name {
    use crate::bebuffer::BeBuffer;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    /// A format 0 `name` with a Windows family and subfamily name and a
    /// Mac Roman full name.
    pub fn simple_name() -> BeBuffer {
        BeBuffer::new()
            .extend([0u16, 3, 42]) // format, count, storageOffset
            .extend([3u16, 1, 0x409, 1, 18, 0])
            .extend([3u16, 1, 0x409, 2, 14, 18])
            .extend([1u16, 0, 0, 4, 17, 32])
            .extend(utf16("Test Sans"))
            .extend(utf16("Regular"))
            .extend(*b"Test Sans Regular")
    }
}

pub mod font {
    use opentype_types::Tag;

    use crate::bebuffer::BeBuffer;
    use crate::FontBuilder;

    /// Advance and left side bearing for each glyph in [`simple_font`].
    pub const H_METRICS: [(u16, i16); 5] = [(500, 50), (250, 0), (600, -16), (300, 10), (600, 10)];

    /// A complete five glyph TrueType font.
    ///
    /// Glyph 0 is [`NOTDEF`](crate::glyf::NOTDEF), glyph 1 is empty, glyph 2
    /// is [`TWO_CONTOURS`](crate::glyf::TWO_CONTOURS), glyph 3 is
    /// [`RULE`](crate::glyf::RULE) and glyph 4 is
    /// [`COMPOSITE`](crate::glyf::COMPOSITE). The `cmap` maps ' ' and
    /// 'A'..='C' to glyphs 1..=4.
    pub fn simple_font() -> Vec<u8> {
        let glyf = BeBuffer::new()
            .extend(crate::glyf::NOTDEF.iter().copied())
            .extend(crate::glyf::TWO_CONTOURS.iter().copied())
            .extend(crate::glyf::RULE.iter().copied())
            .extend(crate::glyf::COMPOSITE.iter().copied());
        let loca = BeBuffer::new().extend([0u16, 14, 14, 34, 44, 59]);
        let hmtx = H_METRICS
            .iter()
            .fold(BeBuffer::new(), |buf, (advance, lsb)| buf.push(*advance).push(*lsb));
        FontBuilder::new()
            .add_raw(Tag::new(b"head"), Vec::from(crate::head::with_loca_format(0)))
            .add_raw(Tag::new(b"hhea"), crate::hhea::SIMPLE)
            .add_raw(Tag::new(b"maxp"), Vec::from(crate::maxp::version_0_5(5)))
            .add_raw(Tag::new(b"loca"), Vec::from(loca))
            .add_raw(Tag::new(b"glyf"), Vec::from(glyf))
            .add_raw(Tag::new(b"hmtx"), Vec::from(hmtx))
            .add_raw(Tag::new(b"cmap"), Vec::from(crate::cmap::simple_cmap()))
            .add_raw(Tag::new(b"name"), Vec::from(crate::name::simple_name()))
            .build()
    }
}

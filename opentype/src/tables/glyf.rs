//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use std::ops::Range;

use types::{BoundingBox, F2Dot14, GlyphId, Point, Tag};

use super::{loca::Loca, maxp::Maxp};
use crate::{table::Dependencies, ByteReader, FontData, FontTable, ReadError, TableRecord};

/// The most bytes [`GlyphPadding::Lenient`] accepts after a simple glyph.
pub const MAX_GLYPH_PADDING: usize = 3;

/// The bytes allowed between the end of a simple glyph's point data and the
/// end of its `loca` range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlyphPadding {
    /// Nothing, or the single zero byte that gives the glyph an even length.
    #[default]
    Strict,
    /// Up to [`MAX_GLYPH_PADDING`] bytes of any value.
    Lenient,
}

impl GlyphPadding {
    fn check(self, consumed: usize, padding: &[u8]) -> Result<(), ReadError> {
        let ok = match self {
            GlyphPadding::Strict => match padding {
                [] => true,
                [0] => consumed % 2 == 1,
                _ => false,
            },
            GlyphPadding::Lenient => padding.len() <= MAX_GLYPH_PADDING,
        };
        if ok {
            Ok(())
        } else {
            log::debug!(
                "{} bytes left over after simple glyph ({self:?})",
                padding.len()
            );
            Err(ReadError::MalformedGlyph(
                "point data does not fill the glyph",
            ))
        }
    }
}

/// The `glyf` table.
///
/// Glyphs are decoded individually on request; this handle holds the
/// location of the table and the glyph offsets from `loca`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Glyf {
    record: TableRecord,
    loca: Loca,
    num_glyphs: u16,
}

impl Glyf {
    /// The directory record for this table.
    pub fn record(&self) -> &TableRecord {
        &self.record
    }

    /// The number of glyphs in the font, from `maxp`.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// Returns a record describing the bytes of a single glyph.
    ///
    /// The record's offset is relative to the start of the font data. Returns
    /// `None` for glyphs with no outline data.
    pub fn glyph_record(&self, gid: GlyphId) -> Result<Option<TableRecord>, ReadError> {
        if gid.to_u16() >= self.num_glyphs {
            return Err(ReadError::InvalidGlyphId(gid));
        }
        let range = self.loca.glyph_range(gid)?;
        if range.start == range.end {
            return Ok(None);
        }
        if range.start > range.end {
            return Err(ReadError::MalformedGlyph("loca offsets are not ascending"));
        }
        if range.end > self.record.length {
            return Err(ReadError::MalformedGlyph(
                "glyph data extends past the end of 'glyf'",
            ));
        }
        let offset = self
            .record
            .offset
            .checked_add(range.start)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(TableRecord::new(
            Self::TAG,
            0,
            offset,
            range.end - range.start,
        )))
    }

    /// Decode the glyph `gid` from the font data this table was read from.
    pub fn glyph(&self, data: FontData, gid: GlyphId) -> Result<Option<GlyphTable>, ReadError> {
        self.glyph_with_padding(data, gid, GlyphPadding::Strict)
    }

    /// Decode the glyph `gid`, accepting trailing bytes as `padding` allows.
    pub fn glyph_with_padding(
        &self,
        data: FontData,
        gid: GlyphId,
        padding: GlyphPadding,
    ) -> Result<Option<GlyphTable>, ReadError> {
        match self.glyph_record(gid)? {
            Some(record) => {
                GlyphTable::decode_with_padding(&data.reader(), &record, padding).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl FontTable for Glyf {
    const TAG: Tag = Tag::new(b"glyf");
    const DEPENDENCIES: &'static [Tag] = &[Loca::TAG, Maxp::TAG];

    fn read_table(reader: &mut ByteReader<'_>, deps: &Dependencies) -> Result<Self, ReadError> {
        let loca = deps.get::<Loca>()?.clone();
        let num_glyphs = deps.get::<Maxp>()?.num_glyphs;
        let end = loca.offsets().last().copied().unwrap_or_default() as usize;
        if end > reader.len() {
            log::warn!(
                "loca ends at {end} but 'glyf' is only {} bytes; trailing glyphs are unreadable",
                reader.len()
            );
        }
        let record = TableRecord::new(
            Self::TAG,
            0,
            reader.absolute_position() as u32,
            reader.len() as u32,
        );
        Ok(Glyf {
            record,
            loca,
            num_glyphs,
        })
    }
}

/// A single decoded glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlyphTable {
    /// Non-negative for simple glyphs, negative for composites.
    pub number_of_contours: i16,
    pub bounds: BoundingBox<i16>,
    pub description: GlyphDescription,
}

/// The outline data of a glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GlyphDescription {
    Simple(SimpleGlyphDescription),
    Composite(CompositeGlyphDescription),
}

impl GlyphTable {
    /// Decode the glyph described by `record`.
    ///
    /// `record` must have the `glyf` tag and locate exactly one glyph, as
    /// returned by [`Glyf::glyph_record`]. Any inconsistency in the glyph,
    /// including running out of data, is reported as
    /// [`ReadError::MalformedGlyph`].
    pub fn decode(reader: &ByteReader, record: &TableRecord) -> Result<Self, ReadError> {
        Self::decode_with_padding(reader, record, GlyphPadding::Strict)
    }

    /// Decode a glyph, accepting trailing bytes as `padding` allows.
    pub fn decode_with_padding(
        reader: &ByteReader,
        record: &TableRecord,
        padding: GlyphPadding,
    ) -> Result<Self, ReadError> {
        if record.tag != Glyf::TAG {
            return Err(ReadError::TagMismatch {
                expected: Glyf::TAG,
                found: record.tag,
            });
        }
        let mut reader = reader.for_record(record)?;
        Self::read(&mut reader, padding).map_err(|err| match err {
            ReadError::TableOverrun(_) | ReadError::OutOfBounds => {
                ReadError::MalformedGlyph("glyph data is truncated")
            }
            other => other,
        })
    }

    fn read(reader: &mut ByteReader, padding: GlyphPadding) -> Result<Self, ReadError> {
        let number_of_contours = reader.read_i16()?;
        let bounds = BoundingBox::new(
            reader.read_i16()?,
            reader.read_i16()?,
            reader.read_i16()?,
            reader.read_i16()?,
        );
        let description = if number_of_contours >= 0 {
            let simple = SimpleGlyphDescription::read(reader, number_of_contours as usize)?;
            let consumed = reader.position();
            padding.check(consumed, reader.read_bytes(reader.remaining())?)?;
            GlyphDescription::Simple(simple)
        } else {
            GlyphDescription::Composite(CompositeGlyphDescription::read(reader)?)
        };
        Ok(GlyphTable {
            number_of_contours,
            bounds,
            description,
        })
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.description, GlyphDescription::Composite(_))
    }

    pub fn as_simple(&self) -> Option<&SimpleGlyphDescription> {
        match &self.description {
            GlyphDescription::Simple(simple) => Some(simple),
            GlyphDescription::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeGlyphDescription> {
        match &self.description {
            GlyphDescription::Simple(_) => None,
            GlyphDescription::Composite(composite) => Some(composite),
        }
    }

    /// The TrueType instructions for this glyph.
    pub fn instructions(&self) -> &[u8] {
        match &self.description {
            GlyphDescription::Simple(simple) => &simple.instructions,
            GlyphDescription::Composite(composite) => &composite.instructions,
        }
    }
}

bitflags::bitflags! {
    /// Flags used in [`SimpleGlyphDescription`]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SimpleGlyphFlags: u8 {
        /// Bit 0: If set, the point is on the curve; otherwise, it is off
        /// the curve.
        const ON_CURVE_POINT = 0x01;
        /// Bit 1: If set, the corresponding x-coordinate is 1 byte long,
        /// and the sign is determined by
        /// X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR.
        const X_SHORT_VECTOR = 0x02;
        /// Bit 2: If set, the corresponding y-coordinate is 1 byte long,
        /// and the sign is determined by
        /// Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR.
        const Y_SHORT_VECTOR = 0x04;
        /// Bit 3: If set, the next byte specifies the number of additional
        /// times this flag byte is to be repeated in the logical flags array.
        const REPEAT_FLAG = 0x08;
        /// Bit 4: With X_SHORT_VECTOR set, the x delta is positive. Without
        /// it, the x coordinate is the same as the previous one.
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        /// Bit 5: With Y_SHORT_VECTOR set, the y delta is positive. Without
        /// it, the y coordinate is the same as the previous one.
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        /// Bit 6: If set, contours in the glyph description may overlap.
        const OVERLAP_SIMPLE = 0x40;
    }
}

bitflags::bitflags! {
    /// Flags used in [`Component`]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CompositeGlyphFlags: u16 {
        /// Bit 0: If this is set, the arguments are 16-bit (uint16 or int16);
        /// otherwise, they are bytes (uint8 or int8).
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        /// Bit 1: If this is set, the arguments are signed xy values;
        /// otherwise, they are unsigned point numbers.
        const ARGS_ARE_XY_VALUES = 0x0002;
        /// Bit 2: If set and ARGS_ARE_XY_VALUES is also set, the xy values
        /// are rounded to the nearest grid line.
        const ROUND_XY_TO_GRID = 0x0004;
        /// Bit 3: This indicates that there is a simple scale for the
        /// component.
        const WE_HAVE_A_SCALE = 0x0008;
        /// Bit 5: Indicates at least one more glyph after this one.
        const MORE_COMPONENTS = 0x0020;
        /// Bit 6: The x direction will use a different scale from the y
        /// direction.
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        /// Bit 7: There is a 2 by 2 transformation that will be used to
        /// scale the component.
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        /// Bit 8: Following the last component are instructions for the
        /// composite character.
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        /// Bit 9: Use the metrics of this component for the composite.
        const USE_MY_METRICS = 0x0200;
        /// Bit 10: The components of the compound glyph overlap.
        const OVERLAP_COMPOUND = 0x0400;
        /// Bit 11: The composite is designed to have the component offset
        /// scaled.
        const SCALED_COMPONENT_OFFSET = 0x0800;
        /// Bit 12: The composite is designed not to have the component
        /// offset scaled.
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// The outline of a glyph made of contours.
///
/// Coordinates are stored as they appear in the font: each is a delta from
/// the previous point, and the first is relative to the origin. Use
/// [`points`](Self::points) for absolute positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleGlyphDescription {
    /// The index of the last point of each contour.
    pub end_pts_of_contours: Vec<u16>,
    pub instructions: Vec<u8>,
    /// One entry per point, with run-length encoding expanded.
    pub flags: Vec<SimpleGlyphFlags>,
    pub x_coordinates: Vec<i16>,
    pub y_coordinates: Vec<i16>,
}

impl SimpleGlyphDescription {
    fn read(reader: &mut ByteReader, number_of_contours: usize) -> Result<Self, ReadError> {
        if number_of_contours == 0 {
            return Ok(Default::default());
        }
        let end_pts_of_contours: Vec<u16> = reader.read_array(number_of_contours)?;
        if end_pts_of_contours.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ReadError::MalformedGlyph(
                "contour end points are not in order",
            ));
        }
        let num_points = end_pts_of_contours
            .last()
            .map(|last| *last as usize + 1)
            .unwrap_or(0);
        let instruction_length = reader.read_u16()? as usize;
        let instructions = reader.read_bytes(instruction_length)?.to_vec();

        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag = SimpleGlyphFlags::from_bits_truncate(reader.read_u8()?);
            let repeats = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                reader.read_u8()? as usize + 1
            } else {
                1
            };
            if flags.len() + repeats > num_points {
                return Err(ReadError::MalformedGlyph(
                    "flag repeat count exceeds the number of points",
                ));
            }
            let flag = flag - SimpleGlyphFlags::REPEAT_FLAG;
            flags.extend(std::iter::repeat(flag).take(repeats));
        }

        let x_coordinates = read_deltas(
            reader,
            &flags,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?;
        let y_coordinates = read_deltas(
            reader,
            &flags,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?;

        Ok(SimpleGlyphDescription {
            end_pts_of_contours,
            instructions,
            flags,
            x_coordinates,
            y_coordinates,
        })
    }

    /// Returns the total number of points.
    pub fn num_points(&self) -> usize {
        self.flags.len()
    }

    /// The range of point indices making up each contour.
    pub fn contours(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let mut start = 0;
        self.end_pts_of_contours.iter().map(move |end| {
            let range = start..*end as usize + 1;
            start = range.end;
            range
        })
    }

    /// Returns an iterator over the points in the glyph, in absolute
    /// coordinates.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        let mut x = 0i32;
        let mut y = 0i32;
        self.flags
            .iter()
            .zip(self.x_coordinates.iter().zip(&self.y_coordinates))
            .map(move |(flag, (dx, dy))| {
                x = x.wrapping_add(*dx as i32);
                y = y.wrapping_add(*dy as i32);
                CurvePoint::new(x, y, flag.contains(SimpleGlyphFlags::ON_CURVE_POINT))
            })
    }
}

fn read_deltas(
    reader: &mut ByteReader,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<Vec<i16>, ReadError> {
    flags
        .iter()
        .map(|flag| {
            match (flag.contains(short), flag.contains(same_or_positive)) {
                (true, true) => reader.read_u8().map(|delta| delta as i16),
                (true, false) => reader.read_u8().map(|delta| -(delta as i16)),
                (false, true) => Ok(0),
                (false, false) => reader.read_i16(),
            }
        })
        .collect()
}

/// Point with an associated on-curve flag in a simple glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, false)
    }

    /// The position of this point.
    pub fn point(&self) -> Point<i32> {
        Point::new(self.x, self.y)
    }
}

/// A glyph built from references to other glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeGlyphDescription {
    pub components: Vec<Component>,
    /// Instructions following the last component, if it has
    /// `WE_HAVE_INSTRUCTIONS` set.
    pub instructions: Vec<u8>,
}

impl CompositeGlyphDescription {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let mut components = Vec::new();
        let last_flags = loop {
            let component = Component::read(reader)?;
            let flags = component.flags;
            components.push(component);
            if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
                break flags;
            }
        };
        let instructions = if last_flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS) {
            let len = reader.read_u16()? as usize;
            reader.read_bytes(len)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(CompositeGlyphDescription {
            components,
            instructions,
        })
    }
}

/// A reference to another glyph. Part of [`CompositeGlyphDescription`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// The referenced glyph.
    pub glyph_index: GlyphId,
    /// The first argument as stored: an x offset or a point number.
    pub argument1: i32,
    /// The second argument as stored: a y offset or a point number.
    pub argument2: i32,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

impl Component {
    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let flags = CompositeGlyphFlags::from_bits_truncate(reader.read_u16()?);
        let glyph_index = reader.read::<GlyphId>()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: reader.read_i16()?,
                y: reader.read_i16()?,
            },
            (true, false) => Anchor::Offset {
                x: reader.read_i8()? as _,
                y: reader.read_i8()? as _,
            },
            (false, true) => Anchor::Point {
                base: reader.read_u16()?,
                component: reader.read_u16()?,
            },
            (false, false) => Anchor::Point {
                base: reader.read_u8()? as _,
                component: reader.read_u8()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = reader.read()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = reader.read()?;
            transform.yy = reader.read()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = reader.read()?;
            transform.yx = reader.read()?;
            transform.xy = reader.read()?;
            transform.yy = reader.read()?;
        }
        let (argument1, argument2) = match anchor {
            Anchor::Offset { x, y } => (x as i32, y as i32),
            Anchor::Point { base, component } => (base as i32, component as i32),
        };
        Ok(Component {
            flags,
            glyph_index,
            argument1,
            argument2,
            anchor,
            transform,
        })
    }
}

/// Anchor position for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Anchor {
    /// The component is offset by this amount.
    Offset { x: i16, y: i16 },
    /// A point in the composite is aligned with a point in the component.
    Point { base: u16, component: u16 },
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use opentype_test_data::{bebuffer::BeBuffer, glyf as data};
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode_glyph(bytes: &[u8]) -> Result<GlyphTable, ReadError> {
        let record = TableRecord::new(Glyf::TAG, 0, 0, bytes.len() as u32);
        GlyphTable::decode(&FontData::new(bytes).reader(), &record)
    }

    #[test]
    fn scenario_header() {
        // just the header, contour ends and instruction length
        let glyph = decode_glyph(&data::TWO_CONTOURS[..16]);
        // no room for the flags
        assert_eq!(glyph, Err(ReadError::MalformedGlyph("glyph data is truncated")));

        let glyph = decode_glyph(data::TWO_CONTOURS).unwrap();
        assert_eq!(glyph.number_of_contours, 2);
        assert_eq!(glyph.bounds, BoundingBox::new(-16, 0, 256, 1000));
        let simple = glyph.as_simple().unwrap();
        assert_eq!(simple.end_pts_of_contours, [5, 9]);
        assert_eq!(simple.num_points(), 10);
        assert!(simple.instructions.is_empty());
    }

    #[test]
    fn simple_points() {
        let glyph = decode_glyph(data::TWO_CONTOURS).unwrap();
        let simple = glyph.as_simple().unwrap();
        // stored as deltas
        assert_eq!(simple.x_coordinates, [0, 100, 0, -50, -50, 0, 200, 56, 0, -272]);
        assert_eq!(simple.y_coordinates, [0, 0, 100, 50, -50, -50, -50, 0, 1000, 0]);
        let points: Vec<_> = simple.points().collect();
        assert_eq!(
            points,
            [
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(100, 0),
                CurvePoint::on_curve(100, 100),
                CurvePoint::off_curve(50, 150),
                CurvePoint::on_curve(0, 100),
                CurvePoint::on_curve(0, 50),
                CurvePoint::on_curve(200, 0),
                CurvePoint::on_curve(256, 0),
                CurvePoint::on_curve(256, 1000),
                CurvePoint::on_curve(-16, 1000),
            ]
        );
        assert_eq!(simple.contours().collect::<Vec<_>>(), [0..6, 6..10]);
    }

    #[test]
    fn repeated_flags() {
        let glyph = decode_glyph(data::RULE).unwrap();
        let simple = glyph.as_simple().unwrap();
        assert_eq!(simple.num_points(), 4);
        assert!(simple
            .flags
            .iter()
            .all(|flag| !flag.contains(SimpleGlyphFlags::REPEAT_FLAG)));
        let xs: Vec<_> = simple.points().map(|p| p.x).collect();
        assert_eq!(xs, [10, 20, 30, 40]);
        assert!(simple.points().all(|p| p.y == 0 && p.on_curve));
    }

    #[test]
    fn padding_and_instructions() {
        let glyph = decode_glyph(data::NOTDEF).unwrap();
        assert_eq!(glyph.instructions(), &[0xB0, 0x01]);
        let points: Vec<_> = glyph.as_simple().unwrap().points().collect();
        assert_eq!(
            points,
            [
                CurvePoint::on_curve(50, 0),
                CurvePoint::on_curve(450, 0),
                CurvePoint::on_curve(450, 700),
                CurvePoint::on_curve(50, 700),
            ]
        );
    }

    fn decode_padded(bytes: &[u8], padding: GlyphPadding) -> Result<GlyphTable, ReadError> {
        let record = TableRecord::new(Glyf::TAG, 0, 0, bytes.len() as u32);
        GlyphTable::decode_with_padding(&FontData::new(bytes).reader(), &record, padding)
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = data::RULE.to_vec();
        bytes.extend([0xAA, 0xBB, 0xCC]);
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("point data does not fill the glyph"))
        );
        // RULE already has an even length, so even a zero byte is extra
        let mut bytes = data::RULE.to_vec();
        bytes.push(0);
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("point data does not fill the glyph"))
        );
    }

    #[test]
    fn even_length_padding() {
        // NOTDEF is padded from 27 to 28 bytes
        assert!(decode_glyph(data::NOTDEF).is_ok());
        let mut bytes = data::NOTDEF.to_vec();
        bytes[27] = 0xFF;
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("point data does not fill the glyph"))
        );
    }

    #[test]
    fn lenient_padding() {
        let mut bytes = data::RULE.to_vec();
        bytes.extend([0xAA, 0xBB, 0xCC]);
        let glyph = decode_padded(&bytes, GlyphPadding::Lenient).unwrap();
        assert_eq!(glyph.as_simple().unwrap().num_points(), 4);
        bytes.push(0);
        assert_eq!(
            decode_padded(&bytes, GlyphPadding::Lenient),
            Err(ReadError::MalformedGlyph("point data does not fill the glyph"))
        );
    }

    #[test]
    fn empty_glyph_with_trailing_bytes() {
        let bytes = BeBuffer::new().extend([0i16, 0, 0, 0, 0, 0x1234]);
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("point data does not fill the glyph"))
        );
    }

    #[test]
    fn repeat_overflows_points() {
        // one contour of two points, but the flag repeats three times
        let bytes = BeBuffer::new()
            .extend([1i16, 0, 0, 10, 10])
            .push(1u16) // endPts
            .push(0u16) // no instructions
            .extend([0x39u8, 2]) // on curve, x/y same, repeat
            .extend([0u8; 4]);
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph(
                "flag repeat count exceeds the number of points"
            ))
        );
    }

    #[test]
    fn end_points_out_of_order() {
        let bytes = BeBuffer::new()
            .extend([2i16, 0, 0, 10, 10])
            .extend([5u16, 3])
            .push(0u16)
            .extend([0x31u8; 6]);
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("contour end points are not in order"))
        );
    }

    #[test]
    fn empty_simple_glyph() {
        let bytes = BeBuffer::new().extend([0i16, 0, 0, 0, 0]);
        let glyph = decode_glyph(&bytes).unwrap();
        assert_eq!(glyph.as_simple().unwrap().num_points(), 0);
        assert_eq!(glyph.as_simple().unwrap().contours().count(), 0);
    }

    #[test]
    fn composite() {
        let glyph = decode_glyph(data::COMPOSITE).unwrap();
        assert!(glyph.is_composite());
        assert_eq!(glyph.number_of_contours, -1);
        let composite = glyph.as_composite().unwrap();
        assert_eq!(composite.components.len(), 2);

        let first = &composite.components[0];
        assert_eq!(first.glyph_index, GlyphId::new(0));
        assert_eq!(first.anchor, Anchor::Offset { x: 5, y: -3 });
        assert_eq!(first.transform.xx, F2Dot14::from_f32(0.5));
        assert_eq!(first.transform.yy, F2Dot14::from_f32(0.5));
        assert!(first.flags.contains(CompositeGlyphFlags::MORE_COMPONENTS));

        let second = &composite.components[1];
        assert_eq!(second.glyph_index, GlyphId::new(3));
        assert_eq!((second.argument1, second.argument2), (300, -20));
        assert_eq!(second.transform, Transform::default());
        assert_eq!(composite.instructions, [0x2F]);
    }

    #[test]
    fn composite_point_anchor() {
        let glyph = decode_glyph(data::POINT_ANCHOR).unwrap();
        let component = &glyph.as_composite().unwrap().components[0];
        assert_eq!(component.flags, CompositeGlyphFlags::empty());
        assert_eq!(component.glyph_index, GlyphId::new(2));
        assert_eq!(component.anchor, Anchor::Point { base: 3, component: 7 });
        assert_eq!((component.argument1, component.argument2), (3, 7));
        assert!(glyph.instructions().is_empty());
    }

    #[test]
    fn composite_two_by_two() {
        let glyph = decode_glyph(data::TWO_BY_TWO).unwrap();
        let component = &glyph.as_composite().unwrap().components[0];
        assert_eq!(component.anchor, Anchor::Offset { x: 1, y: 2 });
        assert_eq!(
            component.transform,
            Transform {
                xx: F2Dot14::ONE,
                yx: F2Dot14::ZERO,
                xy: F2Dot14::ZERO,
                yy: F2Dot14::ONE,
            }
        );
    }

    #[test]
    fn composite_without_end() {
        // every component claims there is another one
        let mut bytes = BeBuffer::new().extend([-1i16, 0, 0, 0, 0]);
        for _ in 0..4 {
            bytes = bytes.extend([0x0022u16, 1]).extend([0u8, 0]);
        }
        assert_eq!(
            decode_glyph(&bytes),
            Err(ReadError::MalformedGlyph("glyph data is truncated"))
        );
    }

    #[test]
    fn glyph_records() {
        use crate::tables::{head::Head, maxp::Maxp};
        use crate::test_helpers::{decode, decode_dep, deps};
        use crate::Table;

        let maxp = Maxp {
            version: types::Version16Dot16::VERSION_0_5,
            num_glyphs: 3,
            truetype_limits: None,
        };
        let head = decode_dep::<Head>(
            &opentype_test_data::head::with_loca_format(1),
            &Default::default(),
        );
        let loca = BeBuffer::new().extend([0u32, 20, 20, 60]);
        let loca = decode_dep::<Loca>(&loca, &deps([head, Table::Maxp(maxp.clone())]));
        // the last glyph claims bytes past the end of the table
        let bytes = BeBuffer::new()
            .extend(data::RULE.iter().copied())
            .extend([0u8; 20]);
        let glyf: Glyf = decode(&bytes, &deps([loca, Table::Maxp(maxp)])).unwrap();

        assert_eq!(glyf.num_glyphs(), 3);
        assert_eq!(
            glyf.glyph_record(GlyphId::new(0)),
            Ok(Some(TableRecord::new(Glyf::TAG, 0, 0, 20)))
        );
        assert_eq!(glyf.glyph_record(GlyphId::new(1)), Ok(None));
        assert_eq!(
            glyf.glyph_record(GlyphId::new(2)),
            Err(ReadError::MalformedGlyph(
                "glyph data extends past the end of 'glyf'"
            ))
        );
        assert_eq!(
            glyf.glyph_record(GlyphId::new(3)),
            Err(ReadError::InvalidGlyphId(GlyphId::new(3)))
        );
        let glyph = glyf
            .glyph(FontData::new(&bytes), GlyphId::new(0))
            .unwrap()
            .unwrap();
        assert_eq!(glyph.as_simple().unwrap().num_points(), 4);
        assert_eq!(glyf.glyph(FontData::new(&bytes), GlyphId::new(1)), Ok(None));
    }

    #[test]
    fn glyph_wrong_tag() {
        let record = TableRecord::new(Tag::new(b"loca"), 0, 0, 20);
        assert!(matches!(
            GlyphTable::decode(&FontData::new(data::RULE).reader(), &record),
            Err(ReadError::TagMismatch { .. })
        ));
    }
}

//! Traits and errors for interpreting font data

use types::{GlyphId, Tag};

use crate::font_data::ByteReader;
use crate::table::Dependencies;
use crate::table_directory::TableRecord;

/// A table that can be decoded from its record in the table directory.
///
/// Decoding is driven by the record: the decoder checks that the record's
/// tag matches [`Self::TAG`], positions the reader at `record.offset`, and
/// never reads past `record.offset + record.length`.
///
/// Tables whose layout depends on values found in other tables list those
/// tables in [`Self::DEPENDENCIES`]. The decoded dependencies are passed in
/// when the table is read; they are always decoded first.
pub trait FontTable: Sized {
    /// The tag identifying this table in the table directory.
    const TAG: Tag;

    /// The tables that must be decoded before this one.
    const DEPENDENCIES: &'static [Tag] = &[];

    /// Read the body of the table.
    ///
    /// `reader` starts at the first byte of the table and is limited to the
    /// table's extent.
    fn read_table(reader: &mut ByteReader<'_>, deps: &Dependencies) -> Result<Self, ReadError>;

    /// Decode this table from the record describing it.
    fn decode(
        reader: &ByteReader<'_>,
        record: &TableRecord,
        deps: &Dependencies,
    ) -> Result<Self, ReadError> {
        if record.tag != Self::TAG {
            return Err(ReadError::TagMismatch {
                expected: Self::TAG,
                found: record.tag,
            });
        }
        let mut table = reader.for_record(record)?;
        Self::read_table(&mut table, deps)
    }
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadError {
    /// A read went past the end of the font data.
    OutOfBounds,
    /// A seek targeted a position outside the readable range.
    InvalidOffset(usize),
    /// The table directory header or records are inconsistent.
    MalformedDirectory(&'static str),
    /// A decoder was handed a record for a different table.
    TagMismatch { expected: Tag, found: Tag },
    /// A decoder tried to read past the end of its table.
    TableOverrun(Tag),
    /// The data for a single glyph is inconsistent.
    MalformedGlyph(&'static str),
    /// The requested table is not in the table directory.
    NotPresent(Tag),
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    /// There is no decoder for this table.
    UnsupportedTable(Tag),
    InvalidGlyphId(GlyphId),
    DependencyCycle(Tag),
    ChecksumMismatch(Tag),
    MalformedData(&'static str),
}

impl ReadError {
    /// `true` if this error was produced while parsing the table directory.
    ///
    /// A font that fails with one of these errors cannot be opened at all.
    pub fn is_malformed_directory(&self) -> bool {
        matches!(self, ReadError::MalformedDirectory(_))
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidOffset(pos) => write!(f, "Invalid offset {pos}"),
            ReadError::MalformedDirectory(msg) => write!(f, "Malformed table directory: '{msg}'"),
            ReadError::TagMismatch { expected, found } => {
                write!(f, "Expected a '{expected}' record, found '{found}'")
            }
            ReadError::TableOverrun(tag) => write!(f, "Read past the end of the '{tag}' table"),
            ReadError::MalformedGlyph(msg) => write!(f, "Malformed glyph: '{msg}'"),
            ReadError::NotPresent(tag) => write!(f, "the '{tag}' table is missing"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::UnsupportedTable(tag) => write!(f, "the '{tag}' table is not supported"),
            ReadError::InvalidGlyphId(gid) => write!(f, "Glyph {gid} is out of range"),
            ReadError::DependencyCycle(tag) => {
                write!(f, "Dependency cycle while resolving '{tag}'")
            }
            ReadError::ChecksumMismatch(tag) => write!(f, "Checksum mismatch for '{tag}'"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}

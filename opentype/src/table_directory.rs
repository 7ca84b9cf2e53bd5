//! The [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)

use std::ops::Range;

use types::{Tag, KNOWN_SFNT_VERSIONS};

use crate::font_data::{ByteReader, FontData};
use crate::read::ReadError;

const HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const HEAD_TAG: Tag = Tag::new(b"head");
// offset of checksumAdjustment within 'head'
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// An entry in the table directory, locating a single table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum for the table.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Length of the table, in bytes.
    pub length: u32,
}

impl TableRecord {
    pub const fn new(tag: Tag, checksum: u32, offset: u32, length: u32) -> Self {
        TableRecord {
            tag,
            checksum,
            offset,
            length,
        }
    }

    /// The range of the font data occupied by this table.
    ///
    /// Returns `None` if `offset + length` overflows.
    pub fn byte_range(&self) -> Option<Range<usize>> {
        let start = self.offset as usize;
        start
            .checked_add(self.length as usize)
            .map(|end| start..end)
    }

    /// Check the stored checksum against the table's bytes in `data`.
    pub fn verify_checksum(&self, data: FontData) -> Result<(), ReadError> {
        verify_checksum(data, self)
    }

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(TableRecord {
            tag: reader.read_tag()?,
            checksum: reader.read_u32()?,
            offset: reader.read_u32()?,
            length: reader.read_u32()?,
        })
    }
}

/// The parsed header and records at the start of a font file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDirectory {
    sfnt_version: u32,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
    table_records: Vec<TableRecord>,
    // In principle, fonts are required to have a sorted table directory, but
    // certain fonts don't seem to follow that requirement.
    sorted: bool,
}

impl TableDirectory {
    /// Parse the table directory at the start of `data`.
    ///
    /// The sfnt version must be one of the known values, the records must
    /// fit in the data, and every record must describe a byte range inside
    /// the data. The binary search fields are only advisory: if they
    /// disagree with the table count the directory is still accepted.
    pub fn parse(data: FontData) -> Result<Self, ReadError> {
        if data.len() < HEADER_LEN {
            return Err(ReadError::MalformedDirectory("header is truncated"));
        }
        let mut reader = data.reader();
        let sfnt_version = reader.read_u32()?;
        if !KNOWN_SFNT_VERSIONS.contains(&sfnt_version) {
            log::debug!("unknown sfnt version 0x{sfnt_version:08X}");
            return Err(ReadError::MalformedDirectory("unknown sfnt version"));
        }
        let num_tables = reader.read_u16()?;
        let search_range = reader.read_u16()?;
        let entry_selector = reader.read_u16()?;
        let range_shift = reader.read_u16()?;

        let records_len = num_tables as usize * TABLE_RECORD_LEN;
        if reader.remaining() < records_len {
            return Err(ReadError::MalformedDirectory(
                "table records extend past the end of the data",
            ));
        }

        let expected = SearchRange::compute(num_tables as usize, TABLE_RECORD_LEN);
        if (search_range, entry_selector, range_shift)
            != (
                expected.search_range,
                expected.entry_selector,
                expected.range_shift,
            )
        {
            log::debug!(
                "table directory search fields ({search_range}, {entry_selector}, {range_shift}) \
                 disagree with {num_tables} tables"
            );
        }

        let mut table_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let record = TableRecord::read(&mut reader)?;
            match record.byte_range() {
                Some(range) if range.end <= data.len() => (),
                _ => {
                    log::warn!(
                        "'{}' record ({} bytes at {}) lies outside the font data ({} bytes)",
                        record.tag,
                        record.length,
                        record.offset,
                        data.len()
                    );
                    return Err(ReadError::MalformedDirectory(
                        "table record lies outside the font data",
                    ));
                }
            }
            table_records.push(record);
        }

        let sorted = table_records.windows(2).all(|w| w[0].tag < w[1].tag);

        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            table_records,
            sorted,
        })
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// The number of table records.
    pub fn len(&self) -> usize {
        self.table_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_records.is_empty()
    }

    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }

    /// The records, in the order they appear in the font.
    pub fn records(&self) -> &[TableRecord] {
        &self.table_records
    }

    /// `true` if the records are in strictly ascending tag order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Returns the record for `tag`, if present.
    ///
    /// If an unsorted directory contains the same tag more than once, the
    /// last record with that tag wins.
    pub fn find(&self, tag: Tag) -> Option<TableRecord> {
        if self.sorted {
            self.table_records
                .binary_search_by(|rec| rec.tag.cmp(&tag))
                .ok()
                .map(|idx| self.table_records[idx])
        } else {
            self.table_records
                .iter()
                .rev()
                .find(|rec| rec.tag == tag)
                .copied()
        }
    }

    /// `true` if the directory contains a record for `tag`.
    pub fn contains(&self, tag: Tag) -> bool {
        self.find(tag).is_some()
    }

    /// The tags of all tables, in directory order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.table_records.iter().map(|rec| rec.tag)
    }
}

/// Compute the checksum of a table.
///
/// The table is summed as a sequence of big-endian u32 values, with the
/// final partial value padded with zeros.
pub fn compute_checksum(table: &[u8]) -> u32 {
    let mut chunks = table.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .fold(0u32, u32::wrapping_add);
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut last = [0u8; 4];
        last[..rem.len()].copy_from_slice(rem);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Check the stored checksum of a table against its data.
///
/// For the `head` table the `checksumAdjustment` field is treated as zero,
/// as it is when the checksum is written.
pub fn verify_checksum(data: FontData, record: &TableRecord) -> Result<(), ReadError> {
    let bytes = record
        .byte_range()
        .and_then(|range| data.slice(range))
        .ok_or(ReadError::OutOfBounds)?
        .as_bytes();
    let mut computed = compute_checksum(bytes);
    if record.tag == HEAD_TAG {
        let adjustment = data
            .read_at::<u32>(record.offset as usize + CHECKSUM_ADJUSTMENT_OFFSET)
            .unwrap_or_default();
        computed = computed.wrapping_sub(adjustment);
    }
    if computed == record.checksum {
        Ok(())
    } else {
        log::debug!(
            "'{}' checksum is 0x{:08X}, record says 0x{:08X}",
            record.tag,
            computed,
            record.checksum
        );
        Err(ReadError::ChecksumMismatch(record.tag))
    }
}

/// The binary search helper values stored in the directory header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SearchRange {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchRange {
    /// Compute the search fields for `n_items` items of `item_size` bytes.
    pub fn compute(n_items: usize, item_size: usize) -> Self {
        let entry_selector = if n_items == 0 { 0 } else { n_items.ilog2() as usize };
        let search_range = (1usize << entry_selector) * item_size;
        let range_shift = (n_items * item_size).saturating_sub(search_range);
        SearchRange {
            search_range: search_range.try_into().unwrap_or(u16::MAX),
            entry_selector: entry_selector as u16,
            range_shift: range_shift.try_into().unwrap_or(u16::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use opentype_test_data::{be_buffer, bebuffer::BeBuffer, FontBuilder};
    use types::{TT_SFNT_VERSION, CFF_SFNT_VERSION};

    use super::*;

    fn directory_header(num_tables: u16) -> BeBuffer {
        let search = SearchRange::compute(num_tables as usize, TABLE_RECORD_LEN);
        be_buffer! {
            TT_SFNT_VERSION, num_tables, search.search_range,
            search.entry_selector, search.range_shift
        }
    }

    #[test]
    fn search_range() {
        // Based on Roboto's num tables
        assert_eq!(
            SearchRange::compute(0x16, TABLE_RECORD_LEN),
            SearchRange {
                search_range: 256,
                entry_selector: 4,
                range_shift: 96
            }
        );
        assert_eq!(SearchRange::compute(0, TABLE_RECORD_LEN).search_range, 16);
    }

    #[test]
    fn parse_built_font() {
        let bytes = FontBuilder::new()
            .add_raw(Tag::new(b"abcd"), vec![1, 2, 3, 4, 5])
            .add_raw(Tag::new(b"head"), vec![0; 54])
            .build();
        let directory = TableDirectory::parse(FontData::new(&bytes)).unwrap();
        assert_eq!(directory.sfnt_version(), TT_SFNT_VERSION);
        assert_eq!(directory.num_tables(), 2);
        assert!(directory.is_sorted());
        let abcd = directory.find(Tag::new(b"abcd")).unwrap();
        assert_eq!(abcd.offset, 12 + 2 * 16);
        assert_eq!(abcd.length, 5);
        // padded to four bytes
        assert_eq!(directory.find(Tag::new(b"head")).unwrap().offset, 44 + 8);
        assert!(directory.find(Tag::new(b"glyf")).is_none());
        for record in directory.records() {
            assert!(record.verify_checksum(FontData::new(&bytes)).is_ok());
        }
    }

    #[test]
    fn accepts_known_versions() {
        for version in [CFF_SFNT_VERSION, 0x74727565, 0x74797031] {
            let bytes = be_buffer!(version, 0u16, 0u16, 0u16, 0u16);
            let directory = TableDirectory::parse(FontData::new(&bytes)).unwrap();
            assert_eq!(directory.sfnt_version(), version);
            assert_eq!(directory.num_tables(), 0);
        }
    }

    #[test]
    fn bad_sfnt_version() {
        let bytes = be_buffer!(0xDEADBEEFu32, 0u16, 0u16, 0u16, 0u16);
        assert_eq!(
            TableDirectory::parse(FontData::new(&bytes)),
            Err(ReadError::MalformedDirectory("unknown sfnt version"))
        );
    }

    #[test]
    fn truncated_header() {
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x00];
        let err = TableDirectory::parse(FontData::new(&bytes)).unwrap_err();
        assert!(err.is_malformed_directory());
    }

    #[test]
    fn too_many_tables() {
        // claims two records, contains one
        let bytes = directory_header(2).extend(*b"abcd").extend([0u32, 28, 0]);
        let err = TableDirectory::parse(FontData::new(&bytes)).unwrap_err();
        assert!(matches!(err, ReadError::MalformedDirectory(_)));
    }

    #[test]
    fn record_past_end() {
        let bytes = directory_header(1)
            .extend(*b"abcd")
            .extend([0u32, 28, 100])
            .extend([0u8; 4]);
        let err = TableDirectory::parse(FontData::new(&bytes)).unwrap_err();
        assert!(matches!(err, ReadError::MalformedDirectory(_)));

        // offset + length is well past u32::MAX
        let bytes = directory_header(1)
            .extend(*b"abcd")
            .extend([0u32, u32::MAX, u32::MAX]);
        assert!(TableDirectory::parse(FontData::new(&bytes)).is_err());
    }

    #[test]
    fn wrong_search_fields_are_tolerated() {
        let bytes = be_buffer!(TT_SFNT_VERSION, 1u16, 0xFFFFu16, 7u16, 3u16)
            .extend(*b"abcd")
            .extend([0u32, 28, 4])
            .extend([0u8; 4]);
        let directory = TableDirectory::parse(FontData::new(&bytes)).unwrap();
        assert_eq!(directory.search_range(), 0xFFFF);
        assert!(directory.contains(Tag::new(b"abcd")));
    }

    #[test]
    fn unsorted_lookup_prefers_last() {
        let bytes = directory_header(3)
            .extend(*b"zzzz")
            .extend([0u32, 60, 4])
            .extend(*b"abcd")
            .extend([0u32, 60, 2])
            .extend(*b"abcd")
            .extend([0u32, 62, 2])
            .extend([0u8; 4]);
        let directory = TableDirectory::parse(FontData::new(&bytes)).unwrap();
        assert!(!directory.is_sorted());
        assert_eq!(directory.find(Tag::new(b"abcd")).unwrap().offset, 62);
        assert_eq!(directory.find(Tag::new(b"zzzz")).unwrap().length, 4);
        assert_eq!(
            directory.tags().collect::<Vec<_>>(),
            [Tag::new(b"zzzz"), Tag::new(b"abcd"), Tag::new(b"abcd")]
        );
    }

    #[test]
    fn checksums() {
        assert_eq!(compute_checksum(&[]), 0);
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        // partial words are zero padded
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0x01]), 0x0100_0001);
        assert_eq!(compute_checksum(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 2]), 1);
    }

    #[test]
    fn checksum_mismatch() {
        let bytes = directory_header(1)
            .extend(*b"abcd")
            .extend([0x1234u32, 28, 4])
            .extend([0u8, 0, 0, 1]);
        let directory = TableDirectory::parse(FontData::new(&bytes)).unwrap();
        let record = directory.find(Tag::new(b"abcd")).unwrap();
        assert_eq!(
            verify_checksum(FontData::new(&bytes), &record),
            Err(ReadError::ChecksumMismatch(Tag::new(b"abcd")))
        );
    }
}

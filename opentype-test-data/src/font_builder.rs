//! A builder for complete font files

use std::borrow::Cow;
use std::collections::BTreeMap;

use opentype_types::{Tag, TT_SFNT_VERSION};

const TABLE_RECORD_LEN: usize = 16;
const HEADER_LEN: usize = 12;

/// Build a font from some set of raw tables.
///
/// Tables are written in tag order, each padded to a four byte boundary,
/// after a table directory with correct checksums and search fields.
#[derive(Debug, Clone)]
pub struct FontBuilder<'a> {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

impl Default for FontBuilder<'_> {
    fn default() -> Self {
        FontBuilder {
            sfnt_version: TT_SFNT_VERSION,
            tables: BTreeMap::new(),
        }
    }
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Use a version other than `0x00010000` at the start of the directory.
    pub fn with_sfnt_version(&mut self, sfnt_version: u32) -> &mut Self {
        self.sfnt_version = sfnt_version;
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&mut self) -> Vec<u8> {
        let num_tables = self.tables.len();
        let header_len = HEADER_LEN + num_tables * TABLE_RECORD_LEN;
        let (search_range, entry_selector, range_shift) = search_fields(num_tables);

        let mut data = Vec::with_capacity(header_len);
        data.extend(self.sfnt_version.to_be_bytes());
        data.extend((num_tables as u16).to_be_bytes());
        data.extend(search_range.to_be_bytes());
        data.extend(entry_selector.to_be_bytes());
        data.extend(range_shift.to_be_bytes());

        let mut position = header_len;
        for (tag, table) in &self.tables {
            data.extend(tag.to_be_bytes());
            data.extend(checksum(table).to_be_bytes());
            data.extend((position as u32).to_be_bytes());
            data.extend((table.len() as u32).to_be_bytes());
            position += round4(table.len());
        }
        for table in self.tables.values() {
            data.extend_from_slice(table);
            let rem = round4(table.len()) - table.len();
            data.extend_from_slice(&[0u8; 4][..rem]);
        }
        data
    }
}

/// <https://github.com/google/woff2/blob/a0d0ed7da27b708c0a4e96ad7a998bddc933c06e/src/round.h#L19>
fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

fn checksum(table: &[u8]) -> u32 {
    table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn search_fields(num_tables: usize) -> (u16, u16, u16) {
    let entry_selector = num_tables.checked_ilog2().unwrap_or(0) as usize;
    let search_range = (1 << entry_selector) * TABLE_RECORD_LEN;
    let range_shift = (num_tables * TABLE_RECORD_LEN).saturating_sub(search_range);
    (
        search_range as u16,
        entry_selector as u16,
        range_shift as u16,
    )
}

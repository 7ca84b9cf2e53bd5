//! An owned font with lazily decoded, cached tables

use std::sync::Arc;

use types::{GlyphId, Tag};

use crate::cache::OnceMap;
use crate::resolve;
use crate::table::{Dependencies, Table};
use crate::tables::glyf::{GlyphPadding, GlyphTable};
use crate::{FontData, ReadError, TableDirectory, TableProvider};

/// Shared ownership of the bytes of a font file.
///
/// Anything that can be viewed as a byte slice can back a font: a `Vec<u8>`,
/// a static slice, or a memory mapped file.
#[derive(Clone)]
pub struct FontBuffer(Arc<dyn AsRef<[u8]> + Send + Sync>);

impl FontBuffer {
    pub fn new<T: AsRef<[u8]> + Send + Sync + 'static>(data: T) -> Self {
        FontBuffer(Arc::new(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        (*self.0).as_ref()
    }
}

impl AsRef<[u8]> for FontBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for FontBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontBuffer({} bytes)", self.as_bytes().len())
    }
}

impl From<Vec<u8>> for FontBuffer {
    fn from(src: Vec<u8>) -> Self {
        FontBuffer::new(src)
    }
}

impl From<&'static [u8]> for FontBuffer {
    fn from(src: &'static [u8]) -> Self {
        FontBuffer::new(src)
    }
}

impl From<Arc<[u8]>> for FontBuffer {
    fn from(src: Arc<[u8]>) -> Self {
        FontBuffer::new(src)
    }
}

impl From<Box<[u8]>> for FontBuffer {
    fn from(src: Box<[u8]>) -> Self {
        FontBuffer::new(src)
    }
}

/// Options controlling how a [`Font`] is opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontOptions {
    /// Verify the checksum of every table when the font is opened.
    pub verify_checksums: bool,
    /// The trailing bytes accepted after a simple glyph's point data.
    pub glyph_padding: GlyphPadding,
}

/// A font file, with its tables decoded on demand.
///
/// The table directory is parsed when the font is created. Tables and glyphs
/// are decoded the first time they are requested and the result (the table,
/// or the error) is kept for the lifetime of the font, so a table is never
/// decoded twice. A `Font` can be shared between threads; when several
/// threads request the same table at once, it is decoded by one of them and
/// the others wait for that result.
pub struct Font {
    data: FontBuffer,
    directory: TableDirectory,
    options: FontOptions,
    tables: OnceMap<Tag, Result<Arc<Table>, ReadError>>,
    glyphs: OnceMap<GlyphId, Result<Option<Arc<GlyphTable>>, ReadError>>,
}

impl Font {
    /// Open a font, parsing its table directory.
    pub fn new(data: impl Into<FontBuffer>) -> Result<Self, ReadError> {
        Self::with_options(data, FontOptions::default())
    }

    /// Open a font with the provided options.
    pub fn with_options(
        data: impl Into<FontBuffer>,
        options: FontOptions,
    ) -> Result<Self, ReadError> {
        let data = data.into();
        let directory = TableDirectory::parse(FontData::new(data.as_bytes()))?;
        if !directory.is_sorted() {
            log::warn!("table directory is not sorted by tag, table lookups will be linear");
        }
        if options.verify_checksums {
            for record in directory.records() {
                record.verify_checksum(FontData::new(data.as_bytes()))?;
            }
        }
        Ok(Font {
            data,
            directory,
            options,
            tables: OnceMap::default(),
            glyphs: OnceMap::default(),
        })
    }

    /// The raw font data.
    pub fn data(&self) -> FontData<'_> {
        FontData::new(self.data.as_bytes())
    }

    /// The buffer backing this font.
    pub fn buffer(&self) -> &FontBuffer {
        &self.data
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn options(&self) -> &FontOptions {
        &self.options
    }

    /// Tags of the tables that have been successfully decoded so far, sorted.
    pub fn decoded_tables(&self) -> Vec<Tag> {
        let mut tags = self
            .tables
            .initialized_keys()
            .into_iter()
            .filter(|tag| matches!(self.tables.get(*tag), Some(Ok(_))))
            .collect::<Vec<_>>();
        tags.sort();
        tags
    }

    /// Returns the glyph `gid`, decoding it if necessary.
    ///
    /// Returns `Ok(None)` for glyphs with no outline data.
    pub fn glyph(&self, gid: GlyphId) -> Result<Option<Arc<GlyphTable>>, ReadError> {
        let glyf = self.glyf()?;
        if gid.to_u16() >= glyf.num_glyphs() {
            return Err(ReadError::InvalidGlyphId(gid));
        }
        if let Some(cached) = self.glyphs.get(gid) {
            log::trace!("glyph {gid} already decoded");
            return cached;
        }
        self.glyphs.get_or_init(gid, || {
            log::trace!("decoding glyph {gid}");
            let glyph = glyf.glyph_with_padding(self.data(), gid, self.options.glyph_padding)?;
            Ok(glyph.map(Arc::new))
        })
    }

    fn load(&self, tag: Tag) -> Result<Arc<Table>, ReadError> {
        if let Some(cached) = self.tables.get(tag) {
            log::trace!("'{tag}' already decoded");
            return cached;
        }
        self.tables.get_or_init(tag, || self.decode_table(tag))
    }

    fn decode_table(&self, tag: Tag) -> Result<Arc<Table>, ReadError> {
        let record = self.directory.find(tag).ok_or(ReadError::NotPresent(tag))?;
        let deps = Table::dependencies(tag)?
            .iter()
            .map(|dep| self.load(*dep))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "decoding '{tag}' ({} bytes at offset {})",
            record.length,
            record.offset
        );
        let table = Table::decode(&self.data().reader(), &record, &Dependencies::new(deps));
        if let Err(err) = &table {
            log::debug!("failed to decode '{tag}': {err}");
        }
        table.map(Arc::new)
    }
}

impl TableProvider for Font {
    /// Returns the decoded table for `tag`.
    ///
    /// Fails with [`ReadError::NotPresent`] if the font has no such table,
    /// and with [`ReadError::UnsupportedTable`] if it cannot be decoded.
    /// The dependencies of the table are decoded (and cached) first.
    fn table(&self, tag: Tag) -> Result<Arc<Table>, ReadError> {
        if !self.directory.contains(tag) {
            return Err(ReadError::NotPresent(tag));
        }
        let mut table = Err(ReadError::NotPresent(tag));
        for tag in resolve::evaluation_order(tag, Table::dependencies)? {
            table = Ok(self.load(tag)?);
        }
        table
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("data", &self.data)
            .field("directory", &self.directory)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use opentype_test_data::FontBuilder;

    use super::*;

    #[test]
    fn font_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Font>();
    }

    #[test]
    fn buffers() {
        let bytes = opentype_test_data::font::simple_font();
        let len = bytes.len();
        let from_vec = Font::new(bytes.clone()).unwrap();
        let from_arc = Font::new(Arc::<[u8]>::from(bytes.clone())).unwrap();
        let from_box = Font::new(bytes.into_boxed_slice()).unwrap();
        for font in [from_vec, from_arc, from_box] {
            assert_eq!(font.data().len(), len);
            assert_eq!(font.directory().len(), 8);
        }
    }

    #[test]
    fn unsorted_directory_still_finds_tables() {
        let _ = env_logger::builder().is_test(true).try_init();
        let hhea = opentype_test_data::hhea::SIMPLE;
        let mut data = FontBuilder::new()
            .add_raw(Tag::new(b"hhea"), hhea.to_vec())
            .add_raw(Tag::new(b"abcd"), vec![1, 2, 3, 4])
            .build();
        // swap the two 16-byte records
        let (first, second) = data[12..44].split_at_mut(16);
        first.swap_with_slice(second);
        let font = Font::new(data).unwrap();
        assert!(!font.directory().is_sorted());
        assert_eq!(font.hhea().unwrap().number_of_h_metrics, 5);
    }

    #[test]
    fn errors_are_cached_per_table() {
        let font = Font::new(
            FontBuilder::new()
                .add_raw(Tag::new(b"head"), vec![0; 10])
                .add_raw(Tag::new(b"hhea"), opentype_test_data::hhea::SIMPLE.to_vec())
                .build(),
        )
        .unwrap();
        let err = font.head().unwrap_err();
        assert_eq!(err, ReadError::TableOverrun(Tag::new(b"head")));
        assert_eq!(font.head().unwrap_err(), err);
        assert!(font.hhea().is_ok());
        assert_eq!(font.decoded_tables(), [Tag::new(b"hhea")]);
    }

    #[test]
    fn glyph_padding_option() {
        use opentype_test_data::bebuffer::BeBuffer;

        // RULE followed by three bytes that alignment does not explain
        let glyf = BeBuffer::new()
            .extend(opentype_test_data::glyf::RULE.iter().copied())
            .extend([0xAAu8, 0xBB, 0xCC, 0x00]);
        let data = FontBuilder::new()
            .add_raw(
                Tag::new(b"head"),
                Vec::from(opentype_test_data::head::with_loca_format(1)),
            )
            .add_raw(Tag::new(b"maxp"), Vec::from(opentype_test_data::maxp::version_0_5(1)))
            .add_raw(Tag::new(b"loca"), Vec::from(BeBuffer::new().extend([0u32, 23])))
            .add_raw(Tag::new(b"glyf"), Vec::from(glyf))
            .build();

        let strict = Font::new(data.clone()).unwrap();
        assert_eq!(
            strict.glyph(GlyphId::new(0)).unwrap_err(),
            ReadError::MalformedGlyph("point data does not fill the glyph")
        );
        let options = FontOptions {
            glyph_padding: GlyphPadding::Lenient,
            ..Default::default()
        };
        let lenient = Font::with_options(data, options).unwrap();
        let glyph = lenient.glyph(GlyphId::new(0)).unwrap().unwrap();
        assert_eq!(glyph.as_simple().unwrap().num_points(), 4);
    }

    #[test]
    fn glyph_out_of_range() {
        let font = Font::new(opentype_test_data::font::simple_font()).unwrap();
        assert_eq!(
            font.glyph(GlyphId::new(5)).unwrap_err(),
            ReadError::InvalidGlyphId(GlyphId::new(5))
        );
        assert!(font.glyph(GlyphId::new(1)).unwrap().is_none());
    }
}

//! a trait for things that can serve decoded font tables

use std::sync::Arc;

use types::{GlyphId, NameId, Tag};

use crate::table::{Table, TableRef, TableVariant};
use crate::tables::{
    cmap::Cmap, glyf::Glyf, head::Head, hhea::Hhea, hmtx::Hmtx, loca::Loca, maxp::Maxp,
    name::Name,
};
use crate::ReadError;

/// An interface for accessing decoded tables from a font (or font-like object)
pub trait TableProvider {
    /// Returns the decoded table for `tag`.
    fn table(&self, tag: Tag) -> Result<Arc<Table>, ReadError>;

    /// Returns the decoded table of type `T`.
    fn typed_table<T: TableVariant>(&self) -> Result<TableRef<T>, ReadError> {
        let table = self.table(T::TAG)?;
        let found = table.tag();
        TableRef::new(table).ok_or(ReadError::TagMismatch {
            expected: T::TAG,
            found,
        })
    }

    fn head(&self) -> Result<TableRef<Head>, ReadError> {
        self.typed_table()
    }

    fn hhea(&self) -> Result<TableRef<Hhea>, ReadError> {
        self.typed_table()
    }

    fn maxp(&self) -> Result<TableRef<Maxp>, ReadError> {
        self.typed_table()
    }

    fn loca(&self) -> Result<TableRef<Loca>, ReadError> {
        self.typed_table()
    }

    fn glyf(&self) -> Result<TableRef<Glyf>, ReadError> {
        self.typed_table()
    }

    fn hmtx(&self) -> Result<TableRef<Hmtx>, ReadError> {
        self.typed_table()
    }

    fn cmap(&self) -> Result<TableRef<Cmap>, ReadError> {
        self.typed_table()
    }

    fn name(&self) -> Result<TableRef<Name>, ReadError> {
        self.typed_table()
    }

    /// The number of glyphs in the font, from `maxp`.
    fn num_glyphs(&self) -> Result<u16, ReadError> {
        self.maxp().map(|maxp| maxp.num_glyphs)
    }

    /// Map a codepoint to a nominal glyph identifier, using `cmap`.
    fn map_codepoint(&self, codepoint: impl Into<u32>) -> Result<Option<GlyphId>, ReadError> {
        let codepoint = codepoint.into();
        self.cmap().map(|cmap| cmap.map_codepoint(codepoint))
    }

    /// The font family name (name id 1).
    fn family_name(&self) -> Result<Option<String>, ReadError> {
        self.name_string(NameId::FAMILY_NAME)
    }

    /// The full font name (name id 4).
    fn full_name(&self) -> Result<Option<String>, ReadError> {
        self.name_string(NameId::FULL_NAME)
    }

    /// The best available string for `name_id`, from `name`.
    fn name_string(&self, name_id: NameId) -> Result<Option<String>, ReadError> {
        self.name().map(|name| name.get(name_id).map(String::from))
    }

    /// The advance width of `gid`, from `hmtx`.
    fn advance_width(&self, gid: GlyphId) -> Result<u16, ReadError> {
        if gid.to_u16() >= self.num_glyphs()? {
            return Err(ReadError::InvalidGlyphId(gid));
        }
        self.hmtx()?
            .advance(gid)
            .ok_or(ReadError::MalformedData("'hmtx' has no metrics"))
    }
}

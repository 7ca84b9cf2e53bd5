//! Reading OpenType tables
//!
//! This crate decodes the core tables of an OpenType or TrueType font file
//! (`head`, `hhea`, `maxp`, `loca`, `glyf`, `hmtx`, `cmap` and `name`) into
//! owned, strongly typed structures.
//!
//! A [`Font`] owns the font bytes and its parsed [`TableDirectory`]. Tables
//! are decoded lazily, the first time they are requested, and cached for the
//! lifetime of the font; tables that depend on values from other tables
//! (`loca`, `glyf` and `hmtx`) have those dependencies decoded first.
//! Individual glyphs are decoded and cached the same way.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use opentype::{Font, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = Font::new(font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("font version {} containing {} glyphs", head.font_revision, maxp.num_glyphs);
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod cache;
mod font;
mod font_data;
mod read;
mod resolve;
mod table;
mod table_directory;
mod table_provider;
pub mod tables;

#[cfg(test)]
mod test_helpers;

pub use font::{Font, FontBuffer, FontOptions};
pub use font_data::{ByteReader, FontData};
pub use read::{FontTable, ReadError};
pub use table::{Dependencies, Table, TableRef, TableVariant};
pub use table_directory::{compute_checksum, verify_checksum, TableDirectory, TableRecord};
pub use table_provider::TableProvider;

/// Public re-export of the opentype-types crate.
pub extern crate opentype_types as types;

/// Parse a font, decoding its table directory.
///
/// This is the same as [`Font::new`].
pub fn parse(data: impl Into<FontBuffer>) -> Result<Font, ReadError> {
    Font::new(data)
}

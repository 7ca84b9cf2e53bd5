//! Common [scalar data types][data types] used in font files
//!
//! Every type here can be decoded from (and encoded to) its big-endian
//! on-disk representation through the [`Scalar`] trait.
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod fixed;
mod glyph_id;
mod longdatetime;
mod name_id;
mod point;
mod raw;
mod tag;
mod version;

pub use bbox::BoundingBox;
pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use longdatetime::LongDateTime;
pub use name_id::NameId;
pub use point::Point;
pub use raw::Scalar;
pub use tag::{InvalidTag, Tag};
pub use version::Version16Dot16;

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version for fonts containing CFF outlines (`'OTTO'`).
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The SFNT version used by legacy Apple TrueType fonts (`'true'`).
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
/// The SFNT version used by legacy Apple PostScript Type 1 fonts (`'typ1'`).
pub const TYP1_SFNT_VERSION: u32 = 0x74797031;

/// All sfnt versions accepted at the start of a table directory.
pub const KNOWN_SFNT_VERSIONS: [u32; 4] = [
    TT_SFNT_VERSION,
    CFF_SFNT_VERSION,
    TRUE_SFNT_VERSION,
    TYP1_SFNT_VERSION,
];

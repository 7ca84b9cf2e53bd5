//! Name Identifiers
//!
//! Although these are treated as u16s in the OpenType specification, we
//! choose to represent them as a distinct type.

use core::fmt;

/// Identifier for an informational string (or name).
///
/// The predefined identifiers used for font metadata are provided as
/// associated constants on this type.
///
/// For more detail, see <https://learn.microsoft.com/en-us/typography/opentype/spec/name#name-ids>
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NameId(u16);

impl NameId {
    /// Copyright notice.
    pub const COPYRIGHT_NOTICE: Self = Self(0);

    /// Font family name.
    pub const FAMILY_NAME: Self = Self(1);

    /// Font subfamily name, such as "Regular" or "Bold Italic".
    pub const SUBFAMILY_NAME: Self = Self(2);

    /// Unique font identifier.
    pub const UNIQUE_ID: Self = Self(3);

    /// Full font name that reflects all family and relevant subfamily descriptors.
    pub const FULL_NAME: Self = Self(4);

    /// Version string.
    pub const VERSION_STRING: Self = Self(5);

    /// PostScript name for the font.
    pub const POSTSCRIPT_NAME: Self = Self(6);

    /// Trademark notice.
    pub const TRADEMARK: Self = Self(7);

    /// Manufacturer name.
    pub const MANUFACTURER: Self = Self(8);

    /// Name of the designer of the typeface.
    pub const DESIGNER: Self = Self(9);

    /// Typographic family name.
    ///
    /// Used in preference to [`FAMILY_NAME`](Self::FAMILY_NAME) when present.
    pub const TYPOGRAPHIC_FAMILY_NAME: Self = Self(16);

    /// Typographic subfamily name.
    pub const TYPOGRAPHIC_SUBFAMILY_NAME: Self = Self(17);

    /// Create a new identifier from a raw u16 value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw u16 value.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for NameId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

crate::raw::newtype_scalar!(NameId, [u8; 2]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn read_name_id() {
        assert_eq!(NameId::read(&[0x00, 0x04]), Some(NameId::FULL_NAME));
        assert_eq!(NameId::from(256).to_string(), "256");
    }
}

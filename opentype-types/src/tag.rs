use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The 4-byte identifier of a table in the table directory.
///
/// Tags are conventionally printable ASCII, padded with trailing spaces
/// (`'cvt '`), but tags read from a font are taken as they are; only tags
/// parsed from strings are checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Construct a `Tag` from a big-endian `u32`, without validation.
    pub const fn from_u32(src: u32) -> Self {
        Self(src.to_be_bytes())
    }

    /// The raw bytes of the tag, in file order.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

/// Error returned when a string is not a valid tag.
///
/// A valid tag string has 1 to 4 printable ASCII characters and does not
/// start with a space; shorter strings are padded with spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidTag(String);

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let bytes = src.as_bytes();
        let printable = bytes.iter().all(|b| (0x20..=0x7E).contains(b));
        if bytes.is_empty() || bytes.len() > 4 || !printable || bytes[0] == b' ' {
            return Err(InvalidTag(src.to_owned()));
        }
        let mut raw = [b' '; 4];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(Tag(raw))
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid tag", self.0.escape_debug())
    }
}

impl std::error::Error for InvalidTag {}

crate::raw::newtype_scalar!(Tag, [u8; 4]);

// `[u8; 4]` is its own raw representation
impl crate::raw::Scalar for [u8; 4] {
    type Raw = [u8; 4];
    fn to_raw(self) -> [u8; 4] {
        self
    }
    fn from_raw(raw: [u8; 4]) -> Self {
        raw
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

// four spaces; never a real table
impl Default for Tag {
    fn default() -> Self {
        Tag([b' '; 4])
    }
}

// a string in human-readable formats, raw bytes otherwise
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 4]>::deserialize(deserializer).map(|raw| Tag::new(&raw))
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
    struct Record {
        tag: Tag,
    }

    #[test]
    fn json() {
        let record = Record {
            tag: Tag::new(b"cmap"),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"tag":"cmap"}"#);
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
        assert!(serde_json::from_str::<Record>(r#"{"tag":"toolong"}"#).is_err());
    }
}

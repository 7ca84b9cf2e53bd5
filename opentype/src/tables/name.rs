//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use types::{NameId, Tag};

use super::cmap::PlatformId;
use crate::{table::Dependencies, ByteReader, FontTable, ReadError};

/// The US English language id for the Windows platform.
const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// The [name](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    pub format: u16,
    pub name_records: Vec<NameRecord>,
    /// Language tags, present in format 1 tables only.
    pub lang_tag_records: Vec<LangTagRecord>,
}

/// A single string in the naming table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NameRecord {
    pub platform_id: PlatformId,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: NameId,
    pub string: NameString,
}

/// A language tag for language ids `0x8000` and above.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LangTagRecord {
    pub lang_tag: String,
}

/// The contents of a name record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NameString {
    /// A string in a known encoding, decoded.
    Text(String),
    /// A string in an encoding we cannot decode.
    Bytes(Vec<u8>),
}

impl NameString {
    fn decode(encoding: Encoding, data: &[u8]) -> Self {
        match encoding {
            Encoding::Utf16Be => NameString::Text(decode_utf16_be(data)),
            Encoding::MacRoman => {
                NameString::Text(data.iter().map(|b| MacRomanMapping.decode(*b)).collect())
            }
            Encoding::Unknown => NameString::Bytes(data.to_vec()),
        }
    }

    /// The decoded text, if the encoding was understood.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NameString::Text(text) => Some(text),
            NameString::Bytes(_) => None,
        }
    }
}

impl NameRecord {
    /// The decoded string, if the encoding was understood.
    pub fn as_str(&self) -> Option<&str> {
        self.string.as_str()
    }

    // reference from fonttools:
    // https://github.com/fonttools/fonttools/blob/c2119229cfb02cdb7c5a63374ef29d3d514259e8/Lib/fontTools/ttLib/tables/_n_a_m_e.py#L509
    pub fn is_unicode(&self) -> bool {
        self.platform_id == PlatformId::Unicode
            || (self.platform_id == PlatformId::Windows && [0, 1, 10].contains(&self.encoding_id))
    }

    // lower is better
    fn preference(&self) -> u8 {
        match self.platform_id {
            PlatformId::Windows if self.is_unicode() && self.language_id == WINDOWS_ENGLISH_US => 0,
            _ if self.is_unicode() => 1,
            PlatformId::Macintosh if self.encoding_id == 0 && self.language_id == 0 => 2,
            _ => 3,
        }
    }
}

impl Name {
    /// Returns the best available string for `name_id`.
    ///
    /// Windows US English strings are preferred, then any other unicode
    /// string, then Mac Roman English.
    pub fn get(&self, name_id: NameId) -> Option<&str> {
        self.name_records
            .iter()
            .filter(|record| record.name_id == name_id)
            .filter_map(|record| Some((record.preference(), record.as_str()?)))
            .min_by_key(|(preference, _)| *preference)
            .map(|(_, string)| string)
    }

    /// All records for `name_id`, in table order.
    pub fn records_for(&self, name_id: NameId) -> impl Iterator<Item = &NameRecord> + '_ {
        self.name_records
            .iter()
            .filter(move |record| record.name_id == name_id)
    }
}

impl FontTable for Name {
    const TAG: Tag = Tag::new(b"name");

    fn read_table(reader: &mut ByteReader<'_>, _: &Dependencies) -> Result<Self, ReadError> {
        let format = reader.read_u16()?;
        if format > 1 {
            return Err(ReadError::InvalidFormat(format as _));
        }
        let count = reader.read_u16()?;
        let storage_offset = reader.read_u16()? as usize;
        let raw_records = (0..count)
            .map(|_| {
                Ok((
                    reader.read_u16()?,
                    reader.read_u16()?,
                    reader.read_u16()?,
                    reader.read_u16()?,
                    reader.read_u16()?,
                    reader.read_u16()?,
                ))
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        let raw_lang_tags = if format == 1 {
            let lang_tag_count = reader.read_u16()?;
            (0..lang_tag_count)
                .map(|_| Ok((reader.read_u16()?, reader.read_u16()?)))
                .collect::<Result<Vec<_>, ReadError>>()?
        } else {
            Vec::new()
        };

        let mut name_records = Vec::with_capacity(raw_records.len());
        for (platform_id, encoding_id, language_id, name_id, length, offset) in raw_records {
            let data = read_string(reader, storage_offset, offset, length)?;
            name_records.push(NameRecord {
                platform_id: platform_id.into(),
                encoding_id,
                language_id,
                name_id: NameId::new(name_id),
                string: NameString::decode(Encoding::new(platform_id, encoding_id), data),
            });
        }
        let lang_tag_records = raw_lang_tags
            .into_iter()
            .map(|(length, offset)| {
                let data = read_string(reader, storage_offset, offset, length)?;
                Ok(LangTagRecord {
                    lang_tag: decode_utf16_be(data),
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        Ok(Name {
            format,
            name_records,
            lang_tag_records,
        })
    }
}

fn read_string<'a>(
    reader: &mut ByteReader<'a>,
    storage_offset: usize,
    offset: u16,
    length: u16,
) -> Result<&'a [u8], ReadError> {
    reader.seek(storage_offset + offset as usize)?;
    reader.read_bytes(length as usize)
}

// unpaired surrogates, and a trailing odd byte, become U+FFFD
fn decode_utf16_be(data: &[u8]) -> String {
    let units = data
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0xFFFD,
        });
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// The encoding used by the name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0) => Encoding::Utf16Be,
            (3, 1) => Encoding::Utf16Be,
            (3, 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }
}

/// A helper for encoding and decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;

    /// Convert from a mac-roman encoded byte to a `char`
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            raw as char
        } else {
            let idx = (raw - Self::START_REMAP) as usize;
            char::from_u32(MAC_ROMAN_DECODE[idx] as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    }

    /// Convert from a char to a mac-roman encoded byte, if the char is in the mac-roman charset.
    pub fn encode(self, c: char) -> Option<u8> {
        let raw_c: u16 = (c as u32).try_into().ok()?;
        if raw_c < Self::START_REMAP as u16 {
            Some(raw_c as u8)
        } else {
            MAC_ROMAN_ENCODE
                .binary_search_by_key(&raw_c, |(unic, _)| *unic)
                .ok()
                .map(|idx| MAC_ROMAN_ENCODE[idx].1)
        }
    }
}

// unicode values for mac roman bytes 128..=255
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

// (unicode, mac roman) pairs, sorted by unicode value
#[rustfmt::skip]
static MAC_ROMAN_ENCODE: [(u16, u8); 128] = [
    (160, 202), (161, 193), (162, 162), (163, 163),
    (165, 180), (167, 164), (168, 172), (169, 169),
    (170, 187), (171, 199), (172, 194), (174, 168),
    (175, 248), (176, 161), (177, 177), (180, 171),
    (181, 181), (182, 166), (183, 225), (184, 252),
    (186, 188), (187, 200), (191, 192), (192, 203),
    (193, 231), (194, 229), (195, 204), (196, 128),
    (197, 129), (198, 174), (199, 130), (200, 233),
    (201, 131), (202, 230), (203, 232), (204, 237),
    (205, 234), (206, 235), (207, 236), (209, 132),
    (210, 241), (211, 238), (212, 239), (213, 205),
    (214, 133), (216, 175), (217, 244), (218, 242),
    (219, 243), (220, 134), (223, 167), (224, 136),
    (225, 135), (226, 137), (227, 139), (228, 138),
    (229, 140), (230, 190), (231, 141), (232, 143),
    (233, 142), (234, 144), (235, 145), (236, 147),
    (237, 146), (238, 148), (239, 149), (241, 150),
    (242, 152), (243, 151), (244, 153), (245, 155),
    (246, 154), (247, 214), (248, 191), (249, 157),
    (250, 156), (251, 158), (252, 159), (255, 216),
    (305, 245), (338, 206), (339, 207), (376, 217),
    (402, 196), (710, 246), (711, 255), (728, 249),
    (729, 250), (730, 251), (731, 254), (732, 247),
    (733, 253), (937, 189), (960, 185), (8211, 208),
    (8212, 209), (8216, 212), (8217, 213), (8218, 226),
    (8220, 210), (8221, 211), (8222, 227), (8224, 160),
    (8225, 224), (8226, 165), (8230, 201), (8240, 228),
    (8249, 220), (8250, 221), (8260, 218), (8364, 219),
    (8482, 170), (8706, 182), (8710, 198), (8719, 184),
    (8721, 183), (8730, 195), (8734, 176), (8747, 186),
    (8776, 197), (8800, 173), (8804, 178), (8805, 179),
    (9674, 215), (63743, 240), (64257, 222), (64258, 223),
];

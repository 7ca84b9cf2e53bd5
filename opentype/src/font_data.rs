//! raw font bytes

use std::ops::{Range, RangeBounds};

use types::{Scalar, Tag};

use crate::read::ReadError;
use crate::table_directory::TableRecord;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        offset
            .checked_add(T::RAW_BYTE_LEN)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// A reader over the entire buffer, starting at offset zero.
    pub fn reader(&self) -> ByteReader<'a> {
        ByteReader::new(*self)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

/// A cursor for reading big-endian values out of font data.
///
/// A reader has a *window*: the range of the underlying data it is allowed
/// to see. A reader over a whole font has a window covering every byte, and
/// positions are file offsets. A reader created for a table record (see
/// [`ByteReader::for_record`]) is limited to that table, and positions are
/// relative to the start of the table.
///
/// Reads past the end of a table's window fail with
/// [`ReadError::TableOverrun`]; reads past the end of the data fail with
/// [`ReadError::OutOfBounds`]. A failed read does not move the cursor.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: FontData<'a>,
    window: Range<usize>,
    pos: usize,
    tag: Option<Tag>,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over all of `data`.
    pub fn new(data: FontData<'a>) -> Self {
        ByteReader {
            data,
            window: 0..data.len(),
            pos: 0,
            tag: None,
        }
    }

    /// Create a reader limited to the bytes of a single table.
    ///
    /// The new reader is positioned at the start of the table. This fails if
    /// the record describes bytes outside of the underlying data.
    pub fn for_record(&self, record: &TableRecord) -> Result<ByteReader<'a>, ReadError> {
        let range = record.byte_range().ok_or(ReadError::OutOfBounds)?;
        self.for_range(record.tag, range)
    }

    /// Create a reader limited to `range`, reporting overruns against `tag`.
    ///
    /// `range` is in terms of the underlying data, not this reader's window.
    pub fn for_range(&self, tag: Tag, range: Range<usize>) -> Result<ByteReader<'a>, ReadError> {
        if range.start > range.end || range.end > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(ByteReader {
            data: self.data,
            pos: range.start,
            window: range,
            tag: Some(tag),
        })
    }

    /// The current position, relative to the start of the window.
    pub fn position(&self) -> usize {
        self.pos - self.window.start
    }

    /// The current position in the underlying data.
    pub fn absolute_position(&self) -> usize {
        self.pos
    }

    /// The number of bytes between the cursor and the end of the window.
    pub fn remaining(&self) -> usize {
        self.window.end - self.pos
    }

    /// The length of the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// `true` if the window contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The tag of the table this reader is limited to, if any.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// Move the cursor to `offset`, relative to the start of the window.
    ///
    /// Seeking to the end of the window is allowed; seeking past it fails
    /// with [`ReadError::InvalidOffset`].
    pub fn seek(&mut self, offset: usize) -> Result<(), ReadError> {
        match self.window.start.checked_add(offset) {
            Some(pos) if pos <= self.window.end => {
                self.pos = pos;
                Ok(())
            }
            _ => Err(ReadError::InvalidOffset(offset)),
        }
    }

    /// Advance the cursor by `n_bytes`.
    pub fn skip(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        self.take(n_bytes).map(|_| ())
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let bytes = self.take(T::RAW_BYTE_LEN)?;
        T::read(bytes).ok_or(ReadError::OutOfBounds)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read()
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.read()
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.read()
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.read()
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read()
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.read()
    }

    pub fn read_tag(&mut self) -> Result<Tag, ReadError> {
        self.read()
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        self.take(len)
    }

    /// Read `count` consecutive values of `T`.
    ///
    /// The whole array is bounds checked before anything is decoded, so a
    /// bogus count fails without allocating.
    pub fn read_array<T: Scalar>(&mut self, count: usize) -> Result<Vec<T>, ReadError> {
        let len = count
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let bytes = self.take(len)?;
        bytes
            .chunks_exact(T::RAW_BYTE_LEN)
            .map(|chunk| T::read(chunk).ok_or(ReadError::OutOfBounds))
            .collect()
    }

    /// The bytes from the cursor to the end of the window, without advancing.
    pub fn peek_remaining(&self) -> &'a [u8] {
        self.data
            .as_bytes()
            .get(self.pos..self.window.end)
            .unwrap_or_default()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        if end > self.window.end {
            return Err(match self.tag {
                Some(tag) => ReadError::TableOverrun(tag),
                None => ReadError::OutOfBounds,
            });
        }
        let bytes = self
            .data
            .as_bytes()
            .get(self.pos..end)
            .ok_or(ReadError::OutOfBounds)?;
        self.pos = end;
        Ok(bytes)
    }
}

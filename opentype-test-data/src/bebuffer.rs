//! Small utility for building big-endian byte buffers in tests

use std::collections::HashMap;

use opentype_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if `self` contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember where it was written, so it can be
    /// patched later with [`BeBuffer::write_at`].
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations.insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// The offset of a value written with [`BeBuffer::push_with_tag`].
    ///
    /// # Panics
    ///
    /// If no value was written with `tag`.
    pub fn offset_for(&self, tag: &str) -> usize {
        match self.tagged_locations.get(tag) {
            Some(offset) => *offset,
            None => panic!("no location tagged '{tag}'"),
        }
    }

    /// Overwrite the value written with `tag`.
    ///
    /// # Panics
    ///
    /// If no value was written with `tag`, or `item` does not fit.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let bytes = raw.as_ref();
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(buf: BeBuffer) -> Self {
        buf.data
    }
}

/// Build a [`BeBuffer`] from a list of scalars.
#[macro_export]
macro_rules! be_buffer {
    ( $( $x:expr ),* $(,)? ) => {
        $crate::bebuffer::BeBuffer::new() $( .push($x) )*
    };
}

//! types for working with raw big-endian bytes

/// A trait for font scalars.
///
/// This is the bridge between a value and its big-endian byte encoding. It
/// is implemented for the primitive integer types and for every scalar type
/// in this crate, and is what readers use to pull typed values out of font
/// data.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// The size of the raw type, in bytes.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self::Raw>();

    /// Create an instance of this type from raw big-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read this type from a slice.
    ///
    /// Returns `None` unless the slice is exactly [`Self::RAW_BYTE_LEN`] bytes.
    fn read(bytes: &[u8]) -> Option<Self> {
        <Self::Raw as TryFrom<&[u8]>>::try_from(bytes)
            .ok()
            .map(Self::from_raw)
    }
}

/// An internal macro for implementing `Scalar` on single-field newtypes.
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl crate::raw::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                crate::raw::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self(crate::raw::Scalar::from_raw(raw))
            }
        }
    };
}

pub(crate) use newtype_scalar;

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);
int_scalar!(i64, [u8; 8]);

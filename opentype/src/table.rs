//! The closed set of decodable tables

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use types::Tag;

use crate::font_data::ByteReader;
use crate::read::{FontTable, ReadError};
use crate::table_directory::TableRecord;
use crate::tables::{
    cmap::Cmap, glyf::Glyf, head::Head, hhea::Hhea, hmtx::Hmtx, loca::Loca, maxp::Maxp,
    name::Name,
};

/// A decoded table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Table {
    Head(Head),
    Hhea(Hhea),
    Maxp(Maxp),
    Loca(Loca),
    Glyf(Glyf),
    Hmtx(Hmtx),
    Cmap(Cmap),
    Name(Name),
}

/// Implemented by each type that is a variant of [`Table`].
pub trait TableVariant: FontTable {
    /// Returns the inner table, if `table` is this variant.
    fn from_table(table: &Table) -> Option<&Self>;

    /// Wrap this table in the matching variant.
    fn into_table(self) -> Table;
}

macro_rules! table_variants {
    ($($variant:ident),* $(,)?) => {
        $(
            impl TableVariant for $variant {
                fn from_table(table: &Table) -> Option<&Self> {
                    match table {
                        Table::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_table(self) -> Table {
                    Table::$variant(self)
                }
            }
        )*

        impl Table {
            /// Tags of every table that can be decoded.
            pub const SUPPORTED: &'static [Tag] = &[$($variant::TAG),*];

            /// The tag of this table.
            pub fn tag(&self) -> Tag {
                match self {
                    $(Table::$variant(_) => $variant::TAG,)*
                }
            }

            /// The tables that must be decoded before the table with `tag`.
            pub fn dependencies(tag: Tag) -> Result<&'static [Tag], ReadError> {
                $(
                    if tag == $variant::TAG {
                        return Ok($variant::DEPENDENCIES);
                    }
                )*
                Err(ReadError::UnsupportedTable(tag))
            }

            /// Decode the table described by `record`.
            ///
            /// `deps` must contain the decoded tables listed by
            /// [`Table::dependencies`] for this tag.
            pub fn decode(
                reader: &ByteReader,
                record: &TableRecord,
                deps: &Dependencies,
            ) -> Result<Table, ReadError> {
                $(
                    if record.tag == $variant::TAG {
                        return $variant::decode(reader, record, deps).map(Table::$variant);
                    }
                )*
                Err(ReadError::UnsupportedTable(record.tag))
            }
        }
    };
}

table_variants!(Head, Hhea, Maxp, Loca, Glyf, Hmtx, Cmap, Name);

impl Table {
    /// `true` if there is a decoder for `tag`.
    pub fn is_supported(tag: Tag) -> bool {
        Self::SUPPORTED.contains(&tag)
    }
}

/// The already decoded tables a decoder may depend on.
#[derive(Clone, Debug, Default)]
pub struct Dependencies {
    tables: Vec<Arc<Table>>,
}

impl Dependencies {
    pub fn new(tables: Vec<Arc<Table>>) -> Self {
        Dependencies { tables }
    }

    /// Returns the dependency of type `T`.
    ///
    /// Fails with [`ReadError::NotPresent`] if it was not provided.
    pub fn get<T: TableVariant>(&self) -> Result<&T, ReadError> {
        self.tables
            .iter()
            .find_map(|table| T::from_table(table))
            .ok_or(ReadError::NotPresent(T::TAG))
    }
}

/// A shared, typed reference to a decoded table.
///
/// This derefs to the concrete table type.
pub struct TableRef<T> {
    table: Arc<Table>,
    phantom: PhantomData<fn() -> T>,
}

impl<T: TableVariant> TableRef<T> {
    /// Returns `None` if `table` is not a `T`.
    pub fn new(table: Arc<Table>) -> Option<Self> {
        T::from_table(&table)?;
        Some(TableRef {
            table,
            phantom: PhantomData,
        })
    }

    /// The untyped table this refers to.
    pub fn as_table(this: &Self) -> &Arc<Table> {
        &this.table
    }
}

impl<T: TableVariant> Deref for TableRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match T::from_table(&self.table) {
            Some(inner) => inner,
            None => unreachable!("TableRef is only constructed for matching variants"),
        }
    }
}

impl<T> Clone for TableRef<T> {
    fn clone(&self) -> Self {
        TableRef {
            table: self.table.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T: TableVariant + std::fmt::Debug> std::fmt::Debug for TableRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (**self).fmt(f)
    }
}

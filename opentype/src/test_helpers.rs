//! small utilities used in tests

use std::sync::Arc;

use crate::{
    table::{Dependencies, TableVariant},
    FontData, FontTable, ReadError, TableRecord,
};

/// Decode `bytes` as a complete `T`, located at offset zero.
pub(crate) fn decode<T: FontTable>(bytes: &[u8], deps: &Dependencies) -> Result<T, ReadError> {
    let record = TableRecord::new(T::TAG, 0, 0, bytes.len() as u32);
    T::decode(&FontData::new(bytes).reader(), &record, deps)
}

/// Bundle already decoded tables for use as dependencies.
pub(crate) fn deps<const N: usize>(tables: [crate::Table; N]) -> Dependencies {
    Dependencies::new(tables.into_iter().map(Arc::new).collect())
}

/// Decode `bytes` as a `T` and wrap it as a dependency for other tables.
pub(crate) fn decode_dep<T: TableVariant>(bytes: &[u8], deps: &Dependencies) -> crate::Table {
    decode::<T>(bytes, deps).unwrap().into_table()
}

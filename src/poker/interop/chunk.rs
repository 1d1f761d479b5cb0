//! Output chunk writing shared by the table functions.

use std::borrow::Cow;
use std::error::Error;
use std::ffi::CString;

use duckdb::core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId};
use libduckdb_sys::duckdb_timestamp;

use crate::poker::error::ErrorAccumulator;

pub(crate) const ROWS_PER_CHUNK: usize = 2048;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ColumnType {
    Varchar,
    UInteger,
    Bigint,
    Double,
    Boolean,
    Timestamp,
}

impl ColumnType {
    pub(crate) fn to_handle(self) -> LogicalTypeHandle {
        match self {
            Self::Varchar => LogicalTypeHandle::from(LogicalTypeId::Varchar),
            Self::UInteger => LogicalTypeHandle::from(LogicalTypeId::UInteger),
            Self::Bigint => LogicalTypeHandle::from(LogicalTypeId::Bigint),
            Self::Double => LogicalTypeHandle::from(LogicalTypeId::Double),
            Self::Boolean => LogicalTypeHandle::from(LogicalTypeId::Boolean),
            Self::Timestamp => LogicalTypeHandle::from(LogicalTypeId::Timestamp),
        }
    }
}

pub(crate) struct ColumnDef {
    pub name: &'static str,
    pub logical_type: ColumnType,
}

/// A table function's column enum: position in the output chunk plus its SQL name.
pub(crate) trait OutputColumn: Copy {
    fn index(self) -> usize;
    fn name(self) -> &'static str;
}

pub(crate) fn sanitize_for_cstring<'a>(
    value: &'a str,
    field_name: &str,
    parse_error: &mut ErrorAccumulator,
) -> Cow<'a, str> {
    if value.contains('\0') {
        parse_error.push(&format!("Sanitized interior NUL in {}", field_name));
        Cow::Owned(value.replace('\0', " "))
    } else {
        Cow::Borrowed(value)
    }
}

pub(crate) struct ChunkWriter<'a> {
    output: &'a mut DataChunkHandle,
    row_count: usize,
}

impl<'a> ChunkWriter<'a> {
    pub(crate) fn new(output: &'a mut DataChunkHandle) -> Self {
        Self {
            output,
            row_count: 0,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.row_count >= ROWS_PER_CHUNK
    }

    pub(crate) fn finish_row(&mut self) {
        self.row_count += 1;
    }

    pub(crate) fn set_output_len(&mut self) {
        self.output.set_len(self.row_count);
    }

    pub(crate) fn write_varchar<C: OutputColumn>(
        &mut self,
        column: C,
        value: Option<&str>,
        parse_error: &mut ErrorAccumulator,
    ) -> Result<(), Box<dyn Error>> {
        let row = self.row_count;
        let mut vector = self.output.flat_vector(column.index());
        match value {
            Some(value) => {
                let sanitized = sanitize_for_cstring(value, column.name(), parse_error);
                vector.insert(row, CString::new(sanitized.as_ref())?);
            }
            None => vector.set_null(row),
        }
        Ok(())
    }

    fn write_primitive<C: OutputColumn, T: Copy>(&mut self, column: C, value: Option<T>) {
        let row = self.row_count;
        let mut vector = self.output.flat_vector(column.index());
        match value {
            Some(value) => vector.as_mut_slice::<T>()[row] = value,
            None => vector.set_null(row),
        }
    }

    pub(crate) fn write_u32<C: OutputColumn>(&mut self, column: C, value: Option<u32>) {
        self.write_primitive(column, value);
    }

    pub(crate) fn write_i64<C: OutputColumn>(&mut self, column: C, value: Option<i64>) {
        self.write_primitive(column, value);
    }

    pub(crate) fn write_f64<C: OutputColumn>(&mut self, column: C, value: Option<f64>) {
        self.write_primitive(column, value);
    }

    pub(crate) fn write_bool<C: OutputColumn>(&mut self, column: C, value: bool) {
        self.write_primitive(column, Some(value));
    }

    pub(crate) fn write_timestamp<C: OutputColumn>(
        &mut self,
        column: C,
        value: Option<duckdb_timestamp>,
    ) {
        self.write_primitive(column, value);
    }

    /// Write the accumulated row diagnostics, NULL when there are none. Call last so
    /// sanitation notes from the other columns are included.
    pub(crate) fn write_parse_error<C: OutputColumn>(
        &mut self,
        column: C,
        mut parse_error: ErrorAccumulator,
    ) -> Result<(), Box<dyn Error>> {
        let row = self.row_count;
        let mut vector = self.output.flat_vector(column.index());
        match parse_error.take() {
            Some(message) => {
                let cleaned = message.replace('\0', " ");
                vector.insert(row, CString::new(cleaned)?);
            }
            None => vector.set_null(row),
        }
        Ok(())
    }
}

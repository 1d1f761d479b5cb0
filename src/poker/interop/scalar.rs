//! Row loops shared by the scalar functions.
//!
//! Each helper checks the vector types, skips NULL rows and writes the output vector,
//! so a scalar only supplies the per-row computation.
//!
//! # Safety
//! Only call these from inside a DuckDB scalar `invoke()` while its vectors are valid.

use std::error::Error;
use std::ffi::CString;

use duckdb::{
    Result,
    core::{DataChunkHandle, FlatVector, Inserter, LogicalTypeId},
    vtab::arrow::WritableVector,
};
use libduckdb_sys::duckdb_string_t;

use super::string::decode_duckdb_string;

/// Per-row result of a VARCHAR-producing scalar.
#[derive(Debug, Clone)]
pub enum VarcharOutput {
    Null,
    Value(String),
}

impl From<Option<String>> for VarcharOutput {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

fn ensure_type(
    vec: &FlatVector,
    expected: LogicalTypeId,
    label: &str,
) -> Result<(), Box<dyn Error>> {
    let actual = vec.logical_type().id();
    if actual != expected {
        return Err(format!(
            "scalar helper type mismatch: {label} expected {expected:?}, got {actual:?}"
        )
        .into());
    }
    Ok(())
}

fn write_varchar(
    output_vec: &mut FlatVector,
    row: usize,
    value: VarcharOutput,
) -> Result<(), Box<dyn Error>> {
    match value {
        VarcharOutput::Null => output_vec.set_null(row),
        VarcharOutput::Value(v) => output_vec.insert(row, CString::new(v)?),
    }
    Ok(())
}

/// `VARCHAR -> VARCHAR`, NULL in gives NULL out.
pub fn invoke_unary_varchar_to_varchar<F>(
    input: &DataChunkHandle,
    output: &mut dyn WritableVector,
    mut f: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(&str) -> VarcharOutput,
{
    let len = input.len();
    let input_vec = input.flat_vector(0);
    ensure_type(&input_vec, LogicalTypeId::Varchar, "input[0]")?;
    let input_slice = input_vec.as_slice::<duckdb_string_t>();
    let mut output_vec = output.flat_vector();
    ensure_type(&output_vec, LogicalTypeId::Varchar, "output")?;

    for (i, s) in input_slice.iter().take(len).enumerate() {
        if input_vec.row_is_null(i as u64) {
            output_vec.set_null(i);
            continue;
        }

        // SAFETY: Row nullability is checked above.
        let val = unsafe { decode_duckdb_string(s) };
        write_varchar(&mut output_vec, i, f(val.as_str()))?;
    }

    Ok(())
}

/// `BIGINT -> VARCHAR`, NULL in gives NULL out.
pub fn invoke_unary_i64_to_varchar<F>(
    input: &DataChunkHandle,
    output: &mut dyn WritableVector,
    mut f: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(i64) -> VarcharOutput,
{
    let len = input.len();
    let input_vec = input.flat_vector(0);
    ensure_type(&input_vec, LogicalTypeId::Bigint, "input[0]")?;
    let input_slice = input_vec.as_slice::<i64>();
    let mut output_vec = output.flat_vector();
    ensure_type(&output_vec, LogicalTypeId::Varchar, "output")?;

    for (i, v) in input_slice.iter().take(len).enumerate() {
        if input_vec.row_is_null(i as u64) {
            output_vec.set_null(i);
            continue;
        }
        write_varchar(&mut output_vec, i, f(*v))?;
    }

    Ok(())
}

/// `DOUBLE, DOUBLE, BIGINT -> VARCHAR`, NULL when any argument is NULL.
pub fn invoke_f64_f64_i64_to_varchar<F>(
    input: &DataChunkHandle,
    output: &mut dyn WritableVector,
    mut f: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(f64, f64, i64) -> VarcharOutput,
{
    let len = input.len();
    let vec_0 = input.flat_vector(0);
    let vec_1 = input.flat_vector(1);
    let vec_2 = input.flat_vector(2);
    ensure_type(&vec_0, LogicalTypeId::Double, "input[0]")?;
    ensure_type(&vec_1, LogicalTypeId::Double, "input[1]")?;
    ensure_type(&vec_2, LogicalTypeId::Bigint, "input[2]")?;
    let slice_0 = vec_0.as_slice::<f64>();
    let slice_1 = vec_1.as_slice::<f64>();
    let slice_2 = vec_2.as_slice::<i64>();
    let mut output_vec = output.flat_vector();
    ensure_type(&output_vec, LogicalTypeId::Varchar, "output")?;

    for i in 0..len {
        let row = i as u64;
        if vec_0.row_is_null(row) || vec_1.row_is_null(row) || vec_2.row_is_null(row) {
            output_vec.set_null(i);
            continue;
        }
        write_varchar(&mut output_vec, i, f(slice_0[i], slice_1[i], slice_2[i]))?;
    }

    Ok(())
}

//! Null-aware named parameters.
//!
//! `BindInfo::get_named_parameter` cannot tell an omitted parameter from an explicit
//! SQL NULL, so these helpers go through the C API directly.

use duckdb::vtab::BindInfo;
use libduckdb_sys::{
    duckdb_bind_get_named_parameter, duckdb_bind_info, duckdb_destroy_value, duckdb_free,
    duckdb_get_int64, duckdb_get_varchar, duckdb_is_null_value, duckdb_value,
};
use std::error::Error;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum NamedParameter<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> NamedParameter<T> {
    /// Collapse to an `Option`: omitted and NULL both mean "use the default".
    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Null => None,
        }
    }
}

fn bind_info_ptr(bind: &BindInfo) -> duckdb_bind_info {
    // SAFETY: `duckdb::vtab::BindInfo` wraps a single `duckdb_bind_info` field and
    // exposes no raw accessor. Re-check this layout when upgrading duckdb-rs.
    unsafe { *(bind as *const BindInfo as *const duckdb_bind_info) }
}

/// Fetch a named parameter and hand the non-NULL value to `read`. The value handle
/// is destroyed exactly once whatever `read` returns.
fn with_named_parameter<T>(
    bind: &BindInfo,
    name: &str,
    read: impl FnOnce(duckdb_value) -> Result<T, Box<dyn Error>>,
) -> Result<NamedParameter<T>, Box<dyn Error>> {
    let name_cstr = CString::new(name)?;

    // SAFETY: the bind pointer is valid for the duration of this bind callback.
    let mut value =
        unsafe { duckdb_bind_get_named_parameter(bind_info_ptr(bind), name_cstr.as_ptr()) };
    if value.is_null() {
        return Ok(NamedParameter::Missing);
    }

    // SAFETY: `value` is a live handle returned by DuckDB.
    let result = if unsafe { duckdb_is_null_value(value) } {
        Ok(NamedParameter::Null)
    } else {
        read(value).map(NamedParameter::Value)
    };

    // SAFETY: not destroyed yet.
    unsafe {
        duckdb_destroy_value(&mut value);
    }

    result
}

pub(crate) fn get_named_parameter_varchar(
    bind: &BindInfo,
    name: &str,
) -> Result<NamedParameter<String>, Box<dyn Error>> {
    with_named_parameter(bind, name, |value| {
        // SAFETY: `value` is non-NULL; the returned C string is freed with duckdb_free.
        unsafe {
            let varchar = duckdb_get_varchar(value);
            if varchar.is_null() {
                return Err(format!("Failed to read named parameter '{}' as VARCHAR", name).into());
            }
            let text = CStr::from_ptr(varchar).to_string_lossy().into_owned();
            duckdb_free(varchar as *mut c_void);
            Ok(text)
        }
    })
}

pub(crate) fn get_named_parameter_bigint(
    bind: &BindInfo,
    name: &str,
) -> Result<NamedParameter<i64>, Box<dyn Error>> {
    // SAFETY: `value` is non-NULL and declared BIGINT in `named_parameters()`.
    with_named_parameter(bind, name, |value| Ok(unsafe { duckdb_get_int64(value) }))
}

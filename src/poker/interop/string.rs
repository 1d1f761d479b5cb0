use libduckdb_sys::duckdb_string_t;

const INLINE_CAPACITY: u32 = 12;

/// Borrow the bytes of a DuckDB string value.
///
/// # Safety
///
/// `s` must be a non-NULL row of a VARCHAR vector that DuckDB keeps alive for the
/// current callback. The returned slice must not outlive that callback.
unsafe fn duckdb_string_bytes(s: &duckdb_string_t) -> &[u8] {
    // SAFETY: both union variants start with the length field.
    let len = unsafe { s.value.inlined.length };
    if len == 0 {
        return &[];
    }

    if len <= INLINE_CAPACITY {
        // SAFETY: short strings are stored inline and `len` bytes are initialized.
        let inlined = unsafe { &s.value.inlined.inlined };
        unsafe { std::slice::from_raw_parts(inlined.as_ptr() as *const u8, len as usize) }
    } else {
        // SAFETY: long strings point at `len` bytes owned by the vector's string heap.
        let ptr = unsafe { s.value.pointer.ptr };
        unsafe { std::slice::from_raw_parts(ptr as *const u8, len as usize) }
    }
}

/// Decode a DuckDB string value into an owned `String`, replacing invalid UTF-8.
///
/// # Safety
///
/// Same contract as reading the vector row directly: the row must be non-NULL and
/// backed by DuckDB-owned storage for the active callback.
pub unsafe fn decode_duckdb_string(s: &duckdb_string_t) -> String {
    // SAFETY: forwarded caller contract.
    let bytes = unsafe { duckdb_string_bytes(s) };
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use libduckdb_sys::{
        duckdb_string_t__bindgen_ty_1, duckdb_string_t__bindgen_ty_1__bindgen_ty_1,
        duckdb_string_t__bindgen_ty_1__bindgen_ty_2,
    };
    use std::os::raw::c_char;

    fn inlined(bytes: &[u8]) -> duckdb_string_t {
        let mut buf = [0 as c_char; 12];
        for (dst, src) in buf.iter_mut().zip(bytes) {
            *dst = *src as c_char;
        }
        duckdb_string_t {
            value: duckdb_string_t__bindgen_ty_1 {
                inlined: duckdb_string_t__bindgen_ty_1__bindgen_ty_2 {
                    length: bytes.len() as u32,
                    inlined: buf,
                },
            },
        }
    }

    fn pointed(bytes: &mut [u8]) -> duckdb_string_t {
        let mut prefix = [0 as c_char; 4];
        for (dst, src) in prefix.iter_mut().zip(bytes.iter()) {
            *dst = *src as c_char;
        }
        duckdb_string_t {
            value: duckdb_string_t__bindgen_ty_1 {
                pointer: duckdb_string_t__bindgen_ty_1__bindgen_ty_1 {
                    length: bytes.len() as u32,
                    prefix,
                    ptr: bytes.as_mut_ptr() as *mut c_char,
                },
            },
        }
    }

    #[test]
    fn test_decode_inlined() {
        let s = inlined(b"Hero");
        assert_eq!(unsafe { decode_duckdb_string(&s) }, "Hero");
        let empty = inlined(b"");
        assert_eq!(unsafe { decode_duckdb_string(&empty) }, "");
    }

    #[test]
    fn test_decode_exactly_inline_capacity() {
        let s = inlined(b"Tournament #");
        assert_eq!(unsafe { decode_duckdb_string(&s) }, "Tournament #");
    }

    #[test]
    fn test_decode_pointer() {
        let mut backing = b"Poker Hand #HD1: Tournament #7".to_vec();
        let s = pointed(backing.as_mut_slice());
        assert_eq!(
            unsafe { decode_duckdb_string(&s) },
            "Poker Hand #HD1: Tournament #7"
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let mut backing = b"Seat 1: Hero (100 in chips)".to_vec();
        backing[3] = 0xff;
        let expected = String::from_utf8_lossy(&backing).into_owned();
        let s = pointed(backing.as_mut_slice());
        assert_eq!(unsafe { decode_duckdb_string(&s) }, expected);
    }
}

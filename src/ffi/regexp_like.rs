//! FFI registration for the `regexp_like` scalar function.

use crate::matcher::{regexp_like_cached, PatternCache};
use libduckdb_sys::*;
use std::ffi::CString;

/// Registers the `regexp_like` function with `DuckDB`.
///
/// Signature: `regexp_like(VARCHAR, VARCHAR, INTEGER) → INTEGER`
///
/// ```sql
/// SELECT regexp_like(line, 'ERROR | FATAL', 1) FROM logs;
/// ```
///
/// The function handles NULL inputs itself (a NULL subject or pattern maps
/// to `0`), so registration opts out of `DuckDB`'s default NULL propagation
/// via `duckdb_scalar_function_set_special_handling`. Without it the
/// executor would never see NULL rows and the result would be NULL instead
/// of `0`.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_regexp_like(con: duckdb_connection) {
    unsafe {
        let func = duckdb_create_scalar_function();

        let name = CString::new("regexp_like").unwrap();
        duckdb_scalar_function_set_name(func, name.as_ptr());

        // Parameters 0 and 1: VARCHAR (subject, pattern)
        let varchar_type = duckdb_create_logical_type(DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR);
        duckdb_scalar_function_add_parameter(func, varchar_type);
        duckdb_scalar_function_add_parameter(func, varchar_type);
        duckdb_destroy_logical_type(&mut { varchar_type });

        // Parameter 2: INTEGER (case-sensitivity flag, 0 = insensitive)
        let flag_type = duckdb_create_logical_type(DUCKDB_TYPE_DUCKDB_TYPE_INTEGER);
        duckdb_scalar_function_add_parameter(func, flag_type);
        duckdb_destroy_logical_type(&mut { flag_type });

        // Return type: INTEGER (1 = match, 0 = no match or NULL input)
        let ret_type = duckdb_create_logical_type(DUCKDB_TYPE_DUCKDB_TYPE_INTEGER);
        duckdb_scalar_function_set_return_type(func, ret_type);
        duckdb_destroy_logical_type(&mut { ret_type });

        // NULL rows must reach the executor: 0, not NULL, is the contract
        // for absent inputs.
        duckdb_scalar_function_set_special_handling(func);

        duckdb_scalar_function_set_function(func, Some(regexp_like_exec));

        let result = duckdb_register_scalar_function(con, func);
        if result != DuckDBSuccess {
            eprintln!("regexp_like: failed to register scalar function");
        }

        duckdb_destroy_scalar_function(&mut { func });
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with the registered column
// types (VARCHAR, VARCHAR, INTEGER), flattened by DuckDB before scalar
// execution. `output` is an INTEGER vector with room for one value per input
// row. VARCHAR is read via DuckDB's duckdb_string_t API; the string data
// pointer and length are guaranteed valid for the lifetime of the chunk.
// Validity bitmaps may be null (meaning all rows are valid).
unsafe extern "C" fn regexp_like_exec(
    info: duckdb_function_info,
    input: duckdb_data_chunk,
    output: duckdb_vector,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;

        // Vector 0: VARCHAR (subject)
        let subject_vec = duckdb_data_chunk_get_vector(input, 0);
        let subject_data = duckdb_vector_get_data(subject_vec) as *const duckdb_string_t;
        let subject_validity = duckdb_vector_get_validity(subject_vec);

        // Vector 1: VARCHAR (pattern)
        let pattern_vec = duckdb_data_chunk_get_vector(input, 1);
        let pattern_data = duckdb_vector_get_data(pattern_vec) as *const duckdb_string_t;
        let pattern_validity = duckdb_vector_get_validity(pattern_vec);

        // Vector 2: INTEGER (case-sensitivity flag)
        let flag_vec = duckdb_data_chunk_get_vector(input, 2);
        let flag_data = duckdb_vector_get_data(flag_vec) as *const i32;
        let flag_validity = duckdb_vector_get_validity(flag_vec);

        let out_data = duckdb_vector_get_data(output) as *mut i32;

        // One compiled-pattern slot per chunk: the pattern is a query
        // literal in the common case, so rows after the first hit the cache.
        let mut cache = PatternCache::new();

        for i in 0..row_count {
            let subject = match read_varchar_row(subject_data, subject_validity, i) {
                Ok(s) => s,
                Err(_) => {
                    set_function_error(info, "regexp_like: subject is not valid UTF-8");
                    return;
                }
            };
            let pattern = match read_varchar_row(pattern_data, pattern_validity, i) {
                Ok(p) => p,
                Err(_) => {
                    set_function_error(info, "regexp_like: pattern is not valid UTF-8");
                    return;
                }
            };

            // A NULL flag selects case-sensitive matching: NULL compares
            // unequal to the case-insensitive sentinel 0.
            let flag = if !flag_validity.is_null()
                && !duckdb_validity_row_is_valid(flag_validity, i as idx_t)
            {
                1
            } else {
                *flag_data.add(i)
            };

            match regexp_like_cached(&mut cache, subject, pattern, flag) {
                Ok(matched) => *out_data.add(i) = matched,
                Err(e) => {
                    // Malformed pattern fails the whole invocation; no rows
                    // of partial output are reported.
                    set_function_error(info, &format!("regexp_like: {e}"));
                    return;
                }
            }
        }
    }
}

// SAFETY: `data` must point to at least `row + 1` readable duckdb_string_t
// slots and `validity` must be the matching validity mask (possibly null,
// meaning all rows valid). The validity check comes first: NULL slots hold
// uninitialized payloads that must not be read. The returned slice borrows
// the data chunk and must not outlive it.
unsafe fn read_varchar_row<'a>(
    data: *const duckdb_string_t,
    validity: *mut u64,
    row: usize,
) -> Result<Option<&'a str>, std::str::Utf8Error> {
    unsafe {
        if !validity.is_null() && !duckdb_validity_row_is_valid(validity, row as idx_t) {
            return Ok(None);
        }
        if data.is_null() {
            return Ok(None);
        }
        let str_struct = data.add(row);
        let str_ptr = duckdb_string_t_data(str_struct.cast_mut());
        if str_ptr.is_null() {
            return Ok(None);
        }
        let len = duckdb_string_t_length(*str_struct);
        let bytes = std::slice::from_raw_parts(str_ptr as *const u8, len as usize);
        std::str::from_utf8(bytes).map(Some)
    }
}

// SAFETY: `info` must be the function info handle passed to the executor.
// DuckDB copies the message during the call, so the CString may drop after.
unsafe fn set_function_error(info: duckdb_function_info, message: &str) {
    unsafe {
        match CString::new(message) {
            Ok(msg) => duckdb_scalar_function_set_error(info, msg.as_ptr()),
            Err(_) => {
                // Regex errors echo the pattern text, which can embed NUL.
                let fallback = c"regexp_like: pattern error (message contained NUL)";
                duckdb_scalar_function_set_error(info, fallback.as_ptr());
            }
        }
    }
}

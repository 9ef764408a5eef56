//! FFI bindings for registering the `regexp_like` function with `DuckDB`.
//!
//! This module bridges the pure Rust matcher with `DuckDB`'s C Extension API.
//!
//! # Architecture
//!
//! The scalar function is registered through the raw `libduckdb-sys` FFI
//! bindings: one executor callback receives a data chunk of input rows and
//! an output vector to fill. The callback reads VARCHAR and INTEGER vectors
//! directly, delegates each row to [`crate::matcher`], and reports pattern
//! compilation failures through `duckdb_scalar_function_set_error`.
//!
//! NULL handling is the one registration subtlety: `regexp_like` maps NULL
//! inputs to `0` rather than NULL, so the function is registered with
//! special NULL handling — otherwise `DuckDB` would short-circuit NULL rows
//! before the executor ever ran.

pub mod regexp_like;

/// Registers the `regexp_like` function using a raw `duckdb_connection` handle.
///
/// This function is called from the custom C entry point in `lib.rs`, which obtains
/// the connection directly via `duckdb_connect` — avoiding any struct layout assumptions.
///
/// # Safety
///
/// The caller must ensure `raw_con` is a valid `duckdb_connection` handle.
pub fn register_all_raw(raw_con: libduckdb_sys::duckdb_connection) {
    // Safety: The raw connection handle is valid — obtained via duckdb_connect
    // in regexp_like_init_internal and will be disconnected after registration.
    unsafe {
        regexp_like::register_regexp_like(raw_con);
    }
}

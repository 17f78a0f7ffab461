// src/tests/mod.rs

//! Tests for _sltlib_.
//!
//! Tests are placed at `src/tests/`, inside the `sltlib`, for crate-internal
//! visibility.

pub mod common;
pub mod logfilecollection_tests;

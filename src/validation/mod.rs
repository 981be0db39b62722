//! Validation modules for benchmark result files.
//!
//! This module provides structural schema checks for the two files each
//! scaffold/model directory carries.

pub mod schema_validator;

pub use schema_validator::{
    check_json_file, validate_json_file, SchemaError, SchemaValidationResult, SchemaValidator,
    StatsFileType,
};

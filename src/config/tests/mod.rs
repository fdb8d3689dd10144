//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Credential, target, id, and create payload resolution
//! - `action`: Action parsing tests
//! - `loading`: End-to-end loading from CLI arguments and environment

mod helpers;
mod precedence;

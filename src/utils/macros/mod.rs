//! Macros shared across the crate

mod deserialization;

//! Module for small helpers shared between the pipeline stages
pub mod test_helper;

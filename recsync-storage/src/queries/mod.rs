//! SQL query modules.

pub mod local_records;

//! Flatten GSTR-2B JSON documents from a ZIP archive into per-category sheets.
//!
//! [`walker::walk`] reads an archive into an [`walker::Extraction`];
//! [`report::build_report`] filters it by month and partitions it by category;
//! [`writer::export`] renders the result as a workbook or CSV files.

pub mod error;
pub mod flattener;
pub mod fmt;
pub mod models;
pub mod period;
pub mod report;
pub mod settings;
pub mod walker;
pub mod writer;

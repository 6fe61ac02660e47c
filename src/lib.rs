//! Coldpage - cold-page analysis of page-access logs
//!
//! Compares the page-access logs of a profiling run against a series of
//! inference checkpoints and reports, per checkpoint, how many pages carry a
//! footprint tag the profiling run never saw, how many accesses those pages
//! received, and the total access volume.

pub mod analyzer;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod page_log;
pub mod summary;

//! Plancache: capture, classify and search project-management records
//!
//! Captured API responses are routed through a field-presence classifier,
//! normalized into drawings, RFIs, commitments, and specifications, and
//! merged into a per-project cache that the search engine reads from.

pub mod capture;
pub mod cli;
pub mod core;
pub mod entities;
pub mod search;

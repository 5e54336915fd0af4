//! CLI command implementations

pub mod cache;
pub mod capture;
pub mod completions;
pub mod config;
pub mod fav;
pub mod init;
pub mod list;
pub mod recent;
pub mod search;

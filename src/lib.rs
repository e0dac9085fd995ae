pub mod api;
pub mod backend;
pub mod config;
pub mod confluence;
pub mod error;
pub mod journal;
pub mod models;
pub mod scoring;
#[cfg(test)]
pub mod test_helpers;

#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod feed;
pub mod state;

pub use state::AppState;

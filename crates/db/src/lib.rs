#![forbid(unsafe_code)]

pub mod migrations;
pub mod models;
pub mod schema;
pub mod types;
pub mod utils;

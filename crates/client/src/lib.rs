#![forbid(unsafe_code)]

//! Client side of KageMarks: a [`SessionClient`] talking to the server's
//! HTTP API and the view state that sits on top of it.

pub mod http;
pub mod session;
pub mod sse;
pub mod views;

#[cfg(test)]
mod test_utils;

pub use http::HttpSessionClient;
pub use session::{ChangeStream, SessionClient};

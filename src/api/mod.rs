//! Optional HTTP API exposing alignment and LLM actions
//!
//! Thin glue over the analyzer: every route resolves to one analyzer or
//! action call and wraps the outcome in the standard JSON envelope.

pub mod models;
pub mod server;

pub use models::ApiResponse;
pub use server::start_http_server;

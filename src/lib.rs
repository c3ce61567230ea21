// Public module exports for the binary and integration tests
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discover;
pub mod dom;
pub mod engine;
pub mod error;
pub mod html;
pub mod logging;
pub mod numeric;
pub mod render;
pub mod runtime;

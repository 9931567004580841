//! Mindmap - streaming client for an LLM mindmap generation backend
//!
//! Turns a server-sent event stream of partial markdown into a live outline
//! tree. This library exposes modules for use by the CLI and integration
//! tests.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod outline;
pub mod reducer;
pub mod session;
pub mod sse;

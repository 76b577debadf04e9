//! Common test utilities and fixtures for integration tests.
//!
//! - `fixtures`: fixture loaders and token payload factories
//! - `logger`: per-test structured logging

#![allow(dead_code)]

pub mod fixtures;
pub mod logger;

//! Equipment monitor service: configuration and HTTP API around one engine

pub mod api;
pub mod config;

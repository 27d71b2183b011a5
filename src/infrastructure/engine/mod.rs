//! Flow engine API client.

pub mod client;

pub use client::EngineClient;

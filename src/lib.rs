//! Proxybridge - proxy render queueing and relinking for editing timelines.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod inventory;
pub mod matcher;
pub mod operator;
pub mod reconcile;

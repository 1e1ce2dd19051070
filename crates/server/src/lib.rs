//! HTTP front-end for filedesk.
//!
//! Routes upload, list, process, delete and fetch files and show the
//! activity log. All state lives behind the [`filedesk_core`] service traits.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod telemetry;
pub mod views;

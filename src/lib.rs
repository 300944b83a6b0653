//! castctl - admin console for self-hosted live-streaming servers
//!
//! This library polls a streaming server's admin REST API, projects the data
//! into sortable/filterable terminal views, and drives config and chat
//! moderation changes through a small success/failure state machine.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod logging;
pub mod mutation;
pub mod views;
pub mod widgets;

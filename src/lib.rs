#![allow(clippy::doc_markdown)] // Allow technical terms like MySQL, AMQP in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Scanfleet
//!
//! Control plane for a distributed banner/port scanning fleet.
//!
//! ## Overview
//!
//! Scanfleet accepts scan task submissions over HTTP and fans them out to a pool
//! of remote scan workers through a message-queue RPC client. Operators can
//! inspect and command the fleet's lifecycle (pause, resume, shutdown), and
//! previously collected banners are served back filtered by IP, port, service
//! and a content regular expression.
//!
//! ## Module Organization
//!
//! - [`query_builder`] - Filter criteria to parameterized SQL compilation
//! - [`database`] - Result store access and the result repository
//! - [`messaging`] - RPC transport used to reach scan workers
//! - [`fleet`] - Fleet supervisor collaborator (worker status and commands)
//! - [`orchestration`] - Task dispatcher, fleet commander and bootstrap
//! - [`web`] - Axum HTTP surface
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Domain error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use scanfleet::models::FilterCriteria;
//! use scanfleet::query_builder::compile;
//!
//! let criteria = FilterCriteria::new()
//!     .with_ports(vec!["22".to_string(), "80".to_string()])
//!     .with_regexp("OpenSSH");
//! let query = compile(&criteria);
//!
//! assert_eq!(query.placeholder_count(), query.arguments().len());
//! assert_eq!(query.arguments(), ["22", "80", "OpenSSH"]);
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod fleet;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod query_builder;
pub mod web;

pub use error::{ControlError, DecodeError, FleetError, StoreError};
pub use models::{Banner, FilterCriteria, FleetCommand, ScanTask, WorkerState};
pub use query_builder::{compile, CompiledQuery};

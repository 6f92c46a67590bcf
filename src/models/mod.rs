//! # Data Models
//!
//! Request, result and fleet types exchanged between the HTTP surface and the
//! orchestration components.

pub mod banner;
pub mod filter;
pub mod fleet;
pub mod task;

// Re-export core models for easy access
pub use banner::{Banner, BannerRow};
pub use filter::FilterCriteria;
pub use fleet::{CommandRequest, FleetCommand, UnknownCommand, WorkerState};
pub use task::{DispatchReceipt, ScanTask};

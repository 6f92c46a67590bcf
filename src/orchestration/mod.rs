//! # Orchestration
//!
//! The control plane's core components and their wiring.
//!
//! - [`task_dispatcher`] - detached launch of scan tasks over RPC
//! - [`fleet_commander`] - validated lifecycle commands and status
//! - [`bootstrap`] - one-time construction of every component

pub mod bootstrap;
pub mod fleet_commander;
pub mod task_dispatcher;

pub use bootstrap::{BootstrapError, OrchestrationBootstrap, OrchestrationSystemHandle};
pub use fleet_commander::FleetCommander;
pub use task_dispatcher::TaskDispatcher;

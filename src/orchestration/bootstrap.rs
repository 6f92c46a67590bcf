//! # Orchestration Bootstrap
//!
//! Builds every component once from configuration and hands back a handle
//! owning the live connections.
//!
//! - `test` environment: in-memory transport, supervisor and result store
//! - any other environment: MySQL pool (lazy), AMQP RPC client and AMQP
//!   fleet supervisor

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigManager, ConfigurationError};
use crate::database::{
    BannerStore, DatabaseConnection, InMemoryBannerStore, MySqlBannerStore, ResultRepository,
};
use crate::fleet::{AmqpSupervisor, FleetSupervisor, InMemorySupervisor, SupervisorError};
use crate::messaging::{AmqpRpcClient, InMemoryRpcTransport, MessagingError, RpcTransport};
use crate::orchestration::{FleetCommander, TaskDispatcher};
use crate::web::{create_app, AppState};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("RPC transport unavailable: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Fleet supervisor unavailable: {0}")]
    Supervisor(#[from] SupervisorError),
}

#[derive(Debug)]
enum ConnectedResources {
    Live {
        database: DatabaseConnection,
        rpc: Arc<AmqpRpcClient>,
        supervisor: Arc<AmqpSupervisor>,
    },
    InMemory,
}

/// Running control plane components
#[derive(Debug)]
pub struct OrchestrationSystemHandle {
    pub app_state: AppState,
    pub config_manager: Arc<ConfigManager>,
    resources: ConnectedResources,
}

impl OrchestrationSystemHandle {
    /// HTTP router bound to this system's components
    pub fn router(&self) -> Router {
        create_app(self.app_state.clone())
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.resources, ConnectedResources::InMemory)
    }

    /// Close broker connections and the database pool
    pub async fn shutdown(self) {
        if let ConnectedResources::Live {
            database,
            rpc,
            supervisor,
        } = self.resources
        {
            if let Err(e) = rpc.close().await {
                warn!(error = %e, "Failed to close RPC client cleanly");
            }
            if let Err(e) = supervisor.close().await {
                warn!(error = %e, "Failed to close fleet supervisor cleanly");
            }
            database.close().await;
        }
        info!("🛑 Orchestration system stopped");
    }
}

pub struct OrchestrationBootstrap;

impl OrchestrationBootstrap {
    pub async fn bootstrap(
        config_manager: Arc<ConfigManager>,
    ) -> Result<OrchestrationSystemHandle, BootstrapError> {
        info!(
            environment = %config_manager.environment(),
            "🚀 BOOTSTRAP: Starting scan fleet control plane"
        );

        if config_manager.environment() == "test" {
            return Ok(Self::bootstrap_in_memory(
                config_manager,
                Arc::new(InMemoryRpcTransport::new()),
                Arc::new(InMemorySupervisor::new()),
                Arc::new(InMemoryBannerStore::new(Vec::new())),
            ));
        }

        let config = config_manager.config();
        let database = DatabaseConnection::from_config(&config.database);
        let rpc = Arc::new(AmqpRpcClient::connect(&config.rpc).await?);
        let supervisor = Arc::new(AmqpSupervisor::connect(&config.supervisor).await?);

        let app_state = Self::build_state(
            &config_manager,
            rpc.clone(),
            supervisor.clone(),
            Arc::new(MySqlBannerStore::new(database.pool().clone())),
        );

        info!("✅ BOOTSTRAP: Components connected");
        Ok(OrchestrationSystemHandle {
            app_state,
            config_manager,
            resources: ConnectedResources::Live {
                database,
                rpc,
                supervisor,
            },
        })
    }

    /// Assemble the system around caller-provided collaborators
    pub fn bootstrap_in_memory(
        config_manager: Arc<ConfigManager>,
        transport: Arc<dyn RpcTransport>,
        supervisor: Arc<dyn FleetSupervisor>,
        store: Arc<dyn BannerStore>,
    ) -> OrchestrationSystemHandle {
        let app_state = Self::build_state(&config_manager, transport, supervisor, store);
        OrchestrationSystemHandle {
            app_state,
            config_manager,
            resources: ConnectedResources::InMemory,
        }
    }

    fn build_state(
        config_manager: &ConfigManager,
        transport: Arc<dyn RpcTransport>,
        supervisor: Arc<dyn FleetSupervisor>,
        store: Arc<dyn BannerStore>,
    ) -> AppState {
        let config = config_manager.config();
        AppState::new(
            TaskDispatcher::new(transport, config.rpc.procedure.clone()),
            FleetCommander::new(supervisor),
            ResultRepository::new(store),
            config.server.request_timeout(),
        )
    }
}

//! # Database Operations
//!
//! Read access to the scan result store.
//!
//! ## Key Components
//!
//! - [`connection`] - MySQL pool construction from configuration
//! - [`banner_store`] - [`BannerStore`] trait and its MySQL implementation
//! - [`result_repository`] - Filter criteria in, encoded scan results out
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scanfleet::config::DatabaseConfig;
//! use scanfleet::database::{DatabaseConnection, MySqlBannerStore, ResultRepository};
//! use scanfleet::models::FilterCriteria;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = DatabaseConnection::from_config(&DatabaseConfig::default());
//! let repository = ResultRepository::new(Arc::new(MySqlBannerStore::new(connection.pool().clone())));
//!
//! let banners = repository
//!     .query(&FilterCriteria::new().with_services(vec!["ssh".to_string()]))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod banner_store;
pub mod connection;
pub mod result_repository;

pub use banner_store::{BannerStore, InMemoryBannerStore, MySqlBannerStore};
pub use connection::DatabaseConnection;
pub use result_repository::ResultRepository;

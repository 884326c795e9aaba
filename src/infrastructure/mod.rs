//! Infrastructure module.
//!
//! This module contains the view-state store and environment configuration.

pub mod config;
pub mod in_memory;
pub mod repository;

pub use config::{ConfigurationError, ServerConfig, WorkerThreads};
pub use in_memory::InMemoryStateRepository;
pub use repository::{RepositoryError, StateRepository};

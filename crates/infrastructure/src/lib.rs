//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_workspace_store;
mod postgres_workspace_store;

pub use in_memory_workspace_store::InMemoryWorkspaceStore;
pub use postgres_workspace_store::PostgresWorkspaceStore;

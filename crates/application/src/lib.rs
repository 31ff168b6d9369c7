//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod catalog_service;
mod directory_service;
mod resource_service;
mod tenancy_service;
mod workspace_ports;
mod workspace_service;

#[cfg(test)]
mod test_support;

pub use access_service::AccessService;
pub use catalog_service::{CatalogService, CatalogStores};
pub use directory_service::DirectoryService;
pub use resource_service::ResourceService;
pub use tenancy_service::TenancyService;
pub use workspace_ports::{
    CatalogLinkRepository, EntityRepository, MembershipRepository, ResourceAnchorRepository,
    ResourceListQuery, ResourceStore, RowScope, UserRepository,
};
pub use workspace_service::WorkspaceService;

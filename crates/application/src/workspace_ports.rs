mod catalog;
mod directory;
mod membership;
mod resources;
mod tenancy;

pub use catalog::CatalogLinkRepository;
pub use directory::UserRepository;
pub use membership::{MembershipRepository, ResourceAnchorRepository};
pub use resources::{ResourceListQuery, ResourceStore, RowScope};
pub use tenancy::EntityRepository;

mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::{logout_handler, me_handler};

/// Session key holding the authenticated user id.
pub const SESSION_USER_KEY: &str = "insightdeck.user_id";
/// Session key holding the login timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "insightdeck.created_at";

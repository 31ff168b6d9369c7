use insightdeck_application::UserRepository;
use insightdeck_core::{AppResult, Role};
use insightdeck_domain::UserDraft;
use tracing::{info, warn};

use crate::api_config::SeedAccount;

/// Makes sure the configured super administrator exists so a first session
/// can be bootstrapped on an empty database.
pub async fn ensure_super_admin(
    users: &dyn UserRepository,
    account: &SeedAccount,
) -> AppResult<()> {
    if let Some(existing) = users.find_user_by_email(account.email.as_str()).await? {
        if existing.role != Role::SuperAdmin {
            warn!(
                user_id = %existing.id,
                role = %existing.role,
                "seed account exists without SUPERADMIN role; leaving it unchanged"
            );
        }
        return Ok(());
    }

    let draft = UserDraft::new(
        account.name.as_str(),
        account.email.as_str(),
        Role::SuperAdmin.as_str(),
    )?;
    let user = users.create_user(draft, None).await?;

    info!(user_id = %user.id, email = %user.email, "seeded super administrator");
    Ok(())
}

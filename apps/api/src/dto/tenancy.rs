use insightdeck_core::AppResult;
use insightdeck_domain::{Entity, EntityDraft, EntityMembership, TenantSelection};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an entity (tenant).
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/entity-response.ts"
)]
pub struct EntityResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Entity> for EntityResponse {
    fn from(value: Entity) -> Self {
        Self {
            id: value.id.as_i64(),
            name: value.name,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for entity creation and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-entity-request.ts"
)]
pub struct SaveEntityRequest {
    pub name: String,
    pub description: Option<String>,
}

impl SaveEntityRequest {
    pub fn into_draft(self) -> AppResult<EntityDraft> {
        EntityDraft::new(self.name, self.description)
    }
}

/// API representation of an entity membership.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/membership-response.ts"
)]
pub struct MembershipResponse {
    pub membership_id: i64,
    pub entity_id: i64,
    pub user_id: i64,
    pub created_at: String,
}

impl From<EntityMembership> for MembershipResponse {
    fn from(value: EntityMembership) -> Self {
        Self {
            membership_id: value.membership_id,
            entity_id: value.entity_id.as_i64(),
            user_id: value.user_id.as_i64(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Validated tenant selection the client sends back as `entity_id`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/tenant-selection-response.ts"
)]
pub struct TenantSelectionResponse {
    /// `all_entities` or `entity`.
    pub mode: String,
    /// Wire value for the `entity_id` query parameter; zero selects every entity.
    pub entity_id: i64,
}

impl From<TenantSelection> for TenantSelectionResponse {
    fn from(value: TenantSelection) -> Self {
        let mode = match value {
            TenantSelection::AllEntities => "all_entities",
            TenantSelection::Entity(_) => "entity",
        };

        Self {
            mode: mode.to_owned(),
            entity_id: value.as_wire(),
        }
    }
}

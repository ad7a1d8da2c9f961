//! Read-only view of the `user_roles` table.

use serde::Deserialize;
use uuid::Uuid;

use crate::remote::{DataService, Query, RemoteError};
use crate::store::Owner;

pub const TABLE: &str = "user_roles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role: Role,
}

/// True if the owner holds the `admin` role.
pub async fn is_admin(service: &dyn DataService, owner: &Owner) -> Result<bool, RemoteError> {
    let query = Query::new().eq("user_id", owner.user_id).eq("role", "admin");
    let rows = service.select(&owner.access_token, TABLE, &query).await?;
    let roles = rows
        .into_iter()
        .map(serde_json::from_value::<UserRole>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(roles.iter().any(|r| r.role == Role::Admin))
}

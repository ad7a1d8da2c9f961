use uuid::Uuid;

use crate::remote::{DataService, Query, RemoteError};
use crate::store::{Owner, Resource};

use super::Campaign;

/// Single campaign of this owner, for the header of the sub-resource pages.
pub async fn find_by_id(
    service: &dyn DataService,
    owner: &Owner,
    id: Uuid,
) -> Result<Option<Campaign>, RemoteError> {
    let query = Query::new().eq("id", id).eq("user_id", owner.user_id);
    let rows = service.select(&owner.access_token, Campaign::TABLE, &query).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

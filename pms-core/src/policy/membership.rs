//! Team affiliation: the owner-or-member relationship between actor and team.

use crate::domain::{Actor, EntityId, Team};
use std::collections::BTreeSet;

/// Whether `actor` owns or belongs to `team`.
///
/// Identity is compared by id only. An absent team affiliates nobody.
pub fn is_affiliated(actor: &Actor, team: Option<&Team>) -> bool {
    is_affiliated_id(actor.id, team)
}

/// [`is_affiliated`] for a bare user id
pub fn is_affiliated_id(user_id: EntityId, team: Option<&Team>) -> bool {
    match team {
        Some(team) => team.owner_id == user_id || team.member_ids.contains(&user_id),
        None => false,
    }
}

/// Final member set for a membership update: the requested ids plus the
/// owner, who can never be removed from their own team.
pub fn merge_owner(
    team: &Team,
    requested: impl IntoIterator<Item = EntityId>,
) -> BTreeSet<EntityId> {
    let mut members: BTreeSet<EntityId> = requested.into_iter().collect();
    members.insert(team.owner_id);
    members
}

//! Team domain model

use super::common::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Team entity.
///
/// `member_ids` may or may not contain the owner; the owner is always
/// treated as part of the team by [`crate::policy::membership`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: EntityId,
    #[serde(default)]
    pub member_ids: BTreeSet<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// New team owned by `owner_id`, with the owner as its first member
    pub fn new(name: impl Into<String>, owner_id: EntityId) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            description: None,
            owner_id,
            member_ids: BTreeSet::from([owner_id]),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = EntityId>) -> Self {
        self.member_ids.extend(members);
        self
    }
}

/// Input for creating a team
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamInput {
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input for renaming or re-describing a team
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeamInput {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Replacement member list for a team.
///
/// `None` and an empty list both leave the owner as the only member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeamMembersInput {
    pub member_ids: Option<Vec<EntityId>>,
}

/// Reported whenever a team name is already in use
pub const TEAM_NAME_TAKEN: &str = "A team with this name already exists";

/// Team names compare trimmed and case-insensitively
pub fn team_names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Trimmed team name, or `None` when blank
pub fn normalize_team_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_new_includes_owner() {
        let owner = EntityId::from_u128(2);
        let team = Team::new("Platform", owner);
        assert_eq!(team.owner_id, owner);
        assert!(team.member_ids.contains(&owner));
        assert_eq!(team.member_ids.len(), 1);
    }

    #[test]
    fn test_team_with_members_dedups_by_id() {
        let team = Team::new("Platform", EntityId::from_u128(2)).with_members([
            EntityId::from_u128(1),
            EntityId::from_u128(1),
            EntityId::from_u128(2),
        ]);
        assert_eq!(team.member_ids.len(), 2);
    }

    #[test]
    fn test_normalize_team_name() {
        assert_eq!(normalize_team_name("  Core  "), Some("Core".to_string()));
        assert_eq!(normalize_team_name("   "), None);
        assert_eq!(normalize_team_name(""), None);
    }

    #[test]
    fn test_create_team_input_validation() {
        let input = CreateTeamInput {
            name: "x".repeat(101),
            description: None,
        };
        assert!(input.validate().is_err());

        let input = CreateTeamInput {
            name: "Core".to_string(),
            description: Some("Core services".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_team_deserializes_without_members() {
        let json = serde_json::json!({
            "id": EntityId::from_u128(10),
            "name": "Core",
            "description": null,
            "owner_id": EntityId::from_u128(2),
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let team: Team = serde_json::from_value(json).unwrap();
        assert!(team.member_ids.is_empty());
    }
}

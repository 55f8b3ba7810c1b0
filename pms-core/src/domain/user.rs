//! User domain model and global roles

use super::common::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Global role held by every user.
///
/// The role only short-circuits evaluation: ADMIN is allowed everything and
/// GUEST is denied every mutation. TEAM_LEAD and MEMBER fall through to the
/// resource rules in [`crate::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    TeamLead,
    #[default]
    Member,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::TeamLead, Role::Member, Role::Guest];

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Whether this role may perform any create/update/delete at all
    pub fn can_mutate(self) -> bool {
        self != Role::Guest
    }

    /// ADMIN or TEAM_LEAD
    pub fn can_lead(self) -> bool {
        matches!(self, Role::Admin | Role::TeamLead)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::TeamLead => "TEAM_LEAD",
            Role::Member => "MEMBER",
            Role::Guest => "GUEST",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TEAM_LEAD" => Ok(Role::TeamLead),
            "MEMBER" => Ok(Role::Member),
            "GUEST" => Ok(Role::Guest),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of an operation.
///
/// Passed explicitly to every policy and service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: EntityId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// True when `other` refers to this actor
    pub fn is(&self, other: Option<EntityId>) -> bool {
        other == Some(self.id)
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new_v4(),
            username: String::new(),
            email: String::new(),
            first_name: None,
            last_name: None,
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

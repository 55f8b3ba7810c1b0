//! Common types for domain models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity shared by every entity.
///
/// Entities handed to the evaluator may be distinct in-memory copies of the
/// same logical row, so identity is always compared through this value and
/// never through references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new_v4() -> Self {
        EntityId(Uuid::new_v4())
    }

    /// Build a deterministic id from an integer (fixtures, legacy numeric keys)
    pub fn from_u128(value: u128) -> Self {
        EntityId(Uuid::from_u128(value))
    }

    pub fn nil() -> Self {
        EntityId(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parse a UUID string
    pub fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Ok(EntityId(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        EntityId(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for EntityId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EntityId(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_new() {
        let id = EntityId::new_v4();
        assert!(!id.is_nil());
    }

    #[test]
    fn test_entity_id_from_u128_is_stable() {
        assert_eq!(EntityId::from_u128(7), EntityId::from_u128(7));
        assert_ne!(EntityId::from_u128(7), EntityId::from_u128(8));
        assert!(EntityId::from_u128(1) < EntityId::from_u128(2));
    }

    #[test]
    fn test_entity_id_from_str() {
        let id_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: EntityId = id_str.parse().unwrap();
        assert_eq!(id.to_string(), id_str);
    }

    #[test]
    fn test_entity_id_from_str_invalid() {
        let result: Result<EntityId, _> = "not-a-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_entity_id_serialization() {
        let id_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: EntityId = id_str.parse().unwrap();

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id_str));

        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

//! Relationship markers for record fields.
//!
//! A field that references other records has no column of its own, so the
//! batching layer drops it from every write. Records declare such fields with
//! [`FieldInfo::relationship`](crate::FieldInfo::relationship).

use serde::{Deserialize, Serialize};

/// The type of relationship between two record types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// One-to-one: `Hub` has one `Address`.
    OneToOne,
    /// Many-to-one: many `DeliveryHour`s belong to one `DeliveryHub`.
    #[default]
    ManyToOne,
    /// One-to-many: one `DeliveryHub` has many `DeliveryDay`s.
    OneToMany,
    /// Many-to-many via a link table.
    ManyToMany,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_kind_default() {
        assert_eq!(RelationshipKind::default(), RelationshipKind::ManyToOne);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RelationshipKind::OneToMany).unwrap();
        assert_eq!(json, "\"one_to_many\"");
        let kind: RelationshipKind = serde_json::from_str("\"many_to_many\"").unwrap();
        assert_eq!(kind, RelationshipKind::ManyToMany);
    }
}

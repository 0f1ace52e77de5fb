use std::fmt;

use serde::{Deserialize, Serialize};

pub const ADMIN: &str = "admin";
pub const DINER: &str = "diner";
pub const FRANCHISEE: &str = "franchisee";

/// Identifier of the object a scoped role applies to (e.g. a franchise id).
///
/// The backend sends it either as a number or as a string; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawObjectId", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawObjectId {
    Number(i64),
    Text(String),
}

impl From<RawObjectId> for ObjectId {
    fn from(raw: RawObjectId) -> Self {
        match raw {
            RawObjectId::Number(n) => ObjectId(n.to_string()),
            RawObjectId::Text(s) => ObjectId(s),
        }
    }
}

/// A role assignment held by a user.
///
/// On the wire this is `{ "role": "franchisee", "objectId": 1 }`, with `objectId`
/// omitted (or empty) for roles that are not scoped to an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoleWire", into = "RoleWire")]
pub enum Role {
    Unscoped(String),
    Scoped(String, ObjectId),
}

impl Role {
    pub fn unscoped(tag: impl Into<String>) -> Self {
        Role::Unscoped(tag.into())
    }

    pub fn scoped(tag: impl Into<String>, object_id: impl Into<String>) -> Self {
        Role::Scoped(tag.into(), ObjectId::new(object_id))
    }

    pub fn tag(&self) -> &str {
        match self {
            Role::Unscoped(tag) | Role::Scoped(tag, _) => tag,
        }
    }

    pub fn object_id(&self) -> Option<&ObjectId> {
        match self {
            Role::Unscoped(_) => None,
            Role::Scoped(_, id) => Some(id),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unscoped(tag) => f.write_str(tag),
            Role::Scoped(tag, id) => write!(f, "{tag}({id})"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RoleWire {
    role: String,
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    object_id: Option<ObjectId>,
}

impl From<RoleWire> for Role {
    fn from(wire: RoleWire) -> Self {
        match wire.object_id {
            Some(id) if !id.as_str().is_empty() => Role::Scoped(wire.role, id),
            _ => Role::Unscoped(wire.role),
        }
    }
}

impl From<Role> for RoleWire {
    fn from(role: Role) -> Self {
        match role {
            Role::Unscoped(role) => RoleWire { role, object_id: None },
            Role::Scoped(role, id) => RoleWire { role, object_id: Some(id) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unscoped_role() {
        let role: Role = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert_eq!(role, Role::unscoped(ADMIN));
        assert_eq!(role.to_string(), "admin");
    }

    #[test]
    fn parses_scoped_role_with_numeric_or_text_id() {
        let numeric: Role = serde_json::from_str(r#"{"role":"franchisee","objectId":7}"#).unwrap();
        let text: Role = serde_json::from_str(r#"{"role":"franchisee","objectId":"7"}"#).unwrap();
        assert_eq!(numeric, text);
        assert_eq!(numeric.to_string(), "franchisee(7)");
        assert_eq!(numeric.object_id().map(ObjectId::as_str), Some("7"));
    }

    #[test]
    fn empty_object_id_is_unscoped() {
        let role: Role = serde_json::from_str(r#"{"role":"franchisee","objectId":""}"#).unwrap();
        assert_eq!(role, Role::unscoped(FRANCHISEE));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let json = serde_json::to_value(Role::scoped(FRANCHISEE, "3")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "franchisee", "objectId": "3"}));
        let json = serde_json::to_value(Role::unscoped(DINER)).unwrap();
        assert_eq!(json, serde_json::json!({"role": "diner"}));
    }
}

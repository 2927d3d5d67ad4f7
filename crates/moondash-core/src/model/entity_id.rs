// ── Core identity type ──
//
// Manifest records carry UUIDs on current backends, auto-increment
// integers on older ones. EntityId hides the difference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for any MoonDash record.
///
/// Serializes back to the same JSON shape it was read from, so ids can
/// be fed straight into filters and payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Numeric(u64),
    Opaque(String),
}

impl EntityId {
    /// First eight characters of the textual form (`Order #1a2b3c4d`).
    pub fn short(&self) -> String {
        self.to_string().chars().take(8).collect()
    }

    /// JSON form for filters and payloads.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Uuid(u) => serde_json::Value::String(u.to_string()),
            Self::Numeric(n) => serde_json::Value::from(*n),
            Self::Opaque(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Opaque(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        if let Ok(u) = Uuid::parse_str(&s) {
            return Self::Uuid(u);
        }
        match s.parse::<u64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Opaque(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_shape() {
        assert!(matches!(
            EntityId::from("550e8400-e29b-41d4-a716-446655440000"),
            EntityId::Uuid(_)
        ));
        assert_eq!(EntityId::from("7"), EntityId::Numeric(7));
        assert_eq!(EntityId::from("driver-7"), EntityId::Opaque("driver-7".into()));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: EntityId = serde_json::from_value(json!(42)).unwrap();
        let s: EntityId = serde_json::from_value(json!("abc")).unwrap();
        let u: EntityId =
            serde_json::from_value(json!("550e8400-e29b-41d4-a716-446655440000")).unwrap();
        assert_eq!(n, EntityId::Numeric(42));
        assert_eq!(s, EntityId::Opaque("abc".into()));
        assert!(matches!(u, EntityId::Uuid(_)));
    }

    #[test]
    fn json_form_preserves_shape() {
        assert_eq!(EntityId::Numeric(7).to_json(), json!(7));
        assert_eq!(EntityId::from("d-7").to_json(), json!("d-7"));
    }

    #[test]
    fn short_takes_eight_chars() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(id.short(), "550e8400");
        assert_eq!(EntityId::Numeric(12).short(), "12");
    }
}

//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// A reference field as delivered by the record gateway.
///
/// The gateway is inconsistent about reference fields: depending on the
/// projection they arrive either as a bare integer id or as an expanded
/// `{"Id": n, "Name": "..."}` object. Both shapes deserialize into this
/// union so resolution happens in exactly one place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordRef {
    Expanded {
        #[serde(rename = "Id")]
        id: i64,
        #[serde(rename = "Name")]
        name: String,
    },
    Scalar(i64),
}

impl RecordRef {
    pub fn id(&self) -> i64 {
        match self {
            RecordRef::Expanded { id, .. } => *id,
            RecordRef::Scalar(id) => *id,
        }
    }

    /// Display name of the referenced record, when the gateway expanded it.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            RecordRef::Expanded { name, .. } => Some(name.as_str()),
            RecordRef::Scalar(_) => None,
        }
    }

    /// Resolve to a display string, falling back to the id.
    pub fn display_or_id(&self) -> String {
        match self {
            RecordRef::Expanded { name, .. } => name.clone(),
            RecordRef::Scalar(id) => id.to_string(),
        }
    }
}

/// Parse a comma-delimited tag string into a list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Join tags back into the gateway's comma-delimited wire format.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ref_scalar() {
        let r: RecordRef = serde_json::from_str("42").unwrap();
        assert_eq!(r, RecordRef::Scalar(42));
        assert_eq!(r.id(), 42);
        assert_eq!(r.display_name(), None);
        assert_eq!(r.display_or_id(), "42");
    }

    #[test]
    fn test_record_ref_expanded() {
        let r: RecordRef = serde_json::from_str(r#"{"Id": 7, "Name": "Tools"}"#).unwrap();
        assert_eq!(r.id(), 7);
        assert_eq!(r.display_name(), Some("Tools"));
        assert_eq!(r.display_or_id(), "Tools");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn test_join_tags() {
        let tags = vec!["hardware".to_string(), "retail".to_string()];
        assert_eq!(join_tags(&tags), "hardware,retail");
    }
}

use indexmap::IndexMap;

/// Ordered property map. Values are kept exactly as written (after trimming).
pub type Properties = IndexMap<String, String>;

pub const DEFAULT_NAME: &str = "Unknown";
pub const DEFAULT_KIND: &str = "Node";

/// One `[node]` section as declared in the source, before tree assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub name: String,
    pub kind: String,
    /// Raw `parent="…"` value. `None` marks a root candidate.
    pub parent_ref: Option<String>,
    pub properties: Properties,
    /// 1-based source line of the header, if the record came from text.
    pub line: Option<usize>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            parent_ref: None,
            properties: Properties::new(),
            line: None,
        }
    }

    pub fn with_parent(mut self, parent_ref: impl Into<String>) -> Self {
        self.parent_ref = Some(parent_ref.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Last write wins; an overwritten key keeps its original position.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_KIND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_uses_fallback_name_and_kind() {
        let record = NodeRecord::default();
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.kind, "Node");
        assert!(record.parent_ref.is_none());
        assert!(record.properties.is_empty());
    }

    #[test]
    fn test_duplicate_property_overwrites_in_place() {
        let mut record = NodeRecord::new("Player", "CharacterBody2D")
            .with_property("speed", "10")
            .with_property("visible", "true");

        let previous = record.set_property("speed", "20");

        assert_eq!(previous.as_deref(), Some("10"));
        let keys: Vec<_> = record.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["speed", "visible"]);
        assert_eq!(record.properties["speed"], "20");
    }
}

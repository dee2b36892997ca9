//! Part records and author-supplied mesh mappings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a part, as written in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// External link attached to a part (datasheet, shop page, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartLink {
    pub label: String,
    pub url: String,
}

/// A catalog part. Read-only to the resolution engine, which only uses
/// `id` and `name` for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: PartId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PartLink>,
    /// Alternative chosen by the user for this part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<Box<Part>>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PartId::new(id),
            name: name.into(),
            part_number: None,
            tags: Vec::new(),
            notes: None,
            links: Vec::new(),
            replacement: None,
        }
    }

    /// Text the click scorer tokenizes for this part
    pub fn match_text(&self) -> String {
        format!("{} {}", self.name, self.id)
    }
}

/// Author-supplied `mesh name -> part id` table.
///
/// A missing table is the same as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshPartMappings {
    #[serde(default)]
    pub mesh_name_to_part_id: Option<HashMap<String, PartId>>,
}

impl MeshPartMappings {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mesh_name_to_part_id: Some(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), PartId(v.into())))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mesh_name_to_part_id
            .as_ref()
            .map_or(true, |m| m.is_empty())
    }

    /// Look up a single node name. Names are trimmed; empty names never match.
    pub fn get(&self, name: &str) -> Option<&PartId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.mesh_name_to_part_id.as_ref()?.get(name)
    }

    /// All part ids that appear as mapping targets
    pub fn targets(&self) -> impl Iterator<Item = &PartId> {
        self.mesh_name_to_part_id.iter().flat_map(|m| m.values())
    }
}

//! Bike catalog documents
//!
//! A catalog directory holds up to four JSON documents:
//!
//! ```text
//! <slug>/
//!   diagram.json    required
//!   bike.json       optional, defaults to {id: slug, name: slug}
//!   parts.json      optional, defaults to []
//!   mappings.json   optional, defaults to {}
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::part::{MeshPartMappings, Part, PartId};

pub const DIAGRAM_FILE: &str = "diagram.json";
pub const BIKE_FILE: &str = "bike.json";
pub const PARTS_FILE: &str = "parts.json";
pub const MAPPINGS_FILE: &str = "mappings.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing required file: {0}")]
    MissingFile(PathBuf),
    #[error("Duplicate part id: {0}")]
    DuplicatePartId(PartId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<String>,
}

impl Bike {
    /// Placeholder record for a catalog without `bike.json`
    pub fn from_slug(slug: &str) -> Self {
        Self {
            id: slug.to_string(),
            name: slug.to_string(),
            year: None,
            manufacturer: None,
            views: Vec::new(),
        }
    }

    /// "2021 KTM 500 EXC" style heading
    pub fn title(&self) -> String {
        [self.year.as_deref(), self.manufacturer.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a diagram is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramViewer {
    Three,
    #[default]
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub viewer: DiagramViewer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Diagram {
    /// Model to load, only for 3D diagrams
    pub fn model_url(&self) -> Option<&str> {
        match self.viewer {
            DiagramViewer::Three => self.model_url.as_deref().filter(|u| !u.trim().is_empty()),
            DiagramViewer::Image => None,
        }
    }
}

/// Everything needed to explore one bike
#[derive(Debug, Clone, PartialEq)]
pub struct BikeCatalog {
    pub bike: Bike,
    pub diagram: Diagram,
    pub parts: Vec<Part>,
    pub mappings: MeshPartMappings,
}

impl BikeCatalog {
    /// Load a catalog directory; the slug is the directory name
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let slug = dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let diagram_path = dir.join(DIAGRAM_FILE);
        if !diagram_path.exists() {
            return Err(CatalogError::MissingFile(diagram_path));
        }
        let diagram: Diagram = read_json(&diagram_path)?;
        let bike = read_optional(&dir.join(BIKE_FILE))?.unwrap_or_else(|| Bike::from_slug(&slug));
        let parts: Vec<Part> = read_optional(&dir.join(PARTS_FILE))?.unwrap_or_default();
        let mappings: MeshPartMappings = read_optional(&dir.join(MAPPINGS_FILE))?.unwrap_or_default();

        let catalog = Self::new(bike, diagram, parts, mappings)?;
        tracing::info!(
            bike = %catalog.bike.id,
            parts = catalog.parts.len(),
            path = %dir.display(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from already-fetched document bodies
    pub fn from_documents(
        slug: &str,
        bike: Option<&str>,
        diagram: &str,
        parts: Option<&str>,
        mappings: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let diagram: Diagram = parse_json(DIAGRAM_FILE, diagram)?;
        let bike = match bike {
            Some(body) => parse_json(BIKE_FILE, body)?,
            None => Bike::from_slug(slug),
        };
        let parts: Vec<Part> = match parts {
            Some(body) => parse_json(PARTS_FILE, body)?,
            None => Vec::new(),
        };
        let mappings: MeshPartMappings = match mappings {
            Some(body) => parse_json(MAPPINGS_FILE, body)?,
            None => MeshPartMappings::default(),
        };
        Self::new(bike, diagram, parts, mappings)
    }

    fn new(
        bike: Bike,
        diagram: Diagram,
        parts: Vec<Part>,
        mappings: MeshPartMappings,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for part in &parts {
            if !seen.insert(&part.id) {
                return Err(CatalogError::DuplicatePartId(part.id.clone()));
            }
        }
        Ok(Self {
            bike,
            diagram,
            parts,
            mappings,
        })
    }

    pub fn part(&self, id: &PartId) -> Option<&Part> {
        self.parts.iter().find(|p| &p.id == id)
    }
}

fn parse_json<T: DeserializeOwned>(file: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Json {
        file: file.to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let body = std::fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_json(&file, &body)
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CatalogError> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = r#"{"id":"main","label":"Full bike","viewer":"three","modelUrl":"/models/exc.glb"}"#;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_load_dir_with_defaults() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("exc-500");
        std::fs::create_dir(&dir).unwrap();
        write(&dir, DIAGRAM_FILE, DIAGRAM);

        let catalog = BikeCatalog::load_dir(&dir).unwrap();
        assert_eq!(catalog.bike, Bike::from_slug("exc-500"));
        assert!(catalog.parts.is_empty());
        assert!(catalog.mappings.is_empty());
        assert_eq!(catalog.diagram.model_url(), Some("/models/exc.glb"));
    }

    #[test]
    fn test_load_dir_full() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), DIAGRAM_FILE, DIAGRAM);
        write(
            dir.path(),
            BIKE_FILE,
            r#"{"id":"exc","name":"500 EXC","year":"2021","manufacturer":"KTM"}"#,
        );
        write(
            dir.path(),
            PARTS_FILE,
            r#"[
                {"id":"p1","name":"Front Brake Caliper","partNumber":"BC-1","tags":["brake"]},
                {"id":"p2","name":"Handlebar Grip","links":[{"label":"Shop","url":"https://example.com"}]}
            ]"#,
        );
        write(dir.path(), MAPPINGS_FILE, r#"{"meshNameToPartId":{"Caliper_F":"p1"}}"#);

        let catalog = BikeCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.bike.title(), "2021 KTM 500 EXC");
        assert_eq!(catalog.parts.len(), 2);
        assert_eq!(catalog.parts[0].part_number.as_deref(), Some("BC-1"));
        assert_eq!(catalog.parts[1].links[0].label, "Shop");
        assert_eq!(catalog.mappings.get("Caliper_F"), Some(&PartId::from("p1")));
        assert!(catalog.part(&"p2".into()).is_some());
    }

    #[test]
    fn test_missing_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let err = BikeCatalog::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile(_)));
    }

    #[test]
    fn test_invalid_json_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), DIAGRAM_FILE, DIAGRAM);
        write(dir.path(), PARTS_FILE, "[{");
        match BikeCatalog::load_dir(dir.path()).unwrap_err() {
            CatalogError::Json { file, .. } => assert_eq!(file, PARTS_FILE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_part_ids_rejected() {
        let err = BikeCatalog::from_documents(
            "exc",
            None,
            DIAGRAM,
            Some(r#"[{"id":"p1","name":"A"},{"id":"p1","name":"B"}]"#),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePartId(id) if id.as_str() == "p1"));
    }

    #[test]
    fn test_image_diagram_has_no_model() {
        let catalog = BikeCatalog::from_documents(
            "exc",
            None,
            r#"{"id":"main","label":"Plate","image":"/img/plate.png","width":1200,"height":800}"#,
            None,
            None,
        )
        .unwrap();
        assert_eq!(catalog.diagram.viewer, DiagramViewer::Image);
        assert_eq!(catalog.diagram.model_url(), None);
        assert_eq!(catalog.diagram.width, Some(1200));
    }

    #[test]
    fn test_mappings_without_table() {
        let catalog = BikeCatalog::from_documents("exc", None, DIAGRAM, None, Some("{}")).unwrap();
        assert!(catalog.mappings.is_empty());
        assert_eq!(catalog.mappings.get("anything"), None);
    }
}

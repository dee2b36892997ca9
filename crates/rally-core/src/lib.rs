//! Rally Core - mesh-to-part resolution for exploded vehicle diagrams
//!
//! This crate is renderer-independent. It provides:
//! - Catalog records (bike, diagram, parts, explicit mesh mappings) and loading
//! - Part-key classification and name tokenizing
//! - Zone/height bucketing of meshes against the scene's bounding box
//! - The heuristic, explicit, and click resolution tiers
//! - Explode and highlight state for the current selection
//! - [`ExplorerSession`], which owns selection and mapping state

pub mod catalog;
pub mod config;
pub mod explode;
pub mod mapping;
pub mod part;
pub mod part_key;
pub mod resolve;
pub mod scene;
pub mod session;
pub mod text;
pub mod zone;

#[cfg(test)]
mod testing;

pub use catalog::{Bike, BikeCatalog, CatalogError, Diagram, DiagramViewer};
pub use config::{ConfigError, ExplorerConfig};
pub use explode::{HighlightTarget, MaterialState, MeshPresentation, ScenePresentation};
pub use mapping::{MappingSource, PartMeshAssociation};
pub use part::{MeshPartMappings, Part, PartId, PartLink};
pub use part_key::{classify, PartKey};
pub use resolve::{resolve_click, MeshDebugInfo, Resolution};
pub use scene::{
    find_mesh, MaterialBase, MeshId, MeshNode, ParentFrame, SceneFit, SceneGraph, SceneIndex,
    SceneSnapshot,
};
pub use session::{ExplorerSession, PartCommand, SceneGeneration, Selection};
pub use zone::{Bounds, MeshAnnotation, MeshHeight, MeshZone};

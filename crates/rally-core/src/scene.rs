//! Engine-agnostic view of a loaded model
//!
//! The renderer hands over a [`SceneSnapshot`] once per load: plain data
//! captured from its node tree, expressed in the model root's space. Everything
//! derived from it lives in a [`SceneIndex`] side-table that is dropped on reload.

use bevy_color::LinearRgba;
use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::{FitSettings, ZoneThresholds};
use crate::zone::{classify_mesh, Bounds, MeshAnnotation, SceneFrame};

/// Namespace for name-based mesh ids
const MESH_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5a1b_7c3e_9d24_4f6a_8e01_b2c3_d4e5_f607);

/// Stable identity of a renderable mesh within one scene load
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshId(pub String);

impl MeshId {
    /// Derive an id from the node's hierarchy path under the model root.
    /// The same asset yields the same ids on every load.
    pub fn from_path(path: &str) -> Self {
        Self(Uuid::new_v5(&MESH_ID_NAMESPACE, path.as_bytes()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeshId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimal node-tree queries needed to turn a pointer hit into a mesh
pub trait SceneGraph {
    type Node: Copy + Eq;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn is_mesh(&self, node: Self::Node) -> bool;
}

/// The hit node if it is a mesh, otherwise its nearest mesh ancestor
pub fn find_mesh<G: SceneGraph>(graph: &G, hit: G::Node) -> Option<G::Node> {
    let mut current = Some(hit);
    while let Some(node) = current {
        if graph.is_mesh(node) {
            return Some(node);
        }
        current = graph.parent(node);
    }
    None
}

/// Material colors captured the first time a mesh is visited
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialBase {
    pub color: LinearRgba,
    pub emissive: LinearRgba,
    pub emissive_intensity: f32,
    /// Whether the material renders an emissive term at all
    pub supports_emissive: bool,
}

impl Default for MaterialBase {
    fn default() -> Self {
        Self {
            color: LinearRgba::new(0.5, 0.5, 0.5, 1.0),
            emissive: LinearRgba::BLACK,
            emissive_intensity: 0.0,
            supports_emissive: true,
        }
    }
}

/// Rotation and scale of a mesh's parent, relative to the model root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ParentFrame {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// One renderable mesh as captured from the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub id: MeshId,
    pub name: String,
    pub parent_name: Option<String>,
    /// Bounds in model-root space
    pub bounds: Bounds,
    /// Mesh origin in model-root space
    pub origin: Vec3,
    /// Local translation at load time
    pub base_translation: Vec3,
    pub parent_frame: ParentFrame,
    pub material: Option<MaterialBase>,
}

impl MeshNode {
    /// Names checked against the explicit mapping table: own name, then parent name
    pub fn lookup_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.parent_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Everything captured from one scene load, in traversal order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub meshes: Vec<MeshNode>,
}

impl SceneSnapshot {
    pub fn bounds(&self) -> Bounds {
        self.meshes
            .iter()
            .fold(Bounds::EMPTY, |acc, mesh| acc.union(&mesh.bounds))
    }
}

/// Scale and offset that center the model and normalize its largest dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFit {
    pub scale: f32,
    pub offset: Vec3,
}

impl Default for SceneFit {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec3::ZERO,
        }
    }
}

impl SceneFit {
    pub fn from_bounds(bounds: &Bounds, settings: &FitSettings) -> Self {
        let size = bounds.size();
        let max_dim = size.max_element();
        let max_dim = if max_dim > 0.0 && max_dim.is_finite() { max_dim } else { 1.0 };
        let scale = settings.target_size / max_dim;
        Self {
            scale,
            offset: -bounds.center() * scale,
        }
    }
}

/// A mesh plus its derived annotation
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    pub node: MeshNode,
    pub annotation: MeshAnnotation,
}

/// Per-load side-table: annotations and base state for every mesh
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    records: Vec<MeshRecord>,
    by_id: HashMap<MeshId, usize>,
    frame: Option<SceneFrame>,
    fit: SceneFit,
}

impl SceneIndex {
    /// Run the geometry pass over a snapshot
    pub fn build(snapshot: SceneSnapshot, thresholds: &ZoneThresholds, fit: &FitSettings) -> Self {
        let bounds = snapshot.bounds();
        let frame = SceneFrame::from_bounds(&bounds);

        let mut records = Vec::with_capacity(snapshot.meshes.len());
        let mut by_id = HashMap::with_capacity(snapshot.meshes.len());
        for node in snapshot.meshes {
            // Meshes without geometry are bucketed by their origin
            let center = if node.bounds.is_empty() {
                node.origin
            } else {
                node.bounds.center()
            };
            let annotation = classify_mesh(center, &frame, thresholds);
            if by_id.insert(node.id.clone(), records.len()).is_some() {
                tracing::warn!(mesh = %node.id, name = %node.name, "Duplicate mesh id in snapshot");
            }
            records.push(MeshRecord { node, annotation });
        }

        Self {
            records,
            by_id,
            frame: Some(frame),
            fit: SceneFit::from_bounds(&bounds, fit),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn frame(&self) -> Option<&SceneFrame> {
        self.frame.as_ref()
    }

    pub fn fit(&self) -> SceneFit {
        self.fit
    }

    pub fn get(&self, id: &MeshId) -> Option<&MeshRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &MeshId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Records in traversal order
    pub fn iter(&self) -> impl Iterator<Item = &MeshRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mesh_at;
    use crate::zone::{MeshHeight, MeshZone};
    use std::collections::HashMap;

    struct ToyGraph {
        parents: HashMap<u32, u32>,
        meshes: Vec<u32>,
    }

    impl SceneGraph for ToyGraph {
        type Node = u32;

        fn parent(&self, node: u32) -> Option<u32> {
            self.parents.get(&node).copied()
        }

        fn is_mesh(&self, node: u32) -> bool {
            self.meshes.contains(&node)
        }
    }

    #[test]
    fn test_find_mesh_walks_up() {
        // 1 (root) -> 2 (mesh) -> 3 -> 4 (hit)
        let graph = ToyGraph {
            parents: HashMap::from([(2, 1), (3, 2), (4, 3)]),
            meshes: vec![2],
        };
        assert_eq!(find_mesh(&graph, 4), Some(2));
        assert_eq!(find_mesh(&graph, 2), Some(2));
        assert_eq!(find_mesh(&graph, 1), None);
    }

    #[test]
    fn test_mesh_id_is_stable_per_path() {
        assert_eq!(MeshId::from_path("Scene/0:Fork"), MeshId::from_path("Scene/0:Fork"));
        assert_ne!(MeshId::from_path("Scene/0:Fork"), MeshId::from_path("Scene/1:Fork"));
    }

    #[test]
    fn test_lookup_names_skip_blank() {
        let mut node = mesh_at("  ", Vec3::ZERO);
        node.parent_name = Some("ForkAssembly".to_string());
        assert_eq!(node.lookup_names().collect::<Vec<_>>(), vec!["ForkAssembly"]);
    }

    #[test]
    fn test_scene_fit() {
        let bounds = Bounds::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(8.0, 4.0, 2.0));
        let fit = SceneFit::from_bounds(&bounds, &FitSettings::default());
        assert!((fit.scale - 0.4).abs() < 1e-6);
        assert!((fit.offset - Vec3::new(-1.6, -0.8, -0.4)).length() < 1e-5);

        let degenerate = SceneFit::from_bounds(&Bounds::EMPTY, &FitSettings::default());
        assert_eq!(degenerate.scale, 3.2);
        assert_eq!(degenerate.offset, Vec3::ZERO);
    }

    #[test]
    fn test_index_annotates_every_mesh() {
        let snapshot = SceneSnapshot {
            meshes: vec![
                mesh_at("front", Vec3::new(4.0, 0.0, 0.0)),
                mesh_at("rear", Vec3::new(-4.0, 0.0, 0.0)),
                mesh_at("middle", Vec3::new(0.0, 0.0, 0.0)),
            ],
        };
        let index = SceneIndex::build(snapshot, &ZoneThresholds::default(), &FitSettings::default());
        assert_eq!(index.len(), 3);
        let zones: Vec<MeshZone> = index.iter().map(|r| r.annotation.zone).collect();
        assert_eq!(zones, vec![MeshZone::Front, MeshZone::Rear, MeshZone::Center]);
        assert!(index.iter().all(|r| r.annotation.height == MeshHeight::Mid));
        assert!(index.contains(&MeshId::from_path("rear")));
    }
}

//! Shared fixtures for unit tests

use bevy_math::Vec3;

use crate::part::Part;
use crate::scene::{MaterialBase, MeshId, MeshNode, ParentFrame, SceneSnapshot};
use crate::zone::Bounds;

/// A small cube-shaped mesh centered at `center`, directly under the model root
pub fn mesh_at(name: &str, center: Vec3) -> MeshNode {
    MeshNode {
        id: MeshId::from_path(name),
        name: name.to_string(),
        parent_name: None,
        bounds: Bounds::new(center - Vec3::splat(0.1), center + Vec3::splat(0.1)),
        origin: center,
        base_translation: center,
        parent_frame: ParentFrame::default(),
        material: Some(MaterialBase::default()),
    }
}

pub fn parts(list: &[(&str, &str)]) -> Vec<Part> {
    list.iter().map(|(id, name)| Part::new(*id, *name)).collect()
}

/// A 10 x 4 x 2 model: meshes at the eight extreme buckets plus the center.
///
/// Returned meshes, in order: front-top, front-low, rear-top, rear-low,
/// center-top, center-low, center-mid, and two bound-setting corner meshes.
pub fn bike_snapshot() -> SceneSnapshot {
    SceneSnapshot {
        meshes: vec![
            mesh_at("HandlebarMesh", Vec3::new(4.5, 1.5, 0.0)),
            mesh_at("ForkLower", Vec3::new(4.5, -1.5, 0.0)),
            mesh_at("SeatMesh", Vec3::new(-4.5, 1.5, 0.0)),
            mesh_at("Node003", Vec3::new(-4.5, -1.5, 0.0)),
            mesh_at("TankShell", Vec3::new(0.0, 1.5, 0.0)),
            mesh_at("Crankcase", Vec3::new(0.0, -1.5, 0.0)),
            mesh_at("Node010", Vec3::new(0.0, 0.0, 0.0)),
            mesh_at("BoundsMin", Vec3::new(-4.9, -1.9, -0.9)),
            mesh_at("BoundsMax", Vec3::new(4.9, 1.9, 0.9)),
        ],
    }
}

//! Pointer picking: ray cast against the model and resolve the hit to a part

use bevy::prelude::*;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use rally_core::{find_mesh, SceneGraph};

use crate::camera::{MainCamera, TurntableState};
use crate::types::{ExplorerState, SceneMesh};

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, pick_mesh.after(crate::camera::CameraSystems));
    }
}

/// Node tree view over ECS parent links
struct EntityGraph<'a, 'w, 's> {
    nodes: &'a Query<'w, 's, (Option<&'static ChildOf>, Has<SceneMesh>)>,
}

impl SceneGraph for EntityGraph<'_, '_, '_> {
    type Node = Entity;

    fn parent(&self, node: Entity) -> Option<Entity> {
        self.nodes
            .get(node)
            .ok()
            .and_then(|(child_of, _)| child_of.map(|c| c.parent()))
    }

    fn is_mesh(&self, node: Entity) -> bool {
        self.nodes.get(node).map(|(_, is_mesh)| is_mesh).unwrap_or(false)
    }
}

/// Resolve a click to the nearest captured mesh under the pointer
pub(crate) fn pick_mesh(
    turntable: Res<TurntableState>,
    mut explorer: ResMut<ExplorerState>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut ray_cast: MeshRayCast,
    nodes: Query<(Option<&'static ChildOf>, Has<SceneMesh>)>,
    scene_meshes: Query<&SceneMesh>,
) {
    let Some(position) = turntable.click else {
        return;
    };
    if explorer.session.scene().is_none() {
        return;
    }
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, position) else {
        return;
    };

    let graph = EntityGraph { nodes: &nodes };
    let hit_mesh = ray_cast
        .cast_ray(ray, &MeshRayCastSettings::default())
        .iter()
        .find_map(|(entity, _)| find_mesh(&graph, *entity));
    let Some(mesh_entity) = hit_mesh else {
        return;
    };
    let Ok(scene_mesh) = scene_meshes.get(mesh_entity) else {
        return;
    };

    let resolved = explorer.session.click_mesh(&scene_mesh.id);
    tracing::debug!(mesh = %scene_mesh.id, part = ?resolved, "Picked mesh");
}

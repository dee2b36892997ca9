//! Apply explode and highlight state to mesh transforms and materials

use bevy::prelude::*;
use rally_core::{MaterialState, MeshPresentation};
use std::collections::HashMap;

use crate::models::ModelSystems;
use crate::types::{ExplorerState, SceneMesh};

pub struct HighlightPlugin;

impl Plugin for HighlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            apply_presentation
                .after(ModelSystems)
                .after(crate::picking::pick_mesh)
                .after(crate::scene::SceneInputSystems),
        );
    }
}

/// Rewrite every captured mesh whenever the session changes. All values come
/// from captured base state, so a redundant pass changes nothing.
fn apply_presentation(
    explorer: Res<ExplorerState>,
    mut scene_meshes: Query<(&SceneMesh, &mut Transform, Option<&MeshMaterial3d<StandardMaterial>>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !explorer.is_changed() {
        return;
    }

    let presentation = explorer.session.presentation();
    let by_id: HashMap<_, &MeshPresentation> = presentation.meshes.iter().map(|m| (&m.id, m)).collect();

    for (scene_mesh, mut transform, material_handle) in scene_meshes.iter_mut() {
        let Some(mesh) = by_id.get(&scene_mesh.id) else {
            continue;
        };
        if transform.translation != mesh.translation {
            transform.translation = mesh.translation;
        }
        if let (Some(state), Some(handle)) = (mesh.material, material_handle) {
            if let Some(material) = materials.get_mut(&handle.0) {
                write_material(material, &state);
            }
        }
    }
}

fn write_material(material: &mut StandardMaterial, state: &MaterialState) {
    material.base_color = Color::LinearRgba(state.color);
    material.emissive = state.emissive * state.emissive_intensity;
}

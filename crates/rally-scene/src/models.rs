//! glTF model loading and scene capture
//!
//! A load runs in two phases. The asset is requested and polled until it is
//! loaded, then its scene is spawned under the turntable pivot. Once the scene
//! instance is ready every mesh is captured into a [`SceneSnapshot`] and handed
//! to the session together with the generation token issued when the load began.

use bevy::gltf::Gltf;
use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};
use rally_core::{
    Bounds, MaterialBase, MeshId, MeshNode, ParentFrame, SceneGeneration, SceneSnapshot,
};

use crate::camera::TurntableState;
use crate::types::{CatalogState, ExplorerState, ModelFit, ModelPivot, ModelRoot, ModelStatus, SceneMesh};

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoad>().add_systems(
            Update,
            (sync_catalog, poll_model_load, capture_scene)
                .chain()
                .in_set(ModelSystems),
        );
    }
}

/// Systems that load models and feed the session
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelSystems;

/// The model currently requested
#[derive(Resource, Debug, Default)]
pub struct ModelLoad {
    pub url: Option<String>,
    pub gltf: Option<Handle<Gltf>>,
    pub generation: SceneGeneration,
    pub status: ModelStatus,
}

/// Push catalog changes into the session and start a model load when the
/// diagram's model changes
fn sync_catalog(
    mut commands: Commands,
    catalog: Res<CatalogState>,
    mut explorer: ResMut<ExplorerState>,
    mut load: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    pivots: Query<Entity, With<ModelPivot>>,
) {
    if !catalog.is_changed() {
        return;
    }
    let Some(bike) = &catalog.catalog else {
        return;
    };

    explorer.session.set_parts(bike.parts.clone());
    explorer.session.set_mappings(bike.mappings.clone());

    let url = bike.diagram.model_url().map(str::to_string);
    if url == load.url {
        return;
    }

    for pivot in pivots.iter() {
        commands.entity(pivot).despawn();
    }
    let generation = explorer.session.begin_scene_load();
    match &url {
        Some(model_url) => {
            tracing::info!(url = %model_url, generation = generation.0, "Loading model");
            *load = ModelLoad {
                url: url.clone(),
                gltf: Some(asset_server.load::<Gltf>(model_asset_path(model_url))),
                generation,
                status: ModelStatus::Loading,
            };
        }
        None => {
            *load = ModelLoad {
                generation,
                ..default()
            };
        }
    }
}

/// Catalog model urls are site-absolute ("/models/x.glb"); the asset server
/// wants them relative to its root. Remote urls pass through.
fn model_asset_path(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    url.trim_start_matches('/').to_string()
}

/// Wait for the glTF asset, then spawn its scene under a fresh pivot
fn poll_model_load(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    turntable: Res<TurntableState>,
) {
    if load.status != ModelStatus::Loading {
        return;
    }
    let Some(handle) = load.gltf.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(bevy::asset::LoadState::Loaded) => {
            let scene = gltf_assets
                .get(&handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
            let Some(scene) = scene else {
                tracing::error!(url = ?load.url, "Model has no scenes");
                load.status = ModelStatus::Failed("model has no scenes".to_string());
                return;
            };

            let generation = load.generation;
            commands
                .spawn((
                    ModelPivot,
                    Transform::from_rotation(Quat::from_rotation_y(turntable.rotation_y)),
                    Visibility::default(),
                ))
                .with_children(|pivot| {
                    pivot
                        .spawn((ModelFit, Transform::default(), Visibility::default()))
                        .with_children(|fit| {
                            fit.spawn((SceneRoot(scene), ModelRoot { generation }));
                        });
                });
            tracing::info!(url = ?load.url, "Model loaded");
            load.status = ModelStatus::Spawning;
        }
        Some(bevy::asset::LoadState::Failed(err)) => {
            tracing::error!(url = ?load.url, "Failed to load model: {}", err);
            load.status = ModelStatus::Failed(err.to_string());
        }
        _ => {}
    }
}

/// Pending node during the capture walk
struct Visit {
    entity: Entity,
    path: String,
    /// Transform relative to the model root
    affine: Affine3A,
    parent: Option<(Entity, Affine3A)>,
}

/// Capture every mesh of a ready scene instance and hand the snapshot to the session
#[allow(clippy::too_many_arguments)]
fn capture_scene(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    mut explorer: ResMut<ExplorerState>,
    scene_spawner: Res<SceneSpawner>,
    roots: Query<(Entity, &ModelRoot, Option<&SceneInstance>)>,
    mut fits: Query<&mut Transform, With<ModelFit>>,
    children_query: Query<&Children>,
    nodes: Query<(&Transform, Option<&Name>, Option<&ChildOf>), Without<ModelFit>>,
    mesh_query: Query<(&Mesh3d, Option<&MeshMaterial3d<StandardMaterial>>)>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if load.status != ModelStatus::Spawning {
        return;
    }
    let Some((root, model_root, instance)) = roots.iter().find(|(_, r, _)| r.generation == load.generation) else {
        return;
    };
    let Some(instance) = instance else {
        return;
    };
    if !scene_spawner.instance_is_ready(**instance) {
        return;
    }

    let name_of = |entity: Entity| -> Option<String> {
        nodes
            .get(entity)
            .ok()
            .and_then(|(_, name, _)| name.map(|n| n.as_str().to_string()))
    };

    // Pre-order walk so snapshot order matches the glTF node order
    let mut stack: Vec<Visit> = Vec::new();
    if let Ok(children) = children_query.get(root) {
        for (i, child) in children.iter().enumerate().rev() {
            if let Ok((transform, name, _)) = nodes.get(child) {
                stack.push(Visit {
                    entity: child,
                    path: format!("{}:{}", i, name.map(|n| n.as_str()).unwrap_or("")),
                    affine: transform.compute_affine(),
                    parent: None,
                });
            }
        }
    }

    let mut snapshot = SceneSnapshot::default();
    while let Some(visit) = stack.pop() {
        if let Ok(children) = children_query.get(visit.entity) {
            for (i, child) in children.iter().enumerate().rev() {
                if let Ok((transform, name, _)) = nodes.get(child) {
                    stack.push(Visit {
                        entity: child,
                        path: format!("{}/{}:{}", visit.path, i, name.map(|n| n.as_str()).unwrap_or("")),
                        affine: visit.affine * transform.compute_affine(),
                        parent: Some((visit.entity, visit.affine)),
                    });
                }
            }
        }

        let Ok((mesh3d, material_handle)) = mesh_query.get(visit.entity) else {
            continue;
        };
        let Ok((transform, own_name, _)) = nodes.get(visit.entity) else {
            continue;
        };

        // glTF primitives are spawned as children of their node; the node
        // carries the authored name
        let (name, parent_name) = match visit.parent {
            Some((node, _)) => {
                let grandparent = nodes
                    .get(node)
                    .ok()
                    .and_then(|(_, _, child_of)| child_of.map(|c| c.parent()))
                    .filter(|&e| e != root);
                (name_of(node).unwrap_or_default(), grandparent.and_then(name_of))
            }
            None => (own_name.map(|n| n.as_str().to_string()).unwrap_or_default(), None),
        };

        let bounds = meshes
            .get(&mesh3d.0)
            .and_then(|mesh| mesh.attribute(Mesh::ATTRIBUTE_POSITION))
            .and_then(|values| values.as_float3())
            .map(|positions| {
                Bounds::from_points(positions.iter().map(|p| Vec3::from_array(*p))).transformed(&visit.affine)
            })
            .unwrap_or(Bounds::EMPTY);

        let parent_frame = visit
            .parent
            .map(|(_, affine)| {
                let (scale, rotation, _) = affine.to_scale_rotation_translation();
                ParentFrame { rotation, scale }
            })
            .unwrap_or_default();

        // Each mesh gets its own material so highlighting never leaks to
        // meshes sharing a glTF material
        let material = material_handle.and_then(|handle| {
            let original = materials.get(&handle.0)?.clone();
            let base = MaterialBase {
                color: original.base_color.to_linear(),
                emissive: original.emissive,
                emissive_intensity: 1.0,
                supports_emissive: !original.unlit,
            };
            let own = materials.add(original);
            commands.entity(visit.entity).insert(MeshMaterial3d(own));
            Some(base)
        });

        let id = MeshId::from_path(&visit.path);
        commands.entity(visit.entity).insert(SceneMesh { id: id.clone() });
        snapshot.meshes.push(MeshNode {
            id,
            name,
            parent_name,
            bounds,
            origin: Vec3::from(visit.affine.translation),
            base_translation: transform.translation,
            parent_frame,
            material,
        });
    }

    let mesh_count = snapshot.meshes.len();
    if explorer.session.finish_scene_load(model_root.generation, snapshot) {
        let fit = explorer.session.fit();
        for mut transform in fits.iter_mut() {
            *transform = Transform::from_translation(fit.offset).with_scale(Vec3::splat(fit.scale));
        }
        tracing::info!(meshes = mesh_count, scale = fit.scale, "Scene captured");
        load.status = ModelStatus::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_asset_path() {
        assert_eq!(model_asset_path("/models/exc-300.glb"), "models/exc-300.glb");
        assert_eq!(model_asset_path("models/exc-300.glb"), "models/exc-300.glb");
        assert_eq!(
            model_asset_path("https://cdn.example.com/exc.glb"),
            "https://cdn.example.com/exc.glb"
        );
    }
}

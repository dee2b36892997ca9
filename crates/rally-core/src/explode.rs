//! Explode and highlight state for the current selection
//!
//! Pure function of the scene index and selection target. The renderer applies
//! the returned [`ScenePresentation`] verbatim; because every value is derived
//! from captured base state, applying it any number of times gives the same
//! scene.

use bevy_color::LinearRgba;
use bevy_math::Vec3;

use crate::config::ExplodeSettings;
use crate::part_key::PartKey;
use crate::scene::{MaterialBase, MeshId, MeshNode, SceneFit, SceneIndex};
use crate::zone::mesh_matches_key;

/// What the selection highlights
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightTarget {
    #[default]
    None,
    /// A single resolved mesh
    Mesh(MeshId),
    /// Every mesh qualifying for a key; used when the selected part has no mesh
    Key(PartKey),
}

impl HighlightTarget {
    /// Selected mesh first, then the part's associated mesh, then the part's key
    pub fn resolve(
        selected_mesh: Option<&MeshId>,
        associated_mesh: Option<&MeshId>,
        selected_key: Option<PartKey>,
    ) -> Self {
        match (selected_mesh.or(associated_mesh), selected_key) {
            (Some(mesh), _) => HighlightTarget::Mesh(mesh.clone()),
            (None, Some(key)) => HighlightTarget::Key(key),
            (None, None) => HighlightTarget::None,
        }
    }
}

/// Material values to write back on a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialState {
    pub color: LinearRgba,
    pub emissive: LinearRgba,
    pub emissive_intensity: f32,
}

impl MaterialState {
    pub fn base(base: &MaterialBase) -> Self {
        Self {
            color: base.color,
            emissive: base.emissive,
            emissive_intensity: base.emissive_intensity,
        }
    }

    pub fn highlighted(base: &MaterialBase, emissive_intensity: f32) -> Self {
        let inverse = invert(base.color);
        if base.supports_emissive {
            Self {
                color: base.color,
                emissive: inverse,
                emissive_intensity,
            }
        } else {
            Self {
                color: inverse,
                ..Self::base(base)
            }
        }
    }
}

/// `1 - c` per channel, alpha kept
pub fn invert(color: LinearRgba) -> LinearRgba {
    LinearRgba::new(1.0 - color.red, 1.0 - color.green, 1.0 - color.blue, color.alpha)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshPresentation {
    pub id: MeshId,
    /// Local translation relative to the mesh's parent
    pub translation: Vec3,
    /// `None` when the mesh has no material with a color
    pub material: Option<MaterialState>,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePresentation {
    pub meshes: Vec<MeshPresentation>,
}

impl ScenePresentation {
    pub fn get(&self, id: &MeshId) -> Option<&MeshPresentation> {
        self.meshes.iter().find(|m| &m.id == id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &MeshPresentation> {
        self.meshes.iter().filter(|m| m.selected)
    }
}

/// Local translation of `node` pushed away from the model origin.
///
/// The offset is `distance` long in fitted world units and is carried into the
/// parent's local space by undoing the parent's rotation and scale.
pub fn exploded_translation(node: &MeshNode, fit: &SceneFit, settings: &ExplodeSettings) -> Vec3 {
    let scale = if fit.scale > 0.0 { fit.scale } else { 1.0 };
    // Degeneracy is judged in fitted world units, like the explode distance
    let direction = if (node.origin * scale).length_squared() < settings.degenerate_epsilon {
        Vec3::Y
    } else {
        node.origin.normalize()
    };
    let offset_root = direction * (settings.distance / scale);

    let frame = &node.parent_frame;
    let unrotated = frame.rotation.inverse() * offset_root;
    let safe_scale = Vec3::select(frame.scale.cmpeq(Vec3::ZERO), Vec3::ONE, frame.scale);
    node.base_translation + unrotated / safe_scale
}

/// Presentation of every mesh in traversal order
pub fn compute_presentation(
    index: &SceneIndex,
    target: &HighlightTarget,
    settings: &ExplodeSettings,
) -> ScenePresentation {
    let fit = index.fit();
    let meshes = index
        .iter()
        .map(|record| {
            let selected = match target {
                HighlightTarget::None => false,
                HighlightTarget::Mesh(id) => &record.node.id == id,
                HighlightTarget::Key(key) => mesh_matches_key(Some(&record.annotation), *key),
            };
            let translation = if selected {
                exploded_translation(&record.node, &fit, settings)
            } else {
                record.node.base_translation
            };
            let material = record.node.material.as_ref().map(|base| {
                if selected {
                    MaterialState::highlighted(base, settings.emissive_intensity)
                } else {
                    MaterialState::base(base)
                }
            });
            MeshPresentation {
                id: record.node.id.clone(),
                translation,
                material,
                selected,
            }
        })
        .collect();
    ScenePresentation { meshes }
}

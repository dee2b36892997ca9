//! Spatial bucketing of meshes relative to the whole model
//!
//! Every mesh is placed in a zone along the model's dominant length axis
//! (front/center/rear) and a height band along +Y (top/mid/low). Those two
//! buckets stand in for "which region of the vehicle is this geometry".

use bevy_math::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ZoneThresholds;
use crate::part_key::PartKey;

/// Position along the model's length axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshZone {
    Front,
    Rear,
    Center,
}

/// Position along +Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshHeight {
    Top,
    Mid,
    Low,
}

/// Zone and height computed for one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshAnnotation {
    pub zone: MeshZone,
    pub height: MeshHeight,
}

impl Default for MeshAnnotation {
    /// Used for meshes that have not been through the geometry pass
    fn default() -> Self {
        Self {
            zone: MeshZone::Center,
            height: MeshHeight::Mid,
        }
    }
}

/// Axis-aligned bounding box. An empty box has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Bounds of a point cloud; non-finite points are skipped
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.expand(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, point: Vec3) {
        if !point.is_finite() {
            return;
        }
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center of the box; the origin for an empty box
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Extent of the box; zero for an empty box
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Axis-aligned bounds of this box after an affine transform (all 8 corners)
    pub fn transformed(&self, transform: &Affine3A) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        let (min, max) = (self.min, self.max);
        Bounds::from_points((0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            transform.transform_point3(corner)
        }))
    }
}

/// The model's longest axis, chosen once per scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthAxis {
    #[default]
    X,
    Y,
    Z,
}

impl LengthAxis {
    /// Axis with the largest extent. Ties go to the earlier axis (x, then y, then z).
    pub fn of_size(size: Vec3) -> Self {
        let mut axis = LengthAxis::X;
        let mut best = size.x;
        if size.y > best {
            axis = LengthAxis::Y;
            best = size.y;
        }
        if size.z > best {
            axis = LengthAxis::Z;
        }
        axis
    }

    pub fn component(&self, v: Vec3) -> f32 {
        match self {
            LengthAxis::X => v.x,
            LengthAxis::Y => v.y,
            LengthAxis::Z => v.z,
        }
    }
}

/// Whole-scene reference frame for bucketing meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFrame {
    pub center: Vec3,
    pub size: Vec3,
    pub length_axis: LengthAxis,
}

impl SceneFrame {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        let size = bounds.size();
        Self {
            center: bounds.center(),
            size,
            length_axis: LengthAxis::of_size(size),
        }
    }
}

/// Bucket a mesh by its bounding-box center relative to the scene frame
pub fn classify_mesh(mesh_center: Vec3, frame: &SceneFrame, thresholds: &ZoneThresholds) -> MeshAnnotation {
    let axis = frame.length_axis;
    let rel_length = axis.component(mesh_center) - axis.component(frame.center);
    let length_threshold = axis.component(frame.size) * thresholds.length_threshold;

    let rel_height = mesh_center.y - frame.center.y;
    let height_threshold = frame.size.y * thresholds.height_threshold;

    let zone = if rel_length > length_threshold {
        MeshZone::Front
    } else if rel_length < -length_threshold {
        MeshZone::Rear
    } else {
        MeshZone::Center
    };

    let height = if rel_height > height_threshold {
        MeshHeight::Top
    } else if rel_height < -height_threshold {
        MeshHeight::Low
    } else {
        MeshHeight::Mid
    };

    MeshAnnotation { zone, height }
}

/// The single key a mesh stands for. Unannotated meshes are `Frame`.
pub fn key_from_mesh(annotation: Option<&MeshAnnotation>) -> PartKey {
    let Some(a) = annotation else {
        return PartKey::Frame;
    };
    match (a.zone, a.height) {
        (MeshZone::Front, MeshHeight::Top) => PartKey::Handlebar,
        (MeshZone::Front, _) => PartKey::Front,
        (MeshZone::Rear, MeshHeight::Top) => PartKey::Seat,
        (MeshZone::Rear, _) => PartKey::Rear,
        (MeshZone::Center, MeshHeight::Top) => PartKey::Tank,
        (MeshZone::Center, MeshHeight::Low) => PartKey::Engine,
        _ => PartKey::Frame,
    }
}

/// Whether a mesh belongs to the highlight group of `key`.
///
/// Looser than [`key_from_mesh`]: a mesh can qualify for several keys.
/// Unannotated meshes qualify for none.
pub fn mesh_matches_key(annotation: Option<&MeshAnnotation>, key: PartKey) -> bool {
    let Some(a) = annotation else {
        return false;
    };
    let (zone, height) = (a.zone, a.height);
    match key {
        PartKey::Front => zone == MeshZone::Front,
        PartKey::Rear => zone == MeshZone::Rear,
        PartKey::Handlebar => zone == MeshZone::Front && height == MeshHeight::Top,
        PartKey::Tank => zone == MeshZone::Center && height == MeshHeight::Top,
        PartKey::Seat => zone == MeshZone::Rear && height == MeshHeight::Top,
        PartKey::Engine => zone == MeshZone::Center && height != MeshHeight::Top,
        PartKey::Radiator => zone == MeshZone::Front && height == MeshHeight::Mid,
        PartKey::Exhaust => zone == MeshZone::Rear && height != MeshHeight::Top,
        PartKey::Signals => {
            height == MeshHeight::Top && (zone == MeshZone::Front || zone == MeshZone::Rear)
        }
        PartKey::Frame => zone == MeshZone::Center,
    }
}

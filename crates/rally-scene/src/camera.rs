//! Fixed camera and turntable rotation of the model

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use crate::types::{ExplorerState, ModelPivot};

/// Pixels a press may travel and still count as a click
pub const CLICK_SLOP: f32 = 4.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Pointer gesture state shared by the turntable and the picker
#[derive(Resource, Debug, Default)]
pub struct TurntableState {
    /// Model rotation about +Y, radians
    pub rotation_y: f32,
    press_position: Option<Vec2>,
    dragging: bool,
    /// Set for one frame when a press is released without dragging
    pub click: Option<Vec2>,
}

impl TurntableState {
    fn press(&mut self, position: Vec2) {
        self.press_position = Some(position);
        self.dragging = false;
    }

    fn moved(&mut self, position: Vec2) {
        if let Some(start) = self.press_position {
            if position.distance(start) > CLICK_SLOP {
                self.dragging = true;
            }
        }
    }

    fn release(&mut self) {
        if !self.dragging {
            self.click = self.press_position;
        }
        self.press_position = None;
        self.dragging = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.press_position.is_some()
    }
}

/// Pointer tracking; runs before anything that reads [`TurntableState::click`]
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraSystems;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurntableState>()
            .add_systems(Update, (track_pointer, apply_turntable).chain().in_set(CameraSystems));
    }
}

/// Mouse and single-touch gestures: a drag rotates, a press without travel clicks
fn track_pointer(
    mut turntable: ResMut<TurntableState>,
    explorer: Res<ExplorerState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut contexts: bevy_egui::EguiContexts,
) {
    turntable.click = None;

    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let sensitivity = explorer.session.config().turntable.sensitivity;

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    let Ok(window) = windows.single() else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) && !egui_wants_pointer {
        if let Some(cursor) = window.cursor_position() {
            turntable.press(cursor);
        }
    }
    if turntable.is_pressed() && mouse_button.pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            turntable.moved(cursor);
        }
        if turntable.dragging {
            turntable.rotation_y += total_motion.x * sensitivity;
        }
    }
    if mouse_button.just_released(MouseButton::Left) && turntable.is_pressed() {
        turntable.release();
    }

    // Touch
    if let Some(touch) = touch_input.iter().next() {
        if touch_input.just_pressed(touch.id()) && !egui_wants_pointer {
            turntable.press(touch.position());
        } else if turntable.is_pressed() {
            turntable.moved(touch.position());
            if turntable.dragging {
                turntable.rotation_y += touch.delta().x * sensitivity;
            }
        }
    }
    for touch in touch_input.iter_just_released() {
        if turntable.is_pressed() {
            turntable.moved(touch.position());
            turntable.release();
        }
    }
}

fn apply_turntable(turntable: Res<TurntableState>, mut pivots: Query<&mut Transform, With<ModelPivot>>) {
    if !turntable.is_changed() {
        return;
    }
    for mut transform in pivots.iter_mut() {
        transform.rotation = Quat::from_rotation_y(turntable.rotation_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_is_click() {
        let mut state = TurntableState::default();
        state.press(Vec2::new(10.0, 10.0));
        state.moved(Vec2::new(12.0, 11.0));
        state.release();
        assert_eq!(state.click, Some(Vec2::new(10.0, 10.0)));
        assert!(!state.is_pressed());
    }

    #[test]
    fn test_drag_is_not_click() {
        let mut state = TurntableState::default();
        state.press(Vec2::new(10.0, 10.0));
        state.moved(Vec2::new(40.0, 10.0));
        // Coming back near the start does not turn a drag into a click
        state.moved(Vec2::new(11.0, 10.0));
        state.release();
        assert_eq!(state.click, None);
    }
}

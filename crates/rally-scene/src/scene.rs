//! Scene setup - camera, lights, and keyboard/command input

use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::types::{ExplorerState, PartCommandMessage};

/// Systems that change the selection from keyboard or UI commands
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneInputSystems;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PartCommandMessage>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (apply_part_commands, handle_deselection).in_set(SceneInputSystems),
            );
    }
}

fn setup_scene(mut commands: Commands) {
    // The model is fitted to a few units around the origin
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 45f32.to_radians(),
            near: 0.01,
            far: 100.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 1.4, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 600.0,
        ..default()
    });

    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill light
    commands.spawn((
        DirectionalLight {
            illuminance: 2500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-4.0, 2.0, -3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn apply_part_commands(mut commands: MessageReader<PartCommandMessage>, mut explorer: ResMut<ExplorerState>) {
    for PartCommandMessage(command) in commands.read() {
        explorer.session.dispatch(command.clone());
    }
}

/// Handle Escape key to deselect current selection
fn handle_deselection(mut explorer: ResMut<ExplorerState>, keyboard: Res<ButtonInput<KeyCode>>) {
    if keyboard.just_pressed(KeyCode::Escape) && !explorer.session.selection().is_empty() {
        explorer.session.clear_selection();
    }
}

//! Gesture-driven transform of the selected object
//!
//! While a mode is active every tick writes a live, uncommitted transform
//! derived from the drag since the gesture started. Leaving the mode turns
//! the net change into a single action on the undo stack.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use crate::input::PointerFrame;
use crate::state::action::Action;
use crate::state::scene::{short_id, SceneState};
use crate::state::settings::ManipulationSettings;
use crate::viewport::{Layer, WorldQuery};

/// Active manipulation of the selected object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManipulationMode {
    #[default]
    None,
    /// Turn about the world up axis
    RotateY,
    /// Turn about the camera right axis
    RotateX,
    /// Uniform scale
    Scale,
    /// Follow the pointer over the ground
    Translate,
}

/// Transform of the target when the current mode was entered
#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureStart {
    screen_pos: Vec2,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

#[derive(Debug, Default)]
pub struct ManipulationMachine {
    target: Option<ObjectId>,
    mode: ManipulationMode,
    start: Option<GestureStart>,
}

impl ManipulationMachine {
    pub fn mode(&self) -> ManipulationMode {
        self.mode
    }

    pub fn target(&self) -> Option<&ObjectId> {
        self.target.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    /// Start driving `object`, with no mode active
    pub fn attach(&mut self, object: ObjectId) {
        self.target = Some(object);
        self.mode = ManipulationMode::None;
        self.start = None;
    }

    /// Stop driving the current object. An active gesture is committed first.
    pub fn detach(&mut self, scene: &mut SceneState) {
        self.set_mode(ManipulationMode::None, Vec2::ZERO, scene);
        self.target = None;
    }

    /// Switch mode, committing the gesture of the mode being left.
    /// `pointer` is where the new gesture starts on screen.
    pub fn set_mode(&mut self, mode: ManipulationMode, pointer: Vec2, scene: &mut SceneState) {
        if self.mode == mode {
            return;
        }

        if self.mode != ManipulationMode::None {
            self.commit(scene);
        }

        self.mode = mode;
        self.start = None;
        if mode == ManipulationMode::None {
            return;
        }

        let Some(obj) = self.target.as_deref().and_then(|id| scene.get_object(id)) else {
            tracing::debug!("Mode {:?} set with nothing to manipulate", mode);
            return;
        };
        self.start = Some(GestureStart {
            screen_pos: pointer,
            position: obj.position,
            rotation: obj.rotation,
            scale: obj.scale,
        });
        tracing::debug!("Manipulating {} ({:?})", short_id(&obj.id), mode);
    }

    /// One tick of the active gesture
    pub fn update(
        &mut self,
        frame: &PointerFrame,
        world: &dyn WorldQuery,
        scene: &mut SceneState,
        settings: &ManipulationSettings,
    ) {
        let Some(target) = self.target.clone() else {
            return;
        };

        if frame.is_released() {
            if self.mode != ManipulationMode::None {
                self.set_mode(ManipulationMode::None, Vec2::ZERO, scene);
            }
            return;
        }

        let (Some(start), Some(touch)) = (self.start, frame.primary()) else {
            return;
        };

        let viewport = world.viewport_size();
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let delta = (start.screen_pos - touch.position) / viewport;
        if delta.length() < settings.movement_epsilon {
            return;
        }

        match self.mode {
            ManipulationMode::None => {}
            ManipulationMode::RotateY => {
                let angle = (delta.x * 360.0 / settings.full_swing_y).to_radians();
                scene.apply_rotation(&target, Quat::from_axis_angle(Vec3::Y, angle) * start.rotation);
            }
            ManipulationMode::RotateX => {
                let axis = world.camera_right().normalize_or_zero();
                if axis == Vec3::ZERO {
                    return;
                }
                let angle = (-delta.y * 360.0 / settings.full_swing_x).to_radians();
                scene.apply_rotation(&target, Quat::from_axis_angle(axis, angle) * start.rotation);
            }
            ManipulationMode::Scale => {
                let value = (start.scale.x - (delta.x + delta.y) * settings.scale_sensitivity)
                    .clamp(settings.min_scale, settings.max_scale);
                scene.apply_scale(&target, Vec3::splat(value));
            }
            ManipulationMode::Translate => {
                if let Some(hit) = world.raycast(touch.position, Layer::Environment, scene) {
                    scene.apply_position(&target, hit.point);
                }
            }
        }
    }

    /// Turn the change since the gesture started into one action
    fn commit(&mut self, scene: &mut SceneState) {
        let (Some(target), Some(start)) = (self.target.clone(), self.start.take()) else {
            return;
        };
        let Some(obj) = scene.get_object(&target) else {
            tracing::warn!("Gesture target {} vanished before commit", short_id(&target));
            return;
        };

        let action = match self.mode {
            ManipulationMode::None => None,
            ManipulationMode::RotateY | ManipulationMode::RotateX => (obj.rotation != start.rotation)
                .then(|| Action::rotate(target.clone(), start.rotation, obj.rotation)),
            ManipulationMode::Scale => (obj.scale != start.scale)
                .then(|| Action::scale(target.clone(), start.scale, obj.scale)),
            ManipulationMode::Translate => (obj.position != start.position)
                .then(|| Action::translate(target.clone(), start.position, obj.position)),
        };

        match action {
            Some(action) => {
                action.apply(scene);
            }
            None => tracing::debug!("Gesture on {} left it unchanged", short_id(&target)),
        }
    }
}

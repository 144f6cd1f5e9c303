//! Scene registry
//!
//! Owns every placed object, the active set used for picking and
//! persistence, and the undo history of actions applied to them.

mod display;
mod history;
mod object_ops;
mod persistence;
mod transform_ops;

pub use display::{object_display_name, short_id};
pub use history::UndoStack;
pub use persistence::{euler_degrees_to_quat, quat_to_euler_degrees, RestoreReport};

use std::collections::HashMap;

use glam::{Quat, Vec3};
use shared::{AssetId, ObjectId};

use crate::state::events::{EditorEvent, EventQueue};
use crate::viewport::picking::Aabb;

/// Render layer of a placed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderLayer {
    #[default]
    Item,
    /// The object currently being edited
    Highlighted,
}

/// A live placed instance of a catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub catalog_entry_id: AssetId,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Tombstone flag: disabled objects stay allocated but leave the active set
    pub enabled: bool,
    pub layer: RenderLayer,
    /// Bounding box in object space, from the catalog template
    pub extent: Aabb,
}

impl SceneObject {
    /// Bounding box in world space
    pub fn world_bounds(&self) -> Aabb {
        self.extent
            .transformed(self.position, self.rotation, self.scale)
    }

    /// World-space center of the geometry
    pub fn center(&self) -> Vec3 {
        self.position + self.rotation * (self.extent.center() * self.scale)
    }
}

/// Scene registry with undo history
#[derive(Default)]
pub struct SceneState {
    /// Every allocated object, including tombstones
    pub(crate) objects: HashMap<ObjectId, SceneObject>,
    /// Active set in registration order
    pub(crate) active: Vec<ObjectId>,
    /// Applied actions, most recent last
    pub(crate) history: UndoStack,
    /// Notifications waiting for the session to dispatch them
    pub(crate) events: EventQueue,
    /// Monotonically increasing version counter for change detection
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get an allocated object by ID, enabled or not
    pub fn get_object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Get a mutable allocated object by ID
    pub(crate) fn get_object_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Active objects in registration order
    pub fn active_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.active.iter().filter_map(|id| self.objects.get(id))
    }

    /// IDs of the active set in registration order
    pub fn active_ids(&self) -> &[ObjectId] {
        &self.active
    }

    /// Number of registered objects
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of allocated objects, tombstones included
    pub fn allocated_count(&self) -> usize {
        self.objects.len()
    }

    /// Applied action history
    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Queue a notification for the session
    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    /// Take all queued notifications
    pub(crate) fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_center_follows_scale_and_rotation() {
        let mut scene = SceneState::default();
        let id = scene.instantiate(&fixtures::crate_entry(), Vec3::new(1.0, 0.0, 0.0));
        let obj = scene.get_object(&id).unwrap();
        // Crate template is centered half a unit above its pivot
        assert!((obj.center() - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-5);

        scene.apply_scale(&id, Vec3::splat(2.0));
        scene.apply_rotation(&id, Quat::from_rotation_x(std::f32::consts::PI));
        let obj = scene.get_object(&id).unwrap();
        assert!((obj.center() - Vec3::new(1.0, -1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_active_objects_follow_registration_order() {
        let mut scene = SceneState::default();
        let a = scene.instantiate(&fixtures::crate_entry(), Vec3::ZERO);
        let b = scene.instantiate(&fixtures::lamp_entry(), Vec3::ONE);
        let ids: Vec<&str> = scene.active_objects().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
    }
}

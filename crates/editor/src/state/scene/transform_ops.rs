//! Transform writes
//!
//! Used both by committed actions and by the live, uncommitted updates a
//! gesture makes every tick. None of these touch the history.

use glam::{Quat, Vec3};

use super::SceneState;

impl SceneState {
    /// Set an object's position. Returns false if the object is gone.
    pub fn apply_position(&mut self, id: &str, position: Vec3) -> bool {
        self.write(id, |obj| obj.position = position)
    }

    /// Set an object's orientation
    pub fn apply_rotation(&mut self, id: &str, rotation: Quat) -> bool {
        self.write(id, |obj| obj.rotation = rotation)
    }

    /// Set an object's scale
    pub fn apply_scale(&mut self, id: &str, scale: Vec3) -> bool {
        self.write(id, |obj| obj.scale = scale)
    }

    fn write(&mut self, id: &str, f: impl FnOnce(&mut super::SceneObject)) -> bool {
        match self.get_object_mut(id) {
            Some(obj) => {
                f(obj);
                self.version += 1;
                true
            }
            None => false,
        }
    }
}

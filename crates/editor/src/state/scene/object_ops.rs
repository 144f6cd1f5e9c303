//! Object lifetime and active-set membership

use glam::{Quat, Vec3};
use shared::{CatalogEntry, ObjectId};

use super::{RenderLayer, SceneObject, SceneState};
use crate::viewport::picking::Aabb;

impl SceneState {
    /// Allocate an object at `position` with identity rotation and unit scale,
    /// and add it to the active set.
    pub fn instantiate(&mut self, entry: &CatalogEntry, position: Vec3) -> ObjectId {
        self.instantiate_with_transform(entry, position, Quat::IDENTITY, Vec3::ONE)
    }

    /// Allocate and register an object with a full transform
    pub fn instantiate_with_transform(
        &mut self,
        entry: &CatalogEntry,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> ObjectId {
        let id = uuid::Uuid::new_v4().to_string();
        let template = entry.template.clone().unwrap_or_default();

        self.objects.insert(
            id.clone(),
            SceneObject {
                id: id.clone(),
                catalog_entry_id: entry.id.clone(),
                position,
                rotation,
                scale,
                enabled: true,
                layer: RenderLayer::Item,
                extent: Aabb::from_center_size(
                    Vec3::from(template.center()),
                    Vec3::from(template.bounds_size),
                ),
            },
        );
        self.register(&id);

        tracing::debug!("Instantiated {} as {}", entry.id, super::short_id(&id));
        id
    }

    /// Remove an object from the active set and free it.
    /// Returns the object if it existed.
    pub fn destroy(&mut self, id: &str) -> Option<SceneObject> {
        self.unregister(id);
        let removed = self.objects.remove(id);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Add an allocated object to the active set. Idempotent.
    /// Returns false if the object is not allocated.
    pub fn register(&mut self, id: &str) -> bool {
        if !self.objects.contains_key(id) {
            return false;
        }
        if !self.is_registered(id) {
            self.active.push(id.to_string());
            self.version += 1;
        }
        true
    }

    /// Remove an object from the active set. Idempotent.
    pub fn unregister(&mut self, id: &str) {
        if let Some(pos) = self.active.iter().position(|a| a == id) {
            self.active.remove(pos);
            self.version += 1;
        }
    }

    /// Check active-set membership
    pub fn is_registered(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    /// Check whether the object is still allocated
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Set the tombstone flag
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.get_object_mut(id) {
            Some(obj) => {
                obj.enabled = enabled;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Move an object between the normal and highlighted layers
    pub fn set_layer(&mut self, id: &str, layer: RenderLayer) -> bool {
        match self.get_object_mut(id) {
            Some(obj) => {
                obj.layer = layer;
                true
            }
            None => false,
        }
    }

    /// Destroy every object, tombstones included. History is left untouched.
    pub fn remove_all(&mut self) {
        self.objects.clear();
        self.active.clear();
        self.version += 1;
    }
}

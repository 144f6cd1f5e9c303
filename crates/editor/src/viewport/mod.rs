//! Cameras and layer-filtered raycasts against the scene.
//!
//! Rendering lives elsewhere; this module only answers "what is under this
//! screen point" for the selection and manipulation machines.

pub mod camera;
pub mod picking;

use glam::{Vec2, Vec3};
use shared::ObjectId;

use crate::state::scene::SceneState;
use picking::{pick_nearest, ray_horizontal_plane, Ray};

pub use camera::{ArcBallCamera, NavigationGesture, TopDownCamera};

/// Raycast filter. Items and the environment never answer the same query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Placed objects, highlighted or not
    Item,
    /// Ground geometry used for placement and translation
    Environment,
}

/// Result of a layer-filtered raycast
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    pub distance: f32,
    /// Set for item-layer hits
    pub object: Option<ObjectId>,
}

/// A camera that can turn screen pixels into world rays
pub trait ViewCamera {
    /// Viewport size in pixels
    fn viewport_size(&self) -> Vec2;
    /// Camera right axis in world space
    fn right_vector(&self) -> Vec3;
    /// World ray through a screen position (pixels, origin top-left)
    fn screen_ray(&self, screen_pos: Vec2) -> Ray;
}

/// What the selection and manipulation machines need from the world
pub trait WorldQuery {
    fn viewport_size(&self) -> Vec2;
    fn camera_right(&self) -> Vec3;
    fn raycast(&self, screen_pos: Vec2, layer: Layer, scene: &SceneState) -> Option<RaycastHit>;
}

/// Ground plane forming the environment layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub ground_height: f32,
    /// Half size of the square ground, centered on the origin. `None` is unbounded.
    pub half_extent: Option<f32>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            half_extent: Some(50.0),
        }
    }
}

impl Environment {
    fn hit(&self, ray: &Ray) -> Option<RaycastHit> {
        let distance = ray_horizontal_plane(ray, self.ground_height)?;
        let point = ray.at(distance);

        if let Some(half) = self.half_extent {
            if point.x.abs() > half || point.z.abs() > half {
                return None;
            }
        }

        Some(RaycastHit {
            point,
            distance,
            object: None,
        })
    }
}

/// Camera plus environment: the concrete world the editor raycasts into
#[derive(Debug, Clone)]
pub struct Viewport<C> {
    pub camera: C,
    pub environment: Environment,
}

impl<C: ViewCamera> Viewport<C> {
    pub fn new(camera: C, environment: Environment) -> Self {
        Self {
            camera,
            environment,
        }
    }
}

impl<C: ViewCamera> WorldQuery for Viewport<C> {
    fn viewport_size(&self) -> Vec2 {
        self.camera.viewport_size()
    }

    fn camera_right(&self) -> Vec3 {
        self.camera.right_vector()
    }

    fn raycast(&self, screen_pos: Vec2, layer: Layer, scene: &SceneState) -> Option<RaycastHit> {
        let ray = self.camera.screen_ray(screen_pos);

        match layer {
            Layer::Environment => self.environment.hit(&ray),
            Layer::Item => {
                let candidates = scene
                    .active_objects()
                    .map(|obj| (&obj.id, obj.world_bounds()));
                pick_nearest(&ray, candidates).map(|(id, distance)| RaycastHit {
                    point: ray.at(distance),
                    distance,
                    object: Some(id.clone()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn top_down() -> Viewport<TopDownCamera> {
        Viewport::new(
            TopDownCamera::new(Vec2::new(1000.0, 1000.0), 10.0),
            Environment::default(),
        )
    }

    #[test]
    fn test_environment_hit_on_ground() {
        let view = top_down();
        let scene = SceneState::default();
        let screen = view.camera.world_to_screen(Vec3::new(4.0, 0.0, 2.0));
        let hit = view.raycast(screen, Layer::Environment, &scene).unwrap();
        assert!((hit.point - Vec3::new(4.0, 0.0, 2.0)).length() < 1e-4);
        assert!(hit.object.is_none());
    }

    #[test]
    fn test_environment_bounds() {
        let mut view = top_down();
        view.environment.half_extent = Some(5.0);
        let scene = SceneState::default();
        let outside = view.camera.world_to_screen(Vec3::new(20.0, 0.0, 0.0));
        assert!(view.raycast(outside, Layer::Environment, &scene).is_none());
    }

    #[test]
    fn test_item_layer_ignores_ground_and_finds_object() {
        let view = top_down();
        let mut scene = SceneState::default();
        let id = scene.instantiate(&fixtures::crate_entry(), Vec3::new(2.0, 0.0, 2.0));

        let over = view.camera.world_to_screen(Vec3::new(2.0, 0.0, 2.0));
        let hit = view.raycast(over, Layer::Item, &scene).unwrap();
        assert_eq!(hit.object.as_deref(), Some(id.as_str()));

        let empty = view.camera.world_to_screen(Vec3::new(-8.0, 0.0, -8.0));
        assert!(view.raycast(empty, Layer::Item, &scene).is_none());
    }

    #[test]
    fn test_item_layer_skips_tombstones() {
        let view = top_down();
        let mut scene = SceneState::default();
        let id = scene.instantiate(&fixtures::crate_entry(), Vec3::ZERO);
        scene.set_enabled(&id, false);
        scene.unregister(&id);

        let over = view.camera.world_to_screen(Vec3::ZERO);
        assert!(view.raycast(over, Layer::Item, &scene).is_none());
    }
}

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;
use super::ViewCamera;
use crate::state::settings::NavigationSettings;

const MAX_DISTANCE: f32 = 100.0;

/// A recognized two-finger gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationGesture {
    /// Signed twist between two frames, degrees
    Rotate(f32),
    /// Signed change of finger spread; positive moves closer
    Pinch(f32),
    /// Drag on the ground: x along camera right, y along camera forward
    Pan(Vec2),
}

/// Arc-ball camera for the perspective viewport
#[derive(Clone, Debug)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Viewport size in pixels, origin at the top-left corner
    pub viewport: Vec2,
}

impl ArcBallCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 12.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            viewport,
        }
    }

    /// Orbit around the target's vertical axis
    pub fn rotate(&mut self, degrees: f32) {
        self.yaw += degrees.to_radians();
    }

    /// Dolly toward (positive) or away from the target
    pub fn zoom(&mut self, amount: f32, min_distance: f32) {
        self.distance = (self.distance - amount).max(min_distance).min(MAX_DISTANCE);
    }

    /// Slide the target over the ground, relative to the camera heading
    pub fn pan(&mut self, right: f32, forward: f32) {
        let heading = self.target - self.eye_position();
        let forward_dir = Vec3::new(heading.x, 0.0, heading.z).normalize_or_zero();
        self.target += self.right_vector() * right + forward_dir * forward;
    }

    /// Apply a navigation gesture. Fingers drag the world, so the camera
    /// moves against them.
    pub fn navigate(&mut self, gesture: NavigationGesture, settings: &NavigationSettings) {
        match gesture {
            NavigationGesture::Rotate(angle) => self.rotate(-angle * settings.rotate_speed),
            NavigationGesture::Pinch(spread) => {
                self.zoom(spread * settings.zoom_speed, settings.min_distance)
            }
            NavigationGesture::Pan(dir) => {
                let step = -dir * settings.pan_speed;
                self.pan(step.x, step.y);
            }
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = self.viewport.x / self.viewport.y.max(1.0);
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a 3D point to screen pixels
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let p = self.view_projection() * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let center = self.viewport * 0.5;
        Some(Vec2::new(
            center.x + ndc.x * self.viewport.x * 0.5,
            center.y - ndc.y * self.viewport.y * 0.5,
        ))
    }
}

impl ViewCamera for ArcBallCamera {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn screen_ray(&self, screen_pos: Vec2) -> Ray {
        let center = self.viewport * 0.5;

        // Screen → NDC
        let ndc_x = (screen_pos.x - center.x) / (self.viewport.x * 0.5);
        let ndc_y = -(screen_pos.y - center.y) / (self.viewport.y * 0.5);

        let vp_inv = self.view_projection().inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray::new(self.eye_position(), far - near)
    }
}

/// Orthographic camera looking straight down -Y.
///
/// Screen x maps to world +X and screen y (downwards) maps to world +Z.
#[derive(Clone, Debug)]
pub struct TopDownCamera {
    /// World point under the viewport center
    pub center: Vec3,
    /// Pixels per world unit
    pub zoom: f32,
    /// Height the rays start from
    pub height: f32,
    pub viewport: Vec2,
}

impl TopDownCamera {
    pub fn new(viewport: Vec2, zoom: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            zoom,
            height: 100.0,
            viewport,
        }
    }

    /// Screen position directly above a world point
    pub fn world_to_screen(&self, point: Vec3) -> Vec2 {
        self.viewport * 0.5 + Vec2::new(point.x - self.center.x, point.z - self.center.z) * self.zoom
    }
}

impl ViewCamera for TopDownCamera {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn right_vector(&self) -> Vec3 {
        Vec3::X
    }

    fn screen_ray(&self, screen_pos: Vec2) -> Ray {
        let offset = (screen_pos - self.viewport * 0.5) / self.zoom;
        let origin = Vec3::new(
            self.center.x + offset.x,
            self.height,
            self.center.z + offset.y,
        );
        Ray::new(origin, Vec3::NEG_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = ArcBallCamera::new(Vec2::new(800.0, 600.0));
        let ray = cam.screen_ray(Vec2::new(400.0, 300.0));
        let to_target = (cam.target - cam.eye_position()).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn test_project_inverts_screen_ray() {
        let cam = ArcBallCamera::new(Vec2::new(1024.0, 768.0));
        let screen = Vec2::new(300.0, 500.0);
        let ray = cam.screen_ray(screen);
        let point = ray.at(5.0);
        let back = cam.project(point).unwrap();
        assert!((back - screen).length() < 0.5);
    }

    #[test]
    fn test_right_vector_is_horizontal() {
        let cam = ArcBallCamera::new(Vec2::new(800.0, 600.0));
        let right = cam.right_vector();
        assert!(right.y.abs() < 1e-5);
        assert!((right.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_orbits_at_fixed_distance() {
        let mut cam = ArcBallCamera::new(Vec2::new(800.0, 600.0));
        let before = cam.eye_position();
        cam.navigate(NavigationGesture::Rotate(-900.0), &NavigationSettings::default());

        let after = cam.eye_position();
        assert!((cam.yaw - (0.6 + 90.0_f32.to_radians())).abs() < 1e-5);
        assert!((after.y - before.y).abs() < 1e-4);
        assert!(((after - cam.target).length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn test_pinch_stops_at_min_distance() {
        let settings = NavigationSettings::default();
        let mut cam = ArcBallCamera::new(Vec2::new(800.0, 600.0));

        cam.navigate(NavigationGesture::Pinch(2.0), &settings);
        assert!((cam.distance - 9.0).abs() < 1e-5);

        cam.navigate(NavigationGesture::Pinch(50.0), &settings);
        assert_eq!(cam.distance, settings.min_distance);

        cam.navigate(NavigationGesture::Pinch(-4.0), &settings);
        assert!((cam.distance - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_pan_moves_target_over_ground() {
        let mut cam = ArcBallCamera::new(Vec2::new(800.0, 600.0));
        cam.yaw = 0.0;
        // Eye sits on +Z looking toward -Z; right is +X
        cam.navigate(
            NavigationGesture::Pan(Vec2::new(1.0, 2.0)),
            &NavigationSettings::default(),
        );
        assert!((cam.target - Vec3::new(-1.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_top_down_round_trip() {
        let cam = TopDownCamera::new(Vec2::new(1000.0, 1000.0), 10.0);
        let world = Vec3::new(3.0, 0.0, -5.0);
        let screen = cam.world_to_screen(world);
        assert_eq!(screen, Vec2::new(530.0, 450.0));

        let ray = cam.screen_ray(screen);
        assert_eq!(ray.direction, Vec3::NEG_Y);
        assert!((ray.origin.x - 3.0).abs() < 1e-5);
        assert!((ray.origin.z + 5.0).abs() < 1e-5);
    }
}

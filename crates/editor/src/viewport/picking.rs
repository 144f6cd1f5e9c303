use glam::{Quat, Vec3};

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box from a center point and full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// World-space box enclosing this local box after scale, rotation and translation.
    pub fn transformed(&self, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = position + rotation * (corner * scale);
            min = min.min(world);
            max = max.max(world);
        }

        Self { min, max }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest candidate whose AABB is intersected by the ray.
/// Ties keep the earliest candidate.
pub fn pick_nearest<'a, K>(
    ray: &Ray,
    candidates: impl IntoIterator<Item = (&'a K, Aabb)>,
) -> Option<(&'a K, f32)>
where
    K: ?Sized + 'a,
{
    let mut best: Option<(&'a K, f32)> = None;

    for (key, aabb) in candidates {
        if let Some(dist) = ray_aabb(ray, &aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((key, dist));
            }
        }
    }

    best
}

/// Intersect a ray with the horizontal plane `y = height`.
/// Returns the distance along the ray, or None if parallel or behind.
pub fn ray_horizontal_plane(ray: &Ray, height: f32) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    if ray.direction.y.abs() < EPSILON {
        return None;
    }

    let t = (height - ray.origin.y) / ray.direction.y;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_size(center, Vec3::ONE)
    }

    #[test]
    fn test_ray_hits_box_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let dist = ray_aabb(&ray, &unit_box_at(Vec3::ZERO)).unwrap();
        assert!((dist - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_box_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_aabb(&ray, &unit_box_at(Vec3::ZERO)).is_none());
    }

    #[test]
    fn test_ray_from_inside_box() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let dist = ray_aabb(&ray, &unit_box_at(Vec3::ZERO)).unwrap();
        assert!((dist - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_nearest_prefers_closer() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let low = "low".to_string();
        let high = "high".to_string();
        let candidates = vec![
            (&low, unit_box_at(Vec3::new(0.0, 0.0, 0.0))),
            (&high, unit_box_at(Vec3::new(0.0, 3.0, 0.0))),
        ];
        let (hit, dist) = pick_nearest(&ray, candidates).unwrap();
        assert_eq!(hit, "high");
        assert!((dist - 6.5).abs() < 1e-5);
    }

    #[test]
    fn test_transformed_box_scales_and_rotates() {
        let local = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rotated = local.transformed(
            Vec3::new(5.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::splat(2.0),
        );
        // Long side now runs along Z, doubled
        assert!((rotated.size().z - 4.0).abs() < 1e-4);
        assert!((rotated.size().x - 2.0).abs() < 1e-4);
        assert!((rotated.center() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(1.0, 5.0, 1.0), Vec3::new(0.0, -1.0, 0.0));
        let t = ray_horizontal_plane(&ray, 0.0).unwrap();
        assert!((ray.at(t) - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-5);

        let flat = Ray::new(Vec3::ONE, Vec3::X);
        assert!(ray_horizontal_plane(&flat, 0.0).is_none());

        let away = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(ray_horizontal_plane(&away, 0.0).is_none());
    }
}

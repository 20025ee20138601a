//! Screen-to-world targeting.
//!
//! A 2D screen position becomes a world ray through the camera, and the
//! ray is handed to a spatial query. Targeting owns only the policy around
//! that query: the hard range cutoff and the category filter. Which hit
//! wins along the ray is the query's business (nearest first).

pub mod tap;

pub use tap::TapClassifier;

use glam::{Vec2, Vec3};

use crate::config::ConfigError;

/// Identity of a selectable world object. Objects are owned by the scene;
/// the core only ever holds their id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

/// 32-bit category mask, one bit per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// Structural geometry (floors, ceilings) that blocks nothing but is never painted.
    pub const STRUCTURE: Self = Self(1 << 0);
    pub const PAINTABLE: Self = Self(1 << 1);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Returns `None` for a zero or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        if !origin.is_finite() {
            return None;
        }
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
    pub category: CategoryMask,
}

/// Turns a screen position into a world-space ray.
pub trait CameraProjection {
    fn screen_to_ray(&self, screen_pos: Vec2) -> Option<Ray>;
}

/// Ray-vs-geometry intersection. Implementations return the nearest hit
/// within `max_distance` whose category intersects `filter`.
pub trait SpatialQuery {
    fn raycast(&self, ray: &Ray, max_distance: f32, filter: CategoryMask) -> Option<RayHit>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targeting {
    max_range: f32,
    filter: CategoryMask,
}

impl Targeting {
    pub fn new(max_range: f32, filter: CategoryMask) -> Result<Self, ConfigError> {
        if !(max_range.is_finite() && max_range > 0.0) {
            return Err(ConfigError::InvalidRange(max_range));
        }
        Ok(Self { max_range, filter })
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn filter(&self) -> CategoryMask {
        self.filter
    }

    /// Resolve a screen position to at most one object.
    ///
    /// A missing camera, a miss, a hit past `max_range` and a hit outside
    /// the category filter all yield `None`.
    pub fn pick_object(
        &self,
        screen_pos: Vec2,
        camera: Option<&dyn CameraProjection>,
        query: &dyn SpatialQuery,
    ) -> Option<ObjectId> {
        let Some(camera) = camera else {
            log::debug!("pick at {:?} skipped: no camera", screen_pos);
            return None;
        };
        let ray = camera.screen_to_ray(screen_pos)?;
        let hit = query.raycast(&ray, self.max_range, self.filter)?;

        if !(hit.distance >= 0.0 && hit.distance <= self.max_range) {
            log::debug!(
                "pick at {:?} rejected: hit at {:.2} beyond range {:.2}",
                screen_pos,
                hit.distance,
                self.max_range
            );
            return None;
        }
        if !hit.category.intersects(self.filter) {
            log::debug!("pick at {:?} rejected: category {:?}", screen_pos, hit.category);
            return None;
        }
        Some(hit.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedCamera;

    impl CameraProjection for FixedCamera {
        fn screen_to_ray(&self, _screen_pos: Vec2) -> Option<Ray> {
            Ray::new(Vec3::ZERO, Vec3::X)
        }
    }

    /// Reports whatever hits it was built with, ignoring the requested range,
    /// so the cutoff in `Targeting` itself is exercised.
    struct SloppyQuery {
        hits: Vec<RayHit>,
        calls: Cell<u32>,
    }

    impl SpatialQuery for SloppyQuery {
        fn raycast(&self, _ray: &Ray, _max: f32, filter: CategoryMask) -> Option<RayHit> {
            self.calls.set(self.calls.get() + 1);
            self.hits
                .iter()
                .filter(|hit| hit.category.intersects(filter))
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
                .copied()
        }
    }

    fn hit(id: u64, distance: f32, category: CategoryMask) -> RayHit {
        RayHit {
            object: ObjectId(id),
            distance,
            point: Vec3::X * distance,
            category,
        }
    }

    fn targeting() -> Targeting {
        Targeting::new(20.0, CategoryMask::PAINTABLE).unwrap()
    }

    #[test]
    fn returns_nearest_hit_in_range() {
        let query = SloppyQuery {
            hits: vec![
                hit(1, 12.0, CategoryMask::PAINTABLE),
                hit(2, 5.0, CategoryMask::PAINTABLE),
            ],
            calls: Cell::new(0),
        };
        let picked = targeting().pick_object(Vec2::ZERO, Some(&FixedCamera), &query);
        assert_eq!(picked, Some(ObjectId(2)));
    }

    #[test]
    fn hit_beyond_range_is_invisible() {
        let query = SloppyQuery {
            hits: vec![hit(1, 25.0, CategoryMask::PAINTABLE)],
            calls: Cell::new(0),
        };
        assert_eq!(
            targeting().pick_object(Vec2::ZERO, Some(&FixedCamera), &query),
            None
        );
        assert_eq!(query.calls.get(), 1);
    }

    #[test]
    fn filtered_category_is_ignored() {
        let query = SloppyQuery {
            hits: vec![hit(1, 3.0, CategoryMask::STRUCTURE)],
            calls: Cell::new(0),
        };
        assert_eq!(
            targeting().pick_object(Vec2::ZERO, Some(&FixedCamera), &query),
            None
        );
    }

    #[test]
    fn no_camera_means_no_pick() {
        let query = SloppyQuery {
            hits: vec![hit(1, 3.0, CategoryMask::PAINTABLE)],
            calls: Cell::new(0),
        };
        assert_eq!(targeting().pick_object(Vec2::ZERO, None, &query), None);
        assert_eq!(query.calls.get(), 0);
    }

    #[test]
    fn invalid_range_fails_fast() {
        assert!(Targeting::new(0.0, CategoryMask::ALL).is_err());
        assert!(Targeting::new(-1.0, CategoryMask::ALL).is_err());
        assert!(Targeting::new(f32::INFINITY, CategoryMask::ALL).is_err());
    }

    #[test]
    fn category_mask_ops() {
        let both = CategoryMask::STRUCTURE | CategoryMask::PAINTABLE;
        assert!(both.contains(CategoryMask::PAINTABLE));
        assert!(!CategoryMask::PAINTABLE.contains(both));
        assert!(both.intersects(CategoryMask::STRUCTURE));
        assert!(!CategoryMask::NONE.intersects(CategoryMask::ALL));
    }

    #[test]
    fn ray_rejects_degenerate_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, 3.0));
    }
}

pub mod camera;
pub mod serialization;

use glam::Vec3;

use crate::color::Rgb;
use crate::session::MaterialSink;
use crate::targeting::{CategoryMask, ObjectId, Ray, RayHit, SpatialQuery};

/// Axis-aligned box in the scene - walls, floors, furniture.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub category: CategoryMask,
    pub center: [f32; 3],
    /// Half size along each axis.
    pub extent: [f32; 3],
    pub base_color: Rgb,
}

impl SceneObject {
    fn bounds(&self) -> (Vec3, Vec3) {
        let center = Vec3::from_array(self.center);
        let extent = Vec3::from_array(self.extent).abs();
        (center - extent, center + extent)
    }
}

#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct SceneState {
    objects: Vec<SceneObject>,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn object_names(&self) -> Vec<&str> {
        self.objects
            .iter()
            .map(|object| object.name.as_str())
            .collect()
    }

    pub fn add_box(
        &mut self,
        name: &str,
        category: CategoryMask,
        center: [f32; 3],
        extent: [f32; 3],
        base_color: Rgb,
    ) -> ObjectId {
        let id = ObjectId(
            self.objects
                .iter()
                .map(|object| object.id.0 + 1)
                .max()
                .unwrap_or(1),
        );
        self.objects.push(SceneObject {
            id,
            name: name.to_string(),
            category,
            center,
            extent,
            base_color,
        });
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Center and half extent of everything in the scene.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.objects.iter().map(SceneObject::bounds);
        let (mut min, mut max) = iter.next()?;
        for (lo, hi) in iter {
            min = min.min(lo);
            max = max.max(hi);
        }
        Some((((min + max) * 0.5).to_array(), ((max - min) * 0.5).to_array()))
    }

    /// An 8×3×8 room: four paintable walls around a structural floor.
    pub fn demo_room() -> Self {
        let mut scene = Self::new();
        let wall = CategoryMask::PAINTABLE;
        scene.add_box(
            "North wall",
            wall,
            [0.0, 1.5, 4.0],
            [4.0, 1.5, 0.05],
            hex("D9D4C7"),
        );
        scene.add_box(
            "South wall",
            wall,
            [0.0, 1.5, -4.0],
            [4.0, 1.5, 0.05],
            hex("33CC33"),
        );
        scene.add_box(
            "East wall",
            wall,
            [4.0, 1.5, 0.0],
            [0.05, 1.5, 4.0],
            hex("8FA8C8"),
        );
        scene.add_box(
            "West wall",
            wall,
            [-4.0, 1.5, 0.0],
            [0.05, 1.5, 4.0],
            hex("C87F5A"),
        );
        scene.add_box(
            "Floor",
            CategoryMask::STRUCTURE,
            [0.0, -0.05, 0.0],
            [4.0, 0.05, 4.0],
            hex("6B5B4B"),
        );
        scene
    }
}

fn hex(value: &str) -> Rgb {
    Rgb::from_hex(value).unwrap_or(Rgb::WHITE)
}

/// Slab test. Returns the entry distance, or the exit distance when the
/// origin is inside the box.
fn ray_box_distance(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();
    let (min, max) = (min.to_array(), max.to_array());

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        if direction[axis].abs() < 1e-8 {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction[axis];
        let t1 = (min[axis] - origin[axis]) * inv;
        let t2 = (max[axis] - origin[axis]) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

impl SpatialQuery for SceneState {
    fn raycast(&self, ray: &Ray, max_distance: f32, filter: CategoryMask) -> Option<RayHit> {
        self.objects
            .iter()
            .filter(|object| object.category.intersects(filter))
            .filter_map(|object| {
                let (min, max) = object.bounds();
                let distance = ray_box_distance(ray, min, max)?;
                (distance <= max_distance).then_some((object, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(object, distance)| RayHit {
                object: object.id,
                distance,
                point: ray.at(distance),
                category: object.category,
            })
    }
}

impl MaterialSink for SceneState {
    fn base_color(&self, object: ObjectId) -> Option<Rgb> {
        self.object(object).map(|object| object.base_color)
    }

    fn set_base_color(&mut self, object: ObjectId, rgb: Rgb) -> bool {
        match self.object_mut(object) {
            Some(object) => {
                object.base_color = rgb;
                true
            }
            None => false,
        }
    }
}

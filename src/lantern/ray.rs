use nalgebra::{Point3, Vector3};

/// 방향은 정규화되어 있지 않을 수 있음
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

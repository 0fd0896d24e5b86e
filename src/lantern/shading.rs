use nalgebra::Vector3;

use crate::lantern::scene::Material;

/// 아무것도 맞지 않았을 때 쓰는 하늘색
pub const SKY_COLOR: [f32; 3] = [0.6, 0.7, 0.9];

pub fn sky_color() -> Vector3<f32> {
    Vector3::from(SKY_COLOR)
}

/// 빛의 세기. 법선과 빛을 향하는 방향이 둘 다 단위 벡터라면 cos(사이각)과 같음.
/// 주변광도, 거리에 따른 감쇠도 없음.
pub fn light_intensity(normal: &Vector3<f32>, light_direction: &Vector3<f32>) -> f32 {
    normal.dot(&-light_direction).max(0.0)
}

pub fn shade(material: &Material, normal: &Vector3<f32>, light_direction: &Vector3<f32>) -> Vector3<f32> {
    material.albedo * light_intensity(normal, light_direction)
}

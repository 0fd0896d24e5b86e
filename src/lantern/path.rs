use nalgebra::{Vector3, Vector4};
use rand::Rng;

use crate::lantern::hit::{reflect, trace_ray, HitPayload};
use crate::lantern::ray::Ray;
use crate::lantern::scene::Scene;
use crate::lantern::shading::{shade, sky_color};
use crate::util::random_vec;

/// 튕긴 빔의 시작점을 법선 방향으로 밀어내는 거리
pub const RAY_BIAS: f32 = 0.0001;

/// 한 번 튕길 때마다 기여도에 곱해지는 값
pub const BOUNCE_FALLOFF: f32 = 0.5;

/// 빔 하나를 최대 `bounces`번 튕기며 색을 모음. 알파는 언제나 1.
///
/// 기여도가 아무리 작아져도 중간에 멈추지 않고, 하늘에 닿았을 때만 일찍 끝남.
/// `rng`는 거칠기(roughness)에 따른 반사 방향 흔들기에만 쓰임.
pub fn trace_path<R: Rng + ?Sized>(scene: &Scene, mut ray: Ray, bounces: u32, rng: &mut R) -> Vector4<f32> {
    let mut color = Vector3::zeros();
    let mut multiplier = 1.0;

    for _ in 0..bounces {
        let Some(HitPayload { position, normal, object_index, .. }) = trace_ray(&ray, scene) else {
            color += sky_color() * multiplier;
            break;
        };

        let material = scene.material_of(&scene.spheres[object_index]);
        let sphere_color = shade(material, &normal, &scene.light_direction);

        color += sphere_color * multiplier;
        multiplier *= BOUNCE_FALLOFF;

        // 교점에서 바로 출발하면 방금 맞은 구에 또 맞을 수 있어서 법선 쪽으로 살짝 띄움
        ray.origin = position + normal.as_ref() * RAY_BIAS;
        let reflection_axis = normal.as_ref() + material.roughness * random_vec(rng, -0.5..=0.5);
        ray.direction = reflect(&ray.direction, &reflection_axis);
    }

    Vector4::new(color.x, color.y, color.z, 1.0)
}

use nalgebra::{Point3, Unit, Vector3};

use crate::lantern::ray::Ray;
use crate::lantern::scene::{Scene, Sphere};

// 교점 정보만 담아 두고 색은 호출하는 쪽(path)에서 계산함
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    pub distance: f32,
    pub position: Point3<f32>,
    pub normal: Unit<Vector3<f32>>,
    /// `Scene::spheres`의 인덱스
    pub object_index: usize,
}

impl HitPayload {
    /// 아무것도 맞추지 못했을 때의 거리. `trace_ray`는 대신 `None`을 돌려줌.
    pub const MISS_DISTANCE: f32 = -1.0;
}

impl Sphere {
    /// 빔이 구와 처음 만나는 거리. 빔 시작점 뒤(0 이하)는 무시함.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        // 구 중심을 원점으로 옮긴 좌표에서 |o + t * d|^2 = r^2 을 t에 대해 풂.
        // (d·d) t^2 + 2 (o·d) t + (o·o - r^2) = 0, 아래 first/second/third가 각 계수
        let origin = ray.origin - self.position;

        let first = ray.direction.magnitude_squared();
        // 방향이 0벡터면 아래에서 0으로 나누게 됨
        if first == 0.0 {
            return None;
        }
        let second = 2.0 * origin.dot(&ray.direction);
        let third = origin.magnitude_squared() - self.radius.powi(2);

        // 판별식
        let discriminant = second.powi(2) - 4.0 * first * third;
        if discriminant < 0.0 {
            return None;
        }

        // 더 먼 근은 쓸 일이 없음
        let distance = (-second - discriminant.sqrt()) / (2.0 * first);
        (distance > 0.0).then_some(distance)
    }
}

/// 씬의 모든 구를 순서대로 검사해서 가장 가까운 교점을 찾음. 거리가 같으면 먼저 나온 구가 이김.
pub fn trace_ray(ray: &Ray, scene: &Scene) -> Option<HitPayload> {
    let mut closest: Option<(usize, f32)> = None;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        let Some(distance) = sphere.intersect(ray) else {
            continue;
        };

        match closest {
            Some((_, previous_distance)) if previous_distance <= distance => {}
            _ => closest = Some((index, distance)),
        }
    }

    closest.map(|(index, distance)| closest_hit(ray, distance, index, &scene.spheres[index]))
}

pub fn closest_hit(ray: &Ray, distance: f32, object_index: usize, sphere: &Sphere) -> HitPayload {
    // 구 중심 기준 좌표에서 교점을 구하고, 법선을 구한 뒤에 월드 좌표로 옮김
    let fake_origin = ray.origin - sphere.position;
    let fake_position = fake_origin + ray.direction * distance;

    let normal = Unit::new_normalize(fake_position);
    let position = sphere.position + fake_position;

    HitPayload {
        distance,
        position,
        normal,
        object_index,
    }
}

/// `incident - 2 * dot(incident, normal) * normal`. `normal`은 단위 벡터가 아니어도 됨.
pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * incident.dot(normal))
}

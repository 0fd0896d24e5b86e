use log::debug;
use nalgebra::{Isometry3, Perspective3, Point3, Unit, UnitQuaternion, Vector2, Vector3};
use rayon::prelude::*;

/// 렌더러가 읽기만 하는 카메라. 방향은 `x + y * width` 순서로 미리 계산되어 있어야 함.
pub trait Camera {
    fn position(&self) -> Point3<f32>;
    fn ray_directions(&self) -> &[Vector3<f32>];
}

pub struct PerspectiveCamera {
    projection: Option<Perspective3<f32>>,
    view: Isometry3<f32>,

    vertical_fov: f32,
    near: f32,
    far: f32,

    position: Point3<f32>,
    forward: Unit<Vector3<f32>>,

    rays: Vec<Vector3<f32>>,
    viewport_size: (u32, u32),
}

impl PerspectiveCamera {
    /// `vertical_fov`는 라디안
    pub fn new(vertical_fov: f32, near: f32, far: f32, width: u32, height: u32) -> Self {
        let position = Point3::new(0.0, 0.0, 6.0);
        let forward = -Vector3::z_axis();

        let mut to_return = Self {
            projection: None,
            view: Isometry3::identity(),
            vertical_fov,
            near,
            far,
            position,
            forward,
            rays: vec![],
            viewport_size: (width, height),
        };

        to_return.reevaluate_projection();
        to_return.reevaluate_view();
        to_return.reevaluate_rays();

        to_return
    }

    pub fn forward(&self) -> &Unit<Vector3<f32>> {
        &self.forward
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.viewport_size == (width, height) {
            return;
        }
        self.viewport_size = (width, height);

        self.reevaluate_projection();
        self.reevaluate_rays();
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;

        self.reevaluate_view();
        self.reevaluate_rays();
    }

    /// `forward`가 0벡터면 무시함
    pub fn look_to(&mut self, forward: Vector3<f32>) {
        let Some(forward) = Unit::try_new(forward, f32::EPSILON) else {
            return;
        };
        self.forward = forward;

        self.reevaluate_view();
        self.reevaluate_rays();
    }

    /// 마우스로 돌리던 것과 같음. 음수 pitch는 위, 양수 yaw는 오른쪽.
    pub fn rotate(&mut self, pitch_delta: f32, yaw_delta: f32) {
        let up: Unit<Vector3<f32>> = Vector3::y_axis();
        let Some(right) = Unit::try_new(self.forward.cross(up.as_ref()), f32::EPSILON) else {
            return;
        };

        let q = UnitQuaternion::from_axis_angle(&right, -pitch_delta)
            * UnitQuaternion::from_axis_angle(&up, -yaw_delta);

        self.forward = q * self.forward;
        self.forward.renormalize_fast();

        self.reevaluate_view();
        self.reevaluate_rays();
    }

    fn reevaluate_projection(&mut self) {
        let (width, height) = self.viewport_size;
        // 크기가 0이면 종횡비를 구할 수 없음
        self.projection = (width > 0 && height > 0).then(|| {
            let aspect = width as f32 / height as f32;
            Perspective3::new(aspect, self.vertical_fov, self.near, self.far)
        });
    }

    fn reevaluate_view(&mut self) {
        let target = self.position + self.forward.into_inner();
        // 바로 위나 아래를 보면 up 벡터를 바꿔야 함
        let up = if self.forward.cross(&Vector3::y()).magnitude_squared() < f32::EPSILON {
            Vector3::z()
        } else {
            Vector3::y()
        };
        self.view = Isometry3::look_at_rh(&self.position, &target, &up);
    }

    fn reevaluate_rays(&mut self) {
        let (width, height) = self.viewport_size;
        let Some(projection) = self.projection else {
            self.rays = vec![];
            return;
        };
        let view = self.view;

        self.rays = (0..width as usize * height as usize)
            .into_par_iter()
            .map(|index| {
                let y = index / width as usize;
                let x = index % width as usize;

                // 픽셀 중심을 [-1, 1]로. 0번째 행이 위쪽이니 y는 뒤집음
                let mut coord = Vector2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                coord *= 2.0;
                coord -= Vector2::new(1.0, 1.0);
                coord.y = -coord.y;

                let target = projection.unproject_point(&Point3::new(coord.x, coord.y, 1.0));
                let normalized = target.coords.normalize();

                view.inverse_transform_vector(&normalized)
            })
            .collect();

        debug!("camera rays reevaluated for {}x{}", width, height);
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn ray_directions(&self) -> &[Vector3<f32>] {
        &self.rays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera(width: u32, height: u32) -> PerspectiveCamera {
        PerspectiveCamera::new(45f32.to_radians(), 0.1, 100.0, width, height)
    }

    #[test]
    fn one_unit_ray_per_pixel() {
        let camera = camera(16, 9);
        assert_eq!(camera.ray_directions().len(), 16 * 9);

        for direction in camera.ray_directions() {
            assert_relative_eq!(direction.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn rays_fan_out_around_forward() {
        let camera = camera(3, 3);
        let rays = camera.ray_directions();

        // 가운데 픽셀은 정면
        assert_relative_eq!(rays[4], Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
        // 위쪽 행은 위를, 왼쪽 열은 왼쪽을 봄
        assert!(rays[1].y > 0.0);
        assert!(rays[7].y < 0.0);
        assert!(rays[3].x < 0.0);
        assert!(rays[5].x > 0.0);
    }

    #[test]
    fn vertical_fov_spans_image_height() {
        let fov = 60f32.to_radians();
        let camera = PerspectiveCamera::new(fov, 0.1, 100.0, 1, 2);
        let top = camera.ray_directions()[0];

        // 픽셀 중심은 화면 높이의 1/4 지점
        let expected = ((fov / 2.0).tan() * 0.5).atan();
        assert_relative_eq!(top.y.atan2(-top.z), expected, epsilon = 1e-4);
    }

    #[test]
    fn resize_recomputes_rays() {
        let mut camera = camera(4, 4);
        camera.resize(8, 2);
        assert_eq!(camera.viewport_size(), (8, 2));
        assert_eq!(camera.ray_directions().len(), 16);

        camera.resize(0, 5);
        assert_eq!(camera.viewport_size(), (0, 5));
        assert!(camera.ray_directions().is_empty());
    }

    #[test]
    fn look_to_turns_rays() {
        let mut camera = camera(1, 1);
        camera.look_to(Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(camera.ray_directions()[0], Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-5);

        camera.look_to(Vector3::zeros());
        assert_relative_eq!(camera.forward().into_inner(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn yaw_rotates_around_up() {
        let mut camera = camera(1, 1);
        camera.rotate(0.0, std::f32::consts::FRAC_PI_2);

        let forward = camera.forward().into_inner();
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z.abs(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(forward.x.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn moving_keeps_directions() {
        let mut camera = camera(2, 2);
        let before = camera.ray_directions().to_vec();

        camera.set_position(Point3::new(3.0, 1.0, 2.0));
        assert_eq!(camera.position(), Point3::new(3.0, 1.0, 2.0));
        for (a, b) in before.iter().zip(camera.ray_directions()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;
use crate::error::{Error, Result};
use crate::lantern::scene::Scene;
use crate::lantern::Settings;

/// 실행 파일이 읽는 JSON 설정. 빠진 항목은 기본값을 씀.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// 누적이 켜져 있을 때 의미가 있음
    pub frames: u32,
    pub output: PathBuf,
    pub camera: CameraConfig,
    pub settings: Settings,
    /// 없으면 `Scene::demo()`
    pub scene: Option<Scene>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Point3<f32>,
    pub forward: Vector3<f32>,
    pub vertical_fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            frames: 1,
            output: PathBuf::from("lantern.png"),
            camera: CameraConfig::default(),
            settings: Settings::default(),
            scene: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 6.0),
            forward: Vector3::new(0.0, 0.0, -1.0),
            vertical_fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self, width: u32, height: u32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(self.vertical_fov_degrees.to_radians(), self.near, self.far, width, height);
        camera.look_to(self.forward);
        camera.set_position(self.position);
        camera
    }

    fn validate(&self) -> Result<()> {
        if self.forward.magnitude_squared() == 0.0 {
            return Err(Error::InvalidCamera("forward must be non-zero"));
        }
        if !(self.vertical_fov_degrees > 0.0 && self.vertical_fov_degrees < 180.0) {
            return Err(Error::InvalidCamera("vertical field of view must lie in (0, 180) degrees"));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(Error::InvalidCamera("clip planes must satisfy 0 < near < far"));
        }
        Ok(())
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// 픽셀 버퍼와 누적 버퍼를 합쳐 1GB 남짓에서 자름
    pub const MAX_PIXELS: u64 = 1 << 26;

    pub fn validate(&self) -> Result<()> {
        let pixels = self.width as u64 * self.height as u64;
        if pixels > Self::MAX_PIXELS {
            return Err(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: Self::MAX_PIXELS,
            });
        }
        self.settings.validate()?;
        self.camera.validate()?;
        if let Some(scene) = &self.scene {
            scene.validate()?;
        }
        Ok(())
    }

    pub fn scene(&self) -> Scene {
        self.scene.clone().unwrap_or_else(Scene::demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::lantern::ssaa::Supersampling;
    use approx::assert_relative_eq;

    #[test]
    fn empty_json_uses_defaults() {
        let config = RenderConfig::from_json("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.scene(), Scene::demo());
    }

    #[test]
    fn reads_partial_settings() {
        let config = RenderConfig::from_json(
            r#"{
                "width": 32,
                "height": 16,
                "settings": {
                    "bounces": 2,
                    "supersampling": { "mode": "neighbor", "level": 1 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!((config.width, config.height), (32, 16));
        assert_eq!(config.settings.bounces, 2);
        assert_eq!(config.settings.supersampling, Supersampling::Neighbor { level: 1 });
        assert!(config.settings.multithreaded);
        assert!(!config.settings.should_accumulate);
    }

    #[test]
    fn rejects_invalid_scene_and_camera() {
        let json = r#"{
            "scene": {
                "spheres": [{ "position": [0, 0, 0], "radius": 1.0, "material_index": 1 }],
                "materials": [{ "albedo": [1, 1, 1], "roughness": 0.5 }],
                "light_direction": [0, -1, 0]
            }
        }"#;
        assert!(matches!(RenderConfig::from_json(json), Err(Error::MissingMaterial { .. })));

        let json = r#"{ "camera": { "near": 10.0, "far": 1.0 } }"#;
        assert!(matches!(RenderConfig::from_json(json), Err(Error::InvalidCamera(_))));

        assert!(matches!(RenderConfig::from_json("{ not json"), Err(Error::Json(_))));
    }

    #[test]
    fn rejects_oversized_supersampling_and_images() {
        let json = r#"{ "settings": { "supersampling": { "mode": "neighbor", "level": 40000 } } }"#;
        assert!(matches!(RenderConfig::from_json(json), Err(Error::InvalidSettings(_))));

        let json = r#"{ "settings": { "supersampling": { "mode": "continuous", "level": 16 } } }"#;
        assert!(RenderConfig::from_json(json).is_ok());

        let json = r#"{ "width": 4294967295, "height": 4294967295 }"#;
        match RenderConfig::from_json(json) {
            Err(Error::ImageTooLarge { width, height, .. }) => assert_eq!((width, height), (u32::MAX, u32::MAX)),
            other => panic!("unexpected result: {other:?}"),
        }

        let json = r#"{ "width": 100000, "height": 1000 }"#;
        assert!(matches!(RenderConfig::from_json(json), Err(Error::ImageTooLarge { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        match RenderConfig::from_path("/definitely/not/here.json") {
            Err(Error::Io { path, .. }) => assert_eq!(path, PathBuf::from("/definitely/not/here.json")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn builds_camera_from_config() {
        let config = CameraConfig {
            position: Point3::new(1.0, 2.0, 3.0),
            forward: Vector3::new(0.0, 0.0, -2.0),
            ..Default::default()
        };

        let camera = config.build(3, 3);
        assert_eq!(camera.position(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.ray_directions().len(), 9);
        assert_relative_eq!(camera.ray_directions()[4], Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }
}

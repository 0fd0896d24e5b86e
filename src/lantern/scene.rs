use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 렌더링 동안에는 읽기만 함. 소유권은 호출하는 쪽에 있음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
    /// 빛이 나아가는 방향. 빛을 향하는 방향은 `-light_direction`.
    pub light_direction: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub position: Point3<f32>,
    pub radius: f32,
    pub material_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub albedo: Vector3<f32>,
    /// 0이면 거울, 1이면 반사 방향이 거의 무작위
    pub roughness: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            radius: 0.5,
            material_index: 0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vector3::new(1.0, 1.0, 1.0),
            roughness: 1.0,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            spheres: vec![],
            materials: vec![],
            light_direction: Vector3::new(-1.0, -1.0, -1.0).normalize(),
        }
    }
}

impl Scene {
    /// 분홍색 구 하나가 파란 바닥(큰 구) 위에 놓인 장면
    pub fn demo() -> Self {
        Self {
            spheres: vec![
                Sphere {
                    position: Point3::origin(),
                    radius: 1.0,
                    material_index: 0,
                },
                Sphere {
                    position: Point3::new(0.0, -101.0, 0.0),
                    radius: 100.0,
                    material_index: 1,
                },
            ],
            materials: vec![
                Material {
                    albedo: Vector3::new(1.0, 0.0, 1.0),
                    roughness: 0.0,
                },
                Material {
                    albedo: Vector3::new(0.2, 0.3, 1.0),
                    roughness: 0.1,
                },
            ],
            light_direction: Vector3::new(-1.0, -1.0, -1.0).normalize(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// 렌더러는 재질 인덱스 등을 다시 확인하지 않으니 씬을 만드는 쪽에서 이걸로 검사해야 함
    pub fn validate(&self) -> Result<()> {
        if self.light_direction.magnitude_squared() == 0.0 || !self.light_direction.iter().all(|c| c.is_finite()) {
            return Err(Error::ZeroLightDirection);
        }

        for (index, material) in self.materials.iter().enumerate() {
            if !material.albedo.iter().all(|c| (0.0..=1.0).contains(c)) {
                return Err(Error::InvalidMaterial {
                    material: index,
                    reason: "albedo components must lie in [0, 1]",
                });
            }
            if !(0.0..=1.0).contains(&material.roughness) {
                return Err(Error::InvalidMaterial {
                    material: index,
                    reason: "roughness must lie in [0, 1]",
                });
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            // NaN도 여기서 걸러짐
            if !(sphere.radius > 0.0) {
                return Err(Error::InvalidRadius {
                    sphere: index,
                    radius: sphere.radius,
                });
            }
            if sphere.material_index >= self.materials.len() {
                return Err(Error::MissingMaterial {
                    sphere: index,
                    material_index: sphere.material_index,
                    material_count: self.materials.len(),
                });
            }
        }

        Ok(())
    }

    pub fn material_of(&self, sphere: &Sphere) -> &Material {
        debug_assert!(
            sphere.material_index < self.materials.len(),
            "material index {} out of range",
            sphere.material_index
        );
        &self.materials[sphere.material_index]
    }
}

use log::{debug, trace, warn};
use nalgebra::{Vector3, Vector4};
use rand::{thread_rng, Rng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::lantern::path::trace_path;
use crate::lantern::ray::Ray;
use crate::lantern::scene::Scene;
use crate::lantern::ssaa::Supersampling;
use crate::lantern::texture::ImageTarget;
use crate::vec4_to_rgba;

pub mod hit;
pub mod path;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod ssaa;
pub mod texture;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 빔 하나가 튕길 수 있는 최대 횟수
    pub bounces: u32,
    pub supersampling: Supersampling,
    /// 켜져 있으면 프레임마다 결과를 누적해서 평균냄
    pub should_accumulate: bool,
    /// 꺼져 있으면 한 스레드에서 행 순서대로 그림
    pub multithreaded: bool,
}

impl Settings {
    /// 이보다 크면 픽셀 하나에 빔을 수천 개 넘게 쏘게 됨
    pub const MAX_SUPERSAMPLING_LEVEL: u32 = 16;

    pub fn validate(&self) -> Result<()> {
        if self.supersampling.level() > Self::MAX_SUPERSAMPLING_LEVEL {
            return Err(Error::InvalidSettings("supersampling level must be at most 16"));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bounces: 5,
            supersampling: Supersampling::Off,
            should_accumulate: false,
            multithreaded: true,
        }
    }
}

pub struct Lantern<I: ImageTarget> {
    final_image: I,
    final_image_data: Vec<u32>,
    path_acc: Vec<Vector4<f32>>,
    acc_counter: u32,
    pub settings: Settings,
}

impl<I: ImageTarget> Lantern<I> {
    pub fn new(final_image: I) -> Self {
        Self::with_settings(final_image, Settings::default())
    }

    pub fn with_settings(final_image: I, settings: Settings) -> Self {
        let (width, height) = final_image.size();
        let pixel_count = width as usize * height as usize;

        Self {
            final_image,
            final_image_data: vec![0; pixel_count],
            path_acc: vec![Vector4::zeros(); pixel_count],
            acc_counter: 1,
            settings,
        }
    }

    pub fn final_image(&self) -> &I {
        &self.final_image
    }

    pub fn final_image_mut(&mut self) -> &mut I {
        &mut self.final_image
    }

    pub fn into_final_image(self) -> I {
        self.final_image
    }

    /// 마지막으로 그린 프레임의 픽셀들
    pub fn image_data(&self) -> &[u32] {
        &self.final_image_data
    }

    pub fn frame_index(&self) -> u32 {
        self.acc_counter
    }

    /// 크기가 같으면 아무것도 안 함. 다르면 버퍼를 통째로 새로 만들고 누적도 처음부터 다시 함.
    pub fn resize(&mut self, width: u32, height: u32) {
        let pixel_count = width as usize * height as usize;
        if self.final_image.size() == (width, height) && self.final_image_data.len() == pixel_count {
            return;
        }

        if self.final_image.size() != (width, height) {
            self.final_image.resize(width, height);
        }
        self.final_image_data = vec![0; pixel_count];
        self.path_acc = vec![Vector4::zeros(); pixel_count];
        self.reset_counter();

        debug!("render target resized to {}x{}", width, height);
    }

    pub fn reset_counter(&mut self) {
        self.acc_counter = 1;
    }

    /// 프레임 하나를 끝까지 그리고 `set_data`로 한 번 넘겨줌.
    ///
    /// `camera`의 방향 개수는 이미지 픽셀 수와 같아야 함. 다르면 방향이 다 있는 위쪽 행들만 그리고
    /// 나머지 행은 0(투명한 검정)으로 채움.
    pub fn render<C: Camera + Sync + ?Sized>(&mut self, scene: &Scene, camera: &C) {
        let (width, height) = self.final_image.size();
        let pixel_count = width as usize * height as usize;

        let direction_count = camera.ray_directions().len();
        let covered_rows = if direction_count == pixel_count || width == 0 {
            height
        } else {
            let covered_rows = (direction_count / width as usize).min(height as usize) as u32;
            warn!(
                "camera has {} ray directions for a {}x{} image, rendering the first {} row(s) only",
                direction_count, width, height, covered_rows
            );
            covered_rows
        };
        // 이미지 크기가 밖에서 바뀌었을 수도 있음
        if self.final_image_data.len() != pixel_count {
            self.final_image_data = vec![0; pixel_count];
            self.path_acc = vec![Vector4::zeros(); pixel_count];
            self.reset_counter();
        }

        if self.acc_counter == 1 {
            self.path_acc.fill(Vector4::zeros());
        }

        let frame = Frame {
            scene,
            camera,
            width,
            height: covered_rows,
            settings: &self.settings,
            acc_counter: self.acc_counter,
        };

        // 너비가 0이면 chunk를 나눌 수 없지만 어차피 그릴 픽셀도 없음
        if pixel_count > 0 {
            if self.settings.multithreaded {
                self.final_image_data
                    .par_chunks_mut(width as usize)
                    .zip(self.path_acc.par_chunks_mut(width as usize))
                    .enumerate()
                    .for_each(|(y, (row, acc_row))| {
                        frame.render_row(y as u32, row, acc_row, &mut thread_rng());
                    });
            } else {
                let mut rng = thread_rng();
                let rows = self.final_image_data.chunks_mut(width as usize);
                let acc_rows = self.path_acc.chunks_mut(width as usize);
                for (y, (row, acc_row)) in rows.zip(acc_rows).enumerate() {
                    frame.render_row(y as u32, row, acc_row, &mut rng);
                }
            }
        }

        self.final_image.set_data(&self.final_image_data);
        trace!("frame {} rendered ({}x{})", self.acc_counter, width, height);

        if self.settings.should_accumulate {
            self.acc_counter += 1;
        } else {
            self.acc_counter = 1;
        }
    }
}

/// 렌더 한 번 동안만 빌려 쓰는 것들
struct Frame<'a, C: ?Sized> {
    scene: &'a Scene,
    camera: &'a C,
    width: u32,
    /// 카메라 방향이 있는 행 수. 보통은 이미지 높이와 같음.
    height: u32,
    settings: &'a Settings,
    acc_counter: u32,
}

impl<'a, C: Camera + ?Sized> Frame<'a, C> {
    fn render_row<R: Rng + ?Sized>(&self, y: u32, row: &mut [u32], acc_row: &mut [Vector4<f32>], rng: &mut R) {
        if y >= self.height {
            row.fill(0);
            return;
        }

        for (x, (pixel, accumulated)) in row.iter_mut().zip(acc_row.iter_mut()).enumerate() {
            let color = self.per_pixel(x as u32, y, rng);

            let color = if self.settings.should_accumulate {
                *accumulated += color;
                *accumulated / self.acc_counter as f32
            } else {
                color
            };

            *pixel = vec4_to_rgba(&color.map(|c| c.clamp(0.0, 1.0)));
        }
    }

    // 픽셀 하나의 색. 초과 표본화 방식에 따라 빔을 하나 또는 여러 개 쏨
    fn per_pixel<R: Rng + ?Sized>(&self, x: u32, y: u32, rng: &mut R) -> Vector4<f32> {
        let directions = self.camera.ray_directions();
        let mut sample = |direction: Vector3<f32>| self.trace(direction, rng);

        match self.settings.supersampling {
            Supersampling::Off => sample(directions[x as usize + y as usize * self.width as usize]),
            Supersampling::Continuous { level } => {
                ssaa::continuous(directions, self.width, self.height, x, y, level, sample)
            }
            Supersampling::Neighbor { level } => {
                ssaa::neighbor(directions, self.width, self.height, x, y, level, sample)
            }
        }
    }

    fn trace<R: Rng + ?Sized>(&self, direction: Vector3<f32>, rng: &mut R) -> Vector4<f32> {
        let ray = Ray::new(self.camera.position(), direction);
        trace_path(self.scene, ray, self.settings.bounces, rng)
    }
}

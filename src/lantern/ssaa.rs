use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// 픽셀 하나에 빔을 여러 개 쏴서 평균을 내는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Supersampling {
    /// 픽셀당 빔 하나
    #[default]
    Off,
    /// 픽셀 안을 `level` x `level` 격자로 나눠서 각 칸의 중심으로 쏨.
    /// 방향은 카메라의 방향 표를 선형 보간해서 얻으니 샘플은 항상 유효함.
    Continuous { level: u32 },
    /// 주변 `[-level, level]` 범위의 이웃 픽셀 방향을 평균냄.
    /// 이미지 밖으로 나가는 이웃은 건너뛰고 개수에도 넣지 않음.
    Neighbor { level: u32 },
}

impl Supersampling {
    /// 이미지 가장자리가 아닐 때 픽셀 하나에 쏘는 빔 수. 너무 크면 `u64::MAX`에서 멈춤.
    pub fn samples_per_pixel(&self) -> u64 {
        match *self {
            Supersampling::Off => 1,
            Supersampling::Continuous { level } => (level.max(1) as u64).saturating_pow(2),
            Supersampling::Neighbor { level } => (2 * level as u64 + 1).saturating_pow(2),
        }
    }

    pub fn level(&self) -> u32 {
        match *self {
            Supersampling::Off => 0,
            Supersampling::Continuous { level } | Supersampling::Neighbor { level } => level,
        }
    }
}

/// `directions`(행 우선, `width * height`)를 소수 좌표 `(x, y)`에서 이중 선형 보간함.
/// 좌표는 이미지 범위 안으로 잘림.
pub fn interpolate_direction(directions: &[Vector3<f32>], width: u32, height: u32, x: f32, y: f32) -> Vector3<f32> {
    let x = x.clamp(0.0, (width - 1) as f32);
    let y = y.clamp(0.0, (height - 1) as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let tx = x - x0 as f32;
    let ty = y - y0 as f32;

    let at = |x: u32, y: u32| directions[x as usize + y as usize * width as usize];

    if tx == 0.0 && ty == 0.0 {
        return at(x0, y0);
    }

    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let top = at(x0, y0).lerp(&at(x1, y0), tx);
    let bottom = at(x0, y1).lerp(&at(x1, y1), tx);
    top.lerp(&bottom, ty)
}

/// 픽셀 `(x, y)` 안의 `level * level`개 지점에서 `sample`을 불러 평균냄
pub fn continuous<F>(
    directions: &[Vector3<f32>],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    level: u32,
    mut sample: F,
) -> Vector4<f32>
where
    F: FnMut(Vector3<f32>) -> Vector4<f32>,
{
    let level = level.max(1);
    let step = 1.0 / level as f32;

    let mut color = Vector4::zeros();
    let mut sample_count = 0u32;

    for sub_y in 0..level {
        for sub_x in 0..level {
            let sample_x = x as f32 + ((sub_x as f32 + 0.5) * step - 0.5);
            let sample_y = y as f32 + ((sub_y as f32 + 0.5) * step - 0.5);

            color += sample(interpolate_direction(directions, width, height, sample_x, sample_y));
            sample_count += 1;
        }
    }

    color / sample_count as f32
}

/// 픽셀 `(x, y)`와 그 이웃들의 방향으로 `sample`을 불러 평균냄.
/// 가장자리 픽셀은 더 적은 샘플로 나눔.
pub fn neighbor<F>(
    directions: &[Vector3<f32>],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    level: u32,
    mut sample: F,
) -> Vector4<f32>
where
    F: FnMut(Vector3<f32>) -> Vector4<f32>,
{
    let level = level as i64;

    let mut color = Vector4::zeros();
    let mut sample_count = 0u32;

    for offset_y in -level..=level {
        let sample_y = y as i64 + offset_y;
        if sample_y < 0 || sample_y >= height as i64 {
            continue;
        }

        for offset_x in -level..=level {
            let sample_x = x as i64 + offset_x;
            if sample_x < 0 || sample_x >= width as i64 {
                continue;
            }

            color += sample(directions[sample_x as usize + sample_y as usize * width as usize]);
            sample_count += 1;
        }
    }

    color / sample_count as f32
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 렌더링 자체는 실패하지 않음. 파일 입출력, 설정/씬 검증, 이미지 인코딩만 에러를 냄.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("sphere {sphere} refers to material {material_index}, but the scene has {material_count} materials")]
    MissingMaterial {
        sphere: usize,
        material_index: usize,
        material_count: usize,
    },

    #[error("sphere {sphere} has non-positive radius {radius}")]
    InvalidRadius { sphere: usize, radius: f32 },

    #[error("material {material} is invalid: {reason}")]
    InvalidMaterial { material: usize, reason: &'static str },

    #[error("light direction must be non-zero")]
    ZeroLightDirection,

    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),

    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    #[error("{width}x{height} exceeds the {max} pixel limit")]
    ImageTooLarge { width: u32, height: u32, max: u64 },
}

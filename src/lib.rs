use nalgebra::Vector4;

pub mod camera;
pub mod config;
pub mod error;
pub mod lantern;
pub mod util;

pub use camera::{Camera, PerspectiveCamera};
pub use config::{CameraConfig, RenderConfig};
pub use error::{Error, Result};
pub use lantern::hit::{HitPayload, reflect, trace_ray};
pub use lantern::path::trace_path;
pub use lantern::ray::Ray;
pub use lantern::scene::{Material, Scene, Sphere};
pub use lantern::shading::{light_intensity, sky_color, SKY_COLOR};
pub use lantern::ssaa::Supersampling;
pub use lantern::texture::{Image, ImageTarget};
pub use lantern::{Lantern, Settings};

/// `[0, 1]` 범위의 RGBA 색상을 `R | G << 8 | B << 16 | A << 24` 형태로 묶음.
///
/// 각 채널은 반올림이 아니라 버림(`as u8`)으로 변환함. 범위 밖의 값은 호출하는 쪽에서 먼저 clamp 해야 함.
pub fn vec4_to_rgba(color: &Vector4<f32>) -> u32 {
    let r = (color.x * 255.0) as u8;
    let g = (color.y * 255.0) as u8;
    let b = (color.z * 255.0) as u8;
    let a = (color.w * 255.0) as u8;

    (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

/// `vec4_to_rgba`의 역변환
pub fn rgba_to_vec4(packed: u32) -> Vector4<f32> {
    let [r, g, b, a] = packed.to_le_bytes();
    Vector4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
}

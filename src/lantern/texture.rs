use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::error::Result;

/// 렌더러가 결과를 내보내는 이미지. 화면 출력용이든 파일 저장용이든 이 형태만 맞추면 됨.
pub trait ImageTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// 크기가 실제로 바뀔 때만 불림
    fn resize(&mut self, width: u32, height: u32);

    /// `R | G << 8 | B << 16 | A << 24`로 묶인 픽셀들. 행 우선, (0, 0)이 왼쪽 위.
    /// 프레임 하나가 끝날 때마다 정확히 한 번 불림.
    fn set_data(&mut self, pixels: &[u32]);

    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// CPU 메모리에 있는 RGBA8 이미지
pub struct Image {
    pub buffer: RgbaImage,
    pub name: String,
}

impl Image {
    pub fn new(width: u32, height: u32, label: &str) -> Image {
        Self {
            buffer: RgbaImage::new(width, height),
            name: label.to_string(),
        }
    }

    /// 확장자로 포맷을 고름. png, jpg/jpeg만 지원.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;

        if format == ImageFormat::Jpeg {
            // jpeg는 알파 채널이 없음
            let rgb = image::DynamicImage::ImageRgba8(self.buffer.clone()).into_rgb8();
            rgb.save_with_format(path, format)?;
        } else {
            self.buffer.save_with_format(path, format)?;
        }

        debug!("{} saved to {}", self.name, path.display());
        Ok(())
    }
}

impl ImageTarget for Image {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.buffer.dimensions() == (width, height) {
            return;
        }

        // 내용은 다음 set_data에서 통째로 덮어쓰니 새로 만들기만 함
        self.buffer = RgbaImage::new(width, height);
    }

    fn set_data(&mut self, pixels: &[u32]) {
        let pixel_count = (self.buffer.width() * self.buffer.height()) as usize;
        assert_eq!(pixel_count, pixels.len(), "{}: pixel count mismatch", self.name);

        let bytes: &mut [u8] = &mut self.buffer;
        if cfg!(target_endian = "little") {
            bytes.copy_from_slice(bytemuck::cast_slice(pixels));
        } else {
            for (dst, pixel) in bytes.chunks_exact_mut(4).zip(pixels) {
                dst.copy_from_slice(&pixel.to_le_bytes());
            }
        }
    }
}

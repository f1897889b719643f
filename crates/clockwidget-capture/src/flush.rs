//! 캡처/플러시 엔진.
//!
//! 서피스의 ARGB8888 픽셀을 임시 이미지로 옮겨 PNG(최고 압축, 적응 필터)로
//! 저장한다. 원본 크기가 목표 크기와 다르면 fast_image_resize로 부드럽게 스케일링.
//!
//! 임시 이미지는 성공/실패와 무관하게 모든 경로에서 해제되며,
//! [`live_transient_images`]로 현재 스레드의 잔존 개수를 확인할 수 있다.

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clockwidget_core::error::CoreError;
use clockwidget_core::models::surface::{Dims, PixelBuffer};
use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, warn};

use crate::canvas::{RenderMode, VirtualCanvas};

thread_local! {
    static LIVE_TRANSIENT_IMAGES: Cell<usize> = const { Cell::new(0) };
}

/// 현재 스레드에서 해제되지 않은 임시 이미지 수
pub fn live_transient_images() -> usize {
    LIVE_TRANSIENT_IMAGES.with(Cell::get)
}

/// 캔버스를 렌더한 뒤 PNG 파일로 저장
///
/// 수동 렌더 모드 캔버스는 저장 전에 동기 렌더 패스를 강제한다.
pub fn flush_to_file(
    canvas: &mut VirtualCanvas,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), CoreError> {
    if canvas.render_mode() == RenderMode::Manual {
        canvas.render();
    }
    let dims = canvas.dims();
    let pixels = canvas.pixels()?;
    write_png(pixels, dims, path, Dims::new(width, height))
}

/// 창 버퍼에서 직접 읽은 픽셀을 PNG 파일로 저장
pub fn flush_pixels_to_file(
    pixels: &PixelBuffer,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), CoreError> {
    let dims = pixels.dims();
    if dims.pixel_count() != Some(pixels.data.len()) {
        return Err(CoreError::PixelAccessFailed(format!(
            "픽셀 버퍼 길이 불일치: {}x{} != {}",
            dims.width,
            dims.height,
            pixels.data.len()
        )));
    }
    write_png(&pixels.data, dims, path, Dims::new(width, height))
}

fn write_png(src: &[u32], src_dims: Dims, path: &Path, target: Dims) -> Result<(), CoreError> {
    if target.width == 0 || target.height == 0 {
        return Err(CoreError::InvalidArgument(format!(
            "저장 크기 0: {}x{}",
            target.width, target.height
        )));
    }

    let mut image = TransientImage::new(target)?;
    image.set_pixels(src, src_dims)?;
    let result = image.save_png(path);
    drop(image);

    match &result {
        Ok(()) => debug!(
            "PNG 저장 완료: {} ({}x{})",
            path.display(),
            target.width,
            target.height
        ),
        Err(e) => warn!("PNG 저장 실패: {e}"),
    }
    result
}

/// 저장용 임시 RGBA8 이미지 (straight alpha)
struct TransientImage {
    dims: Dims,
    rgba: Vec<u8>,
}

impl TransientImage {
    fn new(dims: Dims) -> Result<Self, CoreError> {
        let len = dims
            .pixel_count()
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                CoreError::AllocationFailed(format!(
                    "임시 이미지 크기 초과: {}x{}",
                    dims.width, dims.height
                ))
            })?;
        let mut rgba = Vec::new();
        rgba.try_reserve_exact(len)
            .map_err(|e| CoreError::AllocationFailed(format!("임시 이미지 할당 실패: {e}")))?;
        rgba.resize(len, 0);

        LIVE_TRANSIENT_IMAGES.with(|c| c.set(c.get() + 1));
        Ok(Self { dims, rgba })
    }

    /// ARGB8888 → RGBA8 복사 (크기가 다르면 스무스 스케일링)
    fn set_pixels(&mut self, src: &[u32], src_dims: Dims) -> Result<(), CoreError> {
        if src_dims == self.dims {
            argb_to_rgba(src, &mut self.rgba);
            return Ok(());
        }

        if src_dims.width == 0 || src_dims.height == 0 {
            return Err(CoreError::PixelAccessFailed("원본 픽셀 크기 0".to_string()));
        }

        let mut src_rgba = vec![0u8; src.len() * 4];
        argb_to_rgba(src, &mut src_rgba);

        let src_image =
            FirImage::from_vec_u8(src_dims.width, src_dims.height, src_rgba, PixelType::U8x4)
                .map_err(|e| CoreError::PixelAccessFailed(format!("원본 이미지 생성 실패: {e}")))?;
        let mut dst_image = FirImage::new(self.dims.width, self.dims.height, PixelType::U8x4);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));
        Resizer::new()
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| CoreError::PixelAccessFailed(format!("스케일링 실패: {e}")))?;

        self.rgba = dst_image.into_vec();
        debug!(
            "플러시 스케일링: {}x{} → {}x{}",
            src_dims.width, src_dims.height, self.dims.width, self.dims.height
        );
        Ok(())
    }

    fn save_png(&self, path: &Path) -> Result<(), CoreError> {
        let encode_failed = |reason: String| CoreError::EncodeFailed {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::create(path).map_err(|e| encode_failed(e.to_string()))?;
        let mut writer = BufWriter::new(file);

        PngEncoder::new_with_quality(&mut writer, CompressionType::Best, FilterType::Adaptive)
            .write_image(
                &self.rgba,
                self.dims.width,
                self.dims.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| encode_failed(e.to_string()))?;

        writer.flush().map_err(|e| encode_failed(e.to_string()))
    }
}

impl Drop for TransientImage {
    fn drop(&mut self) {
        LIVE_TRANSIENT_IMAGES.with(|c| c.set(c.get().saturating_sub(1)));
    }
}

/// 0xAARRGGBB → [R, G, B, A]
fn argb_to_rgba(src: &[u32], dst: &mut [u8]) {
    for (px, out) in src.iter().zip(dst.chunks_exact_mut(4)) {
        let [a, r, g, b] = px.to_be_bytes();
        out.copy_from_slice(&[r, g, b, a]);
    }
}

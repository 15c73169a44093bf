//! 작업 해상도 축소.
//!
//! 종횡비를 유지하며 최대 크기 안으로 줄인다. 처리 비용 절감이 목적이므로
//! fast_image_resize의 최근접 이웃(Nearest) 보간만 사용한다 (채널 혼합 없음).

use ambience_core::error::CoreError;
use ambience_core::models::buffer::PixelBuffer;
use ambience_core::models::geometry::Size;
use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use tracing::debug;

/// 최대 크기 기반 축소기
#[derive(Debug, Clone, Copy)]
pub struct Downscaler {
    max: Size,
}

impl Downscaler {
    /// 새 축소기 생성 (0 크기는 1로 올림)
    pub fn new(max: Size) -> Self {
        Self {
            max: Size::new(max.width.max(1), max.height.max(1)),
        }
    }

    pub fn max_size(&self) -> Size {
        self.max
    }

    /// 버퍼를 최대 크기 안으로 축소
    ///
    /// 이미 범위 안이면 입력을 그대로 돌려준다 (할당 없음).
    /// 그 외에는 새로 할당된 패딩 없는 버퍼를 반환하며, 입력은 여기서 해제된다.
    pub fn downscale(&self, buffer: PixelBuffer) -> Result<PixelBuffer, CoreError> {
        let src = buffer.size();
        let target = optimal_size(src, self.max);

        if target == src || buffer.is_empty() {
            return Ok(buffer);
        }

        let order = buffer.order();
        let src_image = FirImage::from_vec_u8(
            src.width,
            src.height,
            buffer.to_packed_bytes(),
            PixelType::U8x3,
        )
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;

        let mut dst_image = FirImage::new(target.width, target.height, PixelType::U8x3);

        let mut resizer = Resizer::new();
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);

        resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

        debug!(
            "축소: {}x{} → {}x{}",
            src.width, src.height, target.width, target.height
        );

        PixelBuffer::packed(target.width, target.height, order, dst_image.into_vec())
    }
}

/// 종횡비를 유지하는 축소 목표 크기 계산
///
/// `sw = w / max_w`, `sh = h / max_h` 중 큰 비율로 나눈다.
/// 둘 다 1 이하이면 원본 크기 그대로.
pub fn optimal_size(src: Size, max: Size) -> Size {
    if src.is_empty() || max.is_empty() {
        return src;
    }

    let sw = src.width as f64 / max.width as f64;
    let sh = src.height as f64 / max.height as f64;

    if sw <= 1.0 && sh <= 1.0 {
        return src;
    }

    if sh > sw {
        let width = (src.width as f64 / sh).round() as u32;
        Size::new(width.clamp(1, max.width), max.height)
    } else {
        let height = (src.height as f64 / sw).round() as u32;
        Size::new(max.width, height.clamp(1, max.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambience_core::models::buffer::ChannelOrder;
    use ambience_core::models::color::RgbColor;

    #[test]
    fn within_bounds_is_unchanged() {
        assert_eq!(optimal_size(Size::new(320, 200), Size::new(512, 288)), Size::new(320, 200));
        assert_eq!(optimal_size(Size::new(512, 288), Size::new(512, 288)), Size::new(512, 288));
    }

    #[test]
    fn wide_source_limited_by_width() {
        // 1920x1080 → 512x288 (16:9 그대로)
        assert_eq!(optimal_size(Size::new(1920, 1080), Size::new(512, 288)), Size::new(512, 288));
        // 3840x1080 → sw=7.5, sh=3.75 → 512 x 144
        assert_eq!(optimal_size(Size::new(3840, 1080), Size::new(512, 288)), Size::new(512, 144));
    }

    #[test]
    fn tall_source_limited_by_height() {
        // 1080x1920 → sh=6.67 > sw=2.11 → h=288, w=round(1080/6.667)=162
        assert_eq!(optimal_size(Size::new(1080, 1920), Size::new(512, 288)), Size::new(162, 288));
    }

    #[test]
    fn aspect_ratio_preserved_within_one_pixel() {
        let max = Size::new(512, 288);
        for (w, h) in [(1921, 1079), (5000, 77), (77, 5000), (1366, 768), (2560, 1440), (600, 290)] {
            let out = optimal_size(Size::new(w, h), max);
            assert!(out.width <= max.width && out.height <= max.height);

            let scale = (w as f64 / max.width as f64).max(h as f64 / max.height as f64);
            let exp_w = w as f64 / scale;
            let exp_h = h as f64 / scale;
            assert!((out.width as f64 - exp_w).abs() <= 1.0, "{w}x{h} → {out:?}");
            assert!((out.height as f64 - exp_h).abs() <= 1.0, "{w}x{h} → {out:?}");
        }
    }

    #[test]
    fn downscale_is_idempotent() {
        let scaler = Downscaler::new(Size::new(128, 72));
        let once = scaler
            .downscale(PixelBuffer::filled(640, 360, RgbColor::new(1, 2, 3)))
            .unwrap();
        let twice = scaler.downscale(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn small_buffer_passes_through_untouched() {
        // 패딩이 있는 작은 버퍼는 stride까지 그대로 유지
        let data = vec![9; 2 * 8];
        let buf = PixelBuffer::new(2, 2, 8, ChannelOrder::Bgr, data).unwrap();
        let out = Downscaler::new(Size::new(128, 72)).downscale(buf.clone()).unwrap();
        assert_eq!(out, buf);
        assert_eq!(out.stride_bytes(), 8);
    }

    #[test]
    fn nearest_neighbor_keeps_exact_colors() {
        let color = RgbColor::new(200, 100, 50);
        let out = Downscaler::new(Size::new(128, 72))
            .downscale(PixelBuffer::filled(1280, 720, color))
            .unwrap();
        assert_eq!(out.size(), Size::new(128, 72));
        assert_eq!(out.stride_bytes(), 128 * 3);
        assert_eq!(out.pixel(0, 0), Some(color));
        assert_eq!(out.pixel(127, 71), Some(color));
    }

    #[test]
    fn channel_order_is_preserved() {
        let mut data = Vec::new();
        for _ in 0..(300 * 100) {
            data.extend_from_slice(&[3, 2, 1]);
        }
        let buf = PixelBuffer::packed(300, 100, ChannelOrder::Bgr, data).unwrap();
        let out = Downscaler::new(Size::new(150, 100)).downscale(buf).unwrap();
        assert_eq!(out.order(), ChannelOrder::Bgr);
        assert_eq!(out.pixel(10, 10), Some(RgbColor::new(1, 2, 3)));
    }
}

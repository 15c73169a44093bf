//! 픽셀 추출.
//!
//! 버퍼를 행 단위로 순회하며 (stride 기준 주소 지정) 표준 RGB 샘플을 만든다.
//! 캡처 경계의 채널 순서는 이 지점에서만 RGB로 변환된다.

use ambience_core::models::buffer::{PixelBuffer, BYTES_PER_PIXEL};
use ambience_core::models::color::RgbColor;

/// 행 우선 순서의 픽셀 샘플 반복자
///
/// `skip_black`이면 세 채널이 모두 0인 픽셀은 건너뛴다.
/// 다시 순회하려면 같은 버퍼로 다시 호출한다.
pub fn pixels(buffer: &PixelBuffer, skip_black: bool) -> impl Iterator<Item = RgbColor> + '_ {
    let order = buffer.order();
    (0..buffer.height())
        .filter_map(move |y| buffer.row(y))
        .flat_map(|row| row.chunks_exact(BYTES_PER_PIXEL))
        .map(move |px| order.to_rgb(px))
        .filter(move |color| !(skip_black && color.is_black()))
}

/// 모든 샘플을 벡터로 수집
pub fn collect_samples(buffer: &PixelBuffer, skip_black: bool) -> Vec<RgbColor> {
    let capacity = if skip_black {
        0
    } else {
        buffer.width() as usize * buffer.height() as usize
    };
    let mut samples = Vec::with_capacity(capacity);
    samples.extend(pixels(buffer, skip_black));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambience_core::models::buffer::ChannelOrder;

    fn checkerboard(w: u32, h: u32, stride_pad: usize) -> PixelBuffer {
        let stride = w as usize * 3 + stride_pad;
        let mut data = vec![0xAB; stride * h as usize];
        for y in 0..h as usize {
            for x in 0..w as usize {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                let o = y * stride + x * 3;
                data[o..o + 3].copy_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(w, h, stride, ChannelOrder::Rgb, data).unwrap()
    }

    #[test]
    fn returns_every_pixel_without_skip() {
        for (w, h, pad) in [(1, 1, 0), (3, 5, 0), (7, 2, 3), (16, 9, 1)] {
            let buf = checkerboard(w, h, pad);
            assert_eq!(pixels(&buf, false).count(), (w * h) as usize);
        }
    }

    #[test]
    fn padding_bytes_never_sampled() {
        // 패딩 0xAB가 샘플로 나오면 안 됨
        let buf = checkerboard(5, 4, 2);
        assert!(pixels(&buf, false).all(|c| c.r == 0 || c.r == 255));
    }

    #[test]
    fn skip_black_drops_only_pure_black() {
        let data = vec![
            0, 0, 0, //
            0, 0, 1, //
            1, 0, 0, //
            0, 0, 0,
        ];
        let buf = PixelBuffer::packed(2, 2, ChannelOrder::Rgb, data).unwrap();
        let samples = collect_samples(&buf, true);
        assert_eq!(
            samples,
            vec![RgbColor::new(0, 0, 1), RgbColor::new(1, 0, 0)]
        );
        assert!(samples.iter().all(|c| !c.is_black()));
    }

    #[test]
    fn row_major_order() {
        let data = vec![
            1, 1, 1, 2, 2, 2, //
            3, 3, 3, 4, 4, 4,
        ];
        let buf = PixelBuffer::packed(2, 2, ChannelOrder::Rgb, data).unwrap();
        let reds: Vec<u8> = pixels(&buf, false).map(|c| c.r).collect();
        assert_eq!(reds, vec![1, 2, 3, 4]);
    }

    #[test]
    fn bgr_buffer_translated_to_rgb() {
        let buf = PixelBuffer::packed(1, 1, ChannelOrder::Bgr, vec![255, 0, 10]).unwrap();
        assert_eq!(collect_samples(&buf, false), vec![RgbColor::new(10, 0, 255)]);
    }

    #[test]
    fn zero_area_buffer_yields_nothing() {
        let buf = PixelBuffer::packed(0, 0, ChannelOrder::Rgb, Vec::new()).unwrap();
        assert_eq!(pixels(&buf, false).count(), 0);
        let buf = PixelBuffer::packed(0, 3, ChannelOrder::Rgb, Vec::new()).unwrap();
        assert_eq!(pixels(&buf, true).count(), 0);
    }
}

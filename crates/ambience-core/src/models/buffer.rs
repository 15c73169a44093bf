//! 캡처 픽셀 버퍼.
//!
//! 픽셀당 3바이트, 행 단위 stride 주소 지정. 생성 시점에 레이아웃을 검증하므로
//! 이후의 모든 인덱스 접근은 선언된 버퍼 길이를 넘지 않는다.

use crate::error::CoreError;

use super::color::RgbColor;
use super::geometry::Size;

/// 픽셀당 바이트 수
pub const BYTES_PER_PIXEL: usize = 3;

/// 버퍼 채널 순서 (캡처 경계가 기록, 추출 경계에서 RGB로 변환)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// 원시 3바이트를 표준 RGB 순서로 변환
    #[inline]
    pub fn to_rgb(self, px: &[u8]) -> RgbColor {
        match self {
            Self::Rgb => RgbColor::new(px[0], px[1], px[2]),
            Self::Bgr => RgbColor::new(px[2], px[1], px[0]),
        }
    }
}

/// 소유권을 가진 연속 픽셀 버퍼
///
/// 행 `y`는 `y * stride_bytes` 오프셋에서 시작한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride_bytes: usize,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 레이아웃을 검증하며 버퍼 생성
    ///
    /// `stride_bytes >= width * 3`이어야 하고, 데이터는 마지막 행의 픽셀까지
    /// 담을 수 있어야 한다 (마지막 행 뒤 패딩은 생략 가능).
    pub fn new(
        width: u32,
        height: u32,
        stride_bytes: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        if stride_bytes < row_bytes {
            return Err(CoreError::BufferLayout(format!(
                "stride {stride_bytes} < 행 바이트 {row_bytes} (너비 {width})"
            )));
        }

        let required = if height == 0 || width == 0 {
            0
        } else {
            (height as usize - 1) * stride_bytes + row_bytes
        };
        if data.len() < required {
            return Err(CoreError::BufferLayout(format!(
                "데이터 {}바이트 < 필요 {}바이트 ({}x{}, stride {})",
                data.len(),
                required,
                width,
                height,
                stride_bytes
            )));
        }

        Ok(Self {
            width,
            height,
            stride_bytes,
            order,
            data,
        })
    }

    /// 패딩 없는 버퍼 생성 (`stride == width * 3`)
    pub fn packed(
        width: u32,
        height: u32,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, CoreError> {
        Self::new(width, height, width as usize * BYTES_PER_PIXEL, order, data)
    }

    /// 단색 버퍼 생성
    pub fn filled(width: u32, height: u32, color: RgbColor) -> Self {
        let data = color.to_array().repeat(width as usize * height as usize);
        Self {
            width,
            height,
            stride_bytes: width as usize * BYTES_PER_PIXEL,
            order: ChannelOrder::Rgb,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride_bytes(&self) -> usize {
        self.stride_bytes
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 원시 데이터 (패딩 포함)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 행 `y`의 픽셀 바이트 (패딩 제외)
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride_bytes;
        self.data
            .get(start..start + self.width as usize * BYTES_PER_PIXEL)
    }

    /// `(x, y)` 픽셀을 표준 RGB로 반환
    pub fn pixel(&self, x: u32, y: u32) -> Option<RgbColor> {
        if x >= self.width {
            return None;
        }
        let offset = x as usize * BYTES_PER_PIXEL;
        self.row(y)
            .and_then(|row| row.get(offset..offset + BYTES_PER_PIXEL))
            .map(|px| self.order.to_rgb(px))
    }

    /// 행 패딩을 제거한 연속 데이터 복사본
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        if self.stride_bytes == self.width as usize * BYTES_PER_PIXEL {
            let len = self.width as usize * self.height as usize * BYTES_PER_PIXEL;
            return self.data[..len].to_vec();
        }
        (0..self.height)
            .filter_map(|y| self.row(y))
            .flatten()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn stride_smaller_than_row_rejected() {
        let result = PixelBuffer::new(4, 2, 11, ChannelOrder::Rgb, vec![0; 64]);
        assert_matches!(result, Err(CoreError::BufferLayout(_)));
    }

    #[test]
    fn short_data_rejected() {
        // 2행, stride 16 → 필요 16 + 12 = 28바이트
        let result = PixelBuffer::new(4, 2, 16, ChannelOrder::Rgb, vec![0; 27]);
        assert_matches!(result, Err(CoreError::BufferLayout(_)));

        let ok = PixelBuffer::new(4, 2, 16, ChannelOrder::Rgb, vec![0; 28]);
        assert!(ok.is_ok());
    }

    #[test]
    fn padded_rows_are_addressed_by_stride() {
        // 2x2, 행당 2바이트 패딩 (0xEE)
        let data = vec![
            1, 2, 3, 4, 5, 6, 0xEE, 0xEE, //
            7, 8, 9, 10, 11, 12, 0xEE, 0xEE,
        ];
        let buf = PixelBuffer::new(2, 2, 8, ChannelOrder::Rgb, data).unwrap();
        assert_eq!(buf.pixel(0, 1), Some(RgbColor::new(7, 8, 9)));
        assert_eq!(buf.pixel(1, 1), Some(RgbColor::new(10, 11, 12)));
        assert_eq!(buf.pixel(2, 0), None);
        assert_eq!(buf.row(1).unwrap().len(), 6);
        assert_eq!(
            buf.to_packed_bytes(),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn bgr_pixels_translate_to_rgb() {
        let buf = PixelBuffer::packed(1, 1, ChannelOrder::Bgr, vec![30, 20, 10]).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(RgbColor::new(10, 20, 30)));
    }

    #[test]
    fn zero_area_buffer_is_valid() {
        let buf = PixelBuffer::packed(0, 0, ChannelOrder::Rgb, Vec::new()).unwrap();
        assert!(buf.is_empty());
        assert!(buf.row(0).is_none());
    }
}

//! 색상 축약 전략.
//!
//! 캡처(및 축소)된 버퍼 하나를 대표 색상 하나로 줄인다.
//! 모든 전략은 상태가 없고 버퍼를 읽기만 하므로 같은 버퍼에 차례로 적용할 수 있다.

use ambience_core::models::buffer::PixelBuffer;
use ambience_core::models::color::RgbColor;
use tracing::{debug, warn};

use crate::extract;
use crate::kmeans::KMeans;

/// 색상 축약 전략
pub trait ColorReducer: Send + Sync {
    /// 표시용 짧은 라벨
    fn label(&self) -> &'static str;

    /// 버퍼를 대표 색상 하나로 축약
    fn reduce(&self, buffer: &PixelBuffer) -> RgbColor;
}

/// 중앙 픽셀 `(w/2, h/2)` — 픽셀 추출을 거치지 않는 O(1) 전략
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterPixel;

impl ColorReducer for CenterPixel {
    fn label(&self) -> &'static str {
        "CCol"
    }

    fn reduce(&self, buffer: &PixelBuffer) -> RgbColor {
        buffer
            .pixel(buffer.width() / 2, buffer.height() / 2)
            .unwrap_or(RgbColor::BLACK)
    }
}

/// 채널별 산술 평균
#[derive(Debug, Clone, Copy)]
pub struct Average {
    skip_black: bool,
}

impl Average {
    pub fn new(skip_black: bool) -> Self {
        Self { skip_black }
    }
}

impl ColorReducer for Average {
    fn label(&self) -> &'static str {
        "ACol"
    }

    fn reduce(&self, buffer: &PixelBuffer) -> RgbColor {
        let mut sums = [0u64; 3];
        let mut count = 0u64;

        for color in extract::pixels(buffer, self.skip_black) {
            sums[0] += color.r as u64;
            sums[1] += color.g as u64;
            sums[2] += color.b as u64;
            count += 1;
        }

        if count == 0 {
            debug!("평균 계산 대상 픽셀 없음 — 검은색 반환");
            return RgbColor::BLACK;
        }

        RgbColor::new(
            (sums[0] / count) as u8,
            (sums[1] / count) as u8,
            (sums[2] / count) as u8,
        )
    }
}

/// k-means(k=1) 지배 색상
#[derive(Debug, Clone, Copy)]
pub struct DominantCluster {
    skip_black: bool,
    threshold: f32,
}

impl DominantCluster {
    pub fn new(skip_black: bool, threshold: f32) -> Self {
        Self {
            skip_black,
            threshold,
        }
    }
}

impl ColorReducer for DominantCluster {
    fn label(&self) -> &'static str {
        "DCol"
    }

    fn reduce(&self, buffer: &PixelBuffer) -> RgbColor {
        let samples = extract::collect_samples(buffer, self.skip_black);
        if samples.is_empty() {
            debug!("군집화 대상 픽셀 없음 — 검은색 반환");
            return RgbColor::BLACK;
        }

        let clustered = KMeans::new(1, self.threshold).and_then(|km| km.cluster(&samples));
        match clustered {
            Ok(centroids) => centroids.first().copied().unwrap_or(RgbColor::BLACK),
            Err(e) => {
                warn!("k-means 실패 (무시): {e}");
                RgbColor::BLACK
            }
        }
    }
}

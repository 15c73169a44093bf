//! 캡처 주기 오케스트레이터.
//!
//! 영역 계산 → 캡처 → 축소 → 색상 축약을 한 주기로 묶는다.
//! 버퍼 소유권은 캡처 → 축소 → 축약 방향으로만 넘어가며, 축약 전략들은
//! 같은 버퍼를 읽기 전용으로 차례대로 사용한다. 버퍼는 주기가 끝나면 해제된다.

use std::sync::Arc;

use ambience_core::config::CaptureConfig;
use ambience_core::error::CoreError;
use ambience_core::models::buffer::PixelBuffer;
use ambience_core::models::frame::CycleColors;
use ambience_core::models::window::WindowTarget;
use ambience_core::ports::capture::{BoundsProvider, ScreenGrabber};
use ambience_core::ports::window::WindowLocator;
use chrono::Utc;
use tracing::debug;

use crate::downscale::Downscaler;
use crate::reducer::{Average, CenterPixel, ColorReducer, DominantCluster};
use crate::region::RegionResolver;

/// 캡처-색상 파이프라인
pub struct CapturePipeline {
    target: WindowTarget,
    resolver: RegionResolver,
    grabber: Arc<dyn ScreenGrabber>,
    downscaler: Downscaler,
    center: CenterPixel,
    average: Average,
    dominant: DominantCluster,
}

impl CapturePipeline {
    /// 새 파이프라인 생성 — 설정은 허용 범위로 고정한 뒤 각 단계에 전달
    pub fn new(
        config: &CaptureConfig,
        target: WindowTarget,
        bounds: Arc<dyn BoundsProvider>,
        grabber: Arc<dyn ScreenGrabber>,
    ) -> Self {
        let config = config.clamped();
        Self {
            target,
            resolver: RegionResolver::new(
                bounds,
                config.use_virtual_screen,
                config.crop_percentage,
            ),
            grabber,
            downscaler: Downscaler::new(config.target_resolution()),
            center: CenterPixel,
            average: Average::new(config.ignore_black_pixels),
            dominant: DominantCluster::new(config.ignore_black_pixels, config.kmeans_threshold),
        }
    }

    /// 설정의 창 이름으로 대상을 한 번 찾아 파이프라인 생성
    pub fn from_window_name(
        config: &CaptureConfig,
        locator: &dyn WindowLocator,
        bounds: Arc<dyn BoundsProvider>,
        grabber: Arc<dyn ScreenGrabber>,
    ) -> Self {
        let target = locator.locate(&config.window_name);
        Self::new(config, target, bounds, grabber)
    }

    /// 캡처 대상
    pub fn target(&self) -> WindowTarget {
        self.target
    }

    /// 영역 계산 → 캡처 → 축소
    ///
    /// 캡처 버퍼 크기가 요청 사각형과 다르면 `CoreError::Capture`.
    pub fn capture(&self) -> Result<PixelBuffer, CoreError> {
        let rect = self.resolver.resolve(self.target);
        let raw = self.grabber.grab(&rect)?;

        if raw.size() != rect.size() {
            return Err(CoreError::Capture(format!(
                "캡처 크기 불일치: 요청 {}x{}, 수신 {}x{}",
                rect.width(),
                rect.height(),
                raw.width(),
                raw.height()
            )));
        }

        self.downscaler.downscale(raw)
    }

    /// 세 전략으로 버퍼를 축약
    pub fn reduce(&self, buffer: &PixelBuffer) -> CycleColors {
        let colors = CycleColors {
            center: self.center.reduce(buffer),
            average: self.average.reduce(buffer),
            dominant: self.dominant.reduce(buffer),
            captured_at: Utc::now(),
        };
        debug!(
            "색상: center={:?} average={:?} dominant={:?}",
            colors.center.to_array(),
            colors.average.to_array(),
            colors.dominant.to_array()
        );
        colors
    }

    /// 한 주기 실행 — 캡처 실패는 그대로 전파 (호출자가 다음 주기에 재시도)
    pub fn run_cycle(&self) -> Result<CycleColors, CoreError> {
        let buffer = self.capture()?;
        Ok(self.reduce(&buffer))
    }

    /// 전략 목록 (표시 순서: 중앙, 지배, 평균)
    pub fn reducers(&self) -> [&dyn ColorReducer; 3] {
        [&self.center, &self.dominant, &self.average]
    }
}

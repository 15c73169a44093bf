//! 스크린 캡처.
//!
//! xcap 기반 멀티모니터 캡처와 화면/창 경계 조회.
//! 요청 사각형과 겹치는 모니터만 캡처해서 한 버퍼로 합성한다.

use ambience_core::error::CoreError;
use ambience_core::models::buffer::{ChannelOrder, PixelBuffer, BYTES_PER_PIXEL};
use ambience_core::models::geometry::Rectangle;
use ambience_core::models::window::WindowHandle;
use ambience_core::ports::capture::{BoundsProvider, ScreenGrabber};
use image::RgbaImage;
use parking_lot::Mutex;
use tracing::{debug, warn};
use xcap::{Monitor, Window};

/// 모니터 조회 실패 시 보고할 기본 화면
const FALLBACK_SCREEN: Rectangle = Rectangle::at_origin(1920, 1080);

/// 모니터의 전역 좌표 사각형
fn monitor_rect(monitor: &Monitor) -> Option<Rectangle> {
    let x = monitor.x().ok()?;
    let y = monitor.y().ok()?;
    let width = monitor.width().ok()?;
    let height = monitor.height().ok()?;
    Rectangle::new(x, y, width, height).ok()
}

/// xcap 기반 경계 조회 — `BoundsProvider` 포트 구현
pub struct XcapBoundsProvider {
    /// 마지막으로 확인된 주 모니터 경계
    last_primary: Mutex<Rectangle>,
}

impl XcapBoundsProvider {
    /// 새 경계 조회기 생성
    pub fn new() -> Self {
        Self {
            last_primary: Mutex::new(FALLBACK_SCREEN),
        }
    }

    /// 모든 모니터 경계 (조회 실패 시 빈 목록)
    fn monitor_rects() -> Vec<(Rectangle, bool)> {
        match Monitor::all() {
            Ok(monitors) => monitors
                .iter()
                .filter_map(|m| Some((monitor_rect(m)?, m.is_primary().unwrap_or(false))))
                .collect(),
            Err(e) => {
                warn!("모니터 목록 조회 실패: {e}");
                Vec::new()
            }
        }
    }

    fn cached_primary(&self) -> Rectangle {
        let rect = *self.last_primary.lock();
        warn!(
            "모니터 경계를 얻을 수 없음 — 마지막 값 사용: {}x{}",
            rect.width(),
            rect.height()
        );
        rect
    }
}

impl Default for XcapBoundsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsProvider for XcapBoundsProvider {
    fn primary_screen(&self) -> Rectangle {
        let rects = Self::monitor_rects();
        let primary = rects
            .iter()
            .find(|(_, is_primary)| *is_primary)
            .or_else(|| rects.first())
            .map(|(rect, _)| *rect);

        match primary {
            Some(rect) => {
                *self.last_primary.lock() = rect;
                rect
            }
            None => self.cached_primary(),
        }
    }

    fn virtual_screen(&self) -> Rectangle {
        let rects: Vec<Rectangle> = Self::monitor_rects().into_iter().map(|(r, _)| r).collect();
        union_all(&rects).unwrap_or_else(|| self.cached_primary())
    }

    fn window_bounds(&self, handle: WindowHandle) -> Option<Rectangle> {
        let windows = Window::all()
            .map_err(|e| warn!("창 목록 조회 실패: {e}"))
            .ok()?;
        let window = windows
            .into_iter()
            .find(|w| w.id().map(|id| id == handle.0).unwrap_or(false))?;

        if window.is_minimized().unwrap_or(false) {
            debug!("창이 최소화됨 (핸들 {})", handle.0);
            return None;
        }

        Rectangle::new(
            window.x().ok()?,
            window.y().ok()?,
            window.width().ok()?,
            window.height().ok()?,
        )
        .ok()
    }
}

/// 모든 사각형을 덮는 최소 사각형
pub fn union_all(rects: &[Rectangle]) -> Option<Rectangle> {
    let (first, rest) = rects.split_first()?;
    Some(rest.iter().fold(*first, |acc, r| acc.union(r)))
}

/// xcap 기반 화면 캡처 — `ScreenGrabber` 포트 구현
pub struct XcapScreenGrabber;

impl XcapScreenGrabber {
    /// 새 캡처 인스턴스 생성
    pub fn new() -> Self {
        Self
    }
}

impl Default for XcapScreenGrabber {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenGrabber for XcapScreenGrabber {
    fn grab(&self, rect: &Rectangle) -> Result<PixelBuffer, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        let mut tiles = Vec::new();
        for monitor in &monitors {
            let Some(bounds) = monitor_rect(monitor) else {
                continue;
            };
            if bounds.intersection(rect).is_none() {
                continue;
            }
            let image = monitor
                .capture_image()
                .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;
            tiles.push((bounds, image));
        }

        if tiles.is_empty() {
            return Err(CoreError::Capture(format!(
                "캡처 영역과 겹치는 모니터 없음: {}x {}y {}w {}h",
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height()
            )));
        }

        debug!(
            "스크린 캡처 완료: {}x{} (모니터 {}개)",
            rect.width(),
            rect.height(),
            tiles.len()
        );

        composite(rect, &tiles)
    }
}

/// 모니터 이미지들을 요청 사각형 크기의 RGB 버퍼로 합성
///
/// 어떤 모니터도 덮지 않는 영역은 검은색으로 남는다.
/// 모니터 경계는 논리 좌표이고 캡처 이미지는 물리 픽셀이므로 (HiDPI 배율),
/// 각 출력 픽셀은 이미지/경계 비율로 환산한 위치의 최근접 픽셀을 가져온다.
pub fn composite(
    rect: &Rectangle,
    tiles: &[(Rectangle, RgbaImage)],
) -> Result<PixelBuffer, CoreError> {
    let width = rect.width() as usize;
    let height = rect.height() as usize;
    let stride = width * BYTES_PER_PIXEL;
    let mut data = vec![0u8; stride * height];

    for (bounds, image) in tiles {
        let Some(overlap) = bounds.intersection(rect) else {
            continue;
        };
        if image.width() == 0 || image.height() == 0 {
            continue;
        }

        let scale_x = image.width() as f64 / bounds.width() as f64;
        let scale_y = image.height() as f64 / bounds.height() as f64;

        // 모니터 내부 논리 좌표
        let local_left = (overlap.left() as i64 - bounds.left() as i64) as u32;
        let local_top = (overlap.top() as i64 - bounds.top() as i64) as u32;

        let dst_left = (overlap.left() as i64 - rect.left() as i64) as usize;
        let dst_top = (overlap.top() as i64 - rect.top() as i64) as usize;
        let cols = overlap.width() as usize;

        let src_cols: Vec<usize> = (0..overlap.width())
            .map(|col| source_index(local_left + col, scale_x, image.width()))
            .collect();

        let src = image.as_raw();
        let src_stride = image.width() as usize * 4;

        for row in 0..overlap.height() {
            let src_y = source_index(local_top + row, scale_y, image.height());
            let src_row = &src[src_y * src_stride..(src_y + 1) * src_stride];

            let dst_start = (dst_top + row as usize) * stride + dst_left * BYTES_PER_PIXEL;
            let dst_row = &mut data[dst_start..dst_start + cols * BYTES_PER_PIXEL];
            for (dst_px, &src_x) in dst_row.chunks_exact_mut(BYTES_PER_PIXEL).zip(&src_cols) {
                let offset = src_x * 4;
                dst_px.copy_from_slice(&src_row[offset..offset + BYTES_PER_PIXEL]);
            }
        }
    }

    PixelBuffer::packed(rect.width(), rect.height(), ChannelOrder::Rgb, data)
}

/// 논리 좌표 → 이미지 픽셀 인덱스 (픽셀 중심 기준 최근접, 이미지 범위로 고정)
fn source_index(logical: u32, scale: f64, len: u32) -> usize {
    let index = ((logical as f64 + 0.5) * scale).floor() as u32;
    index.min(len - 1) as usize
}

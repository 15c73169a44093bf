//! 캡처 영역 계산.
//!
//! 창 식별자(또는 전체 화면) + 크롭 비율 → 절대 좌표 캡처 사각형.
//! 창을 찾지 못하면 화면 경계로 폴백한다 (에러 아님).

use std::sync::Arc;

use ambience_core::config::{min_max, CROP_PERCENTAGE_RANGE};
use ambience_core::models::geometry::Rectangle;
use ambience_core::models::window::WindowTarget;
use ambience_core::ports::capture::BoundsProvider;
use tracing::{debug, warn};

/// 캡처 영역 계산기
pub struct RegionResolver {
    bounds: Arc<dyn BoundsProvider>,
    use_virtual_screen: bool,
    crop_percentage: f32,
}

impl RegionResolver {
    /// 새 영역 계산기 생성 — 크롭 비율은 다시 한 번 허용 범위로 고정
    pub fn new(
        bounds: Arc<dyn BoundsProvider>,
        use_virtual_screen: bool,
        crop_percentage: f32,
    ) -> Self {
        Self {
            bounds,
            use_virtual_screen,
            crop_percentage: clamp_crop(crop_percentage),
        }
    }

    pub fn crop_percentage(&self) -> f32 {
        self.crop_percentage
    }

    /// 대상의 현재 경계를 구해 중앙 크롭한 캡처 사각형 반환
    pub fn resolve(&self, target: WindowTarget) -> Rectangle {
        let base = match target {
            WindowTarget::Desktop => self.screen_bounds(),
            WindowTarget::Window(handle) => match self.bounds.window_bounds(handle) {
                Some(bounds) => bounds,
                None => {
                    warn!("창 경계 조회 실패 (핸들 {}), 화면으로 폴백", handle.0);
                    self.screen_bounds()
                }
            },
        };

        let rect = crop_centered(base, self.crop_percentage);
        debug!(
            "캡처 영역: {}x {}y {}w {}h",
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height()
        );
        rect
    }

    /// 설정에 따른 전체 화면 경계 (주 모니터 또는 가상 화면)
    fn screen_bounds(&self) -> Rectangle {
        if self.use_virtual_screen {
            self.bounds.virtual_screen()
        } else {
            self.bounds.primary_screen()
        }
    }
}

/// 기준 사각형 중앙에 `percentage` 비율만큼의 사각형을 잘라낸다
///
/// 잘린 여백 `off = floor(dim - dim * p)`를 양쪽에 반씩(내림) 나눈다.
/// 결과는 항상 `base` 안에 완전히 포함되며 크기는 최소 1.
pub fn crop_centered(base: Rectangle, percentage: f32) -> Rectangle {
    let p = clamp_crop(percentage);

    let w_off = cropped_margin(base.width(), p);
    let h_off = cropped_margin(base.height(), p);

    let left = base.left() as i64 + (w_off / 2) as i64;
    let top = base.top() as i64 + (h_off / 2) as i64;

    Rectangle::new(
        left as i32,
        top as i32,
        base.width() - w_off,
        base.height() - h_off,
    )
    .unwrap_or(base)
}

/// 한 축에서 잘려 나가는 픽셀 수 (축 길이보다 항상 작음)
///
/// 비율과 같은 f32 정밀도로 계산한다. f64로 넓히면 0.3 같은 비율의 표현 오차가
/// 그대로 남아 `floor`가 한 픽셀 어긋난다.
fn cropped_margin(dimension: u32, p: f32) -> u32 {
    let dim = dimension as f32;
    let margin = (dim - dim * p).floor().max(0.0) as u32;
    margin.min(dimension.saturating_sub(1))
}

fn clamp_crop(percentage: f32) -> f32 {
    if percentage.is_nan() {
        return CROP_PERCENTAGE_RANGE.0;
    }
    min_max(percentage, CROP_PERCENTAGE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambience_core::models::window::WindowHandle;

    struct FakeBounds {
        window: Option<Rectangle>,
    }

    impl BoundsProvider for FakeBounds {
        fn primary_screen(&self) -> Rectangle {
            Rectangle::new(0, 0, 1920, 1080).unwrap()
        }

        fn virtual_screen(&self) -> Rectangle {
            Rectangle::new(-1280, 0, 3200, 1080).unwrap()
        }

        fn window_bounds(&self, _handle: WindowHandle) -> Option<Rectangle> {
            self.window
        }
    }

    fn resolver(window: Option<Rectangle>, virt: bool, p: f32) -> RegionResolver {
        RegionResolver::new(Arc::new(FakeBounds { window }), virt, p)
    }

    #[test]
    fn desktop_full_crop_is_primary_screen() {
        let rect = resolver(None, false, 1.0).resolve(WindowTarget::Desktop);
        assert_eq!(rect, Rectangle::new(0, 0, 1920, 1080).unwrap());
    }

    #[test]
    fn desktop_uses_virtual_screen_when_configured() {
        let rect = resolver(None, true, 1.0).resolve(WindowTarget::Desktop);
        assert_eq!(rect.left(), -1280);
        assert_eq!(rect.width(), 3200);
    }

    #[test]
    fn half_crop_is_centered() {
        let rect = resolver(None, false, 0.5).resolve(WindowTarget::Desktop);
        assert_eq!(rect, Rectangle::new(480, 270, 960, 540).unwrap());
    }

    #[test]
    fn window_bounds_are_cropped() {
        let window = Rectangle::new(100, 200, 800, 600).unwrap();
        let rect = resolver(Some(window), false, 0.5).resolve(WindowTarget::Window(WindowHandle(7)));
        assert_eq!(rect, Rectangle::new(300, 350, 400, 300).unwrap());
    }

    #[test]
    fn closed_window_falls_back_to_screen() {
        let rect = resolver(None, false, 1.0).resolve(WindowTarget::Window(WindowHandle(7)));
        assert_eq!(rect, Rectangle::new(0, 0, 1920, 1080).unwrap());
    }

    #[test]
    fn crop_percentage_is_clamped_defensively() {
        assert_eq!(resolver(None, false, 0.0).crop_percentage(), 0.05);
        assert_eq!(resolver(None, false, 3.0).crop_percentage(), 1.0);
    }

    #[test]
    fn common_percentages_crop_exactly() {
        let screen = Rectangle::new(0, 0, 1920, 1080).unwrap();
        assert_eq!(
            crop_centered(screen, 0.3),
            Rectangle::new(672, 378, 576, 324).unwrap()
        );
        assert_eq!(
            crop_centered(screen, 0.7),
            Rectangle::new(288, 162, 1344, 756).unwrap()
        );

        let small = Rectangle::new(0, 0, 10, 10).unwrap();
        assert_eq!(crop_centered(small, 0.1), Rectangle::new(4, 4, 1, 1).unwrap());
    }

    #[test]
    fn prompt_percentages_match_scaled_size() {
        // 대화형 설정은 정수 %를 100으로 나눠 저장한다
        let screen = Rectangle::new(0, 0, 1920, 1080).unwrap();
        for percent in [10u32, 20, 25, 30, 40, 50, 60, 75, 80, 90] {
            let rect = crop_centered(screen, percent as f32 / 100.0);
            assert_eq!(rect.width(), 1920 * percent / 100, "{percent}%");
            assert_eq!(rect.height(), 1080 * percent / 100, "{percent}%");
        }
    }

    #[test]
    fn cropped_rectangle_always_contained() {
        let bases = [
            Rectangle::new(0, 0, 1, 1).unwrap(),
            Rectangle::new(-5, 7, 3, 11).unwrap(),
            Rectangle::new(13, -40, 1921, 1079).unwrap(),
            Rectangle::new(0, 0, 7, 2).unwrap(),
        ];
        let percentages = [0.05_f32, 0.1, 0.33, 0.5, 0.77, 0.999, 1.0];

        for base in bases {
            for p in percentages {
                let rect = crop_centered(base, p);
                assert!(base.contains(&rect), "{base:?} p={p} → {rect:?}");

                // 크기는 base * p에서 정수 반올림 오차 이내
                let expected_w = base.width() as f32 * p;
                let expected_h = base.height() as f32 * p;
                assert!((rect.width() as f32 - expected_w).abs() <= 1.0 || rect.width() == 1);
                assert!((rect.height() as f32 - expected_h).abs() <= 1.0 || rect.height() == 1);

                // 중앙 정렬: 양쪽 여백 차이는 최대 1픽셀
                let left_gap = rect.left() as i64 - base.left() as i64;
                let right_gap = base.right() - rect.right();
                assert!((right_gap - left_gap).abs() <= 1);
            }
        }
    }
}

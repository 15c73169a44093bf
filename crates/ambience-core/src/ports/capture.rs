//! 화면 캡처/경계 조회 포트.
//!
//! 구현: `ambience-vision::capture` (xcap)

use crate::error::CoreError;
use crate::models::buffer::PixelBuffer;
use crate::models::geometry::Rectangle;
use crate::models::window::WindowHandle;

/// 사각형 영역의 원시 픽셀을 가져온다
pub trait ScreenGrabber: Send + Sync {
    /// 반환 버퍼의 너비/높이는 요청 사각형과 같아야 한다.
    ///
    /// OS 캡처 실패는 `CoreError::Capture`로 반환한다.
    fn grab(&self, rect: &Rectangle) -> Result<PixelBuffer, CoreError>;
}

/// 화면/창 경계 조회
pub trait BoundsProvider: Send + Sync {
    /// 주 모니터 경계
    fn primary_screen(&self) -> Rectangle;

    /// 모든 모니터를 덮는 가상 화면 경계
    fn virtual_screen(&self) -> Rectangle;

    /// 창 경계 (창이 닫혔거나 경계를 얻을 수 없으면 `None`)
    fn window_bounds(&self, handle: WindowHandle) -> Option<Rectangle>;
}

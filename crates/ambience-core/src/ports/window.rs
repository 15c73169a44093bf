//! 창 검색 포트.
//!
//! 구현: `ambience-vision::locator` (xcap 창 열거)

use crate::models::window::WindowTarget;

/// 창 이름 조각으로 캡처 대상을 찾는다
pub trait WindowLocator: Send + Sync {
    /// 제목이 조각으로 시작하는 창 → 제목에 조각을 포함하는 창 → 전체 화면
    /// 순으로 결정한다 (대소문자 무시). 일치하는 창이 없어도 에러가 아니다.
    fn locate(&self, name_fragment: &str) -> WindowTarget;
}

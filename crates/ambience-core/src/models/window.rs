//! 캡처 대상 창 식별자.

use serde::{Deserialize, Serialize};

/// OS 창 핸들 (불투명 식별자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u32);

/// 캡처 대상 — 특정 창 또는 전체 화면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowTarget {
    /// 전체 화면 (주 모니터 또는 가상 화면, 설정에 따름)
    #[default]
    Desktop,
    /// 특정 창
    Window(WindowHandle),
}

impl WindowTarget {
    pub fn handle(&self) -> Option<WindowHandle> {
        match self {
            Self::Desktop => None,
            Self::Window(handle) => Some(*handle),
        }
    }
}

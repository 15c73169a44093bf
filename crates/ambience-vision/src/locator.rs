//! 창 이름으로 캡처 대상 찾기.
//!
//! `WindowLocator` 포트 구현 — xcap 창 열거.

use ambience_core::models::window::{WindowHandle, WindowTarget};
use ambience_core::ports::window::WindowLocator;
use tracing::{info, warn};
use xcap::Window;

/// xcap 기반 창 검색기 — `WindowLocator` 포트 구현
pub struct XcapWindowLocator;

impl XcapWindowLocator {
    /// 새 검색기 생성
    pub fn new() -> Self {
        Self
    }

    /// 제목이 있는 창 목록 (핸들, 제목)
    fn titled_windows() -> Vec<(WindowHandle, String)> {
        let windows = match Window::all() {
            Ok(windows) => windows,
            Err(e) => {
                warn!("창 목록 조회 실패: {e}");
                return Vec::new();
            }
        };

        windows
            .iter()
            .filter_map(|w| {
                let id = w.id().ok()?;
                let title = w.title().ok()?;
                Some((WindowHandle(id), title))
            })
            .collect()
    }
}

impl Default for XcapWindowLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowLocator for XcapWindowLocator {
    fn locate(&self, name_fragment: &str) -> WindowTarget {
        if name_fragment.trim().is_empty() {
            info!("전체 화면 관찰");
            return WindowTarget::Desktop;
        }

        let windows = Self::titled_windows();
        let target = match_window(&windows, name_fragment);

        match target {
            WindowTarget::Window(handle) => {
                let title = windows
                    .iter()
                    .find(|(h, _)| *h == handle)
                    .map(|(_, t)| t.as_str())
                    .unwrap_or_default();
                info!("창 관찰: \"{}\"", title);
            }
            WindowTarget::Desktop => {
                info!("\"{}\"와 일치하는 창 없음 — 전체 화면 관찰", name_fragment.trim());
            }
        }
        target
    }
}

/// 창 제목 매칭 정책
///
/// 1. 제목이 조각으로 시작하는 첫 창 (대소문자 무시)
/// 2. 없으면 제목에 조각이 포함된 첫 창
/// 3. 그래도 없으면 전체 화면
///
/// 제목이 비어 있는 창과 빈 조각은 무시한다.
pub fn match_window(windows: &[(WindowHandle, String)], fragment: &str) -> WindowTarget {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return WindowTarget::Desktop;
    }

    let titled: Vec<(WindowHandle, String)> = windows
        .iter()
        .filter(|(_, title)| !title.trim().is_empty())
        .map(|(handle, title)| (*handle, title.to_lowercase()))
        .collect();

    titled
        .iter()
        .find(|(_, title)| title.starts_with(&needle))
        .or_else(|| titled.iter().find(|(_, title)| title.contains(&needle)))
        .map(|(handle, _)| WindowTarget::Window(*handle))
        .unwrap_or(WindowTarget::Desktop)
}

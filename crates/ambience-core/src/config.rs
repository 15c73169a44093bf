//! 애플리케이션 설정 구조체.
//!
//! 캡처 대상, 크롭 비율, 캡처 주기, 축소 해상도, k-means 임계값, 로그 레벨 등
//! 런타임 설정을 정의한다. 파일/CLI에서 읽은 값은 코어에 전달되기 전에
//! 항상 [`CaptureConfig::clamped`]로 허용 범위에 맞춘다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::geometry::Size;

/// 크롭 비율 허용 범위
pub const CROP_PERCENTAGE_RANGE: (f32, f32) = (0.05, 1.0);
/// 캡처 주기 허용 범위 (밀리초)
pub const CAPTURE_INTERVAL_RANGE_MS: (u64, u64) = (500, 60_000);
/// 축소 목표 너비 허용 범위
pub const RESOLUTION_WIDTH_RANGE: (u32, u32) = (128, 1024);
/// 축소 목표 높이 허용 범위
pub const RESOLUTION_HEIGHT_RANGE: (u32, u32) = (72, 576);
/// k-means 수렴 임계값 허용 범위
pub const KMEANS_THRESHOLD_RANGE: (f32, f32) = (0.0, 20.0);

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 캡처할 창 이름 조각 (비어 있으면 전체 화면)
    #[serde(default)]
    pub window_name: String,
    /// 캡처 영역 비율 (0.05 ~ 1.0, 중앙 기준)
    #[serde(default = "default_crop_percentage")]
    pub crop_percentage: f32,
    /// 캡처 주기 (밀리초, 500 ~ 60000)
    #[serde(default = "default_capture_interval_ms")]
    pub capture_interval_ms: u64,
    /// 전체 화면 캡처 시 가상 화면(모든 모니터) 사용 여부
    #[serde(default)]
    pub use_virtual_screen: bool,
    /// 완전한 검은 픽셀을 계산에서 제외
    #[serde(default = "default_true")]
    pub ignore_black_pixels: bool,
    /// 축소 목표 너비 (128 ~ 1024)
    #[serde(default = "default_resolution_width")]
    pub resolution_width: u32,
    /// 축소 목표 높이 (72 ~ 576)
    #[serde(default = "default_resolution_height")]
    pub resolution_height: u32,
    /// k-means 수렴 임계값 (0 ~ 20)
    #[serde(default = "default_kmeans_threshold")]
    pub kmeans_threshold: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            window_name: String::new(),
            crop_percentage: default_crop_percentage(),
            capture_interval_ms: default_capture_interval_ms(),
            use_virtual_screen: false,
            ignore_black_pixels: true,
            resolution_width: default_resolution_width(),
            resolution_height: default_resolution_height(),
            kmeans_threshold: default_kmeans_threshold(),
        }
    }
}

impl CaptureConfig {
    /// 모든 수치 필드를 허용 범위로 고정한 복사본
    pub fn clamped(&self) -> Self {
        Self {
            window_name: self.window_name.trim().to_string(),
            crop_percentage: clamp_f32(self.crop_percentage, CROP_PERCENTAGE_RANGE),
            capture_interval_ms: min_max(self.capture_interval_ms, CAPTURE_INTERVAL_RANGE_MS),
            use_virtual_screen: self.use_virtual_screen,
            ignore_black_pixels: self.ignore_black_pixels,
            resolution_width: min_max(self.resolution_width, RESOLUTION_WIDTH_RANGE),
            resolution_height: min_max(self.resolution_height, RESOLUTION_HEIGHT_RANGE),
            kmeans_threshold: clamp_f32(self.kmeans_threshold, KMEANS_THRESHOLD_RANGE),
        }
    }

    /// 캡처 주기를 Duration으로 반환
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }

    /// 축소 목표 해상도
    pub fn target_resolution(&self) -> Size {
        Size::new(self.resolution_width, self.resolution_height)
    }
}

// ============================================================
// 로그 설정
// ============================================================

/// 로그 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            capture: CaptureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 캡처 설정을 허용 범위로 고정한 복사본
    pub fn clamped(&self) -> Self {
        Self {
            capture: self.capture.clamped(),
            logging: self.logging.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// 최솟값/최댓값 고정 — 범위가 뒤집혀 있으면 최솟값 우선
pub fn min_max<T: PartialOrd>(value: T, (min, max): (T, T)) -> T {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

/// NaN은 최솟값으로 취급
fn clamp_f32(value: f32, range: (f32, f32)) -> f32 {
    if value.is_nan() {
        return range.0;
    }
    min_max(value, range)
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_crop_percentage() -> f32 {
    1.0
}
fn default_capture_interval_ms() -> u64 {
    1_000
}
fn default_resolution_width() -> u32 {
    512
}
fn default_resolution_height() -> u32 {
    288
}
fn default_kmeans_threshold() -> f32 {
    5.0
}
fn default_log_level() -> String {
    "info".to_string()
}

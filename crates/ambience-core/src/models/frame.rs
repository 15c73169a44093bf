//! 캡처 주기 결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::color::RgbColor;

/// 한 캡처 주기의 결과 — 전략별 대표 색상
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleColors {
    /// 중앙 픽셀 색상
    pub center: RgbColor,
    /// 평균 색상
    pub average: RgbColor,
    /// k-means 지배 색상
    pub dominant: RgbColor,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}

//! ColorAmbience 핵심 에러 타입.
//!
//! 모든 crate가 이 타입을 그대로 전파한다. 예상 가능한 분기(창 미발견,
//! 검은 픽셀 제외, 빈 샘플)는 에러가 아니라 정의된 폴백으로 처리한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 화면 캡처 실패 (일시적 — 다음 주기에 재시도)
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 픽셀 버퍼 레이아웃 불일치 (stride, 길이)
    #[error("버퍼 레이아웃 에러: {0}")]
    BufferLayout(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// `Validation` 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 다음 주기에 재시도하면 되는 일시적 에러인지 여부
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Capture(_))
    }
}

//! ColorAmbience 도메인 모델.
//!
//! 캡처 → 축소 → 추출 → 색상 축약 파이프라인이 주고받는 데이터 구조체를 정의한다.

pub mod buffer;
pub mod color;
pub mod frame;
pub mod geometry;
pub mod window;

//! 포트 인터페이스 (trait).
//!
//! 캡처 파이프라인이 의존하는 외부 협력자 경계.
//! `ambience-vision`이 xcap 기반 구현을 제공하며,
//! `ambience-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 한 주기는 짧고 유한한 동기 호출이므로 모든 포트는 동기 trait이다.

pub mod capture;
pub mod window;

//! # ambience-vision
//!
//! 캡처-색상 파이프라인 크레이트.
//! 영역 계산 → 화면 캡처 → 축소 → 픽셀 추출 → 색상 축약(중앙/평균/k-means)
//! 순으로 한 주기를 처리하고, xcap 기반 포트 구현을 제공한다.

pub mod capture;
pub mod downscale;
pub mod extract;
pub mod kmeans;
pub mod locator;
pub mod pipeline;
pub mod reducer;
pub mod region;

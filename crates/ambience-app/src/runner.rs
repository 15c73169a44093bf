//! 캡처 폴링 루프.
//!
//! 한 주기 실행 → 결과 출력 → 주기 간격 또는 종료 신호 대기를 반복한다.
//! 실패한 주기는 경고만 남기고 다음 간격에 다시 시도한다.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use ambience_core::error::CoreError;
use ambience_core::models::frame::CycleColors;
use ambience_vision::pipeline::CapturePipeline;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::presenter::ConsolePresenter;

/// 루프 실행 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub succeeded: u64,
    pub failed: u64,
}

/// 폴링 루프
pub struct PollLoop {
    pipeline: Arc<CapturePipeline>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(pipeline: Arc<CapturePipeline>, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    /// 한 주기 실행 — 캡처와 군집화는 블로킹 스레드에서
    pub async fn run_once(&self) -> Result<CycleColors, CoreError> {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.run_cycle())
            .await
            .map_err(|e| CoreError::Internal(format!("캡처 작업 실패: {e}")))?
    }

    /// 종료 신호가 올 때까지 반복
    pub async fn run<W: Write>(
        &self,
        presenter: &mut ConsolePresenter<W>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> CycleStats {
        info!("폴링 루프 시작: 간격 {}ms", self.interval.as_millis());
        let mut stats = CycleStats::default();

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            match self.run_once().await {
                Ok(colors) => {
                    stats.succeeded += 1;
                    debug!("주기 완료: {}", colors.captured_at);
                    if let Err(e) = presenter.present(&colors) {
                        warn!("색상 출력 실패: {e}");
                    }
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!("캡처 주기 실패 (다음 주기에 재시도): {e}");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown_rx.changed() => {
                    break;
                }
            }
        }

        info!(
            "폴링 루프 종료: 성공 {}회, 실패 {}회",
            stats.succeeded, stats.failed
        );
        stats
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ambience_core::config::CaptureConfig;
    use ambience_core::models::buffer::PixelBuffer;
    use ambience_core::models::color::RgbColor;
    use ambience_core::models::geometry::Rectangle;
    use ambience_core::models::window::{WindowHandle, WindowTarget};
    use ambience_core::ports::capture::{BoundsProvider, ScreenGrabber};
    use parking_lot::Mutex;

    struct SmallScreen;

    impl BoundsProvider for SmallScreen {
        fn primary_screen(&self) -> Rectangle {
            Rectangle::new(0, 0, 8, 8).unwrap()
        }
        fn virtual_screen(&self) -> Rectangle {
            self.primary_screen()
        }
        fn window_bounds(&self, _handle: WindowHandle) -> Option<Rectangle> {
            None
        }
    }

    /// 정해진 횟수만큼 실패한 뒤 단색을 돌려주는 캡처기
    struct FlakyGrabber {
        failures_left: Mutex<u32>,
    }

    impl ScreenGrabber for FlakyGrabber {
        fn grab(&self, rect: &Rectangle) -> Result<PixelBuffer, CoreError> {
            let mut left = self.failures_left.lock();
            if *left > 0 {
                *left -= 1;
                return Err(CoreError::Capture("일시적 실패".to_string()));
            }
            Ok(PixelBuffer::filled(
                rect.width(),
                rect.height(),
                RgbColor::new(0, 128, 255),
            ))
        }
    }

    /// `failures`회 실패 후 (0, 128, 255) 단색을 내는 10ms 간격 루프
    pub(crate) fn flaky_poll_loop(failures: u32) -> PollLoop {
        let pipeline = CapturePipeline::new(
            &CaptureConfig::default(),
            WindowTarget::Desktop,
            Arc::new(SmallScreen),
            Arc::new(FlakyGrabber {
                failures_left: Mutex::new(failures),
            }),
        );
        PollLoop::new(Arc::new(pipeline), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn single_cycle_returns_colors() {
        let colors = flaky_poll_loop(0).run_once().await.unwrap();
        assert_eq!(colors.average, RgbColor::new(0, 128, 255));
    }

    #[tokio::test]
    async fn already_signalled_shutdown_runs_nothing() {
        let (_tx, rx) = watch::channel(true);

        let mut presenter = ConsolePresenter::new(Vec::new());
        let stats = flaky_poll_loop(0).run(&mut presenter, rx).await;

        assert_eq!(stats, CycleStats::default());
        assert!(presenter.into_inner().is_empty());
    }

    #[tokio::test]
    async fn failed_cycles_are_retried_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let _ = tx.send(true);
        });

        let mut presenter = ConsolePresenter::new(Vec::new());
        let stats = flaky_poll_loop(2).run(&mut presenter, rx).await;

        assert_eq!(stats.failed, 2);
        assert!(stats.succeeded >= 1);

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("CCol"));
        assert!(text.contains("  0 128 255 "));
    }
}

//! 실행 세션.
//!
//! 폴링 루프를 별도 태스크로 띄우고, 종료 조건이 완료되면 watch 채널로
//! 루프를 멈춘 뒤 통계를 회수한다. 종료 조건은 보통 [`os_signal`]이고,
//! 테스트에서는 타이머 같은 임의의 future를 쓴다.

use std::future::Future;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;

use crate::presenter::ConsolePresenter;
use crate::runner::{CycleStats, PollLoop};

/// 폴링 루프 한 번의 실행 단위
pub struct Session<W: Write> {
    poll: PollLoop,
    presenter: ConsolePresenter<W>,
}

impl<W: Write + Send + 'static> Session<W> {
    pub fn new(poll: PollLoop, presenter: ConsolePresenter<W>) -> Self {
        Self { poll, presenter }
    }

    /// `stop`이 끝날 때까지 루프 실행
    ///
    /// `stop`이 에러로 끝나도 루프는 멈추고 회수된 뒤 에러가 반환된다.
    pub async fn run_until<S>(self, stop: S) -> Result<CycleStats>
    where
        S: Future<Output = io::Result<()>>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let Self {
            poll,
            mut presenter,
        } = self;

        let handle = tokio::spawn(async move { poll.run(&mut presenter, shutdown_rx).await });

        let stopped = stop.await;
        info!("종료 신호 발송");
        let _ = shutdown_tx.send(true);

        let stats = handle.await.context("폴링 루프 비정상 종료")?;
        stopped.context("종료 시그널 대기 실패")?;
        Ok(stats)
    }
}

/// OS 종료 시그널 대기 (unix: SIGINT/SIGTERM, 그 외: Ctrl+C)
pub async fn os_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}

//! # ambience-app
//!
//! ColorAmbience 바이너리 진입점.
//! 설정 로드/대화형 설정, 포트 구현 조립, 폴링 루프와 라이프사이클 관리.

mod presenter;
mod prompt;
mod runner;
mod session;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use ambience_core::config::{AppConfig, CaptureConfig};
use ambience_core::config_manager::ConfigManager;
use ambience_vision::capture::{XcapBoundsProvider, XcapScreenGrabber};
use ambience_vision::locator::XcapWindowLocator;
use ambience_vision::pipeline::CapturePipeline;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::presenter::ConsolePresenter;
use crate::prompt::Prompter;
use crate::runner::PollLoop;
use crate::session::Session;

/// ColorAmbience — 화면 색상 추출기
///
/// 주기적으로 화면(또는 창)을 캡처해 중앙/지배/평균 색상을 출력한다.
#[derive(Parser, Debug)]
#[command(name = "ambience")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 캡처할 창 이름 조각 (설정값 덮어쓰기, 빈 문자열이면 전체 화면)
    #[arg(long, short = 'w')]
    window: Option<String>,

    /// 캡처 비율 (%, 5 ~ 100)
    #[arg(long)]
    crop: Option<f32>,

    /// 캡처 주기 (밀리초, 500 ~ 60000)
    #[arg(long)]
    interval: Option<u64>,

    /// 창을 찾지 못했을 때 가상 화면(모든 모니터) 사용
    #[arg(long)]
    virtual_screen: bool,

    /// 한 주기만 실행하고 종료
    #[arg(long)]
    once: bool,

    /// 대화형 설정 후 저장
    #[arg(long)]
    configure: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l')]
    log_level: Option<String>,
}

/// CLI 인자로 캡처 설정 덮어쓰기 (결과는 범위 고정)
fn apply_overrides(config: &CaptureConfig, args: &Args) -> CaptureConfig {
    let mut config = config.clone();
    if let Some(window) = &args.window {
        config.window_name = window.clone();
    }
    if let Some(percent) = args.crop {
        config.crop_percentage = percent / 100.0;
    }
    if let Some(interval) = args.interval {
        config.capture_interval_ms = interval;
    }
    if args.virtual_screen {
        config.use_virtual_screen = true;
    }
    config.clamped()
}

/// 워크스페이스 크레이트 전체에 같은 레벨을 적용하는 필터 문자열
fn log_filter(level: &str) -> String {
    format!("ambience={level},ambience_app={level},ambience_core={level},ambience_vision={level}")
}

fn load_config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    manager.context("설정 로드 실패")
}

/// 대화형 설정 실행 후 저장
fn run_configure(manager: &ConfigManager) -> Result<AppConfig> {
    let current = manager.get().capture;
    let stdin = std::io::stdin();
    let captured = Prompter::new(stdin.lock(), std::io::stdout())
        .configure(&current)
        .context("대화형 설정 실패")?;

    let updated = manager.update_with(|config| config.capture = captured)?;
    info!("설정 저장: {}", manager.config_path().display());
    Ok(updated)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let manager = load_config_manager(args.config.clone())?;
    let mut config = manager.get();

    // 파일 기본값 < CLI
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(&level))),
        )
        .init();

    info!("ColorAmbience v{} 시작", env!("CARGO_PKG_VERSION"));
    info!("설정 파일: {}", manager.config_path().display());

    // 첫 실행은 터미널일 때만 질문 (파이프 입력이면 기본값 유지)
    if args.configure || (manager.is_first_run() && std::io::stdin().is_terminal()) {
        config = run_configure(&manager)?;
    }

    let capture = apply_overrides(&config.capture, &args);

    let pipeline = Arc::new(CapturePipeline::from_window_name(
        &capture,
        &XcapWindowLocator::new(),
        Arc::new(XcapBoundsProvider::new()),
        Arc::new(XcapScreenGrabber::new()),
    ));
    let poll = PollLoop::new(pipeline, capture.capture_interval());

    if args.once {
        let colors = poll.run_once().await.context("캡처 실패")?;
        ConsolePresenter::stdout().present(&colors)?;
        return Ok(());
    }

    let stats = Session::new(poll, ConsolePresenter::stdout())
        .run_until(session::os_signal())
        .await?;

    info!(
        "ColorAmbience 종료 (성공 {}회, 실패 {}회)",
        stats.succeeded, stats.failed
    );
    Ok(())
}

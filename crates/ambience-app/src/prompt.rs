//! 대화형 설정.
//!
//! 첫 실행(또는 `--configure`) 시 캡처 설정을 콘솔에서 묻는다.
//! 숫자 질문은 해석할 수 있는 답이 올 때까지 다시 묻고, 범위 고정은 저장 시 적용된다.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use ambience_core::config::CaptureConfig;

/// 콘솔 질문기
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 문자열 질문 — 입력이 끝나면 `UnexpectedEof`
    fn ask_string(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}\n > ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "설정 입력이 중단됨",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// 숫자 질문 — 해석 가능할 때까지 반복
    fn ask_number<T: FromStr>(&mut self, question: &str) -> io::Result<T> {
        loop {
            let answer = self.ask_string(question)?;
            if let Ok(value) = answer.trim().parse() {
                return Ok(value);
            }
        }
    }

    /// 비어 있지 않은 답이면 true
    fn ask_flag(&mut self, question: &str) -> io::Result<bool> {
        Ok(!self.ask_string(question)?.trim().is_empty())
    }

    /// 캡처 설정 질문 — 묻지 않는 항목(해상도, 임계값)은 `base` 값 유지
    pub fn configure(&mut self, base: &CaptureConfig) -> io::Result<CaptureConfig> {
        let window_name =
            self.ask_string("What is the name of the window? (Leave blank for whole screen)")?;
        let percent: f32 =
            self.ask_number("How much % of the region should be captured? (5 - 100 %)")?;
        let interval: u64 =
            self.ask_number("How often do you want captures to happen? (500 - 60000 ms)")?;
        let use_virtual_screen = self.ask_flag(
            "Use virtual screen (all screens) as fallback instead of primary? (Blank for no)",
        )?;
        let ignore_black_pixels =
            !self.ask_flag("Ignore black pixels in processing? (Blank for yes)")?;

        Ok(CaptureConfig {
            window_name,
            crop_percentage: percent / 100.0,
            capture_interval_ms: interval,
            use_virtual_screen,
            ignore_black_pixels,
            ..base.clone()
        }
        .clamped())
    }
}

//! 콘솔 색상 표시.
//!
//! 주기마다 전략별로 한 줄씩, 트루컬러 ANSI 견본과 채널 값을 출력한다.

use std::io::{self, Stdout, Write};

use ambience_core::models::color::RgbColor;
use ambience_core::models::frame::CycleColors;

/// 견본 한 줄 포맷
///
/// `CCol : ░▒▓███ 255   0   0 ███▓▒░` 형태로, 견본 부분만 해당 색으로 칠하고
/// 끝에서 전경/배경 색을 기본값으로 되돌린다.
pub fn format_swatch(label: &str, color: RgbColor) -> String {
    let RgbColor { r, g, b } = color;
    format!(
        "{label:<5}: \x1b[38;2;{r};{g};{b}m\u{2591}\u{2592}\u{2593}\u{2588}\u{2588}\u{2588} {r:>3} {g:>3} {b:>3} \u{2588}\u{2588}\u{2588}\u{2593}\u{2592}\u{2591}\x1b[39;49m"
    )
}

/// 콘솔 출력기
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl ConsolePresenter<Stdout> {
    /// 표준 출력 기반 출력기
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// 한 주기 결과 출력 (중앙 → 지배 → 평균 순)
    pub fn present(&mut self, colors: &CycleColors) -> io::Result<()> {
        for (label, color) in [
            ("CCol", colors.center),
            ("DCol", colors.dominant),
            ("ACol", colors.average),
        ] {
            writeln!(self.out, "{}", format_swatch(label, color))?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn swatch_line_layout() {
        let line = format_swatch("ACol", RgbColor::new(255, 7, 42));
        assert_eq!(
            line,
            "ACol : \x1b[38;2;255;7;42m░▒▓███ 255   7  42 ███▓▒░\x1b[39;49m"
        );
    }

    #[test]
    fn present_writes_three_lines_in_order() {
        let colors = CycleColors {
            center: RgbColor::new(1, 1, 1),
            average: RgbColor::new(3, 3, 3),
            dominant: RgbColor::new(2, 2, 2),
            captured_at: Utc::now(),
        };

        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.present(&colors).unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CCol :") && lines[0].contains("  1   1   1 "));
        assert!(lines[1].starts_with("DCol :") && lines[1].contains("  2   2   2 "));
        assert!(lines[2].starts_with("ACol :") && lines[2].contains("  3   3   3 "));
    }
}

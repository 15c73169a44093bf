//! 화면 좌표계 기하 모델.
//!
//! 좌표는 가상 화면 기준 절대 좌표(음수 가능), 크기는 항상 1 이상.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 캡처 사각형 — 생성 후 불변, `width > 0 && height > 0` 보장
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

impl Rectangle {
    /// 새 사각형 생성 (너비/높이 0이면 에러)
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::validation(
                "rectangle",
                format!("크기는 0보다 커야 함: {width}x{height}"),
            ));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// 원점에서 시작하는 화면 크기 사각형 (0 크기는 1로 올림)
    pub const fn at_origin(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 오른쪽 경계 (배타적)
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// 아래쪽 경계 (배타적)
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `other`가 이 사각형 안에 완전히 포함되는지 여부
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// 두 사각형의 교집합 (겹치지 않으면 `None`)
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left as i64 || bottom <= top as i64 {
            return None;
        }

        Some(Rectangle {
            left,
            top,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        })
    }

    /// 두 사각형을 모두 덮는 최소 사각형
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rectangle {
            left,
            top,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        }
    }
}

/// 너비/높이 쌍 (축소 목표 계산용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

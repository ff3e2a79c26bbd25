use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A pixel offset relative to an element's default layout position.
///
/// This is never an absolute canvas coordinate. A missing stored position
/// means "no manual offset applied yet" and is equivalent to [`Position::ORIGIN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Committed position, or the origin when none is stored.
    pub fn or_origin(stored: Option<Position>) -> Position {
        stored.unwrap_or(Self::ORIGIN)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Fixed pixel box a slide is composed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn scaled(self, factor: f32) -> (u32, u32) {
        (
            (self.width * factor).round() as u32,
            (self.height * factor).round() as u32,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "4:5")]
    Portrait,
    #[serde(rename = "9:16")]
    Story,
}

impl AspectRatio {
    pub fn all() -> &'static [AspectRatio] {
        &[AspectRatio::Square, AspectRatio::Portrait, AspectRatio::Story]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "4:5",
            Self::Story => "9:16",
        }
    }

    /// Pixel box for this ratio. Every variant has an entry.
    pub fn canvas_size(&self) -> CanvasSize {
        match self {
            Self::Square => CanvasSize {
                width: 400.0,
                height: 400.0,
            },
            Self::Portrait => CanvasSize {
                width: 400.0,
                height: 500.0,
            },
            Self::Story => CanvasSize {
                width: 281.0,
                height: 500.0,
            },
        }
    }

    /// Aspect label understood by the image-generation service.
    pub fn image_label(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Story => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "4:5" => Ok(Self::Portrait),
            "9:16" => Ok(Self::Story),
            other => Err(format!(
                "Invalid aspect ratio: {other}. Must be '1:1', '4:5', or '9:16'."
            )),
        }
    }
}

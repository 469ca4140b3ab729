use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Distance in pixels between the text block and the anchored canvas edges.
pub const MARGIN: i32 = 20;

/// Where on the canvas the watermark is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
            Anchor::Center => "center",
        }
    }

    /// Parse an anchor name, falling back to bottom-right for anything unknown.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown position '{}', using {}", name, Anchor::default());
            Anchor::default()
        })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnchor(pub String);

impl fmt::Display for UnknownAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position '{}'", self.0)
    }
}

impl std::error::Error for UnknownAnchor {}

impl FromStr for Anchor {
    type Err = UnknownAnchor;

    /// Accepts `bottom-right`, `bottom_right`, `Bottom Right`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Anchor::ALL
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}

/// Top-left pixel at which a `text` sized block lands for the given anchor.
///
/// The result is not clamped: text larger than the canvas gives negative or
/// off-canvas coordinates.
pub fn compute_origin(canvas: (u32, u32), text: (u32, u32), anchor: Anchor, margin: i32) -> (i32, i32) {
    let (cw, ch) = (canvas.0 as i64, canvas.1 as i64);
    let (tw, th) = (text.0 as i64, text.1 as i64);
    let m = margin as i64;

    let (x, y) = match anchor {
        Anchor::TopLeft => (m, m),
        Anchor::TopRight => (cw - tw - m, m),
        Anchor::BottomLeft => (m, ch - th - m),
        Anchor::BottomRight => (cw - tw - m, ch - th - m),
        Anchor::Center => ((cw - tw) / 2, (ch - th) / 2),
    };
    (x as i32, y as i32)
}

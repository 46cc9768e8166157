//! Legacy window-geometry parsing.

use serde::{Deserialize, Serialize};

/// Window dimensions carried in the state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
}

/// Parses the legacy comma-separated geometry tuple.
///
/// Two historical encodings were in the wild: `x,y,width,height` and
/// `width,height,x,y`. When the last two fields parse as positive
/// integers they win; otherwise the first two are tried. A tuple that
/// fits neither reading yields `None`. This is a heuristic, not a
/// proven-correct recovery: a genuinely ambiguous 2-field value and a
/// corrupted 4-field one are indistinguishable.
pub fn parse_legacy_geometry(raw: &str) -> Option<WindowGeometry> {
    let fields: Vec<&str> = raw.trim().split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > 4 {
        return None;
    }

    let pair = |a: &str, b: &str| -> Option<WindowGeometry> {
        let width = a.parse::<u32>().ok().filter(|v| *v > 0)?;
        let height = b.parse::<u32>().ok().filter(|v| *v > 0)?;
        Some(WindowGeometry { width, height })
    };

    let n = fields.len();
    pair(fields[n - 2], fields[n - 1]).or_else(|| pair(fields[0], fields[1]))
}

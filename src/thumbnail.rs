//! Slicer preview thumbnails
//!
//! PrusaSlicer embeds base64 PNG previews as comment blocks:
//!
//! ```text
//! ; thumbnail begin 16x16 1234
//! ; iVBORw0KGgoAAAANSUhEUgAAABAAAAAQ...
//! ; thumbnail end
//! ```
//!
//! Each block becomes a `thumbnail_<size>.png` entry in the archive.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

/// First-line markers of inputs that may carry thumbnail blocks
const THUMBNAIL_BANNERS: [&str; 2] = ["PrusaSlicer", "HEADER_BLOCK_START"];

const THUMBNAIL_END: &str = "thumbnail end";

/// One decoded preview image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// `<width>x<height>` as written in the block header
    pub size: String,
    pub png: Vec<u8>,
}

impl Thumbnail {
    /// Archive entry name
    pub fn entry_name(&self) -> String {
        format!("thumbnail_{}.png", self.size)
    }
}

/// Decode every thumbnail block in `content`
///
/// Inputs whose first line carries no known banner yield no thumbnails.
pub fn extract(content: &str) -> Result<Vec<Thumbnail>> {
    let mut lines = content.lines().enumerate();

    let Some((_, first)) = lines.next() else {
        return Ok(Vec::new());
    };
    if !THUMBNAIL_BANNERS.iter().any(|banner| first.contains(banner)) {
        log::debug!("no thumbnail banner in first line, skipping thumbnails");
        return Ok(Vec::new());
    }

    let begin_re = Regex::new(r"^;\s*thumbnail begin (\d+x\d+)")
        .context("compiling thumbnail pattern")?;

    let mut thumbnails = Vec::new();
    while let Some((idx, line)) = lines.next() {
        let Some(size) = begin_re.captures(line).and_then(|c| c.get(1)) else {
            continue;
        };
        let size = size.as_str().to_string();

        let mut data = String::new();
        for (_, line) in lines.by_ref() {
            if line.contains(THUMBNAIL_END) {
                break;
            }
            data.push_str(line.trim_matches(|c: char| c == ';' || c.is_whitespace()));
        }

        let png = STANDARD
            .decode(&data)
            .with_context(|| format!("line {}: thumbnail {} is not valid base64", idx + 1, size))?;
        log::debug!("thumbnail {} ({} bytes)", size, png.len());
        thumbnails.push(Thumbnail { size, png });
    }

    Ok(thumbnails)
}

//! `.makerbot` archive packaging
//!
//! The archive is assembled in memory and written with a single call, so a
//! failure part way through never leaves a half-built file behind.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::thumbnail::Thumbnail;

pub const META_ENTRY: &str = "meta.json";
pub const TOOLPATH_ENTRY: &str = "print.jsontoolpath";
pub const MAKERBOT_EXTENSION: &str = "makerbot";
pub const TOOLPATH_EXTENSION: &str = "jsontoolpath";

/// Default output path: the input with a `.makerbot` extension
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(MAKERBOT_EXTENSION)
}

/// `meta.json` with four-space indentation
pub fn meta_to_string(meta: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    meta.serialize(&mut serializer)
        .context("serializing meta.json")?;
    String::from_utf8(buf).context("meta.json is not UTF-8")
}

/// Build the archive bytes
pub fn build_makerbot(
    meta: &Value,
    toolpath_json: &str,
    thumbnails: &[Thumbnail],
) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(META_ENTRY, options)
        .context("starting meta.json entry")?;
    zip.write_all(meta_to_string(meta)?.as_bytes())
        .context("writing meta.json entry")?;

    for thumbnail in thumbnails {
        let name = thumbnail.entry_name();
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("starting {} entry", name))?;
        zip.write_all(&thumbnail.png)
            .with_context(|| format!("writing {} entry", name))?;
    }

    zip.start_file(TOOLPATH_ENTRY, options)
        .context("starting toolpath entry")?;
    zip.write_all(toolpath_json.as_bytes())
        .context("writing toolpath entry")?;

    let cursor = zip.finish().context("finishing archive")?;
    Ok(cursor.into_inner())
}

/// Write a `.makerbot` archive to `path`
pub fn write_makerbot(
    path: &Path,
    meta: &Value,
    toolpath_json: &str,
    thumbnails: &[Thumbnail],
) -> Result<()> {
    let bytes = build_makerbot(meta, toolpath_json, thumbnails)?;
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

use anyhow::{Context, Result};
use uuid::Uuid;

use gcode_makerbot::config::Config;
use gcode_makerbot::progress::LogProgress;
use gcode_makerbot::{metadata, package, thumbnail, Translator};

fn main() -> Result<()> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    log::info!(
        "converting {} for {:?} with {:?}",
        config.input.display(),
        config.machine,
        config.extruder
    );

    let content = std::fs::read_to_string(&config.input)
        .with_context(|| format!("reading {}", config.input.display()))?;

    let mut progress = LogProgress::new();
    let translation = Translator::new(config.translate.clone())
        .run(&content, &mut progress)
        .with_context(|| format!("converting {}", config.input.display()))?;

    if config.toolpath_only {
        std::fs::write(&config.output, &translation.toolpath_json)
            .with_context(|| format!("writing {}", config.output.display()))?;
        log::info!("wrote {}", config.output.display());
        return Ok(());
    }

    let meta = metadata::render(
        &translation.metrics,
        config.machine,
        config.extruder,
        Uuid::new_v4(),
    )?;
    let thumbnails = thumbnail::extract(&content)?;
    log::info!("{} thumbnail(s) found", thumbnails.len());

    package::write_makerbot(
        &config.output,
        &meta,
        &translation.toolpath_json,
        &thumbnails,
    )
}

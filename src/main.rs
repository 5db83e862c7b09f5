use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use gdi_compositor::cli::Cli;
use gdi_compositor::ppm::encode_ppm;
use gdi_compositor::script::{Replayer, Script};
use gdi_compositor::GdiContext;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script: {:?}", cli.script))?;
    let mut script: Script =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse script: {:?}", cli.script))?;

    if let Some(width) = cli.width {
        script.config.width = width;
    }
    if let Some(height) = cli.height {
        script.config.height = height;
    }

    let context = GdiContext::new(script.config).context("Failed to create rendering context")?;
    let mut replayer = Replayer::new(context);
    let applied = replayer.run(&script.commands)?;
    let mut context = replayer.into_inner();

    let mut image = None;
    let dirty = context.present(|rect, primary| image = Some(encode_ppm(primary, rect)));

    if let (Some(path), Some(image)) = (&cli.output, image) {
        fs::write(path, image).with_context(|| format!("Failed to write image: {:?}", path))?;
    }

    log::debug!("{} surfaces registered at end of replay", context.surfaces().count());
    match dirty {
        Some(rect) => log::info!(
            "{applied} commands, dirty region {}x{} at ({}, {})",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        ),
        None => log::info!("{applied} commands, nothing to present"),
    }
    Ok(())
}

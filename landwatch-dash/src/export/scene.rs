//! Export de la scène cartographique en JSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use landwatch::MapScene;

/// Écrit la scène (couches, centre, légende) dans un fichier JSON
pub fn write_scene(scene: &MapScene, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, scene).context("Failed to serialize scene")?;
    writer.flush()?;

    Ok(())
}

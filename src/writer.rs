// src/writer.rs

use crate::asc_models::*;
use crate::error::Result;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders a schematic as ASC text.
///
/// Order is header, symbols (each followed by its attributes), wires, flags.
/// Wires are written with the endpoint nearer the origin first. An entry
/// identical to one already written is dropped; a symbol and its attribute
/// lines form one entry.
pub fn to_asc_string(schematic: &Schematic) -> String {
    let mut entries: Vec<String> = Vec::new();

    if let Some(version) = &schematic.version {
        entries.push(format!("Version {}\n", version));
    }
    if let Some(sheet) = &schematic.sheet {
        entries.push(format!(
            "SHEET {} {} {}\n",
            sheet.number, sheet.width, sheet.height
        ));
    }

    for component in &schematic.components {
        entries.push(symbol_entry(component));
    }

    for wire in &schematic.wires {
        let w = wire.normalized();
        entries.push(format!("WIRE {} {} {} {}\n", w.x1, w.y1, w.x2, w.y2));
    }

    for flag in &schematic.flags {
        entries.push(format!("FLAG {} {} {}\n", flag.x, flag.y, flag.net_name));
    }

    let total = entries.len();
    let mut seen = HashSet::new();
    let out: String = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect();
    debug!("Wrote {} ASC entries ({} duplicates suppressed)", seen.len(), total - seen.len());
    out
}

fn symbol_entry(component: &Component) -> String {
    let mut out = format!(
        "SYMBOL {} {} {} {}\n",
        component.component_type, component.x, component.y, component.rotation
    );
    for (key, value) in component.attributes.iter() {
        let key = if key == NAME_KEY { "InstName" } else { key };
        if value.is_empty() {
            out.push_str(&format!("SYMATTR {}\n", key));
        } else {
            out.push_str(&format!("SYMATTR {} {}\n", key, value));
        }
    }
    out
}

/// Output directory for converted schematics.
pub struct AscOutput {
    pub path: PathBuf,
}

impl AscOutput {
    pub fn setup_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.path)?;
        Ok(())
    }

    /// Writes `<name>.asc` and returns its path.
    pub fn write_asc(&self, name: &str, schematic: &Schematic) -> Result<PathBuf> {
        let path = self.file_path(name, "asc");
        fs::write(&path, to_asc_string(schematic))?;
        info!("Wrote schematic to {:?}", path);
        Ok(path)
    }

    /// Writes `<name>.json` (the interchange record) and returns its path.
    pub fn write_json(&self, name: &str, schematic: &Schematic) -> Result<PathBuf> {
        let path = self.file_path(name, "json");
        fs::write(&path, serde_json::to_string_pretty(schematic)?)?;
        info!("Wrote circuit JSON to {:?}", path);
        Ok(path)
    }

    fn file_path(&self, name: &str, extension: &str) -> PathBuf {
        Path::new(&self.path).join(name).with_extension(extension)
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurement export and import.
//!
//! This module writes a frame's measurements to YAML or JSON files and
//! reads them back.

use crate::models::FrameExport;
use anyhow::{Context, Result};
use std::path::Path;

/// Export frame measurements to YAML format.
pub fn export_yaml(data: &FrameExport, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export frame measurements to JSON format.
pub fn export_json(data: &FrameExport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import frame measurements from YAML format.
pub fn import_yaml(path: &Path) -> Result<FrameExport> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import frame measurements from JSON format.
pub fn import_json(path: &Path) -> Result<FrameExport> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Import either format, chosen by file extension.
pub fn import_any(path: &Path) -> Result<FrameExport> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        _ => import_json(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrameContext, FrameSource, Measurements};

    fn sample() -> FrameExport {
        let mut frame = FrameContext::new(120, 4.0, FrameSource::Backend);
        frame.custom_name = Some("Baseline".to_string());
        FrameExport {
            frame,
            measurements: Measurements {
                angle_a: Some(35.5),
                area_av: Some(1200.0),
                ..Default::default()
            },
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("framemeasure-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_yaml_export_import() {
        let path = temp_path("export.yaml");
        export_yaml(&sample(), &path).unwrap();
        let loaded = import_any(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_json_export_import() {
        let path = temp_path("export.json");
        export_json(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let loaded = import_any(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(text.contains("\"angle_a\": 35.5"));
        assert_eq!(loaded.measurements.area_av, Some(1200.0));
    }

    #[test]
    fn test_canvas_image_is_not_exported() {
        let mut data = sample();
        data.frame.source = FrameSource::Canvas { image: vec![1, 2, 3] };

        let yaml = serde_yaml::to_string(&data).unwrap();
        assert!(!yaml.contains("source"));
    }
}

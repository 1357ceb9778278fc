//! Cross-section checks run after coercion.

use crate::config::{ResolvedConfig, SectionKind};
use crate::error::ConfigError;
use crate::value::{PartSource, SceneType};

/// Entries every scenario must define.
pub const REQUIRED_FIELDS: [(SectionKind, &str); 3] = [
    (SectionKind::Dataset, "image_count"),
    (SectionKind::CameraInfo, "width"),
    (SectionKind::CameraInfo, "height"),
];

/// Report every missing required field at once.
pub fn check_required(config: &ResolvedConfig) -> Result<(), ConfigError> {
    let fields: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|(section, key)| config.section(*section).get(key).is_none())
        .map(|(section, key)| format!("{}.{key}", section.as_str()))
        .collect();
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingFieldError { fields })
    }
}

/// Every `parts.<name>` target object must name a key of `[parts]`.
///
/// Unresolved names are collected in order of first appearance.
pub fn check_part_references(config: &ResolvedConfig) -> Result<(), ConfigError> {
    let parts = config.parts();
    let mut names: Vec<String> = Vec::new();
    for reference in config.target_objects() {
        if let PartSource::Part(name) = &reference.source
            && parts.get(name).is_none()
            && !names.contains(name)
        {
            names.push(name.clone());
        }
    }
    if names.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::DanglingReferenceError { names })
    }
}

/// `dataset.scene_type`, when present, must name a known scene.
pub fn check_scene_type(config: &ResolvedConfig) -> Result<(), ConfigError> {
    let Some(name) = config.dataset().get_str("scene_type") else {
        return Ok(());
    };
    if SceneType::from_name(name).is_some() {
        return Ok(());
    }
    Err(ConfigError::InvalidEnumValueError {
        section: SectionKind::Dataset.as_str().to_string(),
        key: "scene_type".to_string(),
        value: name.to_string(),
        allowed: SceneType::NAMES.to_vec(),
    })
}

/// Run all checks.
pub fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    check_required(config)?;
    check_scene_type(config)?;
    check_part_references(config)
}

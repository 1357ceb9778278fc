//! Resolved scenario configuration with typed accessors, text/RON persistence,
//! and the load pipeline (parse, override, expand, coerce, validate).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Override;
use crate::coerce::{PLY_SCALE_PREFIX, coerce};
use crate::error::ConfigError;
use crate::expand::{Environment, expand};
use crate::parser::{Document, escape_value, parse};
use crate::validate::validate;
use crate::value::{Integrator, PartReference, SceneType, Value};

/// File name used by [`ResolvedConfig::save`].
pub const DUMP_FILE_NAME: &str = "Dataset.cfg";

// ---------------------------------------------------------------------------
// SectionKind
// ---------------------------------------------------------------------------

/// The recognized sections of a scenario file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Dataset,
    CameraInfo,
    RenderSetup,
    SceneSetup,
    Parts,
    ScenarioSetup,
}

impl SectionKind {
    /// All sections, in the order they are written out.
    pub const ALL: [SectionKind; 6] = [
        Self::Dataset,
        Self::CameraInfo,
        Self::RenderSetup,
        Self::SceneSetup,
        Self::Parts,
        Self::ScenarioSetup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::CameraInfo => "camera_info",
            Self::RenderSetup => "render_setup",
            Self::SceneSetup => "scene_setup",
            Self::Parts => "parts",
            Self::ScenarioSetup => "scenario_setup",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Typed entries of one section, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    entries: Vec<(String, Value)>,
}

impl Section {
    /// Append an entry. The parser already rejects duplicate keys.
    pub(crate) fn push(&mut self, key: String, value: Value) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_float_list(&self, key: &str) -> Option<&[f64]> {
        self.get(key).and_then(Value::as_float_list)
    }

    pub fn get_string_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_string_list)
    }
}

// ---------------------------------------------------------------------------
// ResolvedConfig
// ---------------------------------------------------------------------------

/// Fully expanded, typed, and validated scenario configuration.
///
/// Obtained through [`ResolvedConfig::load`] or
/// [`ResolvedConfig::from_str_with_env`]; there is no mutation API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    dataset: Section,
    camera_info: Section,
    render_setup: Section,
    scene_setup: Section,
    parts: Section,
    scenario_setup: Section,
}

impl ResolvedConfig {
    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Dataset => &self.dataset,
            SectionKind::CameraInfo => &self.camera_info,
            SectionKind::RenderSetup => &self.render_setup,
            SectionKind::SceneSetup => &self.scene_setup,
            SectionKind::Parts => &self.parts,
            SectionKind::ScenarioSetup => &self.scenario_setup,
        }
    }

    pub(crate) fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Dataset => &mut self.dataset,
            SectionKind::CameraInfo => &mut self.camera_info,
            SectionKind::RenderSetup => &mut self.render_setup,
            SectionKind::SceneSetup => &mut self.scene_setup,
            SectionKind::Parts => &mut self.parts,
            SectionKind::ScenarioSetup => &mut self.scenario_setup,
        }
    }

    pub fn dataset(&self) -> &Section {
        &self.dataset
    }

    pub fn camera_info(&self) -> &Section {
        &self.camera_info
    }

    pub fn render_setup(&self) -> &Section {
        &self.render_setup
    }

    pub fn scene_setup(&self) -> &Section {
        &self.scene_setup
    }

    pub fn parts(&self) -> &Section {
        &self.parts
    }

    pub fn scenario_setup(&self) -> &Section {
        &self.scenario_setup
    }

    // --- dataset ---

    /// Number of images to render. Always present after loading.
    pub fn image_count(&self) -> Option<i64> {
        self.dataset.get_int("image_count")
    }

    pub fn base_path(&self) -> Option<&str> {
        self.dataset.get_str("base_path")
    }

    pub fn scene_type(&self) -> Option<SceneType> {
        self.dataset
            .get_str("scene_type")
            .and_then(SceneType::from_name)
    }

    /// Zero-padded width of image file names: `ceil(log10(image_count))`, at least 1.
    pub fn image_name_width(&self) -> usize {
        match self.image_count() {
            Some(n) if n > 1 => (n - 1).to_string().len(),
            _ => 1,
        }
    }

    // --- camera_info ---

    pub fn width(&self) -> Option<i64> {
        self.camera_info.get_int("width")
    }

    pub fn height(&self) -> Option<i64> {
        self.camera_info.get_int("height")
    }

    /// Camera intrinsics `fx, fy, cx, cy`; `None` when absent or left empty.
    pub fn intrinsic(&self) -> Option<[f64; 4]> {
        self.camera_info
            .get_float_list("intrinsic")
            .and_then(|v| v.try_into().ok())
    }

    /// Euler angles applied to correct the camera orientation.
    pub fn zeroing(&self) -> Option<[f64; 3]> {
        self.camera_info
            .get_float_list("zeroing")
            .and_then(|v| v.try_into().ok())
    }

    // --- render_setup ---

    pub fn backend(&self) -> Option<&str> {
        self.render_setup.get_str("backend")
    }

    pub fn integrator(&self) -> Option<Integrator> {
        match self.render_setup.get("integrator") {
            Some(Value::Integrator(integrator)) => Some(*integrator),
            _ => None,
        }
    }

    pub fn denoising(&self) -> Option<bool> {
        self.render_setup.get_bool("denoising")
    }

    pub fn samples(&self) -> Option<i64> {
        self.render_setup.get_int("samples")
    }

    // --- scene_setup ---

    pub fn blend_file(&self) -> Option<&str> {
        self.scene_setup.get_str("blend_file")
    }

    pub fn environment_textures(&self) -> Option<&str> {
        self.scene_setup.get_str("environment_textures")
    }

    pub fn cameras(&self) -> &[String] {
        self.scene_setup.get_string_list("cameras").unwrap_or(&[])
    }

    pub fn forward_frames(&self) -> Option<i64> {
        self.scene_setup.get_int("forward_frames")
    }

    /// One dataset directory per camera: `<base_path>-<camera>`.
    pub fn camera_output_paths(&self) -> Vec<PathBuf> {
        let Some(base) = self.base_path() else {
            return Vec::new();
        };
        self.cameras()
            .iter()
            .map(|cam| PathBuf::from(format!("{base}-{cam}")))
            .collect()
    }

    // --- parts / scenario_setup ---

    /// Asset file of a part declared in `[parts]`.
    pub fn part_path(&self, name: &str) -> Option<&str> {
        self.parts.get_str(name)
    }

    /// PLY mesh of a part, declared as `ply.<name>`.
    pub fn ply_path(&self, name: &str) -> Option<&str> {
        self.parts.get_str(&format!("ply.{name}"))
    }

    /// Scale factors of a PLY part, declared as `ply_scale.<name>`.
    pub fn ply_scale(&self, name: &str) -> Option<&[f64]> {
        self.parts
            .get_float_list(&format!("{PLY_SCALE_PREFIX}{name}"))
    }

    pub fn scenario(&self) -> Option<i64> {
        self.scenario_setup.get_int("scenario")
    }

    pub fn target_objects(&self) -> &[PartReference] {
        self.scenario_setup
            .get("target_objects")
            .and_then(Value::as_references)
            .unwrap_or(&[])
    }

    /// Total number of object instances placed in the scene.
    pub fn total_object_count(&self) -> u64 {
        self.target_objects()
            .iter()
            .map(|r| u64::from(r.count.get()))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Expand, coerce, and validate a parsed document.
pub fn resolve(doc: Document, env: &Environment) -> Result<ResolvedConfig, ConfigError> {
    let doc = expand(doc, env)?;
    let config = coerce(&doc)?;
    validate(&config)?;
    Ok(config)
}

impl ResolvedConfig {
    /// Resolve configuration text.
    pub fn from_str_with_env(text: &str, env: &Environment) -> Result<Self, ConfigError> {
        resolve(parse(text)?, env)
    }

    /// Load and resolve a scenario file.
    pub fn load(path: &Path, env: &Environment) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, &[], env)
    }

    /// Load a scenario file, replacing entries with `overrides` before resolution.
    pub fn load_with_overrides(
        path: &Path,
        overrides: &[Override],
        env: &Environment,
    ) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let mut doc = parse(&contents)?;
        for o in overrides {
            log::debug!("override [{}] {} = {}", o.section, o.key, o.value);
            doc.set(&o.section, &o.key, &o.value);
        }
        let config = resolve(doc, env)?;
        log::info!(
            "Loaded scenario config from {} ({} target object entries)",
            path.display(),
            config.target_objects().len()
        );
        Ok(config)
    }

    /// Write the resolved configuration to `<dir>/Dataset.cfg`, creating `dir`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ConfigError> {
        std::fs::create_dir_all(dir).map_err(ConfigError::WriteError)?;
        let path = dir.join(DUMP_FILE_NAME);
        std::fs::write(&path, self.to_string()).map_err(ConfigError::WriteError)?;
        log::info!("Saved resolved config to {}", path.display());
        Ok(path)
    }

    /// Re-read `path`: returns `Some(new_config)` if it resolves differently, `None` otherwise.
    pub fn reload(&self, path: &Path, env: &Environment) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let new_config = Self::from_str_with_env(&contents, env)?;

        if &new_config != self {
            log::info!("Scenario config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Render the typed model as pretty RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)
    }
}

/// Writes the configuration back in the scenario text format.
impl fmt::Display for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in SectionKind::ALL {
            let section = self.section(kind);
            if section.is_empty() {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "[{}]", kind.as_str())?;
            for (key, value) in section.iter() {
                writeln!(f, "{key} = {}", escape_value(&value.to_string()))?;
            }
        }
        Ok(())
    }
}

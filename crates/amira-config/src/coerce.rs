//! Per-key type table and raw-string to [`Value`] coercion.

use crate::config::{ResolvedConfig, Section, SectionKind};
use crate::error::ConfigError;
use crate::parser::Document;
use crate::value::{Integrator, PartReference, Value};

/// Prefix of `parts` keys holding per-axis PLY scale factors.
pub const PLY_SCALE_PREFIX: &str = "ply_scale.";

/// Expected type of a configuration key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    Integrator,
    /// Comma-separated floats; `Some(n)` requires exactly `n` values unless empty.
    FloatList(Option<usize>),
    StringList,
    References,
    String,
}

impl ValueKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Boolean => "a boolean (true/false)",
            Self::Integrator => "an integrator name",
            Self::FloatList(Some(3)) => "a list of 3 floats",
            Self::FloatList(Some(4)) => "a list of 4 floats",
            Self::FloatList(_) => "a list of floats",
            Self::StringList => "a list of names",
            Self::References => "a list of name:count references with positive counts",
            Self::String => "a string",
        }
    }
}

/// Look up the expected type of `section.key`.
pub fn kind_of(section: SectionKind, key: &str) -> ValueKind {
    use SectionKind as S;
    match (section, key) {
        (S::Dataset, "image_count") => ValueKind::Integer,
        (S::CameraInfo, "width" | "height") => ValueKind::Integer,
        (S::CameraInfo, "intrinsic") => ValueKind::FloatList(Some(4)),
        (S::CameraInfo, "zeroing") => ValueKind::FloatList(Some(3)),
        (S::RenderSetup, "samples") => ValueKind::Integer,
        (S::RenderSetup, "denoising") => ValueKind::Boolean,
        (S::RenderSetup, "integrator") => ValueKind::Integrator,
        (S::SceneSetup, "cameras") => ValueKind::StringList,
        (S::SceneSetup, "forward_frames") => ValueKind::Integer,
        (S::ScenarioSetup, "scenario") => ValueKind::Integer,
        (S::ScenarioSetup, "target_objects") => ValueKind::References,
        (S::Parts, k) if k.starts_with(PLY_SCALE_PREFIX) => ValueKind::FloatList(None),
        _ => ValueKind::String,
    }
}

/// Split a comma-separated list. An empty value is an empty list; an empty
/// item inside a non-empty list is rejected.
fn split_list(raw: &str) -> Option<Vec<&str>> {
    if raw.trim().is_empty() {
        return Some(Vec::new());
    }
    let items: Vec<&str> = raw.split(',').map(str::trim).collect();
    if items.iter().any(|item| item.is_empty()) {
        return None;
    }
    Some(items)
}

fn parse_floats(raw: &str, len: Option<usize>) -> Option<Vec<f64>> {
    let values = split_list(raw)?
        .into_iter()
        .map(|item| item.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match len {
        Some(n) if !values.is_empty() && values.len() != n => None,
        _ => Some(values),
    }
}

/// Coerce one raw value to the type of its key.
///
/// # Errors
///
/// Returns [`ConfigError::TypeCoercionError`] when the value does not match
/// the key's type and [`ConfigError::InvalidEnumValueError`] for an unknown
/// integrator.
pub fn coerce_value(section: SectionKind, key: &str, raw: &str) -> Result<Value, ConfigError> {
    let kind = kind_of(section, key);
    let raw = raw.trim();
    let mismatch = || ConfigError::TypeCoercionError {
        section: section.as_str().to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        expected: kind.describe(),
    };

    let value = match kind {
        ValueKind::Integer => Value::Integer(raw.parse().map_err(|_| mismatch())?),
        ValueKind::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Value::Boolean(true)
            } else if raw.eq_ignore_ascii_case("false") {
                Value::Boolean(false)
            } else {
                return Err(mismatch());
            }
        }
        ValueKind::Integrator => match Integrator::from_name(raw) {
            Some(integrator) => Value::Integrator(integrator),
            None => {
                return Err(ConfigError::InvalidEnumValueError {
                    section: section.as_str().to_string(),
                    key: key.to_string(),
                    value: raw.to_string(),
                    allowed: Integrator::NAMES.to_vec(),
                });
            }
        },
        ValueKind::FloatList(len) => Value::FloatList(parse_floats(raw, len).ok_or_else(mismatch)?),
        ValueKind::StringList => Value::StringList(
            split_list(raw)
                .ok_or_else(mismatch)?
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        ValueKind::References => {
            let items = split_list(raw).ok_or_else(mismatch)?;
            let mut refs = Vec::with_capacity(items.len());
            for item in items {
                let reference =
                    PartReference::parse(item).ok_or_else(|| ConfigError::TypeCoercionError {
                        section: section.as_str().to_string(),
                        key: key.to_string(),
                        value: item.to_string(),
                        expected: kind.describe(),
                    })?;
                refs.push(reference);
            }
            Value::References(refs)
        }
        ValueKind::String => Value::String(raw.to_string()),
    };
    Ok(value)
}

/// Coerce every recognized section of an expanded document.
///
/// Sections outside [`SectionKind::ALL`] are skipped with a warning.
pub fn coerce(doc: &Document) -> Result<ResolvedConfig, ConfigError> {
    let mut config = ResolvedConfig::default();
    for raw in &doc.sections {
        let Some(kind) = SectionKind::from_name(&raw.name) else {
            log::warn!("ignoring unrecognized section [{}]", raw.name);
            continue;
        };
        let mut section = Section::default();
        for entry in &raw.entries {
            let value = coerce_value(kind, &entry.key, &entry.value)?;
            section.push(entry.key.clone(), value);
        }
        *config.section_mut(kind) = section;
    }
    Ok(config)
}

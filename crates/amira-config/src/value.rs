//! Typed configuration values: [`Value`], [`PartReference`], [`Integrator`], [`SceneType`].

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Integrator
// ---------------------------------------------------------------------------

/// Path-tracing integrator of the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Integrator {
    Path,
    BranchedPath,
}

impl Integrator {
    /// Names accepted in `render_setup.integrator`.
    pub const NAMES: [&'static str; 2] = ["PATH", "BRANCHED_PATH"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "PATH",
            Self::BranchedPath => "BRANCHED_PATH",
        }
    }

    /// Exact, case-sensitive match against [`Integrator::NAMES`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PATH" => Some(Self::Path),
            "BRANCHED_PATH" => Some(Self::BranchedPath),
            _ => None,
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SceneType
// ---------------------------------------------------------------------------

/// Scene implementations known to the renderer, selected by `dataset.scene_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneType {
    SimpleToolCap,
    WorkstationScenarios,
    PandaTable,
}

impl SceneType {
    pub const ALL: [SceneType; 3] = [
        Self::SimpleToolCap,
        Self::WorkstationScenarios,
        Self::PandaTable,
    ];

    pub const NAMES: [&'static str; 3] = ["SimpleToolCap", "WorkstationScenarios", "PandaTable"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleToolCap => "SimpleToolCap",
            Self::WorkstationScenarios => "WorkstationScenarios",
            Self::PandaTable => "PandaTable",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PartReference
// ---------------------------------------------------------------------------

/// Where the objects of a target-object entry come from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartSource {
    /// A proto object already placed in the scene file, duplicated per instance.
    Proto(String),
    /// An asset declared in the `parts` section (`parts.<name>`).
    Part(String),
}

/// A `name:count` or `parts.name:count` entry of `scenario_setup.target_objects`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartReference {
    pub source: PartSource,
    pub count: NonZeroU32,
}

impl PartReference {
    pub const PARTS_PREFIX: &'static str = "parts.";

    /// Object or part name without the `parts.` prefix.
    pub fn name(&self) -> &str {
        match &self.source {
            PartSource::Proto(name) | PartSource::Part(name) => name,
        }
    }

    pub fn is_part(&self) -> bool {
        matches!(self.source, PartSource::Part(_))
    }

    /// Parse `name:count`. Returns `None` for a missing name, a missing or
    /// repeated separator, or a count that is not a positive integer.
    pub fn parse(entry: &str) -> Option<Self> {
        let (name, count) = entry.split_once(':')?;
        let name = name.trim();
        let count: NonZeroU32 = count.trim().parse().ok()?;
        let source = match name.strip_prefix(Self::PARTS_PREFIX) {
            Some(part) if !part.is_empty() => PartSource::Part(part.to_string()),
            Some(_) => return None,
            None if name.is_empty() => return None,
            None => PartSource::Proto(name.to_string()),
        };
        Some(Self { source, count })
    }
}

impl fmt::Display for PartReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            PartSource::Proto(name) => write!(f, "{name}:{}", self.count),
            PartSource::Part(name) => write!(f, "{}{name}:{}", Self::PARTS_PREFIX, self.count),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A coerced configuration value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Integrator(Integrator),
    FloatList(Vec<f64>),
    StringList(Vec<String>),
    References(Vec<PartReference>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_references(&self) -> Option<&[PartReference]> {
        match self {
            Self::References(v) => Some(v),
            _ => None,
        }
    }
}

/// Writes the value in the configuration text format.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Integrator(v) => write!(f, "{v}"),
            // `{:?}` keeps a decimal point and full precision for floats
            Self::FloatList(v) => {
                let items: Vec<String> = v.iter().map(|x| format!("{x:?}")).collect();
                join(f, &items)
            }
            Self::StringList(v) => join(f, v),
            Self::References(v) => join(f, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_reference_with_prefix() {
        let r = PartReference::parse("parts.hammerschraube:2").unwrap();
        assert!(r.is_part());
        assert_eq!(r.name(), "hammerschraube");
        assert_eq!(r.count.get(), 2);
        assert_eq!(r.to_string(), "parts.hammerschraube:2");
    }

    #[test]
    fn test_part_reference_proto() {
        let r = PartReference::parse(" sterngriff : 4 ").unwrap();
        assert_eq!(r.source, PartSource::Proto("sterngriff".to_string()));
        assert_eq!(r.to_string(), "sterngriff:4");
    }

    #[test]
    fn test_part_reference_rejects_bad_counts() {
        assert!(PartReference::parse("bolt:0").is_none());
        assert!(PartReference::parse("bolt:-1").is_none());
        assert!(PartReference::parse("bolt:two").is_none());
        assert!(PartReference::parse("bolt").is_none());
        assert!(PartReference::parse(":3").is_none());
        assert!(PartReference::parse("parts.:3").is_none());
    }

    #[test]
    fn test_part_reference_rejects_extra_separator() {
        assert!(PartReference::parse("a:b:3").is_none());
        assert!(PartReference::parse("parts.bolt:2:3").is_none());
    }

    #[test]
    fn test_integrator_names() {
        assert_eq!(Integrator::from_name("PATH"), Some(Integrator::Path));
        assert_eq!(
            Integrator::from_name("BRANCHED_PATH"),
            Some(Integrator::BranchedPath)
        );
        assert_eq!(Integrator::from_name("path"), None);
        assert_eq!(Integrator::BranchedPath.to_string(), "BRANCHED_PATH");
    }

    #[test]
    fn test_scene_type_case_insensitive() {
        assert_eq!(SceneType::from_name("pandatable"), Some(SceneType::PandaTable));
        assert_eq!(
            SceneType::from_name("SimpleToolCap"),
            Some(SceneType::SimpleToolCap)
        );
        assert_eq!(SceneType::from_name("ClutteredTable"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::FloatList(vec![0.0, 1.5, -2.0]).to_string(), "0.0, 1.5, -2.0");
        assert_eq!(
            Value::StringList(vec!["Camera".into(), "StereoCamera.Left".into()]).to_string(),
            "Camera, StereoCamera.Left"
        );
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(5).as_int(), Some(5));
        assert_eq!(Value::FloatList(vec![1.0]).as_float_list(), Some(&[1.0][..]));
        assert_eq!(Value::String("x".into()).as_int(), None);
        assert_eq!(Value::Boolean(false).as_bool(), Some(false));
    }
}

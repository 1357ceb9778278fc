//! `$NAME` / `${NAME}` and leading-`~` expansion against an injected environment.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::parser::Document;

/// Variable bindings and home directory used for expansion.
///
/// Built from the process with [`Environment::from_process`], or by hand in
/// tests so nothing touches the real environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
}

impl Environment {
    /// An empty environment: no variables, no home directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
            home: dirs::home_dir(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand a single value.
///
/// `$$` yields a literal `$` and a leading `\~` a literal `~`.
/// On failure returns the name of the first unbound variable (`HOME` for `~`).
pub fn expand_value(value: &str, env: &Environment) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    if let Some(stripped) = rest.strip_prefix("\\~") {
        out.push('~');
        rest = stripped;
    } else if rest == "~" || rest.starts_with("~/") {
        let home = env.home.as_ref().ok_or_else(|| "HOME".to_string())?;
        out.push_str(&home.to_string_lossy());
        rest = &rest[1..];
    }

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(escaped) = after.strip_prefix('$') {
            out.push('$');
            rest = escaped;
            continue;
        }

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end)
                    if braced.starts_with(is_name_start)
                        && braced[..end].chars().all(is_name_char) =>
                {
                    (&braced[..end], end + 2)
                }
                _ => ("", 0),
            }
        } else if after.starts_with(is_name_start) {
            let end = after
                .find(|c: char| !is_name_char(c))
                .unwrap_or(after.len());
            (&after[..end], end)
        } else {
            ("", 0)
        };

        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        let bound = env.get(name).ok_or_else(|| name.to_string())?;
        out.push_str(bound);
        rest = &after[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Expand every value of the document.
///
/// # Errors
///
/// Returns [`ConfigError::UnresolvedVariableError`] for the first unbound variable.
pub fn expand(mut doc: Document, env: &Environment) -> Result<Document, ConfigError> {
    for section in &mut doc.sections {
        for entry in &mut section.entries {
            entry.value = expand_value(&entry.value, env).map_err(|variable| {
                ConfigError::UnresolvedVariableError {
                    section: section.name.clone(),
                    key: entry.key.clone(),
                    variable,
                }
            })?;
        }
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn env() -> Environment {
        Environment::new()
            .with_var("AMIRA_DATASETS", "/data/sets")
            .with_var("AMIRA_DATA_GFX", "/data/gfx")
    }

    #[test]
    fn test_plain_and_braced_variables() {
        assert_eq!(
            expand_value("$AMIRA_DATASETS/OpenImagesV4", &env()).unwrap(),
            "/data/sets/OpenImagesV4"
        );
        assert_eq!(
            expand_value("${AMIRA_DATA_GFX}_v2/table.blend", &env()).unwrap(),
            "/data/gfx_v2/table.blend"
        );
    }

    #[test]
    fn test_lone_dollar_kept() {
        assert_eq!(expand_value("cost $5 $", &env()).unwrap(), "cost $5 $");
        assert_eq!(expand_value("${}", &env()).unwrap(), "${}");
    }

    #[test]
    fn test_braced_name_must_start_with_letter() {
        let env = Environment::new().with_var("1ABC", "bound");
        assert_eq!(expand_value("${1ABC}", &env).unwrap(), "${1ABC}");
        assert_eq!(expand_value("$1ABC", &env).unwrap(), "$1ABC");
        assert_eq!(expand_value("${_A1}", &env.with_var("_A1", "ok")).unwrap(), "ok");
    }

    #[test]
    fn test_escaped_dollar_and_tilde() {
        assert_eq!(
            expand_value("/data/$$USER/$$", &Environment::new()).unwrap(),
            "/data/$USER/$"
        );
        assert_eq!(expand_value("$$$$", &Environment::new()).unwrap(), "$$");
        assert_eq!(expand_value("\\~/gfx", &Environment::new()).unwrap(), "~/gfx");
    }

    #[test]
    fn test_no_recursive_expansion() {
        let env = Environment::new().with_var("A", "$B").with_var("B", "nope");
        assert_eq!(expand_value("$A", &env).unwrap(), "$B");
    }

    #[test]
    fn test_missing_variable_is_named() {
        let err = expand_value("$AMIRA_DATASETS/x", &Environment::new()).unwrap_err();
        assert_eq!(err, "AMIRA_DATASETS");
    }

    #[test]
    fn test_tilde_expansion() {
        let env = Environment::new().with_home("/home/render");
        assert_eq!(
            expand_value("~/gfx/table.blend", &env).unwrap(),
            "/home/render/gfx/table.blend"
        );
        assert_eq!(expand_value("a~b", &env).unwrap(), "a~b");
        assert_eq!(expand_value("~/x", &Environment::new()).unwrap_err(), "HOME");
    }

    #[test]
    fn test_expand_document_reports_location() {
        let doc = parse("[dataset]\nbase_path = $AMIRA_DATASETS/out\n").unwrap();
        match expand(doc, &Environment::new()) {
            Err(ConfigError::UnresolvedVariableError {
                section,
                key,
                variable,
            }) => {
                assert_eq!(section, "dataset");
                assert_eq!(key, "base_path");
                assert_eq!(variable, "AMIRA_DATASETS");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_expand_document_substitutes() {
        let doc = parse("[dataset]\nbase_path = $AMIRA_DATASETS/out\n").unwrap();
        let doc = expand(doc, &env()).unwrap();
        assert_eq!(
            doc.section("dataset").unwrap().get("base_path"),
            Some("/data/sets/out")
        );
    }
}

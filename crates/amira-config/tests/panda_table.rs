//! Loading the bundled panda table scenario.

use std::path::PathBuf;

use amira_config::{
    ConfigError, Environment, Integrator, Override, PartSource, ResolvedConfig, SceneType,
};

fn scenario_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/panda_table.cfg")
}

fn env() -> Environment {
    Environment::new()
        .with_var("AMIRA_DATASETS", "/datasets")
        .with_var("AMIRA_DATA_GFX", "/gfx")
}

/// Declares the part the bundled file leaves dangling.
fn with_tool_cap() -> Vec<Override> {
    vec!["parts.tool_cap = $AMIRA_DATA_GFX/cad/tool_cap.blend".parse().unwrap()]
}

#[test]
fn test_bundled_scenario_reports_tool_cap() {
    match ResolvedConfig::load(&scenario_path(), &env()) {
        Err(ConfigError::DanglingReferenceError { names }) => {
            assert_eq!(names, vec!["tool_cap".to_string()]);
        }
        other => panic!("expected dangling reference, got {other:?}"),
    }
}

#[test]
fn test_bundled_scenario_values() {
    let config =
        ResolvedConfig::load_with_overrides(&scenario_path(), &with_tool_cap(), &env()).unwrap();

    assert_eq!(config.image_count(), Some(5));
    assert_eq!(config.width(), Some(640));
    assert_eq!(config.height(), Some(480));
    assert_eq!(config.integrator(), Some(Integrator::BranchedPath));
    assert_eq!(config.samples(), Some(64));
    assert_eq!(config.denoising(), Some(true));
    assert_eq!(config.cameras(), &["Camera".to_string()]);
    assert_eq!(config.scene_type(), Some(SceneType::PandaTable));
    assert_eq!(config.base_path(), Some("/datasets/PandaTable-Train"));
    assert_eq!(
        config.blend_file(),
        Some("/gfx/modeling/robottable_empty.blend")
    );
    assert_eq!(config.ply_scale("sterngriff"), Some(&[0.001; 3][..]));

    let targets = config.target_objects();
    assert_eq!(targets.len(), 5);
    let parts: Vec<&str> = targets
        .iter()
        .filter(|r| r.is_part())
        .map(|r| r.name())
        .collect();
    assert_eq!(parts, vec!["hammerschraube", "winkel_60x60", "tool_cap"]);
    assert_eq!(targets[0].source, PartSource::Proto("sterngriff".into()));
    assert_eq!(targets[2].count.get(), 2);
    assert_eq!(targets[3].count.get(), 3);
    assert_eq!(config.total_object_count(), 19);

    assert!(config.part_path("hammerschraube").is_some());
    assert!(config.part_path("winkel_60x60").is_some());
}

#[test]
fn test_missing_dataset_variable() {
    let env = Environment::new().with_var("AMIRA_DATA_GFX", "/gfx");
    match ResolvedConfig::load(&scenario_path(), &env) {
        Err(ConfigError::UnresolvedVariableError { variable, .. }) => {
            assert_eq!(variable, "AMIRA_DATASETS");
        }
        other => panic!("expected unresolved variable, got {other:?}"),
    }
}

#[test]
fn test_bundled_scenario_roundtrip() {
    let config =
        ResolvedConfig::load_with_overrides(&scenario_path(), &with_tool_cap(), &env()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dumped = config.save(dir.path()).unwrap();

    let reloaded = ResolvedConfig::load(&dumped, &Environment::new()).unwrap();
    assert_eq!(config, reloaded);
}

#[test]
fn test_entry_before_header() {
    let result = ResolvedConfig::from_str_with_env("foo = bar\n[dataset]\n", &env());
    assert!(matches!(
        result,
        Err(ConfigError::SyntaxError { line: 1, .. })
    ));
}

#[test]
fn test_denoising_yes() {
    let overrides = vec![
        with_tool_cap().remove(0),
        Override::new("render_setup", "denoising", "yes"),
    ];
    let result = ResolvedConfig::load_with_overrides(&scenario_path(), &overrides, &env());
    assert!(matches!(
        result,
        Err(ConfigError::TypeCoercionError { ref key, .. }) if key == "denoising"
    ));
}

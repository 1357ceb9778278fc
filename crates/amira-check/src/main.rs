//! Validates a rendering scenario file and prints the resolved configuration.
//!
//! Run with `cargo run -p amira-check -- --config config/panda_table.cfg`.
//! Entries can be overridden, e.g. `--samples 16 --set dataset.image_count=2`.

use std::error::Error;

use amira_config::{CliArgs, Environment, OutputFormat, ResolvedConfig, SceneType};
use clap::Parser;
use tracing::info;

/// Render the configuration in the requested format.
fn render(config: &ResolvedConfig, format: OutputFormat) -> Result<String, Box<dyn Error>> {
    let out = match format {
        OutputFormat::Text => config.to_string(),
        OutputFormat::Ron => config.to_ron()?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
    };
    Ok(out)
}

fn scene_list() -> String {
    let mut out = String::from("List of possible scenes:\n");
    for scene in SceneType::ALL {
        out.push_str(&format!("   {scene}\n"));
    }
    out
}

fn main() {
    let args = CliArgs::parse();
    amira_log::init_logging(args.log_level.as_deref(), None);

    if args.list_scenes {
        print!("{}", scene_list());
        return;
    }

    let Some(path) = args.config.as_deref() else {
        eprintln!("No scenario configuration given, pass --config <PATH>");
        std::process::exit(2);
    };

    let env = Environment::from_process();
    let config = match ResolvedConfig::load_with_overrides(path, &args.overrides(), &env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid scenario configuration {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    info!(
        "{} images of {}x{} from {} camera(s), {} objects per scene",
        config.image_count().unwrap_or_default(),
        config.width().unwrap_or_default(),
        config.height().unwrap_or_default(),
        config.cameras().len(),
        config.total_object_count()
    );

    match render(&config, args.format) {
        Ok(out) => print!("{out}"),
        Err(e) => {
            eprintln!("Failed to render configuration: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
[dataset]
image_count = 2
[camera_info]
width = 320
height = 240
[render_setup]
integrator = PATH
";

    fn config() -> ResolvedConfig {
        ResolvedConfig::from_str_with_env(SCENARIO, &Environment::new()).unwrap()
    }

    #[test]
    fn test_render_text() {
        let out = render(&config(), OutputFormat::Text).unwrap();
        assert!(out.starts_with("[dataset]\nimage_count = 2\n"));
        assert!(out.contains("integrator = PATH"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let out = render(&config(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(parsed.get("camera_info").is_some());
    }

    #[test]
    fn test_render_ron() {
        let out = render(&config(), OutputFormat::Ron).unwrap();
        assert!(out.contains("Integrator(Path)"));
    }

    #[test]
    fn test_scene_list_names_every_scene() {
        let list = scene_list();
        for name in SceneType::NAMES {
            assert!(list.contains(name));
        }
    }

    #[test]
    fn test_loaded_file_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.cfg");
        std::fs::write(&path, SCENARIO).unwrap();
        let config = ResolvedConfig::load(&path, &Environment::new()).unwrap();
        let reparsed = ResolvedConfig::from_str_with_env(
            &render(&config, OutputFormat::Text).unwrap(),
            &Environment::new(),
        )
        .unwrap();
        assert_eq!(config, reparsed);
    }
}

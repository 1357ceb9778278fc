//! Scenario configuration loader for the AMIRA synthetic-data renderer.
//!
//! Reads the INI-like scenario format, expands `$NAME` placeholders from an
//! injected environment, coerces values to their per-key types, checks that
//! target objects only reference declared parts, and hands out an immutable
//! [`ResolvedConfig`]. Also supports CLI overrides via clap and writing the
//! resolved configuration back as text or RON.

mod cli;
mod coerce;
mod config;
mod error;
mod expand;
mod parser;
mod validate;
mod value;

pub use cli::{CliArgs, OutputFormat, Override};
pub use coerce::{ValueKind, coerce_value, kind_of};
pub use config::{DUMP_FILE_NAME, ResolvedConfig, Section, SectionKind, resolve};
pub use error::ConfigError;
pub use expand::{Environment, expand_value};
pub use parser::{Document, RawEntry, RawSection, parse};
pub use validate::REQUIRED_FIELDS;
pub use value::{Integrator, PartReference, PartSource, SceneType, Value};

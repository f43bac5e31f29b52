//! Handler functions for `pgdoc config` subcommands.
//!
//! Implements `path`, `get`, `set`, `init`, and `show` over [`PgdocConfig`],
//! plus the TOML dotted-key helpers they are built on.

use std::io::Write;
use std::path::Path;

use pgdoc_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::{PROJECT_NAME, PgdocConfig};

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand, writing results to `out`.
pub fn handle_config_command(
    config_path: Option<&Path>,
    action: ConfigAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path, out),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key, out),
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value, out),
        ConfigAction::Init { file, force } => {
            cmd_config_init(file.as_deref().or(config_path), force, out)
        }
        ConfigAction::Show => cmd_config_show(config_path, out),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let path = PgdocConfig::resolve_config_path(config_path).ok_or_else(|| {
        Error::config("Could not determine config directory for this platform")
    })?;
    writeln!(out, "{}", path.display())?;
    if !path.exists() {
        eprintln!("(file does not exist, run `{PROJECT_NAME} config init` to create it)");
    }
    Ok(())
}

/// Get a configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&Path>, key: &str, out: &mut impl Write) -> Result<()> {
    let config = PgdocConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    match get_nested_value(&value, key) {
        Some(val) => {
            writeln!(out, "{}", format_toml_value(val))?;
            Ok(())
        }
        None => Err(Error::not_found(format!("key '{key}' in configuration"))),
    }
}

/// Set a configuration value by dotted key in the config file.
///
/// The edited file must still load as a valid configuration, otherwise it
/// is left untouched.
pub fn cmd_config_set(
    config_path: Option<&Path>,
    key: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    let path = PgdocConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if !path.exists() {
        return Err(Error::not_found(format!(
            "config file {}. Run `{PROJECT_NAME} config init` first",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let doc: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    let parsed = parse_value(value);
    let retry_as_string = !parsed.is_str();
    let toml_str = match with_value(&doc, key, parsed) {
        Ok(toml_str) => toml_str,
        // Numeric-looking text is still a valid value for a string key.
        Err(e) if retry_as_string => {
            with_value(&doc, key, toml::Value::String(value.to_string())).map_err(|_| e)?
        }
        Err(e) => return Err(e),
    };
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    log::info!("Updated {key} in {}", path.display());
    writeln!(out, "Set {key} = {value} in {}", path.display())?;
    Ok(())
}

/// Serialize `doc` with `key` set to `value`, if the result is still a valid
/// configuration.
fn with_value(doc: &toml::Value, key: &str, value: toml::Value) -> Result<String> {
    let mut doc = doc.clone();
    let shown = format_toml_value(&value);
    set_nested_value(&mut doc, key, value)?;

    let toml_str = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    PgdocConfig::from_toml_str(&toml_str)
        .map_err(|e| Error::config(format!("Refusing to set {key} = {shown}: {e}")))?;
    Ok(toml_str)
}

/// Create a default configuration file.
pub fn cmd_config_init(file: Option<&Path>, force: bool, out: &mut impl Write) -> Result<()> {
    let path = match file {
        Some(p) => p.to_path_buf(),
        None => PgdocConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = PgdocConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    writeln!(out, "Config file created at {}", path.display())?;
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config_path: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let config = PgdocConfig::load(config_path)?;
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };
    if last.is_empty() {
        return Err(Error::config(format!("Invalid key '{key}'")));
    }

    let mut current = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config("Cannot navigate into a non-table value"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| Error::config("Cannot set key on a non-table value"))?;
    table.insert(last.to_string(), value);
    Ok(())
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool → integer → float → string.
pub fn parse_value(s: &str) -> toml::Value {
    if s == "true" {
        return toml::Value::Boolean(true);
    }
    if s == "false" {
        return toml::Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

use std::fs;
use std::path::Path;

use serde_json::Value;

use abacus_core::QuestionSettings;

use crate::CliError;

/// Settings file formats, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            _ => Err(CliError::InvalidConfig(format!(
                "{} must end in .toml or .json",
                path.display()
            ))),
        }
    }
}

/// Read a settings file. Both formats go through the JSON compatibility
/// shim, so legacy and camelCase field names load from either.
pub fn load_settings(path: &Path) -> Result<QuestionSettings, CliError> {
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;
    parse_settings(&text, format)
}

pub fn parse_settings(text: &str, format: ConfigFormat) -> Result<QuestionSettings, CliError> {
    let value: Value = match format {
        ConfigFormat::Toml => toml::from_str(text)?,
        ConfigFormat::Json => serde_json::from_str(text)?,
    };
    Ok(QuestionSettings::from_json_value(value)?)
}

//! Config file loading and resolution of the effective run configuration.
//!
//! The file uses a small TOML subset: one `key = value` per line, `#`
//! comments, double-quoted strings, integers, and single-line arrays of
//! strings. Values from the file sit between CLI flags (which win) and the
//! built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use harvester_core::download::{MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use harvester_core::{
    DEFAULT_MAX_PARSE_RECOVERIES, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_URL, ExtensionFilter,
    HarvestConfig, HttpTimeouts,
};
use url::Url;

use crate::cli::Args;

/// Upper bound accepted for `max_parse_recoveries`.
const MAX_PARSE_RECOVERIES_LIMIT: usize = 100_000;

/// File-backed defaults for a harvest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Directory downloads are written to.
    pub output_dir: Option<PathBuf>,
    /// Index page to harvest.
    pub page_url: Option<String>,
    /// Extension suffix, or list of suffixes.
    pub extensions: Option<ExtensionFilter>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Malformed-markup recovery bound.
    pub max_parse_recoveries: Option<usize>,
}

impl FileConfig {
    /// Validates config values against the same ranges the CLI enforces.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if let Some(max) = self.max_parse_recoveries
            && !(1..=MAX_PARSE_RECOVERIES_LIMIT).contains(&max)
        {
            bail!(
                "Invalid config value for `max_parse_recoveries`: {max}. Expected range: 1..={MAX_PARSE_RECOVERIES_LIMIT}"
            );
        }

        if let Some(ExtensionFilter::AnyOf(suffixes)) = &self.extensions
            && suffixes.is_empty()
        {
            bail!("Invalid config value for `extensions`: expected at least one suffix");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&value) {
        bail!(
            "Invalid config value for `{field}`: {value}. Expected range: {MIN_TIMEOUT_SECS}..={MAX_TIMEOUT_SECS}"
        );
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/harvester/config.toml`
/// 2. `$HOME/.config/harvester/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("harvester")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("harvester")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file named on the command line, or the default one.
///
/// An explicit path must exist; a missing default file is not an error.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return read_config_file(path).map(Some);
    }
    match resolve_default_config_path() {
        Some(path) if path.exists() => read_config_file(&path).map(Some),
        _ => Ok(None),
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Merges CLI flags, file config and defaults into a [`HarvestConfig`].
pub fn build_harvest_config(args: &Args, file: Option<&FileConfig>) -> Result<HarvestConfig> {
    let file = file.cloned().unwrap_or_default();

    let page_url = args
        .page_url
        .clone()
        .or(file.page_url)
        .unwrap_or_else(|| DEFAULT_PAGE_URL.to_string());
    let page_url =
        Url::parse(&page_url).with_context(|| format!("Invalid start page URL '{page_url}'"))?;

    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let extensions = if args.extensions.is_empty() {
        file.extensions.unwrap_or_default()
    } else {
        ExtensionFilter::from_suffixes(args.extensions.clone())
    };

    let timeouts = HttpTimeouts::from_secs(
        args.connect_timeout.or(file.connect_timeout_secs),
        args.read_timeout.or(file.read_timeout_secs),
    );

    Ok(HarvestConfig::new(page_url, output_dir, extensions)
        .with_timeouts(timeouts)
        .with_max_parse_recoveries(
            file.max_parse_recoveries
                .unwrap_or(DEFAULT_MAX_PARSE_RECOVERIES),
        ))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "page_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `page_url` value on line {line_no}"))?;
                Url::parse(&parsed)
                    .with_context(|| format!("Invalid `page_url` value on line {line_no}"))?;
                cfg.page_url = Some(parsed);
            }
            "extensions" => {
                let parsed = parse_extensions(value)
                    .with_context(|| format!("Invalid `extensions` value on line {line_no}"))?;
                cfg.extensions = Some(parsed);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_no}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            "max_parse_recoveries" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `max_parse_recoveries` value on line {line_no}")
                })?;
                let n = usize::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_parse_recoveries out of range for usize"))?;
                cfg.max_parse_recoveries = Some(n);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    let inner = &raw_value[1..raw_value.len() - 1];
    if inner.contains('"') {
        bail!("Unexpected quote inside string");
    }
    Ok(inner.to_string())
}

/// Parses `".pdf"` or `[".pdf", ".ps"]`.
fn parse_extensions(raw_value: &str) -> Result<ExtensionFilter> {
    let Some(body) = raw_value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return parse_string_literal(raw_value).map(ExtensionFilter::Single);
    };

    let suffixes = body
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_string_literal)
        .collect::<Result<Vec<_>>>()?;
    Ok(ExtensionFilter::AnyOf(suffixes))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

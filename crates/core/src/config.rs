use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{NormalizeError, Result};

/// A dotted path into a row field, e.g. `resource.attributes.service.name`.
/// Segments containing dots are written quoted: `attributes."service.name"`.
/// The first segment names the row field; the rest walk into its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut quoted = false;

        for c in input.chars() {
            match c {
                '"' => quoted = !quoted,
                '.' if !quoted => {
                    if current.is_empty() {
                        return Err(NormalizeError::Config(format!(
                            "empty segment in field path: {input}"
                        )));
                    }
                    segments.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        if quoted {
            return Err(NormalizeError::Config(format!(
                "unterminated quote in field path: {input}"
            )));
        }
        if current.is_empty() {
            return Err(NormalizeError::Config(format!(
                "empty field path: {input}"
            )));
        }
        segments.push(current);
        Ok(Self { segments })
    }

    /// The row field this path starts from.
    pub fn field(&self) -> &str {
        &self.segments[0]
    }

    /// Segments below the row field.
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    /// Walk the full path from a span-shaped object.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root.get(self.field())?;
        for segment in self.rest() {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Walk only the sub-field segments inside an already fetched row value.
    pub fn lookup_rest<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in self.rest() {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            if segment.contains('.') {
                write!(f, "\"{segment}\"")?;
            } else {
                f.write_str(segment)?;
            }
        }
        Ok(())
    }
}

/// Ordered field-path fallback chains for the heterogeneous span/log schemas
/// (DataPrepper/OTel resource attributes, X-Ray-style span attributes, flat
/// Jaeger naming). The defaults encode the observed precedence; a TOML file
/// can override any chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMappings {
    pub service_name: Vec<FieldPath>,
    /// Chain for pre-shaped span objects (hits passthrough); additionally
    /// falls back to the operation name.
    pub span_service_name: Vec<FieldPath>,
    pub start_time: Vec<FieldPath>,
    pub end_time: Vec<FieldPath>,
    pub timestamp: Vec<FieldPath>,
    pub time: Vec<FieldPath>,
    pub duration: Vec<FieldPath>,
    pub scope: Vec<FieldPath>,
}

impl Default for SchemaMappings {
    fn default() -> Self {
        let service_name = parse_chain(&[
            "resource.attributes.service.name",
            "resource.attributes.\"service.name\"",
            "attributes.aws.local.service",
            "attributes.\"aws.local.service\"",
            "serviceName",
        ]);
        let mut span_service_name = service_name.clone();
        span_service_name.push(must_parse("name"));

        Self {
            service_name,
            span_service_name,
            start_time: parse_chain(&["startTimeUnixNano", "startTime"]),
            end_time: parse_chain(&["endTimeUnixNano", "endTime"]),
            timestamp: parse_chain(&["endTimeUnixNano", "@timestamp"]),
            time: parse_chain(&["endTimeUnixNano", "time"]),
            duration: parse_chain(&["durationNano", "durationInNanos"]),
            scope: parse_chain(&["scope", "instrumentationScope"]),
        }
    }
}

impl SchemaMappings {
    /// Defaults merged with the standard override file, if one exists.
    pub fn load() -> Result<Self> {
        let mut mappings = Self::default();
        let path = mappings_file_path();
        if path.exists() {
            let overrides = read_overrides(&path)?;
            apply_overrides(&mut mappings, overrides)?;
        }
        Ok(mappings)
    }

    /// Defaults merged with an explicit override file. Errors if the file is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut mappings = Self::default();
        let overrides = read_overrides(path)?;
        apply_overrides(&mut mappings, overrides)?;
        Ok(mappings)
    }
}

#[derive(Debug, Default, Deserialize)]
struct MappingOverrides {
    service_name: Option<Vec<String>>,
    span_service_name: Option<Vec<String>>,
    start_time: Option<Vec<String>>,
    end_time: Option<Vec<String>>,
    timestamp: Option<Vec<String>>,
    time: Option<Vec<String>>,
    duration: Option<Vec<String>>,
    scope: Option<Vec<String>>,
}

fn mappings_file_path() -> PathBuf {
    if let Ok(path) = env::var("PPLTRACE_MAPPINGS") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("ppltrace/mappings.toml")
}

fn read_overrides(path: &Path) -> Result<MappingOverrides> {
    let raw = fs::read_to_string(path).map_err(|e| {
        NormalizeError::Io(format!("failed to read {}: {e}", path.display()))
    })?;
    toml::from_str(&raw).map_err(|e| {
        NormalizeError::Config(format!("failed to parse {}: {e}", path.display()))
    })
}

fn apply_overrides(mappings: &mut SchemaMappings, overrides: MappingOverrides) -> Result<()> {
    if let Some(chain) = overrides.service_name {
        mappings.service_name = parse_override_chain("service_name", &chain)?;
    }
    if let Some(chain) = overrides.span_service_name {
        mappings.span_service_name = parse_override_chain("span_service_name", &chain)?;
    }
    if let Some(chain) = overrides.start_time {
        mappings.start_time = parse_override_chain("start_time", &chain)?;
    }
    if let Some(chain) = overrides.end_time {
        mappings.end_time = parse_override_chain("end_time", &chain)?;
    }
    if let Some(chain) = overrides.timestamp {
        mappings.timestamp = parse_override_chain("timestamp", &chain)?;
    }
    if let Some(chain) = overrides.time {
        mappings.time = parse_override_chain("time", &chain)?;
    }
    if let Some(chain) = overrides.duration {
        mappings.duration = parse_override_chain("duration", &chain)?;
    }
    if let Some(chain) = overrides.scope {
        mappings.scope = parse_override_chain("scope", &chain)?;
    }
    Ok(())
}

fn parse_override_chain(key: &str, chain: &[String]) -> Result<Vec<FieldPath>> {
    if chain.is_empty() {
        return Err(NormalizeError::Config(format!(
            "mapping chain {key} must not be empty"
        )));
    }
    chain
        .iter()
        .map(|p| {
            FieldPath::parse(p)
                .map_err(|e| NormalizeError::Config(format!("mapping chain {key}: {e}")))
        })
        .collect()
}

fn parse_chain(paths: &[&str]) -> Vec<FieldPath> {
    paths.iter().map(|p| must_parse(p)).collect()
}

fn must_parse(path: &str) -> FieldPath {
    match FieldPath::parse(path) {
        Ok(p) => p,
        Err(_) => unreachable!("built-in field paths are valid"),
    }
}

//! Environment variable substitution for config values.
//!
//! `${VAR_NAME}` references in string values resolve at load time. Only
//! uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to a
//! literal `${VAR}`. Unset or empty variables are an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Matches `${VAR}` and its escaped form `$${VAR}` in one pass.
static VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$?)\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value, MissingEnvVarError> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute using a provided map (useful for testing).
pub fn resolve_env_vars_with(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    walk(value, env, "")
}

fn walk(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| walk(item, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(item, env, &child).map(|resolved| (key.clone(), resolved))
            })
            .collect::<Result<serde_json::Map<_, _>, _>>()
            .map(Value::Object),
        other => Ok(other.clone()),
    }
}

fn substitute(
    input: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    let mut missing: Option<String> = None;
    let result = VAR_PATTERN.replace_all(input, |caps: &regex::Captures| {
        if !caps[1].is_empty() {
            // Escaped form: drop the extra `$`, keep the reference literal.
            return format!("${{{}}}", &caps[2]);
        }
        match env.get(&caps[2]).filter(|v| !v.is_empty()) {
            Some(v) => v.clone(),
            None => {
                missing.get_or_insert_with(|| caps[2].to_string());
                String::new()
            }
        }
    });
    if let Some(var_name) = missing {
        return Err(MissingEnvVarError {
            var_name,
            config_path: path.to_string(),
        });
    }
    Ok(result.into_owned())
}

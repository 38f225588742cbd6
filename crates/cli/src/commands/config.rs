use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use doorstep_core::config::{LoadOptions, SiteConfig};
use toml::Value;

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match SiteConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_path = detect_config_path(config_path.as_deref());
    let doc = load_config_doc(file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "meta.site_name",
        &config.meta.site_name,
        field_source("meta.site_name", None, doc.as_ref(), file_path.as_deref()),
    ));
    lines.push(render_line(
        "meta.tagline",
        &config.meta.tagline,
        field_source("meta.tagline", None, doc.as_ref(), file_path.as_deref()),
    ));
    lines.push(render_line(
        "contact.phone",
        &config.contact.phone,
        field_source("contact.phone", None, doc.as_ref(), file_path.as_deref()),
    ));
    lines.push(render_line(
        "contact.email",
        &config.contact.email,
        field_source("contact.email", None, doc.as_ref(), file_path.as_deref()),
    ));
    lines.push(render_line(
        "estimator.composition",
        &format!("{:?}", config.estimator.composition),
        field_source(
            "estimator.composition",
            Some("DOORSTEP_COMPOSITION"),
            doc.as_ref(),
            file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "estimator.multiplier_floor",
        &config.estimator.multiplier_floor.to_string(),
        field_source(
            "estimator.multiplier_floor",
            Some("DOORSTEP_MULTIPLIER_FLOOR"),
            doc.as_ref(),
            file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source("logging.level", Some("DOORSTEP_LOG_LEVEL"), doc.as_ref(), file_path.as_deref()),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source("logging.format", Some("DOORSTEP_LOG_FORMAT"), doc.as_ref(), file_path.as_deref()),
    ));

    lines.push(format!("  services: {} configured", config.services.len()));
    lines.push(format!("  catalog: {} entries", config.catalog.service_keys().count()));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  [{source}]")
}

fn field_source(
    key: &str,
    env_var: Option<&str>,
    doc: Option<&Value>,
    path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }
    if let (Some(doc), Some(path)) = (doc, path) {
        if doc_has_key(doc, key) {
            return format!("file:{}", path.display());
        }
    }
    "default".to_string()
}

fn doc_has_key(doc: &Value, dotted: &str) -> bool {
    let mut current = doc;
    for part in dotted.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Ok(value) = env::var("DOORSTEP_CONFIG") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            let path = PathBuf::from(trimmed);
            return path.exists().then_some(path);
        }
    }
    let default = PathBuf::from("doorstep.toml");
    default.exists().then_some(default)
}

fn load_config_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

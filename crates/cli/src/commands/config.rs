use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use storefront_core::config::{AppConfig, LoadOptions};
use toml::Value;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        field(
            "catalog.path",
            &["STOREFRONT_CATALOG_PATH"],
            config
                .catalog
                .path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |path| path.display().to_string()),
        ),
        field(
            "catalog.url",
            &["STOREFRONT_CATALOG_URL"],
            config.catalog.url.clone().unwrap_or_else(|| "<unset>".to_string()),
        ),
        field(
            "catalog.fetch_timeout_secs",
            &["STOREFRONT_CATALOG_FETCH_TIMEOUT_SECS"],
            config.catalog.fetch_timeout_secs.to_string(),
        ),
        field(
            "session.min_message_chars",
            &["STOREFRONT_SESSION_MIN_MESSAGE_CHARS"],
            config.session.min_message_chars.to_string(),
        ),
        field(
            "session.complete_message_chars",
            &["STOREFRONT_SESSION_COMPLETE_MESSAGE_CHARS"],
            config.session.complete_message_chars.to_string(),
        ),
        field(
            "session.min_growth_chars",
            &["STOREFRONT_SESSION_MIN_GROWTH_CHARS"],
            config.session.min_growth_chars.to_string(),
        ),
        field(
            "server.bind_address",
            &["STOREFRONT_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        field("server.port", &["STOREFRONT_SERVER_PORT"], config.server.port.to_string()),
        field(
            "server.graceful_shutdown_secs",
            &["STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            config.server.graceful_shutdown_secs.to_string(),
        ),
        field(
            "logging.level",
            &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        field(
            "logging.format",
            &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ]
}

fn field(key_path: &'static str, env_keys: &'static [&'static str], value: String) -> ConfigField {
    ConfigField { key_path, env_keys, value }
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("storefront.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/storefront.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

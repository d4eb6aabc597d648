pub mod config;
pub mod doctor;
pub mod extract;
pub mod filter;
pub mod packet;
pub mod replay;

use std::path::PathBuf;

use serde::Serialize;
use storefront_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use storefront_core::Catalog;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;
pub const EXIT_CATALOG: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    /// Like [`CommandResult::success`], with a structured `data` member.
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_INPUT)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loads configuration and the catalog it points at. `catalog_path` replaces
/// any configured source.
pub(crate) fn load_config_and_catalog(
    command: &str,
    catalog_path: Option<PathBuf>,
) -> Result<(AppConfig, Catalog), CommandResult> {
    let overrides = ConfigOverrides { catalog_path, ..ConfigOverrides::default() };
    let config = AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }).map_err(
        |error| CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG),
    )?;

    let catalog = block_on_catalog(&config).map_err(|message| {
        CommandResult::failure(command, "catalog_unavailable", message, EXIT_CATALOG)
    })?;

    Ok((config, catalog))
}

pub(crate) fn block_on_catalog(config: &AppConfig) -> Result<Catalog, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("failed to initialize async runtime: {error}"))?;

    runtime.block_on(Catalog::from_config(&config.catalog)).map_err(|error| error.to_string())
}

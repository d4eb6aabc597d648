use storefront_core::config::{AppConfig, ConfigError};
use storefront_core::{Catalog, CatalogError};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Catalog::from_config(&config.catalog).await?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        products = catalog.len(),
        categories = catalog.categories().len(),
        "product catalog loaded"
    );

    let state = AppState::new(catalog, config.session);
    Ok(Application { config, state })
}

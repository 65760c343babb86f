//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::viacep::ViaCepClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the single cart store instance, and the address lookup client.
/// It is created once at startup and injected into handlers via axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: CartStore,
    viacep: ViaCepClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let viacep = ViaCepClient::new(&config.viacep);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::seed(),
                cart: CartStore::new(),
                viacep,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the ViaCEP lookup client.
    #[must_use]
    pub fn viacep(&self) -> &ViaCepClient {
        &self.inner.viacep
    }
}

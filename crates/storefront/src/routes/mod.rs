//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /produto/{id}           - Product detail (selection via query params)
//! GET  /produto/{id}/botao     - Add-to-cart button fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns confirmation button,
//!                                triggers cart-updated)
//! POST /cart/remove            - Remove first structural match (returns
//!                                cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/frete             - Shipping quote lookup (fragment)
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/botao", get(products::add_button))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/frete", post(cart::frete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(home::home))
        // Product routes
        .nest("/produto", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
}

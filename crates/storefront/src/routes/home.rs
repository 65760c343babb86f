//! Catalog page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::Product;
use crate::filters;
use crate::state::AppState;

/// Product card display data for the catalog grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.first_image().to_string(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
}

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        products: state.catalog().all().iter().map(Into::into).collect(),
    }
}

//! Product detail route handlers.
//!
//! Selection state (chosen image and size) is carried in the URL, so
//! navigating to a different product naturally resets both to that
//! product's defaults. The chosen color is not stored anywhere: it is
//! derived from the selected image index via the catalog's parallel
//! image/color lists.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use lojinha_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Catalog, Product};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Selection carried in query parameters.
#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    /// Selected image index (defaults to 0).
    pub imagem: Option<usize>,
    /// Selected size label (defaults to the product's first size).
    pub tamanho: Option<String>,
}

/// Thumbnail display data.
#[derive(Clone)]
pub struct ThumbView {
    pub url: String,
    /// Detail-page link selecting this image, preserving the chosen size.
    pub href: String,
    pub selected: bool,
}

/// Size option display data.
#[derive(Clone)]
pub struct SizeOptionView {
    pub value: String,
    pub selected: bool,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub selected_image: String,
    pub selected_color: String,
    pub selected_size: String,
    pub thumbnails: Vec<ThumbView>,
    pub sizes: Vec<SizeOptionView>,
}

/// Add-to-cart button display data, shared by the detail page and the
/// confirmation/revert fragments.
#[derive(Clone)]
pub struct AddButtonView {
    pub product_id: i32,
    pub image_index: usize,
    pub size: String,
    /// Fragment URL that restores the idle button after the confirmation
    /// delay.
    pub revert_href: String,
    pub confirmed: bool,
}

impl AddButtonView {
    fn new(product: &Product, image_index: usize, size: &str, confirmed: bool) -> Self {
        Self {
            product_id: product.id.as_i32(),
            image_index,
            size: size.to_string(),
            revert_href: format!(
                "/produto/{}/botao?imagem={}&tamanho={}",
                product.id,
                image_index,
                urlencoding::encode(size)
            ),
            confirmed,
        }
    }

    /// Idle button for the current selection.
    #[must_use]
    pub fn idle(product: &Product, image_index: usize, size: &str) -> Self {
        Self::new(product, image_index, size, false)
    }

    /// Confirmation state shown right after an add; reverts to idle after a
    /// fixed delay without gating the store mutation.
    #[must_use]
    pub fn confirmed(product: &Product, image_index: usize, size: &str) -> Self {
        Self::new(product, image_index, size, true)
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub button: AddButtonView,
}

/// Add-to-cart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_button.html")]
pub struct AddButtonTemplate {
    pub button: AddButtonView,
}

/// Resolve the raw path segment to a catalog product.
///
/// The identifier arrives as an opaque string; anything that does not parse
/// to a known product id is an explicit not-found state, not a crash.
pub fn resolve<'a>(catalog: &'a Catalog, raw: &str) -> Result<&'a Product> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .and_then(|id| catalog.find(ProductId::new(id)))
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".to_string()))
}

/// Clamp the requested selection to the product's data.
///
/// An out-of-range image index falls back to the default (first image);
/// a missing size falls back to the product's first size.
pub fn effective_selection(product: &Product, query: &SelectionQuery) -> (usize, String) {
    let image_index = query
        .imagem
        .filter(|&i| i < product.images.len())
        .unwrap_or(0);
    let size = query
        .tamanho
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| product.sizes.first().cloned().unwrap_or_default());
    (image_index, size)
}

fn detail_view(product: &Product, image_index: usize, size: &str) -> ProductDetailView {
    let thumbnails = product
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| ThumbView {
            url: url.clone(),
            href: format!(
                "/produto/{}?imagem={}&tamanho={}",
                product.id,
                i,
                urlencoding::encode(size)
            ),
            selected: i == image_index,
        })
        .collect();

    let sizes = product
        .sizes
        .iter()
        .map(|value| SizeOptionView {
            value: value.clone(),
            selected: value == size,
        })
        .collect();

    ProductDetailView {
        id: product.id.as_i32(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.display(),
        selected_image: product
            .images
            .get(image_index)
            .cloned()
            .unwrap_or_default(),
        selected_color: product
            .color_for_image(image_index)
            .unwrap_or_default()
            .to_string(),
        selected_size: size.to_string(),
        thumbnails,
        sizes,
    }
}

/// Display the product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Result<ProductShowTemplate> {
    let product = resolve(state.catalog(), &id)?;
    let (image_index, size) = effective_selection(product, &query);

    Ok(ProductShowTemplate {
        product: detail_view(product, image_index, &size),
        button: AddButtonView::idle(product, image_index, &size),
    })
}

/// Idle add-to-cart button fragment; the confirmation state loads this
/// after its delay to revert.
#[instrument(skip(state))]
pub async fn add_button(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Result<AddButtonTemplate> {
    let product = resolve(state.catalog(), &id)?;
    let (image_index, size) = effective_selection(product, &query);

    Ok(AddButtonTemplate {
        button: AddButtonView::idle(product, image_index, &size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_malformed_and_unknown_ids() {
        let catalog = Catalog::seed();
        assert!(resolve(&catalog, "1").is_ok());
        assert!(resolve(&catalog, " 2 ").is_ok());
        assert!(resolve(&catalog, "999").is_err());
        assert!(resolve(&catalog, "abc").is_err());
        assert!(resolve(&catalog, "1.5").is_err());
        assert!(resolve(&catalog, "").is_err());
    }

    #[test]
    fn test_selection_defaults() {
        let catalog = Catalog::seed();
        let product = resolve(&catalog, "1").expect("product 1");

        let query = SelectionQuery {
            imagem: None,
            tamanho: None,
        };
        let (image_index, size) = effective_selection(product, &query);
        assert_eq!(image_index, 0);
        assert_eq!(size, "38");
    }

    #[test]
    fn test_selection_out_of_range_image_falls_back_to_default() {
        let catalog = Catalog::seed();
        let product = resolve(&catalog, "1").expect("product 1");

        let query = SelectionQuery {
            imagem: Some(99),
            tamanho: Some("40".to_string()),
        };
        let (image_index, size) = effective_selection(product, &query);
        assert_eq!(image_index, 0);
        assert_eq!(size, "40");
    }

    #[test]
    fn test_detail_view_derives_color_from_image_index() {
        let catalog = Catalog::seed();
        let product = resolve(&catalog, "2").expect("product 2");

        for (i, color) in product.colors.iter().enumerate() {
            let view = detail_view(product, i, "M");
            assert_eq!(&view.selected_color, color);
            assert!(view.thumbnails[i].selected);
        }
    }

    #[test]
    fn test_size_links_are_url_encoded() {
        let catalog = Catalog::seed();
        let product = resolve(&catalog, "4").expect("product 4");
        let view = detail_view(product, 0, "Aro 26");
        assert!(view.thumbnails[0].href.contains("tamanho=Aro%2026"));
    }
}

//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with a fragment and fires a `cart-updated`
//! trigger so the header badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use lojinha_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartLineItem, CartStore};
use crate::filters;
use crate::routes::products::{self, AddButtonView, SelectionQuery};
use crate::services::viacep::ViaCepError;
use crate::shipping::{Cep, ShippingQuote};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub color: String,
    pub size: String,
    pub image: String,
    pub price: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.as_i32(),
            name: item.name.clone(),
            color: item.color.clone(),
            size: item.size.clone(),
            image: item.image.clone(),
            price: item.price.display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub count: usize,
}

impl CartView {
    /// Snapshot the store for rendering.
    #[must_use]
    pub fn from_store(store: &CartStore) -> Self {
        let items = store.items();
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            total: store.total().display(),
            count: items.len(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data: product identity plus the current selection.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub imagem: Option<usize>,
    pub tamanho: Option<String>,
}

/// Remove from cart form data: the structural identity of one line item.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
    pub cor: String,
    pub tamanho: String,
    pub imagem: String,
}

/// Shipping quote form data.
#[derive(Debug, Deserialize)]
pub struct FreteForm {
    pub cep: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Add-to-cart response: confirmation button plus an out-of-band toast.
#[derive(Template, WebTemplate)]
#[template(path = "partials/added.html")]
pub struct AddedTemplate {
    pub button: AddButtonView,
    pub toast: String,
}

/// Shipping quote error fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/frete_erro.html")]
pub struct FreteErroTemplate {
    pub message: String,
}

/// Shipping quote fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/frete_quote.html")]
pub struct FreteQuoteTemplate {
    pub quote: ShippingQuote,
}

fn frete_erro(message: &str) -> Response {
    FreteErroTemplate {
        message: message.to_string(),
    }
    .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    CartShowTemplate {
        cart: CartView::from_store(state.cart()),
    }
}

/// Add an item to the cart (HTMX).
///
/// Builds a line-item snapshot from the product and the submitted
/// selection, appends it, and returns the confirmation button (which
/// reverts to idle on its own; the store mutation is already done).
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let query = SelectionQuery {
        imagem: form.imagem,
        tamanho: form.tamanho,
    };

    let Ok(product) = products::resolve(state.catalog(), &form.product_id.to_string()) else {
        return crate::error::AppError::NotFound("Produto não encontrado".to_string())
            .into_response();
    };
    let (image_index, size) = products::effective_selection(product, &query);

    let item = CartLineItem {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        color: product.color_for_image(image_index).unwrap_or_default().to_string(),
        size: size.clone(),
        image: product.images.get(image_index).cloned().unwrap_or_default(),
    };

    tracing::info!(product_id = %product.id, color = %item.color, size = %item.size, "Item added to cart");
    state.cart().add(item);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        AddedTemplate {
            button: AddButtonView::confirmed(product, image_index, &size),
            toast: format!("{} adicionado ao carrinho!", product.name),
        },
    )
        .into_response()
}

/// Remove the first line item structurally equal to the submitted one
/// (HTMX). No match is a no-op, not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> impl IntoResponse {
    if let Some(product) = state.catalog().find(ProductId::new(form.product_id)) {
        let target = CartLineItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            color: form.cor,
            size: form.tamanho,
            image: form.imagem,
        };
        let removed = state.cart().remove(&target);
        tracing::debug!(product_id = %product.id, removed, "Remove from cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(state.cart()),
        },
    )
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> impl IntoResponse {
    state.cart().clear();

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(state.cart()),
        },
    )
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.cart().count(),
    }
}

/// Look up a shipping quote for the submitted CEP (HTMX).
///
/// The lookup is advisory: every failure degrades to an inline message in
/// the fragment, and cart state is never touched.
#[instrument(skip(state))]
pub async fn frete(State(state): State<AppState>, Form(form): Form<FreteForm>) -> Response {
    let Ok(cep) = Cep::parse(&form.cep) else {
        return frete_erro("CEP inválido");
    };

    match state.viacep().lookup(&cep).await {
        Ok(endereco) => FreteQuoteTemplate {
            quote: ShippingQuote::for_endereco(&endereco),
        }
        .into_response(),
        Err(ViaCepError::NotFound(_)) => frete_erro("CEP inválido"),
        Err(e) => {
            tracing::warn!(error = %e, "CEP lookup failed");
            frete_erro("Erro ao consultar o CEP")
        }
    }
}

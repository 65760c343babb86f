//! Static product catalog.
//!
//! Products are defined at build time and never mutated. The catalog is the
//! only source a detail page or a cart snapshot reads product fields from.

use lojinha_core::{CurrencyCode, Price, ProductId};

/// A catalog entry.
///
/// `images` and `colors` are index-aligned: the color at index `i` describes
/// the variant shown by the image at index `i`. This alignment is a catalog
/// data precondition, checked once at construction.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    /// Variant image paths, index-aligned with `colors`.
    pub images: Vec<String>,
    /// Variant color labels, index-aligned with `images`.
    pub colors: Vec<String>,
    /// Available size labels, first entry is the default selection.
    pub sizes: Vec<String>,
}

impl Product {
    /// The image shown on the catalog page and selected by default.
    #[must_use]
    pub fn first_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Color label for the image at `index`, if `index` is in range.
    #[must_use]
    pub fn color_for_image(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }
}

/// The static product catalog.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating the per-product data preconditions.
    ///
    /// # Panics
    ///
    /// Panics if a product has misaligned image/color lists, no images, or
    /// no sizes. Catalog data is compiled in, so this only fires on a bad
    /// edit to [`Catalog::seed`].
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        for product in &products {
            assert_eq!(
                product.images.len(),
                product.colors.len(),
                "product {}: images and colors must be index-aligned",
                product.id
            );
            assert!(
                !product.images.is_empty(),
                "product {}: at least one image is required",
                product.id
            );
            assert!(
                !product.sizes.is_empty(),
                "product {}: at least one size is required",
                product.id
            );
        }
        Self { products }
    }

    /// The built-in store inventory.
    #[must_use]
    pub fn seed() -> Self {
        let brl = |cents| Price::from_cents(cents, CurrencyCode::BRL);
        Self::new(vec![
            Product {
                id: ProductId::new(1),
                name: "Tênis Esportivo".to_string(),
                price: brl(15999),
                description: "Tênis leve e confortável para corrida e uso diário, \
                              com solado de alta aderência."
                    .to_string(),
                images: vec![
                    "/static/produtos/tenis/tenisPreto.png".to_string(),
                    "/static/produtos/tenis/tenisBranco.png".to_string(),
                    "/static/produtos/tenis/tenisAzul.png".to_string(),
                ],
                colors: vec![
                    "Preto".to_string(),
                    "Branco".to_string(),
                    "Azul".to_string(),
                ],
                sizes: vec![
                    "38".to_string(),
                    "39".to_string(),
                    "40".to_string(),
                    "41".to_string(),
                    "42".to_string(),
                ],
            },
            Product {
                id: ProductId::new(2),
                name: "Camisas Formula 1".to_string(),
                price: brl(8999),
                description: "Camisas oficiais das principais equipes da Formula 1, \
                              tecido respirável."
                    .to_string(),
                images: vec![
                    "/static/produtos/camisasf1/redbull.webp".to_string(),
                    "/static/produtos/camisasf1/ferrari.webp".to_string(),
                    "/static/produtos/camisasf1/mercedes.webp".to_string(),
                ],
                colors: vec![
                    "Azul".to_string(),
                    "Vermelho".to_string(),
                    "Preto".to_string(),
                ],
                sizes: vec![
                    "P".to_string(),
                    "M".to_string(),
                    "G".to_string(),
                    "GG".to_string(),
                ],
            },
            Product {
                id: ProductId::new(3),
                name: "Boné Casual".to_string(),
                price: brl(3999),
                description: "Boné casual com ajuste traseiro, combina com qualquer look."
                    .to_string(),
                images: vec![
                    "/static/produtos/bones/boneAzul.webp".to_string(),
                    "/static/produtos/bones/bonePreto.webp".to_string(),
                ],
                colors: vec!["Azul".to_string(), "Preto".to_string()],
                sizes: vec!["Único".to_string()],
            },
            Product {
                id: ProductId::new(4),
                name: "Bicicleta".to_string(),
                price: brl(29999),
                description: "Bicicleta urbana com quadro em aço e câmbio de 21 marchas."
                    .to_string(),
                images: vec![
                    "/static/produtos/bicicletas/biciPreta.webp".to_string(),
                    "/static/produtos/bicicletas/biciVermelha.webp".to_string(),
                ],
                colors: vec!["Preta".to_string(), "Vermelha".to_string()],
                sizes: vec!["Aro 26".to_string(), "Aro 29".to_string()],
            },
        ])
    }

    /// Resolve a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products, catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_resolves_known_ids() {
        let catalog = Catalog::seed();
        let product = catalog.find(ProductId::new(1)).expect("product 1 exists");
        assert_eq!(product.name, "Tênis Esportivo");
        assert_eq!(product.price.display(), "R$ 159.99");
    }

    #[test]
    fn test_find_returns_none_for_unknown_id() {
        let catalog = Catalog::seed();
        assert!(catalog.find(ProductId::new(999)).is_none());
        assert!(catalog.find(ProductId::new(-1)).is_none());
    }

    #[test]
    fn test_color_is_derived_from_image_index() {
        // selecting image i must always yield colors[i], for every valid i
        let catalog = Catalog::seed();
        for product in catalog.all() {
            for (i, color) in product.colors.iter().enumerate() {
                assert_eq!(product.color_for_image(i), Some(color.as_str()));
            }
            assert_eq!(product.color_for_image(product.images.len()), None);
        }
    }

    #[test]
    fn test_seed_has_the_four_store_products() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.all().len(), 4);
        let names: Vec<_> = catalog.all().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Tênis Esportivo", "Camisas Formula 1", "Boné Casual", "Bicicleta"]
        );
    }

    #[test]
    #[should_panic(expected = "index-aligned")]
    fn test_misaligned_color_list_is_rejected() {
        let product = Product {
            id: ProductId::new(9),
            name: "Meia".to_string(),
            price: Price::from_cents(999, CurrencyCode::BRL),
            description: String::new(),
            images: vec!["/static/produtos/meia.png".to_string()],
            colors: vec![],
            sizes: vec!["Único".to_string()],
        };
        let _ = Catalog::new(vec![product]);
    }
}

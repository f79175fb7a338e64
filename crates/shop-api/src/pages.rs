//! # Page Templates
//!
//! Server-rendered HTML for the storefront pages.

use shop_core::{CatalogPage, ProductDisplay, ProductPage, Storefront};

/// Buy button behavior: one request at a time, alert and re-enable on failure.
const BUY_BUTTON_SCRIPT: &str = r#"<script>
(function () {
    var button = document.getElementById('buy-button');
    if (!button) { return; }
    var isCreatingCheckoutSession = false;

    button.addEventListener('click', async function () {
        if (isCreatingCheckoutSession) { return; }
        isCreatingCheckoutSession = true;
        button.disabled = true;

        try {
            var response = await fetch('/api/checkout', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ priceId: button.dataset.priceId })
            });
            if (!response.ok) { throw new Error('checkout ' + response.status); }
            var data = await response.json();
            window.location.href = data.checkoutUrl;
        } catch (err) {
            isCreatingCheckoutSession = false;
            button.disabled = false;
            alert(button.dataset.errorMessage);
        }
    });
})();
</script>"#;

const STYLES: &str = r#"<style>
    body { margin: 0; background: #121214; color: #e1e1e6; font-family: Roboto, system-ui, sans-serif; }
    .site-header { padding: 2rem 0; width: 100%; max-width: 1180px; margin: 0 auto; }
    .site-header a { color: #00875f; font-weight: bold; font-size: 1.5rem; text-decoration: none; }
    .product-grid { display: flex; gap: 3rem; max-width: 1180px; margin: 0 auto; overflow-x: auto; }
    .product-card { background: linear-gradient(180deg, #1ea483 0%, #7465d4 100%); border-radius: 8px; min-width: 520px; position: relative; }
    .product-card img { object-fit: cover; width: 520px; height: 480px; }
    .product-card footer { position: absolute; bottom: 0.25rem; left: 0.25rem; right: 0.25rem; padding: 2rem; border-radius: 6px; display: flex; justify-content: space-between; background: rgba(0, 0, 0, 0.6); }
    .product-detail { display: grid; grid-template-columns: 1fr 1fr; gap: 4rem; max-width: 1180px; margin: 0 auto; }
    .product-detail .price { font-size: 2rem; color: #00b37e; display: block; margin-top: 1rem; }
    .product-detail button { margin-top: 3rem; width: 100%; background: #00875f; border: 0; color: #fff; border-radius: 8px; padding: 1.25rem; cursor: pointer; font-weight: bold; }
    .product-detail button:disabled { opacity: 0.6; cursor: not-allowed; }
    .notice { max-width: 560px; margin: 4rem auto; text-align: center; }
    .notice a { color: #00875f; }
</style>"#;

/// Wrap page content in the shared layout
pub fn render_layout(title: &str, storefront: &Storefront, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    {styles}
</head>
<body>
    <header class="site-header">
        <a href="/">{store}</a>
    </header>
    <main>
        {body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        styles = STYLES,
        store = html_escape(&storefront.name),
        body = body,
    )
}

/// Render the catalog listing page
pub fn render_catalog(page: &CatalogPage, storefront: &Storefront) -> String {
    let cards: String = page.products.iter().map(render_product_card).collect();

    let body = format!(
        r#"<section class="product-grid" data-section="catalog">
        {}
    </section>"#,
        cards
    );

    render_layout(&format!("Home | {}", storefront.name), storefront, &body)
}

fn render_product_card(product: &ProductDisplay) -> String {
    format!(
        r#"<a class="product-card" href="/products/{id}" data-product-id="{id}">
            <img src="{image}" alt="{name}" width="520" height="480" loading="lazy">
            <footer>
                <strong>{name}</strong>
                <span>{price}</span>
            </footer>
        </a>"#,
        id = html_escape(&product.id),
        image = html_escape(&product.image_url),
        name = html_escape(&product.name),
        price = html_escape(&product.formatted_price),
    )
}

/// Render a product detail page with its buy button
pub fn render_product(page: &ProductPage, storefront: &Storefront) -> String {
    let product = &page.product;

    let body = format!(
        r#"<section class="product-detail" data-product-id="{id}">
        <div class="image-container">
            <img src="{image}" alt="{name}" width="520" height="480">
        </div>
        <div class="details">
            <h1>{name}</h1>
            <span class="price">{price}</span>
            <p>{description}</p>
            <button id="buy-button" type="button" data-price-id="{price_id}" data-error-message="{error_message}">
                Comprar agora
            </button>
        </div>
    </section>
    {script}"#,
        id = html_escape(&product.id),
        image = html_escape(&product.image_url),
        name = html_escape(&product.name),
        price = html_escape(&product.formatted_price),
        description = html_escape(&product.description),
        price_id = html_escape(&product.default_price_id),
        error_message = html_escape(&storefront.checkout_error_message),
        script = BUY_BUTTON_SCRIPT,
    );

    render_layout(
        &format!("{} | {}", product.name, storefront.name),
        storefront,
        &body,
    )
}

/// Render the page Stripe sends the shopper to after paying
pub fn render_success(storefront: &Storefront) -> String {
    let body = r#"<section class="notice">
        <h1>Compra efetuada!</h1>
        <p>Obrigado pela compra. Você receberá a confirmação por e-mail.</p>
        <a href="/">Voltar ao catálogo</a>
    </section>"#;

    render_layout(&format!("Compra efetuada | {}", storefront.name), storefront, body)
}

/// Render the page shown when the catalog cannot be generated
pub fn render_unavailable(storefront: &Storefront) -> String {
    let body = r#"<section class="notice">
        <h1>Loja indisponível</h1>
        <p>Não foi possível carregar os produtos. Tente novamente em instantes.</p>
    </section>"#;

    render_layout(&storefront.name, storefront, body)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::{Currency, Price};
    use std::time::Duration;

    fn display(name: &str) -> ProductDisplay {
        let price = Price::from_minor(7990, Currency::BRL);
        ProductDisplay {
            id: "prod_1".to_string(),
            name: name.to_string(),
            description: "Algodão orgânico".to_string(),
            image_url: "https://files.stripe.com/links/front.png".to_string(),
            price,
            formatted_price: price.display(),
            default_price_id: "price_1".to_string(),
        }
    }

    #[test]
    fn test_catalog_lists_cards() {
        let page = CatalogPage {
            products: vec![display("Camiseta Explorer")],
            revalidate: Duration::from_secs(60),
        };
        let html = render_catalog(&page, &Storefront::default());

        assert!(html.contains(r#"href="/products/prod_1""#));
        assert!(html.contains("Camiseta Explorer"));
        assert!(html.contains("R$ 79,90"));
        assert!(html.contains("<title>Home | Ignite Shop</title>"));
    }

    #[test]
    fn test_product_page_has_buy_button() {
        let page = ProductPage {
            product: display("Camiseta Explorer"),
            revalidate: Duration::from_secs(60),
        };
        let html = render_product(&page, &Storefront::default());

        assert!(html.contains(r#"data-price-id="price_1""#));
        assert!(html.contains("Algodão orgânico"));
        assert!(html.contains("Falha ao redirecionar ao checkout!"));
        assert!(html.contains("fetch('/api/checkout'"));
    }

    #[test]
    fn test_escapes_provider_text() {
        let page = ProductPage {
            product: display("<script>alert(1)</script>"),
            revalidate: Duration::from_secs(60),
        };
        let html = render_product(&page, &Storefront::default());

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"a & "b" <c>"#), "a &amp; &quot;b&quot; &lt;c&gt;");
        assert_eq!(html_escape("it's"), "it&#39;s");
    }
}

//! # Ignite Shop
//!
//! Storefront server backed by the Stripe catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export NEXT_URL=http://localhost:3000
//!
//! # Run the server
//! ignite-shop
//! ```

use shop_api::{prerender, routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Storefront: {}", state.storefront.name);
    info!("Catalog provider: {}", state.provider.provider_name());

    if state.config.prerender {
        prerender(&state)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to prerender catalog: {}", e))?;
    }

    let app = routes::create_router(state);

    info!("🛍  Ignite Shop starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("💳 Checkout: POST http://{}/api/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛍  Ignite Shop 🛍
  ━━━━━━━━━━━━━━━━━━
  Storefront server
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

use std::sync::Arc;

use checkout_client::StorefrontClient;
use checkout_core::application::cart_store::{CartStore, ClearStrategy};
use checkout_core::config::Config;
use checkout_types::ports::session::StaticSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for CHECKOUT_* variables when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let token = std::env::var("CHECKOUT_TOKEN")
        .map_err(|_| anyhow::anyhow!("CHECKOUT_TOKEN must be set"))?;
    let user_id: i64 = std::env::var("CHECKOUT_USER_ID")
        .map_err(|_| anyhow::anyhow!("CHECKOUT_USER_ID must be set"))?
        .parse()?;

    let client = StorefrontClient::new(&config.api_url)?;
    let session = Arc::new(StaticSession::new(token.clone(), user_id));
    let mut store = CartStore::new(client.clone(), session.clone(), ClearStrategy::Bulk);

    store.fetch_cart().await?;
    match store.cart() {
        Some(cart) if !cart.is_empty() => {
            tracing::info!(cart_id = cart.id, "cart fetched");
            for item in &cart.items {
                println!(
                    "{:>3} x {} @ {:.2}",
                    item.quantity, item.product.name, item.product.price
                );
            }
            println!("total: {:.2}", store.total_price());
        }
        _ => println!("cart is empty"),
    }

    let orders = client.list_my_orders(&token).await?;
    println!("{} past order(s)", orders.len());
    Ok(())
}

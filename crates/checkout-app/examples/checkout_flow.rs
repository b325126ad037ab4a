///  To run :
///  cargo r --example checkout_flow
///
/// Drives the whole checkout flow against a mock backend: fetch cart,
/// add an item, start a gateway payment, and reconcile the success
/// callback into a finalized order.
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use checkout_client::StorefrontClient;
use checkout_core::application::cart_store::{CartStore, ClearStrategy};
use checkout_core::application::payment_bridge::{PaymentBridge, PaymentPhase};
use checkout_core::config::Config;
use checkout_types::domain::order::DeliveryDetails;
use checkout_types::ports::session::StaticSession;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/cart/user/1");
        then.status(200).json_body(json!({
            "id": 4,
            "items": [
                { "id": 9, "product": { "id": 42, "name": "Widget", "price": 125.0 }, "quantity": 2 }
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/cartItem/add");
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/orders/pay");
        then.status(200).json_body(json!({
            "amount": 250.0,
            "totalAmount": 250.0,
            "transactionId": "TXN-1",
            "productCode": "EPAYTEST",
            "signature": "sig"
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/orders/payment-success");
        then.status(201).json_body(json!({}));
    });

    let config = Config {
        api_url: server.base_url(),
        gateway_url: "https://pay.example.com/form".into(),
        success_url: "http://localhost:3000/payment-success".into(),
        failure_url: "http://localhost:3000/payment-failure".into(),
    };
    let client = StorefrontClient::new(&config.api_url)?;
    let session = Arc::new(StaticSession::new("demo-token", 1));
    let mut store = CartStore::new(client.clone(), session.clone(), ClearStrategy::Bulk);
    let mut bridge = PaymentBridge::new(client, session, &config);

    store.add_item(42, 2).await?;
    let cart = store.cart().expect("cart was just fetched");
    println!("cart {} holds {} line(s), total {:.2}", cart.id, cart.items.len(), store.total_price());

    let delivery = DeliveryDetails {
        drop_location: "Hostel Gate".into(),
        landmark: "Clock Tower".into(),
        contact_number: "9800000000".into(),
    };
    let form = bridge.start_payment(&store, delivery).await?;
    println!("redirecting to {} with:", form.action);
    for (name, value) in form.fields() {
        println!("  {name} = {value}");
    }

    // The processor takes over here; simulate its success redirect.
    let callback_payload = STANDARD.encode(
        r#"{"transaction_uuid":"TXN-1","total_amount":"250.00","status":"COMPLETE","product_code":"EPAYTEST","signature":"sig"}"#,
    );
    let callback = bridge.success_return(&mut store, &callback_payload).await?;
    println!(
        "payment {} finalized, status {:?}",
        callback.transaction_uuid,
        callback.status.as_deref().unwrap_or("UNKNOWN")
    );
    assert_eq!(bridge.phase(), PaymentPhase::Finalized);
    assert!(store.cart().expect("cart still loaded").items.is_empty());
    println!("cart cleared, order committed");
    Ok(())
}

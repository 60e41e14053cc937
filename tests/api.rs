mod helpers;

use helpers::{setup::spawn_app, updates};

#[actix_web::test]
async fn test_status_ok() {
    let app = spawn_app().await;
    let res = reqwest::get(format!("{}/", app.address))
        .await
        .expect("Expected status endpoint to respond");
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_webhook_handles_updates() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/telegram/updates", app.address))
        .json(&updates::text(42, "/start"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let reply = app.messenger.last_sent_to(42).expect("Expected a reply");
    assert!(reply.text.contains("/timezone"));
    let chat = app.ctx.repos.chats.find(42).await.unwrap().unwrap();
    assert_eq!(chat.name, "Marlin");
    assert!(chat.timezone.is_none());
}

#[actix_web::test]
async fn test_webhook_rejects_malformed_updates() {
    let app = spawn_app().await;
    let res = reqwest::Client::new()
        .post(format!("{}/telegram/updates", app.address))
        .body("{\"update_id\": \"one\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

//! Inbound side of the bot: update decoding, the action router and the
//! webhook Telegram can push updates to.

mod commands;
pub mod router;

use crate::error::DoryError;
use actix_web::{web, HttpRequest, HttpResponse};
use dory_reminder_infra::{telegram::Update, DoryContext};
use router::handle_update;

const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

fn check_secret_token(http_req: &HttpRequest, ctx: &DoryContext) -> Result<(), DoryError> {
    let expected = match &ctx.config.telegram_webhook_secret {
        Some(secret) => secret,
        None => return Ok(()),
    };
    let provided = http_req
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(DoryError::Unauthorized(
            "Invalid secret token provided".into(),
        )),
        None => Err(DoryError::Unauthorized(format!(
            "Missing the `{}` header",
            SECRET_TOKEN_HEADER
        ))),
    }
}

async fn receive_update_controller(
    http_req: HttpRequest,
    ctx: web::Data<DoryContext>,
    body: web::Bytes,
) -> Result<HttpResponse, DoryError> {
    check_secret_token(&http_req, &ctx)?;

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| DoryError::BadClientData(format!("Malformed update: {}", e)))?;
    handle_update(&ctx, &update).await;

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/telegram/updates",
        web::post().to(receive_update_controller),
    );
}

use dory_reminder_infra::telegram::{CallbackQuery, Message, TelegramChat, Update, User};
use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_UPDATE_ID: AtomicI64 = AtomicI64::new(1);

fn next_id() -> i64 {
    NEXT_UPDATE_ID.fetch_add(1, Ordering::Relaxed)
}

fn private_message(user_id: i64, text: &str) -> Message {
    Message {
        message_id: next_id(),
        from: Some(User {
            id: user_id,
            is_bot: false,
            first_name: "Marlin".into(),
            username: Some("marlin".into()),
        }),
        chat: TelegramChat {
            id: user_id,
            kind: "private".into(),
            title: None,
            username: Some("marlin".into()),
            first_name: Some("Marlin".into()),
            last_name: None,
        },
        text: Some(text.into()),
        reply_to_message: None,
    }
}

/// A private chat message, the chat id equals the user id
pub fn text(user_id: i64, text: &str) -> Update {
    Update {
        update_id: next_id(),
        message: Some(private_message(user_id, text)),
        callback_query: None,
    }
}

/// An inline button pressed in a private chat
pub fn button(user_id: i64, data: &str) -> Update {
    let message = private_message(user_id, "menu");
    Update {
        update_id: next_id(),
        message: None,
        callback_query: Some(CallbackQuery {
            id: format!("cb-{}", next_id()),
            from: message.from.clone().unwrap(),
            message: Some(message),
            data: Some(data.into()),
        }),
    }
}

mod chat;
pub mod date;
pub mod input;
pub mod recurrence;
mod reminder;
mod session;
mod shared;
pub mod wizard;

pub use chat::{Chat, ChatKind, InvalidChatKindError, InvalidTimezoneError};
pub use reminder::{
    text_fits, weekday_from_index, InvalidReminderError, InvalidRepeatError, Reminder, Repeat,
    RepeatKind, MAX_TEXT_LEN,
};
pub use session::{
    InvalidReminderKindError, ReminderKind, Session, SessionDate, SessionKey, WizardStep,
};
pub use shared::entity::Entity;

use crate::shared::entity::Entity;
use chrono::prelude::*;
use chrono_tz::Tz;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
            Self::Supergroup => "supergroup",
            Self::Channel => "channel",
        }
    }

    /// Group chats only see messages that mention or reply to the bot
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown chat kind: `{0}`")]
pub struct InvalidChatKindError(String);

impl FromStr for ChatKind {
    type Err = InvalidChatKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            "supergroup" => Ok(Self::Supergroup),
            "channel" => Ok(Self::Channel),
            _ => Err(InvalidChatKindError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown timezone: `{0}`")]
pub struct InvalidTimezoneError(pub String);

/// A chat the bot has seen. Its timezone is the owner timezone of every
/// reminder in the chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    /// Title for groups, full name for private chats
    pub name: String,
    pub username: Option<String>,
    pub timezone: Option<Tz>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Chat {
    pub fn new(id: i64, kind: ChatKind, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            name,
            username: None,
            timezone: None,
            created: now,
            updated: now,
        }
    }

    pub fn set_timezone(&mut self, timezone: &str) -> Result<(), InvalidTimezoneError> {
        match timezone.trim().parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = Some(tzid);
                Ok(())
            }
            Err(_) => Err(InvalidTimezoneError(timezone.to_string())),
        }
    }

    /// The timezone used for wall clock math, UTC until one is configured
    pub fn timezone_or_utc(&self) -> Tz {
        self.timezone.unwrap_or(chrono_tz::UTC)
    }
}

impl Entity<i64> for Chat {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_sets_valid_timezone() {
        let mut chat = Chat::new(1, ChatKind::Private, "Dory".into(), Utc::now());
        assert_eq!(chat.timezone_or_utc(), chrono_tz::UTC);
        assert!(chat.set_timezone(" Europe/Moscow ").is_ok());
        assert_eq!(chat.timezone, Some(chrono_tz::Europe::Moscow));
    }

    #[test]
    fn it_rejects_unknown_timezone() {
        let mut chat = Chat::new(1, ChatKind::Group, "Team".into(), Utc::now());
        assert_eq!(
            chat.set_timezone("Mars/Olympus"),
            Err(InvalidTimezoneError("Mars/Olympus".into()))
        );
        assert!(chat.timezone.is_none());
    }

    #[test]
    fn it_parses_chat_kinds() {
        for kind in [
            ChatKind::Private,
            ChatKind::Group,
            ChatKind::Supergroup,
            ChatKind::Channel,
        ] {
            assert_eq!(kind.as_str().parse::<ChatKind>(), Ok(kind));
        }
        assert!("bot".parse::<ChatKind>().is_err());
        assert!(ChatKind::Supergroup.is_group());
        assert!(!ChatKind::Private.is_group());
    }
}

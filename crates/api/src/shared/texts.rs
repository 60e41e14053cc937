//! Everything the bot says to its users.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dory_reminder_domain::{date::format_date_time, input::weekday_name, wizard::Prompt, Reminder, Repeat};

pub const WELCOME: &str = "🤖 Dory Reminder Bot\n\nHi! I create reminders and deliver them on time.";
pub const WELCOME_NO_TZ: &str =
    "Hi! I am a reminder bot. 🌍\n\nFirst set your timezone with the /timezone command.";
pub const HELP: &str = "Commands:\n\n\
/help - this help\n\
/add - add a reminder\n\
/list - list reminders\n\
/edit <n> [HH:MM] <text> - edit a reminder\n\
/delete <n> - delete a reminder\n\
/pause <n> - pause a reminder\n\
/resume <n> - resume a reminder\n\
/timezone - set the timezone";
pub const HELP_MAIN_MENU: &str =
    "🤖 Dory Reminder Bot\n\nHi! I create reminders and deliver them on time.\n\nPick a help section:";
pub const HELP_LIST: &str = "📋 /list shows your reminders with their numbers, next delivery time and repeat policy.";
pub const HELP_MANAGE: &str = "⚙️ Use the number shown by /list:\n\n\
/edit 2 08:30 New text - change the text and time\n\
/edit 2 New text - change only the text\n\
/delete 2 - delete\n\
/pause 2 - stop deliveries\n\
/resume 2 - deliver again";

pub const CHOOSE_KIND: &str = "Choose the reminder type:";
pub const SET_TIMEZONE_PROMPT: &str =
    "🌍 Enter your timezone in IANA format (for example Europe/Moscow, America/New_York, Asia/Tokyo):";
pub const UNKNOWN_TIMEZONE: &str = "❌ Unknown timezone. Use the IANA format, for example Europe/Moscow, America/New_York, Asia/Tokyo. \
Supported zones: https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";
pub const TIMEZONE_MISSING: &str = "🌍 Set your timezone with /timezone before adding reminders.";

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";
pub const CREATE_FAILED: &str = "Failed to create the reminder.";
pub const NO_REMINDERS: &str = "No reminders yet.";
pub const WRONG_NUMBER: &str = "Enter a valid reminder number from the list.";
pub const NO_SUCH_REMINDER: &str = "There is no reminder with this number.";
pub const UNKNOWN_WEEKDAY: &str = "Unknown weekday.";
pub const EDIT_USAGE: &str = "Usage: /edit <n> [HH:MM] <text>";
pub const TEXT_TOO_LONG: &str = "The reminder text is too long, keep it under 4000 characters.";

pub fn prompt(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::ChooseKind => CHOOSE_KIND,
        Prompt::EnterTime => "Enter the time as HH:MM, for example 09:30",
        Prompt::EnterText => "Enter the reminder text",
        Prompt::ShorterText => TEXT_TOO_LONG,
        Prompt::EnterWeekday => "Choose the weekday or type its name, for example monday",
        Prompt::EnterDayOfMonth => "Enter the day of month (1-31)",
        Prompt::EnterDayMonth => "Enter the date as DD.MM, for example 13.06",
        Prompt::EnterStartDate => "Enter the first date as DD.MM.YYYY, for example 13.06.2025",
        Prompt::EnterInterval => "Every how many days? Enter a number, for example 3",
        Prompt::EnterDateTime => "Enter the date and time as DD.MM.YYYY HH:MM, for example 13.06.2025 15:30",
    }
}

pub fn describe_repeat(repeat: &Repeat) -> String {
    match repeat {
        Repeat::None => "once".into(),
        Repeat::Daily => "daily".into(),
        Repeat::Weekly { weekday } => {
            format!("weekly ({})", weekday_name(weekday.num_days_from_sunday()))
        }
        Repeat::Monthly { day } => format!("monthly (day {})", day),
        Repeat::EveryNDays { interval } => format!("every {} days", interval),
        Repeat::Yearly { day, month } => format!("yearly ({:02}.{:02})", day, month),
    }
}

pub fn format_next_time(next_time: &DateTime<Utc>, tz: &Tz) -> String {
    format_date_time(&next_time.with_timezone(tz))
}

pub fn reminder_created(reminder: &Reminder, tz: &Tz) -> String {
    format!(
        "✅ Reminder created: {}\nNext: {} ({})",
        reminder.text,
        format_next_time(&reminder.next_time, tz),
        describe_repeat(&reminder.repeat)
    )
}

pub fn timezone_set(tz: &Tz) -> String {
    format!("✅ Timezone set to {}", tz.name())
}

/// What the chat receives when a reminder fires
pub fn delivery(text: &str) -> String {
    format!("⏰ {}", text)
}

pub fn reminder_deleted(number: usize) -> String {
    format!("🗑 Reminder {} deleted.", number)
}

pub fn reminder_paused(number: usize, paused: bool) -> String {
    if paused {
        format!("⏸ Reminder {} paused.", number)
    } else {
        format!("▶️ Reminder {} resumed.", number)
    }
}

pub fn reminder_edited(number: usize, reminder: &Reminder, tz: &Tz) -> String {
    format!(
        "✏️ Reminder {} updated: {}\nNext: {}",
        number,
        reminder.text,
        format_next_time(&reminder.next_time, tz)
    )
}

pub fn list_header(page: usize, total_pages: usize) -> String {
    if total_pages > 1 {
        format!("📋 Reminders (page {}/{}):", page + 1, total_pages)
    } else {
        "📋 Reminders:".to_string()
    }
}

pub fn reminder_line(number: usize, reminder: &Reminder, tz: &Tz) -> String {
    let paused = if reminder.paused { " ⏸ paused" } else { "" };
    format!(
        "{}. {}\n    {}, {}{}",
        number,
        reminder.text,
        format_next_time(&reminder.next_time, tz),
        describe_repeat(&reminder.repeat),
        paused
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn describes_every_repeat_policy() {
        assert_eq!(describe_repeat(&Repeat::None), "once");
        assert_eq!(describe_repeat(&Repeat::weekly(1).unwrap()), "weekly (monday)");
        assert_eq!(describe_repeat(&Repeat::monthly(5).unwrap()), "monthly (day 5)");
        assert_eq!(describe_repeat(&Repeat::every_n_days(3).unwrap()), "every 3 days");
        assert_eq!(describe_repeat(&Repeat::yearly(1, 6).unwrap()), "yearly (01.06)");
    }

    #[test]
    fn formats_next_time_in_chat_timezone() {
        let next = Utc.with_ymd_and_hms(2025, 6, 2, 6, 0, 0).unwrap();
        assert_eq!(
            format_next_time(&next, &chrono_tz::Europe::Moscow),
            "02.06.2025 09:00"
        );
        assert_eq!(delivery("take pill"), "⏰ take pill");
    }

    #[test]
    fn list_lines_show_paused_marker() {
        let next = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut reminder = Reminder::new(1, 2, "water plants".into(), next, Repeat::Daily, next);
        assert_eq!(
            reminder_line(3, &reminder, &chrono_tz::UTC),
            "3. water plants\n    02.06.2025 09:00, daily"
        );
        reminder.paused = true;
        assert!(reminder_line(3, &reminder, &chrono_tz::UTC).ends_with("⏸ paused"));
        assert_eq!(list_header(0, 1), "📋 Reminders:");
        assert_eq!(list_header(1, 3), "📋 Reminders (page 2/3):");
    }
}

use dory_reminder_domain::ReminderKind;
use dory_reminder_infra::telegram::{InlineButton, InlineKeyboard};

fn kind_label(kind: ReminderKind) -> &'static str {
    match kind {
        ReminderKind::Today => "Today",
        ReminderKind::Tomorrow => "Tomorrow",
        ReminderKind::Daily => "Every day",
        ReminderKind::Weekly => "Once a week",
        ReminderKind::EveryNDays => "Every few days",
        ReminderKind::Monthly => "Once a month",
        ReminderKind::Yearly => "Once a year",
        ReminderKind::OnDate => "Pick a date",
    }
}

/// Two kinds per row
pub fn kind_menu() -> InlineKeyboard {
    let buttons = ReminderKind::all()
        .into_iter()
        .map(|kind| InlineButton::new(kind_label(kind), format!("add_{}", kind.token())))
        .collect::<Vec<_>>();
    InlineKeyboard::new(buttons.chunks(2).map(|row| row.to_vec()).collect())
}

/// Monday first, the callback carries the index where 0 is Sunday
pub fn weekday_menu() -> InlineKeyboard {
    let days = [
        ("Mon", 1),
        ("Tue", 2),
        ("Wed", 3),
        ("Thu", 4),
        ("Fri", 5),
        ("Sat", 6),
        ("Sun", 0),
    ];
    let buttons = days
        .iter()
        .map(|(label, index)| InlineButton::new(*label, format!("weekday_{}", index)))
        .collect::<Vec<_>>();
    InlineKeyboard::new(vec![buttons[..4].to_vec(), buttons[4..].to_vec()])
}

pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![InlineButton::new("➕ Add a reminder", "help_add")],
        vec![InlineButton::new("📋 List reminders", "help_list")],
        vec![InlineButton::new("⚙️ Manage", "help_manage")],
    ])
}

/// Previous and next page buttons around the zero based `page`, `None`
/// when everything fits on one page
pub fn page_navigation(page: usize, total_pages: usize) -> Option<InlineKeyboard> {
    let mut row = Vec::new();
    if page > 0 {
        row.push(InlineButton::new("⬅️ Prev", format!("rem_page_{}", page - 1)));
    }
    if page + 1 < total_pages {
        row.push(InlineButton::new("Next ➡️", format!("rem_page_{}", page + 1)));
    }
    if row.is_empty() {
        None
    } else {
        Some(InlineKeyboard::new(vec![row]))
    }
}

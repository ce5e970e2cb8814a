use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::item::{CheckupStatus, Item, ItemKind};
use crate::core::recurrence::Frequency;
use crate::core::reminder::Reminder;
use crate::core::session::Session;

#[derive(Debug, Clone)]
pub enum Message {
    // Session lifecycle
    SessionRestored(Option<Session>),
    EmailInput(String),
    PasswordInput(String),
    SubmitSignIn,
    SubmitSignUp,
    SignInCompleted(Result<Session, String>),
    SignUpCompleted(Result<Option<Session>, String>),
    SignOut,
    SignedOut,

    // Data loading & change feed
    DataLoaded(Result<(Vec<Item>, Vec<Reminder>), String>),
    PollTick,
    SnapshotFetched(Result<(Vec<Item>, Vec<Reminder>), String>),

    // Item CRUD
    OpenItemForm(Option<Uuid>),
    ItemFormTitle(String),
    ItemFormDescription(String),
    ItemFormKind(ItemKind),
    ItemFormFrequency(Frequency),
    ItemFormToggleWeekday(String),
    ItemFormDueDate(String),
    ItemFormSubmit,
    ItemSaved(Result<Item, String>),
    DeleteItem(Uuid),
    ItemDeleted(Result<Uuid, String>),
    SelectItem(Option<Uuid>),
    MoveItem(Uuid, isize),
    PrioritiesSaved(Result<(), String>),

    // Checkups
    OpenCheckupForm(Uuid, NaiveDate),
    CheckupFormStatus(CheckupStatus),
    CheckupFormNotes(String),
    CheckupFormSubmit,
    QuickCheckup(Uuid, CheckupStatus),

    // Reminder CRUD
    OpenReminderForm(Option<Uuid>),
    ReminderFormTitle(String),
    ReminderFormDescription(String),
    ReminderFormFrequency(Frequency),
    ReminderFormToggleWeekday(String),
    ReminderFormDate(String),
    ReminderFormTime(String),
    ReminderFormSubmit,
    ReminderSaved(Result<Reminder, String>),
    DeleteReminder(Uuid),
    ReminderDeleted(Result<Uuid, String>),

    // Overview filters
    SearchQueryChanged(String),
    SetSortOrder(SortOrder),
    SetKindFilter(Option<ItemKind>),

    // Calendar
    SetCalendarLayout(CalendarLayout),
    CalendarPrev,
    CalendarNext,
    CalendarToday,
    CalendarSelectDay(NaiveDate),

    // Settings
    SetBackendUrl(String),
    SetAnonKey(String),
    SetPollInterval(u64),
    ToggleDarkMode,
    ToggleDebugLogging,

    // Drawer & errors
    CloseDrawer,
    DismissError,
}

/// Row whose delete button has been pressed once and is waiting for the
/// confirming second press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Item(Uuid),
    Reminder(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Calendar,
    Reminders,
    Settings,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Calendar => "Calendar",
            Self::Reminders => "Reminders",
            Self::Settings => "Settings",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Overview => "view-list-symbolic",
            Self::Calendar => "x-office-calendar-symbolic",
            Self::Reminders => "alarm-symbolic",
            Self::Settings => "emblem-system-symbolic",
        }
    }

    pub const ALL: &'static [Page] = &[
        Page::Overview,
        Page::Calendar,
        Page::Reminders,
        Page::Settings,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarLayout {
    Month,
    Week,
    Day,
}

impl CalendarLayout {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
        }
    }

    pub const ALL: &'static [CalendarLayout] =
        &[CalendarLayout::Month, CalendarLayout::Week, CalendarLayout::Day];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Priority,
    DueDate,
    Title,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::DueDate => "Due date",
            Self::Title => "Title",
        }
    }

    pub const ALL: &'static [SortOrder] =
        &[SortOrder::Priority, SortOrder::DueDate, SortOrder::Title];
}

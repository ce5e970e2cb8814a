use chrono::{NaiveDate, NaiveDateTime, Utc};

use cosmic::app::{context_drawer, Core, Task as CosmicTask};
use cosmic::iced::Length;
use cosmic::widget::{button, column, container, icon, nav_bar, row, scrollable, text, text_input};
use cosmic::{executor, Application, Element};
use uuid::Uuid;

use crate::backend::{self, AuthClient, BackendClient};
use crate::components::month_calendar::CalendarState;
use crate::config::WaypointConfig;
use crate::core::item::{CheckupStatus, Item, ItemKind};
use crate::core::recurrence::{Frequency, WEEKDAY_NAMES};
use crate::core::reminder::Reminder;
use crate::core::session::SessionState;
use crate::core::store::{ChangeEvent, Store};
use crate::fl;
use crate::message::{CalendarLayout, Message, Page, PendingDelete, SortOrder};
use crate::pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextDrawerState {
    ItemForm,
    ReminderForm,
    CheckupForm,
}

pub struct ItemForm {
    pub editing: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub kind: ItemKind,
    pub frequency: Frequency,
    pub weekly_days: Vec<String>,
    pub due_date: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            kind: ItemKind::Goal,
            frequency: Frequency::OneTime,
            weekly_days: Vec::new(),
            due_date: String::new(),
        }
    }
}

impl ItemForm {
    fn from_item(item: &Item) -> Self {
        Self {
            editing: Some(item.id),
            title: item.title.clone(),
            description: item.description.clone(),
            kind: item.kind,
            frequency: item.frequency,
            weekly_days: item.weekly_days.clone(),
            due_date: item
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

pub struct ReminderForm {
    pub editing: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub frequency: Frequency,
    pub weekly_days: Vec<String>,
    pub date: String,
    pub time: String,
}

impl Default for ReminderForm {
    fn default() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            frequency: Frequency::OneTime,
            weekly_days: Vec::new(),
            date: String::new(),
            time: String::new(),
        }
    }
}

impl ReminderForm {
    fn from_reminder(reminder: &Reminder) -> Self {
        Self {
            editing: Some(reminder.id),
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            frequency: reminder.frequency,
            weekly_days: reminder.weekly_days.clone(),
            date: reminder
                .reminder_date
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            time: reminder
                .reminder_date
                .map(|dt| dt.format("%H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

pub struct CheckupForm {
    pub item_id: Uuid,
    pub date: NaiveDate,
    pub status: CheckupStatus,
    pub notes: String,
}

pub struct Waypoint {
    core: Core,
    nav_model: nav_bar::Model,
    config: WaypointConfig,
    cosmic_config: cosmic::cosmic_config::Config,
    active_page: Page,

    session: SessionState,
    store: Store,

    // Sign-in form
    email_input: String,
    password_input: String,
    auth_error: Option<String>,
    auth_notice: Option<String>,
    auth_busy: bool,

    // Overview filters
    search_query: String,
    sort_order: SortOrder,
    kind_filter: Option<ItemKind>,

    calendar: CalendarState,

    // Drawer forms
    drawer: Option<ContextDrawerState>,
    item_form: ItemForm,
    reminder_form: ReminderForm,
    checkup_form: Option<CheckupForm>,

    error: Option<String>,
    pending_delete: Option<PendingDelete>,
}

pub struct Flags {
    pub config: WaypointConfig,
    pub cosmic_config: cosmic::cosmic_config::Config,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Application for Waypoint {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.waypoint.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let cosmic_config = flags.cosmic_config;

        let mut nav_model = nav_bar::Model::default();
        for page in Page::ALL {
            nav_model
                .insert()
                .text(page.title())
                .icon(icon::from_name(page.icon_name()).icon())
                .data(*page);
        }
        if let Some(id) = nav_model.iter().next() {
            nav_model.activate(id);
        }

        // Try to restore the previous session from the keyring
        let (session, startup) = if config.backend_ready() {
            let url = config.backend_url.clone();
            let key = config.anon_key.clone();
            let restore = CosmicTask::perform(
                async move {
                    let refresh_token = match backend::keyring::load_session().await {
                        Ok(Some((_, token))) => token,
                        Ok(None) => return None,
                        Err(e) => {
                            log::warn!("Keyring unavailable: {}", e);
                            return None;
                        }
                    };
                    let auth = match AuthClient::new(&url, &key) {
                        Ok(auth) => auth,
                        Err(e) => {
                            log::error!("Failed to build auth client: {}", e);
                            return None;
                        }
                    };
                    match auth.refresh(&refresh_token).await {
                        Ok(session) => {
                            // Refresh rotates the token; persist the new one
                            if let Err(e) = backend::keyring::store_session(
                                &session.user.email,
                                &session.refresh_token,
                            )
                            .await
                            {
                                log::warn!("Failed to update stored session: {}", e);
                            }
                            Some(session)
                        }
                        Err(e) => {
                            log::info!("Stored session no longer valid: {}", e);
                            None
                        }
                    }
                },
                |session| cosmic::Action::App(Message::SessionRestored(session)),
            );
            (SessionState::Loading, restore)
        } else {
            (SessionState::SignedOut, CosmicTask::none())
        };

        let app = Self {
            core,
            nav_model,
            config,
            cosmic_config,
            active_page: Page::Overview,
            session,
            store: Store::default(),
            email_input: String::new(),
            password_input: String::new(),
            auth_error: None,
            auth_notice: None,
            auth_busy: false,
            search_query: String::new(),
            sort_order: SortOrder::Priority,
            kind_filter: None,
            calendar: CalendarState::default(),
            drawer: None,
            item_form: ItemForm::default(),
            reminder_form: ReminderForm::default(),
            checkup_form: None,
            error: None,
            pending_delete: None,
        };

        (app, startup)
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        match self.session {
            SessionState::SignedIn(_) => Some(&self.nav_model),
            _ => None,
        }
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        if let Some(page) = self.nav_model.data::<Page>(id).copied() {
            self.active_page = page;
            self.search_query.clear();
            self.pending_delete = None;
            self.nav_model.activate(id);
        }
        CosmicTask::none()
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            // --- Session ---
            Message::SessionRestored(Some(session)) => {
                log::info!("Restored session for {}", session.user.email);
                self.session = SessionState::SignedIn(session);
                return self.fetch_task(false);
            }

            Message::SessionRestored(None) => {
                self.session = SessionState::SignedOut;
            }

            Message::EmailInput(value) => {
                self.email_input = value;
                self.auth_error = None;
            }

            Message::PasswordInput(value) => {
                self.password_input = value;
                self.auth_error = None;
            }

            Message::SubmitSignIn => {
                if !pages::sign_in::valid_email(self.email_input.trim()) {
                    return CosmicTask::none();
                }
                self.auth_busy = true;
                self.auth_error = None;
                self.auth_notice = None;

                let url = self.config.backend_url.clone();
                let key = self.config.anon_key.clone();
                let email = self.email_input.trim().to_string();
                let password = self.password_input.clone();
                return CosmicTask::perform(
                    async move {
                        let auth = AuthClient::new(&url, &key).map_err(|e| e.to_string())?;
                        let session = auth
                            .sign_in(&email, &password)
                            .await
                            .map_err(|e| e.to_string())?;
                        if let Err(e) = backend::keyring::store_session(
                            &session.user.email,
                            &session.refresh_token,
                        )
                        .await
                        {
                            log::warn!("Failed to store session in keyring: {}", e);
                        }
                        Ok(session)
                    },
                    |result| cosmic::Action::App(Message::SignInCompleted(result)),
                );
            }

            Message::SubmitSignUp => {
                if !pages::sign_in::valid_email(self.email_input.trim()) {
                    return CosmicTask::none();
                }
                self.auth_busy = true;
                self.auth_error = None;
                self.auth_notice = None;

                let url = self.config.backend_url.clone();
                let key = self.config.anon_key.clone();
                let email = self.email_input.trim().to_string();
                let password = self.password_input.clone();
                return CosmicTask::perform(
                    async move {
                        let auth = AuthClient::new(&url, &key).map_err(|e| e.to_string())?;
                        let session = auth
                            .sign_up(&email, &password)
                            .await
                            .map_err(|e| e.to_string())?;
                        if let Some(ref session) = session {
                            if let Err(e) = backend::keyring::store_session(
                                &session.user.email,
                                &session.refresh_token,
                            )
                            .await
                            {
                                log::warn!("Failed to store session in keyring: {}", e);
                            }
                        }
                        Ok(session)
                    },
                    |result| cosmic::Action::App(Message::SignUpCompleted(result)),
                );
            }

            Message::SignInCompleted(Ok(session)) => {
                log::info!("Signed in as {}", session.user.email);
                self.auth_busy = false;
                self.password_input.clear();
                self.session = SessionState::SignedIn(session);
                return self.fetch_task(false);
            }

            Message::SignInCompleted(Err(e)) => {
                self.auth_busy = false;
                self.auth_error = Some(e);
            }

            Message::SignUpCompleted(Ok(Some(session))) => {
                log::info!("Account created for {}", session.user.email);
                self.auth_busy = false;
                self.password_input.clear();
                self.session = SessionState::SignedIn(session);
                return self.fetch_task(false);
            }

            Message::SignUpCompleted(Ok(None)) => {
                self.auth_busy = false;
                self.auth_notice = Some(fl!("sign-in-check-email"));
            }

            Message::SignUpCompleted(Err(e)) => {
                self.auth_busy = false;
                self.auth_error = Some(e);
            }

            Message::SignOut => {
                let Some(session) = self.session.session().cloned() else {
                    return CosmicTask::none();
                };
                self.session = SessionState::SignedOut;
                self.store.clear();
                self.close_drawer();
                self.error = None;
                self.pending_delete = None;
                self.active_page = Page::Overview;

                let url = self.config.backend_url.clone();
                let key = self.config.anon_key.clone();
                return CosmicTask::perform(
                    async move {
                        if let Err(e) = backend::keyring::delete_session().await {
                            log::warn!("Failed to clear stored session: {}", e);
                        }
                        match AuthClient::new(&url, &key) {
                            Ok(auth) => {
                                if let Err(e) = auth.sign_out(&session.access_token).await {
                                    log::info!("Server-side sign-out failed: {}", e);
                                }
                            }
                            Err(e) => log::error!("Failed to build auth client: {}", e),
                        }
                    },
                    |_| cosmic::Action::App(Message::SignedOut),
                );
            }

            Message::SignedOut => {}

            // --- Data loading & change feed ---
            Message::DataLoaded(Ok((items, reminders))) => {
                log::info!(
                    "Loaded {} items and {} reminders",
                    items.len(),
                    reminders.len()
                );
                self.store.reset(items, reminders);
            }

            Message::DataLoaded(Err(e)) => {
                self.error = Some(e);
            }

            Message::PollTick => {
                return self.fetch_task(true);
            }

            Message::SnapshotFetched(Ok((items, reminders))) => {
                let item_events = backend::diff_rows(&self.store.items, &items);
                let reminder_events = backend::diff_rows(&self.store.reminders, &reminders);
                if !item_events.is_empty() || !reminder_events.is_empty() {
                    log::debug!(
                        "Change feed: {} item events, {} reminder events",
                        item_events.len(),
                        reminder_events.len()
                    );
                }
                for event in item_events {
                    self.store.apply_item(event);
                }
                for event in reminder_events {
                    self.store.apply_reminder(event);
                }
            }

            Message::SnapshotFetched(Err(e)) => {
                // Transient poll failures stay out of the error banner
                log::warn!("Background refresh failed: {}", e);
            }

            // --- Item CRUD ---
            Message::OpenItemForm(editing) => {
                self.item_form = match editing.and_then(|id| self.store.item(id)) {
                    Some(item) => ItemForm::from_item(item),
                    None => ItemForm::default(),
                };
                self.open_drawer(ContextDrawerState::ItemForm);
            }

            Message::ItemFormTitle(value) => self.item_form.title = value,
            Message::ItemFormDescription(value) => self.item_form.description = value,
            Message::ItemFormKind(kind) => self.item_form.kind = kind,
            Message::ItemFormFrequency(frequency) => self.item_form.frequency = frequency,

            Message::ItemFormToggleWeekday(day) => {
                toggle_weekday(&mut self.item_form.weekly_days, day);
            }

            Message::ItemFormDueDate(value) => self.item_form.due_date = value,

            Message::ItemFormSubmit => {
                let title = self.item_form.title.trim().to_string();
                if title.is_empty() {
                    return CosmicTask::none();
                }
                let Some(user_id) = self.session.user().map(|u| u.id) else {
                    return CosmicTask::none();
                };

                let form = &self.item_form;
                let mut item = match form.editing.and_then(|id| self.store.item(id)).cloned() {
                    Some(existing) => existing,
                    None => {
                        let mut item = Item::new(title.clone(), form.kind, user_id);
                        item.priority = self.store.items.len() as i32;
                        item
                    }
                };
                item.title = title;
                item.description = form.description.trim().to_string();
                item.kind = form.kind;
                item.set_frequency(form.frequency);
                match form.frequency {
                    Frequency::Weekly => item.weekly_days = form.weekly_days.clone(),
                    Frequency::OneTime => {
                        item.due_date =
                            NaiveDate::parse_from_str(form.due_date.trim(), "%Y-%m-%d").ok();
                    }
                    Frequency::Daily => item.due_date = None,
                }

                let is_new = form.editing.is_none();
                self.close_drawer();
                return self.save_item_task(item, is_new);
            }

            Message::ItemSaved(Ok(item)) => {
                let event = if self.store.item(item.id).is_some() {
                    ChangeEvent::Update(item)
                } else {
                    ChangeEvent::Insert(item)
                };
                self.store.apply_item(event);
            }

            Message::ItemSaved(Err(e)) => {
                self.error = Some(e);
            }

            Message::DeleteItem(id) => {
                if !arm_or_confirm(&mut self.pending_delete, PendingDelete::Item(id)) {
                    return CosmicTask::none();
                }
                let Some((url, key, token)) = self.backend_params() else {
                    return CosmicTask::none();
                };
                return CosmicTask::perform(
                    async move {
                        let client =
                            BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                        client.delete_item(id).await.map_err(|e| e.to_string())?;
                        Ok(id)
                    },
                    |result| cosmic::Action::App(Message::ItemDeleted(result)),
                );
            }

            Message::ItemDeleted(Ok(id)) => {
                self.store.apply_item(ChangeEvent::Delete(id));
            }

            Message::ItemDeleted(Err(e)) => {
                self.error = Some(e);
            }

            Message::SelectItem(id) => {
                self.store.selected = id.filter(|id| self.store.item(*id).is_some());
            }

            Message::MoveItem(id, direction) => {
                let Some(from) = self.store.items.iter().position(|i| i.id == id) else {
                    return CosmicTask::none();
                };
                let to = from.saturating_add_signed(direction);
                if to == from || to >= self.store.items.len() {
                    return CosmicTask::none();
                }
                self.store.items.swap(from, to);
                for (idx, item) in self.store.items.iter_mut().enumerate() {
                    item.priority = idx as i32;
                }

                let Some((url, key, token)) = self.backend_params() else {
                    return CosmicTask::none();
                };
                let items = self.store.items.clone();
                return CosmicTask::perform(
                    async move {
                        let client =
                            BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                        client
                            .save_priorities(&items)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    |result| cosmic::Action::App(Message::PrioritiesSaved(result)),
                );
            }

            Message::PrioritiesSaved(Ok(())) => {}

            Message::PrioritiesSaved(Err(e)) => {
                self.error = Some(e);
            }

            // --- Checkups ---
            Message::OpenCheckupForm(item_id, date) => {
                // No check-ins for days that have not happened yet
                if date > today() {
                    return CosmicTask::none();
                }
                let Some(item) = self.store.item(item_id) else {
                    return CosmicTask::none();
                };
                let existing = item.checkup_on(date);
                self.checkup_form = Some(CheckupForm {
                    item_id,
                    date,
                    status: existing.map(|c| c.status).unwrap_or(CheckupStatus::Done),
                    notes: existing.map(|c| c.notes.clone()).unwrap_or_default(),
                });
                self.open_drawer(ContextDrawerState::CheckupForm);
            }

            Message::CheckupFormStatus(status) => {
                if let Some(form) = self.checkup_form.as_mut() {
                    form.status = status;
                }
            }

            Message::CheckupFormNotes(value) => {
                if let Some(form) = self.checkup_form.as_mut() {
                    form.notes = value;
                }
            }

            Message::CheckupFormSubmit => {
                let Some(form) = self.checkup_form.take() else {
                    return CosmicTask::none();
                };
                let Some(mut item) = self.store.item(form.item_id).cloned() else {
                    return CosmicTask::none();
                };
                item.record_checkup(checkup_timestamp(form.date), form.status, &form.notes);
                self.close_drawer();
                return self.save_item_task(item, false);
            }

            Message::QuickCheckup(id, status) => {
                let Some(mut item) = self.store.item(id).cloned() else {
                    return CosmicTask::none();
                };
                // Keep the notes already recorded today, if any
                let notes = item
                    .checkup_on(today())
                    .map(|c| c.notes.clone())
                    .unwrap_or_default();
                item.record_checkup(Utc::now(), status, &notes);
                return self.save_item_task(item, false);
            }

            // --- Reminder CRUD ---
            Message::OpenReminderForm(editing) => {
                self.reminder_form = match editing.and_then(|id| self.store.reminder(id)) {
                    Some(reminder) => ReminderForm::from_reminder(reminder),
                    None => ReminderForm::default(),
                };
                self.open_drawer(ContextDrawerState::ReminderForm);
            }

            Message::ReminderFormTitle(value) => self.reminder_form.title = value,
            Message::ReminderFormDescription(value) => self.reminder_form.description = value,
            Message::ReminderFormFrequency(frequency) => {
                self.reminder_form.frequency = frequency;
            }

            Message::ReminderFormToggleWeekday(day) => {
                toggle_weekday(&mut self.reminder_form.weekly_days, day);
            }

            Message::ReminderFormDate(value) => self.reminder_form.date = value,
            Message::ReminderFormTime(value) => self.reminder_form.time = value,

            Message::ReminderFormSubmit => {
                if !reminder_form_ready(&self.reminder_form) {
                    return CosmicTask::none();
                }
                let Some(user_id) = self.session.user().map(|u| u.id) else {
                    return CosmicTask::none();
                };

                let form = &self.reminder_form;
                let title = form.title.trim().to_string();
                let mut reminder = match form
                    .editing
                    .and_then(|id| self.store.reminder(id))
                    .cloned()
                {
                    Some(existing) => existing,
                    None => Reminder::new(title.clone(), user_id),
                };
                reminder.title = title;
                reminder.description = form.description.trim().to_string();
                reminder.set_frequency(form.frequency);
                match form.frequency {
                    Frequency::Weekly => reminder.weekly_days = form.weekly_days.clone(),
                    Frequency::OneTime => {
                        reminder.reminder_date = parse_reminder_date(&form.date, &form.time);
                    }
                    Frequency::Daily => {}
                }
                let is_new = form.editing.is_none();
                if !is_new {
                    reminder.last_updated = Some(Utc::now());
                }
                self.close_drawer();

                let Some((url, key, token)) = self.backend_params() else {
                    return CosmicTask::none();
                };
                return CosmicTask::perform(
                    async move {
                        let client =
                            BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                        let saved = if is_new {
                            client.insert_reminder(&reminder).await
                        } else {
                            client.update_reminder(&reminder).await
                        };
                        saved.map_err(|e| e.to_string())
                    },
                    |result| cosmic::Action::App(Message::ReminderSaved(result)),
                );
            }

            Message::ReminderSaved(Ok(reminder)) => {
                let event = if self.store.reminder(reminder.id).is_some() {
                    ChangeEvent::Update(reminder)
                } else {
                    ChangeEvent::Insert(reminder)
                };
                self.store.apply_reminder(event);
            }

            Message::ReminderSaved(Err(e)) => {
                self.error = Some(e);
            }

            Message::DeleteReminder(id) => {
                if !arm_or_confirm(&mut self.pending_delete, PendingDelete::Reminder(id)) {
                    return CosmicTask::none();
                }
                let Some((url, key, token)) = self.backend_params() else {
                    return CosmicTask::none();
                };
                return CosmicTask::perform(
                    async move {
                        let client =
                            BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                        client
                            .delete_reminder(id)
                            .await
                            .map_err(|e| e.to_string())?;
                        Ok(id)
                    },
                    |result| cosmic::Action::App(Message::ReminderDeleted(result)),
                );
            }

            Message::ReminderDeleted(Ok(id)) => {
                self.store.apply_reminder(ChangeEvent::Delete(id));
            }

            Message::ReminderDeleted(Err(e)) => {
                self.error = Some(e);
            }

            // --- Overview filters ---
            Message::SearchQueryChanged(q) => {
                self.search_query = q;
            }

            Message::SetSortOrder(order) => {
                self.sort_order = order;
            }

            Message::SetKindFilter(kind) => {
                self.kind_filter = kind;
            }

            // --- Calendar ---
            Message::SetCalendarLayout(layout) => {
                self.calendar.layout = layout;
            }

            Message::CalendarPrev => self.calendar.prev(),
            Message::CalendarNext => self.calendar.next(),
            Message::CalendarToday => self.calendar.go_to(today()),

            Message::CalendarSelectDay(date) => {
                if self.calendar.layout == CalendarLayout::Day {
                    self.calendar.anchor = date;
                }
                self.calendar.select_day(date);
            }

            // --- Settings ---
            Message::SetBackendUrl(value) => {
                self.config.backend_url = value;
                self.save_config();
            }

            Message::SetAnonKey(value) => {
                self.config.anon_key = value;
                self.save_config();
            }

            Message::SetPollInterval(secs) => {
                self.config.poll_interval_secs = secs;
                self.save_config();
            }

            Message::ToggleDarkMode => {
                self.config.dark_mode = !self.config.dark_mode;
                self.save_config();
            }

            Message::ToggleDebugLogging => {
                self.config.debug_logging = !self.config.debug_logging;
                waypoint::set_debug_logging(self.config.debug_logging);
                self.save_config();
            }

            // --- Drawer & errors ---
            Message::CloseDrawer => {
                self.close_drawer();
            }

            Message::DismissError => {
                self.error = None;
            }
        }

        CosmicTask::none()
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        if self.session.session().is_none() {
            return Vec::new();
        }
        vec![
            row()
                .spacing(4)
                .push(
                    button::icon(icon::from_name("list-add-symbolic"))
                        .on_press(Message::OpenItemForm(None)),
                )
                .push(
                    button::icon(icon::from_name("alarm-symbolic"))
                        .on_press(Message::OpenReminderForm(None)),
                )
                .into(),
        ]
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        if self.session.session().is_none() {
            return None;
        }

        match self.drawer? {
            ContextDrawerState::ItemForm => {
                let title = if self.item_form.editing.is_some() {
                    fl!("form-edit-item")
                } else {
                    fl!("form-new-item")
                };
                Some(
                    context_drawer::context_drawer(
                        container(scrollable(self.item_form_view().padding(16)))
                            .width(Length::Fill),
                        Message::CloseDrawer,
                    )
                    .title(title),
                )
            }
            ContextDrawerState::ReminderForm => {
                let title = if self.reminder_form.editing.is_some() {
                    fl!("form-edit-reminder")
                } else {
                    fl!("form-new-reminder")
                };
                Some(
                    context_drawer::context_drawer(
                        container(scrollable(self.reminder_form_view().padding(16)))
                            .width(Length::Fill),
                        Message::CloseDrawer,
                    )
                    .title(title),
                )
            }
            ContextDrawerState::CheckupForm => Some(
                context_drawer::context_drawer(
                    container(scrollable(self.checkup_form_view().padding(16)))
                        .width(Length::Fill),
                    Message::CloseDrawer,
                )
                .title(fl!("form-checkup")),
            ),
        }
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        self.pending_delete = None;
        if self.drawer.is_some() {
            self.close_drawer();
        }
        CosmicTask::none()
    }

    fn subscription(&self) -> cosmic::iced::Subscription<Message> {
        let keys = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                key: cosmic::iced::keyboard::Key::Character(ref c),
                modifiers,
                ..
            }) if c.as_str() == "n" && modifiers.control() => Some(Message::OpenItemForm(None)),
            _ => None,
        });

        if self.session.session().is_some() && self.config.backend_ready() {
            let interval = std::time::Duration::from_secs(self.config.poll_interval_secs.max(5));
            cosmic::iced::Subscription::batch([
                keys,
                cosmic::iced::time::every(interval).map(|_| Message::PollTick),
            ])
        } else {
            keys
        }
    }

    fn view(&self) -> Element<'_, Message> {
        match &self.session {
            SessionState::Loading => container(text::body(fl!("loading")))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            SessionState::SignedOut => pages::sign_in::sign_in_view(
                &self.email_input,
                &self.password_input,
                self.auth_error.as_deref(),
                self.auth_notice.as_deref(),
                self.auth_busy,
                self.config.backend_ready(),
            ),
            SessionState::SignedIn(_) => self.page_view(),
        }
    }
}

impl Waypoint {
    fn page_view(&self) -> Element<'_, Message> {
        let now = today();

        let content: Element<'_, Message> = match self.active_page {
            Page::Overview => {
                let items = self.filtered_items();
                pages::overview::overview_view(
                    &items,
                    now,
                    self.sort_order,
                    self.kind_filter,
                    self.pending_delete,
                )
            }
            Page::Calendar => pages::calendar::calendar_view(
                &self.calendar,
                now,
                &self.store.items,
                &self.store.reminders,
                self.store.selected_item(),
            ),
            Page::Reminders => {
                pages::reminders::reminders_view(&self.store.reminders, self.pending_delete)
            }
            Page::Settings => pages::settings::settings_view(&self.config, &self.session),
        };

        let mut page = column().spacing(8);

        if let Some(ref error) = self.error {
            page = page.push(
                container(
                    row()
                        .spacing(8)
                        .push(text::body(error.clone()).width(Length::Fill))
                        .push(
                            button::standard(fl!("error-dismiss"))
                                .on_press(Message::DismissError),
                        ),
                )
                .padding([8, 16]),
            );
        }

        if self.active_page == Page::Overview {
            let search_input =
                text_input::text_input(fl!("search-placeholder"), self.search_query.clone())
                    .on_input(Message::SearchQueryChanged)
                    .width(Length::Fill);
            page = page.push(container(search_input).padding([0, 16]));
        }

        container(page.push(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Overview rows after search, kind filter, and sort.
    fn filtered_items(&self) -> Vec<Item> {
        let q = self.search_query.to_lowercase();
        let mut items: Vec<Item> = self
            .store
            .items
            .iter()
            .filter(|i| self.kind_filter.is_none_or(|k| i.kind == k))
            .filter(|i| {
                q.is_empty()
                    || i.title.to_lowercase().contains(&q)
                    || i.description.to_lowercase().contains(&q)
            })
            .cloned()
            .collect();

        match self.sort_order {
            SortOrder::Priority => items.sort_by_key(|i| i.priority),
            SortOrder::DueDate => {
                items.sort_by_key(|i| (i.due_date.is_none(), i.due_date, i.priority))
            }
            SortOrder::Title => items.sort_by_key(|i| i.title.to_lowercase()),
        }

        items
    }

    fn backend_params(&self) -> Option<(String, String, String)> {
        let session = self.session.session()?;
        Some((
            self.config.backend_url.clone(),
            self.config.anon_key.clone(),
            session.access_token.clone(),
        ))
    }

    /// Fetch both tables in parallel. `poll` routes the result through the
    /// change feed instead of replacing the store.
    fn fetch_task(&self, poll: bool) -> CosmicTask<Message> {
        let Some((url, key, token)) = self.backend_params() else {
            return CosmicTask::none();
        };
        let Some(user_id) = self.session.user().map(|u| u.id) else {
            return CosmicTask::none();
        };
        CosmicTask::perform(
            async move {
                let client = BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                futures::future::try_join(
                    client.fetch_items(user_id),
                    client.fetch_reminders(user_id),
                )
                .await
                .map_err(|e| e.to_string())
            },
            move |result| {
                cosmic::Action::App(if poll {
                    Message::SnapshotFetched(result)
                } else {
                    Message::DataLoaded(result)
                })
            },
        )
    }

    fn save_item_task(&self, item: Item, is_new: bool) -> CosmicTask<Message> {
        let Some((url, key, token)) = self.backend_params() else {
            return CosmicTask::none();
        };
        CosmicTask::perform(
            async move {
                let client = BackendClient::new(&url, &key, &token).map_err(|e| e.to_string())?;
                let saved = if is_new {
                    client.insert_item(&item).await
                } else {
                    client.update_item(&item).await
                };
                saved.map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::ItemSaved(result)),
        )
    }

    fn open_drawer(&mut self, state: ContextDrawerState) {
        self.drawer = Some(state);
        self.core.window.show_context = true;
    }

    fn close_drawer(&mut self) {
        self.drawer = None;
        self.checkup_form = None;
        self.core.window.show_context = false;
    }

    fn save_config(&self) {
        use cosmic::cosmic_config::CosmicConfigEntry;
        if let Err(e) = self.config.write_entry(&self.cosmic_config) {
            log::error!("Failed to save config: {:?}", e);
        }
    }

    fn item_form_view(&self) -> cosmic::widget::column::Column<'_, Message> {
        let form = &self.item_form;
        let mut content = column().spacing(16);

        content = content.push(text::title4(fl!("form-title")));
        content = content.push(
            text_input::text_input(fl!("form-title"), &form.title)
                .on_input(Message::ItemFormTitle)
                .on_submit(|_| Message::ItemFormSubmit)
                .width(Length::Fill),
        );

        content = content.push(text::title4(fl!("form-description")));
        content = content.push(
            text_input::text_input(fl!("form-description"), &form.description)
                .on_input(Message::ItemFormDescription)
                .width(Length::Fill),
        );

        content = content.push(text::title4(fl!("form-type")));
        let mut kind_row = row().spacing(4);
        for kind in ItemKind::ALL {
            let btn = if form.kind == *kind {
                button::suggested(kind.label())
            } else {
                button::standard(kind.label())
            };
            kind_row = kind_row.push(btn.on_press(Message::ItemFormKind(*kind)));
        }
        content = content.push(kind_row);

        content = content.push(text::title4(fl!("form-frequency")));
        let mut freq_row = row().spacing(4);
        for frequency in Frequency::ALL {
            let btn = if form.frequency == *frequency {
                button::suggested(frequency.label())
            } else {
                button::standard(frequency.label())
            };
            freq_row = freq_row.push(btn.on_press(Message::ItemFormFrequency(*frequency)));
        }
        content = content.push(freq_row);

        if form.frequency == Frequency::Weekly {
            content = content.push(text::title4(fl!("form-weekdays")));
            content = content.push(weekday_row(&form.weekly_days, Message::ItemFormToggleWeekday));
        }

        if form.frequency == Frequency::OneTime {
            content = content.push(text::title4(fl!("form-due-date")));
            content = content.push(
                text_input::text_input("YYYY-MM-DD", &form.due_date)
                    .on_input(Message::ItemFormDueDate)
                    .width(Length::Fill),
            );
        }

        let mut save = button::suggested(fl!("form-save"));
        if !form.title.trim().is_empty() {
            save = save.on_press(Message::ItemFormSubmit);
        }
        content.push(save)
    }

    fn reminder_form_view(&self) -> cosmic::widget::column::Column<'_, Message> {
        let form = &self.reminder_form;
        let mut content = column().spacing(16);

        content = content.push(text::title4(fl!("form-title")));
        content = content.push(
            text_input::text_input(fl!("form-title"), &form.title)
                .on_input(Message::ReminderFormTitle)
                .on_submit(|_| Message::ReminderFormSubmit)
                .width(Length::Fill),
        );

        content = content.push(text::title4(fl!("form-description")));
        content = content.push(
            text_input::text_input(fl!("form-description"), &form.description)
                .on_input(Message::ReminderFormDescription)
                .width(Length::Fill),
        );

        content = content.push(text::title4(fl!("form-frequency")));
        let mut freq_row = row().spacing(4);
        for frequency in Frequency::ALL {
            let btn = if form.frequency == *frequency {
                button::suggested(frequency.label())
            } else {
                button::standard(frequency.label())
            };
            freq_row = freq_row.push(btn.on_press(Message::ReminderFormFrequency(*frequency)));
        }
        content = content.push(freq_row);

        if form.frequency == Frequency::Weekly {
            content = content.push(text::title4(fl!("form-weekdays")));
            content = content.push(weekday_row(
                &form.weekly_days,
                Message::ReminderFormToggleWeekday,
            ));
        }

        if form.frequency == Frequency::OneTime {
            content = content.push(text::title4(fl!("form-reminder-date")));
            content = content.push(
                text_input::text_input("YYYY-MM-DD", &form.date)
                    .on_input(Message::ReminderFormDate)
                    .width(Length::Fill),
            );
            content = content.push(text::title4(fl!("form-reminder-time")));
            content = content.push(
                text_input::text_input("HH:MM", &form.time)
                    .on_input(Message::ReminderFormTime)
                    .width(Length::Fill),
            );
        }

        let mut save = button::suggested(fl!("form-save"));
        if reminder_form_ready(form) {
            save = save.on_press(Message::ReminderFormSubmit);
        }
        content.push(save)
    }

    fn checkup_form_view(&self) -> cosmic::widget::column::Column<'_, Message> {
        let mut content = column().spacing(16);
        let Some(form) = self.checkup_form.as_ref() else {
            return content;
        };

        if let Some(item) = self.store.item(form.item_id) {
            content = content.push(text::title4(item.title.clone()));
        }
        content = content.push(text::body(form.date.format("%A, %B %e, %Y").to_string()));

        let mut status_row = row().spacing(4);
        for status in [
            CheckupStatus::Done,
            CheckupStatus::InProgress,
            CheckupStatus::NotWorked,
        ] {
            let btn = if form.status == status {
                button::suggested(status.label())
            } else {
                button::standard(status.label())
            };
            status_row = status_row.push(btn.on_press(Message::CheckupFormStatus(status)));
        }
        content = content.push(status_row);

        content = content.push(text::title4(fl!("form-checkup-notes")));
        content = content.push(
            text_input::text_input(fl!("form-checkup-notes"), &form.notes)
                .on_input(Message::CheckupFormNotes)
                .on_submit(|_| Message::CheckupFormSubmit)
                .width(Length::Fill),
        );

        content.push(button::suggested(fl!("form-save")).on_press(Message::CheckupFormSubmit))
    }
}

fn toggle_weekday(days: &mut Vec<String>, day: String) {
    if let Some(pos) = days.iter().position(|d| *d == day) {
        days.remove(pos);
    } else {
        days.push(day);
    }
}

fn weekday_row<'a>(
    selected: &[String],
    on_toggle: fn(String) -> Message,
) -> Element<'a, Message> {
    let mut days = row().spacing(4);
    for day in WEEKDAY_NAMES {
        let active = selected.iter().any(|d| d == day);
        let label = &day[..3];
        let btn = if active {
            button::suggested(label)
        } else {
            button::standard(label)
        };
        days = days.push(btn.on_press(on_toggle(day.to_string())));
    }
    days.into()
}

/// Deletes take two presses: the first arms the row, the second confirms.
/// Returns true when the request confirms an already-armed row; pressing
/// delete on a different row re-arms onto it instead.
fn arm_or_confirm(pending: &mut Option<PendingDelete>, request: PendingDelete) -> bool {
    if *pending == Some(request) {
        *pending = None;
        true
    } else {
        *pending = Some(request);
        false
    }
}

/// A reminder form can be saved once the title is non-blank and, for
/// one-time reminders, the date parses.
fn reminder_form_ready(form: &ReminderForm) -> bool {
    if form.title.trim().is_empty() {
        return false;
    }
    form.frequency != Frequency::OneTime
        || parse_reminder_date(&form.date, &form.time).is_some()
}

/// Combine the form's date and time fields into a timestamp. A blank time
/// means midnight.
fn parse_reminder_date(date: &str, time: &str) -> Option<chrono::DateTime<Utc>> {
    let date = date.trim();
    let time = if time.trim().is_empty() {
        "00:00"
    } else {
        time.trim()
    };
    NaiveDateTime::parse_from_str(&format!("{date}T{time}:00"), "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Check-ins for today carry the actual time; backfilled days get local noon,
/// which keeps the stored instant on the requested local calendar day.
fn checkup_timestamp(date: NaiveDate) -> chrono::DateTime<Utc> {
    if date == today() {
        return Utc::now();
    }
    date.and_hms_opt(12, 0, 0)
        .and_then(|dt| dt.and_local_timezone(chrono::Local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn one_time_reminder_needs_a_valid_date() {
        let mut form = ReminderForm {
            title: "Dentist".into(),
            ..ReminderForm::default()
        };
        // One-time by default, no date entered yet
        assert!(!reminder_form_ready(&form));

        form.date = "2024-06-10".into();
        form.time = "14:30".into();
        assert!(reminder_form_ready(&form));

        form.date = "next tuesday".into();
        assert!(!reminder_form_ready(&form));

        // Recurring reminders carry no date
        form.frequency = Frequency::Daily;
        assert!(reminder_form_ready(&form));

        form.title = "   ".into();
        assert!(!reminder_form_ready(&form));
    }

    #[test]
    fn blank_time_defaults_to_midnight() {
        assert_eq!(
            parse_reminder_date("2024-06-10", ""),
            Some(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_reminder_date("", "14:30"), None);
    }

    #[test]
    fn delete_confirms_on_second_press() {
        let mut pending = None;
        let first = PendingDelete::Item(Uuid::new_v4());
        let other = PendingDelete::Reminder(Uuid::new_v4());

        assert!(!arm_or_confirm(&mut pending, first));
        assert_eq!(pending, Some(first));

        // A different row re-arms instead of confirming
        assert!(!arm_or_confirm(&mut pending, other));
        assert_eq!(pending, Some(other));

        assert!(arm_or_confirm(&mut pending, other));
        assert_eq!(pending, None);
    }

    #[test]
    fn backfilled_checkup_lands_on_requested_day() {
        let yesterday = today() - chrono::Duration::days(1);
        let instant = checkup_timestamp(yesterday);
        assert_eq!(
            instant.with_timezone(&chrono::Local).date_naive(),
            yesterday
        );
    }
}

pub mod calendar;
pub mod overview;
pub mod reminders;
pub mod settings;
pub mod sign_in;

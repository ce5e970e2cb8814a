pub mod calendar;
pub mod item;
pub mod recurrence;
pub mod reminder;
pub mod session;
pub mod store;

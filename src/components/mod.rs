pub mod item_card;
pub mod month_calendar;

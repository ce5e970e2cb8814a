use uuid::Uuid;

use super::item::Item;
use super::reminder::Reminder;

/// A typed row change delivered by the backend change feed.
#[derive(Debug, Clone)]
pub enum ChangeEvent<T> {
    Insert(T),
    Update(T),
    Delete(Uuid),
}

/// In-memory cache of the user's rows. The backend is the source of truth;
/// this is refreshed wholesale on login and patched by change events and by
/// confirmed local mutations.
#[derive(Debug, Default)]
pub struct Store {
    pub items: Vec<Item>,
    pub reminders: Vec<Reminder>,
    /// Item highlighted in the calendar views.
    pub selected: Option<Uuid>,
}

impl Store {
    /// Replace everything, e.g. after the initial fetch on login.
    pub fn reset(&mut self, items: Vec<Item>, reminders: Vec<Reminder>) {
        self.items = items;
        self.reminders = reminders;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.reminders.clear();
        self.selected = None;
    }

    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn reminder(&self, id: Uuid) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.and_then(|id| self.item(id))
    }

    /// Merge an item change by id. Inserts are ignored when the id is already
    /// present, which swallows the feed echo of a local optimistic insert.
    pub fn apply_item(&mut self, event: ChangeEvent<Item>) {
        match event {
            ChangeEvent::Insert(item) => {
                if !self.items.iter().any(|i| i.id == item.id) {
                    self.items.push(item);
                }
            }
            ChangeEvent::Update(item) => {
                if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                    *existing = item;
                }
            }
            ChangeEvent::Delete(id) => {
                self.items.retain(|i| i.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
        }
    }

    pub fn apply_reminder(&mut self, event: ChangeEvent<Reminder>) {
        match event {
            ChangeEvent::Insert(reminder) => {
                if !self.reminders.iter().any(|r| r.id == reminder.id) {
                    self.reminders.push(reminder);
                }
            }
            ChangeEvent::Update(reminder) => {
                if let Some(existing) = self.reminders.iter_mut().find(|r| r.id == reminder.id) {
                    *existing = reminder;
                }
            }
            ChangeEvent::Delete(id) => {
                self.reminders.retain(|r| r.id != id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ItemKind;

    fn store_with(titles: &[&str]) -> (Store, Vec<Uuid>) {
        let user = Uuid::new_v4();
        let items: Vec<Item> = titles
            .iter()
            .map(|t| Item::new(*t, ItemKind::Goal, user))
            .collect();
        let ids = items.iter().map(|i| i.id).collect();
        let mut store = Store::default();
        store.reset(items, Vec::new());
        (store, ids)
    }

    #[test]
    fn insert_guard_ignores_known_ids() {
        let (mut store, ids) = store_with(&["Run"]);
        let echo = store.item(ids[0]).unwrap().clone();

        store.apply_item(ChangeEvent::Insert(echo));
        assert_eq!(store.items.len(), 1);
    }

    #[test]
    fn update_replaces_by_id() {
        let (mut store, ids) = store_with(&["Run"]);
        let mut changed = store.item(ids[0]).unwrap().clone();
        changed.title = "Run farther".into();

        store.apply_item(ChangeEvent::Update(changed));
        assert_eq!(store.item(ids[0]).unwrap().title, "Run farther");
        assert_eq!(store.items.len(), 1);
    }

    #[test]
    fn delete_clears_selection() {
        let (mut store, ids) = store_with(&["Run", "Read"]);
        store.selected = Some(ids[0]);

        store.apply_item(ChangeEvent::Delete(ids[0]));
        assert_eq!(store.items.len(), 1);
        assert_eq!(store.selected, None);

        // Deleting a non-selected item leaves the selection alone
        store.selected = Some(ids[1]);
        store.apply_item(ChangeEvent::Delete(Uuid::new_v4()));
        assert_eq!(store.selected, Some(ids[1]));
    }
}

use uuid::Uuid;

use crate::core::item::Item;
use crate::core::reminder::Reminder;
use crate::core::store::ChangeEvent;

/// Rows addressable by a stable id, so snapshots can be diffed.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Item {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Reminder {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Diff the cached rows against a freshly fetched snapshot, yielding the
/// change events that turn the former into the latter. Rows only present
/// remotely become inserts, rows that differ become updates, rows that
/// vanished become deletes.
pub fn diff_rows<T>(current: &[T], fetched: &[T]) -> Vec<ChangeEvent<T>>
where
    T: Keyed + PartialEq + Clone,
{
    let mut events = Vec::new();

    for row in fetched {
        match current.iter().find(|c| c.key() == row.key()) {
            None => events.push(ChangeEvent::Insert(row.clone())),
            Some(existing) if existing != row => events.push(ChangeEvent::Update(row.clone())),
            Some(_) => {}
        }
    }

    for row in current {
        if !fetched.iter().any(|f| f.key() == row.key()) {
            events.push(ChangeEvent::Delete(row.key()));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ItemKind;

    fn items(titles: &[&str]) -> Vec<Item> {
        let user = Uuid::new_v4();
        titles
            .iter()
            .map(|t| Item::new(*t, ItemKind::Task, user))
            .collect()
    }

    #[test]
    fn identical_snapshots_yield_nothing() {
        let rows = items(&["Run", "Read"]);
        assert!(diff_rows(&rows, &rows.clone()).is_empty());
    }

    #[test]
    fn new_remote_row_becomes_insert() {
        let current = items(&["Run"]);
        let mut fetched = current.clone();
        fetched.push(Item::new("Read", ItemKind::Task, current[0].user_id));

        let events = diff_rows(&current, &fetched);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::Insert(i) if i.title == "Read"));
    }

    #[test]
    fn changed_row_becomes_update() {
        let current = items(&["Run"]);
        let mut fetched = current.clone();
        fetched[0].title = "Run farther".into();

        let events = diff_rows(&current, &fetched);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::Update(i) if i.title == "Run farther"));
    }

    #[test]
    fn missing_row_becomes_delete() {
        let current = items(&["Run", "Read"]);
        let fetched = vec![current[0].clone()];

        let events = diff_rows(&current, &fetched);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::Delete(id) if *id == current[1].id));
    }
}

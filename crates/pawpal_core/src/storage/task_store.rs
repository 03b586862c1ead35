use crate::model::{Task, TaskId};
use std::collections::HashMap;

/// The one authoritative copy of every task. Pets and the scheduler keep
/// ids and resolve them here, so a change made through either is seen by both.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `task` under its own id, replacing any earlier record with it.
    pub fn insert(&mut self, task: Task) -> TaskId {
        let id = task.task_id.clone();
        self.tasks.insert(id.clone(), task);
        id
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    pub fn get_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        self.tasks.remove(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::Task;
    use time::macros::datetime;

    #[test]
    fn insert_and_lookup_by_id() {
        let mut store = TaskStore::new();
        let task = Task::new("Feed", "Breakfast", "feeding", datetime!(2026-02-15 08:00));

        let id = store.insert(task.clone());

        assert!(store.contains(id.as_str()));
        assert_eq!(store.get(id.as_str()), Some(&task));
    }

    #[test]
    fn mutation_is_visible_on_next_lookup() {
        let mut store = TaskStore::new();
        let id = store.insert(Task::new("Walk", "", "walk", datetime!(2026-02-15 09:00)));

        store.get_mut(id.as_str()).unwrap().mark_complete();

        assert!(store.get(id.as_str()).unwrap().is_completed);
    }

    #[test]
    fn remove_returns_record_once() {
        let mut store = TaskStore::new();
        let id = store.insert(Task::new("Walk", "", "walk", datetime!(2026-02-15 09:00)));

        assert_eq!(store.remove(id.as_str()).map(|task| task.title), Some("Walk".to_string()));
        assert!(!store.contains(id.as_str()));
        assert!(store.remove(id.as_str()).is_none());
        assert!(store.remove("nope").is_none());
    }
}

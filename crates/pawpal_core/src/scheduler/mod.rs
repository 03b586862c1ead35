//! Cross-pet scheduling over an explicitly populated list of tasks.
//!
//! The scheduler owns the [`TaskStore`] every task is registered in, plus its
//! own ordered list of ids. That list is filled by the caller and is not
//! derived from pet membership. Every view returns borrowed tasks in a fresh
//! `Vec`; the stored order is never rearranged.

mod conflicts;

pub use conflicts::Conflict;

use crate::clock;
use crate::model::{Pet, Task, TaskId};
use crate::storage::TaskStore;
use std::cmp::Reverse;
use time::{Date, Duration, PrimitiveDateTime};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    store: TaskStore,
    all_tasks: Vec<TaskId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `task` known without putting it on the schedule.
    pub fn register_task(&mut self, task: Task) -> TaskId {
        self.store.insert(task)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.store.get(task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.store.get_mut(task_id)
    }

    /// Appends to the schedule. Duplicates are kept.
    pub fn add_task(&mut self, task_id: TaskId) {
        if !self.store.contains(task_id.as_str()) {
            warn!(%task_id, "scheduling an id that was never registered");
        }
        debug!(%task_id, "task added to schedule");
        self.all_tasks.push(task_id);
    }

    pub fn add_new_task(&mut self, task: Task) -> TaskId {
        let task_id = self.register_task(task);
        self.add_task(task_id.clone());
        task_id
    }

    /// Drops every schedule entry with this id. The record itself stays
    /// registered, since a pet may still list it.
    pub fn remove_task(&mut self, task_id: &str) {
        let before = self.all_tasks.len();
        self.all_tasks.retain(|id| id != task_id);
        debug!(task_id, removed = before - self.all_tasks.len(), "task removed from schedule");
    }

    /// Takes the task off the schedule and forgets its record. Pets still
    /// listing the id will no longer resolve it.
    pub fn unregister_task(&mut self, task_id: &str) -> Option<Task> {
        self.remove_task(task_id);
        let removed = self.store.remove(task_id);
        if removed.is_some() {
            debug!(task_id, "task unregistered");
        }
        removed
    }

    pub fn task_ids(&self) -> &[TaskId] {
        &self.all_tasks
    }

    pub fn len(&self) -> usize {
        self.all_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_tasks.is_empty()
    }

    /// Scheduled tasks in stored order.
    pub fn tasks(&self) -> Vec<&Task> {
        self.all_tasks
            .iter()
            .filter_map(|id| {
                let task = self.store.get(id.as_str());
                if task.is_none() {
                    debug!(task_id = %id, "skipping unregistered id");
                }
                task
            })
            .collect()
    }

    pub fn sort_by_time(&self) -> Vec<&Task> {
        let mut tasks = self.tasks();
        tasks.sort_by_key(|task| task.scheduled_time);
        tasks
    }

    pub fn sort_by_priority(&self) -> Vec<&Task> {
        let mut tasks = self.tasks();
        sort_by_rank_desc(&mut tasks);
        tasks
    }

    pub fn get_tasks_by_priority(&self) -> Vec<&Task> {
        self.tasks_by_priority_at(clock::local_now())
    }

    /// Overdue tasks first, then the rest. Each group is ordered by priority
    /// on its own, keeping stored order among equal ranks.
    pub fn tasks_by_priority_at(&self, now: PrimitiveDateTime) -> Vec<&Task> {
        let (mut overdue, mut other): (Vec<&Task>, Vec<&Task>) = self
            .tasks()
            .into_iter()
            .partition(|task| task.is_overdue_at(now));

        sort_by_rank_desc(&mut overdue);
        sort_by_rank_desc(&mut other);
        overdue.extend(other);
        overdue
    }

    pub fn get_today_tasks(&self) -> Vec<&Task> {
        self.today_tasks_on(clock::local_today())
    }

    pub fn today_tasks_on(&self, today: Date) -> Vec<&Task> {
        self.tasks()
            .into_iter()
            .filter(|task| task.scheduled_time.date() == today)
            .collect()
    }

    pub fn get_upcoming_tasks(&self, days: u32) -> Vec<&Task> {
        self.upcoming_tasks_from(clock::local_today(), days)
    }

    /// Tasks dated within `today..=today + days`.
    pub fn upcoming_tasks_from(&self, today: Date, days: u32) -> Vec<&Task> {
        let end = today
            .checked_add(Duration::days(i64::from(days)))
            .unwrap_or(Date::MAX);
        self.tasks()
            .into_iter()
            .filter(|task| {
                let date = task.scheduled_time.date();
                today <= date && date <= end
            })
            .collect()
    }

    pub fn find_conflicts(&self) -> Vec<Conflict> {
        conflicts::find_conflicts(&self.sort_by_time())
    }

    pub fn detect_conflicts(&self) -> Vec<String> {
        self.find_conflicts()
            .iter()
            .map(Conflict::to_string)
            .collect()
    }

    /// Sets the repeat interval on a registered task and schedules it.
    pub fn schedule_recurring_task(&mut self, task_id: TaskId, recurrence_days: u32) {
        if let Some(task) = self.store.get_mut(task_id.as_str()) {
            task.recurrence_days = recurrence_days;
        }
        self.add_task(task_id);
    }

    /// Completes a scheduled task. When it recurs, the successor is registered,
    /// appended to the schedule and, if given, to `pet`'s list, then returned.
    /// Ids that are not on the schedule change nothing.
    pub fn complete_task_and_reschedule(
        &mut self,
        task_id: &str,
        pet: Option<&mut Pet>,
    ) -> Option<Task> {
        if !self.all_tasks.iter().any(|id| id == task_id) {
            debug!(task_id, "complete requested for unscheduled task");
            return None;
        }

        let successor = self.store.get_mut(task_id)?.mark_complete()?;
        let successor_id = self.register_task(successor.clone());
        self.add_task(successor_id.clone());
        if let Some(pet) = pet {
            pet.add_task(successor_id);
        }

        Some(successor)
    }
}

fn sort_by_rank_desc(tasks: &mut [&Task]) {
    tasks.sort_by_key(|task| Reverse(task.priority.rank()));
}

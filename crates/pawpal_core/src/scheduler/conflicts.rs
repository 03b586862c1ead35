use crate::model::{Task, TaskId};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use time::Time;

/// Two tasks landing on the same clock time. The date is ignored, so tasks
/// on different days at 09:00 still collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub time: String,
    pub reference_id: TaskId,
    pub reference_title: String,
    pub other_id: TaskId,
    pub other_title: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conflict detected at {} between '{}' and '{}'",
            self.time, self.reference_title, self.other_title
        )
    }
}

fn clock_label(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// `tasks` must already be in ascending time order. The first task seen at a
/// time of day stays the reference for every later task at that time.
pub(crate) fn find_conflicts(tasks: &[&Task]) -> Vec<Conflict> {
    let mut first_seen: HashMap<Time, &Task> = HashMap::new();
    let mut conflicts = Vec::new();

    for &task in tasks {
        let time_of_day = task.scheduled_time.time();
        match first_seen.entry(time_of_day) {
            Entry::Occupied(entry) => {
                let reference = *entry.get();
                conflicts.push(Conflict {
                    time: clock_label(time_of_day),
                    reference_id: reference.task_id.clone(),
                    reference_title: reference.title.clone(),
                    other_id: task.task_id.clone(),
                    other_title: task.title.clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(task);
            }
        }
    }

    conflicts
}

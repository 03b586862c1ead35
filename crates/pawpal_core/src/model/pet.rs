use super::TaskId;
use crate::clock;
use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(birth_date_format, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub species: String,
    pub breed: String,
    #[serde(with = "birth_date_format")]
    pub date_of_birth: Date,
    /// Care tasks in the order they were added.
    #[serde(default)]
    pub tasks: Vec<TaskId>,
}

impl Pet {
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        breed: impl Into<String>,
        date_of_birth: Date,
    ) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            breed: breed.into(),
            date_of_birth,
            tasks: Vec::new(),
        }
    }

    pub fn add_task(&mut self, task_id: TaskId) {
        self.tasks.push(task_id);
    }

    pub fn remove_task(&mut self, task_id: &str) {
        self.tasks.retain(|id| id != task_id);
    }

    pub fn get_tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    pub fn has_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|id| id == task_id)
    }

    pub fn get_age(&self) -> i32 {
        self.age_on(clock::local_today())
    }

    /// Whole years, counting a birthday only once it has been reached.
    pub fn age_on(&self, today: Date) -> i32 {
        let born = self.date_of_birth;
        let mut age = today.year() - born.year();
        if (u8::from(today.month()), today.day()) < (u8::from(born.month()), born.day()) {
            age -= 1;
        }
        age
    }
}

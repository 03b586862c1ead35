//! One in-memory household: an owner with pets, and the scheduler every
//! task is registered with. Nothing outlives the process.

use crate::cli::ListCommand;
use pawpal_core::clock;
use pawpal_core::config::{Config, ConfigOverrides, merge_overrides};
use pawpal_core::{AppError, Conflict, Owner, Pet, Scheduler, Task};
use time::{Date, Duration, PrimitiveDateTime, Time};
use tracing::info;

#[derive(Debug)]
pub struct Completion {
    pub completed: Task,
    pub successor: Option<Task>,
}

/// Everything `task add` needs besides the session.
#[derive(Debug, Clone)]
pub struct NewTask<'a> {
    pub pet: &'a str,
    pub title: &'a str,
    pub when: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub every: Option<u32>,
}

#[derive(Debug, Default)]
pub struct Session {
    owner: Owner,
    scheduler: Scheduler,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            owner: Owner::default(),
            scheduler: Scheduler::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        self.config = merge_overrides(&self.config, overrides);
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn set_owner(&mut self, name: &str, email: &str, phone: &str) -> Result<&Owner, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("owner name is required"));
        }
        self.owner.name = name.to_string();
        self.owner.email = email.trim().to_string();
        self.owner.phone = phone.trim().to_string();
        Ok(&self.owner)
    }

    pub fn add_pet(
        &mut self,
        name: &str,
        species: &str,
        breed: &str,
        born: Option<&str>,
    ) -> Result<&Pet, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("pet name is required"));
        }
        let date_of_birth = match born {
            Some(raw) => clock::parse_date(raw)?,
            None => clock::local_today(),
        };

        self.owner
            .add_pet(Pet::new(name, species.trim(), breed.trim(), date_of_birth));
        info!(pet = name, "pet added");
        self.owner
            .get_pets()
            .last()
            .ok_or_else(|| AppError::invalid_data("pet list is empty after insert"))
    }

    /// Removes every pet with `name`. Their tasks stay on the schedule.
    pub fn remove_pet(&mut self, name: &str) -> Result<usize, AppError> {
        let before = self.owner.get_pets().len();
        self.owner.remove_pet(name.trim());
        let removed = before - self.owner.get_pets().len();
        if removed == 0 {
            return Err(AppError::not_found(format!("pet '{}'", name.trim())));
        }
        Ok(removed)
    }

    pub fn add_task(&mut self, new_task: &NewTask<'_>) -> Result<Task, AppError> {
        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }
        let scheduled_time = clock::parse_datetime(new_task.when)?;
        let pet = self
            .owner
            .pet_mut(new_task.pet.trim())
            .ok_or_else(|| AppError::not_found(format!("pet '{}'", new_task.pet.trim())))?;

        let task = Task::new(
            title,
            new_task.description.trim(),
            new_task.category.trim(),
            scheduled_time,
        )
        .with_priority(new_task.priority);
        let task_id = self.scheduler.register_task(task);
        pet.add_task(task_id.clone());

        match new_task.every {
            Some(days) => self.scheduler.schedule_recurring_task(task_id.clone(), days),
            None => self.scheduler.add_task(task_id.clone()),
        }

        self.task_snapshot(task_id.as_str())
    }

    /// Takes the task off the schedule and off every pet that lists it, then
    /// forgets the record.
    pub fn remove_task(&mut self, id: &str) -> Result<Task, AppError> {
        let id = id.trim();
        for pet in self.owner.pets_mut() {
            pet.remove_task(id);
        }
        let task = self
            .scheduler
            .unregister_task(id)
            .ok_or_else(|| AppError::not_found(format!("task '{id}'")))?;
        info!(task_id = id, "task removed");
        Ok(task)
    }

    pub fn complete(&mut self, id: &str) -> Result<Completion, AppError> {
        let id = id.trim();
        if !self.scheduler.task_ids().iter().any(|task_id| task_id == id) {
            return Err(AppError::not_found(format!("task '{id}' is not scheduled")));
        }

        let pet = self.owner.pet_for_task_mut(id);
        let successor = self.scheduler.complete_task_and_reschedule(id, pet);
        let completed = self.task_snapshot(id)?;

        Ok(Completion {
            completed,
            successor,
        })
    }

    pub fn undo(&mut self, id: &str) -> Result<Task, AppError> {
        let id = id.trim();
        let task = self
            .scheduler
            .task_mut(id)
            .ok_or_else(|| AppError::not_found(format!("task '{id}'")))?;
        task.mark_incomplete();
        Ok(task.clone())
    }

    pub fn list(&self, view: &ListCommand) -> Result<Vec<&Task>, AppError> {
        let tasks = match view {
            ListCommand::Time => self.scheduler.sort_by_time(),
            ListCommand::Priority => self.scheduler.sort_by_priority(),
            ListCommand::Due => self.scheduler.get_tasks_by_priority(),
            ListCommand::Today => self.scheduler.get_today_tasks(),
            ListCommand::Upcoming { days } => self
                .scheduler
                .get_upcoming_tasks((*days).unwrap_or_else(|| self.config.upcoming_days())),
            ListCommand::Pet { name } => {
                let pet = self
                    .owner
                    .pet(name.trim())
                    .ok_or_else(|| AppError::not_found(format!("pet '{}'", name.trim())))?;
                pet.get_tasks()
                    .iter()
                    .filter_map(|id| self.scheduler.task(id.as_str()))
                    .collect()
            }
        };
        Ok(tasks)
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        self.scheduler.find_conflicts()
    }

    /// Name of the first pet listing `task_id`.
    pub fn pet_name_for(&self, task_id: &str) -> Option<&str> {
        self.owner
            .get_pets()
            .iter()
            .find(|pet| pet.has_task(task_id))
            .map(|pet| pet.name.as_str())
    }

    /// Replaces the household with a sample one centred on `today`.
    pub fn load_demo(&mut self, today: Date) {
        let at = |offset_days: i64, hour: u8, minute: u8| {
            let time = Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);
            let date = today
                .checked_add(Duration::days(offset_days))
                .unwrap_or(today);
            PrimitiveDateTime::new(date, time)
        };

        let mut owner = Owner::new("Jordan", "jordan@example.com", "555-0100");
        let mut scheduler = Scheduler::new();
        let mut mochi = Pet::new("Mochi", "dog", "Shiba Inu", date_years_before(today, 3));
        let mut luna = Pet::new("Luna", "cat", "Tabby", date_years_before(today, 5));

        let walk = scheduler.register_task(
            Task::new("Morning Walk", "Loop around the park", "walk", at(0, 8, 0))
                .with_priority("high"),
        );
        let feed_mochi = scheduler.register_task(
            Task::new("Feed Mochi", "Half a cup of kibble", "feeding", at(0, 7, 30))
                .with_priority("medium"),
        );
        let feed_luna = scheduler.register_task(
            Task::new("Feed Luna", "Wet food", "feeding", at(0, 7, 30)).with_priority("high"),
        );
        let vet = scheduler.register_task(
            Task::new("Vet Checkup", "Annual vaccines", "appointment", at(3, 14, 0))
                .with_priority("medium"),
        );

        mochi.add_task(walk.clone());
        mochi.add_task(feed_mochi.clone());
        luna.add_task(feed_luna.clone());
        luna.add_task(vet.clone());
        owner.add_pet(mochi);
        owner.add_pet(luna);

        scheduler.schedule_recurring_task(walk, 1);
        scheduler.add_task(feed_mochi);
        scheduler.add_task(feed_luna);
        scheduler.add_task(vet);

        self.owner = owner;
        self.scheduler = scheduler;
        info!("demo household loaded");
    }

    fn task_snapshot(&self, id: &str) -> Result<Task, AppError> {
        self.scheduler
            .task(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("task '{id}'")))
    }
}

fn date_years_before(today: Date, years: i32) -> Date {
    today
        .replace_year(today.year() - years)
        .or_else(|_| Date::from_calendar_date(today.year() - years, today.month(), 28))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Session};
    use crate::cli::ListCommand;
    use pawpal_core::config::{Config, ConfigOverrides};
    use time::macros::{date, datetime};

    fn session_with_pet() -> Session {
        let mut session = Session::new(Config::default());
        session
            .add_pet("Mochi", "dog", "Shiba", Some("2021-06-01"))
            .unwrap();
        session
    }

    fn new_task<'a>(title: &'a str, when: &'a str) -> NewTask<'a> {
        NewTask {
            pet: "Mochi",
            title,
            when,
            description: "",
            category: "walk",
            priority: "medium",
            every: None,
        }
    }

    #[test]
    fn add_task_registers_on_pet_and_schedule() {
        let mut session = session_with_pet();

        let task = session
            .add_task(&new_task("Walk", "2026-02-15 09:00"))
            .unwrap();

        assert_eq!(task.scheduled_time, datetime!(2026-02-15 09:00));
        assert_eq!(session.scheduler().len(), 1);
        assert_eq!(session.owner().get_all_tasks(), vec![task.task_id.clone()]);
        assert_eq!(session.pet_name_for(task.task_id.as_str()), Some("Mochi"));
    }

    #[test]
    fn add_task_rejects_unknown_pet_and_bad_time() {
        let mut session = session_with_pet();

        let mut missing_pet = new_task("Walk", "2026-02-15 09:00");
        missing_pet.pet = "Rex";
        assert_eq!(session.add_task(&missing_pet).unwrap_err().code(), "not_found");

        let bad_time = new_task("Walk", "soon");
        assert_eq!(session.add_task(&bad_time).unwrap_err().code(), "invalid_input");
        assert!(session.scheduler().is_empty());
    }

    #[test]
    fn completing_recurring_task_adds_successor_to_owning_pet() {
        let mut session = session_with_pet();
        let mut daily = new_task("Breakfast", "2026-02-15 08:00");
        daily.every = Some(1);
        let task = session.add_task(&daily).unwrap();

        let completion = session.complete(task.task_id.as_str()).unwrap();

        assert!(completion.completed.is_completed);
        let successor = completion.successor.expect("successor");
        assert_eq!(successor.scheduled_time, datetime!(2026-02-16 08:00));
        assert_eq!(session.scheduler().len(), 2);
        assert_eq!(session.owner().get_all_tasks().len(), 2);
    }

    #[test]
    fn complete_unknown_task_is_not_found() {
        let mut session = session_with_pet();
        assert_eq!(session.complete("nope").unwrap_err().code(), "not_found");
    }

    #[test]
    fn undo_reopens_task() {
        let mut session = session_with_pet();
        let task = session
            .add_task(&new_task("Walk", "2026-02-15 09:00"))
            .unwrap();
        session.complete(task.task_id.as_str()).unwrap();

        let reopened = session.undo(task.task_id.as_str()).unwrap();

        assert!(!reopened.is_completed);
    }

    #[test]
    fn remove_task_clears_schedule_and_pet() {
        let mut session = session_with_pet();
        let task = session
            .add_task(&new_task("Walk", "2026-02-15 09:00"))
            .unwrap();

        session.remove_task(task.task_id.as_str()).unwrap();

        assert!(session.scheduler().is_empty());
        assert!(session.owner().get_all_tasks().is_empty());
        assert_eq!(session.remove_task("nope").unwrap_err().code(), "not_found");
    }

    #[test]
    fn removed_task_cannot_be_removed_or_reopened_again() {
        let mut session = session_with_pet();
        let task = session
            .add_task(&new_task("Walk", "2026-02-15 09:00"))
            .unwrap();
        let id = task.task_id.as_str();

        assert_eq!(session.remove_task(id).unwrap().title, "Walk");

        assert_eq!(session.remove_task(id).unwrap_err().code(), "not_found");
        assert_eq!(session.undo(id).unwrap_err().code(), "not_found");
        assert_eq!(session.complete(id).unwrap_err().code(), "not_found");
        assert!(session.scheduler().task(id).is_none());
    }

    #[test]
    fn remove_pet_reports_missing_name() {
        let mut session = session_with_pet();
        assert_eq!(session.remove_pet("Mochi").unwrap(), 1);
        assert_eq!(session.remove_pet("Mochi").unwrap_err().code(), "not_found");
    }

    #[test]
    fn list_pet_keeps_insertion_order() {
        let mut session = session_with_pet();
        session.add_task(&new_task("Late", "2026-02-15 20:00")).unwrap();
        session.add_task(&new_task("Early", "2026-02-15 06:00")).unwrap();

        let listed = session
            .list(&ListCommand::Pet { name: "Mochi".into() })
            .unwrap();
        let titles: Vec<&str> = listed.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["Late", "Early"]);

        let by_time = session.list(&ListCommand::Time).unwrap();
        let titles: Vec<&str> = by_time.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn demo_household_has_one_conflict_and_a_recurring_walk() {
        let mut session = Session::new(Config::default());
        session.load_demo(date!(2026 - 02 - 15));

        assert_eq!(session.owner().name, "Jordan");
        assert_eq!(session.owner().get_pets().len(), 2);
        assert_eq!(session.scheduler().len(), 4);

        let conflicts = session.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].reference_title, "Feed Mochi");
        assert_eq!(conflicts[0].other_title, "Feed Luna");

        let walk = session
            .scheduler()
            .tasks()
            .into_iter()
            .find(|task| task.title == "Morning Walk")
            .expect("walk");
        assert_eq!(walk.recurrence_days, 1);
        assert_eq!(walk.scheduled_time, datetime!(2026-02-15 08:00));
    }

    #[test]
    fn overrides_change_upcoming_window() {
        let mut session = Session::new(Config::default());
        session.apply_overrides(&ConfigOverrides {
            upcoming_days: Some(1),
            ..ConfigOverrides::default()
        });
        assert_eq!(session.config().upcoming_days(), 1);
    }
}

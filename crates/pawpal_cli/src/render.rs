//! Plain-text tables and JSON payloads for command output.

use crate::session::Session;
use pawpal_core::clock;
use pawpal_core::config::Palette;
use pawpal_core::{Conflict, Pet, Task};
use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::{Date, PrimitiveDateTime};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Pet")]
    pet: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Repeats")]
    repeats: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct PetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Breed")]
    breed: String,
    #[tabled(rename = "Age")]
    age: i32,
    #[tabled(rename = "Tasks")]
    tasks: usize,
}

pub fn status_label(task: &Task, now: PrimitiveDateTime) -> &'static str {
    if task.is_completed {
        "done"
    } else if task.is_overdue_at(now) {
        "overdue"
    } else {
        "pending"
    }
}

pub fn repeat_label(recurrence_days: u32) -> String {
    match recurrence_days {
        0 => "-".to_string(),
        1 => "daily".to_string(),
        days => format!("every {days} days"),
    }
}

pub fn tasks_table(session: &Session, tasks: &[&Task], now: PrimitiveDateTime) -> String {
    if tasks.is_empty() {
        return "No tasks".to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.task_id.to_string(),
        when: clock::display_datetime(task.scheduled_time),
        pet: session
            .pet_name_for(task.task_id.as_str())
            .unwrap_or("-")
            .to_string(),
        title: task.title.clone(),
        category: task.category.clone(),
        priority: task.priority.to_string(),
        repeats: repeat_label(task.recurrence_days),
        status: status_label(task, now).to_string(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn task_json(session: &Session, task: &Task, now: PrimitiveDateTime) -> Value {
    json!({
        "id": task.task_id,
        "title": task.title,
        "description": task.description,
        "category": task.category,
        "pet": session.pet_name_for(task.task_id.as_str()),
        "scheduled_time": clock::display_datetime(task.scheduled_time),
        "priority": task.priority.as_str(),
        "recurrence_days": task.recurrence_days,
        "is_completed": task.is_completed,
        "status": status_label(task, now),
    })
}

pub fn tasks_json(session: &Session, tasks: &[&Task], now: PrimitiveDateTime) -> Value {
    Value::Array(
        tasks
            .iter()
            .map(|task| task_json(session, task, now))
            .collect(),
    )
}

pub fn pets_table(pets: &[Pet], today: Date) -> String {
    if pets.is_empty() {
        return "No pets".to_string();
    }

    let rows = pets.iter().map(|pet| PetRow {
        name: pet.name.clone(),
        species: pet.species.clone(),
        breed: pet.breed.clone(),
        age: pet.age_on(today),
        tasks: pet.get_tasks().len(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn pet_json(pet: &Pet, today: Date) -> Value {
    json!({
        "name": pet.name,
        "species": pet.species,
        "breed": pet.breed,
        "date_of_birth": pet.date_of_birth.to_string(),
        "age": pet.age_on(today),
        "tasks": pet.get_tasks(),
    })
}

pub fn pets_json(pets: &[Pet], today: Date) -> Value {
    Value::Array(pets.iter().map(|pet| pet_json(pet, today)).collect())
}

pub fn conflicts_plain(conflicts: &[Conflict], palette: &Palette) -> String {
    if conflicts.is_empty() {
        return "No conflicts".to_string();
    }

    conflicts
        .iter()
        .map(|conflict| palette.warn(&conflict.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn conflicts_json(conflicts: &[Conflict]) -> Value {
    Value::Array(
        conflicts
            .iter()
            .map(|conflict| {
                json!({
                    "time": conflict.time,
                    "reference_id": conflict.reference_id,
                    "reference_title": conflict.reference_title,
                    "other_id": conflict.other_id,
                    "other_title": conflict.other_title,
                    "message": conflict.to_string(),
                })
            })
            .collect(),
    )
}

use super::{Pet, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl Owner {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            pets: Vec::new(),
        }
    }

    pub fn add_pet(&mut self, pet: Pet) {
        self.pets.push(pet);
    }

    /// Names are not unique: every pet called `pet_name` goes.
    pub fn remove_pet(&mut self, pet_name: &str) {
        self.pets.retain(|pet| pet.name != pet_name);
    }

    pub fn get_pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn pet(&self, pet_name: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.name == pet_name)
    }

    pub fn pet_mut(&mut self, pet_name: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.name == pet_name)
    }

    pub fn pets_mut(&mut self) -> impl Iterator<Item = &mut Pet> {
        self.pets.iter_mut()
    }

    /// First pet whose list holds `task_id`.
    pub fn pet_for_task_mut(&mut self, task_id: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.has_task(task_id))
    }

    /// Pet order first, then each pet's task order.
    pub fn get_all_tasks(&self) -> Vec<TaskId> {
        self.pets
            .iter()
            .flat_map(|pet| pet.get_tasks().iter().cloned())
            .collect()
    }
}

//! Pet-care planning: owners, pets, care tasks, and a scheduler that sorts
//! them, flags clock-time clashes, and rolls recurring tasks forward.

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use error::AppError;
pub use model::{Owner, Pet, Priority, Task, TaskId};
pub use scheduler::{Conflict, Scheduler};

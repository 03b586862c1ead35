mod owner;
mod pet;
mod task;

pub use owner::Owner;
pub use pet::Pet;
pub use task::{Priority, Task, TaskId};

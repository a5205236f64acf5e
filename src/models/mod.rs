pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskListQuery, TaskUpdate};
pub use user::{User, UserInput, UserUpdate};

pub mod forms;
pub mod public;

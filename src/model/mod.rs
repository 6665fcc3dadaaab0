pub mod role;
pub mod settings;
pub mod shift;
pub mod task;

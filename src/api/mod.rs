pub mod attendance;
pub mod board;

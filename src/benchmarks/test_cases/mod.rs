pub mod send_todo_benchmark;

pub use send_todo_benchmark::*;

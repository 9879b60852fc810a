pub mod todo_requests;

pub use todo_requests::*;

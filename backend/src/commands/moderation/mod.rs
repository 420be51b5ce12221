pub mod board;
pub mod handlers;
pub mod workflow;

pub use board::*;
pub use handlers::*;

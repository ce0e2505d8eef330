//! Core application primitives (session, scheduler, engine)

pub mod engine;
pub mod scheduler;
pub mod session;

pub use engine::*;
pub use scheduler::*;
pub use session::*;

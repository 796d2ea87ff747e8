//! # Pool de Workers
//! src/workers/mod.rs
//!
//! Un único pool de tamaño fijo atiende todas las conexiones. El loop de
//! accept solo encola; nunca espera a que una conexión termine.

pub mod pool;
pub mod queue;

pub use pool::ThreadPool;
pub use queue::{Task, TaskQueue};

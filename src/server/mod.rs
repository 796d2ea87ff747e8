//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! - `tcp`: escucha en un puerto, acepta conexiones y las encola en el pool
//! - `handler`: lee el request de una conexión y escribe la respuesta

pub mod handler;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use handler::{ConnectionHandler, Outcome};
pub use tcp::{Server, ShutdownSignal};

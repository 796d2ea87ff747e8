//! # minihttp
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo de un solo proceso. Cada conexión lleva un
//! request: un GET sirve un archivo de `public/`, un POST devuelve su body
//! dentro de un HTML. Después se cierra la conexión.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de requests, framing de responses, status y MIME
//! - `server`: loop de accept (`tcp`) y atención de cada conexión (`handler`)
//! - `workers`: pool de threads de tamaño fijo con cola FIFO
//! - `config`: parámetros de arranque (CLI / variables de entorno)
//! - `error`: tipos de error por capa
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttp::config::Config;
//! use minihttp::server::Server;
//!
//! let server = Server::new(Config::default()).expect("config inválida");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod workers;

//! # Módulo HTTP
//!
//! Implementa lo mínimo de HTTP/1.1 que necesita el servidor, sin usar
//! librerías de alto nivel:
//!
//! - Parsing incremental de requests desde el stream
//! - Construcción de responses con framing correcto
//! - Status codes y tabla de tipos MIME
//!
//! No hay keep-alive ni chunked encoding: cada conexión lleva un request
//! y una respuesta, y toda respuesta incluye `Connection: close`.

pub mod mime;      // Extensión → Content-Type
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;

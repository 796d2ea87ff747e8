//! # Errores del Servidor
//! src/error.rs
//!
//! Tres familias de error, una por capa:
//!
//! - [`HandleError`]: falla dentro de una conexión. Nunca sale de ella;
//!   el handler la convierte en un 500.
//! - [`PoolError`]: creación del pool o envío de tareas.
//! - [`ServerError`]: errores fatales del proceso (bind, accept, config).

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Une el mensaje de un error con los de toda su cadena de `source()`
///
/// Los variants no repiten el texto de su causa, así que cada mensaje
/// aparece una sola vez: `"I/O error: permission denied"`.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

/// Errores al parsear o procesar un request
#[derive(Debug, Error)]
pub enum HandleError {
    /// Error de I/O leyendo headers, body o archivo, o escribiendo la respuesta
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// El cliente cerró la conexión antes de la línea vacía que cierra los headers
    #[error("connection closed before end of headers")]
    TruncatedHeaders,

    /// La request line no tiene método y path
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// El header Content-Length no es un entero no negativo
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// El body tiene menos bytes de los declarados en Content-Length
    #[error("body shorter than Content-Length ({expected} bytes expected)")]
    IncompleteBody {
        expected: usize,
        #[source]
        source: io::Error,
    },
}

/// Errores del pool de workers
#[derive(Debug, Error)]
pub enum PoolError {
    /// Se pidió un pool sin workers
    #[error("worker pool size must be >= 1")]
    ZeroWorkers,

    /// El sistema operativo no pudo crear el thread de un worker
    #[error("failed to spawn worker {id}")]
    Spawn {
        id: usize,
        #[source]
        source: io::Error,
    },

    /// El pool ya fue apagado y no acepta más tareas
    #[error("worker pool is shut down")]
    ShutDown,
}

/// Errores fatales del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo abrir el socket de escucha
    #[error("failed to bind {address}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// El loop de accept falló (socket cerrado externamente, etc.)
    #[error("accept loop failed")]
    Accept(#[source] io::Error),

    /// Error del pool de workers
    #[error(transparent)]
    Pool(#[from] PoolError),
}

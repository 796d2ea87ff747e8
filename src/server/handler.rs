//! # Handler de Conexiones
//! src/server/handler.rs
//!
//! Atiende una conexión de principio a fin: lee un request, escribe a lo
//! sumo una respuesta y cierra.
//!
//! ## Estados
//!
//! ```text
//! AwaitingRequestLine ──(EOF / error)──────────────────────────► Closed
//!        │
//!        ▼
//! ParsingHeaders ──► Dispatching{GET|POST} ──► WritingResponse ──► Closed
//!        │                  │                        ▲
//!        └───── Error ──────┴────── 500 ─────────────┘
//! ```
//!
//! Los errores de procesamiento se devuelven como `HandleError` y se
//! convierten en un 500 en un paso explícito. El detalle solo va al log.
//!
//! ## Comportamientos conservados a propósito
//!
//! - El body del POST se inserta en el HTML sin escapar.
//! - El path del GET se concatena al directorio raíz sin normalizar `..`.
//! - Métodos distintos de GET y POST cierran la conexión sin respuesta.

use crate::error::{error_chain, HandleError};
use crate::http::mime::content_type_for;
use crate::http::{Method, Request, Response, StatusCode};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Cómo terminó una conexión
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Se escribió una respuesta completa con este código
    Responded(StatusCode),

    /// El cliente cerró o falló antes de enviar la request line
    NoRequest,

    /// Método sin rama (se guarda el token): se cierra sin responder
    Unhandled(String),

    /// Había respuesta pero no se pudo escribir en el socket
    WriteFailed(StatusCode),
}

// Resultado del despacho por método
enum Dispatch {
    Respond(Response),
    Close(String),
}

/// Responde requests sirviendo archivos de `public_dir`
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    public_dir: PathBuf,
}

impl ConnectionHandler {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Atiende una conexión TCP. El socket se cierra al retornar.
    pub fn handle(&self, stream: TcpStream) -> Outcome {
        let client = stream
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let mut reader = BufReader::new(&stream);
        let mut writer = &stream;
        self.serve(&mut reader, &mut writer, &client)
    }

    /// Lee un request de `reader` y escribe la respuesta en `writer`
    ///
    /// Nunca propaga errores: todo termina en un [`Outcome`].
    pub fn serve<R: BufRead, W: Write>(&self, reader: &mut R, writer: &mut W, client: &str) -> Outcome {
        let request_line = match Request::read_request_line(reader) {
            Ok(Some(line)) => line,
            Ok(None) => {
                warn!(client, "conexión cerrada antes de la request line");
                return Outcome::NoRequest;
            }
            Err(e) => {
                error!(client, error = %e, "error de I/O leyendo la request line");
                return Outcome::NoRequest;
            }
        };

        info!("Recibido: {}", request_line);

        let response = match self.process(&request_line, reader, client) {
            Ok(Dispatch::Respond(response)) => response,
            Ok(Dispatch::Close(method)) => return Outcome::Unhandled(method),
            Err(e) => Self::error_response(&e),
        };

        let status = response.status();
        match Self::write_response(writer, &response) {
            Ok(()) => Outcome::Responded(status),
            Err(e) => {
                error!(client, error = %e, status = %status, "error de I/O escribiendo la respuesta");
                Outcome::WriteFailed(status)
            }
        }
    }

    /// Parsea el resto del request y despacha por método
    ///
    fn process<R: BufRead>(
        &self,
        request_line: &str,
        reader: &mut R,
        client: &str,
    ) -> Result<Dispatch, HandleError> {
        let request = Request::read_from(request_line, reader)?;

        info!("Request: {} {}", request.method(), request.path());
        info!("Cliente: {}", client);

        match request.method() {
            Method::POST => Ok(Dispatch::Respond(Self::echo_post(&request))),
            Method::GET => self.serve_file(request.path()).map(Dispatch::Respond),
            Method::Other(token) => {
                warn!(method = %token, "método sin handler, se cierra sin responder");
                Ok(Dispatch::Close(token.clone()))
            }
        }
    }

    /// Devuelve el body del POST dentro de un fragmento HTML
    fn echo_post(request: &Request) -> Response {
        let body = String::from_utf8_lossy(request.body().unwrap_or_default());
        info!("Body del POST: {}", body);

        // Sin escapar: el body llega al HTML tal cual
        let html = format!("<h1>POST received</h1><p>{}</p>", body);
        Response::html(StatusCode::Ok, &html)
    }

    /// Sirve un archivo de `public_dir`, o 404
    fn serve_file(&self, path: &str) -> Result<Response, HandleError> {
        let path = if path == "/" { "/index.html" } else { path };
        let file_path = self.resolve(path);

        // Cualquier fallo de metadata cuenta como "no existe"
        let is_file = fs::metadata(&file_path)
            .map(|meta| !meta.is_dir())
            .unwrap_or(false);
        if !is_file {
            return Ok(Response::not_found());
        }

        let content = fs::read(&file_path)?;
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        Ok(Response::new(StatusCode::Ok)
            .with_header("Content-Type", content_type_for(file_name))
            .with_body_bytes(content))
    }

    /// Concatena el path del request al directorio raíz
    ///
    /// Es concatenación de texto, no `Path::join`: un path absoluto no
    /// reemplaza la raíz y `..` no se resuelve.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.public_dir.clone().into_os_string();
        full.push(path);
        PathBuf::from(full)
    }

    /// Convierte un error de procesamiento en el 500 genérico
    fn error_response(err: &HandleError) -> Response {
        error!(error = %error_chain(err), "ERROR procesando el request");
        Response::internal_error()
    }

    fn write_response<W: Write>(writer: &mut W, response: &Response) -> std::io::Result<()> {
        writer.write_all(&response.to_bytes())?;
        writer.flush()
    }
}

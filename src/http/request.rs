//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser incremental que lee directamente del stream de la conexión.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /form HTTP/1.1\r\n
//! Host: localhost:8010\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Orden de lectura
//!
//! 1. **Request Line**: se lee primero pero se valida al final
//! 2. **Headers**: `Name: Value` hasta la línea vacía
//! 3. **Body**: solo en POST, exactamente `Content-Length` bytes
//!
//! Se aceptan terminadores `\r\n` y `\n`.

use crate::error::HandleError;
use std::collections::HashMap;
use std::io::{self, BufRead, Read};

/// Método HTTP del request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Servir un archivo estático
    GET,

    /// POST - Eco del body como HTML
    POST,

    /// Cualquier otro token; el servidor no responde a estos métodos
    Other(String),
}

impl Method {
    /// Interpreta el primer token de la request line
    ///
    /// La comparación distingue mayúsculas: `get` es `Other("get")`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request HTTP ya parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path tal cual llegó (ej: "/index.html"), sin normalizar
    path: String,

    /// Headers con el nombre tal cual llegó; el último duplicado gana
    headers: HashMap<String, String>,

    /// Body del request, solo presente en POST
    body: Option<Vec<u8>>,
}

impl Request {
    /// Lee la request line (primera línea del request)
    ///
    /// Retorna `Ok(None)` si el cliente cerró sin enviar nada.
    pub fn read_request_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
        read_line(reader)
    }

    /// Lee el resto del request a partir de una request line ya leída
    ///
    /// Los headers se consumen antes de validar la request line.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttp::http::{Method, Request};
    /// use std::io::Cursor;
    ///
    /// let mut stream = Cursor::new(&b"Host: localhost\r\n\r\n"[..]);
    /// let request = Request::read_from("GET /app.js HTTP/1.1", &mut stream).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), "/app.js");
    /// assert_eq!(request.header("Host"), Some("localhost"));
    /// ```
    pub fn read_from<R: BufRead>(request_line: &str, reader: &mut R) -> Result<Self, HandleError> {
        let headers = parse_headers(reader)?;
        let (method, path) = parse_request_line(request_line)?;

        let body = if method == Method::POST {
            let declared = headers.get("Content-Length").map(String::as_str).unwrap_or("0");
            let length = parse_content_length(declared)?;
            Some(read_body(reader, length)?)
        } else {
            None
        };

        Ok(Request {
            method,
            path,
            headers,
            body,
        })
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (el nombre distingue mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request (solo POST)
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Lee una línea y le quita el terminador (`\n` o `\r\n`)
///
/// Retorna `Ok(None)` en EOF. Bytes que no son UTF-8 se reemplazan.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }

    if raw.last() == Some(&b'\n') {
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

/// Parsea headers hasta encontrar la línea vacía
///
/// Las líneas sin `:` se ignoran. Si el stream termina antes de la
/// línea vacía el request está truncado.
fn parse_headers<R: BufRead>(reader: &mut R) -> Result<HashMap<String, String>, HandleError> {
    let mut headers = HashMap::new();

    loop {
        let line = read_line(reader)?.ok_or(HandleError::TruncatedHeaders)?;
        if line.is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(headers)
}

/// Separa la request line en método y path
///
/// Formato: `METHOD /path VERSION`. La versión no se valida.
fn parse_request_line(line: &str) -> Result<(Method, String), HandleError> {
    let mut tokens = line.split(' ');
    let method = tokens.next().filter(|t| !t.is_empty());
    let path = tokens.next().filter(|t| !t.is_empty());

    match (method, path) {
        (Some(method), Some(path)) => Ok((Method::from_token(method), path.to_string())),
        _ => Err(HandleError::MalformedRequestLine(line.to_string())),
    }
}

fn parse_content_length(value: &str) -> Result<usize, HandleError> {
    value
        .parse::<usize>()
        .map_err(|_| HandleError::InvalidContentLength(value.to_string()))
}

/// Lee exactamente `length` bytes de body
fn read_body<R: BufRead>(reader: &mut R, length: usize) -> Result<Vec<u8>, HandleError> {
    let mut body = Vec::new();
    let incomplete = |source: io::Error| HandleError::IncompleteBody {
        expected: length,
        source,
    };

    reader
        .by_ref()
        .take(length as u64)
        .read_to_end(&mut body)
        .map_err(incomplete)?;

    if body.len() < length {
        return Err(incomplete(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("received {} of {} bytes", body.len(), length),
        )));
    }

    Ok(body)
}

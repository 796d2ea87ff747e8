//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.1 y convertirlas a bytes.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 404 Not Found\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 22\r\n
//! Connection: close\r\n
//! \r\n
//! <h1>404 Not Found</h1>
//! ```
//!
//! `Content-Length` y `Connection: close` no se guardan como headers:
//! se escriben al serializar, a partir del body real. Así nunca pueden
//! quedar desincronizados.

use super::StatusCode;

/// Body fijo de la respuesta 404
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

/// Body fijo de la respuesta 500
pub const INTERNAL_ERROR_BODY: &str = "<h1>500 Internal Server Error</h1>";

/// Headers que el serializador controla
const MANAGED_HEADERS: [&str; 2] = ["Content-Length", "Connection"];

/// Respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers en orden de inserción (sin Content-Length ni Connection)
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe conservando su posición.
    /// `Content-Length` y `Connection` se ignoran.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Type", "text/css");
    /// assert_eq!(response.header("Content-Type"), Some("text/css"));
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        if MANAGED_HEADERS.contains(&name) {
            return;
        }

        match self.headers.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes (archivos binarios)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Respuesta HTML con el código indicado
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Response, StatusCode};
    ///
    /// let response = Response::html(StatusCode::Ok, "<h1>hola</h1>");
    /// assert_eq!(response.content_length(), 13);
    /// ```
    pub fn html(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(body)
    }

    /// 404 con el body fijo
    pub fn not_found() -> Self {
        Self::html(StatusCode::NotFound, NOT_FOUND_BODY)
    }

    /// 500 con el body fijo; el detalle del error nunca llega al cliente
    pub fn internal_error() -> Self {
        Self::html(StatusCode::InternalServerError, INTERNAL_ERROR_BODY)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers en orden de inserción
    /// - `Content-Length` calculado del body y `Connection: close`
    /// - Línea vacía y body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);

        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.content_length()));
        head.push_str("Connection: close\r\n\r\n");

        let mut result = head.into_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Longitud en bytes del body, la que se anuncia en `Content-Length`
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(response: &Response) -> String {
        String::from_utf8(response.to_bytes()).unwrap()
    }

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
        assert_eq!(response.header("Content-Type"), None);
    }

    #[test]
    fn test_header_overwrite_keeps_position() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("X-Custom", "value")
            .with_header("Content-Type", "text/html");

        assert_eq!(response.header("Content-Type"), Some("text/html"));
        let text = as_text(&response);
        assert!(text.find("Content-Type").unwrap() < text.find("X-Custom").unwrap());
    }

    #[test]
    fn test_managed_headers_are_ignored() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "999")
            .with_header("Connection", "keep-alive")
            .with_body("abc");

        let text = as_text(&response);
        assert!(text.contains("Content-Length: 3\r\n"));
        assert!(!text.contains("999"));
        assert!(!text.contains("keep-alive"));
    }

    #[test]
    fn test_to_bytes_layout() {
        let response = Response::html(StatusCode::Ok, "Test");

        assert_eq!(
            as_text(&response),
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 4\r\nConnection: close\r\n\r\nTest"
        );
    }

    #[test]
    fn test_empty_body_still_framed() {
        let text = as_text(&Response::new(StatusCode::Ok));

        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\n"));
    }

    #[test]
    fn test_content_length_counts_bytes() {
        // "ñ" ocupa dos bytes en UTF-8
        let response = Response::html(StatusCode::Ok, "ñ");
        assert_eq!(response.content_length(), 2);
        assert!(as_text(&response).contains("Content-Length: 2\r\n"));
    }

    #[test]
    fn test_binary_body() {
        let binary_data = vec![0x89, 0x50, 0x4E, 0x47, 0x00, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body_bytes(binary_data.clone());

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&binary_data));
        assert_eq!(response.content_length(), 6);
    }

    #[test]
    fn test_not_found() {
        let response = Response::not_found();

        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(response.body(), NOT_FOUND_BODY.as_bytes());
        assert!(as_text(&response).starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_internal_error() {
        let response = Response::internal_error();

        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.body(), INTERNAL_ERROR_BODY.as_bytes());
    }
}

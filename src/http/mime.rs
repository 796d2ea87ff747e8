//! # Tipos MIME
//! src/http/mime.rs
//!
//! Deduce el `Content-Type` de un archivo a partir de su extensión.
//! La comparación es por sufijo y distingue mayúsculas: `INDEX.HTML`
//! se sirve como `application/octet-stream`.

/// Tipo usado cuando la extensión no está en la tabla
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Tabla extensión → tipo MIME
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
];

/// Retorna el tipo MIME para un nombre de archivo
///
/// # Ejemplo
/// ```
/// use minihttp::http::mime::content_type_for;
///
/// assert_eq!(content_type_for("style.css"), "text/css");
/// assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(extension, _)| file_name.ends_with(extension))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

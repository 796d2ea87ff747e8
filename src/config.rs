//! # Configuración del Servidor
//! src/config.rs
//!
//! Parámetros de arranque, desde argumentos CLI o variables de entorno.
//! Los valores por defecto son los de referencia: puerto 8010, 10 workers,
//! archivos en `public/` y 70 s de timeout de accept.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./minihttp --port 8080 --workers 4 --public-dir ./site
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 WORKERS=4 ./minihttp
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "minihttp")]
#[command(about = "Servidor HTTP/1.1 mínimo: archivos estáticos y eco de POST")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8010", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers del pool (fijo durante toda la ejecución)
    #[arg(short, long, default_value = "10", env = "WORKERS")]
    pub workers: usize,

    /// Directorio raíz de los archivos que se sirven con GET
    #[arg(long, default_value = "public", env = "PUBLIC_DIR")]
    pub public_dir: PathBuf,

    /// Tiempo sin conexiones nuevas tras el cual se registra inactividad (ms)
    #[arg(long = "accept-timeout-ms", default_value = "70000", env = "ACCEPT_TIMEOUT_MS")]
    pub accept_timeout_ms: u64,
}

impl Config {
    /// Crea una configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use minihttp::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8010");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de accept como `Duration`
    pub fn accept_timeout(&self) -> Duration {
        Duration::from_millis(self.accept_timeout_ms)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.accept_timeout_ms == 0 {
            return Err("Accept timeout must be > 0".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn print_summary(&self) {
        info!(
            address = %self.address(),
            workers = self.workers,
            public_dir = %self.public_dir.display(),
            accept_timeout_ms = self.accept_timeout_ms,
            "configuración cargada"
        );
    }
}

impl Default for Config {
    /// Configuración de referencia
    fn default() -> Self {
        Self {
            port: 8010,
            host: "0.0.0.0".to_string(),
            workers: 10,
            public_dir: PathBuf::from("public"),
            accept_timeout_ms: 70_000,
        }
    }
}

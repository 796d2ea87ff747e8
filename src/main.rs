//! # minihttp - Entry Point
//! src/main.rs
//!
//! Lee la configuración, instala el subscriber de logging y corre el
//! servidor hasta que el loop de accept falle.

use minihttp::config::Config;
use minihttp::error::error_chain;
use minihttp::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minihttp=info")),
        )
        .with_thread_names(true)
        .init();

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();
    config.print_summary();

    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "no se pudo iniciar el servidor");
            std::process::exit(2);
        }
    };

    // Bloquea hasta un error fatal; el pool ya quedó apagado al retornar
    if let Err(e) = server.run() {
        tracing::error!(error = %error_chain(&e), "error fatal del servidor");
        drop(server);
        std::process::exit(1);
    }
}

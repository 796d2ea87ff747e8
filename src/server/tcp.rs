//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Un thread acepta conexiones y las encola en un [`ThreadPool`] de tamaño
//! fijo. El loop de accept nunca espera a que una conexión termine; si
//! todos los workers están ocupados, las conexiones esperan en la cola.
//!
//! El listener trabaja en modo no bloqueante para poder revisar la señal
//! de apagado y el timeout de inactividad entre accepts.

use crate::config::Config;
use crate::error::{error_chain, ServerError};
use crate::server::handler::ConnectionHandler;
use crate::workers::ThreadPool;
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Pausa entre intentos de accept cuando no hay conexiones pendientes
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Señal para detener el loop de accept desde otro thread
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pide al servidor que deje de aceptar conexiones
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Servidor HTTP: loop de accept + pool de workers
pub struct Server {
    config: Config,
    handler: Arc<ConnectionHandler>,
    pool: ThreadPool,
    shutdown: ShutdownSignal,
}

impl Server {
    /// Valida la configuración y arranca los workers
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let pool = ThreadPool::new(config.workers)?;
        let handler = Arc::new(ConnectionHandler::new(&config.public_dir));

        Ok(Self {
            config,
            handler,
            pool,
            shutdown: ShutdownSignal::new(),
        })
    }

    /// Señal compartida para detener [`Server::serve`] desde otro thread
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Abre el puerto configurado y atiende conexiones hasta un error fatal
    ///
    /// Si el bind falla el pool se apaga antes de devolver el error, igual
    /// que al terminar [`Server::serve`].
    pub fn run(&self) -> Result<(), ServerError> {
        let address = self.config.address();
        let listener = match TcpListener::bind(&address) {
            Ok(listener) => listener,
            Err(source) => {
                self.shutdown();
                return Err(ServerError::Bind { address, source });
            }
        };

        info!("Servidor escuchando en el puerto {}", self.config.port);
        self.serve(listener)
    }

    /// Loop de accept sobre un listener ya abierto
    ///
    /// Termina con `Ok(())` si se activó la señal de apagado, o con el
    /// error de accept. En ambos casos el pool queda apagado.
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let result = self.accept_loop(&listener);

        if let Err(e) = &result {
            error!(error = %error_chain(e), "el loop de accept terminó con error");
        }
        self.shutdown();

        result
    }

    fn accept_loop(&self, listener: &TcpListener) -> Result<(), ServerError> {
        listener.set_nonblocking(true).map_err(ServerError::Accept)?;

        let idle_timeout = self.config.accept_timeout();
        let mut idle_since = Instant::now();

        while !self.shutdown.is_triggered() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    idle_since = Instant::now();
                    self.dispatch(stream, peer)?;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    // El timeout no es un error: se registra y se sigue escuchando
                    if idle_since.elapsed() >= idle_timeout {
                        debug!(
                            timeout_ms = idle_timeout.as_millis() as u64,
                            "sin conexiones durante el timeout de accept, se sigue escuchando"
                        );
                        idle_since = Instant::now();
                    }
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::ConnectionAborted) => {
                    warn!(error = %e, "error transitorio en accept");
                }
                Err(e) => return Err(ServerError::Accept(e)),
            }
        }

        info!("apagado solicitado, loop de accept detenido");
        Ok(())
    }

    /// Encola la conexión en el pool
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) -> Result<(), ServerError> {
        // Los workers hacen I/O bloqueante
        if let Err(e) = stream.set_nonblocking(false) {
            warn!(%peer, error = %e, "conexión descartada: no se pudo pasar a modo bloqueante");
            return Ok(());
        }

        debug!(%peer, pending = self.pool.pending(), "nueva conexión");

        let handler = Arc::clone(&self.handler);
        self.pool.submit(move || {
            let outcome = handler.handle(stream);
            debug!(%peer, ?outcome, "conexión cerrada");
        })?;

        Ok(())
    }

    /// Deja de aceptar tareas en el pool; las conexiones en curso terminan
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;
    use std::fs;
    use std::io::{Read, Write};

    fn test_config(public_dir: &std::path::Path, workers: usize) -> Config {
        Config {
            workers,
            public_dir: public_dir.to_path_buf(),
            accept_timeout_ms: 20,
            ..Config::default()
        }
    }

    fn fetch(addr: SocketAddr, raw: &[u8]) -> String {
        let mut client = TcpStream::connect(addr).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        client.write_all(raw).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_new_rejects_zero_workers() {
        let mut config = Config::default();
        config.workers = 0;

        assert!(matches!(Server::new(config), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_new_starts_pool() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::new(test_config(dir.path(), 3)).unwrap();

        assert_eq!(server.pool().size(), 3);
        assert_eq!(server.config().workers, 3);
    }

    #[test]
    fn test_serve_until_shutdown_signal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "hi").unwrap();

        let server = Server::new(test_config(dir.path(), 2)).unwrap();
        let signal = server.shutdown_signal();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let running = thread::spawn(move || {
            let result = server.serve(listener);
            (result, server.pool().is_shutdown())
        });

        let response = fetch(addr, b"GET / HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("hi"));

        // Varios timeouts de inactividad pasan sin detener el servidor
        thread::sleep(Duration::from_millis(100));
        let response = fetch(addr, b"GET /missing HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 404 Not Found"));

        signal.trigger();
        let (result, pool_shut_down) = running.join().unwrap();
        assert!(result.is_ok());
        assert!(pool_shut_down);
    }

    #[test]
    fn test_run_on_busy_port_shuts_down_pool() {
        let dir = tempfile::tempdir().unwrap();
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            ..test_config(dir.path(), 2)
        };
        let server = Server::new(config).unwrap();

        let result = server.run();

        assert!(matches!(result, Err(ServerError::Bind { .. })));
        assert!(server.pool().is_shutdown());
    }

    #[test]
    fn test_dispatch_after_shutdown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::new(test_config(dir.path(), 1)).unwrap();
        server.shutdown();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).unwrap();
        let (stream, peer) = listener.accept().unwrap();

        let result = server.dispatch(stream, peer);
        assert!(matches!(result, Err(ServerError::Pool(PoolError::ShutDown))));
    }

    #[test]
    fn test_signal_is_shared() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();

        assert!(!signal.is_triggered());
        clone.trigger();
        assert!(signal.is_triggered());
    }
}

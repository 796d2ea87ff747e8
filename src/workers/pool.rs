//! # Pool de Workers
//! src/workers/pool.rs
//!
//! N threads de larga vida que consumen una [`TaskQueue`] compartida.
//! El tamaño se fija al crear el pool y nunca cambia.
//!
//! ## Ciclo de vida
//!
//! ```text
//! new(N) → submit()* → shutdown() → drop (join)
//! ```
//!
//! Después de `shutdown()` no se aceptan tareas; las que ya estaban en la
//! cola se ejecutan igual. Al destruir el pool se espera a que todos los
//! workers terminen.

use super::queue::{Task, TaskQueue};
use crate::error::PoolError;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

/// Pool de tamaño fijo con cola FIFO
pub struct ThreadPool {
    workers: Vec<Worker>,
    queue: TaskQueue,
}

impl ThreadPool {
    /// Crea el pool e inicia `size` workers
    ///
    /// # Errores
    ///
    /// `PoolError::ZeroWorkers` si `size == 0`, `PoolError::Spawn` si el
    /// sistema no puede crear un thread.
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroWorkers);
        }

        let queue = TaskQueue::new();
        let mut pool = Self {
            workers: Vec::with_capacity(size),
            queue,
        };

        for id in 0..size {
            let queue = pool.queue.clone();
            // Si falla a mitad, el Drop del pool cierra y une los ya creados
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, queue))
                .map_err(|source| PoolError::Spawn { id, source })?;

            pool.workers.push(Worker {
                id,
                handle: Some(handle),
            });
        }

        Ok(pool)
    }

    /// Envía una tarea a la cola sin esperar a que se ejecute
    pub fn submit<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue
            .push(Box::new(task))
            .map_err(|_rejected| PoolError::ShutDown)
    }

    /// Deja de aceptar tareas. No bloquea; las tareas en curso terminan.
    pub fn shutdown(&self) {
        if !self.queue.is_closed() {
            debug!(pending = self.queue.len(), "apagando el pool de workers");
        }
        self.queue.close();
    }

    pub fn is_shutdown(&self) -> bool {
        self.queue.is_closed()
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tareas esperando un worker libre
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Loop principal del worker
    fn worker_loop(id: usize, queue: TaskQueue) {
        debug!(worker = id, "worker iniciado");

        while let Some(task) = queue.pop() {
            Self::run_task(id, task);
        }

        debug!(worker = id, "worker detenido");
    }

    // Un pánico en una tarea no debe matar al worker
    fn run_task(id: usize, task: Task) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(worker = id, panic = %message, "pánico en una tarea");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    error!(worker = worker.id, "pánico en el thread del worker");
                }
            }
        }
    }
}

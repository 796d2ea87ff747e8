//! # Cola de Tareas
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe sin límite de capacidad. Una vez cerrada no
//! acepta tareas nuevas, pero las que ya estaban se siguen entregando.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Tarea que ejecuta un worker
pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    tasks: VecDeque<Task>,
    closed: bool,
}

/// Cola compartida entre el pool y sus workers
#[derive(Clone)]
pub struct TaskQueue {
    /// Estado interno protegido por el mutex
    state: Arc<Mutex<QueueState>>,

    /// Condvar para despertar workers cuando hay tareas o se cierra la cola
    condvar: Arc<Condvar>,
}

impl TaskQueue {
    /// Crea una cola vacía y abierta
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                tasks: VecDeque::new(),
                closed: false,
            })),
            condvar: Arc::new(Condvar::new()),
        }
    }

    // Las tareas corren fuera del lock, así que un mutex envenenado
    // no deja el estado a medias.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola una tarea
    ///
    /// Si la cola está cerrada devuelve la tarea sin ejecutarla.
    pub fn push(&self, task: Task) -> Result<(), Task> {
        let mut state = self.lock();
        if state.closed {
            return Err(task);
        }

        state.tasks.push_back(task);

        // Notificar a un worker esperando
        self.condvar.notify_one();

        Ok(())
    }

    /// Desencola la tarea más antigua
    ///
    /// Bloquea hasta que haya una tarea. Retorna `None` cuando la cola
    /// está cerrada y vacía.
    pub fn pop(&self) -> Option<Task> {
        let mut state = self.lock();

        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.closed {
                return None;
            }

            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cierra la cola y despierta a todos los workers
    pub fn close(&self) {
        self.lock().closed = true;
        self.condvar.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Tareas pendientes
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn task_sending(tx: &mpsc::Sender<u32>, value: u32) -> Task {
        let tx = tx.clone();
        Box::new(move || tx.send(value).unwrap())
    }

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new();
        let (tx, rx) = mpsc::channel();

        for i in 0..3 {
            assert!(queue.push(task_sending(&tx, i)).is_ok());
        }
        assert_eq!(queue.len(), 3);

        while !queue.is_empty() {
            (queue.pop().unwrap())();
        }

        let received: Vec<u32> = rx.try_iter().collect();
        assert_eq!(received, vec![0, 1, 2]);
    }

    #[test]
    fn test_push_after_close_is_rejected() {
        let queue = TaskQueue::new();
        queue.close();

        assert!(queue.is_closed());
        assert!(queue.push(Box::new(|| {})).is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_close_drains_pending_tasks() {
        let queue = TaskQueue::new();
        let (tx, rx) = mpsc::channel();
        queue.push(task_sending(&tx, 7)).ok();
        queue.close();

        (queue.pop().expect("pending task"))();
        assert!(queue.pop().is_none());
        assert_eq!(rx.recv().unwrap(), 7);
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let queue = TaskQueue::new();
        let (tx, rx) = mpsc::channel();

        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || {
                if let Some(task) = queue.pop() {
                    task();
                }
            })
        };

        thread::sleep(Duration::from_millis(50));
        queue.push(task_sending(&tx, 42)).ok();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
        consumer.join().unwrap();
    }

    #[test]
    fn test_close_wakes_waiting_consumer() {
        let queue = TaskQueue::new();

        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop().is_none())
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();

        assert!(consumer.join().unwrap());
    }
}

//! A fixed-size pool of worker threads pulling jobs off a shared channel.
//! The connection accept loop hands each accepted connection to `execute`
//! rather than spawning a thread per connection.

use crossbeam_channel::{unbounded, Sender};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns `size` worker threads, each looping on the shared job queue.
    /// `size` is floored at 1 so a misconfigured `0` doesn't deadlock every
    /// connection.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);

        for _ in 0..size {
            let receiver = receiver.clone();
            workers.push(thread::spawn(move || {
                for job in receiver {
                    job();
                }
            }));
        }

        ThreadPool {
            sender: Some(sender),
            workers,
        }
    }

    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(sender) = &self.sender {
            let _ = sender.send(Box::new(job));
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Dropping the sender closes the channel, which ends each worker's
        // `for job in receiver` loop so the joins below actually return.
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

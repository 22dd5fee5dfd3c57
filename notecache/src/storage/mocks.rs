use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use async_trait::async_trait;
use crate::storage::io_trait::TableIo;
use crate::storage::{Record, StoreError};

/// An in-memory medium that records every table write and fails on demand.
pub struct TestTableIo<R: Record> {
    initial: Vec<R>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
    writes: Mutex<Vec<Vec<R>>>,
}

impl<R: Record> TestTableIo<R> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(initial: Vec<R>) -> Self {
        TestTableIo {
            initial,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            write_attempts: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_reads() -> Self {
        let io = Self::new();
        io.fail_reads.store(true, Ordering::Relaxed);
        io
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::Relaxed)
    }

    /// Successful writes, oldest first.
    pub fn writes(&self) -> Vec<Vec<R>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last_write(&self) -> Option<Vec<R>> {
        self.writes.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl<R: Record> TableIo<R> for TestTableIo<R> {
    async fn read_table(&self) -> Result<Vec<R>, StoreError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied).into())
        }
        Ok(self.initial.clone())
    }

    async fn write_table(&self, records: &[R]) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe).into())
        }
        self.writes.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}

use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering::Relaxed},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

/// Log target that writes to stderr, or holds lines back while the
/// terminal host owns the screen.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    held: Arc<AtomicBool>,
    pending: Arc<Mutex<Vec<u8>>>,
}

impl LogSink {
    #[cfg_attr(not(feature = "terminal"), allow(dead_code))]
    pub fn hold(&self) {
        self.held.store(true, Relaxed);
    }

    /// Stop holding and write out everything held so far.
    #[cfg_attr(not(feature = "terminal"), allow(dead_code))]
    pub fn release(&self) -> io::Result<()> {
        let pending = std::mem::take(&mut *self.pending());
        self.held.store(false, Relaxed);

        let mut stderr = io::stderr().lock();
        stderr.write_all(&pending)?;
        stderr.flush()
    }

    fn pending(&self) -> MutexGuard<'_, Vec<u8>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.held.load(Relaxed) {
            self.pending().extend_from_slice(buf);
            return Ok(buf.len());
        }

        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.held.load(Relaxed) {
            return Ok(());
        }

        io::stderr().flush()
    }
}

/// Install the global logger. `RUST_LOG` overrides the `info` default.
pub fn init() -> LogSink {
    let sink = LogSink::default();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(sink.clone())))
        .init();

    sink
}

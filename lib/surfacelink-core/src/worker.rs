use crate::config::Config;
use crate::platform::NativeRuntime;
use crate::{SurfaceLinkFatalError, SurfaceLinkResult};
use log::{error, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// The thread hosting the native entry point.
///
/// Its body is a single blocking call into the runtime. Nothing joins, cancels, or restarts it;
/// process teardown is its terminal state.
#[derive(Debug)]
pub struct WorkerThread {
    handle: JoinHandle<()>,
    entry_name: String,
}

impl WorkerThread {
    pub fn spawn<R>(runtime: Arc<R>, config: &Config) -> SurfaceLinkResult<Self>
    where
        R: NativeRuntime + ?Sized,
    {
        if config.worker_thread_name.contains('\0') {
            return Err("Worker thread name contains a NUL byte".into());
        }

        let entry_name = config.entry_name.clone();
        let mut builder = thread::Builder::new().name(config.worker_thread_name.clone());
        if let Some(stack_size) = config.worker_stack_size {
            builder = builder.stack_size(stack_size);
        }

        let thread_entry_name = entry_name.clone();
        let handle = builder
            .spawn(move || {
                info!("Entering native runtime as \"{thread_entry_name}\"");
                runtime.entry_point(&thread_entry_name);
                error!("Native runtime \"{thread_entry_name}\" returned, worker thread is exiting");
            })
            .map_err(SurfaceLinkFatalError::WorkerSpawn)?;

        Ok(Self { handle, entry_name })
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.handle.thread().name()
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Whether the entry point has returned. Diagnostic only; a finished worker is not restarted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

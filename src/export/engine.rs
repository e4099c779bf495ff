use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

use crate::export::obj::{ObjStats, write_obj};
use crate::math::Triangle;

pub enum ExportCommand {
    Save {
        path: PathBuf,
        triangles: Vec<Triangle>,
    },
    Stop,
}

#[derive(Debug)]
pub enum ExportResult {
    Saved { path: PathBuf, stats: ObjStats },
    Failed { path: PathBuf, error: String },
}

/// Writes OBJ files on a worker thread so the frame loop never waits on disk.
pub struct ExportEngine {
    tx_cmd: Sender<ExportCommand>,
    rx_result: Receiver<ExportResult>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ExportEngine {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<ExportCommand>();
        let (tx_result, rx_result) = channel::unbounded::<ExportResult>();
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::Builder::new()
            .name("obj-export".into())
            .spawn(move || export_thread(rx_cmd, tx_result, last_error_clone))
            .ok();

        if thread_handle.is_none() {
            error!("could not spawn export worker, saving is unavailable");
        }

        Self {
            tx_cmd,
            rx_result,
            last_error,
            thread_handle,
        }
    }

    /// Queues a save of a snapshot of the mesh. Returns false when the job
    /// could not be handed to the worker; `last_error` then says why.
    pub fn save(&self, path: impl Into<PathBuf>, triangles: &[Triangle]) -> bool {
        let path = path.into();
        let queued = self.thread_handle.is_some()
            && self
                .tx_cmd
                .send(ExportCommand::Save {
                    path: path.clone(),
                    triangles: triangles.to_vec(),
                })
                .is_ok();

        if !queued {
            error!(path = %path.display(), "export worker is not running");
            *self.last_error.lock() = Some(format!("cannot save {}: export worker is not running", path.display()));
        }
        queued
    }

    pub fn try_recv_result(&self) -> Option<ExportResult> {
        self.rx_result.try_recv().ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(ExportCommand::Stop);
    }
}

impl Drop for ExportEngine {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(ExportCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn export_thread(
    rx_cmd: Receiver<ExportCommand>,
    tx_result: Sender<ExportResult>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        let cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        match cmd {
            ExportCommand::Save { path, triangles } => match write_obj(&path, &triangles) {
                Ok(stats) => {
                    info!(
                        path = %path.display(),
                        vertices = stats.vertices,
                        faces = stats.faces,
                        "mesh exported"
                    );
                    *last_error.lock() = None;
                    let _ = tx_result.send(ExportResult::Saved { path, stats });
                }
                Err(e) => {
                    error!("OBJ export failed: {e}");
                    let message = e.to_string();
                    *last_error.lock() = Some(message.clone());
                    let _ = tx_result.send(ExportResult::Failed {
                        path,
                        error: message,
                    });
                }
            },
            ExportCommand::Stop => return,
        }
    }
}

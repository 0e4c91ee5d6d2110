pub mod loop_handler;

pub use loop_handler::{handle_worker_event, run, run_headless, WorkerEvent, WorkerHandle};

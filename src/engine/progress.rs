//! Progress counter for completed jobs (verbose mode).

use crossbeam_channel::{Receiver, Sender, unbounded};
use kdam::{Animation, Bar, BarExt};
use std::thread::{self, JoinHandle};

/// Create a counter for unknown total (shows count without percentage).
pub fn create_counter(desc: &'static str) -> Bar {
    kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " jobs"
    )
}

/// Workers send one tick per finished job on `Sender`; the listener thread owns the bar,
/// so workers never contend on it. The thread exits once every sender is dropped.
pub fn spawn_progress_listener(desc: &'static str) -> (Sender<usize>, JoinHandle<usize>) {
    let (tx, rx) = unbounded::<usize>();
    let handle = thread::spawn(move || run_progress_listener(rx, create_counter(desc)));
    (tx, handle)
}

fn run_progress_listener(rx: Receiver<usize>, mut bar: Bar) -> usize {
    let _ = bar.refresh();
    let mut total = 0_usize;
    while let Ok(n) = rx.recv() {
        total += n;
        let _ = bar.update(n);
    }
    let _ = bar.refresh();
    eprintln!();
    total
}

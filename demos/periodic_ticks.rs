//! # Example: periodic_ticks
//!
//! Demonstrates the timer producer over the built-in thread scheduler.
//!
//! Shows how to:
//! - Build a tick stream with [`timer`].
//! - Start two independent runs of the same producer.
//! - Stop ticks by disposing a run's handle.
//!
//! ## Flow
//! ```text
//! timer(100ms, ThreadScheduler) ──► start() ──► Next(now) per tick
//!                                      │
//!                                 run.dispose() ──► ticks stop
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example periodic_ticks
//! ```

use std::sync::Arc;
use std::time::Duration;

use fluxion::{timer, Callbacks, ThreadScheduler};

fn main() {
    let ticks = timer::<String>(
        Duration::from_millis(100),
        Arc::new(ThreadScheduler),
        Duration::ZERO,
    );

    let fast = ticks.start_callbacks(
        Callbacks::default().with_next(|at| println!("[fast] tick at {at:?}")),
    );

    // A second start is a fully independent run on its own schedule.
    let slow = timer::<String>(
        Duration::from_millis(250),
        Arc::new(ThreadScheduler),
        Duration::ZERO,
    )
    .start_callbacks(Callbacks::default().with_next(|at| println!("[slow] tick at {at:?}")));

    std::thread::sleep(Duration::from_millis(600));
    println!("-- stopping the fast run --");
    fast.dispose();

    std::thread::sleep(Duration::from_millis(600));
    slow.dispose();
    println!("done");
}

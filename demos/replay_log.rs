//! # Example: replay_log
//!
//! Demonstrates the bounded replay buffer: late subscribers receive the
//! retained history before live events resume.
//!
//! Shows how to:
//! - Create a paired `(producer, observer)` with [`buffer`].
//! - Push events through the shared observer.
//! - Observe eviction (capacity 2) and replay-then-live ordering.
//!
//! ## Flow
//! ```text
//! input ──► buffer(2) ──► log [oldest evicted past capacity]
//!                           │
//!              start() #1 ──┤ replay, then live
//!              start() #2 ──┘ replay, then live
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example replay_log
//! ```

use fluxion::{buffer, Callbacks};

fn main() {
    let (producer, input) = buffer::<u32, String>(2);

    // Fill the log past capacity: 1 is evicted.
    input.send_next(1);
    input.send_next(2);
    input.send_next(3);

    println!("-- first subscriber (replay: 2, 3) --");
    producer.start_callbacks(
        Callbacks::default()
            .with_next(|v| println!("[sub-1] next={v}"))
            .with_completed(|| println!("[sub-1] completed")),
    );

    // Live events reach attached subscribers and extend the log.
    input.send_next(4);

    println!("-- second subscriber (replay: 3, 4) --");
    producer.start_callbacks(
        Callbacks::default()
            .with_next(|v| println!("[sub-2] next={v}"))
            .with_completed(|| println!("[sub-2] completed")),
    );

    // Termination freezes the log; both subscribers complete, and any
    // later subscriber replays the frozen history including the terminal.
    input.send_completed();

    println!("-- late subscriber (replay: 3, 4, completed) --");
    producer.start_callbacks(
        Callbacks::default()
            .with_next(|v| println!("[late] next={v}"))
            .with_completed(|| println!("[late] completed")),
    );
}

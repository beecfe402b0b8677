//! # Example: side_effects
//!
//! Demonstrates side-effect injection with `on`, one-shot fallible
//! producers with `attempt`, and blocking extraction with `first`.
//!
//! ## Flow
//! ```text
//! attempt(op) ──► on(started / next / terminated / disposed) ──► first()
//!                     │ (observability only; events pass unchanged)
//!                     ▼
//!            Ok(value) | Err(TryError)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example side_effects
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use fluxion::{Effects, SignalProducer, TryError};

fn main() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    // A fallible lookup: fails with "no value" on the first call, then
    // succeeds. Each start invokes it once.
    let lookup = SignalProducer::attempt(move || -> Result<Option<u32>, String> {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(None)
        } else {
            Ok(Some(42))
        }
    });

    let traced = lookup.on(
        Effects::default()
            .with_started(|| println!("[fx] run started"))
            .with_next(|v| println!("[fx] next={v}"))
            .with_failed(|e: &TryError<String>| println!("[fx] failed={}", e.as_label()))
            .with_terminated(|| println!("[fx] terminated"))
            .with_disposed(|| println!("[fx] disposed")),
    );

    println!("-- first run: the operation yields nothing --");
    match traced.first() {
        Ok(value) => println!("result: {value}"),
        Err(err) => println!("error: {err}"),
    }

    println!("-- second run: the operation succeeds --");
    match traced.first() {
        Ok(value) => println!("result: {value}"),
        Err(err) => println!("error: {err}"),
    }
}

//! End-to-end concurrency checks for the stream engine: per-subscription
//! ordering under multi-threaded production, subscription racing delivery,
//! and replay-then-live consistency of the buffer.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use fluxion::{buffer, CompositeDisposable, Event, Observer, Signal};

type Log<T, E> = Arc<Mutex<Vec<Event<T, E>>>>;

fn recording<T, E>() -> (Observer<T, E>, Log<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let log: Log<T, E> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let observer = Observer::new(move |event| sink.lock().unwrap().push(event));
    (observer, log)
}

/// Asserts `values` is a consecutive increasing run (`n, n+1, n+2, ...`).
fn assert_consecutive(values: &[u32], context: &str) {
    for pair in values.windows(2) {
        assert_eq!(
            pair[1],
            pair[0] + 1,
            "{context}: gap or reorder at {} -> {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn e2e_two_producer_threads_keep_per_producer_order() {
    const PER_THREAD: u32 = 500;

    let pipe = Signal::<(u8, u32), ()>::pipe();
    let (obs, log) = recording();
    pipe.signal.observe(obs);

    let input = Arc::new(pipe.input);
    let workers: Vec<_> = (0u8..2)
        .map(|tag| {
            let input = Arc::clone(&input);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    input.send_next((tag, i));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("producer thread panicked");
    }

    let events = log.lock().unwrap();
    assert_eq!(events.len(), 2 * PER_THREAD as usize, "no event may be lost");
    for tag in 0u8..2 {
        let seen: Vec<u32> = events
            .iter()
            .filter_map(|ev| match ev {
                Event::Next((t, i)) if *t == tag => Some(*i),
                _ => None,
            })
            .collect();
        assert_eq!(seen.len(), PER_THREAD as usize);
        assert_consecutive(&seen, &format!("producer {tag}"));
    }
}

#[test]
fn e2e_subscribing_while_producing_sees_a_clean_suffix() {
    const TOTAL: u32 = 2_000;

    let pipe = Signal::<u32, ()>::pipe();
    let input = pipe.input;
    let signal = pipe.signal;

    let producer = thread::spawn(move || {
        for i in 0..TOTAL {
            input.send_next(i);
        }
        input.send_completed();
    });

    let mut logs = Vec::new();
    for _ in 0..8 {
        let (obs, log) = recording::<u32, ()>();
        signal.observe(obs);
        logs.push(log);
        thread::sleep(Duration::from_micros(200));
    }
    producer.join().expect("producer thread panicked");

    for (i, log) in logs.iter().enumerate() {
        let events = log.lock().unwrap();
        let values: Vec<u32> = events.iter().filter_map(|ev| ev.value().copied()).collect();
        assert_consecutive(&values, &format!("subscriber {i}"));
        if let Some(last) = values.last() {
            assert_eq!(*last, TOTAL - 1, "subscriber {i} lost the tail");
        }
    }
}

#[test]
fn e2e_buffer_without_eviction_replays_everything_to_racing_subscribers() {
    const TOTAL: u32 = 500;

    let (producer, input) = buffer::<u32, ()>(TOTAL as usize);

    let feeder = thread::spawn(move || {
        for i in 0..TOTAL {
            input.send_next(i);
        }
        input.send_completed();
    });

    let subscribers: Vec<_> = (0..4)
        .map(|_| {
            let producer = producer.clone();
            thread::spawn(move || {
                let (obs, log) = recording::<u32, ()>();
                producer.start(obs);
                log
            })
        })
        .collect();

    let logs: Vec<_> = subscribers
        .into_iter()
        .map(|s| s.join().expect("subscriber thread panicked"))
        .collect();
    feeder.join().expect("feeder thread panicked");

    // wait until every subscriber has observed the terminal event
    for log in &logs {
        let mut spins = 0;
        while !log.lock().unwrap().iter().any(Event::is_terminating) {
            thread::sleep(Duration::from_millis(1));
            spins += 1;
            assert!(spins < 5_000, "subscriber never saw the terminal event");
        }
    }

    for (i, log) in logs.iter().enumerate() {
        let events = log.lock().unwrap();
        let values: Vec<u32> = events.iter().filter_map(|ev| ev.value().copied()).collect();
        let expected: Vec<u32> = (0..TOTAL).collect();
        assert_eq!(values, expected, "subscriber {i} must see the full history");
        assert_eq!(*events.last().unwrap(), Event::Completed);
    }
}

#[test]
fn e2e_buffer_with_eviction_keeps_windows_contiguous() {
    const TOTAL: u32 = 500;

    let (producer, input) = buffer::<u32, ()>(16);

    let feeder = thread::spawn(move || {
        for i in 0..TOTAL {
            input.send_next(i);
        }
        input.send_completed();
    });

    let subscribers: Vec<_> = (0..4)
        .map(|n| {
            let producer = producer.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_micros(100 * n));
                let (obs, log) = recording::<u32, ()>();
                producer.start(obs);
                log
            })
        })
        .collect();

    let logs: Vec<_> = subscribers
        .into_iter()
        .map(|s| s.join().expect("subscriber thread panicked"))
        .collect();
    feeder.join().expect("feeder thread panicked");

    for log in &logs {
        let mut spins = 0;
        while !log.lock().unwrap().iter().any(Event::is_terminating) {
            thread::sleep(Duration::from_millis(1));
            spins += 1;
            assert!(spins < 5_000, "subscriber never saw the terminal event");
        }
    }

    for (i, log) in logs.iter().enumerate() {
        let events = log.lock().unwrap();
        let values: Vec<u32> = events.iter().filter_map(|ev| ev.value().copied()).collect();
        assert!(!values.is_empty(), "subscriber {i} saw no values at all");
        assert_consecutive(&values, &format!("subscriber {i}"));
        assert_eq!(*values.last().unwrap(), TOTAL - 1);
        assert_eq!(*events.last().unwrap(), Event::Completed);
    }
}

#[test]
fn e2e_composite_disposal_races_member_registration() {
    const ADDERS: usize = 8;
    const PER_ADDER: usize = 200;

    let composite = CompositeDisposable::new();
    let executed = Arc::new(Mutex::new(0usize));

    let adders: Vec<_> = (0..ADDERS)
        .map(|_| {
            let composite = composite.clone();
            let executed = Arc::clone(&executed);
            thread::spawn(move || {
                for _ in 0..PER_ADDER {
                    let counter = Arc::clone(&executed);
                    composite.add_action(move || {
                        *counter.lock().unwrap() += 1;
                    });
                }
            })
        })
        .collect();

    let disposer = {
        let composite = composite.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_micros(50));
            composite.dispose();
        })
    };

    for adder in adders {
        adder.join().expect("adder thread panicked");
    }
    disposer.join().expect("disposer thread panicked");

    // Whether a member was retained-then-disposed or disposed on the spot,
    // every registered action runs exactly once.
    assert_eq!(*executed.lock().unwrap(), ADDERS * PER_ADDER);
}

//! tests/poll_loop.rs
//!
//! End-to-end runs of both loop models against a recording sink.

use std::time::Duration;

use live_window::engine::{Series, SourceError, Window};
use live_window::{
    DataSource, EngineConfig, EngineError, Fetch, LoopState, MemorySink, PollLoop, Step,
    SubplotData, Termination, ThreadedPollLoop,
};

/// Appends `tick + 1` to one series per tick; runs out at `exhaust_at`.
struct Cumulative {
    x: Vec<f64>,
    y: Vec<f64>,
    exhaust_at: Option<u64>,
}

impl Cumulative {
    fn new(exhaust_at: Option<u64>) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            exhaust_at,
        }
    }
}

impl DataSource for Cumulative {
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError> {
        if self.exhaust_at.is_some_and(|at| tick >= at) {
            return Ok(Fetch::Exhausted);
        }
        let v = (tick + 1) as f64;
        self.x.push(v);
        self.y.push(v);
        Ok(Fetch::Ready(vec![SubplotData::new(
            &self.x,
            vec![&self.y as &dyn Series],
        )]))
    }
}

fn config(window: usize) -> EngineConfig {
    EngineConfig::new(window, Duration::from_millis(1))
}

#[test]
fn windows_fill_from_the_right_then_slide() {
    let mut poll = PollLoop::new(config(4), Cumulative::new(None), MemorySink::recording());
    poll.start().unwrap();
    for _ in 0..4 {
        assert_eq!(poll.tick().unwrap(), Step::Continue);
    }
    let nan = f64::NAN;
    let expected: Vec<Window> = vec![
        vec![nan, nan, nan, 1.0].into(),
        vec![nan, nan, 1.0, 2.0].into(),
        vec![nan, 1.0, 2.0, 3.0].into(),
        vec![1.0, 2.0, 3.0, 4.0].into(),
        vec![2.0, 3.0, 4.0, 5.0].into(),
    ];
    let drawn: Vec<Window> = poll.sink().subplots[0]
        .history
        .iter()
        .map(|w| w.ys[0].clone())
        .collect();
    assert_eq!(drawn, expected);
    assert_eq!(poll.sink().frames, 5);
}

#[test]
fn exhaustion_stops_the_loop_and_closes_once() {
    let mut poll = PollLoop::new(config(8), Cumulative::new(Some(37)), MemorySink::new());
    poll.start().unwrap();
    let mut steps = 0;
    let termination = loop {
        match poll.tick().unwrap() {
            Step::Continue => steps += 1,
            Step::Finished(t) => break t,
        }
    };
    assert_eq!(termination, Termination::Exhausted);
    assert_eq!(steps, 36);
    assert_eq!(poll.state(), LoopState::Exhausted);
    assert_eq!(poll.tick_index(), 37);
    assert_eq!(poll.sink().close_count, 1);
    assert_eq!(poll.sink().subplots[0].draws, 37);
    assert!(matches!(
        poll.tick(),
        Err(EngineError::NotRunning(LoopState::Exhausted))
    ));
    poll.cancel();
    assert_eq!(poll.sink().close_count, 1);
}

#[test]
fn run_until_stops_on_request() {
    let mut poll = PollLoop::new(config(4), Cumulative::new(None), MemorySink::new());
    let mut calls = 0;
    let termination = poll
        .run_until(|| {
            calls += 1;
            calls > 3
        })
        .unwrap();
    assert_eq!(termination, Termination::Stopped);
    assert_eq!(poll.tick_index(), 3);
    assert_eq!(poll.sink().close_count, 1);
}

#[test]
fn run_until_returns_on_exhaustion() {
    let mut poll = PollLoop::new(config(4), Cumulative::new(Some(5)), MemorySink::new());
    assert_eq!(poll.run_until(|| false).unwrap(), Termination::Exhausted);
    assert_eq!(poll.sink().frames, 5);
}

/// Two y-series that fall out of step at `split_at`: `b` stops growing.
struct Uneven {
    x: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    split_at: u64,
}

impl DataSource for Uneven {
    fn sample(&mut self, tick: u64) -> Result<Fetch<'_>, SourceError> {
        let v = tick as f64;
        self.x.push(v);
        self.a.push(v);
        if tick < self.split_at {
            self.b.push(-v);
        }
        Ok(Fetch::Ready(vec![SubplotData::new(
            &self.x,
            vec![&self.a as &dyn Series, &self.b as &dyn Series],
        )]))
    }
}

#[test]
fn unequal_y_lengths_fail_the_loop() {
    let source = Uneven {
        x: Vec::new(),
        a: Vec::new(),
        b: Vec::new(),
        split_at: 3,
    };
    let mut poll = PollLoop::new(config(4), source, MemorySink::new());
    poll.start().unwrap();
    poll.tick().unwrap();
    poll.tick().unwrap();
    match poll.tick() {
        Err(EngineError::LengthMismatch { lengths }) => assert_eq!(lengths, vec![4, 3]),
        other => panic!("expected a length mismatch, got {other:?}"),
    }
    assert_eq!(poll.state(), LoopState::Failed);
    assert_eq!(poll.sink().close_count, 1);
    assert_eq!(poll.sink().subplots[0].draws, 3);
    assert!(matches!(
        poll.tick(),
        Err(EngineError::NotRunning(LoopState::Failed))
    ));
    poll.cancel();
    assert_eq!(poll.sink().close_count, 1);
}

#[test]
fn per_subplot_lengths_must_match_the_source() {
    let config = EngineConfig::new(vec![4, 4], Duration::from_millis(1));
    let mut poll = PollLoop::new(config, Cumulative::new(None), MemorySink::new());
    assert!(matches!(
        poll.start(),
        Err(EngineError::SubplotCountMismatch {
            configured: 2,
            discovered: 1
        })
    ));
    assert_eq!(poll.state(), LoopState::Failed);
    assert_eq!(poll.sink().close_count, 1);
}

#[test]
fn threaded_loop_draws_only_complete_windows_in_order() {
    let mut poll = ThreadedPollLoop::new(
        config(4),
        Cumulative::new(Some(50)),
        MemorySink::recording(),
    );
    poll.start().unwrap();
    let termination = loop {
        if let Step::Finished(t) = poll.poll(Duration::from_millis(100)).unwrap() {
            break t;
        }
    };
    assert_eq!(termination, Termination::Exhausted);
    assert_eq!(poll.state(), LoopState::Exhausted);
    assert_eq!(poll.sink().close_count, 1);

    let history = &poll.sink().subplots[0].history;
    assert!(!history.is_empty());
    let mut previous = 0.0;
    for window in history {
        let y = &window.ys[0];
        assert_eq!(y.len(), 4);
        // every drawn window is one consistent tick: a run of consecutive values
        let last = y[3];
        assert!(last > previous, "ticks went backwards");
        for (i, v) in y.iter().enumerate() {
            let expected = last - (3 - i) as f64;
            if expected >= 1.0 {
                assert_eq!(*v, expected);
            } else {
                assert!(v.is_nan());
            }
        }
        previous = last;
    }
    let drawn = history.len() as u64;
    assert_eq!(drawn + poll.dropped(), 50);
}

#[test]
fn threaded_loop_exhausted_at_start() {
    let mut poll = ThreadedPollLoop::new(config(4), Cumulative::new(Some(0)), MemorySink::new());
    assert_eq!(
        poll.start().unwrap(),
        Step::Finished(Termination::Exhausted)
    );
    assert_eq!(poll.sink().close_count, 1);
    assert!(poll.sink().subplots.is_empty());
}

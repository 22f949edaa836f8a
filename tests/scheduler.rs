use iqueue::{Cancelled, Canvas, Command, Config, Scheduler, StartGate};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canvas that records every operation applied to it, both privately (for
/// per-stream order checks) and into a log shared by all streams (for
/// cross-stream interleaving checks).
struct Recorder {
    id: usize,
    applied: Vec<Command>,
    log: Arc<Mutex<Vec<(usize, Command)>>>,
}

impl Recorder {
    fn new(id: usize, log: &Arc<Mutex<Vec<(usize, Command)>>>) -> Self {
        Recorder {
            id,
            applied: Vec::new(),
            log: Arc::clone(log),
        }
    }

    fn record(&mut self, command: Command) {
        self.applied.push(command.clone());
        self.log.lock().unwrap().push((self.id, command));
    }
}

impl Canvas for Recorder {
    fn speed(&mut self, speed: u32) {
        self.record(Command::Speed(speed));
    }
    fn width(&mut self, width: f64) {
        self.record(Command::Width(width));
    }
    fn pen_color(&mut self, color: &str) {
        self.record(Command::PenColor(color.to_owned()));
    }
    fn pen_up(&mut self) {
        self.record(Command::PenUp);
    }
    fn pen_down(&mut self) {
        self.record(Command::PenDown);
    }
    fn set_position(&mut self, x: f64, y: f64) {
        self.record(Command::SetPosition(x, y));
    }
    fn set_heading(&mut self, degrees: f64) {
        self.record(Command::SetHeading(degrees));
    }
    fn forward(&mut self, distance: f64) {
        self.record(Command::Forward(distance));
    }
    fn left(&mut self, degrees: f64) {
        self.record(Command::Left(degrees));
    }
    fn right(&mut self, degrees: f64) {
        self.record(Command::Right(degrees));
    }
    fn dot(&mut self, color: &str, diameter: u32) {
        self.record(Command::Dot(color.to_owned(), diameter));
    }
}

fn fast_config() -> Config {
    Config {
        pace: Duration::ZERO,
        idle_backoff: Duration::from_micros(50),
    }
}

fn shared_log() -> Arc<Mutex<Vec<(usize, Command)>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn per_stream_order_is_preserved() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());
    let turtle = scheduler.turtle(Recorder::new(0, &log));

    turtle.pen_down().unwrap();
    for distance in 1..=5 {
        turtle.forward(f64::from(distance)).unwrap();
        turtle.left(72.0).unwrap();
    }
    turtle.finish().unwrap();

    let canvases = scheduler.run();
    let mut expected = vec![Command::PenDown];
    for distance in 1..=5 {
        expected.push(Command::Forward(f64::from(distance)));
        expected.push(Command::Left(72.0));
    }
    assert_eq!(canvases[0].applied, expected);
}

#[test]
fn three_streams_two_commands_each_terminate() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    for id in 0..3 {
        let turtle = scheduler.turtle(Recorder::new(id, &log));
        turtle.forward(10.0).unwrap();
        turtle.right(90.0).unwrap();
        turtle.finish().unwrap();
    }

    let canvases = scheduler.run();
    assert_eq!(canvases.len(), 3);
    for canvas in &canvases {
        assert_eq!(canvas.applied, [Command::Forward(10.0), Command::Right(90.0)]);
    }
    assert_eq!(log.lock().unwrap().len(), 6);
}

#[test]
fn short_stream_is_not_starved_by_long_stream() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    let long = scheduler.turtle(Recorder::new(0, &log));
    let short = scheduler.turtle(Recorder::new(1, &log));

    for _ in 0..100 {
        long.forward(1.0).unwrap();
    }
    long.finish().unwrap();
    short.dot("red", 6).unwrap();
    short.finish().unwrap();

    scheduler.run();

    // Round-robin means the short stream's only command lands in the first
    // round, directly after the long stream's first, not behind all 100.
    let log = log.lock().unwrap();
    assert_eq!(log[0], (0, Command::Forward(1.0)));
    assert_eq!(log[1], (1, Command::Dot("red".to_owned(), 6)));
    assert_eq!(log.len(), 101);
}

#[test]
fn commands_are_dispatched_round_robin_while_all_streams_ready() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    for id in 0..4 {
        let turtle = scheduler.turtle(Recorder::new(id, &log));
        for _ in 0..5 {
            turtle.forward(1.0).unwrap();
        }
        turtle.finish().unwrap();
    }

    scheduler.run();

    // With every buffer full from the start, each round dispatches exactly
    // one command per stream in registration order.
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 20);
    for (position, (id, _)) in log.iter().enumerate() {
        assert_eq!(*id, position % 4);
    }
}

#[test]
fn empty_stream_reaches_done_without_blocking_others() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    let idle = scheduler.turtle(Recorder::new(0, &log));
    let busy = scheduler.turtle(Recorder::new(1, &log));

    idle.finish().unwrap();
    busy.forward(5.0).unwrap();
    busy.forward(6.0).unwrap();
    busy.finish().unwrap();

    let canvases = scheduler.run();
    assert!(canvases[0].applied.is_empty());
    assert_eq!(canvases[1].applied, [Command::Forward(5.0), Command::Forward(6.0)]);
}

#[test]
fn no_cross_stream_mutation() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    let a = scheduler.turtle(Recorder::new(0, &log));
    let b = scheduler.turtle(Recorder::new(1, &log));
    a.pen_color("red").unwrap();
    b.pen_color("blue").unwrap();
    a.finish().unwrap();
    b.finish().unwrap();

    let canvases = scheduler.run();
    assert_eq!(canvases[0].applied, [Command::PenColor("red".to_owned())]);
    assert_eq!(canvases[1].applied, [Command::PenColor("blue".to_owned())]);
}

#[test]
fn gated_producer_threads_all_run_to_completion() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    let workers: Vec<_> = (0..3)
        .map(|id| {
            let turtle = scheduler.turtle(Recorder::new(id, &log));
            thread::Builder::new()
                .name(format!("producer-{id}"))
                .spawn(move || -> Result<(), Cancelled> {
                    turtle.wait_for_start();
                    turtle.pen_down()?;
                    turtle.forward(50.0)?;
                    turtle.finish()
                })
                .unwrap()
        })
        .collect();

    let canvases = scheduler.run();
    for worker in workers {
        worker.join().unwrap().unwrap();
    }
    for canvas in &canvases {
        assert_eq!(canvas.applied, [Command::PenDown, Command::Forward(50.0)]);
    }
}

#[test]
fn scheduler_waits_out_a_slow_producer() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());
    let turtle = scheduler.turtle(Recorder::new(0, &log));

    // The buffer stays empty for a while, forcing idle-backoff rounds, then
    // fills; the loop must pick the commands up and terminate.
    let worker = thread::spawn(move || -> Result<(), Cancelled> {
        turtle.wait_for_start();
        thread::sleep(Duration::from_millis(30));
        turtle.dot("gold", 5)?;
        turtle.finish()
    });

    let canvases = scheduler.run();
    worker.join().unwrap().unwrap();
    assert_eq!(canvases[0].applied, [Command::Dot("gold".to_owned(), 5)]);
}

#[test]
fn dropping_the_scheduler_cancels_producers() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());
    let turtle = scheduler.turtle(Recorder::new(0, &log));

    drop(scheduler);

    // The gate is released on drop, so this returns instead of hanging.
    turtle.wait_for_start();
    assert_eq!(turtle.forward(10.0), Err(Cancelled));
    assert_eq!(turtle.finish(), Err(Cancelled));
}

#[test]
fn dropped_handle_still_terminates_its_stream() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());

    let abandoned = scheduler.turtle(Recorder::new(0, &log));
    abandoned.forward(1.0).unwrap();
    // No finish call: the drop glue sends the end marker.
    drop(abandoned);

    let canvases = scheduler.run();
    assert_eq!(canvases[0].applied, [Command::Forward(1.0)]);
}

#[test]
fn panicking_producer_script_does_not_hang_the_scheduler() {
    let log = shared_log();
    let mut scheduler = Scheduler::with_config(fast_config());
    let turtle = scheduler.turtle(Recorder::new(0, &log));

    let worker = thread::spawn(move || {
        turtle.wait_for_start();
        turtle.forward(2.0).unwrap();
        panic!("script failed halfway");
    });

    let canvases = scheduler.run();
    assert!(worker.join().is_err());
    assert_eq!(canvases[0].applied, [Command::Forward(2.0)]);
}

#[test]
fn gate_from_scheduler_blocks_until_run() {
    let mut scheduler = Scheduler::with_config(fast_config());
    let log = shared_log();
    let turtle = scheduler.turtle(Recorder::new(0, &log));
    let gate: StartGate = scheduler.gate();

    let worker = thread::spawn(move || {
        gate.wait();
        turtle.finish().unwrap();
    });

    scheduler.run();
    worker.join().unwrap();
}

#[path = "turtle.rs"]
mod turtle;

use crate::canvas::Canvas;
use crate::command::Command;
use crate::gate::StartGate;
use crossbeam_channel::{Receiver, TryRecvError};
use std::mem;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

pub use self::turtle::{Cancelled, Turtle};

/// Pacing parameters of the dispatch loop.
///
/// Both delays are process-wide constants for the duration of a run; there is
/// no dynamic reconfiguration. A zero duration skips the sleep entirely,
/// which is the configuration the test suite runs under.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Delay applied after every dispatched command. This is the sole driver
    /// of the visible interleaving cadence: it is charged per applied
    /// command, not per round, so a round that dispatches from three streams
    /// pauses three times.
    pub pace: Duration,

    /// Sleep applied when a full round dispatches nothing, bounding CPU spin
    /// while every producer is still working on its next command.
    pub idle_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pace: Duration::from_millis(4),
            idle_backoff: Duration::from_millis(1),
        }
    }
}

/// What travels through a stream buffer: a real command, or the end marker
/// that the turtle handle emits exactly once as its final message.
pub(crate) enum Message {
    Command(Command),
    Finish,
}

struct Stream<C> {
    receiver: Receiver<Message>,
    canvas: C,
    done: bool,
}

/// The single consumer that owns every canvas and drains every stream.
///
/// Register one [`Turtle`] per producer with [`turtle`][Scheduler::turtle],
/// hand each to its own thread, then call [`run`][Scheduler::run] from the
/// thread that owns the canvases. `run` releases the start gate and loops:
/// one round visits every unfinished stream in registration order and takes
/// at most one command from each, so every producer gets an equal dispatch
/// opportunity per round regardless of how fast it emits.
///
/// The scheduler thread is the only thread that ever touches a canvas, which
/// is why [`Canvas`] implementations need no synchronization of their own.
///
/// ```
/// use iqueue::{Canvas, Command, Config, Scheduler};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Tape(Vec<Command>);
///
/// impl Canvas for Tape {
///     fn forward(&mut self, distance: f64) {
///         self.0.push(Command::Forward(distance));
///     }
///     # fn speed(&mut self, s: u32) { self.0.push(Command::Speed(s)); }
///     # fn width(&mut self, w: f64) { self.0.push(Command::Width(w)); }
///     # fn pen_color(&mut self, c: &str) { self.0.push(Command::PenColor(c.to_owned())); }
///     # fn pen_up(&mut self) { self.0.push(Command::PenUp); }
///     # fn pen_down(&mut self) { self.0.push(Command::PenDown); }
///     # fn set_position(&mut self, x: f64, y: f64) { self.0.push(Command::SetPosition(x, y)); }
///     # fn set_heading(&mut self, d: f64) { self.0.push(Command::SetHeading(d)); }
///     # fn left(&mut self, d: f64) { self.0.push(Command::Left(d)); }
///     # fn right(&mut self, d: f64) { self.0.push(Command::Right(d)); }
///     # fn dot(&mut self, c: &str, d: u32) { self.0.push(Command::Dot(c.to_owned(), d)); }
///     /* ...remaining operations elided */
/// }
///
/// let mut scheduler = Scheduler::with_config(Config {
///     pace: Duration::ZERO,
///     idle_backoff: Duration::ZERO,
/// });
///
/// // Streams may also be filled before the loop starts; producer threads
/// // are the common case but not a requirement.
/// let alice = scheduler.turtle(Tape::default());
/// let bob = scheduler.turtle(Tape::default());
/// alice.forward(10.0).unwrap();
/// alice.forward(20.0).unwrap();
/// bob.forward(30.0).unwrap();
/// alice.finish().unwrap();
/// bob.finish().unwrap();
///
/// let tapes = scheduler.run();
/// assert_eq!(tapes[0].0, [Command::Forward(10.0), Command::Forward(20.0)]);
/// assert_eq!(tapes[1].0, [Command::Forward(30.0)]);
/// ```
pub struct Scheduler<C> {
    streams: Vec<Stream<C>>,
    gate: StartGate,
    config: Config,
}

#[cfg(test)]
struct _Test
where
    Scheduler<()>: Send,
    Turtle: Send + Sync;

impl<C> Scheduler<C> {
    /// Makes a scheduler with the default pacing.
    pub fn new() -> Self {
        Scheduler::with_config(Config::default())
    }

    /// Makes a scheduler with explicit pacing.
    pub fn with_config(config: Config) -> Self {
        Scheduler {
            streams: Vec::new(),
            gate: StartGate::new(),
            config,
        }
    }

    /// Registers a new stream bound to the given canvas and returns the
    /// producer handle feeding it. Streams are visited in registration order
    /// within every round.
    pub fn turtle(&mut self, canvas: C) -> Turtle {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let index = self.streams.len();
        self.streams.push(Stream {
            receiver,
            canvas,
            done: false,
        });
        debug!(stream = index, "stream registered");
        Turtle::new(index, sender, self.gate.clone())
    }

    /// Returns a handle to the start gate, for producer threads that want to
    /// block on it directly rather than through [`Turtle::wait_for_start`].
    pub fn gate(&self) -> StartGate {
        self.gate.clone()
    }
}

impl<C: Canvas> Scheduler<C> {
    /// Releases the start gate and drains every stream round-robin until all
    /// of them have finished, then returns the canvases in registration
    /// order.
    ///
    /// One round attempts a non-blocking take from each unfinished stream: an
    /// empty buffer is skipped without delay, a command is applied to that
    /// stream's canvas followed by the pacing delay, and the end marker
    /// retires the stream. A round in which nothing at all was dispatched
    /// sleeps for the idle backoff before trying again.
    ///
    /// This call blocks until every registered stream has ended. A producer
    /// that never finishes and never drops its handle will stall termination;
    /// bounding the total run time is the caller's policy, not the
    /// scheduler's.
    pub fn run(mut self) -> Vec<C> {
        self.gate.release();

        let total = self.streams.len();
        let mut done_count = 0;
        debug!(streams = total, "dispatch loop starting");

        while done_count < total {
            let mut progressed = false;

            for (index, stream) in self.streams.iter_mut().enumerate() {
                if stream.done {
                    continue;
                }

                let message = match stream.receiver.try_recv() {
                    Ok(message) => message,
                    // The producer has not caught up yet; never stall the
                    // round on one stream.
                    Err(TryRecvError::Empty) => continue,
                    // Sender gone without an end marker. The handle sends
                    // the marker from its Drop impl, so this arm is only
                    // reachable if the handle was leaked; treat it as the
                    // end of the stream rather than spinning forever.
                    Err(TryRecvError::Disconnected) => Message::Finish,
                };
                progressed = true;

                match message {
                    Message::Command(command) => {
                        command.apply(&mut stream.canvas);
                        sleep(self.config.pace);
                    }
                    Message::Finish => {
                        stream.done = true;
                        done_count += 1;
                        debug!(stream = index, done_count, "stream finished");
                    }
                }
            }

            if !progressed {
                trace!("round made no progress, backing off");
                sleep(self.config.idle_backoff);
            }
        }

        debug!(streams = total, "all streams finished");
        let streams = mem::take(&mut self.streams);
        streams.into_iter().map(|stream| stream.canvas).collect()
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Scheduler::new()
    }
}

impl<C> Drop for Scheduler<C> {
    fn drop(&mut self) {
        // A scheduler that goes away without running must not leave producer
        // threads parked at the gate; release them so their next send fails
        // with Cancelled and they can unwind.
        self.gate.release();
    }
}

fn sleep(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

use super::Message;
use crate::command::Command;
use crate::gate::StartGate;
use crossbeam_channel::Sender;
use std::fmt::{self, Debug};
use thiserror::Error;

/// The handle a producer script drives instead of a real drawing agent.
///
/// Every operation method builds the corresponding [`Command`][crate::Command]
/// and appends it to this stream's buffer; nothing is drawn until the
/// scheduler dequeues the command on its own thread. The buffer is unbounded,
/// so no operation ever blocks.
///
/// Call [`finish`][Turtle::finish] as the script's last act to mark the end
/// of the stream. If the handle is dropped without `finish` — including by a
/// panic unwinding through the script — the end marker is sent from the drop
/// glue instead, so a stream always terminates exactly once.
///
/// The handle is deliberately not `Clone`: each stream has exactly one
/// producer, and each `Turtle` must stay on the one thread that runs its
/// script.
///
/// ```
/// use iqueue::{Cancelled, Turtle};
///
/// fn star(turtle: Turtle) -> Result<(), Cancelled> {
///     turtle.wait_for_start();
///     turtle.pen_color("yellow")?;
///     turtle.width(9.0)?;
///     for _ in 0..5 {
///         turtle.forward(60.0)?;
///         turtle.right(144.0)?;
///     }
///     turtle.finish()
/// }
/// #
/// # let mut scheduler = iqueue::Scheduler::with_config(iqueue::Config {
/// #     pace: std::time::Duration::ZERO,
/// #     idle_backoff: std::time::Duration::ZERO,
/// # });
/// # struct Ignore;
/// # impl iqueue::Canvas for Ignore {
/// #     fn speed(&mut self, _: u32) {}
/// #     fn width(&mut self, _: f64) {}
/// #     fn pen_color(&mut self, _: &str) {}
/// #     fn pen_up(&mut self) {}
/// #     fn pen_down(&mut self) {}
/// #     fn set_position(&mut self, _: f64, _: f64) {}
/// #     fn set_heading(&mut self, _: f64) {}
/// #     fn forward(&mut self, _: f64) {}
/// #     fn left(&mut self, _: f64) {}
/// #     fn right(&mut self, _: f64) {}
/// #     fn dot(&mut self, _: &str, _: u32) {}
/// # }
/// # let turtle = scheduler.turtle(Ignore);
/// # let worker = std::thread::spawn(move || star(turtle));
/// # scheduler.run();
/// # worker.join().unwrap().unwrap();
/// ```
#[readonly::make]
pub struct Turtle {
    sender: Sender<Message>,
    gate: StartGate,
    finished: bool,

    /// Index of the stream this handle feeds, in scheduler registration
    /// order. May be useful for naming the producer thread or tagging its
    /// log output.
    ///
    /// This field is read-only; writing to its value will not compile.
    #[readonly]
    pub index: usize,
}

/// The scheduler went away before this stream ended.
///
/// Returned by every [`Turtle`] operation once the consuming side of the
/// stream buffer has been dropped. A producer script observing this should
/// stop emitting and return; the command that triggered it was not recorded
/// anywhere.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("stream cancelled: scheduler no longer running")]
pub struct Cancelled;

impl Turtle {
    pub(super) fn new(index: usize, sender: Sender<Message>, gate: StartGate) -> Self {
        Turtle {
            sender,
            gate,
            finished: false,
            index,
        }
    }

    /// Blocks until the scheduler releases the start gate. Producer scripts
    /// call this first so that every stream begins emitting from the same
    /// origin instant.
    pub fn wait_for_start(&self) {
        self.gate.wait();
    }

    /// Set the drawing pace of this stream's agent.
    pub fn speed(&self, speed: u32) -> Result<(), Cancelled> {
        self.send(Command::Speed(speed))
    }

    /// Set the stroke width.
    pub fn width(&self, width: f64) -> Result<(), Cancelled> {
        self.send(Command::Width(width))
    }

    /// Set the pen color by name.
    pub fn pen_color(&self, color: impl Into<String>) -> Result<(), Cancelled> {
        self.send(Command::PenColor(color.into()))
    }

    /// Raise the pen.
    pub fn pen_up(&self) -> Result<(), Cancelled> {
        self.send(Command::PenUp)
    }

    /// Lower the pen.
    pub fn pen_down(&self) -> Result<(), Cancelled> {
        self.send(Command::PenDown)
    }

    /// Jump to an absolute position.
    pub fn set_position(&self, x: f64, y: f64) -> Result<(), Cancelled> {
        self.send(Command::SetPosition(x, y))
    }

    /// Face an absolute heading in degrees.
    pub fn set_heading(&self, degrees: f64) -> Result<(), Cancelled> {
        self.send(Command::SetHeading(degrees))
    }

    /// Move forward by a distance.
    pub fn forward(&self, distance: f64) -> Result<(), Cancelled> {
        self.send(Command::Forward(distance))
    }

    /// Turn left by an angle in degrees.
    pub fn left(&self, degrees: f64) -> Result<(), Cancelled> {
        self.send(Command::Left(degrees))
    }

    /// Turn right by an angle in degrees.
    pub fn right(&self, degrees: f64) -> Result<(), Cancelled> {
        self.send(Command::Right(degrees))
    }

    /// Stamp a colored dot of the given diameter.
    pub fn dot(&self, color: impl Into<String>, diameter: u32) -> Result<(), Cancelled> {
        self.send(Command::Dot(color.into(), diameter))
    }

    /// Marks the end of this stream. The scheduler retires the stream when
    /// it dequeues the marker; once every stream is retired the dispatch
    /// loop returns.
    ///
    /// Consuming the handle makes a second end marker unrepresentable.
    /// Dropping the handle without calling `finish` sends the marker as
    /// well, so an early return or a panic in the producer script still
    /// terminates the stream.
    pub fn finish(mut self) -> Result<(), Cancelled> {
        self.finished = true;
        self.sender.send(Message::Finish).map_err(|_| Cancelled)
    }

    fn send(&self, command: Command) -> Result<(), Cancelled> {
        self.sender
            .send(Message::Command(command))
            .map_err(|_| Cancelled)
    }
}

impl Debug for Turtle {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.debug_tuple("Turtle").field(&self.index).finish()
    }
}

impl Drop for Turtle {
    fn drop(&mut self) {
        if !self.finished {
            // If this fails the scheduler is already gone and nobody is
            // waiting for the marker.
            let _ = self.sender.send(Message::Finish);
        }
    }
}

//! Mechanism to interleave the effects of several concurrently generated
//! command streams onto a shared drawing surface, so that every stream appears
//! to make progress at the same time even though the surface is only ever
//! touched from one thread.
//!
//! # Use case
//!
//! Suppose we have several independent drawing agents, each running its own
//! script on its own thread, all targeting one rendering surface that is not
//! thread safe. If each agent draws directly, the surface is mutated from
//! multiple threads and the program is broken. If we serialize the agents by
//! running their scripts one after another, the picture builds up one agent at
//! a time and the "several agents drawing together" effect is lost. If we
//! buffer every agent's output and replay it all at the end, nothing is seen
//! in real time at all.
//!
//! # Objective
//!
//!   - Each agent emits its commands on its own thread, into its own ordered,
//!     unbounded buffer, never touching the surface directly.
//!
//!   - All agents are released from a common start gate, so interleaving is
//!     measured from one origin instant rather than from whenever each thread
//!     happened to get scheduled.
//!
//!   - A single dispatcher thread drains the buffers round-robin, applying at
//!     most one command per stream per round, so a fast agent cannot starve a
//!     slow one and an agent that has emitted nothing yet does not stall the
//!     rest.
//!
//!   - Per-stream command order is preserved exactly; a fixed pacing delay per
//!     dispatched command controls the visible cadence; the loop terminates
//!     once every stream has signalled its end.
//!
//! # Skeleton
//!
//! ```
//! use iqueue::{Canvas, Config, Scheduler, Turtle};
//! use std::thread;
//!
//! struct Plotter;
//!
//! impl Canvas for Plotter {
//!     fn forward(&mut self, distance: f64) {
//!         /* move the agent, drawing if the pen is down */
//!     }
//!     fn left(&mut self, degrees: f64) {
//!         /* rotate the agent counterclockwise */
//!     }
//!     # fn speed(&mut self, _: u32) {}
//!     # fn width(&mut self, _: f64) {}
//!     # fn pen_color(&mut self, _: &str) {}
//!     # fn pen_up(&mut self) {}
//!     # fn pen_down(&mut self) {}
//!     # fn set_position(&mut self, _: f64, _: f64) {}
//!     # fn set_heading(&mut self, _: f64) {}
//!     # fn right(&mut self, _: f64) {}
//!     # fn dot(&mut self, _: &str, _: u32) {}
//!     /* ...one method per drawing operation */
//! }
//!
//! fn square(turtle: Turtle) {
//!     turtle.wait_for_start();
//!     for _ in 0..4 {
//!         let _ = turtle.forward(100.0);
//!         let _ = turtle.left(90.0);
//!     }
//!     let _ = turtle.finish();
//! }
//!
//! fn main() {
//!     let mut scheduler = Scheduler::with_config(Config::default());
//!
//!     // One producer thread per agent; each gets its own canvas handle.
//!     let workers: Vec<_> = (0..3)
//!         .map(|_| {
//!             let turtle = scheduler.turtle(Plotter);
//!             thread::spawn(move || square(turtle))
//!         })
//!         .collect();
//!
//!     // Releases the gate, drains all streams, returns the canvases.
//!     let canvases = scheduler.run();
//!     assert_eq!(canvases.len(), 3);
//!
//!     for worker in workers {
//!         worker.join().unwrap();
//!     }
//! }
//! ```

mod canvas;
mod command;
mod gate;
mod scheduler;

pub use crate::canvas::Canvas;
pub use crate::command::Command;
pub use crate::gate::StartGate;
pub use crate::scheduler::{Cancelled, Config, Scheduler, Turtle};

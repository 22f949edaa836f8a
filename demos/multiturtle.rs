//! Three turtles drawing one scene at the same time.
//!
//! Each turtle's script runs on its own producer thread; the scheduler thread
//! is the only one that touches the shared raster, which is why the raster
//! can sit behind a plain `Rc<RefCell>` without being `Send` at all. Run with
//! `cargo run --example multiturtle` in a color terminal.

use iqueue::{Cancelled, Canvas, Config, Scheduler, Turtle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const DRAW_SPEED: u32 = 6;

const WORLD_WIDTH: f64 = 800.0;
const WORLD_HEIGHT: f64 = 600.0;
const COLS: usize = 120;
const ROWS: usize = 45;
const BACKGROUND: &str = "lightblue";

fn main() -> io::Result<()> {
    let surface = Rc::new(RefCell::new(Raster::new()));
    let mut scheduler = Scheduler::with_config(Config::default());

    let dots = scheduler.turtle(TermTurtle::on(&surface));
    let tree = scheduler.turtle(TermTurtle::on(&surface));
    let gift = scheduler.turtle(TermTurtle::on(&surface));

    let workers = [
        spawn_script("dots", dots, dots_script)?,
        spawn_script("tree", tree, green_bow_star_script)?,
        spawn_script("gift", gift, box_ribbon_script)?,
    ];

    // Releases all three scripts at once and interleaves their commands onto
    // the raster, one command per stream per round.
    scheduler.run();

    for worker in workers {
        let _ = worker.join();
    }

    let result = render(&surface.borrow());
    result
}

fn spawn_script(
    name: &str,
    turtle: Turtle,
    script: fn(Turtle) -> Result<(), Cancelled>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || {
            let _ = script(turtle);
        })
}

// ===== producer scripts =====

/// Scattered colored dots across the whole scene.
fn dots_script(turtle: Turtle) -> Result<(), Cancelled> {
    turtle.wait_for_start();
    turtle.speed(DRAW_SPEED)?;
    turtle.width(1.0)?;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for (color, diameter) in [("white", 4), ("red", 6), ("gold", 5), ("midnightblue", 3)] {
        for _ in 0..80 {
            let x = rng.gen_range(-360.0..400.0);
            let y = rng.gen_range(-250.0..270.0);
            turtle.pen_up()?;
            turtle.set_position(x, y)?;
            turtle.pen_down()?;
            turtle.dot(color, diameter)?;
        }
    }

    turtle.finish()
}

/// Green base block, an orange-and-yellow bow, and a star above.
fn green_bow_star_script(turtle: Turtle) -> Result<(), Cancelled> {
    turtle.wait_for_start();
    turtle.speed(DRAW_SPEED)?;

    turtle.pen_color("darkgreen")?;
    turtle.width(90.0)?;
    turtle.pen_up()?;
    turtle.set_position(-80.0, -170.0)?;
    turtle.set_heading(0.0)?;
    turtle.pen_down()?;
    for _ in 0..4 {
        turtle.forward(100.0)?;
        turtle.left(90.0)?;
    }

    turtle.set_position(-80.0, -170.0)?;
    turtle.pen_up()?;
    turtle.forward(50.0)?;
    turtle.right(90.0)?;
    turtle.forward(50.0)?;
    turtle.right(180.0)?;

    // Bow.
    turtle.forward(10.0)?;
    turtle.pen_down()?;
    turtle.width(20.0)?;
    turtle.pen_color("orange")?;
    turtle.forward(90.0)?;
    turtle.left(90.0)?;
    turtle.forward(90.0)?;
    turtle.right(180.0)?;
    turtle.forward(180.0)?;
    turtle.right(180.0)?;
    turtle.forward(90.0)?;
    turtle.right(90.0)?;
    turtle.forward(90.0)?;
    turtle.left(45.0)?;

    turtle.width(20.0)?;
    turtle.pen_color("yellow")?;
    turtle.forward(40.0)?;
    turtle.left(180.0)?;
    turtle.forward(40.0)?;
    turtle.right(45.0)?;
    turtle.forward(40.0)?;
    turtle.right(180.0)?;
    turtle.forward(40.0)?;
    turtle.right(45.0)?;
    turtle.forward(40.0)?;
    turtle.pen_up()?;

    // Star.
    turtle.right(45.0)?;
    turtle.forward(290.0)?;
    turtle.left(90.0)?;
    turtle.forward(190.0)?;
    turtle.pen_down()?;
    turtle.pen_color("yellow")?;
    turtle.width(9.0)?;
    for _ in 0..5 {
        turtle.forward(60.0)?;
        turtle.right(144.0)?;
    }

    turtle.finish()
}

/// Red box with a blue ribbon tied around it.
fn box_ribbon_script(turtle: Turtle) -> Result<(), Cancelled> {
    turtle.wait_for_start();
    turtle.speed(DRAW_SPEED)?;

    turtle.pen_up()?;
    turtle.set_position(288.284_271_247_461_9, 188.284_271_247_461_96)?;
    turtle.set_heading(90.0)?;

    // Box.
    turtle.right(180.0)?;
    turtle.forward(360.0)?;
    turtle.right(90.0)?;
    turtle.forward(170.0)?;
    turtle.right(180.0)?;
    turtle.pen_down()?;
    turtle.pen_color("firebrick")?;
    turtle.width(90.0)?;
    for _ in 0..4 {
        turtle.forward(120.0)?;
        turtle.left(90.0)?;
    }

    // Ribbon.
    turtle.pen_up()?;
    turtle.forward(60.0)?;
    turtle.right(90.0)?;
    turtle.forward(38.0)?;
    turtle.right(180.0)?;
    turtle.pen_color("midnightblue")?;
    turtle.width(27.0)?;
    turtle.pen_down()?;
    turtle.forward(110.0)?;
    turtle.right(90.0)?;
    turtle.forward(100.0)?;
    turtle.set_heading(180.0)?;
    turtle.forward(200.0)?;
    turtle.right(180.0)?;
    turtle.forward(100.0)?;
    turtle.left(90.0)?;
    turtle.forward(100.0)?;
    turtle.right(90.0)?;
    turtle.width(14.0)?;
    turtle.forward(40.0)?;
    turtle.right(180.0)?;
    turtle.forward(80.0)?;
    turtle.right(180.0)?;
    turtle.forward(40.0)?;
    turtle.left(90.0)?;
    turtle.forward(50.0)?;

    turtle.pen_up()?;
    turtle.forward(300.0)?;

    turtle.finish()
}

// ===== the shared surface =====

/// Character raster standing in for the original's window. One cell per
/// terminal column, colored by whichever stroke touched it last.
struct Raster {
    cells: Vec<Option<Color>>,
}

impl Raster {
    fn new() -> Self {
        Raster {
            cells: vec![None; COLS * ROWS],
        }
    }

    /// Stamps a filled disc of the given world-unit radius centered on a
    /// world coordinate. The center cell is always painted, so hairline
    /// strokes still show up at this resolution.
    fn stamp(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        let span = radius.max(1.0).ceil() as i64;
        for dy in -span..=span {
            for dx in -span..=span {
                let (dx, dy) = (dx as f64, dy as f64);
                if dx * dx + dy * dy <= radius * radius || (dx == 0.0 && dy == 0.0) {
                    self.set(x + dx, y + dy, color);
                }
            }
        }
    }

    fn set(&mut self, x: f64, y: f64, color: Color) {
        let col = ((x + WORLD_WIDTH / 2.0) / WORLD_WIDTH * COLS as f64).floor() as i64;
        let row = ((WORLD_HEIGHT / 2.0 - y) / WORLD_HEIGHT * ROWS as f64).floor() as i64;
        if (0..COLS as i64).contains(&col) && (0..ROWS as i64).contains(&row) {
            self.cells[row as usize * COLS + col as usize] = Some(color);
        }
    }
}

/// One turtle bound to the shared raster. Only the scheduler thread ever
/// calls into this, so the `Rc` is sound.
struct TermTurtle {
    surface: Rc<RefCell<Raster>>,
    x: f64,
    y: f64,
    heading: f64,
    pen_down: bool,
    color: Color,
    width: f64,
}

impl TermTurtle {
    fn on(surface: &Rc<RefCell<Raster>>) -> Self {
        TermTurtle {
            surface: Rc::clone(surface),
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            pen_down: true,
            color: Color::Black,
            width: 1.0,
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if self.pen_down {
            let length = f64::hypot(x - self.x, y - self.y);
            let steps = length.ceil().max(1.0) as u32;
            for step in 0..=steps {
                let t = f64::from(step) / f64::from(steps);
                let sx = self.x + (x - self.x) * t;
                let sy = self.y + (y - self.y) * t;
                self.surface
                    .borrow_mut()
                    .stamp(sx, sy, self.width / 2.0, self.color);
            }
        }
        self.x = x;
        self.y = y;
    }
}

impl Canvas for TermTurtle {
    fn speed(&mut self, _speed: u32) {
        // The raster has no animation of its own; cadence comes entirely
        // from the scheduler's pacing delay.
    }

    fn width(&mut self, width: f64) {
        self.width = width;
    }

    fn pen_color(&mut self, color: &str) {
        self.color = named_color(color);
    }

    fn pen_up(&mut self) {
        self.pen_down = false;
    }

    fn pen_down(&mut self) {
        self.pen_down = true;
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.move_to(x, y);
    }

    fn set_heading(&mut self, degrees: f64) {
        self.heading = degrees;
    }

    fn forward(&mut self, distance: f64) {
        let radians = self.heading.to_radians();
        let x = self.x + distance * radians.cos();
        let y = self.y + distance * radians.sin();
        self.move_to(x, y);
    }

    fn left(&mut self, degrees: f64) {
        self.heading += degrees;
    }

    fn right(&mut self, degrees: f64) {
        self.heading -= degrees;
    }

    fn dot(&mut self, color: &str, diameter: u32) {
        self.surface.borrow_mut().stamp(
            self.x,
            self.y,
            f64::from(diameter) / 2.0,
            named_color(color),
        );
    }
}

fn named_color(name: &str) -> Color {
    match name {
        "white" => Color::White,
        "red" => Color::Red,
        "gold" => Color::Yellow,
        "yellow" => Color::Ansi256(226),
        "orange" => Color::Ansi256(208),
        "firebrick" => Color::Ansi256(124),
        "darkgreen" => Color::Ansi256(22),
        "midnightblue" => Color::Ansi256(17),
        "lightblue" => Color::Ansi256(153),
        _ => Color::Black,
    }
}

fn render(raster: &Raster) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let background = named_color(BACKGROUND);
    for row in 0..ROWS {
        for col in 0..COLS {
            let color = raster.cells[row * COLS + col].unwrap_or(background);
            stdout.set_color(ColorSpec::new().set_bg(Some(color)))?;
            write!(stdout, " ")?;
        }
        stdout.reset()?;
        writeln!(stdout)?;
    }
    Ok(())
}

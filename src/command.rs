use crate::canvas::Canvas;

/// One buffered drawing instruction.
///
/// Commands are constructed by the [`Turtle`][crate::Turtle] handle methods,
/// carried through the stream buffer in emission order, and applied to a
/// [`Canvas`] by the dispatcher. A command is immutable once constructed and
/// owns its arguments, so nothing is shared between the producer that built
/// it and the dispatcher that applies it.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Set the drawing pace.
    Speed(u32),
    /// Set the stroke width.
    Width(f64),
    /// Set the pen color by name.
    PenColor(String),
    /// Raise the pen.
    PenUp,
    /// Lower the pen.
    PenDown,
    /// Jump to an absolute position.
    SetPosition(f64, f64),
    /// Face an absolute heading in degrees.
    SetHeading(f64),
    /// Move forward by a distance.
    Forward(f64),
    /// Turn left by an angle in degrees.
    Left(f64),
    /// Turn right by an angle in degrees.
    Right(f64),
    /// Stamp a colored dot of the given diameter.
    Dot(String, u32),
}

impl Command {
    /// Applies this command to a canvas by invoking the corresponding
    /// operation with the bound arguments.
    pub fn apply<C: Canvas>(self, canvas: &mut C) {
        match self {
            Command::Speed(speed) => canvas.speed(speed),
            Command::Width(width) => canvas.width(width),
            Command::PenColor(color) => canvas.pen_color(&color),
            Command::PenUp => canvas.pen_up(),
            Command::PenDown => canvas.pen_down(),
            Command::SetPosition(x, y) => canvas.set_position(x, y),
            Command::SetHeading(degrees) => canvas.set_heading(degrees),
            Command::Forward(distance) => canvas.forward(distance),
            Command::Left(degrees) => canvas.left(degrees),
            Command::Right(degrees) => canvas.right(degrees),
            Command::Dot(color, diameter) => canvas.dot(&color, diameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Canvas for Trace {
        fn speed(&mut self, speed: u32) {
            self.0.push(format!("speed {speed}"));
        }
        fn width(&mut self, width: f64) {
            self.0.push(format!("width {width}"));
        }
        fn pen_color(&mut self, color: &str) {
            self.0.push(format!("pen_color {color}"));
        }
        fn pen_up(&mut self) {
            self.0.push("pen_up".to_owned());
        }
        fn pen_down(&mut self) {
            self.0.push("pen_down".to_owned());
        }
        fn set_position(&mut self, x: f64, y: f64) {
            self.0.push(format!("set_position {x} {y}"));
        }
        fn set_heading(&mut self, degrees: f64) {
            self.0.push(format!("set_heading {degrees}"));
        }
        fn forward(&mut self, distance: f64) {
            self.0.push(format!("forward {distance}"));
        }
        fn left(&mut self, degrees: f64) {
            self.0.push(format!("left {degrees}"));
        }
        fn right(&mut self, degrees: f64) {
            self.0.push(format!("right {degrees}"));
        }
        fn dot(&mut self, color: &str, diameter: u32) {
            self.0.push(format!("dot {color} {diameter}"));
        }
    }

    #[test]
    fn apply_dispatches_to_matching_operation() {
        let mut canvas = Trace::default();
        Command::Speed(6).apply(&mut canvas);
        Command::PenColor("gold".to_owned()).apply(&mut canvas);
        Command::PenDown.apply(&mut canvas);
        Command::SetPosition(-80.0, -170.0).apply(&mut canvas);
        Command::Forward(100.0).apply(&mut canvas);
        Command::Left(90.0).apply(&mut canvas);
        Command::Dot("white".to_owned(), 4).apply(&mut canvas);
        assert_eq!(
            canvas.0,
            [
                "speed 6",
                "pen_color gold",
                "pen_down",
                "set_position -80 -170",
                "forward 100",
                "left 90",
                "dot white 4",
            ],
        );
    }
}

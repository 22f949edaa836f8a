/// Operation set of a drawing agent bound to a shared surface.
///
/// This is the boundary between the scheduler and whatever actually renders.
/// Implementations are invoked exclusively from the dispatcher thread, one
/// command at a time, so they do not need to be thread safe and do not need
/// any internal locking. All operations are fire-and-forget: the dispatcher
/// never consumes a return value.
///
/// Colors are passed by name (`"red"`, `"midnightblue"`, ...); interpreting
/// the name is the implementation's concern.
pub trait Canvas {
    /// Set the agent's drawing pace. Purely advisory for renderers that have
    /// no animation of their own.
    fn speed(&mut self, speed: u32);

    /// Set the stroke width for subsequent lines.
    fn width(&mut self, width: f64);

    /// Set the pen color by name.
    fn pen_color(&mut self, color: &str);

    /// Raise the pen; subsequent movement does not draw.
    fn pen_up(&mut self);

    /// Lower the pen; subsequent movement draws.
    fn pen_down(&mut self);

    /// Jump to an absolute position.
    fn set_position(&mut self, x: f64, y: f64);

    /// Face an absolute heading, in degrees counterclockwise from east.
    fn set_heading(&mut self, degrees: f64);

    /// Move forward by a distance along the current heading.
    fn forward(&mut self, distance: f64);

    /// Turn left by an angle in degrees.
    fn left(&mut self, degrees: f64);

    /// Turn right by an angle in degrees.
    fn right(&mut self, degrees: f64);

    /// Stamp a filled dot of the given color and diameter at the current
    /// position, regardless of pen state.
    fn dot(&mut self, color: &str, diameter: u32);
}

use super::{BoundingBox, Matrix, Point};

/// One drawing command of a glyph outline, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicBezierCurveTo(Point, Point, Point),
    Close,
}

/// A sequence of subpaths accumulated command by command.
#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Begin a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn cubic_bezier_curve_to(
        &mut self,
        first_control_point: Point,
        second_control_point: Point,
        end: Point,
    ) {
        self.commands.push(PathCommand::CubicBezierCurveTo(
            first_control_point,
            second_control_point,
            end,
        ));
    }

    /// Close the current subpath. Closing an empty or already-closed
    /// subpath is a no-op.
    pub fn close(&mut self) {
        if matches!(self.commands.last(), None | Some(PathCommand::Close)) {
            return;
        }

        self.commands.push(PathCommand::Close);
    }

    /// Concatenate another path's commands verbatim.
    pub fn append_path(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }

    pub fn apply_transform(&mut self, transform: Matrix) {
        for command in &mut self.commands {
            match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p = transform.map(*p),
                PathCommand::CubicBezierCurveTo(c1, c2, end) => {
                    *c1 = transform.map(*c1);
                    *c2 = transform.map(*c2);
                    *end = transform.map(*end);
                }
                PathCommand::Close => {}
            }
        }
    }

    pub fn transformed(&self, transform: Matrix) -> Path {
        let mut path = self.clone();
        path.apply_transform(transform);
        path
    }

    /// The hull of every on-curve and control point.
    pub fn bounding_box(&self) -> BoundingBox {
        if self.commands.is_empty() {
            return BoundingBox::zero();
        }

        let mut bbox = BoundingBox::new();

        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => bbox.add_point(*p),
                PathCommand::CubicBezierCurveTo(c1, c2, end) => {
                    bbox.add_point(*c1);
                    bbox.add_point(*c2);
                    bbox.add_point(*end);
                }
                PathCommand::Close => {}
            }
        }

        bbox
    }
}

#[cfg(test)]
mod test {
    use super::{Matrix, Path, PathCommand, Point};

    #[test]
    fn close_is_suppressed_on_empty_and_closed_subpaths() {
        let mut path = Path::new();

        path.close();
        assert!(path.is_empty());

        path.move_to(Point::new(1.0, 2.0));
        path.close();
        path.close();

        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(1.0, 2.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn append_path_concatenates_verbatim() {
        let mut base = Path::new();
        base.move_to(Point::new(0.0, 0.0));
        base.line_to(Point::new(10.0, 0.0));
        base.close();

        let mut accent = Path::new();
        accent.move_to(Point::new(2.0, 20.0));
        accent.close();

        base.append_path(&accent);

        assert_eq!(base.commands().len(), 5);
        assert_eq!(
            base.commands()[3],
            PathCommand::MoveTo(Point::new(2.0, 20.0))
        );
    }

    #[test]
    fn bounding_box_covers_control_points() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.cubic_bezier_curve_to(
            Point::new(-5.0, 10.0),
            Point::new(20.0, 30.0),
            Point::new(10.0, 0.0),
        );

        let bbox = path.bounding_box();

        assert_eq!(bbox.x(), -5.0);
        assert_eq!(bbox.y(), 0.0);
        assert_eq!(bbox.width(), 25.0);
        assert_eq!(bbox.height(), 30.0);
    }

    #[test]
    fn transform_maps_every_point() {
        let mut path = Path::new();
        path.move_to(Point::new(1.0, 1.0));
        path.line_to(Point::new(2.0, 1.0));

        let transformed = path.transformed(Matrix::translation(0.0, 3.0));

        assert_eq!(
            transformed.commands(),
            &[
                PathCommand::MoveTo(Point::new(1.0, 4.0)),
                PathCommand::LineTo(Point::new(2.0, 4.0)),
            ]
        );
        // the original is untouched
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(1.0, 1.0)));
    }
}

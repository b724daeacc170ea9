//! # Lines Plot Widget
//!
//! Draws a resonance diagram: the outline of the unit tune square plus
//! a set of line segments, all with one thin pen whose width shrinks as
//! the resonance order grows.

use eltools_core::resonance::{self, Segment};
use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Rectangle, Renderer, Theme};
use tracing::debug;

use crate::transform::UnitSquare;

/// Pen width for order one, in tune units.
const BASE_PEN_WIDTH: f64 = 0.005;

/// Default line colour (dark cyan).
pub const DEFAULT_COLOR: Color = Color::from_rgb(0.0, 0.5, 0.5);

/// Canvas widget for a set of segments in the unit tune square.
#[derive(Debug, Clone)]
pub struct LinesPlot {
    lines: Vec<Segment>,
    order: u32,
    color: Color,
}

impl LinesPlot {
    /// Creates a plot of `lines`; `order` only sets the pen width.
    pub fn new(lines: Vec<Segment>, order: u32) -> Self {
        Self {
            lines,
            order,
            color: DEFAULT_COLOR,
        }
    }

    /// The full resonance diagram up to `order`.
    pub fn resonance(order: u32) -> Self {
        let lines = resonance::resonance_segments(order);
        debug!("[LINES] {} resonance lines up to order {order}", lines.len());
        Self::new(lines, order)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Pen width in tune units.
    pub fn pen_width(&self) -> f64 {
        BASE_PEN_WIDTH / self.order.max(1) as f64
    }

    /// Everything the widget draws: the square outline, then the segments.
    pub fn lines(&self) -> Vec<Segment> {
        let mut all = vec![
            Segment::new((0.0, 0.0), (0.0, 1.0)),
            Segment::new((0.0, 0.0), (1.0, 0.0)),
            Segment::new((1.0, 1.0), (0.0, 1.0)),
            Segment::new((1.0, 1.0), (1.0, 0.0)),
        ];
        all.extend_from_slice(&self.lines);
        all
    }

    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for LinesPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let Some(square) = UnitSquare::try_fit(bounds.size()) else {
            return vec![frame.into_geometry()];
        };
        let stroke = Stroke::default()
            .with_width(square.pen(self.pen_width()))
            .with_color(self.color);

        let path = Path::new(|builder| {
            for segment in self.lines() {
                builder.move_to(square.to_canvas(segment.start));
                builder.line_to(square.to_canvas(segment.end));
            }
        });
        frame.stroke(&path, stroke);

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_comes_first() {
        let plot = LinesPlot::resonance(3);
        let lines = plot.lines();
        assert_eq!(lines.len(), 4 + 20);
        assert_eq!(lines[0], Segment::new((0.0, 0.0), (0.0, 1.0)));
        assert_eq!(lines[3], Segment::new((1.0, 1.0), (1.0, 0.0)));
    }

    #[test]
    fn pen_thins_with_order() {
        assert_eq!(LinesPlot::new(Vec::new(), 1).pen_width(), 0.005);
        assert!((LinesPlot::new(Vec::new(), 5).pen_width() - 0.001).abs() < 1e-15);
        // Order zero draws like order one.
        assert_eq!(LinesPlot::new(Vec::new(), 0).pen_width(), 0.005);
    }

    #[test]
    fn colour_can_be_overridden() {
        let plot = LinesPlot::new(Vec::new(), 2).with_color(Color::BLACK);
        assert_eq!(plot.color, Color::BLACK);
        assert_eq!(LinesPlot::new(Vec::new(), 2).color, DEFAULT_COLOR);
    }
}

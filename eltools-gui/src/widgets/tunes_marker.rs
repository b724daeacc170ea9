//! # Tunes Marker Widget
//!
//! A small `x` drawn at the machine's working point in the tune square.
//! It is meant to sit on top of a [`LinesPlot`](super::lines_plot::LinesPlot)
//! in an Iced `stack`.

use eltools_core::resonance::Segment;
use eltools_core::tunes::{self, CROSS_HALF_LENGTH, CROSS_PEN_WIDTH};
use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Rectangle, Renderer, Theme};

use crate::transform::UnitSquare;

pub const DEFAULT_COLOR: Color = Color::from_rgb(1.0, 0.0, 0.0);

#[derive(Debug, Clone)]
pub struct TunesMarker {
    x: f64,
    y: f64,
    color: Color,
}

impl TunesMarker {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            color: DEFAULT_COLOR,
        }
    }

    /// Places the marker at the fractional part of the given tunes.
    pub fn at_tunes(nu_x: f64, nu_y: f64) -> Self {
        Self::new(tunes::fractional(nu_x), tunes::fractional(nu_y))
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn update_pos(&mut self, (x, y): (f64, f64)) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// The two diagonals of the cross, in tune units.
    pub fn lines(&self) -> [Segment; 2] {
        tunes::cross_marker(self.x, self.y, CROSS_HALF_LENGTH)
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

impl<Message> canvas::Program<Message> for TunesMarker {
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
            .with_width(square.pen(CROSS_PEN_WIDTH))
            .with_color(self.color);
        let cross = Path::new(|builder| {
            for segment in self.lines() {
                builder.move_to(square.to_canvas(segment.start));
                builder.line_to(square.to_canvas(segment.end));
            }
        });
        frame.stroke(&cross, stroke);

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_centred_on_position() {
        let marker = TunesMarker::new(0.3, 0.6);
        for segment in marker.lines() {
            let mid_x = (segment.start.0 + segment.end.0) / 2.0;
            let mid_y = (segment.start.1 + segment.end.1) / 2.0;
            assert!((mid_x - 0.3).abs() < 1e-12);
            assert!((mid_y - 0.6).abs() < 1e-12);
            assert!(((segment.end.0 - segment.start.0).abs() - 0.03).abs() < 1e-12);
        }
    }

    #[test]
    fn update_pos_moves_the_cross() {
        let mut marker = TunesMarker::at_tunes(8.25, 3.75);
        assert_eq!(marker.position(), (0.25, 0.75));
        marker.update_pos((0.1, 0.2));
        assert_eq!(marker.position(), (0.1, 0.2));
        assert_eq!(marker.color, DEFAULT_COLOR);
    }

    #[test]
    fn colour_can_be_overridden() {
        let marker = TunesMarker::new(0.3, 0.6).with_color(Color::BLACK);
        assert_eq!(marker.color, Color::BLACK);
        assert_eq!(marker.position(), (0.3, 0.6));
    }
}

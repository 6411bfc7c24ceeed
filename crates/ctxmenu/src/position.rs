//! Screen positions and the fallback chain used to place a menu.

use serde::{Deserialize, Serialize};

use crate::InteractionEvent;

/// A point in screen (or canvas) space.
///
/// External sources may hand us non-finite coordinates to mean "unknown";
/// such a position is invalid and never chosen by [`resolve_position`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// The hard-coded last resort.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Translate by `origin`.
    #[inline]
    pub fn offset(self, origin: Self) -> Self {
        Self {
            x: self.x + origin.x,
            y: self.y + origin.y,
        }
    }
}

/// Bounding box of a viewport element in screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rect.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A lazily evaluated position source.
pub type Candidate<'a> = Box<dyn FnOnce() -> Option<Position> + 'a>;

/// Evaluate `candidates` in order and return the first valid position.
///
/// Candidates after the first success are never evaluated. When nothing is
/// valid the result is [`Position::ORIGIN`].
pub fn resolve_position<'a, I>(candidates: I) -> Position
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    for candidate in candidates {
        if let Some(p) = candidate()
            && p.is_valid()
        {
            return p;
        }
    }
    Position::ORIGIN
}

/// Place a menu using the standard priority order:
///
/// 1. the first valid `anchor` point (canvas space) translated by the
///    viewport's origin,
/// 2. the client point carried by the triggering event,
/// 3. the viewport's origin,
/// 4. `{0, 0}`.
///
/// `viewport_rect` is a geometry query and is only called when a candidate
/// actually needs it.
pub fn anchored_position<F>(
    anchors: &[Position],
    event: Option<&InteractionEvent>,
    viewport_rect: F,
) -> Position
where
    F: Fn() -> Option<Rect>,
{
    let rect = &viewport_rect;
    resolve_position::<[Candidate<'_>; 4]>([
        Box::new(move || {
            let point = anchors.iter().find(|p| p.is_valid())?;
            let origin = rect()?.origin();
            origin.is_valid().then(|| point.offset(origin))
        }),
        Box::new(move || event.and_then(|e| e.client)),
        Box::new(move || rect().map(|r| r.origin())),
        Box::new(|| Some(Position::ORIGIN)),
    ])
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::MouseButton;

    fn event_at(x: f64, y: f64) -> InteractionEvent {
        InteractionEvent {
            client: Some(Position::new(x, y)),
            ..InteractionEvent::new(MouseButton::Secondary)
        }
    }

    #[test]
    fn first_valid_candidate_wins_and_short_circuits() {
        let evaluated = Cell::new(0);
        let p = resolve_position::<Vec<Candidate<'_>>>(vec![
            Box::new(|| {
                evaluated.set(evaluated.get() + 1);
                Some(Position::new(5.0, 6.0))
            }),
            Box::new(|| {
                evaluated.set(evaluated.get() + 10);
                Some(Position::new(1.0, 1.0))
            }),
        ]);
        assert_eq!(p, Position::new(5.0, 6.0));
        assert_eq!(evaluated.get(), 1);
    }

    #[test]
    fn invalid_candidates_are_skipped() {
        let p = resolve_position::<Vec<Candidate<'_>>>(vec![
            Box::new(|| None),
            Box::new(|| Some(Position::new(f64::NAN, 2.0))),
            Box::new(|| Some(Position::new(3.0, 4.0))),
        ]);
        assert_eq!(p, Position::new(3.0, 4.0));
    }

    #[test]
    fn empty_chain_is_origin() {
        assert_eq!(
            resolve_position::<Vec<Candidate<'_>>>(Vec::new()),
            Position::ORIGIN
        );
    }

    #[test]
    fn anchor_point_is_translated_into_screen_space() {
        let ev = event_at(500.0, 500.0);
        let p = anchored_position(
            &[Position::new(f64::NAN, 1.0), Position::new(10.0, 20.0)],
            Some(&ev),
            || Some(Rect::new(100.0, 200.0, 512.0, 512.0)),
        );
        assert_eq!(p, Position::new(110.0, 220.0));
    }

    #[test]
    fn event_point_used_without_anchor_and_geometry_is_not_queried() {
        let queries = Cell::new(0);
        let ev = event_at(42.0, 43.0);
        let p = anchored_position(&[], Some(&ev), || {
            queries.set(queries.get() + 1);
            Some(Rect::new(1.0, 1.0, 1.0, 1.0))
        });
        assert_eq!(p, Position::new(42.0, 43.0));
        assert_eq!(queries.get(), 0);
    }

    #[test]
    fn anchor_without_geometry_falls_through_to_event() {
        let ev = event_at(7.0, 8.0);
        let p = anchored_position(&[Position::new(1.0, 1.0)], Some(&ev), || None);
        assert_eq!(p, Position::new(7.0, 8.0));
    }

    #[test]
    fn viewport_origin_then_default() {
        let p = anchored_position(&[], None, || Some(Rect::new(30.0, 40.0, 10.0, 10.0)));
        assert_eq!(p, Position::new(30.0, 40.0));
        let p = anchored_position(&[], None, || None);
        assert_eq!(p, Position::ORIGIN);
    }
}

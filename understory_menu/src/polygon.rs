// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Safe polygon: the region a pointer may cross on its way to an open submenu.

use core::cmp::Ordering;

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::types::Side;

/// Tolerance for boundary tests, in surface units.
const BOUNDARY_EPS: f64 = 1e-9;

/// Convex region spanning from the pointer's exit position to the near edge of
/// an open submenu.
///
/// The region is the convex hull of an apex (the exit sample, pushed `bleed`
/// units away from the submenu) and the four corners of the submenu rectangle.
/// Points on the boundary count as inside, so a trajectory that grazes the
/// submenu's own edge keeps it open.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_menu::{SafePolygon, Side};
///
/// let submenu = Rect::new(100.0, 0.0, 200.0, 100.0);
/// let poly = SafePolygon::toward(Point::new(90.0, 50.0), submenu, Side::Right, 5.0).unwrap();
///
/// assert!(poly.contains(Point::new(95.0, 45.0)));
/// assert!(!poly.contains(Point::new(80.0, 50.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SafePolygon {
    /// Hull vertices in counter-clockwise order (y-down surfaces read clockwise).
    hull: SmallVec<[Point; 6]>,
    side: Side,
}

impl SafePolygon {
    /// Build the polygon for a pointer leaving at `exit` toward `submenu` on `side`.
    ///
    /// Returns `None` when the submenu has no area or any coordinate is not
    /// finite; callers should then close without a grace period.
    pub fn toward(exit: Point, submenu: Rect, side: Side, bleed: f64) -> Option<Self> {
        if !is_usable(submenu) || !exit.is_finite() || !bleed.is_finite() {
            return None;
        }
        let submenu = submenu.abs();
        let (near, far, shift) = match side {
            Side::Right => (submenu.x0, submenu.x1, -bleed),
            Side::Left => (submenu.x1, submenu.x0, bleed),
        };
        let apex = exit + Vec2::new(shift, 0.0);
        let corners = [
            apex,
            Point::new(near, submenu.y0),
            Point::new(far, submenu.y0),
            Point::new(far, submenu.y1),
            Point::new(near, submenu.y1),
        ];
        Some(Self {
            hull: convex_hull(&corners),
            side,
        })
    }

    /// Returns `true` if `pt` lies inside or on the boundary.
    pub fn contains(&self, pt: Point) -> bool {
        let n = self.hull.len();
        if n < 3 {
            return false;
        }
        (0..n).all(|i| {
            let a = self.hull[i];
            let b = self.hull[(i + 1) % n];
            cross(b - a, pt - a) >= -BOUNDARY_EPS
        })
    }

    /// Side of the trigger on which the submenu sits.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Hull vertices.
    pub fn points(&self) -> &[Point] {
        &self.hull
    }

    /// Axis-aligned bounds of the polygon.
    pub fn bounding_box(&self) -> Rect {
        let mut iter = self.hull.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }
}

/// Returns `true` if `r` has finite coordinates and a positive area.
pub(crate) fn is_usable(r: Rect) -> bool {
    r.is_finite() && r.abs().area() > 0.0
}

fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Andrew's monotone chain. Collinear points are dropped; output winds so that
/// the interior is on the left of each edge in a y-up frame.
fn convex_hull(points: &[Point]) -> SmallVec<[Point; 6]> {
    let mut pts: SmallVec<[Point; 6]> = points.iter().copied().collect();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: SmallVec<[Point; 6]> = SmallVec::new();
    for &p in pts.iter() {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

fn turn(o: Point, a: Point, b: Point) -> f64 {
    cross(a - o, b - o)
}

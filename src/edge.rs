/* SPDX-License-Identifier: (Apache-2.0 OR MIT OR Zlib) */
/* Copyright © 2023 Violet Leonard */

use crate::math::Polynomial;

/// Upper bound on the line pieces one curve is split into.
const MAX_CURVE_STEPS: usize = 64;

/// A piece of glyph outline, parameterised over `t` in `0..=1`.
pub trait Edge {
    fn point(&self, t: f32) -> (f32, f32);

    /// Rough length, used to decide how finely to flatten.
    fn hull_length(&self) -> f32;

    /// Appends line pieces approximating this edge, `step_len` pixels or
    /// shorter.
    fn flatten_into(&self, step_len: f32, out: &mut Vec<Line>) {
        let steps = ((self.hull_length() / step_len).ceil() as usize).clamp(1, MAX_CURVE_STEPS);
        let mut prev = self.point(0.0);
        for i in 1..=steps {
            let next = self.point(i as f32 / steps as f32);
            out.push(Line::new(prev, next));
            prev = next;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    start: (f32, f32),
    end: (f32, f32),
}

impl Line {
    pub fn new(start: (f32, f32), end: (f32, f32)) -> Self {
        Self { start, end }
    }

    fn nearest_t(&self, point: (f32, f32)) -> f32 {
        let vx = self.end.0 - self.start.0;
        let vy = self.end.1 - self.start.1;
        let vv = (vx * vx) + (vy * vy);
        if vv == 0.0 {
            return 0.0;
        }
        let ux = point.0 - self.start.0;
        let uy = point.1 - self.start.1;
        (((vx * ux) + (vy * uy)) / vv).clamp(0.0, 1.0)
    }

    pub fn distance_sq(&self, point: (f32, f32)) -> f32 {
        let (x, y) = self.point(self.nearest_t(point));
        (x - point.0).powi(2) + (y - point.1).powi(2)
    }

    /// This line's contribution to the winding number around `point`,
    /// counting crossings of the horizontal ray to its right.
    pub fn winding(&self, point: (f32, f32)) -> i32 {
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        let side = (x1 - x0) * (point.1 - y0) - (point.0 - x0) * (y1 - y0);
        if y0 <= point.1 {
            if y1 > point.1 && side > 0.0 {
                return 1;
            }
        } else if y1 <= point.1 && side < 0.0 {
            return -1;
        }
        0
    }
}

impl Edge for Line {
    fn point(&self, t: f32) -> (f32, f32) {
        let x = (self.start.0 * (1.0 - t)) + (self.end.0 * t);
        let y = (self.start.1 * (1.0 - t)) + (self.end.1 * t);
        (x, y)
    }

    fn hull_length(&self) -> f32 {
        distance(self.start, self.end)
    }

    fn flatten_into(&self, _step_len: f32, out: &mut Vec<Line>) {
        out.push(*self);
    }
}

pub struct QuadCurve {
    x_poly: Polynomial<3>,
    y_poly: Polynomial<3>,
    hull_length: f32,
}

impl QuadCurve {
    pub fn new(start: (f32, f32), control: (f32, f32), end: (f32, f32)) -> Self {
        let x_poly = Polynomial {
            coeffs: [
                -2.0 * control.0 + start.0 + end.0,
                2.0 * control.0 - 2.0 * start.0,
                start.0,
            ],
        };
        let y_poly = Polynomial {
            coeffs: [
                -2.0 * control.1 + start.1 + end.1,
                2.0 * control.1 - 2.0 * start.1,
                start.1,
            ],
        };
        Self {
            x_poly,
            y_poly,
            hull_length: distance(start, control) + distance(control, end),
        }
    }
}

impl Edge for QuadCurve {
    fn point(&self, t: f32) -> (f32, f32) {
        (self.x_poly.value(t), self.y_poly.value(t))
    }

    fn hull_length(&self) -> f32 {
        self.hull_length
    }
}

pub struct CubicCurve {
    x_poly: Polynomial<4>,
    y_poly: Polynomial<4>,
    hull_length: f32,
}

impl CubicCurve {
    pub fn new(
        start: (f32, f32),
        control_s: (f32, f32),
        control_e: (f32, f32),
        end: (f32, f32),
    ) -> Self {
        let x_poly = Polynomial {
            coeffs: [
                -start.0 + 3.0 * control_s.0 - 3.0 * control_e.0 + end.0,
                3.0 * start.0 - 6.0 * control_s.0 + 3.0 * control_e.0,
                -3.0 * start.0 + 3.0 * control_s.0,
                start.0,
            ],
        };
        let y_poly = Polynomial {
            coeffs: [
                -start.1 + 3.0 * control_s.1 - 3.0 * control_e.1 + end.1,
                3.0 * start.1 - 6.0 * control_s.1 + 3.0 * control_e.1,
                -3.0 * start.1 + 3.0 * control_s.1,
                start.1,
            ],
        };
        Self {
            x_poly,
            y_poly,
            hull_length: distance(start, control_s)
                + distance(control_s, control_e)
                + distance(control_e, end),
        }
    }
}

impl Edge for CubicCurve {
    fn point(&self, t: f32) -> (f32, f32) {
        (self.x_poly.value(t), self.y_poly.value(t))
    }

    fn hull_length(&self) -> f32 {
        self.hull_length
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

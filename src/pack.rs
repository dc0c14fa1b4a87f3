//! Shelf style rectangle packing into a near-square container.

use std::cmp::Reverse;

use crate::Error;

/// Height of the initial free space; it is never shrunk.
const UNBOUNDED: u32 = u32::MAX;

/// Aim for a container this full when picking its width.
const TARGET_FILL: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Top-left corner assigned to a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Packing {
    /// One entry per input rectangle, in input order.
    pub placements: Vec<Placement>,
    pub width: u32,
    pub height: u32,
    /// Share of the container covered by rectangles, `0.0` if it is empty.
    pub fill_ratio: f64,
}

#[derive(Clone, Copy, Debug)]
struct Space {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Space {
    fn fits(&self, rect: &Rect) -> bool {
        rect.width <= self.w && rect.height <= self.h
    }

    fn shrink_down(&mut self, by: u32) {
        self.y += by;
        if self.h != UNBOUNDED {
            self.h -= by;
        }
    }
}

/// Places every rectangle without overlap, keeping the container's area
/// small.
///
/// Rectangles go in tallest first. Each one takes the top-left corner of
/// the most recently created free space that holds it, and the rest of
/// that space is split into what is left to its right and below it.
pub fn pack(rects: &[Rect]) -> Result<Packing, Error> {
    let mut area = 0;
    let mut max_width = 0;
    for (index, rect) in rects.iter().enumerate() {
        if rect.width == 0 || rect.height == 0 {
            return Err(Error::InvalidRect {
                index,
                width: rect.width,
                height: rect.height,
            });
        }
        area += rect.area();
        max_width = max_width.max(rect.width);
    }

    // stable, so equal heights keep their input order
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by_key(|&i| Reverse(rects[i].height));

    let start_width = ((area as f64 / TARGET_FILL).sqrt().ceil() as u32).max(max_width);
    let mut spaces = vec![Space {
        x: 0,
        y: 0,
        w: start_width,
        h: UNBOUNDED,
    }];
    tracing::debug!(
        "packing {} rectangles, start width {}",
        rects.len(),
        start_width
    );

    let mut placements = vec![Placement::default(); rects.len()];
    let (mut width, mut height) = (0, 0);
    for index in order {
        let rect = rects[index];
        // newest spaces are the smallest, try them first. The unbounded
        // bottom space never narrows below start_width >= max_width, so
        // this can't fail for rectangles that passed the checks above.
        let Some(i) = spaces.iter().rposition(|space| space.fits(&rect)) else {
            return Err(Error::PackingCapacity {
                index,
                width: rect.width,
                container_width: start_width,
            });
        };
        let space = &mut spaces[i];
        placements[index] = Placement {
            x: space.x,
            y: space.y,
        };
        width = width.max(space.x + rect.width);
        height = height.max(space.y + rect.height);

        match (rect.width == space.w, rect.height == space.h) {
            (true, true) => {
                spaces.swap_remove(i);
            }
            (false, true) => {
                space.x += rect.width;
                space.w -= rect.width;
            }
            (true, false) => space.shrink_down(rect.height),
            (false, false) => {
                let right = Space {
                    x: space.x + rect.width,
                    y: space.y,
                    w: space.w - rect.width,
                    h: rect.height,
                };
                space.shrink_down(rect.height);
                spaces.push(right);
            }
        }
    }

    let container = u64::from(width) * u64::from(height);
    let fill_ratio = if container == 0 {
        0.0
    } else {
        area as f64 / container as f64
    };
    Ok(Packing {
        placements,
        width,
        height,
        fill_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small deterministic generator so the property tests are repeatable.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, max: u32) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) as u32 % max) + 1
        }
    }

    fn overlaps(a: (Placement, Rect), b: (Placement, Rect)) -> bool {
        let (pa, ra) = a;
        let (pb, rb) = b;
        pa.x < pb.x + rb.width
            && pb.x < pa.x + ra.width
            && pa.y < pb.y + rb.height
            && pb.y < pa.y + ra.height
    }

    fn assert_valid(rects: &[Rect], packing: &Packing) {
        assert_eq!(packing.placements.len(), rects.len());
        let placed: Vec<_> = packing.placements.iter().copied().zip(rects.iter().copied()).collect();
        for (i, &a) in placed.iter().enumerate() {
            assert!(a.0.x + a.1.width <= packing.width);
            assert!(a.0.y + a.1.height <= packing.height);
            for &b in &placed[i + 1..] {
                assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
            }
        }
        let area: u64 = rects.iter().map(Rect::area).sum();
        assert!(u64::from(packing.width) * u64::from(packing.height) >= area);
        assert!(packing.fill_ratio <= 1.0);
    }

    #[test]
    fn test_empty_input() {
        let packing = pack(&[]).unwrap();
        assert!(packing.placements.is_empty());
        assert_eq!((packing.width, packing.height), (0, 0));
        assert_eq!(packing.fill_ratio, 0.0);
    }

    #[test]
    fn test_single_rect() {
        let packing = pack(&[Rect::new(10, 20)]).unwrap();
        assert_eq!(packing.placements, vec![Placement { x: 0, y: 0 }]);
        assert_eq!((packing.width, packing.height), (10, 20));
        assert_eq!(packing.fill_ratio, 1.0);
    }

    #[test]
    fn test_uniform_squares() {
        let rects = vec![Rect::square(40); 9];
        let packing = pack(&rects).unwrap();
        assert_valid(&rects, &packing);
        // ceil(sqrt(14400 / 0.95)) = 124, so three tiles per row
        assert_eq!((packing.width, packing.height), (120, 120));
        assert_eq!(packing.placements[0], Placement { x: 0, y: 0 });
        assert_eq!(packing.placements[1], Placement { x: 40, y: 0 });
        assert_eq!(packing.placements[3], Placement { x: 0, y: 40 });
    }

    #[test]
    fn test_tallest_goes_first() {
        let rects = [Rect::new(5, 5), Rect::new(5, 30), Rect::new(5, 10)];
        let packing = pack(&rects).unwrap();
        assert_valid(&rects, &packing);
        assert_eq!(packing.placements[1], Placement { x: 0, y: 0 });
    }

    #[test]
    fn test_wide_rect_widens_start() {
        let rects = [Rect::new(100, 1), Rect::new(2, 2)];
        let packing = pack(&rects).unwrap();
        assert_valid(&rects, &packing);
        assert!(packing.width >= 100);
    }

    #[test]
    fn test_random_rects_never_overlap() {
        let mut rng = Lcg(7);
        for round in 0..50 {
            let count = 1 + round * 3;
            let rects: Vec<_> = (0..count)
                .map(|_| Rect::new(rng.next(64), rng.next(64)))
                .collect();
            let packing = pack(&rects).unwrap();
            assert_valid(&rects, &packing);
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let mut rng = Lcg(99);
        let rects: Vec<_> = (0..40).map(|_| Rect::new(rng.next(20), rng.next(8))).collect();
        assert_eq!(pack(&rects).unwrap(), pack(&rects).unwrap());
    }

    #[test]
    fn test_rejects_empty_side() {
        assert_eq!(
            pack(&[Rect::new(3, 3), Rect::new(0, 4)]),
            Err(Error::InvalidRect {
                index: 1,
                width: 0,
                height: 4
            })
        );
    }
}

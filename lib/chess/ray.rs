use crate::chess::Square;
use std::iter::FusedIterator;

/// The squares strictly between two squares on the same line.
///
/// A line is a rank, a file or a diagonal; the ray walks one step at a time
/// from just after the source towards the destination, stopping just before it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ray {
    next: Square,
    end: Square,
    step: (i8, i8),
}

impl Ray {
    /// The ray from `whence` to `whither`, or `None` if they don't share a line.
    ///
    /// A square shares no line with itself.
    pub fn between(whence: Square, whither: Square) -> Option<Self> {
        let (dr, dc) = whither - whence;

        if (dr, dc) == (0, 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
            return None;
        }

        let step = (dr.signum(), dc.signum());

        Some(Ray {
            next: whence.offset(step.0, step.1)?,
            end: whither,
            step,
        })
    }
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }

        let sq = self.next;
        self.next = sq.offset(self.step.0, self.step.1).unwrap_or(self.end);
        Some(sq)
    }
}

impl FusedIterator for Ray {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn ray_along_rank_excludes_both_ends() {
        let squares: Vec<_> = Ray::between(sq("a1"), sq("h1")).unwrap().collect();
        let expected: Vec<_> = ["b1", "c1", "d1", "e1", "f1", "g1"].map(sq).into();
        assert_eq!(squares, expected);
    }

    #[test]
    fn ray_along_file_walks_towards_destination() {
        let squares: Vec<_> = Ray::between(sq("d8"), sq("d4")).unwrap().collect();
        let expected: Vec<_> = ["d7", "d6", "d5"].map(sq).into();
        assert_eq!(squares, expected);
    }

    #[test]
    fn ray_along_diagonal_walks_both_coordinates() {
        let squares: Vec<_> = Ray::between(sq("h8"), sq("e5")).unwrap().collect();
        let expected: Vec<_> = ["g7", "f6"].map(sq).into();
        assert_eq!(squares, expected);
    }

    #[test]
    fn ray_between_adjacent_squares_is_empty() {
        assert_eq!(Ray::between(sq("e4"), sq("e5")).unwrap().count(), 0);
        assert_eq!(Ray::between(sq("e4"), sq("f5")).unwrap().count(), 0);
    }

    #[proptest]
    fn ray_does_not_exist_from_a_square_to_itself(s: Square) {
        assert_eq!(Ray::between(s, s), None);
    }

    #[proptest]
    fn ray_does_not_exist_between_squares_off_line(a: Square, b: Square) {
        let (dr, dc) = b - a;
        let aligned = dr == 0 || dc == 0 || dr.abs() == dc.abs();
        assert_eq!(Ray::between(a, b).is_some(), aligned && a != b);
    }

    #[proptest]
    fn ray_has_one_square_less_than_the_distance(a: Square, b: Square) {
        if let Some(ray) = Ray::between(a, b) {
            let (dr, dc) = b - a;
            let distance = dr.abs().max(dc.abs()) as usize;
            assert_eq!(ray.count(), distance - 1);
        }
    }

    #[proptest]
    fn reversed_ray_visits_the_same_squares(a: Square, b: Square) {
        if let (Some(fwd), Some(bwd)) = (Ray::between(a, b), Ray::between(b, a)) {
            let mut fwd: Vec<_> = fwd.collect();
            fwd.reverse();
            assert_eq!(fwd, bwd.collect::<Vec<_>>());
        }
    }
}

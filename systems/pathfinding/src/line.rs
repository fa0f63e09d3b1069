//! Unit-step sampling along the straight line between two cells.

use cavern_core::CellCoord;
use glam::{DVec2, IVec2};

/// Raw samples of the line from an origin toward a destination.
///
/// Yields `origin + k * direction` rounded half away from zero for
/// `k in 0..manhattan(origin, destination)`, where `direction` is the unit
/// vector toward the destination. Coinciding cells yield nothing, which keeps
/// the normalisation away from a zero-length vector.
#[derive(Clone, Debug)]
pub(crate) struct Trace {
    origin: DVec2,
    direction: DVec2,
    step: u32,
    steps: u32,
}

impl Trace {
    pub(crate) fn between(origin: CellCoord, destination: CellCoord) -> Self {
        let start = to_vector(origin).as_dvec2();
        if origin == destination {
            return Self {
                origin: start,
                direction: DVec2::ZERO,
                step: 0,
                steps: 0,
            };
        }

        let direction = (to_vector(destination) - to_vector(origin))
            .as_dvec2()
            .normalize();
        Self {
            origin: start,
            direction,
            step: 0,
            steps: origin.manhattan_distance(destination),
        }
    }
}

impl Iterator for Trace {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.steps {
            return None;
        }

        let point = self.origin + self.direction * f64::from(self.step);
        self.step += 1;
        Some(CellCoord::new(point.x.round() as i32, point.y.round() as i32))
    }
}

fn to_vector(cell: CellCoord) -> IVec2 {
    IVec2::new(cell.row(), cell.column())
}

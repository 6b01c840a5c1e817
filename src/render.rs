//! Progress ring geometry for clients drawing the circular indicator

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::state::ReadModel;

/// Radius of the progress ring in display units
pub const RING_RADIUS: f64 = 90.0;

/// Stroke parameters for a circular progress indicator
///
/// Drawn as a dashed circle whose dash length is the full circumference: an
/// offset equal to the circumference shows an empty ring, zero a full one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl Ring {
    pub fn for_progress(radius: f64, progress_fraction: f64) -> Self {
        let circumference = 2.0 * PI * radius;
        Self {
            radius,
            circumference,
            dash_offset: circumference * (1.0 - progress_fraction.clamp(0.0, 1.0)),
        }
    }
}

impl From<&ReadModel> for Ring {
    fn from(model: &ReadModel) -> Self {
        Ring::for_progress(RING_RADIUS, model.progress_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full_ring() {
        let empty = Ring::for_progress(RING_RADIUS, 0.0);
        assert_eq!(empty.dash_offset, empty.circumference);

        let full = Ring::for_progress(RING_RADIUS, 1.0);
        assert_eq!(full.dash_offset, 0.0);
    }

    #[test]
    fn test_ring_from_read_model() {
        let ring = Ring::from(&ReadModel::compute(750, 1500));
        assert!((ring.circumference - 565.486_677_646_162_7).abs() < 1e-9);
        assert!((ring.dash_offset - ring.circumference / 2.0).abs() < 1e-9);
    }
}

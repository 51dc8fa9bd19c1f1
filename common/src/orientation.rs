use crate::types::{AccelSample, Rotation};

/// Maps gravity to a display rotation. Returns `None` when the device is
/// flat, inverted, or edge-on (`z` outside the open interval `(0, z_max)`).
pub fn classify(sample: AccelSample, z_max: f32) -> Option<Rotation> {
    if !(sample.z > 0.0 && sample.z < z_max) {
        return None;
    }

    let rotation = if sample.x.abs() > sample.y.abs() {
        if sample.x > 0.0 {
            Rotation::Deg90
        } else {
            Rotation::Deg270
        }
    } else if sample.y > 0.0 {
        Rotation::Deg0
    } else {
        Rotation::Deg180
    };

    Some(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z_MAX: f32 = 0.90;

    #[test]
    fn open_interval_bounds_reject() {
        assert_eq!(classify(AccelSample::new(1.0, 0.0, 0.0), Z_MAX), None);
        assert_eq!(classify(AccelSample::new(1.0, 0.0, 0.90), Z_MAX), None);
        assert_eq!(classify(AccelSample::new(1.0, 0.0, -0.5), Z_MAX), None);
        assert_eq!(classify(AccelSample::new(0.0, 0.0, 1.0), Z_MAX), None);
        assert_eq!(classify(AccelSample::new(1.0, 0.0, f32::NAN), Z_MAX), None);
    }

    #[test]
    fn dominant_x_axis_selects_side_rotations() {
        assert_eq!(
            classify(AccelSample::new(1.0, 0.0, 0.5), Z_MAX),
            Some(Rotation::Deg90)
        );
        assert_eq!(
            classify(AccelSample::new(-1.0, 0.0, 0.5), Z_MAX),
            Some(Rotation::Deg270)
        );
    }

    #[test]
    fn dominant_y_axis_selects_upright_rotations() {
        assert_eq!(
            classify(AccelSample::new(0.1, 0.7, 0.5), Z_MAX),
            Some(Rotation::Deg0)
        );
        assert_eq!(
            classify(AccelSample::new(0.1, -0.7, 0.5), Z_MAX),
            Some(Rotation::Deg180)
        );
    }

    #[test]
    fn equal_axes_fall_through_to_y() {
        assert_eq!(
            classify(AccelSample::new(0.4, 0.4, 0.5), Z_MAX),
            Some(Rotation::Deg0)
        );
        assert_eq!(
            classify(AccelSample::new(0.0, 0.0, 0.5), Z_MAX),
            Some(Rotation::Deg180)
        );
    }
}

use std::fmt;

/// A city location on the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityPoint {
    pub x: f64,
    pub y: f64,
}

impl CityPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(self, rhs: &Self) -> f64 {
        let dx = self.x - rhs.x;
        let dy = self.y - rhs.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for CityPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.x), b2.format(self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::CityPoint;

    #[test]
    fn dist_uses_euclidean_metric() {
        let a = CityPoint::new(0.0, 0.0);
        let b = CityPoint::new(4.0, 3.0);
        assert!((a.dist(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn dist_is_symmetric_and_zero_for_same_point() {
        let a = CityPoint::new(2.5, -1.0);
        let b = CityPoint::new(-3.0, 7.25);
        assert_eq!(a.dist(&b), b.dist(&a));
        assert_eq!(a.dist(&a), 0.0);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert!(CityPoint::new(1.0, 2.0).is_valid());
        assert!(!CityPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!CityPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn display_formats_as_x_y() {
        assert_eq!(CityPoint::new(1.5, -2.25).to_string(), "1.5,-2.25");
    }
}

use super::{FloatT, ScalarMath};

impl<T: FloatT> ScalarMath for T {
    type T = T;
    fn clip(&self, min_thresh: T, max_thresh: T, min_new: T, max_new: T) -> T {
        if *self < min_thresh {
            min_new
        } else if *self > max_thresh {
            max_new
        } else {
            *self
        }
    }
}

#[test]
fn test_clip() {
    assert_eq!((0.5f64).clip(0.0, 1.0, 0.0, 1.0), 0.5);
    assert_eq!((-0.5f64).clip(0.0, 1.0, 0.0, 1.0), 0.0);
    assert_eq!((2.0f64).clip(0.0, 1.0, 0.0, 1.0), 1.0);
    assert_eq!((1e-20f64).clip(1e-12, f64::INFINITY, 1e-12, 0.0), 1e-12);
}

use super::{FloatT, VectorMath};
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop_from(&mut self, op: impl Fn(T) -> T, v: &[T]) -> &mut Self {
        zip(&mut *self, v).for_each(|(x, &v)| *x = op(v));
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.iter_mut().for_each(|x| *x *= c);
        self
    }

    fn negate(&mut self) -> &mut Self {
        self.iter_mut().for_each(|x| *x = -*x);
        self
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        pairwise_sum(0..self.len(), &|i| self[i] * y[i])
    }

    fn dot_shifted(z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        assert!(z.len() == s.len() && z.len() == dz.len() && z.len() == ds.len());
        pairwise_sum(0..z.len(), &|i| (z[i] + α * dz[i]) * (s[i] + α * ds[i]))
    }

    fn sum(&self) -> T {
        pairwise_sum(0..self.len(), &|i| self[i])
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for &v in self {
            if v.is_nan() {
                return v;
            }
            out = T::max(out, v.abs());
        }
        out
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        zip(self, b).fold(T::zero(), |acc, (&x, &y)| T::max(acc, (x - y).abs()))
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());
        zip(&mut *self, x).for_each(|(y, &x)| *y = a * x + b * *y);
        self
    }
}

// Pairwise summation of term(i) over a range of indices.  Short
// ranges are summed directly.
fn pairwise_sum<T: FloatT>(range: std::ops::Range<usize>, term: &impl Fn(usize) -> T) -> T {
    const LEAF: usize = 16;
    if range.len() <= LEAF {
        range.fold(T::zero(), |acc, i| acc + term(i))
    } else {
        let mid = range.start + range.len() / 2;
        pairwise_sum(range.start..mid, term) + pairwise_sum(mid..range.end, term)
    }
}

#[test]
fn test_dot_and_sum() {
    let x = vec![1., 2., 3., 4.];
    let y = vec![4., 5., 6., 7.];
    assert_eq!(x.dot(&y), 60.);
    assert_eq!(x.sumsq(), 30.);

    // lengths that exercise the leaf and split cases
    let z: Vec<f64> = (1..=901).map(|v| v as f64).collect();
    for n in [0, 1, 16, 17, 900, 901] {
        let expected = (n * (n + 1) / 2) as f64;
        assert_eq!(z[..n].sum(), expected);
    }
}

#[test]
fn test_norm_inf_nan() {
    let x = vec![1., f64::NAN, -3.];
    assert!(x.norm_inf().is_nan());
    let x = vec![1., -4., 3.];
    assert_eq!(x.norm_inf(), 4.);
    assert_eq!(x.norm_inf_diff(&[1., -1., 4.]), 3.);
    assert!(!vec![1., f64::INFINITY].is_finite());
}

#[test]
fn test_dot_shifted() {
    let z: Vec<f64> = (1..=40).map(|v| v as f64).collect();
    let s: Vec<f64> = (1..=40).map(|v| (v as f64 - 3.0) / 2.0).collect();
    let dz = vec![1.0; z.len()];
    let ds = vec![0.5; s.len()];
    let α = 0.5;

    let shifted = <[f64]>::dot_shifted(&z, &s, &dz, &ds, α);
    let expanded = z.dot(&s) + α * z.dot(&ds) + α * s.dot(&dz) + α * α * dz.dot(&ds);
    assert!((shifted - expanded).abs() <= 1e-9 * expanded.abs());
}

#[test]
fn test_axpby() {
    let mut y = vec![1., 2.];
    y.axpby(2., &[3., 4.], -1.).negate();
    assert_eq!(y, vec![-5., -6.]);
    y.scalarop_from(|v| v * v, &[2., 3.]).scale(0.5);
    assert_eq!(y, vec![2., 4.5]);
}

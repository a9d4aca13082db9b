#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;

// In-place updates of the data of a DenseQp between solves.  Every
// update checks dimensions first and leaves the problem untouched on
// error.  Bound updates rebuild the stacked bounds and the mask of
// finite rows, so a bound can be switched on or off by passing a
// finite or infinite value.

impl<T> DenseQp<T>
where
    T: FloatT,
{
    /// Overwrites the Hessian.  Only its upper triangle is used.
    pub fn update_H(&mut self, H: &Matrix<T>) -> Result<(), ProblemDataError> {
        check_size("H", self.H.size(), H.size())?;
        self.H.data.copy_from(&H.data);
        Ok(())
    }

    /// Overwrites the linear cost term.
    pub fn update_g(&mut self, g: &[T]) -> Result<(), ProblemDataError> {
        check_len("g", self.g.len(), g.len())?;
        self.g.copy_from(g);
        Ok(())
    }

    /// Overwrites the equality constraint matrix.
    pub fn update_A(&mut self, A: &Matrix<T>) -> Result<(), ProblemDataError> {
        check_size("A", self.A.size(), A.size())?;
        self.A.data.copy_from(&A.data);
        Ok(())
    }

    /// Overwrites the equality right hand side.
    pub fn update_b(&mut self, b: &[T]) -> Result<(), ProblemDataError> {
        check_len("b", self.b.len(), b.len())?;
        self.b.copy_from(b);
        Ok(())
    }

    /// Overwrites the general constraint matrix.
    pub fn update_C(&mut self, C: &Matrix<T>) -> Result<(), ProblemDataError> {
        check_size("C", self.C.size(), C.size())?;
        self.C.data.copy_from(&C.data);
        Ok(())
    }

    /// Overwrites the box bounds.
    pub fn update_bounds(&mut self, lb: &[T], ub: &[T]) -> Result<(), ProblemDataError> {
        check_len("lb", self.lb.len(), lb.len())?;
        check_len("ub", self.ub.len(), ub.len())?;
        self.lb.copy_from(lb);
        self.ub.copy_from(ub);
        self.update_stacked();
        Ok(())
    }

    /// Overwrites the bounds of the general constraints.
    pub fn update_general_bounds(&mut self, lg: &[T], ug: &[T]) -> Result<(), ProblemDataError> {
        check_len("lg", self.lg.len(), lg.len())?;
        check_len("ug", self.ug.len(), ug.len())?;
        self.lg.copy_from(lg);
        self.ug.copy_from(ug);
        self.update_stacked();
        Ok(())
    }

    /// Overwrites the lower bounds of the soft constraint slacks.
    pub fn update_soft_bounds(&mut self, ls: &[T], us: &[T]) -> Result<(), ProblemDataError> {
        check_len("ls", self.soft.ls.len(), ls.len())?;
        check_len("us", self.soft.us.len(), us.len())?;
        self.soft.ls.copy_from(ls);
        self.soft.us.copy_from(us);
        self.update_stacked();
        Ok(())
    }
}

fn check_size(
    field: &'static str,
    expected: (usize, usize),
    got: (usize, usize),
) -> Result<(), ProblemDataError> {
    check_len(field, expected.0, got.0)?;
    check_len(field, expected.1, got.1)
}

#[test]
fn test_update_bounds_mask() {
    let mut qp = DenseQp::new(Matrix::from(&[[1.0]]), vec![0.0])
        .unwrap()
        .with_bounds(vec![0], vec![-1.0], vec![1.0])
        .unwrap();
    assert_eq!(qp.num_active(), 2);

    // removing the lower bound
    qp.update_bounds(&[-1e30], &[2.0]).unwrap();
    assert_eq!(qp.mask, vec![false, true]);
    assert_eq!(qp.d, vec![0.0, -2.0]);
    assert_eq!(qp.num_active(), 1);

    // wrong length leaves the data alone
    assert!(qp.update_bounds(&[0.0, 0.0], &[1.0]).is_err());
    assert_eq!(qp.ub, vec![2.0]);

    assert!(qp.update_H(&Matrix::from(&[[1.0, 0.0]])).is_err());
    qp.update_H(&Matrix::from(&[[4.0]])).unwrap();
    assert_eq!(qp.H[(0, 0)], 4.0);
}

#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::solver::core::traits::ProblemData;
use crate::solver::get_infinity;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a dense QP
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DenseQpDims {
    /// number of primal variables
    pub nv: usize,
    /// number of equality constraints
    pub ne: usize,
    /// number of box bounds on primal variables
    pub nb: usize,
    /// number of general two-sided constraints
    pub ng: usize,
    /// number of soft constraints
    pub ns: usize,
}

impl DenseQpDims {
    /// Total number of primal unknowns, including the soft slacks
    pub fn nx(&self) -> usize {
        self.nv + 2 * self.ns
    }

    /// Number of one-sided inequality rows after stacking
    pub fn nc(&self) -> usize {
        2 * self.nb + 2 * self.ng + 2 * self.ns
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by problem construction and updates
pub enum ProblemDataError {
    #[error("Incompatible dimension for {field}: expected {expected}, got {got}")]
    IncompatibleDimension {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Index {index} in {field} out of range (must be below {limit})")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        limit: usize,
    },
    #[error("Index {index} appears more than once in {field}")]
    DuplicateIndex { field: &'static str, index: usize },
    #[error("Bad matrix format in {0}")]
    BadFormat(&'static str),
}

/// Soft constraint data for [`DenseQp::with_soft_constraints`]
///
/// Entry `j` softens constraint `idxs[j]`, which counts the box bounds
/// first and the general constraints after them.  The lower side of the
/// constraint is relaxed by a slack `sl[j] >= ls[j]` with cost
/// `Zl[j]/2*sl[j]^2 + zl[j]*sl[j]`, and the upper side by a slack
/// `su[j] >= us[j]` costed by `Zu` and `zu`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftConstraints<T> {
    pub idxs: Vec<usize>,
    pub Zl: Vec<T>,
    pub Zu: Vec<T>,
    pub zl: Vec<T>,
    pub zu: Vec<T>,
    pub ls: Vec<T>,
    pub us: Vec<T>,
}

impl<T> SoftConstraints<T>
where
    T: FloatT,
{
    /// Soft constraints on `idxs` with unit quadratic penalties, no
    /// linear penalties and nonnegative slacks.
    pub fn new(idxs: Vec<usize>) -> Self {
        let ns = idxs.len();
        Self {
            idxs,
            Zl: vec![T::one(); ns],
            Zu: vec![T::one(); ns],
            zl: vec![T::zero(); ns],
            zu: vec![T::zero(); ns],
            ls: vec![T::zero(); ns],
            us: vec![T::zero(); ns],
        }
    }

    fn check(&self, nbg: usize) -> Result<(), ProblemDataError> {
        let ns = self.idxs.len();
        check_len("Zl", ns, self.Zl.len())?;
        check_len("Zu", ns, self.Zu.len())?;
        check_len("zl", ns, self.zl.len())?;
        check_len("zu", ns, self.zu.len())?;
        check_len("ls", ns, self.ls.len())?;
        check_len("us", ns, self.us.len())?;
        check_indices("idxs", &self.idxs, nbg)?;
        let mut seen = vec![false; nbg];
        for &i in self.idxs.iter() {
            if seen[i] {
                return Err(ProblemDataError::DuplicateIndex {
                    field: "idxs",
                    index: i,
                });
            }
            seen[i] = true;
        }
        Ok(())
    }
}

// ---------------
// Data type for default problem format
// ---------------

/// Dense QP implementing the [`ProblemData`](crate::solver::core::traits::ProblemData) trait
///
/// Only the upper triangle of `H` is referenced.  Bounds of magnitude at
/// least [`get_infinity`](crate::solver::get_infinity) are treated as absent.
/// The data is read only during a solve, and fields are changed between
/// solves through the `update_*` methods so that the stacked inequality
/// representation stays consistent.

#[derive(Debug, Clone)]
pub struct DenseQp<T> {
    pub(crate) dims: DenseQpDims,

    // objective
    pub(crate) H: Matrix<T>,
    pub(crate) g: Vec<T>,
    // equalities
    pub(crate) A: Matrix<T>,
    pub(crate) b: Vec<T>,
    // box bounds
    pub(crate) idxb: Vec<usize>,
    pub(crate) lb: Vec<T>,
    pub(crate) ub: Vec<T>,
    // general constraints
    pub(crate) C: Matrix<T>,
    pub(crate) lg: Vec<T>,
    pub(crate) ug: Vec<T>,
    // soft constraints
    pub(crate) soft: SoftConstraints<T>,

    // stacked one-sided rows D*x - d >= 0 in the order
    // [lb, lg, ub, ug, ls, us], with x = [v; sl; su]
    pub(crate) d: Vec<T>,
    pub(crate) mask: Vec<bool>,
    pub(crate) n_active: usize,
}

impl<T> DenseQp<T>
where
    T: FloatT,
{
    /// An unconstrained QP with Hessian `H` and gradient `g`
    pub fn new(H: Matrix<T>, g: Vec<T>) -> Result<Self, ProblemDataError> {
        H.check_format()
            .map_err(|_| ProblemDataError::BadFormat("H"))?;
        let nv = g.len();
        check_len("H rows", nv, H.nrows())?;
        check_len("H columns", nv, H.ncols())?;

        let mut qp = Self {
            dims: DenseQpDims {
                nv,
                ..DenseQpDims::default()
            },
            H,
            g,
            A: Matrix::zeros((0, nv)),
            b: vec![],
            idxb: vec![],
            lb: vec![],
            ub: vec![],
            C: Matrix::zeros((0, nv)),
            lg: vec![],
            ug: vec![],
            soft: SoftConstraints::new(vec![]),
            d: vec![],
            mask: vec![],
            n_active: 0,
        };
        qp.update_stacked();
        Ok(qp)
    }

    /// Add equality constraints `A*v = b`
    pub fn with_equalities(mut self, A: Matrix<T>, b: Vec<T>) -> Result<Self, ProblemDataError> {
        A.check_format()
            .map_err(|_| ProblemDataError::BadFormat("A"))?;
        check_len("A columns", self.dims.nv, A.ncols())?;
        check_len("b", A.nrows(), b.len())?;
        self.dims.ne = b.len();
        self.A = A;
        self.b = b;
        Ok(self)
    }

    /// Add box bounds `lb[k] <= v[idxb[k]] <= ub[k]`
    pub fn with_bounds(
        mut self,
        idxb: Vec<usize>,
        lb: Vec<T>,
        ub: Vec<T>,
    ) -> Result<Self, ProblemDataError> {
        let nb = idxb.len();
        check_len("lb", nb, lb.len())?;
        check_len("ub", nb, ub.len())?;
        check_indices("idxb", &idxb, self.dims.nv)?;
        self.soft.check(nb + self.dims.ng)?;
        self.dims.nb = nb;
        self.idxb = idxb;
        self.lb = lb;
        self.ub = ub;
        self.update_stacked();
        Ok(self)
    }

    /// Add general constraints `lg <= C*v <= ug`
    pub fn with_general_constraints(
        mut self,
        C: Matrix<T>,
        lg: Vec<T>,
        ug: Vec<T>,
    ) -> Result<Self, ProblemDataError> {
        C.check_format()
            .map_err(|_| ProblemDataError::BadFormat("C"))?;
        check_len("C columns", self.dims.nv, C.ncols())?;
        let ng = C.nrows();
        check_len("lg", ng, lg.len())?;
        check_len("ug", ng, ug.len())?;
        self.soft.check(self.dims.nb + ng)?;
        self.dims.ng = ng;
        self.C = C;
        self.lg = lg;
        self.ug = ug;
        self.update_stacked();
        Ok(self)
    }

    /// Soften some of the box bounds and general constraints
    pub fn with_soft_constraints(
        mut self,
        soft: SoftConstraints<T>,
    ) -> Result<Self, ProblemDataError> {
        soft.check(self.dims.nb + self.dims.ng)?;
        self.dims.ns = soft.idxs.len();
        self.soft = soft;
        self.update_stacked();
        Ok(self)
    }

    /// Problem dimensions
    pub fn dims(&self) -> &DenseQpDims {
        &self.dims
    }

    /// Number of inequality rows with a finite bound
    pub fn num_active(&self) -> usize {
        self.n_active
    }

    // rebuild the stacked bounds and the mask of finite rows
    pub(crate) fn update_stacked(&mut self) {
        let DenseQpDims { nb, ng, ns, .. } = self.dims;
        let nc = self.dims.nc();
        self.d.resize(nc, T::zero());
        self.mask.resize(nc, false);

        let infbound: T = get_infinity().as_T();
        let parts: [(&[T], T); 6] = [
            (&self.lb[..], T::one()),
            (&self.lg[..], T::one()),
            (&self.ub[..], -T::one()),
            (&self.ug[..], -T::one()),
            (&self.soft.ls[..], T::one()),
            (&self.soft.us[..], T::one()),
        ];
        let offsets = [0, nb, nb + ng, 2 * nb + ng, 2 * nb + 2 * ng, 2 * nb + 2 * ng + ns];

        for ((src, sign), offset) in parts.iter().zip(offsets) {
            for (i, &v) in src.iter().enumerate() {
                let active = v.abs() < infbound;
                self.mask[offset + i] = active;
                self.d[offset + i] = if active { *sign * v } else { T::zero() };
            }
        }
        self.n_active = self.mask.iter().filter(|&&m| m).count();
    }

    // ---------------------------------
    // products with the stacked problem data.  The
    // primal unknowns are x = [v; sl; su]
    // ---------------------------------

    /// `y = D*x` for the stacked inequality rows, ignoring the mask
    pub(crate) fn ineq_mul(&self, y: &mut [T], x: &[T]) {
        let DenseQpDims { nv, nb, ng, ns, .. } = self.dims;
        let (lo, hi) = (0, nb + ng);
        let v = &x[..nv];

        for (k, &i) in self.idxb.iter().enumerate() {
            y[lo + k] = v[i];
            y[hi + k] = -v[i];
        }
        self.C.gemv(&mut y[lo + nb..lo + nb + ng], v, T::one(), T::zero());
        for i in 0..ng {
            y[hi + nb + i] = -y[lo + nb + i];
        }

        let soff = 2 * nb + 2 * ng;
        for (j, &c) in self.soft.idxs.iter().enumerate() {
            let (sl, su) = (x[nv + j], x[nv + ns + j]);
            y[lo + c] += sl;
            y[hi + c] += su;
            y[soff + j] = sl;
            y[soff + ns + j] = su;
        }
    }

    /// `y += a*D'*w` for the stacked inequality rows
    pub(crate) fn ineq_tmul_add(&self, y: &mut [T], w: &[T], a: T) {
        let DenseQpDims { nv, nb, ng, ns, .. } = self.dims;
        let hi = nb + ng;

        for (k, &i) in self.idxb.iter().enumerate() {
            y[i] += a * (w[k] - w[hi + k]);
        }
        let yv = &mut y[..nv];
        self.C.t().gemv(yv, &w[nb..nb + ng], a, T::one());
        self.C.t().gemv(yv, &w[hi + nb..hi + nb + ng], -a, T::one());

        let soff = 2 * nb + 2 * ng;
        for (j, &c) in self.soft.idxs.iter().enumerate() {
            y[nv + j] += a * (w[c] + w[soff + j]);
            y[nv + ns + j] += a * (w[hi + c] + w[soff + ns + j]);
        }
    }

    /// `M += D'*diag(w)*D`, with both triangles of `M` updated
    pub(crate) fn ineq_gram_add(&self, M: &mut Matrix<T>, w: &[T]) {
        let DenseQpDims { nv, nb, ng, ns, .. } = self.dims;
        let hi = nb + ng;

        for (k, &i) in self.idxb.iter().enumerate() {
            M[(i, i)] += w[k] + w[hi + k];
        }
        for r in 0..ng {
            let wr = w[nb + r] + w[hi + nb + r];
            if wr == T::zero() {
                continue;
            }
            for j in 0..nv {
                let cj = wr * self.C[(r, j)];
                if cj == T::zero() {
                    continue;
                }
                for i in 0..nv {
                    M[(i, j)] += cj * self.C[(r, i)];
                }
            }
        }

        // each slack couples to the primal variables through
        // the row of the constraint it softens
        let soff = 2 * nb + 2 * ng;
        for (j, &c) in self.soft.idxs.iter().enumerate() {
            let (jl, ju) = (nv + j, nv + ns + j);
            let (wl, wu) = (w[c], w[hi + c]);
            M[(jl, jl)] += wl + w[soff + j];
            M[(ju, ju)] += wu + w[soff + ns + j];

            if c < nb {
                let i = self.idxb[c];
                M[(i, jl)] += wl;
                M[(jl, i)] += wl;
                M[(i, ju)] -= wu;
                M[(ju, i)] -= wu;
            } else {
                let r = c - nb;
                for i in 0..nv {
                    let cri = self.C[(r, i)];
                    M[(i, jl)] += wl * cri;
                    M[(jl, i)] += wl * cri;
                    M[(i, ju)] -= wu * cri;
                    M[(ju, i)] -= wu * cri;
                }
            }
        }
    }

    /// Overwrite `M` with the full objective Hessian over `x`
    pub(crate) fn hess_assemble(&self, M: &mut Matrix<T>) {
        let DenseQpDims { nv, ns, .. } = self.dims;
        M.data.set(T::zero());
        for j in 0..nv {
            for i in 0..=j {
                M[(i, j)] = self.H[(i, j)];
                M[(j, i)] = self.H[(i, j)];
            }
        }
        for j in 0..ns {
            M[(nv + j, nv + j)] = self.soft.Zl[j];
            M[(nv + ns + j, nv + ns + j)] = self.soft.Zu[j];
        }
    }

    /// `y = a*Q*x + b*y` for the objective Hessian over `x`
    pub(crate) fn hess_mul(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let DenseQpDims { nv, ns, .. } = self.dims;
        self.H.sym().symv(&mut y[..nv], &x[..nv], a, b);
        for j in 0..ns {
            let (jl, ju) = (nv + j, nv + ns + j);
            y[jl] = a * self.soft.Zl[j] * x[jl] + b * y[jl];
            y[ju] = a * self.soft.Zu[j] * x[ju] + b * y[ju];
        }
    }

    /// `y = a*[A 0]*x + b*y`
    pub(crate) fn eq_mul(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.A.gemv(y, &x[..self.dims.nv], a, b);
    }

    /// `y += a*[A 0]'*π`
    pub(crate) fn eq_tmul_add(&self, y: &mut [T], π: &[T], a: T) {
        self.A.t().gemv(&mut y[..self.dims.nv], π, a, T::one());
    }

    /// Add the linear objective term over `x`, scaled by `a`
    pub(crate) fn linear_add(&self, y: &mut [T], a: T) {
        let DenseQpDims { nv, ns, .. } = self.dims;
        y[..nv].axpby(a, &self.g, T::one());
        y[nv..nv + ns].axpby(a, &self.soft.zl, T::one());
        y[nv + ns..].axpby(a, &self.soft.zu, T::one());
    }

    /// Objective value at `x`
    pub(crate) fn objective(&self, x: &[T]) -> T {
        let DenseQpDims { nv, ns, .. } = self.dims;
        let half: T = (0.5).as_T();
        let v = &x[..nv];
        let (sl, su) = (&x[nv..nv + ns], &x[nv + ns..]);

        // v'*H*v from the upper triangle
        let mut vHv = T::zero();
        for j in 0..nv {
            let mut s = T::zero();
            for i in 0..j {
                s += self.H[(i, j)] * v[i];
            }
            vHv += v[j] * (s + s + self.H[(j, j)] * v[j]);
        }

        let mut obj = half * vHv + self.g.dot(v);
        for j in 0..ns {
            obj += half * (self.soft.Zl[j] * sl[j] * sl[j] + self.soft.Zu[j] * su[j] * su[j]);
            obj += self.soft.zl[j] * sl[j] + self.soft.zu[j] * su[j];
        }
        obj
    }
}

impl<T> ProblemData<T> for DenseQp<T>
where
    T: FloatT,
{
    type V = DefaultVariables<T>;

    fn num_active_ineq(&self) -> usize {
        self.n_active
    }
}

// ---------------
// parametric perturbations for sensitivity analysis
// ---------------

/// A first order perturbation of the data of a [`DenseQp`]
///
/// Perturbations of an absent (infinite) bound are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseQpPerturbation<T> {
    pub dg: Vec<T>,
    pub db: Vec<T>,
    pub dlb: Vec<T>,
    pub dub: Vec<T>,
    pub dlg: Vec<T>,
    pub dug: Vec<T>,
}

impl<T> DenseQpPerturbation<T>
where
    T: FloatT,
{
    /// A zero perturbation
    pub fn new(dims: &DenseQpDims) -> Self {
        Self {
            dg: vec![T::zero(); dims.nv],
            db: vec![T::zero(); dims.ne],
            dlb: vec![T::zero(); dims.nb],
            dub: vec![T::zero(); dims.nb],
            dlg: vec![T::zero(); dims.ng],
            dug: vec![T::zero(); dims.ng],
        }
    }

    pub(crate) fn check_dims(&self, dims: &DenseQpDims) -> Result<(), ProblemDataError> {
        check_len("dg", dims.nv, self.dg.len())?;
        check_len("db", dims.ne, self.db.len())?;
        check_len("dlb", dims.nb, self.dlb.len())?;
        check_len("dub", dims.nb, self.dub.len())?;
        check_len("dlg", dims.ng, self.dlg.len())?;
        check_len("dug", dims.ng, self.dug.len())?;
        Ok(())
    }

    // stacked perturbation of d, zero on masked rows
    pub(crate) fn stacked_d(&self, dd: &mut [T], mask: &[bool]) {
        dd.set(T::zero());
        let mut k = 0;
        for (src, sign) in [
            (&self.dlb, T::one()),
            (&self.dlg, T::one()),
            (&self.dub, -T::one()),
            (&self.dug, -T::one()),
        ] {
            for &v in src.iter() {
                if mask[k] {
                    dd[k] = sign * v;
                }
                k += 1;
            }
        }
    }
}

// ---------------
// dimension checks
// ---------------

pub(crate) fn check_len(
    field: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ProblemDataError> {
    if expected == got {
        Ok(())
    } else {
        Err(ProblemDataError::IncompatibleDimension {
            field,
            expected,
            got,
        })
    }
}

fn check_indices(
    field: &'static str,
    idx: &[usize],
    limit: usize,
) -> Result<(), ProblemDataError> {
    match idx.iter().find(|&&i| i >= limit) {
        Some(&index) => Err(ProblemDataError::IndexOutOfRange {
            field,
            index,
            limit,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_qp() -> DenseQp<f64> {
        #[rustfmt::skip]
        let H = Matrix::from(&[
            [2., 1.],
            [0., 3.],
        ]);
        let C = Matrix::from(&[[1., -1.]]);
        DenseQp::new(H, vec![1., 2.])
            .unwrap()
            .with_bounds(vec![1], vec![-1.], vec![1e30])
            .unwrap()
            .with_general_constraints(C, vec![-5.], vec![5.])
            .unwrap()
            .with_soft_constraints(SoftConstraints::new(vec![1]))
            .unwrap()
    }

    #[test]
    fn test_dims_and_mask() {
        let qp = test_qp();
        let dims = qp.dims();
        assert_eq!(dims.nx(), 4);
        assert_eq!(dims.nc(), 6);

        // [lb, lg, ub, ug, ls, us]
        assert_eq!(qp.mask, vec![true, true, false, true, true, true]);
        assert_eq!(qp.d, vec![-1., -5., 0., -5., 0., 0.]);
        assert_eq!(qp.num_active(), 5);
    }

    #[test]
    fn test_bad_dims() {
        let H = Matrix::from(&[[1.]]);
        assert!(matches!(
            DenseQp::new(H.clone(), vec![1., 2.]),
            Err(ProblemDataError::IncompatibleDimension { field: "H rows", .. })
        ));

        let qp = DenseQp::new(H, vec![1.]).unwrap();
        assert_eq!(
            qp.clone().with_bounds(vec![1], vec![0.], vec![1.]).unwrap_err(),
            ProblemDataError::IndexOutOfRange {
                field: "idxb",
                index: 1,
                limit: 1
            }
        );
        assert!(qp
            .clone()
            .with_equalities(Matrix::from(&[[1.]]), vec![1., 2.])
            .is_err());
        assert!(qp
            .with_soft_constraints(SoftConstraints::new(vec![0]))
            .is_err());
    }

    #[test]
    fn test_duplicate_soft_index() {
        let qp = DenseQp::new(Matrix::from(&[[1.]]), vec![0.])
            .unwrap()
            .with_bounds(vec![0], vec![0.], vec![1.])
            .unwrap();
        assert_eq!(
            qp.with_soft_constraints(SoftConstraints::new(vec![0, 0]))
                .unwrap_err(),
            ProblemDataError::DuplicateIndex {
                field: "idxs",
                index: 0
            }
        );
    }

    #[test]
    fn test_ineq_products() {
        let qp = test_qp();
        let x = [1., 2., 3., 4.];

        // v = [1,2], sl = 3, su = 4, soft constraint on the general row
        let mut y = vec![0.; 6];
        qp.ineq_mul(&mut y, &x);
        assert_eq!(y, vec![2., -1. + 3., -2., 1. + 4., 3., 4.]);

        // D'*w should agree with the adjoint of D*x
        let w = [1., -2., 3., 0.5, 2., -1.];
        let mut z = vec![0.; 4];
        qp.ineq_tmul_add(&mut z, &w, 1.);
        assert!((z.dot(&x) - y.dot(&w)).abs() < 1e-12);

        // Gram matrix against explicit products
        let mut M = Matrix::<f64>::zeros((4, 4));
        qp.ineq_gram_add(&mut M, &[1.; 6]);
        for j in 0..4 {
            let mut ej = vec![0.; 4];
            ej[j] = 1.;
            let mut dj = vec![0.; 6];
            qp.ineq_mul(&mut dj, &ej);
            let mut col = vec![0.; 4];
            qp.ineq_tmul_add(&mut col, &dj, 1.);
            for i in 0..4 {
                assert!((M[(i, j)] - col[i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_objective() {
        let qp = test_qp();
        let x = [1., 2., 3., 4.];
        // 0.5*(2 + 2*2 + 12) + (1 + 4) + 0.5*(9 + 16)
        let mut M = Matrix::<f64>::zeros((4, 4));
        qp.hess_assemble(&mut M);
        let mut Qx = vec![0.; 4];
        M.gemv(&mut Qx, &x, 1., 0.);
        let mut Qx2 = vec![0.; 4];
        qp.hess_mul(&mut Qx2, &x, 1., 0.);
        assert!(Qx.norm_inf_diff(&Qx2) < 1e-12);
        assert!((qp.objective(&x) - (9. + 5. + 12.5)).abs() < 1e-12);
    }
}

use super::*;
use crate::algebra::*;
use crate::solver::core::traits::Residuals;

// ---------------
// Residuals type for default problem format
// ---------------

/// Standard-form solver type implementing the [`Residuals`](crate::solver::core::traits::Residuals) trait
///
/// For an iterate `(x, π, λ, t)` the KKT residuals are
///
/// ```text
/// rg = Q*x + q - A'*π - D'*λ
/// rb = A*x - b
/// rd = D*x - d - t
/// rm = t∘λ
/// ```
///
/// with the inequality rows `rd` and `rm` restricted to finite bounds.

#[derive(Debug)]
pub struct DefaultResiduals<T> {
    /// stationarity residual
    pub rg: Vec<T>,
    /// equality residual
    pub rb: Vec<T>,
    /// inequality residual
    pub rd: Vec<T>,
    /// complementarity residual
    pub rm: Vec<T>,

    /// infinity norms of the residuals
    pub res_stat: T,
    pub res_eq: T,
    pub res_ineq: T,
    pub res_comp: T,

    // finite rows of the problem last evaluated
    pub(crate) mask: Vec<bool>,

    // residuals of the linearized KKT conditions for a step,
    // used by iterative refinement
    pub(crate) lin_g: Vec<T>,
    pub(crate) lin_b: Vec<T>,
    pub(crate) lin_d: Vec<T>,
    pub(crate) lin_m: Vec<T>,

    work_c: Vec<T>,
}

impl<T> DefaultResiduals<T>
where
    T: FloatT,
{
    pub fn new(dims: &DenseQpDims) -> Self {
        let (nx, ne, nc) = (dims.nx(), dims.ne, dims.nc());
        Self {
            rg: vec![T::zero(); nx],
            rb: vec![T::zero(); ne],
            rd: vec![T::zero(); nc],
            rm: vec![T::zero(); nc],
            res_stat: T::zero(),
            res_eq: T::zero(),
            res_ineq: T::zero(),
            res_comp: T::zero(),
            mask: vec![false; nc],
            lin_g: vec![T::zero(); nx],
            lin_b: vec![T::zero(); ne],
            lin_d: vec![T::zero(); nc],
            lin_m: vec![T::zero(); nc],
            work_c: vec![T::zero(); nc],
        }
    }
}

impl<T> Residuals<T> for DefaultResiduals<T>
where
    T: FloatT,
{
    type D = DenseQp<T>;
    type V = DefaultVariables<T>;

    fn update(&mut self, variables: &DefaultVariables<T>, data: &DenseQp<T>) {
        let (x, π, λ, t) = (&variables.x, &variables.π, &variables.λ, &variables.t);
        self.mask.copy_from_slice(&data.mask);

        // stationarity
        data.hess_mul(&mut self.rg, x, T::one(), T::zero());
        data.linear_add(&mut self.rg, T::one());
        data.eq_tmul_add(&mut self.rg, π, -T::one());
        data.ineq_tmul_add(&mut self.rg, λ, -T::one());

        // equalities
        data.eq_mul(&mut self.rb, x, T::one(), T::zero());
        self.rb.axpby(-T::one(), &data.b, T::one());

        // inequalities and complementarity
        data.ineq_mul(&mut self.rd, x);
        for k in 0..self.rd.len() {
            if self.mask[k] {
                self.rd[k] -= data.d[k] + t[k];
                self.rm[k] = t[k] * λ[k];
            } else {
                self.rd[k] = T::zero();
                self.rm[k] = T::zero();
            }
        }

        self.res_stat = self.rg.norm_inf();
        self.res_eq = self.rb.norm_inf();
        self.res_ineq = self.rd.norm_inf();
        self.res_comp = self.rm.norm_inf();
    }

    fn update_linear(
        &mut self,
        step: &DefaultVariables<T>,
        rhs: &DefaultVariables<T>,
        variables: &DefaultVariables<T>,
        data: &DenseQp<T>,
    ) -> T {
        let (λ, t) = (&variables.λ, &variables.t);

        // rhs + J*step for the Jacobian J of the residual map.
        // The regularization of the factored system is absent here.
        self.lin_g.copy_from(&rhs.x);
        data.hess_mul(&mut self.lin_g, &step.x, T::one(), T::one());
        data.eq_tmul_add(&mut self.lin_g, &step.π, -T::one());
        data.ineq_tmul_add(&mut self.lin_g, &step.λ, -T::one());

        self.lin_b.copy_from(&rhs.π);
        data.eq_mul(&mut self.lin_b, &step.x, T::one(), T::one());

        data.ineq_mul(&mut self.work_c, &step.x);
        for k in 0..self.work_c.len() {
            if data.mask[k] {
                self.lin_d[k] = rhs.t[k] + self.work_c[k] - step.t[k];
                self.lin_m[k] = rhs.λ[k] + λ[k] * step.t[k] + t[k] * step.λ[k];
            } else {
                self.lin_d[k] = T::zero();
                self.lin_m[k] = T::zero();
            }
        }

        [&self.lin_g, &self.lin_b, &self.lin_d, &self.lin_m]
            .iter()
            .fold(T::zero(), |acc, v| T::max(acc, v.norm_inf()))
    }
}

#[test]
fn test_residuals_at_solution() {
    use crate::solver::core::traits::Variables;

    // min (v-1)^2 s.t. v <= 0.5, optimum v = 0.5 with multiplier 1
    let qp = DenseQp::new(Matrix::from(&[[2.0]]), vec![-2.0])
        .unwrap()
        .with_bounds(vec![0], vec![-1e30], vec![0.5])
        .unwrap();
    let dims = *qp.dims();

    let mut vars = DefaultVariables::<f64>::new(&dims);
    vars.x[0] = 0.5;
    vars.λ = vec![0.0, 1.0];
    vars.t = vec![1.0, 0.0];

    let mut res = DefaultResiduals::new(&dims);
    res.update(&vars, &qp);
    assert_eq!(res.rg, vec![0.0]);
    assert_eq!(res.rd, vec![0.0, 0.0]);
    assert_eq!(res.rm, vec![0.0, 0.0]);
    assert_eq!(vars.calc_mu(&res, &qp), 0.0);

    // at a KKT point the null step solves the linearization
    let mut rhs = DefaultVariables::<f64>::new(&dims);
    rhs.affine_step_rhs(&res, &vars);
    let mut step = DefaultVariables::<f64>::new(&dims);
    step.t.set(0.0);
    assert_eq!(res.update_linear(&step, &rhs, &vars, &qp), 0.0);
}

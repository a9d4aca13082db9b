use super::*;
use crate::algebra::*;
use crate::solver::core::{
    kktsolvers::*,
    traits::{KKTSystem, ProblemData, Settings},
};

// ---------------
// KKT System type for default problem format
// ---------------

/// Standard-form solver type implementing the [`KKTSystem`](crate::solver::core::traits::KKTSystem) trait
///
/// The inequality slacks and multipliers are eliminated from the Newton
/// system, leaving the reduced system
///
/// ```text
/// [ Q + D'WD + δp*I    A' ] [ dx ]   [ -(rg + D'*c) ]
/// [ A              -δd*I ] [ -dπ] = [ -rb          ]
/// ```
///
/// with `W = λ/t` and `c = (λ∘rd + rm)/t` on the finite rows.
pub struct DefaultKKTSystem<T: FloatT> {
    pub(crate) dims: DenseQpDims,
    engine: Option<KKTSolverEngine<T>>,
    strategy: KKTStrategy,
    factorization: Option<KKTFactorization>,

    // condensed Hessian and equality matrix padded to all of x
    M: Matrix<T>,
    A: Matrix<T>,

    // barrier weights and the iterate they were formed from
    w: Vec<T>,
    λ: Vec<T>,
    t: Vec<T>,
    mask: Vec<bool>,

    // work vectors for the reduced solve
    work_c: Vec<T>,
    x: Vec<T>,
    y: Vec<T>,
}

impl<T> DefaultKKTSystem<T>
where
    T: FloatT,
{
    pub fn new(dims: &DenseQpDims) -> Self {
        let (nx, ne, nc) = (dims.nx(), dims.ne, dims.nc());
        Self {
            dims: *dims,
            engine: None,
            strategy: KKTStrategy::Cholesky,
            factorization: None,
            M: Matrix::zeros((nx, nx)),
            A: Matrix::zeros((ne, nx)),
            w: vec![T::zero(); nc],
            λ: vec![T::zero(); nc],
            t: vec![T::one(); nc],
            mask: vec![false; nc],
            work_c: vec![T::zero(); nc],
            x: vec![T::zero(); nx],
            y: vec![T::zero(); ne],
        }
    }
}

// pick an engine for the problem and the requested method
fn select_strategy(method: &str, dims: &DenseQpDims, n_active: usize) -> KKTStrategy {
    let wide = dims.ne > dims.nx();
    if n_active == 0 {
        return KKTStrategy::Unconstrained;
    }
    match method {
        "cholesky" => KKTStrategy::Cholesky,
        "lq" => KKTStrategy::LQ,
        "lu" => KKTStrategy::LU,
        _ if wide => KKTStrategy::LQ,
        _ => KKTStrategy::Cholesky,
    }
}

impl<T> KKTSystem<T> for DefaultKKTSystem<T>
where
    T: FloatT,
{
    type D = DenseQp<T>;
    type V = DefaultVariables<T>;
    type SE = DefaultSettings<T>;

    fn setup(&mut self, data: &DenseQp<T>, settings: &DefaultSettings<T>) {
        let method = &settings.core().kkt_solve_method;
        self.strategy = select_strategy(method, &self.dims, data.num_active_ineq());
        self.factorization = None;

        let reuse = matches!(&self.engine, Some(e) if e.strategy() == self.strategy);
        if !reuse {
            self.engine = Some(KKTSolverEngine::new(
                self.strategy,
                self.dims.nx(),
                self.dims.ne,
            ));
        }

        // equality rows act on v only
        let nv = self.dims.nv;
        self.A.data_mut().set(T::zero());
        for j in 0..nv {
            for i in 0..self.dims.ne {
                self.A[(i, j)] = data.A[(i, j)];
            }
        }
    }

    fn is_unconstrained(&self) -> bool {
        self.strategy == KKTStrategy::Unconstrained
    }

    fn update(
        &mut self,
        data: &DenseQp<T>,
        variables: &DefaultVariables<T>,
        settings: &DefaultSettings<T>,
    ) -> Result<(), KKTSolverError> {
        let settings = settings.core();
        let engine = self.engine.as_mut().ok_or(KKTSolverError::NoFactorization)?;
        self.factorization = None;

        self.mask.copy_from_slice(&data.mask);
        self.λ.copy_from(&variables.λ);
        self.t.copy_from(&variables.t);
        for k in 0..self.w.len() {
            self.w[k] = if self.mask[k] {
                self.λ[k] / self.t[k]
            } else {
                T::zero()
            };
        }

        data.hess_assemble(&mut self.M);
        data.ineq_gram_add(&mut self.M, &self.w);
        self.M.shift_diagonal(settings.reg_prim);

        let factorization = engine.factor(&self.M, &self.A, settings.reg_dual)?;
        self.factorization = Some(factorization);
        Ok(())
    }

    fn solve(
        &mut self,
        lhs: &mut DefaultVariables<T>,
        rhs: &DefaultVariables<T>,
        data: &DenseQp<T>,
        _settings: &DefaultSettings<T>,
    ) -> Result<(), KKTSolverError> {
        if self.factorization.is_none() {
            return Err(KKTSolverError::NoFactorization);
        }
        let engine = self.engine.as_mut().ok_or(KKTSolverError::NoFactorization)?;

        // the rhs holds (rg, rb, rd, rm) in the (x, π, t, λ) slots
        let (rg, rb, rd, rm) = (&rhs.x, &rhs.π, &rhs.t, &rhs.λ);
        let (λ, t) = (&self.λ, &self.t);

        for k in 0..self.work_c.len() {
            self.work_c[k] = if self.mask[k] {
                (λ[k] * rd[k] + rm[k]) / t[k]
            } else {
                T::zero()
            };
        }

        self.x.copy_from(rg);
        data.ineq_tmul_add(&mut self.x, &self.work_c, T::one());
        self.x.negate();
        self.y.scalarop_from(|v| -v, rb);

        engine.solve(&mut self.x, &mut self.y);

        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(KKTSolverError::NonFinite);
        }

        // recover the eliminated directions
        lhs.x.copy_from(&self.x);
        lhs.π.scalarop_from(|v| -v, &self.y);
        data.ineq_mul(&mut lhs.t, &self.x);
        for k in 0..lhs.t.len() {
            if self.mask[k] {
                lhs.t[k] += rd[k];
                lhs.λ[k] = -(rm[k] + λ[k] * lhs.t[k]) / t[k];
            } else {
                lhs.t[k] = T::zero();
                lhs.λ[k] = T::zero();
            }
        }
        Ok(())
    }

    fn factorization(&self) -> Option<KKTFactorization> {
        self.factorization
    }
}

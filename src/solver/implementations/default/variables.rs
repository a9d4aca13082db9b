use super::*;
use crate::algebra::*;
use itertools::izip;
use crate::solver::core::{
    traits::{Settings, Variables},
    StepDirection,
};

// ---------------
// Variables type for default problem format
// ---------------

/// Standard-form solver type implementing the [`Variables`](crate::solver::core::traits::Variables) trait
///
/// Inequality rows that are masked out (infinite bounds) hold `λ = 0`
/// and `t = 1` at all times.
#[derive(Debug, Clone)]
pub struct DefaultVariables<T> {
    /// primal unknowns `[v; sl; su]`
    pub x: Vec<T>,
    /// equality multipliers
    pub π: Vec<T>,
    /// inequality multipliers, stacked
    pub λ: Vec<T>,
    /// inequality slacks, stacked
    pub t: Vec<T>,
}

impl<T> DefaultVariables<T>
where
    T: FloatT,
{
    /// Create a new `DefaultVariables` object
    pub fn new(dims: &DenseQpDims) -> Self {
        let x = vec![T::zero(); dims.nx()];
        let π = vec![T::zero(); dims.ne];
        let λ = vec![T::zero(); dims.nc()];
        let t = vec![T::one(); dims.nc()];

        Self { x, π, λ, t }
    }

    // masked rows are reset to λ = 0, t = 1
    fn apply_mask(&mut self, mask: &[bool]) {
        for (λ, t, &m) in izip!(&mut self.λ, &mut self.t, mask) {
            if !m {
                *λ = T::zero();
                *t = T::one();
            }
        }
    }
}

impl<T> Variables<T> for DefaultVariables<T>
where
    T: FloatT,
{
    type D = DenseQp<T>;
    type R = DefaultResiduals<T>;
    type SE = DefaultSettings<T>;

    fn calc_mu(&self, residuals: &DefaultResiduals<T>, data: &DenseQp<T>) -> T {
        match data.n_active {
            0 => T::zero(),
            n => residuals.rm.sum() / n.as_T(),
        }
    }

    fn calc_mu_affine(&self, step: &Self, α: T, data: &DenseQp<T>) -> T {
        // masked rows have λ = dλ = 0 and contribute nothing
        match data.n_active {
            0 => T::zero(),
            n => <[T]>::dot_shifted(&self.λ, &self.t, &step.λ, &step.t, α) / n.as_T(),
        }
    }

    fn affine_step_rhs(&mut self, residuals: &DefaultResiduals<T>, _variables: &Self) {
        self.x.copy_from(&residuals.rg);
        self.π.copy_from(&residuals.rb);
        self.t.copy_from(&residuals.rd);
        self.λ.copy_from(&residuals.rm);
    }

    fn combined_step_rhs(
        &mut self,
        residuals: &DefaultResiduals<T>,
        _variables: &Self,
        step: &Self,
        σ: T,
        μ: T,
        m: T,
    ) {
        self.x.copy_from(&residuals.rg);
        self.π.copy_from(&residuals.rb);
        self.t.copy_from(&residuals.rd);

        // second order correction dt∘dλ, shifted by the centering target
        let σμ = σ * μ;
        for (i, λi) in self.λ.iter_mut().enumerate() {
            *λi = if residuals.mask[i] {
                residuals.rm[i] + m * step.t[i] * step.λ[i] - σμ
            } else {
                T::zero()
            };
        }
    }

    fn refinement_rhs(&mut self, residuals: &DefaultResiduals<T>) {
        self.x.copy_from(&residuals.lin_g);
        self.π.copy_from(&residuals.lin_b);
        self.t.copy_from(&residuals.lin_d);
        self.λ.copy_from(&residuals.lin_m);
    }

    fn calc_step_length(
        &self,
        step: &Self,
        settings: &DefaultSettings<T>,
        steptype: StepDirection,
    ) -> (T, T) {
        let αp = step_to_boundary(&self.t, &step.t);
        let αd = step_to_boundary(&self.λ, &step.λ);

        match steptype {
            StepDirection::Affine => {
                let α = T::min(αp, αd);
                (α, α)
            }
            StepDirection::Combined => {
                let frac = settings.core().max_step_fraction;
                let (αp, αd) = (frac * αp, frac * αd);
                if settings.split_step {
                    (αp, αd)
                } else {
                    let α = T::min(αp, αd);
                    (α, α)
                }
            }
        }
    }

    fn add_step(&mut self, step: &Self, αp: T, αd: T) {
        self.x.axpby(αp, &step.x, T::one());
        self.t.axpby(αp, &step.t, T::one());
        self.π.axpby(αd, &step.π, T::one());
        self.λ.axpby(αd, &step.λ, T::one());
    }

    fn cold_start(&mut self, data: &DenseQp<T>, settings: &DefaultSettings<T>) {
        let thr = settings.init_margin;
        let DenseQpDims { nv, nb, ng, ns, .. } = data.dims;
        let hi = nb + ng;
        let soff = 2 * nb + 2 * ng;
        let mask = &data.mask;

        // primal variables at zero, pushed inside their box bounds
        self.x.set(T::zero());
        for (k, &i) in data.idxb.iter().enumerate() {
            let (haslb, hasub) = (mask[k], mask[hi + k]);
            let (lb, ub) = (data.lb[k], data.ub[k]);
            let vi = &mut self.x[i];
            if haslb && hasub && ub - lb < thr + thr {
                *vi = (lb + ub) * (0.5).as_T();
            } else {
                if haslb {
                    *vi = T::max(*vi, lb + thr);
                }
                if hasub {
                    *vi = T::min(*vi, ub - thr);
                }
            }
        }

        // soft slacks just above their own bounds
        for j in 0..ns {
            self.x[nv + j] = if mask[soff + j] {
                data.soft.ls[j] + thr
            } else {
                T::zero()
            };
            self.x[nv + ns + j] = if mask[soff + ns + j] {
                data.soft.us[j] + thr
            } else {
                T::zero()
            };
        }

        // slacks from the constraint values, kept away from zero
        data.ineq_mul(&mut self.t, &self.x);
        for (k, tk) in self.t.iter_mut().enumerate() {
            *tk = if mask[k] {
                T::max(*tk - data.d[k], thr)
            } else {
                T::one()
            };
        }

        // uniform multipliers giving complementarity mu0
        let mut tsum = T::zero();
        for (k, &tk) in self.t.iter().enumerate() {
            if mask[k] {
                tsum += tk;
            }
        }
        let c = match data.n_active {
            0 => T::zero(),
            n => settings.mu0 * n.as_T() / tsum,
        };
        for (k, λk) in self.λ.iter_mut().enumerate() {
            *λk = if mask[k] { c } else { T::zero() };
        }

        self.π.set(T::zero());
    }

    fn warm_start(&mut self, data: &DenseQp<T>, settings: &DefaultSettings<T>) {
        let floor = settings.warm_start_min_value;
        self.apply_mask(&data.mask);
        for (k, &m) in data.mask.iter().enumerate() {
            if m {
                self.t[k] = T::max(self.t[k], floor);
                self.λ[k] = T::max(self.λ[k], floor);
            }
        }
    }

    fn copy_from(&mut self, src: &Self) {
        self.x.copy_from(&src.x);
        self.π.copy_from(&src.π);
        self.λ.copy_from(&src.λ);
        self.t.copy_from(&src.t);
    }

    fn norm_inf(&self) -> T {
        [&self.x, &self.π, &self.λ, &self.t]
            .iter()
            .fold(T::zero(), |acc, v| T::max(acc, v.norm_inf()))
    }
}

// Largest α in [0,1] with v + α*dv >= 0, assuming v > 0
fn step_to_boundary<T: FloatT>(v: &[T], dv: &[T]) -> T {
    v.iter().zip(dv).fold(T::one(), |α, (&vi, &dvi)| {
        if dvi < T::zero() {
            T::min(α, -vi / dvi)
        } else {
            α
        }
    })
}

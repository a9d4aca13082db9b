use super::*;
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::core::{
    kktsolvers::KKTFactorization,
    traits::{Info, Variables},
    SolverStatus, StepScalars,
};
use crate::timers::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Progress of the solver at a single iteration
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IterationRecord<T> {
    pub iteration: u32,
    /// predictor step length
    pub alpha_aff: T,
    /// complementarity after the predictor step
    pub mu_aff: T,
    /// centering parameter
    pub sigma: T,
    /// primal step length taken
    pub alpha_prim: T,
    /// dual step length taken
    pub alpha_dual: T,
    /// average complementarity
    pub mu: T,
    pub res_stat: T,
    pub res_eq: T,
    pub res_ineq: T,
    pub res_comp: T,
    pub objective: T,
    /// factorization used for the step into this iterate
    pub factorization: Option<KKTFactorization>,
    /// iterative refinement steps used for that step
    pub refine_steps: u32,
}

/// Standard-form solver type implementing the [`Info`](crate::solver::core::traits::Info) and [`InfoPrint`](crate::solver::core::traits::InfoPrint) traits

#[derive(Debug)]
pub struct DefaultInfo<T> {
    pub status: SolverStatus,
    pub iterations: u32,

    pub μ: T,
    pub σ: T,
    pub α_aff: T,
    pub μ_aff: T,
    pub α_prim: T,
    pub α_dual: T,

    pub res_stat: T,
    pub res_eq: T,
    pub res_ineq: T,
    pub res_comp: T,
    pub objective: T,

    /// factorization of the most recent KKT update
    pub factorization: Option<KKTFactorization>,
    pub refine_steps: u32,

    pub solve_time: f64,

    pub(crate) statistics: Vec<IterationRecord<T>>,
    stalled_count: u32,
    pub(crate) stream: PrintTarget,
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            status: SolverStatus::NotStarted,
            iterations: 0,
            μ: T::zero(),
            σ: T::zero(),
            α_aff: T::zero(),
            μ_aff: T::zero(),
            α_prim: T::zero(),
            α_dual: T::zero(),
            res_stat: T::zero(),
            res_eq: T::zero(),
            res_ineq: T::zero(),
            res_comp: T::zero(),
            objective: T::zero(),
            factorization: None,
            refine_steps: 0,
            solve_time: 0f64,
            statistics: Vec::new(),
            stalled_count: 0,
            stream: PrintTarget::default(),
        }
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn res_stat(&self) -> T {
        self.res_stat
    }

    pub fn res_eq(&self) -> T {
        self.res_eq
    }

    pub fn res_ineq(&self) -> T {
        self.res_ineq
    }

    pub fn res_comp(&self) -> T {
        self.res_comp
    }

    /// One record per evaluated iterate, starting from the initial point.
    pub fn statistics(&self) -> &[IterationRecord<T>] {
        &self.statistics
    }

    fn is_finite(&self) -> bool {
        [
            self.res_stat,
            self.res_eq,
            self.res_ineq,
            self.res_comp,
            self.μ,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    fn is_converged(&self, settings: &DefaultSettings<T>) -> bool {
        self.res_stat <= settings.tol_stat
            && self.res_eq <= settings.tol_eq
            && self.res_ineq <= settings.tol_ineq
            && self.res_comp <= settings.tol_comp
    }
}

impl<T> Default for DefaultInfo<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Info<T> for DefaultInfo<T>
where
    T: FloatT,
{
    type V = DefaultVariables<T>;
    type R = DefaultResiduals<T>;

    fn reset(&mut self, timers: &mut Timers) {
        self.status = SolverStatus::Iterating;
        self.iterations = 0;
        self.solve_time = 0f64;
        self.factorization = None;
        self.refine_steps = 0;
        self.stalled_count = 0;
        self.statistics.clear();

        timers.reset();
    }

    fn finalize(&mut self, timers: &Timers) {
        self.solve_time = timers.elapsed("solve").as_secs_f64();
    }

    fn update(
        &mut self,
        data: &DenseQp<T>,
        variables: &DefaultVariables<T>,
        residuals: &DefaultResiduals<T>,
        μ: T,
    ) {
        self.μ = μ;
        self.res_stat = residuals.res_stat;
        self.res_eq = residuals.res_eq;
        self.res_ineq = residuals.res_ineq;
        self.res_comp = residuals.res_comp;
        self.objective = data.objective(&variables.x);
    }

    fn check_termination(&mut self, settings: &DefaultSettings<T>, iter: u32, max_iter: u32) -> bool {
        // consecutive short steps
        if iter > 0 {
            if T::min(self.α_prim, self.α_dual) < settings.alpha_min {
                self.stalled_count += 1;
            } else {
                self.stalled_count = 0;
            }
        }

        self.status = if !self.is_finite() {
            SolverStatus::NumericalFailure
        } else if self.is_converged(settings) {
            SolverStatus::Converged
        } else if self.stalled_count >= settings.max_stalled_iter {
            SolverStatus::Stalled
        } else if iter >= max_iter {
            SolverStatus::MaxIterations
        } else {
            SolverStatus::Iterating
        };

        self.status != SolverStatus::Iterating
    }

    fn save_prev_iterate(&mut self, variables: &Self::V, prev_variables: &mut Self::V) {
        prev_variables.copy_from(variables);
    }

    fn reset_to_prev_iterate(&mut self, variables: &mut Self::V, prev_variables: &Self::V) {
        variables.copy_from(prev_variables);
    }

    fn save_scalars(&mut self, scalars: &StepScalars<T>, iter: u32) {
        self.iterations = iter;
        self.α_aff = scalars.α_aff;
        self.μ_aff = scalars.μ_aff;
        self.σ = scalars.σ;
        self.α_prim = scalars.α_prim;
        self.α_dual = scalars.α_dual;

        self.statistics.push(IterationRecord {
            iteration: iter,
            alpha_aff: self.α_aff,
            mu_aff: self.μ_aff,
            sigma: self.σ,
            alpha_prim: self.α_prim,
            alpha_dual: self.α_dual,
            mu: self.μ,
            res_stat: self.res_stat,
            res_eq: self.res_eq,
            res_ineq: self.res_ineq,
            res_comp: self.res_comp,
            objective: self.objective,
            factorization: self.factorization,
            refine_steps: self.refine_steps,
        });
    }

    fn save_kkt_stats(&mut self, factorization: Option<KKTFactorization>, refine_steps: u32) {
        self.factorization = factorization;
        self.refine_steps = refine_steps;
    }

    fn get_status(&self) -> SolverStatus {
        self.status
    }

    fn set_status(&mut self, status: SolverStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DefaultSettings<f64> {
        DefaultSettings {
            tol_stat: 1e-6,
            tol_eq: 1e-6,
            tol_ineq: 1e-6,
            tol_comp: 1e-6,
            max_stalled_iter: 2,
            ..DefaultSettings::default()
        }
    }

    fn with_residuals(r: f64) -> DefaultInfo<f64> {
        let mut info = DefaultInfo::new();
        info.res_stat = r;
        info.res_eq = r;
        info.res_ineq = r;
        info.res_comp = r;
        info
    }

    #[test]
    fn test_termination_order() {
        let settings = settings();

        let mut info = with_residuals(1e-7);
        assert!(info.check_termination(&settings, 3, 3));
        assert_eq!(info.status, SolverStatus::Converged);

        // every residual must be within tolerance
        let mut info = with_residuals(1e-7);
        info.res_comp = 1e-5;
        let long = StepScalars {
            α_prim: 0.9,
            α_dual: 0.9,
            ..StepScalars::default()
        };
        info.save_scalars(&long, 1);
        assert!(!info.check_termination(&settings, 1, 10));
        assert_eq!(info.status, SolverStatus::Iterating);
        info.save_scalars(&long, 10);
        assert!(info.check_termination(&settings, 10, 10));
        assert_eq!(info.status, SolverStatus::MaxIterations);

        let mut info = with_residuals(1e-7);
        info.res_eq = f64::NAN;
        assert!(info.check_termination(&settings, 1, 10));
        assert_eq!(info.status, SolverStatus::NumericalFailure);
    }

    #[test]
    fn test_stall_counting() {
        let settings = settings();
        let mut info = with_residuals(1.0);
        let short = StepScalars {
            α_prim: 1e-14,
            α_dual: 0.5,
            ..StepScalars::default()
        };
        let long = StepScalars {
            α_prim: 0.5,
            α_dual: 0.5,
            ..StepScalars::default()
        };

        info.save_scalars(&short, 1);
        assert!(!info.check_termination(&settings, 1, 10));
        info.save_scalars(&long, 2);
        assert!(!info.check_termination(&settings, 2, 10));
        info.save_scalars(&short, 3);
        assert!(!info.check_termination(&settings, 3, 10));
        info.save_scalars(&short, 4);
        assert!(info.check_termination(&settings, 4, 10));
        assert_eq!(info.status, SolverStatus::Stalled);

        assert_eq!(info.statistics().len(), 4);
        assert_eq!(info.statistics()[1].alpha_prim, 0.5);
    }
}

use self::internal::*;
use super::kktsolvers::KKTSolverError;
use super::traits::*;
use crate::algebra::*;
use crate::timers::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    NotStarted,
    /// Solver is running.  Never returned from a completed solve.
    Iterating,
    /// Solver terminated with all residuals within tolerance.
    Converged,
    /// Iteration limit reached before convergence.
    MaxIterations,
    /// Solver terminated due to repeated negligible step lengths,
    /// or an unconstrained problem that a Newton step failed to solve.
    Stalled,
    /// Solver terminated with a factorization failure or a non-finite iterate.
    NumericalFailure,
}

impl SolverStatus {
    pub fn is_converged(&self) -> bool {
        *self == SolverStatus::Converged
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Default for SolverStatus {
    fn default() -> Self {
        SolverStatus::NotStarted
    }
}

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum StepDirection {
    Affine,
    Combined,
}

/// Scalars chosen by the solver when computing a step
#[derive(Default, Debug, Clone, Copy)]
pub struct StepScalars<T> {
    /// predictor step length
    pub α_aff: T,
    /// complementarity after the predictor step
    pub μ_aff: T,
    /// centering parameter
    pub σ: T,
    /// primal step length
    pub α_prim: T,
    /// dual step length
    pub α_dual: T,
}

/// Per-call overrides for the main solver loop
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// start from the caller's solution instead of a cold start
    pub warm_start: bool,
    /// iteration cap
    pub max_iter: u32,
    /// evaluate residuals of the final iterate when the cap is hit
    pub compute_residuals_exit: bool,
}

// ---------------------------------
// top level solver container type
// ---------------------------------

// The top-level solver.

// This trait is defined with a collection of mutually interacting associated types.
// See the [`DefaultSolver`](crate::solver::implementations::default) for an example.
// The problem data and the solution are owned by the caller and
// are passed in to each solve.

pub struct Solver<V, R, K, I, SE> {
    pub variables: V,
    pub residuals: R,
    pub kktsystem: K,
    pub step_lhs: V,
    pub step_rhs: V,
    pub refine_lhs: V,
    pub refine_rhs: V,
    pub prev_vars: V,
    pub info: I,
    pub settings: SE,
    pub timers: Option<Timers>,
}

// ---------------------------------
// IPSolver trait and its standard implementation.
// ---------------------------------

/// An interior point solver implementing a predictor-corrector scheme

// Only the main solver function lives in IPSolver, since this is the
// only publicly facing trait we want to give the solver.   Additional
// internal functionality for the top level solver object is implemented
// for the IPSolverInternals trait below, upon which IPSolver depends

pub trait IPSolver<T, D, V, R, K, I, SO, SE> {
    /// Run the solver on `data`, writing into `solution`
    fn run(&mut self, data: &D, solution: &mut SO, options: SolveOptions) -> SolverStatus;
}

impl<T, D, V, R, K, I, SO, SE> IPSolver<T, D, V, R, K, I, SO, SE> for Solver<V, R, K, I, SE>
where
    T: FloatT,
    D: ProblemData<T, V = V>,
    V: Variables<T, D = D, R = R, SE = SE>,
    R: Residuals<T, D = D, V = V>,
    K: KKTSystem<T, D = D, V = V, SE = SE>,
    I: Info<T, D = D, V = V, R = R, SE = SE>,
    SO: Solution<T, D = D, V = V, I = I>,
    SE: Settings<T>,
{
    fn run(&mut self, data: &D, solution: &mut SO, options: SolveOptions) -> SolverStatus {
        // various initializations
        let mut iter: u32 = 0;
        let mut scalars = StepScalars::<T>::default();
        let mut μ;

        //timers is stored as an option so that
        //we can swap it out here and avoid
        //borrow conflicts with other fields.
        let mut timers = self.timers.take().unwrap_or_default();

        self.info.reset(&mut timers);

        // print failures never interrupt a solve
        self.info.print_configuration(&self.settings, data).ok();
        self.info.print_status_header(&self.settings).ok();

        timeit! {timers => "solve"; {

        // initialize variables to some reasonable starting point
        if options.warm_start {
            solution.load_into(&mut self.variables);
            self.variables.warm_start(data, &self.settings);
        } else {
            self.variables.cold_start(data, &self.settings);
        }
        self.kktsystem.setup(data, &self.settings);

        // ----------
        // main loop
        // ----------

        loop {

            // stop at the cap without a final residual
            // evaluation if requested
            if iter > 0 && iter >= options.max_iter && !options.compute_residuals_exit {
                self.info.save_scalars(&scalars, iter);
                self.info.set_status(SolverStatus::MaxIterations);
                break;
            }

            //update the residuals
            //--------------
            self.residuals.update(&self.variables, data);

            //average complementarity
            //--------------
            μ = self.variables.calc_mu(&self.residuals, data);

            // convergence check and printing
            // --------------
            self.info.update(data, &self.variables, &self.residuals, μ);

            // record scalar values from most recent iteration.
            // This captures μ at iteration zero.
            self.info.save_scalars(&scalars, iter);
            self.info.print_status(&self.settings).ok();

            let isdone = self.info.check_termination(&self.settings, iter, options.max_iter);

            if isdone {
                if self.info.get_status() == SolverStatus::NumericalFailure && iter > 0 {
                    self.recover_prev_iterate(data);
                }
                break;
            }

            // a single Newton step solves an unconstrained problem
            if iter > 0 && self.kktsystem.is_unconstrained() {
                self.info.set_status(SolverStatus::Stalled);
                break;
            }

            //increment counter here because we only count
            //iterations that produce a KKT update
            iter += 1;

            // Update the KKT system and the constant parts of its solution.
            // --------------
            let mut kkt_result: Result<(), KKTSolverError>;
            timeit!{timers => "kkt update"; {
                kkt_result = self.kktsystem.update(data, &self.variables, &self.settings);
            }}

            // compute the step
            // --------------
            let mut refine_steps = 0;
            if kkt_result.is_ok() {
                timeit!{timers => "kkt solve"; {
                    kkt_result = self.compute_step(data, &mut scalars, μ, &mut refine_steps);
                }}
            }

            if kkt_result.is_err() {
                self.info.set_status(SolverStatus::NumericalFailure);
                self.info.save_kkt_stats(self.kktsystem.factorization(), refine_steps);
                break;
            }

            // Copy previous iterate in case the next one is a dud
            self.info.save_prev_iterate(&self.variables, &mut self.prev_vars);

            self.variables.add_step(&self.step_lhs, scalars.α_prim, scalars.α_dual);
            self.info.save_kkt_stats(self.kktsystem.factorization(), refine_steps);

        } //end loop
        // ----------
        // ----------

        }} // end "solve" timer

        //store final solution, timing etc
        self.info.finalize(&timers);

        solution.finalize(data, &self.variables, &self.info);

        self.info.print_footer(&self.settings).ok();

        //stow the timers back into Option in the solver struct
        self.timers.replace(timers);

        self.info.get_status()
    }
}

// Encapsulate the internal helpers trait in a private module
// so it doesn't get exported
mod internal {
    use super::super::traits::*;
    use super::*;

    pub(super) trait IPSolverInternals<T, D> {
        /// Compute a search direction into `step_lhs` and its step lengths
        fn compute_step(
            &mut self,
            data: &D,
            scalars: &mut StepScalars<T>,
            μ: T,
            refine_steps: &mut u32,
        ) -> Result<(), KKTSolverError>;

        /// Solve the KKT system for `step_rhs` with iterative refinement
        fn solve_and_refine(&mut self, data: &D) -> Result<u32, KKTSolverError>;

        /// Compute a centering parameter
        fn centering_parameter(&self, μ: T, μ_aff: T) -> T;

        /// Restore the iterate saved before the last step
        fn recover_prev_iterate(&mut self, data: &D);
    }

    impl<T, D, V, R, K, I, SE> IPSolverInternals<T, D> for Solver<V, R, K, I, SE>
    where
        T: FloatT,
        D: ProblemData<T, V = V>,
        V: Variables<T, D = D, R = R, SE = SE>,
        R: Residuals<T, D = D, V = V>,
        K: KKTSystem<T, D = D, V = V, SE = SE>,
        I: Info<T, D = D, V = V, R = R, SE = SE>,
        SE: Settings<T>,
    {
        fn compute_step(
            &mut self,
            data: &D,
            scalars: &mut StepScalars<T>,
            μ: T,
            refine_steps: &mut u32,
        ) -> Result<(), KKTSolverError> {
            let (pred_corr, cond_pred_corr, cond_step, centering_fixed) = {
                let s = self.settings.core();
                (
                    s.pred_corr,
                    s.cond_pred_corr,
                    s.cond_pred_corr_step,
                    s.centering_fixed,
                )
            };
            *scalars = StepScalars::default();

            // no inequalities, so a full Newton step
            if self.kktsystem.is_unconstrained() {
                self.step_rhs
                    .affine_step_rhs(&self.residuals, &self.variables);
                *refine_steps += self.solve_and_refine(data)?;
                scalars.α_aff = T::one();
                scalars.α_prim = T::one();
                scalars.α_dual = T::one();
                return Ok(());
            }

            if pred_corr {
                // predictor
                self.step_rhs
                    .affine_step_rhs(&self.residuals, &self.variables);
                *refine_steps += self.solve_and_refine(data)?;

                let (α_aff, _) = self.variables.calc_step_length(
                    &self.step_lhs,
                    &self.settings,
                    StepDirection::Affine,
                );
                scalars.α_aff = α_aff;
                scalars.μ_aff = self.variables.calc_mu_affine(&self.step_lhs, α_aff, data);

                // a long enough predictor step is taken as is
                if !(cond_pred_corr && α_aff >= cond_step) {
                    scalars.σ = self.centering_parameter(μ, scalars.μ_aff);

                    // corrector, reusing the factorization
                    self.step_rhs.combined_step_rhs(
                        &self.residuals,
                        &self.variables,
                        &self.step_lhs,
                        scalars.σ,
                        μ,
                        T::one(),
                    );
                    *refine_steps += self.solve_and_refine(data)?;
                }
            } else {
                // centered Newton step without a predictor
                scalars.σ = centering_fixed;
                self.step_rhs.combined_step_rhs(
                    &self.residuals,
                    &self.variables,
                    &self.step_lhs,
                    scalars.σ,
                    μ,
                    T::zero(),
                );
                *refine_steps += self.solve_and_refine(data)?;
            }

            // compute final step lengths
            // --------------
            let (αp, αd) = self.variables.calc_step_length(
                &self.step_lhs,
                &self.settings,
                StepDirection::Combined,
            );
            scalars.α_prim = αp;
            scalars.α_dual = αd;

            Ok(())
        }

        fn solve_and_refine(&mut self, data: &D) -> Result<u32, KKTSolverError> {
            self.kktsystem
                .solve(&mut self.step_lhs, &self.step_rhs, data, &self.settings)?;

            let (enabled, max_iter, reltol, abstol, stop_ratio) = {
                let s = self.settings.core();
                (
                    s.iterative_refinement_enable,
                    s.iterative_refinement_max_iter,
                    s.iterative_refinement_reltol,
                    s.iterative_refinement_abstol,
                    s.iterative_refinement_stop_ratio,
                )
            };
            if !enabled {
                return Ok(0);
            }

            let tol = abstol + reltol * self.step_rhs.norm_inf();
            let mut err = self.residuals.update_linear(
                &self.step_lhs,
                &self.step_rhs,
                &self.variables,
                data,
            );

            let mut count = 0;
            while count < max_iter && err > tol {
                self.refine_rhs.refinement_rhs(&self.residuals);
                self.kktsystem
                    .solve(&mut self.refine_lhs, &self.refine_rhs, data, &self.settings)?;
                self.step_lhs.add_step(&self.refine_lhs, T::one(), T::one());
                count += 1;

                let lasterr = err;
                err = self.residuals.update_linear(
                    &self.step_lhs,
                    &self.step_rhs,
                    &self.variables,
                    data,
                );

                // undo a correction that made things worse
                if !(err < lasterr) {
                    self.step_lhs.add_step(&self.refine_lhs, -T::one(), -T::one());
                    break;
                }
                if lasterr < stop_ratio * err {
                    break;
                }
            }
            Ok(count)
        }

        fn centering_parameter(&self, μ: T, μ_aff: T) -> T {
            if !(μ > T::zero()) {
                return T::zero();
            }
            let exponent = self.settings.core().centering_exponent;
            let σ = T::powf(μ_aff / μ, exponent);
            if σ.is_finite() {
                σ.clip(T::zero(), T::one(), T::zero(), T::one())
            } else {
                T::one()
            }
        }

        fn recover_prev_iterate(&mut self, data: &D) {
            self.info
                .reset_to_prev_iterate(&mut self.variables, &self.prev_vars);
            self.residuals.update(&self.variables, data);
            let μ = self.variables.calc_mu(&self.residuals, data);
            self.info.update(data, &self.variables, &self.residuals, μ);
            self.info.set_status(SolverStatus::NumericalFailure);
        }
    } // end trait impl
} //end internals module

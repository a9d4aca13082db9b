//! Required traits for types providing an interior point solver implementation.
//!
//! This module defines the core traits that must be implemented by a collection
//! of mutually associated data types to make a solver for a particular problem
//! format.
//!
//! In nearly all cases there is no need for a user to implement these traits.
//! Instead, users should use the collection of types that are provided
//! in the [Default solver implementation](crate::solver::implementations::default),
//! which collectively implement support for the dense QP format described in the
//! top level crate documentation.

use super::kktsolvers::{KKTFactorization, KKTSolverError};
use super::{CoreSettings, StepDirection, StepScalars};
use super::{SettingsError, SolverStatus};
use crate::algebra::*;
use crate::timers::*;

/// Data for a quadratic program.
pub trait ProblemData<T: FloatT> {
    type V: Variables<T>;

    /// Number of inequality constraints with a finite bound.
    fn num_active_ineq(&self) -> usize;
}

/// Variables for a quadratic program.
///
/// The same type doubles as storage for search directions and for
/// the right hand side of the Newton system.
pub trait Variables<T: FloatT> {
    type D: ProblemData<T>;
    type R: Residuals<T>;
    type SE: Settings<T>;

    /// Compute the average complementarity over active constraints.
    fn calc_mu(&self, residuals: &Self::R, data: &Self::D) -> T;

    /// Compute the average complementarity at a trial point
    /// `self + α*step`, without forming the point itself.
    fn calc_mu_affine(&self, step: &Self, α: T, data: &Self::D) -> T;

    /// Compute the KKT RHS for a pure Newton step.
    fn affine_step_rhs(&mut self, residuals: &Self::R, variables: &Self);

    /// Compute the KKT RHS for an interior point centering step.  The
    /// second order correction from `step` is scaled by `m`.
    #[allow(clippy::too_many_arguments)]
    fn combined_step_rhs(
        &mut self,
        residuals: &Self::R,
        variables: &Self,
        step: &Self,
        σ: T,
        μ: T,
        m: T,
    );

    /// Load the most recent linearized residuals as a KKT RHS,
    /// for use in iterative refinement of a step.
    fn refinement_rhs(&mut self, residuals: &Self::R);

    /// Compute the maximum (primal, dual) step lengths possible in the
    /// given step direction without leaving the nonnegative orthant.
    fn calc_step_length(
        &self,
        step_lhs: &Self,
        settings: &Self::SE,
        step_direction: StepDirection,
    ) -> (T, T);

    /// Update the variables in the given step direction, with the
    /// primal part scaled by `αp` and the dual part scaled by `αd`.
    fn add_step(&mut self, step_lhs: &Self, αp: T, αd: T);

    /// Initialize the variables from scratch.
    fn cold_start(&mut self, data: &Self::D, settings: &Self::SE);

    /// Repair externally loaded variables so that they are usable
    /// as a strictly interior starting point.
    fn warm_start(&mut self, data: &Self::D, settings: &Self::SE);

    /// Overwrite values with those from another object
    fn copy_from(&mut self, src: &Self);

    /// Largest absolute entry over all components
    fn norm_inf(&self) -> T;
}

/// Residuals for a quadratic program.
pub trait Residuals<T: FloatT> {
    type D: ProblemData<T>;
    type V: Variables<T>;

    /// Compute the full KKT residuals for the given variables.
    fn update(&mut self, variables: &Self::V, data: &Self::D);

    /// Compute the residuals of the linearized KKT conditions at
    /// `variables` for a computed `step` and the `rhs` it was solved
    /// against.  Returns the largest absolute residual.
    fn update_linear(
        &mut self,
        step: &Self::V,
        rhs: &Self::V,
        variables: &Self::V,
        data: &Self::D,
    ) -> T;
}

/// KKT linear solver object.
pub trait KKTSystem<T: FloatT> {
    type D: ProblemData<T>;
    type V: Variables<T>;
    type SE: Settings<T>;

    /// Select a factorization strategy for the problem.  Called once
    /// at the start of every solve.
    fn setup(&mut self, data: &Self::D, settings: &Self::SE);

    /// `true` if the problem has no active inequalities, so that a
    /// single Newton step solves it.
    fn is_unconstrained(&self) -> bool;

    /// Update the KKT system.   In particular, update KKT
    /// matrix entries with new variables and refactor.
    fn update(
        &mut self,
        data: &Self::D,
        variables: &Self::V,
        settings: &Self::SE,
    ) -> Result<(), KKTSolverError>;

    /// Solve the KKT system for the given RHS using the most recent
    /// factorization.
    fn solve(
        &mut self,
        step_lhs: &mut Self::V,
        step_rhs: &Self::V,
        data: &Self::D,
        settings: &Self::SE,
    ) -> Result<(), KKTSolverError>;

    /// The factorization used in the most recent update, if any.
    fn factorization(&self) -> Option<KKTFactorization>;
}

/// Printing functions for the solver's Info
pub trait InfoPrint<T>
where
    T: FloatT,
{
    type D: ProblemData<T>;
    type SE: Settings<T>;

    /// Print the solver configuration, e.g. settings etc.
    /// This function is called once at the start of the solve.
    fn print_configuration(&mut self, settings: &Self::SE, data: &Self::D)
        -> std::io::Result<()>;

    /// Print a header to appear at the top of progress information.
    fn print_status_header(&mut self, settings: &Self::SE) -> std::io::Result<()>;

    /// Print solver progress information.   Called once per iteration.
    fn print_status(&mut self, settings: &Self::SE) -> std::io::Result<()>;

    /// Print solver final status and other exit information.   Called at
    /// solver termination.
    fn print_footer(&mut self, settings: &Self::SE) -> std::io::Result<()>;
}

/// Internal information for the solver to monitor progress and check for termination.
pub trait Info<T>: InfoPrint<T>
where
    T: FloatT,
{
    type V: Variables<T>;
    type R: Residuals<T>;

    /// Reset internal data, particularly solve timers.
    fn reset(&mut self, timers: &mut Timers);

    /// Compute final values before solver termination
    fn finalize(&mut self, timers: &Timers);

    /// Update solver progress information
    fn update(&mut self, data: &Self::D, variables: &Self::V, residuals: &Self::R, μ: T);

    /// Return `true` if termination conditions have been reached, with
    /// `max_iter` as the iteration cap for this solve.
    fn check_termination(&mut self, settings: &Self::SE, iter: u32, max_iter: u32) -> bool;

    // save and recover prior iterates
    fn save_prev_iterate(&mut self, variables: &Self::V, prev_variables: &mut Self::V);
    fn reset_to_prev_iterate(&mut self, variables: &mut Self::V, prev_variables: &Self::V);

    /// Record the top level solver's choice of step scalars for the step
    /// that produced the current iterate, and log the iteration.
    fn save_scalars(&mut self, scalars: &StepScalars<T>, iter: u32);

    /// Record the KKT factorization and refinement effort of the last step.
    fn save_kkt_stats(&mut self, factorization: Option<KKTFactorization>, refine_steps: u32);

    /// Report or update termination status
    fn get_status(&self) -> SolverStatus;
    fn set_status(&mut self, status: SolverStatus);
}

/// Solution for a quadratic program.
pub trait Solution<T: FloatT> {
    type D: ProblemData<T>;
    type V: Variables<T>;
    type I: Info<T>;

    /// Compute solution from the Variables at solver termination
    fn finalize(&mut self, data: &Self::D, variables: &Self::V, info: &Self::I);

    /// Copy a previous solution into the Variables as a starting point
    fn load_into(&self, variables: &mut Self::V);
}

/// Settings for a quadratic program.
///
/// Implementors of this trait can define any internal or problem
/// specific settings they wish.   They must, however, also maintain
/// a settings object of type [`CoreSettings`](crate::solver::core::CoreSettings)
/// and return this to the solver internally.
pub trait Settings<T: FloatT> {
    /// Return the core settings.
    fn core(&self) -> &CoreSettings<T>;

    /// Check settings for consistency.
    fn validate(&self) -> Result<(), SettingsError>;
}

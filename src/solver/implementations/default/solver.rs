use super::*;
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::core::{
    kktsolvers::KKTSolverError,
    traits::{KKTSystem, Settings},
    IPSolver, SettingsError, SolveOptions, Solver, SolverStatus,
};
use thiserror::Error;

/// Solver for dense convex quadratic programs

pub type DefaultSolver<T = f64> = Solver<
    DefaultVariables<T>,
    DefaultResiduals<T>,
    DefaultKKTSystem<T>,
    DefaultInfo<T>,
    DefaultSettings<T>,
>;

/// Error type returned by the solver entry points.  Problems detected
/// here are reported before any iteration and leave the solution
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Problem dimensions {got:?} do not match the solver workspace {expected:?}")]
    DimensionMismatch {
        expected: DenseQpDims,
        got: DenseQpDims,
    },
    #[error("Bad solver settings: {0}")]
    BadSettings(#[from] SettingsError),
    #[error("Bad problem data: {0}")]
    BadData(#[from] ProblemDataError),
    #[error("No KKT factorization is available")]
    NoFactorization,
    #[error("KKT solve failed: {0}")]
    KKTSolve(KKTSolverError),
}

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    /// Allocate a solver workspace for problems of the given dimensions.
    pub fn new(dims: &DenseQpDims, settings: DefaultSettings<T>) -> Result<Self, SolverError> {
        settings.validate()?;

        let variables = DefaultVariables::<T>::new(dims);
        let residuals = DefaultResiduals::<T>::new(dims);
        let kktsystem = DefaultKKTSystem::<T>::new(dims);
        let info = DefaultInfo::<T>::new();

        // work variables for assembling step direction LHS/RHS
        let step_rhs = DefaultVariables::<T>::new(dims);
        let step_lhs = DefaultVariables::<T>::new(dims);
        let refine_rhs = DefaultVariables::<T>::new(dims);
        let refine_lhs = DefaultVariables::<T>::new(dims);
        let prev_vars = DefaultVariables::<T>::new(dims);

        Ok(Self {
            variables,
            residuals,
            kktsystem,
            step_lhs,
            step_rhs,
            refine_lhs,
            refine_rhs,
            prev_vars,
            info,
            settings,
            timers: None,
        })
    }

    /// Dimensions of the problems this workspace accepts
    pub fn dims(&self) -> &DenseQpDims {
        &self.kktsystem.dims
    }

    pub fn settings(&self) -> &DefaultSettings<T> {
        &self.settings
    }

    /// Replace the settings between solves.  The current settings are
    /// kept if the new ones do not validate.
    pub fn update_settings(&mut self, settings: DefaultSettings<T>) -> Result<(), SolverError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn info(&self) -> &DefaultInfo<T> {
        &self.info
    }

    fn check_problem(
        &self,
        qp: &DenseQp<T>,
        solution: &DefaultSolution<T>,
    ) -> Result<(), SolverError> {
        if qp.dims() != self.dims() {
            return Err(SolverError::DimensionMismatch {
                expected: *self.dims(),
                got: *qp.dims(),
            });
        }
        solution.check_dims(self.dims())?;
        Ok(())
    }

    /// Solve `qp`, writing the result into `solution`.
    pub fn solve(
        &mut self,
        qp: &DenseQp<T>,
        solution: &mut DefaultSolution<T>,
    ) -> Result<SolverStatus, SolverError> {
        self.check_problem(qp, solution)?;
        let options = SolveOptions {
            warm_start: self.settings.warm_start,
            max_iter: self.settings.max_iter,
            compute_residuals_exit: self.settings.compute_residuals_exit,
        };
        Ok(self.run(qp, solution, options))
    }

    /// Run at most `n_iter` iterations starting from `solution`, writing
    /// the final iterate back into it.  The iterate need not converge.
    pub fn predict(
        &mut self,
        qp: &DenseQp<T>,
        solution: &mut DefaultSolution<T>,
        n_iter: u32,
    ) -> Result<SolverStatus, SolverError> {
        self.check_problem(qp, solution)?;
        let options = SolveOptions {
            warm_start: true,
            max_iter: n_iter,
            compute_residuals_exit: self.settings.compute_residuals_predict,
        };
        Ok(self.run(qp, solution, options))
    }

    /// First order change of the solution of the last solve of `qp`
    /// under the data perturbation `perturbation`, using the most
    /// recent KKT factorization.  The change of the primal and dual
    /// values is written into `out`.
    pub fn sensitivity(
        &mut self,
        qp: &DenseQp<T>,
        perturbation: &DenseQpPerturbation<T>,
        out: &mut DefaultSolution<T>,
    ) -> Result<(), SolverError> {
        self.check_problem(qp, out)?;
        perturbation.check_dims(self.dims())?;

        // linearized residual of the perturbed optimality conditions,
        // with the complementarity held fixed
        let nv = qp.dims().nv;
        let rhs = &mut self.step_rhs;
        rhs.x.set(T::zero());
        rhs.x[..nv].copy_from(&perturbation.dg);
        rhs.π.scalarop_from(|v| -v, &perturbation.db);
        perturbation.stacked_d(&mut rhs.t, &qp.mask);
        rhs.t.negate();
        rhs.λ.set(T::zero());

        self.kktsystem
            .solve(&mut self.step_lhs, &self.step_rhs, qp, &self.settings)
            .map_err(|e| match e {
                KKTSolverError::NoFactorization => SolverError::NoFactorization,
                e => SolverError::KKTSolve(e),
            })?;

        out.fill_from_variables(&self.step_lhs, &qp.mask);
        Ok(())
    }
}

impl<T> ConfigurablePrintTarget for DefaultSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}

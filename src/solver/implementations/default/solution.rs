use super::*;
use crate::{
    algebra::*,
    solver::core::{traits::Solution, SolverStatus},
};

/// Standard-form solver type implementing the [`Solution`](crate::solver::core::traits::Solution) trait
///
/// The solution is owned by the caller.  It receives the result of each
/// solve and, with warm starting enabled, supplies the starting point of
/// the next one.  Multipliers and slacks of absent (infinite) bounds are
/// reported as zero.
#[derive(Debug, Clone)]
pub struct DefaultSolution<T> {
    /// primal solution
    pub v: Vec<T>,
    /// equality multipliers
    pub pi: Vec<T>,
    /// lower and upper soft constraint slacks
    pub sl: Vec<T>,
    pub su: Vec<T>,

    /// inequality multipliers, per constraint kind
    pub lam_lb: Vec<T>,
    pub lam_ub: Vec<T>,
    pub lam_lg: Vec<T>,
    pub lam_ug: Vec<T>,
    pub lam_ls: Vec<T>,
    pub lam_us: Vec<T>,

    /// inequality slacks, per constraint kind
    pub t_lb: Vec<T>,
    pub t_ub: Vec<T>,
    pub t_lg: Vec<T>,
    pub t_ug: Vec<T>,
    pub t_ls: Vec<T>,
    pub t_us: Vec<T>,

    /// final solver status
    pub status: SolverStatus,
    /// number of iterations
    pub iterations: u32,
    /// objective value
    pub objective: T,
    /// final residual norms
    pub res_stat: T,
    pub res_eq: T,
    pub res_ineq: T,
    pub res_comp: T,
    /// solve time in seconds
    pub solve_time: f64,
}

impl<T> DefaultSolution<T>
where
    T: FloatT,
{
    /// Create a new `DefaultSolution` object
    pub fn new(dims: &DenseQpDims) -> Self {
        let DenseQpDims { nv, ne, nb, ng, ns } = *dims;
        Self {
            v: vec![T::zero(); nv],
            pi: vec![T::zero(); ne],
            sl: vec![T::zero(); ns],
            su: vec![T::zero(); ns],
            lam_lb: vec![T::zero(); nb],
            lam_ub: vec![T::zero(); nb],
            lam_lg: vec![T::zero(); ng],
            lam_ug: vec![T::zero(); ng],
            lam_ls: vec![T::zero(); ns],
            lam_us: vec![T::zero(); ns],
            t_lb: vec![T::zero(); nb],
            t_ub: vec![T::zero(); nb],
            t_lg: vec![T::zero(); ng],
            t_ug: vec![T::zero(); ng],
            t_ls: vec![T::zero(); ns],
            t_us: vec![T::zero(); ns],
            status: SolverStatus::NotStarted,
            iterations: 0,
            objective: T::nan(),
            res_stat: T::nan(),
            res_eq: T::nan(),
            res_ineq: T::nan(),
            res_comp: T::nan(),
            solve_time: 0f64,
        }
    }

    /// Checks that every vector matches the problem dimensions.
    pub fn check_dims(&self, dims: &DenseQpDims) -> Result<(), ProblemDataError> {
        let DenseQpDims { nv, ne, nb, ng, ns } = *dims;
        for (field, expected, got) in [
            ("v", nv, self.v.len()),
            ("pi", ne, self.pi.len()),
            ("sl", ns, self.sl.len()),
            ("su", ns, self.su.len()),
            ("lam_lb", nb, self.lam_lb.len()),
            ("lam_ub", nb, self.lam_ub.len()),
            ("lam_lg", ng, self.lam_lg.len()),
            ("lam_ug", ng, self.lam_ug.len()),
            ("lam_ls", ns, self.lam_ls.len()),
            ("lam_us", ns, self.lam_us.len()),
            ("t_lb", nb, self.t_lb.len()),
            ("t_ub", nb, self.t_ub.len()),
            ("t_lg", ng, self.t_lg.len()),
            ("t_ug", ng, self.t_ug.len()),
            ("t_ls", ns, self.t_ls.len()),
            ("t_us", ns, self.t_us.len()),
        ] {
            check_len(field, expected, got)?;
        }
        Ok(())
    }

    // stacked multipliers and slacks, in the internal row order
    fn stacked_mut(&mut self) -> [(&mut Vec<T>, &mut Vec<T>); 6] {
        [
            (&mut self.lam_lb, &mut self.t_lb),
            (&mut self.lam_lg, &mut self.t_lg),
            (&mut self.lam_ub, &mut self.t_ub),
            (&mut self.lam_ug, &mut self.t_ug),
            (&mut self.lam_ls, &mut self.t_ls),
            (&mut self.lam_us, &mut self.t_us),
        ]
    }

    fn stacked(&self) -> [(&Vec<T>, &Vec<T>); 6] {
        [
            (&self.lam_lb, &self.t_lb),
            (&self.lam_lg, &self.t_lg),
            (&self.lam_ub, &self.t_ub),
            (&self.lam_ug, &self.t_ug),
            (&self.lam_ls, &self.t_ls),
            (&self.lam_us, &self.t_us),
        ]
    }

    /// Copy the primal and dual values of `variables` into the
    /// solution.  Masked rows are written as zero.
    pub(crate) fn fill_from_variables(&mut self, variables: &DefaultVariables<T>, mask: &[bool]) {
        let nv = self.v.len();
        let ns = self.sl.len();
        self.v.copy_from(&variables.x[..nv]);
        self.sl.copy_from(&variables.x[nv..nv + ns]);
        self.su.copy_from(&variables.x[nv + ns..]);
        self.pi.copy_from(&variables.π);

        let mut k = 0;
        for (lam, t) in self.stacked_mut() {
            for i in 0..lam.len() {
                if mask[k] {
                    lam[i] = variables.λ[k];
                    t[i] = variables.t[k];
                } else {
                    lam[i] = T::zero();
                    t[i] = T::zero();
                }
                k += 1;
            }
        }
    }
}

impl<T> Solution<T> for DefaultSolution<T>
where
    T: FloatT,
{
    type D = DenseQp<T>;
    type V = DefaultVariables<T>;
    type I = DefaultInfo<T>;

    fn finalize(&mut self, data: &DenseQp<T>, variables: &DefaultVariables<T>, info: &DefaultInfo<T>) {
        self.fill_from_variables(variables, &data.mask);

        self.status = info.status;
        self.iterations = info.iterations;
        self.objective = info.objective;
        self.res_stat = info.res_stat;
        self.res_eq = info.res_eq;
        self.res_ineq = info.res_ineq;
        self.res_comp = info.res_comp;
        self.solve_time = info.solve_time;
    }

    fn load_into(&self, variables: &mut DefaultVariables<T>) {
        let nv = self.v.len();
        let ns = self.sl.len();
        variables.x[..nv].copy_from(&self.v);
        variables.x[nv..nv + ns].copy_from(&self.sl);
        variables.x[nv + ns..].copy_from(&self.su);
        variables.π.copy_from(&self.pi);

        // masked rows are repaired by the warm start
        let mut k = 0;
        for (lam, t) in self.stacked() {
            for i in 0..lam.len() {
                variables.λ[k] = lam[i];
                variables.t[k] = t[i];
                k += 1;
            }
        }
    }
}

#[test]
fn test_solution_roundtrip_through_variables() {
    let qp = DenseQp::new(Matrix::identity(2), vec![0.0; 2])
        .unwrap()
        .with_bounds(vec![0, 1], vec![-1.0, -1e30], vec![1.0, 2.0])
        .unwrap();
    let dims = *qp.dims();

    let mut vars = DefaultVariables::<f64>::new(&dims);
    vars.x = vec![0.5, -0.5];
    vars.λ = vec![1.0, 2.0, 3.0, 4.0];
    vars.t = vec![5.0, 6.0, 7.0, 8.0];

    let mut sol = DefaultSolution::new(&dims);
    assert!(sol.check_dims(&dims).is_ok());
    sol.fill_from_variables(&vars, &qp.mask);

    assert_eq!(sol.v, vec![0.5, -0.5]);
    assert_eq!(sol.lam_lb, vec![1.0, 0.0]);
    assert_eq!(sol.t_lb, vec![5.0, 0.0]);
    assert_eq!(sol.lam_ub, vec![3.0, 4.0]);
    assert_eq!(sol.t_ub, vec![7.0, 8.0]);

    let mut back = DefaultVariables::<f64>::new(&dims);
    sol.load_into(&mut back);
    assert_eq!(back.x, vars.x);
    assert_eq!(back.λ, vec![1.0, 0.0, 3.0, 4.0]);

    let other = DefaultSolution::<f64>::new(&DenseQpDims {
        nv: 3,
        ..Default::default()
    });
    assert!(other.check_dims(&dims).is_err());
}

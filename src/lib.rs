//! __denseqp__ is a Rust implementation of a primal-dual interior point solver
//! for dense convex quadratic programs, of the kind solved at every sampling
//! period of an embedded model predictive controller.  It solves the problem
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}v^T H v + g^T v
//!        + \frac{1}{2}s_l^T Z_l s_l + z_l^T s_l
//!        + \frac{1}{2}s_u^T Z_u s_u + z_u^T s_u \\\\\[2ex\]
//!  \text{subject to} & A v = b \\\\\[1ex\]
//!         & \underline{b} \le v_{\mathcal{I}_b} \le \overline{b} \\\\\[1ex\]
//!         & \underline{g} \le C v \le \overline{g} \\\\\[1ex\]
//!         & s_l \ge l_s, \quad s_u \ge u_s
//!  \end{array}
//! $$
//!
//! with decision variables $v \in \mathbb{R}^{n_v}$ and, for constraints
//! declared as soft, slacks $s_l, s_u$ that relax the lower and upper sides
//! of the soft constraints.  The cost matrix $H$ is symmetric and should be
//! positive definite.
//!
//! ## Features
//!
//! * __Mehrotra predictor-corrector__ iterations with adaptive centering,
//!   an optional conditional corrector and fraction-to-boundary step control.
//!
//! * __Several KKT strategies__: a Schur complement method with Cholesky
//!   factors, an LQ based method that remains stable for redundant
//!   equalities, and a full LU factorization used directly or as a fallback.
//!
//! * __Real-time friendly__: all workspace is allocated up front by the
//!   caller, solves can be warm started, and a bounded number of iterations
//!   can be run with [`predict`](solver::DefaultSolver::predict).
//!
//! * __Generic__ over `f32` and `f64`.
//!
//! # Example
//!
//! ```no_run
//! use denseqp::algebra::*;
//! use denseqp::solver::*;
//!
//! // minimize v^2 subject to 0 <= v <= 10
//! let H = Matrix::from(&[[2.0]]);
//! let qp = DenseQp::new(H, vec![0.0])
//!     .unwrap()
//!     .with_bounds(vec![0], vec![0.0], vec![10.0])
//!     .unwrap();
//!
//! let settings = DefaultSettings::default();
//! let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
//! let mut solution = DefaultSolution::new(qp.dims());
//!
//! let status = solver.solve(&qp, &mut solution).unwrap();
//! assert_eq!(status, SolverStatus::Converged);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod solver;
pub mod timers;

/// Version number of the crate
pub fn version() -> &'static str {
    VERSION
}

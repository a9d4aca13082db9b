use crate::solver::core::traits::Settings;
use crate::{algebra::*, solver::core::SettingsError};
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Standard-form solver type implementing the [`Settings`](crate::solver::core::traits::Settings) trait

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    ///maximum number of iterations
    #[builder(default = "100")]
    pub max_iter: u32,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    ///stationarity residual tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_stat: T,

    ///equality residual tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_eq: T,

    ///inequality residual tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_ineq: T,

    ///complementarity residual tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_comp: T,

    ///initial barrier parameter for a cold start
    #[builder(default = "(1e2).as_T()")]
    pub mu0: T,

    ///steps shorter than this count towards stalling
    #[builder(default = "(1e-12).as_T()")]
    pub alpha_min: T,

    ///number of consecutive short steps before the solver stalls
    #[builder(default = "3")]
    pub max_stalled_iter: u32,

    ///primal regularization added to the condensed Hessian
    #[builder(default = "(1e-15).as_T()")]
    pub reg_prim: T,

    ///dual regularization of the equality block
    #[builder(default = "(1e-15).as_T()")]
    pub reg_dual: T,

    ///start from the values in the caller's solution
    #[builder(default = "false")]
    pub warm_start: bool,

    ///floor applied to warm started slacks and multipliers
    #[builder(default = "(1e-4).as_T()")]
    pub warm_start_min_value: T,

    ///distance of a cold start from its active bounds
    #[builder(default = "(0.5).as_T()")]
    pub init_margin: T,

    ///use Mehrotra predictor-corrector steps
    #[builder(default = "true")]
    pub pred_corr: bool,

    ///skip the corrector when the predictor step is long enough
    #[builder(default = "true")]
    pub cond_pred_corr: bool,

    ///predictor step length at or above which the corrector is skipped
    #[builder(default = "(1.0).as_T()")]
    pub cond_pred_corr_step: T,

    ///exponent of the centering heuristic σ = (μ_aff/μ)^p
    #[builder(default = "(3.0).as_T()")]
    pub centering_exponent: T,

    ///centering parameter when predictor-corrector is disabled
    #[builder(default = "(0.1).as_T()")]
    pub centering_fixed: T,

    ///maximum interior point step length
    #[builder(default = "(0.995).as_T()")]
    pub max_step_fraction: T,

    ///take independent primal and dual step lengths
    #[builder(default = "false")]
    pub split_step: bool,

    ///evaluate the residuals of the final iterate in `predict`
    #[builder(default = "false")]
    pub compute_residuals_predict: bool,

    ///evaluate the residuals of the final iterate when the
    ///iteration limit is hit
    #[builder(default = "true")]
    pub compute_residuals_exit: bool,

    ///KKT solve method ("auto", "cholesky", "lu" or "lq")
    #[builder(default = r#""auto".to_string()"#)]
    pub kkt_solve_method: String,

    ///KKT direct solve with iterative refinement
    #[builder(default = "true")]
    pub iterative_refinement_enable: bool,

    ///iterative refinement relative tolerance
    #[builder(default = "(1e-13).as_T()")]
    pub iterative_refinement_reltol: T,

    ///iterative refinement absolute tolerance
    #[builder(default = "(1e-12).as_T()")]
    pub iterative_refinement_abstol: T,

    ///iterative refinement maximum iterations
    #[builder(default = "4")]
    pub iterative_refinement_max_iter: u32,

    ///iterative refinement stalling tolerance
    #[builder(default = "(5.0).as_T()")]
    pub iterative_refinement_stop_ratio: T,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettings::from_mode(SolverMode::Robust)
    }
}

/// Preset trade-offs between speed and robustness
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverMode {
    /// Few iterations with absolute tolerances and no refinement
    SpeedAbs,
    /// Few iterations with looser tolerances and split step lengths
    Speed,
    /// Moderate iteration budget with light refinement
    Balance,
    /// Generous iteration budget with full refinement
    #[default]
    Robust,
}

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Settings preset for a given [`SolverMode`]
    pub fn from_mode(mode: SolverMode) -> Self {
        let mut builder = DefaultSettingsBuilder::<T>::default();
        match mode {
            SolverMode::SpeedAbs => builder
                .mu0((1e1).as_T())
                .max_iter(15)
                .iterative_refinement_enable(false),
            SolverMode::Speed => builder
                .mu0((1e1).as_T())
                .max_iter(15)
                .tol_stat((1e-6).as_T())
                .tol_eq((1e-6).as_T())
                .tol_ineq((1e-6).as_T())
                .tol_comp((1e-6).as_T())
                .split_step(true)
                .iterative_refinement_enable(false),
            SolverMode::Balance => builder
                .mu0((1e1).as_T())
                .max_iter(30)
                .iterative_refinement_max_iter(2),
            SolverMode::Robust => builder
                .mu0((1e2).as_T())
                .max_iter(100)
                .iterative_refinement_max_iter(4),
        };
        builder.build().unwrap()
    }
}

impl<T> Settings<T> for DefaultSettings<T>
where
    T: FloatT,
{
    //NB: CoreSettings is typedef'd to DefaultSettings
    fn core(&self) -> &DefaultSettings<T> {
        self
    }

    /// Checks that the settings are valid.  Fields specified by strings
    /// must name valid options, and numerical parameters of the step
    /// control must lie in their admissible ranges.
    fn validate(&self) -> Result<(), SettingsError> {
        validate_kkt_solve_method(&self.kkt_solve_method)?;
        validate_max_step_fraction(self.max_step_fraction)?;
        validate_positive("mu0", self.mu0)?;
        validate_positive("warm_start_min_value", self.warm_start_min_value)?;
        validate_positive("init_margin", self.init_margin)?;

        for (field, value) in [
            ("tol_stat", self.tol_stat),
            ("tol_eq", self.tol_eq),
            ("tol_ineq", self.tol_ineq),
            ("tol_comp", self.tol_comp),
            ("alpha_min", self.alpha_min),
            ("reg_prim", self.reg_prim),
            ("reg_dual", self.reg_dual),
        ] {
            validate_nonnegative(field, value)?;
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    /// check the fields that have been explicitly set
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref kkt_solve_method) = self.kkt_solve_method {
            validate_kkt_solve_method(kkt_solve_method)?;
        }
        if let Some(max_step_fraction) = self.max_step_fraction {
            validate_max_step_fraction(max_step_fraction)?;
        }
        if let Some(mu0) = self.mu0 {
            validate_positive("mu0", mu0)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_kkt_solve_method(kkt_solve_method: &str) -> Result<(), SettingsError> {
    match kkt_solve_method {
        "auto" | "cholesky" | "lu" | "lq" => Ok(()),
        _ => Err(SettingsError::BadFieldValue {
            field: "kkt_solve_method",
            reason: "expected one of \"auto\", \"cholesky\", \"lu\" or \"lq\"",
        }),
    }
}

fn validate_max_step_fraction<T: FloatT>(v: T) -> Result<(), SettingsError> {
    if v > T::zero() && v < T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue {
            field: "max_step_fraction",
            reason: "must lie strictly between 0 and 1",
        })
    }
}

fn validate_positive<T: FloatT>(field: &'static str, v: T) -> Result<(), SettingsError> {
    if v > T::zero() && v.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue {
            field,
            reason: "must be positive and finite",
        })
    }
}

fn validate_nonnegative<T: FloatT>(field: &'static str, v: T) -> Result<(), SettingsError> {
    if v >= T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue {
            field,
            reason: "must be nonnegative",
        })
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    DefaultSettingsBuilder::<f64>::default().build().unwrap();

    // fail on unknown KKT solve method
    assert!(DefaultSettingsBuilder::<f64>::default()
        .kkt_solve_method("ldl".to_string())
        .build()
        .is_err());

    // every documented method is accepted
    for method in ["auto", "cholesky", "lu", "lq"] {
        assert!(DefaultSettingsBuilder::<f64>::default()
            .kkt_solve_method(method.to_string())
            .build()
            .is_ok());
    }

    // fail on a step fraction that would reach the boundary
    assert!(DefaultSettingsBuilder::<f64>::default()
        .max_step_fraction(1.0)
        .build()
        .is_err());

    // directly construct a bad DefaultSettings and manually check
    let settings = DefaultSettings::<f64> {
        kkt_solve_method: "foo".to_string(),
        ..DefaultSettings::default()
    };
    assert!(settings.validate().is_err());

    let settings = DefaultSettings::<f64> {
        tol_comp: -1.0,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue {
            field: "tol_comp",
            reason: "must be nonnegative"
        })
    );
}

#[test]
fn test_settings_modes() {
    let robust = DefaultSettings::<f64>::default();
    assert_eq!(robust, DefaultSettings::from_mode(SolverMode::Robust));
    assert_eq!(robust.max_iter, 100);
    assert_eq!(robust.mu0, 1e2);

    let speed = DefaultSettings::<f32>::from_mode(SolverMode::SpeedAbs);
    assert_eq!(speed.max_iter, 15);
    assert!(!speed.iterative_refinement_enable);
    assert!(speed.validate().is_ok());

    let balance = DefaultSettings::<f64>::from_mode(SolverMode::Balance);
    assert_eq!(balance.iterative_refinement_max_iter, 2);
}

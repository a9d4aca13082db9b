use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use std::io::Write;

use super::*;
use crate::solver::core::traits::InfoPrint;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for DefaultInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

impl<T> InfoPrint<T> for DefaultInfo<T>
where
    T: FloatT,
{
    type D = DenseQp<T>;
    type SE = DefaultSettings<T>;

    fn print_configuration(
        &mut self,
        settings: &DefaultSettings<T>,
        data: &DenseQp<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;
        let dims = data.dims();

        writeln!(
            out,
            "\ndense QP interior point solver, version {}",
            crate::VERSION
        )?;

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", dims.nv)?;
        writeln!(out, "  equalities    = {}", dims.ne)?;
        writeln!(out, "  box bounds    = {}", dims.nb)?;
        writeln!(out, "  general ineqs = {}", dims.ng)?;
        writeln!(out, "  soft ineqs    = {}", dims.ns)?;
        writeln!(
            out,
            "  active rows   = {} of {}",
            data.num_active(),
            dims.nc()
        )?;
        writeln!(out,)?;

        self.print_settings(settings)?;

        std::io::Result::Ok(())
    }

    fn print_status_header(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        //print a subheader for the iterations info
        write!(out, "iter    ")?;
        write!(out, "objective    ")?;
        write!(out, "stat      ")?;
        write!(out, "eq        ")?;
        write!(out, "ineq      ")?;
        write!(out, "comp      ")?;
        write!(out, " μ        ")?;
        write!(out, "σ         ")?;
        write!(out, "step      ")?;
        write!(out, "kkt")?;
        writeln!(out,)?;
        writeln!(out,
            "------------------------------------------------------------------------------------------------"
        )?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    fn print_status(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>3}  ", self.iterations)?;
        write!(out, "{}  ", expformat!("{:+8.4e}", self.objective))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.res_stat))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.res_eq))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.res_ineq))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.res_comp))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.μ))?;

        if self.iterations > 0 {
            write!(out, "{}  ", expformat!("{:6.2e}", self.σ))?;
            let step = T::min(self.α_prim, self.α_dual);
            write!(out, "{}  ", expformat!("{:>.2e}", step))?;
            match self.factorization {
                Some(f) => write!(out, "{f}")?,
                None => write!(out, "--")?,
            }
        } else {
            write!(out, " ------    ------   --")?;
        }

        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    fn print_footer(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out,
            "------------------------------------------------------------------------------------------------"
        )?;

        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(out, "iterations = {}", self.iterations)?;

        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;

        std::io::Result::Ok(())
    }
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    fn print_settings(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;

        let set = settings;

        writeln!(out, "settings:")?;

        writeln!(
            out,
            "  kkt method: {}, precision: {} bit",
            set.kkt_solve_method,
            _get_precision_string::<T>()
        )?;

        writeln!(
            out,
            "  max iter = {}, max step = {:.3}, mu0 = {:.1e}",
            set.max_iter, set.max_step_fraction, set.mu0
        )?;

        writeln!(
            out,
            "  tol_stat = {:.1e}, tol_eq = {:.1e}, tol_ineq = {:.1e}, tol_comp = {:.1e}",
            set.tol_stat, set.tol_eq, set.tol_ineq, set.tol_comp
        )?;

        writeln!(
            out,
            "  pred-corr  : {}, conditional: {}, split step: {}",
            _bool_on_off(set.pred_corr),
            _bool_on_off(set.cond_pred_corr),
            _bool_on_off(set.split_step),
        )?;

        writeln!(
            out,
            "  static reg : ϵp = {:.1e}, ϵd = {:.1e}",
            set.reg_prim, set.reg_dual,
        )?;

        writeln!(
            out,
            "  iter refine: {}, reltol = {:.1e}, abstol = {:.1e},",
            _bool_on_off(set.iterative_refinement_enable),
            set.iterative_refinement_reltol,
            set.iterative_refinement_abstol
        )?;

        writeln!(
            out,
            "               max iter = {}, stop ratio = {:.1}",
            set.iterative_refinement_max_iter, set.iterative_refinement_stop_ratio
        )?;

        writeln!(out, "  warm start : {}", _bool_on_off(set.warm_start))?;

        writeln!(out,)?;

        std::io::Result::Ok(())
    }
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr.chars().nth(eidx + 1) == Some('-');

    let has_short_exp = {
        if !has_sign {
            thestr.len() == eidx + 2
        } else {
            thestr.len() == eidx + 3
        }
    };

    let chars = match (has_sign, has_short_exp) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat("1.5e3".to_string()), "1.5e+03");
    assert_eq!(_exp_str_reformat("1.5e-3".to_string()), "1.5e-03");
    assert_eq!(_exp_str_reformat("1.5e-13".to_string()), "1.5e-13");
    assert_eq!(_exp_str_reformat("1.5e13".to_string()), "1.5e+13");
}

#[test]
fn test_verbose_output() {
    use crate::solver::core::SolverStatus;

    let qp = DenseQp::new(crate::algebra::Matrix::from(&[[1.0]]), vec![0.0]).unwrap();
    let settings = DefaultSettings::<f64> {
        verbose: true,
        ..DefaultSettings::default()
    };

    let mut info = DefaultInfo::<f64>::new();
    info.print_to_buffer();
    info.print_configuration(&settings, &qp).unwrap();
    info.print_status_header(&settings).unwrap();
    info.print_status(&settings).unwrap();
    info.status = SolverStatus::Converged;
    info.print_footer(&settings).unwrap();

    let text = info.get_print_buffer().unwrap();
    assert!(text.contains("variables     = 1"));
    assert!(text.contains("kkt method: auto"));
    assert!(text.contains("Terminated with status = Converged"));

    // nothing is written when quiet
    let mut info = DefaultInfo::<f64>::new();
    info.print_to_buffer();
    info.print_footer(&DefaultSettings::default()).unwrap();
    assert_eq!(info.get_print_buffer().unwrap(), "");
}

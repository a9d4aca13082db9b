use denseqp::io::ConfigurablePrintTarget;
use denseqp::{algebra::*, solver::*};
use std::io::{Read, Seek, SeekFrom};

fn box_qp() -> DenseQp<f64> {
    DenseQp::new(Matrix::identity(2), vec![-3., 2.])
        .unwrap()
        .with_bounds(vec![0, 1], vec![-1., -1.], vec![1., 1.])
        .unwrap()
}

fn verbose() -> DefaultSettings<f64> {
    DefaultSettings {
        verbose: true,
        ..DefaultSettings::default()
    }
}

#[test]
fn test_print_to_buffer() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), verbose()).unwrap();
    solver.print_to_buffer();

    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut solution).unwrap();

    let out = solver.get_print_buffer().unwrap();
    assert!(out.contains("Terminated with status = Converged"));
}

#[test]
fn test_print_to_sink() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), verbose()).unwrap();
    solver.print_to_sink();

    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);

    // only buffers can be read back
    assert!(solver.get_print_buffer().is_err());
}

#[test]
fn test_print_to_file() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), verbose()).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.print_to_file(file.try_clone().unwrap());

    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut solution).unwrap();

    let mut out = String::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_string(&mut out).unwrap();
    assert!(out.contains("Terminated with status = Converged"));
}

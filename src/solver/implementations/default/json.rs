use super::*;
use crate::algebra::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// A struct very similar to the problem data, but containing only
// the data provided by the user (i.e. no stacked internal data).

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub H: Matrix<T>,
    pub g: Vec<T>,
    pub A: Matrix<T>,
    pub b: Vec<T>,
    pub idxb: Vec<usize>,
    pub lb: Vec<T>,
    pub ub: Vec<T>,
    pub C: Matrix<T>,
    pub lg: Vec<T>,
    pub ug: Vec<T>,
    pub soft: SoftConstraints<T>,
    pub settings: DefaultSettings<T>,
}

impl<T> DenseQp<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    /// Write the problem and a set of settings to a JSON file.
    pub fn save_to_file(&self, settings: &DefaultSettings<T>, file: &mut File) -> io::Result<()> {
        let mut json_data = JsonProblemData {
            H: self.H.clone(),
            g: self.g.clone(),
            A: self.A.clone(),
            b: self.b.clone(),
            idxb: self.idxb.clone(),
            lb: self.lb.clone(),
            ub: self.ub.clone(),
            C: self.C.clone(),
            lg: self.lg.clone(),
            ug: self.ug.clone(),
            soft: self.soft.clone(),
            settings: settings.clone(),
        };

        // infinite bounds can't be serialized
        for v in [
            &mut json_data.lb,
            &mut json_data.ub,
            &mut json_data.lg,
            &mut json_data.ug,
            &mut json_data.soft.ls,
            &mut json_data.soft.us,
        ] {
            sanitize_bounds(v);
        }

        // write to file
        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// Read a problem and its settings from a JSON file written
    /// by [`save_to_file`](DenseQp::save_to_file).
    pub fn load_from_file(file: &mut File) -> io::Result<(Self, DefaultSettings<T>)> {
        // read file
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        for v in [
            &mut json_data.lb,
            &mut json_data.ub,
            &mut json_data.lg,
            &mut json_data.ug,
            &mut json_data.soft.ls,
            &mut json_data.soft.us,
        ] {
            desanitize_bounds(v);
        }

        let bad_data = |e: ProblemDataError| io::Error::new(io::ErrorKind::InvalidData, e);

        let qp = DenseQp::new(json_data.H, json_data.g)
            .and_then(|qp| qp.with_equalities(json_data.A, json_data.b))
            .and_then(|qp| qp.with_bounds(json_data.idxb, json_data.lb, json_data.ub))
            .and_then(|qp| qp.with_general_constraints(json_data.C, json_data.lg, json_data.ug))
            .and_then(|qp| qp.with_soft_constraints(json_data.soft))
            .map_err(bad_data)?;

        Ok((qp, json_data.settings))
    }
}

fn sanitize_bounds<T: FloatT>(v: &mut [T]) {
    for x in v.iter_mut() {
        if *x == T::infinity() {
            *x = T::max_value();
        } else if *x == T::neg_infinity() {
            *x = T::min_value();
        }
    }
}

fn desanitize_bounds<T: FloatT>(v: &mut [T]) {
    for x in v.iter_mut() {
        if *x == T::max_value() {
            *x = T::infinity();
        } else if *x == T::min_value() {
            *x = T::neg_infinity();
        }
    }
}

#[test]
fn test_json_io() {
    use std::io::{Seek, SeekFrom};

    let qp = DenseQp::new(Matrix::from(&[[2.0, 0.5], [0.5, 1.0]]), vec![1.0, -1.0])
        .unwrap()
        .with_equalities(Matrix::from(&[[1.0, 1.0]]), vec![1.0])
        .unwrap()
        .with_bounds(vec![1], vec![f64::NEG_INFINITY], vec![2.0])
        .unwrap()
        .with_general_constraints(Matrix::from(&[[1.0, -1.0]]), vec![-1.0], vec![f64::INFINITY])
        .unwrap()
        .with_soft_constraints(SoftConstraints::new(vec![1]))
        .unwrap();

    let settings = DefaultSettingsBuilder::default()
        .max_iter(42)
        .kkt_solve_method("lu".to_string())
        .build()
        .unwrap();

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    qp.save_to_file(&settings, &mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let (qp2, settings2) = DenseQp::<f64>::load_from_file(&mut file).unwrap();

    assert_eq!(settings, settings2);
    assert_eq!(qp.dims(), qp2.dims());
    assert_eq!(qp.H, qp2.H);
    assert_eq!(qp2.lb, vec![f64::NEG_INFINITY]);
    assert_eq!(qp2.ug, vec![f64::INFINITY]);
    assert_eq!(qp.mask, qp2.mask);
    assert_eq!(qp.d, qp2.d);
}

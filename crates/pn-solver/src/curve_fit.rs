//! Least-squares polynomial fit of tabulated pump data.

use nalgebra::{DMatrix, DVector};

/// Degree used for head and efficiency curves unless told otherwise.
pub const DEFAULT_DEGREE: usize = 2;

/// One cell of a user-entered sample table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    /// Free text as typed; coerced if it parses as a number.
    Text(String),
    Missing,
}

impl Cell {
    /// Numeric value, or `None` if the cell is missing, unparsable or not finite.
    pub fn coerce(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Missing => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One `(flow, value)` row of a pump or efficiency table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub flow: Cell,
    pub value: Cell,
}

impl SampleRow {
    pub fn new(flow: impl Into<Cell>, value: impl Into<Cell>) -> Self {
        Self {
            flow: flow.into(),
            value: value.into(),
        }
    }

    fn coerce(&self) -> Option<(f64, f64)> {
        Some((self.flow.coerce()?, self.value.coerce()?))
    }
}

/// Polynomial with coefficients stored highest degree first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// `coefficients[0]` multiplies the highest power.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation. Defined everywhere; no clamping to the sample range.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Fit a polynomial of `degree` through the valid rows of `rows`.
///
/// Rows with a missing or non-numeric cell are dropped. Returns `None` when
/// fewer than `degree + 1` rows survive.
pub fn fit_curve(rows: &[SampleRow], degree: usize) -> Option<Polynomial> {
    let points: Vec<(f64, f64)> = rows.iter().filter_map(SampleRow::coerce).collect();
    fit_points(&points, degree)
}

/// Least-squares fit on already-numeric points.
///
/// Abscissae are scaled by their largest magnitude before building the
/// Vandermonde matrix, then the coefficients are scaled back.
pub fn fit_points(points: &[(f64, f64)], degree: usize) -> Option<Polynomial> {
    if points.len() < degree + 1 {
        return None;
    }

    let scale = points
        .iter()
        .map(|(x, _)| x.abs())
        .fold(0.0_f64, f64::max);
    let scale = if scale > 0.0 { scale } else { 1.0 };

    let cols = degree + 1;
    let a = DMatrix::from_fn(points.len(), cols, |i, j| {
        (points[i].0 / scale).powi((degree - j) as i32)
    });
    let b = DVector::from_iterator(points.len(), points.iter().map(|(_, y)| *y));

    let solved = a.svd(true, true).solve(&b, 1e-14).ok()?;

    let coefficients: Vec<f64> = solved
        .iter()
        .enumerate()
        .map(|(j, c)| c / scale.powi((degree - j) as i32))
        .collect();

    coefficients
        .iter()
        .all(|c| c.is_finite())
        .then(|| Polynomial::new(coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_evaluation() {
        // 40 - 0.1 x^2
        let p = Polynomial::new(vec![-0.1, 0.0, 40.0]);
        assert_eq!(p.degree(), 2);
        assert!((p.eval(0.0) - 40.0).abs() < 1e-12);
        assert!((p.eval(10.0) - 30.0).abs() < 1e-12);
        // extrapolates without clamping
        assert!((p.eval(-30.0) - -50.0).abs() < 1e-9);
    }

    #[test]
    fn three_points_are_interpolated_exactly() {
        let rows = vec![
            SampleRow::new(0.0, 40.0),
            SampleRow::new(50.0, 35.0),
            SampleRow::new(100.0, 25.0),
        ];
        let p = fit_curve(&rows, DEFAULT_DEGREE).unwrap();
        assert!((p.eval(0.0) - 40.0).abs() < 1e-9);
        assert!((p.eval(50.0) - 35.0).abs() < 1e-9);
        assert!((p.eval(100.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn recovers_known_coefficients() {
        let points: Vec<(f64, f64)> = (0..8)
            .map(|i| {
                let x = i as f64 * 10.0;
                (x, 40.0 - 0.1 * x * x)
            })
            .collect();
        let p = fit_points(&points, 2).unwrap();
        let c = p.coefficients();
        assert!((c[0] - -0.1).abs() < 1e-9);
        assert!(c[1].abs() < 1e-7);
        assert!((c[2] - 40.0).abs() < 1e-7);
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        let points = [(0.0, 1.0), (1.0, 3.1), (2.0, 4.9), (3.0, 7.0)];
        let p = fit_points(&points, 1).unwrap();
        // Normal-equation solution: slope 1.98, intercept 1.03
        assert!((p.coefficients()[0] - 1.98).abs() < 1e-9);
        assert!((p.coefficients()[1] - 1.03).abs() < 1e-9);
    }

    #[test]
    fn invalid_rows_are_dropped() {
        let rows = vec![
            SampleRow::new(0.0, 40.0),
            SampleRow::new("50", " 35.0 "),
            SampleRow::new("abc", 30.0),
            SampleRow {
                flow: Cell::Number(75.0),
                value: Cell::Missing,
            },
            SampleRow::new(f64::NAN, 20.0),
            SampleRow::new(100.0, 25.0),
        ];
        let p = fit_curve(&rows, 2).unwrap();
        assert!((p.eval(50.0) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn too_few_valid_rows_gives_none() {
        let rows = vec![
            SampleRow::new(0.0, 40.0),
            SampleRow::new(50.0, 35.0),
            SampleRow::new("n/a", 25.0),
        ];
        assert!(fit_curve(&rows, 2).is_none());
        assert!(fit_curve(&[], 0).is_none());
        assert!(fit_curve(&rows[..2], 1).is_some());
    }

    #[test]
    fn text_coercion() {
        assert_eq!(Cell::from(" 12.5").coerce(), Some(12.5));
        assert_eq!(Cell::from("").coerce(), None);
        assert_eq!(Cell::from("inf").coerce(), None);
        assert_eq!(Cell::Missing.coerce(), None);
    }
}

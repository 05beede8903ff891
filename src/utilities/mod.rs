// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Utilities
//!
//! Common numerical helpers, either utilised by multiple sub-modules or too small to
//! warrant their own sub-module

use itertools::Itertools;
use nalgebra::RealField;
use num_traits::NumCast;
use std::io::BufRead;

/// Linearly interpolates the curve `(xs, ys)` at the query point `q`.
///
/// Queries outside the tabulated range clamp to the first or last ordinate. The
/// abscissae `xs` must be sorted in increasing order, the bracketing interval is
/// located as the first tabulated point with `x >= q`.
pub fn linear_interpolation<T: Copy + RealField>(xs: &[T], ys: &[T], q: T) -> T {
    if q <= xs[0] {
        return ys[0];
    }
    if q >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    let idx = xs.partition_point(|x| *x < q);
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    let t = (q - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

/// Integrates the sampled curve `(xs, ys)` with the trapezoid rule
pub fn trapezoid<T: Copy + RealField>(xs: &[T], ys: &[T]) -> T {
    let two = T::one() + T::one();
    xs.iter()
        .zip(ys.iter())
        .tuple_windows()
        .fold(T::zero(), |acc, ((x0, y0), (x1, y1))| {
            acc + (*x1 - *x0) * (*y0 + *y1) / two
        })
}

/// Builds `n` evenly spaced points spanning `[start, stop]` inclusive
pub fn linspace<T: Copy + RealField + NumCast>(start: T, stop: T, n: usize) -> Vec<T> {
    if n < 2 {
        return vec![start];
    }
    let step = (stop - start) / T::from(n - 1).unwrap();
    (0..n)
        .map(|i| start + T::from(i).unwrap() * step)
        .collect()
}

/// Parses a two-column numeric table from `reader`.
///
/// Columns may be separated by a comma or by whitespace and the table carries no
/// header. Rows which fail to parse are skipped with a warning rather than
/// aborting the load, the number of skipped rows is returned alongside the data.
pub fn read_two_column_table(
    reader: impl BufRead,
) -> Result<(Vec<(f64, f64)>, usize), std::io::Error> {
    let mut rows = Vec::new();
    let mut skipped = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&line) {
            Some(pair) => rows.push(pair),
            None => {
                tracing::warn!("skipping unparsable table row {}: {:?}", index + 1, line);
                skipped += 1;
            }
        }
    }
    Ok((rows, skipped))
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty());
    let x = fields.next()?.trim().parse::<f64>().ok()?;
    let y = fields.next()?.trim().parse::<f64>().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod test {
    use super::{linear_interpolation, linspace, read_two_column_table, trapezoid};
    use approx::assert_relative_eq;

    #[test]
    fn interpolation_reproduces_tabulated_points() {
        let xs = [1., 2., 3.];
        let ys = [10., 20., 30.];
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(linear_interpolation(&xs, &ys, *x), *y);
        }
    }

    #[test]
    fn interpolation_clamps_outside_the_table() {
        let xs = [1., 2., 3.];
        let ys = [10., 20., 30.];
        assert_relative_eq!(linear_interpolation(&xs, &ys, 0.), 10.);
        assert_relative_eq!(linear_interpolation(&xs, &ys, 5.), 30.);
    }

    #[test]
    fn interpolation_is_linear_between_neighbours() {
        let xs = [1., 2., 3.];
        let ys = [10., 20., 30.];
        assert_relative_eq!(linear_interpolation(&xs, &ys, 1.5), 15.);
        assert_relative_eq!(linear_interpolation(&xs, &ys, 2.25), 22.5);
    }

    #[test]
    fn trapezoid_is_exact_for_linear_data() {
        let xs: Vec<f64> = linspace(0., 1., 11);
        let ys: Vec<f64> = xs.iter().map(|x| 2. * x).collect();
        assert_relative_eq!(trapezoid(&xs, &ys), 1., max_relative = 1e-12);
    }

    #[test]
    fn linspace_spans_the_interval_inclusively() {
        let points: Vec<f64> = linspace(0., 10., 6);
        assert_eq!(points.len(), 6);
        assert_relative_eq!(points[0], 0.);
        assert_relative_eq!(points[5], 10.);
        assert_relative_eq!(points[1], 2.);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let source = "0.1,1e6\nnot a row\n0.2,2e6\n0.3\n";
        let (rows, skipped) = read_two_column_table(source.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 2);
        assert_relative_eq!(rows[1].0, 0.2);
    }

    #[test]
    fn whitespace_separated_rows_parse_too() {
        let source = "0.1 1e6\n0.2\t2e6\n";
        let (rows, skipped) = read_two_column_table(source.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 0);
    }
}

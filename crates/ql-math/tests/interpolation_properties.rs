//! Properties every curve interpolation must have: locality, and a
//! primitive consistent with the interpolant.

use proptest::prelude::*;
use ql_math::{
    BackwardFlatInterpolation, ForwardFlatInterpolation, Interpolation1D, LinearInterpolation,
    LogLinearInterpolation,
};

type Builder = fn(&[f64], &[f64]) -> Box<dyn Interpolation1D>;

fn builders() -> [(&'static str, Builder); 4] {
    [
        ("linear", |x, y| Box::new(LinearInterpolation::new(x, y).unwrap())),
        ("log-linear", |x, y| Box::new(LogLinearInterpolation::new(x, y).unwrap())),
        ("backward-flat", |x, y| Box::new(BackwardFlatInterpolation::new(x, y).unwrap())),
        ("forward-flat", |x, y| Box::new(ForwardFlatInterpolation::new(x, y).unwrap())),
    ]
}

fn nodes() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05f64..2.0, 0.5f64..1.5), 2..12).prop_map(|pts| {
        let mut x = 0.0;
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for (dx, y) in pts {
            xs.push(x);
            ys.push(y);
            x += dx;
        }
        (xs, ys)
    })
}

proptest! {
    #[test]
    fn nodes_are_reproduced((xs, ys) in nodes()) {
        for (name, build) in builders() {
            let interp = build(&xs, &ys);
            for (x, y) in xs.iter().zip(&ys) {
                prop_assert!((interp.operator(*x) - y).abs() < 1e-12, "{} at {}", name, x);
            }
        }
    }

    #[test]
    fn moving_the_last_node_leaves_earlier_segments((xs, ys) in nodes(), bump in 0.5f64..2.0) {
        let n = xs.len();
        let mut bumped = ys.clone();
        bumped[n - 1] *= bump;
        for (name, build) in builders() {
            let a = build(&xs, &ys);
            let b = build(&xs, &bumped);
            let limit = if n >= 2 { xs[n - 2] } else { xs[0] };
            let mut x = xs[0];
            while x <= limit {
                prop_assert_eq!(a.operator(x), b.operator(x), "{} at {}", name, x);
                x += 0.01;
            }
        }
    }

    #[test]
    fn primitive_integrates_the_interpolant((xs, ys) in nodes(), frac in 0.0f64..1.0) {
        let x_end = xs[xs.len() - 1] * frac;
        for (name, build) in builders() {
            let interp = build(&xs, &ys);
            // midpoint rule on a fine grid
            let steps = 4000;
            let h = x_end / steps as f64;
            let numeric: f64 = (0..steps).map(|i| interp.operator((i as f64 + 0.5) * h) * h).sum();
            let tol = 1e-2 * x_end.max(1e-3);
            prop_assert!((interp.primitive(x_end) - numeric).abs() < tol, "{}", name);
        }
    }
}

//! Properties of the yield bootstrap over randomly generated deposit
//! markets: quotes are recovered, nodes are ordered whatever order the
//! helpers arrive in, and rebuilding from unchanged quotes is exact.

use proptest::prelude::*;
use ql_core::Handle;
use ql_quotes::{Quote, SimpleQuote};
use ql_termstructures::{
    BootstrapConfig, CalibratingHelper, DepositRateHelper, PiecewiseConstantForwards,
    PiecewiseCurve, RateHelper, YieldTermStructure,
};
use ql_time::{Actual360, Date};
use std::sync::Arc;

fn reference() -> Date {
    Date::from_ymd(2023, 1, 2).unwrap()
}

/// Strictly increasing maturities (in days) with a rate per maturity.  Rates
/// drift slowly so implied forwards stay within the solver's bracket.
fn market() -> impl Strategy<Value = Vec<(i32, f64)>> {
    let steps = prop::collection::vec((30i32..400, -0.002f64..0.002), 1..10);
    (0.005f64..0.08, steps).prop_map(|(start, pts)| {
        let mut days = 0;
        let mut rate = start;
        pts.into_iter()
            .map(|(gap, step)| {
                days += gap;
                rate += step;
                (days, rate)
            })
            .collect()
    })
}

fn helpers(points: &[(i32, f64)]) -> (Vec<Arc<SimpleQuote>>, Vec<Arc<dyn RateHelper>>) {
    let reference = reference();
    points
        .iter()
        .map(|&(days, rate)| {
            let quote = Arc::new(SimpleQuote::new(rate));
            let helper: Arc<dyn RateHelper> = Arc::new(
                DepositRateHelper::new(
                    Handle::from_arc(quote.clone() as Arc<dyn Quote>),
                    reference,
                    reference.add_days(days).unwrap(),
                    Actual360,
                )
                .unwrap(),
            );
            (quote, helper)
        })
        .unzip()
}

proptest! {
    #[test]
    fn deposit_quotes_are_recovered(points in market()) {
        let (_, helpers) = helpers(&points);
        let curve = PiecewiseConstantForwards::constant_forwards(
            reference(),
            helpers,
            Actual360,
            BootstrapConfig::default(),
        )
        .unwrap();
        for helper in curve.helpers() {
            let quote = helper.quote().unwrap();
            let implied = helper.implied_quote(&*curve).unwrap();
            prop_assert!(
                (implied - quote).abs() < 1e-9,
                "{}: {} vs {}",
                helper.pillar_date(),
                implied,
                quote
            );
        }
    }

    #[test]
    fn node_dates_increase_whatever_the_input_order(points in market(), seed in any::<u64>()) {
        let (_, mut helpers) = helpers(&points);
        // deterministic shuffle driven by the generated seed
        let mut state = seed | 1;
        for i in (1..helpers.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            helpers.swap(i, (state % (i as u64 + 1)) as usize);
        }
        let curve = PiecewiseConstantForwards::constant_forwards(
            reference(),
            helpers,
            Actual360,
            BootstrapConfig::default(),
        )
        .unwrap();
        let dates = curve.dates().unwrap();
        prop_assert_eq!(dates.len(), points.len() + 1);
        prop_assert_eq!(dates[0], reference());
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        let times = curve.times().unwrap();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rebuilding_from_the_same_quotes_is_exact(points in market()) {
        let (quotes, helpers) = helpers(&points);
        let curve = PiecewiseConstantForwards::constant_forwards(
            reference(),
            helpers,
            Actual360,
            BootstrapConfig::default(),
        )
        .unwrap();
        let before = curve.nodes().unwrap();
        let value = quotes[0].value().unwrap();
        quotes[0].set_value(value + 0.01);
        quotes[0].set_value(value);
        prop_assert_eq!(curve.nodes().unwrap(), before);
    }
}

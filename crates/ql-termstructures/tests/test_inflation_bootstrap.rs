//! Integration tests for piecewise inflation curves and the curve context.

use approx::assert_abs_diff_eq;
use ql_core::errors::Error;
use ql_core::{Handle, RelinkableHandle};
use ql_indexes::{Index, YoYInflationIndex, ZeroInflationIndex};
use ql_quotes::{Quote, SimpleQuote};
use ql_termstructures::{
    BootstrapConfig, CalibratingHelper, CurveContext, CurveState, Extrapolation, FlatForward,
    InflationConventions, InflationTermStructure, Linear, LogLinear, PiecewiseCurve,
    PiecewiseYoYInflation, PiecewiseZeroInflation, TermStructure, YearOnYearInflationSwapHelper,
    YieldTermStructure, YoYInflationHelper, YoYInflationTermStructure,
    ZeroCouponInflationSwapHelper, ZeroInflationHelper, ZeroInflationTermStructure,
};
use ql_time::{
    Actual365Fixed, BusinessDayConvention, Date, Frequency, NullCalendar, Period, Thirty360,
    TimeUnit,
};
use std::sync::Arc;

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn conventions() -> InflationConventions {
    InflationConventions::new(Period::new(3, TimeUnit::Months), Frequency::Monthly, false)
}

/// A UK RPI-like index with monthly fixings up to July 2022.
fn rpi() -> Arc<ZeroInflationIndex> {
    let lag = Period::new(1, TimeUnit::Months);
    let index = ZeroInflationIndex::new("UKRPI", Frequency::Monthly, lag, false);
    let fixings = [
        (2021, 7, 301.1),
        (2021, 8, 301.6),
        (2021, 9, 302.5),
        (2021, 10, 306.8),
        (2021, 11, 307.4),
        (2021, 12, 308.5),
        (2022, 1, 309.9),
        (2022, 2, 311.0),
        (2022, 3, 312.7),
        (2022, 4, 315.2),
        (2022, 5, 317.2),
        (2022, 6, 323.3),
        (2022, 7, 323.3),
    ];
    for (y, m, value) in fixings {
        index.add_fixing(date(y, m, 1), value).unwrap();
    }
    Arc::new(index)
}

const MATURITIES: [(u16, i32); 5] = [(2026, 4), (2027, 5), (2029, 7), (2031, 9), (2034, 12)];

fn zc_helpers(
    quote: &Arc<SimpleQuote>,
    index: &Arc<ZeroInflationIndex>,
) -> Vec<Arc<dyn ZeroInflationHelper>> {
    MATURITIES
        .iter()
        .map(|&(year, _)| {
            Arc::new(
                ZeroCouponInflationSwapHelper::new(
                    Handle::from_arc(quote.clone() as Arc<dyn Quote>),
                    conventions(),
                    date(2022, 8, 1),
                    date(year, 8, 1),
                    index.clone(),
                    Thirty360,
                )
                .unwrap(),
            ) as Arc<dyn ZeroInflationHelper>
        })
        .collect()
}

#[test]
fn zero_inflation_curve_from_zc_swaps() {
    let index = rpi();
    let quote = Arc::new(SimpleQuote::new(0.03145));
    let curve = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap();

    assert_eq!(curve.base_date(), date(2022, 5, 1));
    assert_eq!(curve.observation_lag(), Period::new(3, TimeUnit::Months));
    assert_eq!(curve.frequency(), Frequency::Monthly);
    assert!(!curve.index_is_interpolated());
    assert_eq!(curve.max_date(), date(2034, 5, 1));

    let nodes = curve.nodes().unwrap();
    assert_eq!(nodes[0], (date(2022, 5, 1), 317.2));
    for &(year, n) in &MATURITIES {
        let observed = date(year, 5, 1);
        let expected = 1.03145_f64.powi(n);
        assert_abs_diff_eq!(curve.index_ratio(observed).unwrap(), expected, epsilon = 1e-8);
        assert_abs_diff_eq!(curve.zero_rate(observed).unwrap(), 0.03145, epsilon = 1e-8);
    }
    for helper in curve.helpers() {
        assert_abs_diff_eq!(helper.implied_quote(&*curve).unwrap(), 0.03145, epsilon = 1e-9);
    }
}

#[test]
fn observation_dates_snap_to_the_month() {
    let index = rpi();
    let quote = Arc::new(SimpleQuote::new(0.03145));
    let curve = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap();
    assert_eq!(
        curve.index_level(date(2027, 5, 20)).unwrap(),
        curve.index_level(date(2027, 5, 1)).unwrap()
    );
    assert!(matches!(curve.index_level(date(2022, 4, 30)), Err(Error::Extrapolation(_))));
    assert!(matches!(curve.index_level(date(2034, 6, 1)), Err(Error::Extrapolation(_))));
}

#[test]
fn index_levels_extrapolate_at_the_last_growth_rate() {
    let index = rpi();
    let quote = Arc::new(SimpleQuote::new(0.03145));
    let curve = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        LogLinear,
        BootstrapConfig::default().with_extrapolation(Extrapolation::Allowed),
    )
    .unwrap();
    let last = curve.index_level(date(2034, 5, 1)).unwrap();
    let later = curve.index_level(date(2035, 5, 1)).unwrap();
    assert_abs_diff_eq!(later / last, 1.03145, epsilon = 1e-8);
}

#[test]
fn inflation_quote_change_rebuilds() {
    let index = rpi();
    let quote = Arc::new(SimpleQuote::new(0.03145));
    let curve = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap();
    quote.set_value(0.025);
    assert_eq!(curve.state(), CurveState::UnderConstruction);
    assert_abs_diff_eq!(curve.zero_rate(date(2031, 5, 1)).unwrap(), 0.025, epsilon = 1e-8);
    assert_eq!(curve.state(), CurveState::Built);
}

#[test]
fn missing_base_fixing_fails_the_build() {
    let index = Arc::new(ZeroInflationIndex::new(
        "UKRPI",
        Frequency::Monthly,
        Period::new(1, TimeUnit::Months),
        false,
    ));
    let quote = Arc::new(SimpleQuote::new(0.03));
    let result = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        Linear,
        BootstrapConfig::default(),
    );
    assert!(matches!(result, Err(Error::Evaluation(_))));
}

// ───────────────────────── year-on-year ─────────────────────────

fn yoy_index() -> Arc<YoYInflationIndex> {
    let lag = Period::new(1, TimeUnit::Months);
    let index = YoYInflationIndex::quoted("YYUKRPI", Frequency::Monthly, lag, false);
    index.add_fixing(date(2022, 5, 1), 0.111).unwrap();
    Arc::new(index)
}

fn yoy_helpers(
    quotes: &[Arc<SimpleQuote>],
    index: &Arc<YoYInflationIndex>,
    nominal: &RelinkableHandle<dyn YieldTermStructure>,
) -> Vec<Arc<dyn YoYInflationHelper>> {
    quotes
        .iter()
        .enumerate()
        .map(|(i, quote)| {
            let start = date(2022, 8, 1);
            Arc::new(
                YearOnYearInflationSwapHelper::new(
                    Handle::from_arc(quote.clone() as Arc<dyn Quote>),
                    conventions(),
                    start,
                    start.advance(i as i32 + 1, TimeUnit::Years).unwrap(),
                    &NullCalendar,
                    BusinessDayConvention::Unadjusted,
                    Actual365Fixed,
                    index.clone(),
                    nominal.clone(),
                )
                .unwrap(),
            ) as Arc<dyn YoYInflationHelper>
        })
        .collect()
}

#[test]
fn yoy_curve_from_yoy_swaps() {
    let index = yoy_index();
    let nominal = RelinkableHandle::<dyn YieldTermStructure>::null();
    nominal.link_to(Arc::new(FlatForward::continuous(date(2022, 8, 1), 0.035, Actual365Fixed)));
    let quotes: Vec<_> =
        [0.075, 0.055, 0.045, 0.040, 0.037].map(|r| Arc::new(SimpleQuote::new(r))).to_vec();
    let curve = PiecewiseYoYInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        yoy_helpers(&quotes, &index, &nominal),
        Actual365Fixed,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap();

    assert_eq!(curve.data().unwrap()[0], 0.111);
    assert_abs_diff_eq!(curve.yoy_rate(date(2023, 5, 1)).unwrap(), 0.075, epsilon = 1e-9);
    for helper in curve.helpers() {
        assert_abs_diff_eq!(
            helper.implied_quote(&*curve).unwrap(),
            helper.quote().unwrap(),
            epsilon = 1e-9
        );
    }

    // the next query rebuilds from the moved quote
    quotes[0].set_value(0.07);
    assert_abs_diff_eq!(curve.yoy_rate(date(2023, 5, 1)).unwrap(), 0.07, epsilon = 1e-9);
}

#[test]
fn yoy_helpers_need_a_nominal_curve() {
    let index = yoy_index();
    let nominal = RelinkableHandle::<dyn YieldTermStructure>::null();
    let quotes = vec![Arc::new(SimpleQuote::new(0.05))];
    let err = PiecewiseYoYInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        yoy_helpers(&quotes, &index, &nominal),
        Actual365Fixed,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Evaluation(_)), "{err}");
    assert!(err.to_string().contains("1st instrument"), "{err}");
}

// ───────────────────────── context ─────────────────────────

#[test]
fn context_forecasts_unpublished_fixings() {
    let index = rpi();
    let quote = Arc::new(SimpleQuote::new(0.03145));
    let curve = PiecewiseZeroInflation::new(
        date(2022, 8, 1),
        conventions(),
        index.clone(),
        zc_helpers(&quote, &index),
        Thirty360,
        Linear,
        BootstrapConfig::default(),
    )
    .unwrap();

    let mut context = CurveContext::new(date(2022, 8, 1));
    let handle = context.zero_inflation_curve(index.name());
    context.link_zero_inflation_curve(index.name(), curve.clone());
    assert!(!handle.is_empty());

    assert_eq!(context.inflation_fixing(&index, date(2022, 6, 15)).unwrap(), 323.3);
    let forecast = context.inflation_fixing(&index, date(2026, 5, 1)).unwrap();
    assert_abs_diff_eq!(forecast, 317.2 * 1.03145_f64.powi(4), epsilon = 1e-6);
    assert!(matches!(
        context.inflation_fixing(&index, date(2040, 1, 1)),
        Err(Error::Extrapolation(_))
    ));
}

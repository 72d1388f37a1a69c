//! The calibrating-helper contract.
//!
//! A helper wraps one market instrument: a live quote, the pillar date it
//! pins the curve at, and a valuation of the instrument against a (possibly
//! partial) curve.  Helpers never own the curve they calibrate; the
//! bootstrapper lends them a view of the nodes solved so far, truncated at
//! the helper's own pillar.

use crate::inflation_term_structure::{YoYInflationTermStructure, ZeroInflationTermStructure};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::{ordinal, Error, Result};
use ql_core::patterns::{Observable, Observer};
use ql_core::{Handle, Real};
use ql_quotes::Quote;
use ql_time::Date;
use std::sync::{Arc, Weak};

/// The curve-independent part of a helper.
pub trait CalibratingHelper: std::fmt::Debug + Send + Sync {
    /// The date this helper pins the curve at.
    fn pillar_date(&self) -> Date;

    /// The market quote, shared with the caller.
    fn quote_handle(&self) -> &Handle<dyn Quote>;

    /// The current market quote.
    ///
    /// # Errors
    /// [`Error::InvalidQuote`] if the handle is empty or the quote is unset
    /// or not finite.
    fn quote(&self) -> Result<Real> {
        let quote = self
            .quote_handle()
            .get()
            .ok_or_else(|| Error::InvalidQuote("helper has an empty quote handle".into()))?;
        quote.checked_value()
    }
}

/// A helper calibrating a yield curve.
pub trait RateHelper: CalibratingHelper {
    /// The instrument's quote implied by `curve`.
    ///
    /// Must only read the curve up to [`pillar_date`](CalibratingHelper::pillar_date).
    ///
    /// # Errors
    /// [`Error::Evaluation`] when the curve cannot value the instrument.
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real>;
}

/// A helper calibrating a zero-inflation curve.
pub trait ZeroInflationHelper: CalibratingHelper {
    /// The instrument's quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn ZeroInflationTermStructure) -> Result<Real>;
}

/// A helper calibrating a year-on-year inflation curve.
pub trait YoYInflationHelper: CalibratingHelper {
    /// The instrument's quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn YoYInflationTermStructure) -> Result<Real>;
}

/// Sort helpers by pillar date.
///
/// # Errors
/// [`Error::Ordering`] if two helpers share a pillar or the first pillar is
/// not after `base_date`; [`Error::InvalidArgument`] for an empty set.
pub(crate) fn sort_helpers<H>(helpers: &mut [Arc<H>], base_date: Date) -> Result<()>
where
    H: CalibratingHelper + ?Sized,
{
    if helpers.is_empty() {
        return Err(Error::InvalidArgument("no bootstrap helpers given".into()));
    }
    helpers.sort_by_key(|h| h.pillar_date());
    for (i, pair) in helpers.windows(2).enumerate() {
        let pillar = pair[0].pillar_date();
        if pair[1].pillar_date() == pillar {
            return Err(Error::Ordering(format!(
                "the {} and {} instruments share the pillar date {pillar}",
                ordinal(i + 1),
                ordinal(i + 2)
            )));
        }
    }
    let first = helpers[0].pillar_date();
    if first <= base_date {
        return Err(Error::Ordering(format!(
            "the 1st instrument has pillar date {first}, not after the base date {base_date}"
        )));
    }
    Ok(())
}

/// Validated market quotes, in helper order.
///
/// # Errors
/// [`Error::InvalidQuote`] naming the first helper without a usable quote.
pub(crate) fn market_quotes<H>(helpers: &[Arc<H>]) -> Result<Vec<Real>>
where
    H: CalibratingHelper + ?Sized,
{
    helpers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            h.quote().map_err(|e| {
                let reason = match e {
                    Error::InvalidQuote(msg) => msg,
                    other => other.to_string(),
                };
                Error::InvalidQuote(format!(
                    "the {} instrument (pillar {}): {reason}",
                    ordinal(i + 1),
                    h.pillar_date()
                ))
            })
        })
        .collect()
}

/// Subscribe `observer` to every helper's quote.
pub(crate) fn register_with_quotes<H>(helpers: &[Arc<H>], observer: &Weak<dyn Observer>)
where
    H: CalibratingHelper + ?Sized,
{
    for quote in helpers.iter().filter_map(|h| h.quote_handle().as_arc()) {
        quote.register_observer(observer.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_quotes::SimpleQuote;

    #[derive(Debug)]
    struct Pinned {
        pillar: Date,
        quote: Handle<dyn Quote>,
    }

    impl CalibratingHelper for Pinned {
        fn pillar_date(&self) -> Date {
            self.pillar
        }

        fn quote_handle(&self) -> &Handle<dyn Quote> {
            &self.quote
        }
    }

    fn pinned(y: u16, m: u8, d: u8, quote: SimpleQuote) -> Arc<Pinned> {
        Arc::new(Pinned {
            pillar: Date::from_ymd(y, m, d).unwrap(),
            quote: Handle::from_arc(Arc::new(quote) as Arc<dyn Quote>),
        })
    }

    #[test]
    fn helpers_sorted_by_pillar() {
        let base = Date::from_ymd(2023, 1, 1).unwrap();
        let mut helpers = vec![
            pinned(2024, 1, 2, SimpleQuote::new(0.0493)),
            pinned(2023, 2, 1, SimpleQuote::new(0.0438)),
            pinned(2023, 4, 3, SimpleQuote::new(0.0449)),
        ];
        sort_helpers(&mut helpers, base).unwrap();
        let quotes = market_quotes(&helpers).unwrap();
        assert_eq!(quotes, vec![0.0438, 0.0449, 0.0493]);
    }

    #[test]
    fn shared_pillars_are_rejected() {
        let base = Date::from_ymd(2023, 1, 1).unwrap();
        let mut helpers = vec![
            pinned(2023, 4, 3, SimpleQuote::new(0.0449)),
            pinned(2023, 2, 1, SimpleQuote::new(0.0438)),
            pinned(2023, 4, 3, SimpleQuote::new(0.0450)),
        ];
        let err = sort_helpers(&mut helpers, base).unwrap_err();
        assert!(matches!(err, Error::Ordering(_)));
        assert!(err.to_string().contains("2nd and 3rd"), "{err}");
    }

    #[test]
    fn pillar_on_base_date_is_rejected() {
        let base = Date::from_ymd(2023, 1, 1).unwrap();
        let mut helpers = vec![pinned(2023, 1, 1, SimpleQuote::new(0.04))];
        assert!(matches!(sort_helpers(&mut helpers, base), Err(Error::Ordering(_))));
        let mut none: Vec<Arc<Pinned>> = Vec::new();
        assert!(matches!(sort_helpers(&mut none, base), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn unset_quote_names_the_instrument() {
        let helpers = vec![
            pinned(2023, 2, 1, SimpleQuote::new(0.0438)),
            pinned(2023, 4, 3, SimpleQuote::empty()),
        ];
        let err = market_quotes(&helpers).unwrap_err();
        assert!(matches!(err, Error::InvalidQuote(_)));
        assert!(err.to_string().contains("2nd instrument"), "{err}");
    }
}

//! `CurveContext`: a caller-owned registry of curves.
//!
//! Holds the evaluation date and named relinkable handles for yield and
//! inflation curves.  Handles can be taken out before anything is linked
//! (a YoY helper needs its nominal curve handle at construction) and every
//! clone sees later relinks.
//!
//! The evaluation date decides which index fixings are history: an
//! observation whose period was published by then (after the index's
//! availability lag) must come from the fixings; later ones are forecast.

use crate::inflation_term_structure::{YoYInflationTermStructure, ZeroInflationTermStructure};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::errors::{Error, Result};
use ql_core::{Real, RelinkableHandle};
use ql_indexes::{Index, YoYInflationIndex, ZeroInflationIndex};
use ql_time::Date;
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluation date plus named curves.
#[derive(Debug)]
pub struct CurveContext {
    evaluation_date: Date,
    yield_curves: HashMap<String, RelinkableHandle<dyn YieldTermStructure>>,
    zero_inflation_curves: HashMap<String, RelinkableHandle<dyn ZeroInflationTermStructure>>,
    yoy_inflation_curves: HashMap<String, RelinkableHandle<dyn YoYInflationTermStructure>>,
}

impl CurveContext {
    /// An empty context valued at `evaluation_date`.
    pub fn new(evaluation_date: Date) -> Self {
        Self {
            evaluation_date,
            yield_curves: HashMap::new(),
            zero_inflation_curves: HashMap::new(),
            yoy_inflation_curves: HashMap::new(),
        }
    }

    /// The evaluation date.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
    }

    /// Move the evaluation date.  Curves already built keep their own
    /// reference dates; fixing lookups use the new date from now on.
    pub fn set_evaluation_date(&mut self, date: Date) {
        tracing::debug!(from = %self.evaluation_date, to = %date, "evaluation date moved");
        self.evaluation_date = date;
    }

    /// Handle to the yield curve called `name`, created unlinked if new.
    pub fn yield_curve(&mut self, name: &str) -> RelinkableHandle<dyn YieldTermStructure> {
        self.yield_curves.entry(name.to_owned()).or_default().clone()
    }

    /// Link `curve` under `name`.
    pub fn link_yield_curve(&mut self, name: &str, curve: Arc<dyn YieldTermStructure>) {
        self.yield_curve(name).link_to(curve);
    }

    /// Handle to the zero-inflation curve forecasting index `name`.
    pub fn zero_inflation_curve(
        &mut self,
        name: &str,
    ) -> RelinkableHandle<dyn ZeroInflationTermStructure> {
        self.zero_inflation_curves.entry(name.to_owned()).or_default().clone()
    }

    /// Link `curve` as the forecast for index `name`.
    pub fn link_zero_inflation_curve(
        &mut self,
        name: &str,
        curve: Arc<dyn ZeroInflationTermStructure>,
    ) {
        self.zero_inflation_curve(name).link_to(curve);
    }

    /// Handle to the YoY inflation curve forecasting index `name`.
    pub fn yoy_inflation_curve(
        &mut self,
        name: &str,
    ) -> RelinkableHandle<dyn YoYInflationTermStructure> {
        self.yoy_inflation_curves.entry(name.to_owned()).or_default().clone()
    }

    /// Link `curve` as the forecast for YoY index `name`.
    pub fn link_yoy_inflation_curve(
        &mut self,
        name: &str,
        curve: Arc<dyn YoYInflationTermStructure>,
    ) {
        self.yoy_inflation_curve(name).link_to(curve);
    }

    /// Discount factor at `date` on the yield curve called `name`.
    pub fn discount(&self, name: &str, date: Date) -> Result<Real> {
        self.yield_curves
            .get(name)
            .and_then(|handle| handle.with(|curve| curve.discount(date)))
            .unwrap_or_else(|| Err(Error::Evaluation(format!("no yield curve linked as {name}"))))
    }

    /// Index level observed at `date`.
    ///
    /// Observations published by the evaluation date are read from the
    /// index's fixings; later ones from the curve linked under the index's
    /// name.
    ///
    /// # Errors
    /// [`Error::Evaluation`] for a published observation with no fixing, or
    /// an unpublished one with no curve linked.
    pub fn inflation_fixing(&self, index: &ZeroInflationIndex, date: Date) -> Result<Real> {
        if index.is_published(date, self.evaluation_date)? {
            return index.past_fixing(date)?.ok_or_else(|| missing_fixing(index.name(), date));
        }
        self.zero_inflation_curves
            .get(index.name())
            .and_then(|handle| handle.with(|curve| curve.index_level(date)))
            .unwrap_or_else(|| Err(no_forecast(index.name(), date)))
    }

    /// Year-on-year rate observed at `date`, from the fixings when
    /// published by the evaluation date and from the linked curve otherwise.
    ///
    /// # Errors
    /// [`Error::Evaluation`] when the needed fixing or curve is missing.
    pub fn yoy_fixing(&self, index: &YoYInflationIndex, date: Date) -> Result<Real> {
        if index.is_published(date, self.evaluation_date)? {
            return index.past_fixing(date)?.ok_or_else(|| missing_fixing(index.name(), date));
        }
        self.yoy_inflation_curves
            .get(index.name())
            .and_then(|handle| handle.with(|curve| curve.yoy_rate(date)))
            .unwrap_or_else(|| Err(no_forecast(index.name(), date)))
    }
}

fn missing_fixing(name: &str, date: Date) -> Error {
    Error::Evaluation(format!("missing {name} fixing for {date}"))
}

fn no_forecast(name: &str, date: Date) -> Error {
    Error::Evaluation(format!("no curve linked to forecast {name} for {date}"))
}

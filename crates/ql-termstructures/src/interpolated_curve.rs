//! `InterpolatedCurve`: the node container behind every piecewise curve.
//!
//! Nodes are `(date, time, value)` triples with strictly increasing dates
//! and times.  The first node is the seed at the curve's base date (time
//! zero); the value's meaning (discount factor, zero rate, index level, ...)
//! is fixed by the [`BootstrapTraits`] parameter, which also supplies the
//! continuation used past the last node.

use crate::bootstrap_traits::BootstrapTraits;
use crate::interpolation::InterpolationBuilder;
use crate::term_structure::Extrapolation;
use ql_core::errors::{Error, Result};
use ql_core::{Real, Time};
use ql_math::{close_enough, Interpolation1D};
use ql_time::Date;
use std::marker::PhantomData;
use std::sync::Arc;

/// Ordered curve nodes plus an interpolation over them.
pub struct InterpolatedCurve<T> {
    dates: Vec<Date>,
    times: Vec<Time>,
    data: Vec<Real>,
    builder: Arc<dyn InterpolationBuilder>,
    interpolation: Option<Box<dyn Interpolation1D>>,
    _traits: PhantomData<fn() -> T>,
}

impl<T: BootstrapTraits> InterpolatedCurve<T> {
    /// A curve holding only the seed node at time zero.
    pub fn new(base_date: Date, seed: Real, builder: Arc<dyn InterpolationBuilder>) -> Self {
        Self {
            dates: vec![base_date],
            times: vec![0.0],
            data: vec![seed],
            builder,
            interpolation: None,
            _traits: PhantomData,
        }
    }

    /// Append a node after the last one.
    ///
    /// # Errors
    /// [`Error::Ordering`] unless both `date` and `time` are strictly past
    /// the last node; interpolation errors for values the scheme rejects.
    pub fn add_node(&mut self, date: Date, time: Time, value: Real) -> Result<()> {
        let last = self.dates.len() - 1;
        if date <= self.dates[last] {
            return Err(Error::Ordering(format!(
                "node date {date} is not after the previous node date {}",
                self.dates[last]
            )));
        }
        if time <= self.times[last] {
            return Err(Error::Ordering(format!(
                "node {date} maps to time {time}, not after the previous node time {}",
                self.times[last]
            )));
        }
        self.dates.push(date);
        self.times.push(time);
        self.data.push(value);
        if let Err(e) = self.refresh() {
            self.dates.pop();
            self.times.pop();
            self.data.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Move node `i` to `value`, applying the traits' tie-in rules, and
    /// rebuild the interpolation.
    pub fn update_value(&mut self, i: usize, value: Real) -> Result<()> {
        if i >= self.data.len() {
            return Err(Error::InvalidArgument(format!(
                "node {i} out of range for a curve with {} nodes",
                self.data.len()
            )));
        }
        T::update_guess(&mut self.data, value, i);
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        if self.data.len() >= 2 {
            self.interpolation = Some(self.builder.build(&self.times, &self.data)?);
        }
        Ok(())
    }

    /// Node dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Node times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Node values.
    pub fn data(&self) -> &[Real] {
        &self.data
    }

    /// `(date, value)` pairs.
    pub fn nodes(&self) -> Vec<(Date, Real)> {
        self.dates.iter().copied().zip(self.data.iter().copied()).collect()
    }

    /// Number of nodes, seed included.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false`: the seed node is present from construction.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date of the last node.
    pub fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Time of the last node.
    pub fn max_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// The interpolation, once there are at least two nodes.
    ///
    /// # Errors
    /// [`Error::Evaluation`] for a curve holding only its seed.
    pub fn interpolation(&self) -> Result<&dyn Interpolation1D> {
        self.interpolation
            .as_deref()
            .ok_or_else(|| Error::Evaluation("curve has no node past its base date".into()))
    }

    /// Value at time `t`, continuing past the last node as the traits
    /// prescribe.
    pub fn value(&self, t: Time) -> Result<Real> {
        let Some(interpolation) = self.interpolation.as_deref() else {
            if t == 0.0 {
                return Ok(self.data[0]);
            }
            return Err(Error::Evaluation("curve has no node past its base date".into()));
        };
        if t <= interpolation.x_max() {
            Ok(interpolation.operator(t))
        } else {
            Ok(T::extrapolate(interpolation, t))
        }
    }

    /// Value at time `t` under an explicit extrapolation policy.
    ///
    /// # Errors
    /// [`Error::Extrapolation`] for a negative time, or a time past the last
    /// node when extrapolation is disallowed.
    pub fn value_at(&self, t: Time, extrapolation: Extrapolation) -> Result<Real> {
        let max = self.max_time();
        if t < 0.0 {
            return Err(Error::Extrapolation(format!("negative time {t}")));
        }
        if t > max && close_enough(t, max, 1000) {
            return self.value(max);
        }
        if t > max && !extrapolation.is_allowed() {
            return Err(Error::Extrapolation(format!(
                "time {t} is past the last node at {max}"
            )));
        }
        self.value(t)
    }
}

impl<T> std::fmt::Debug for InterpolatedCurve<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolatedCurve")
            .field("dates", &self.dates)
            .field("data", &self.data)
            .field("builder", &self.builder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap_traits::{Discount, ZeroYield};
    use crate::interpolation::{Linear, LogLinear};
    use approx::assert_abs_diff_eq;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn nodes_must_move_forward() {
        let mut curve =
            InterpolatedCurve::<Discount>::new(date(2023, 1, 1), 1.0, Arc::new(LogLinear));
        curve.add_node(date(2023, 2, 1), 31.0 / 360.0, 0.996).unwrap();
        let err = curve.add_node(date(2023, 2, 1), 0.2, 0.99).unwrap_err();
        assert!(matches!(err, Error::Ordering(_)), "{err}");
        let err = curve.add_node(date(2023, 1, 15), 0.04, 0.99).unwrap_err();
        assert!(matches!(err, Error::Ordering(_)), "{err}");
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.max_date(), date(2023, 2, 1));
    }

    #[test]
    fn seed_only_curve_answers_at_time_zero() {
        let curve = InterpolatedCurve::<Discount>::new(date(2023, 1, 1), 1.0, Arc::new(LogLinear));
        assert_eq!(curve.value(0.0).unwrap(), 1.0);
        assert!(matches!(curve.value(0.5), Err(Error::Evaluation(_))));
        assert!(curve.interpolation().is_err());
    }

    #[test]
    fn extrapolation_policy_is_explicit() {
        let mut curve =
            InterpolatedCurve::<Discount>::new(date(2023, 1, 1), 1.0, Arc::new(LogLinear));
        curve.add_node(date(2024, 1, 1), 1.0, (-0.04_f64).exp()).unwrap();
        assert!(matches!(
            curve.value_at(1.5, Extrapolation::Disallowed),
            Err(Error::Extrapolation(_))
        ));
        // flat forward of 4% continues past the last node
        let df = curve.value_at(1.5, Extrapolation::Allowed).unwrap();
        assert_abs_diff_eq!(df, (-0.06_f64).exp(), epsilon = 1e-14);
        assert_abs_diff_eq!(
            curve.value_at(1.0, Extrapolation::Disallowed).unwrap(),
            (-0.04_f64).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn zero_yield_ties_first_node() {
        let mut curve =
            InterpolatedCurve::<ZeroYield>::new(date(2023, 1, 1), 0.0, Arc::new(Linear));
        curve.add_node(date(2024, 1, 1), 1.0, 0.03).unwrap();
        curve.update_value(1, 0.035).unwrap();
        assert_eq!(curve.data(), &[0.035, 0.035]);
        assert_eq!(curve.nodes()[1], (date(2024, 1, 1), 0.035));
    }
}

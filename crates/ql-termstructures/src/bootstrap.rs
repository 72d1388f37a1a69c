//! The iterative bootstrapper and its configuration.
//!
//! Nodes are solved one at a time, in pillar order.  Node `k + 1` is found
//! by a bracketed 1-D root search on
//!
//! ```text
//! f(x) = implied_quote(curve with node k+1 set to x) - quote
//! ```
//!
//! over the bounds supplied by the curve's [`BootstrapTraits`].  Solved
//! nodes are never revisited: every supported interpolation is local, so
//! moving node `k + 1` leaves the curve up to node `k` unchanged.

use crate::bootstrap_traits::BootstrapTraits;
use crate::interpolated_curve::InterpolatedCurve;
use crate::term_structure::Extrapolation;
use ql_core::errors::{ordinal, Error, Result};
use ql_core::patterns::LazyObject;
use ql_core::{Real, Time};
use ql_math::{within_tolerance, SolverKind, SolverSettings};
use ql_time::Date;
use std::sync::{PoisonError, RwLock};

// ── Configuration ─────────────────────────────────────────────────────────────

/// When a curve rebuilds after one of its quotes changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RebuildPolicy {
    /// Mark the curve stale; rebuild on the next query.
    #[default]
    Lazy,
    /// Rebuild inside the quote notification.
    Eager,
}

/// Solver and curve settings shared by all piecewise curves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapConfig {
    /// Solver accuracy on the node value.
    pub accuracy: Real,
    /// Largest accepted gap between implied and market quote, absolute for
    /// quotes up to one in magnitude and relative above.
    pub quote_tolerance: Real,
    /// Objective evaluations allowed per node.
    pub max_evaluations: usize,
    /// Root finder.
    pub solver: SolverKind,
    /// Behaviour past the last node.
    pub extrapolation: Extrapolation,
    /// Reaction to quote changes.
    pub rebuild: RebuildPolicy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            accuracy: 1.0e-12,
            quote_tolerance: 1.0e-5,
            max_evaluations: 100,
            solver: SolverKind::Brent,
            extrapolation: Extrapolation::Disallowed,
            rebuild: RebuildPolicy::Lazy,
        }
    }
}

impl BootstrapConfig {
    /// Set the solver accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the quote acceptance tolerance.
    #[must_use]
    pub fn with_quote_tolerance(mut self, tolerance: Real) -> Self {
        self.quote_tolerance = tolerance;
        self
    }

    /// Set the per-node evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Select the root finder.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Set the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Set the rebuild policy.
    #[must_use]
    pub fn with_rebuild(mut self, rebuild: RebuildPolicy) -> Self {
        self.rebuild = rebuild;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.accuracy > 0.0) || !(self.quote_tolerance > 0.0) || self.max_evaluations == 0 {
            return Err(Error::InvalidArgument(format!(
                "accuracy ({}), quote tolerance ({}) and evaluation budget ({}) must be positive",
                self.accuracy, self.quote_tolerance, self.max_evaluations
            )));
        }
        Ok(())
    }
}

// ── Curve state and report ────────────────────────────────────────────────────

/// Lifecycle of a piecewise curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveState {
    /// Nodes are missing, stale or failed to solve; queries rebuild first.
    UnderConstruction,
    /// Every helper reprices within tolerance.
    Built,
}

/// Outcome of solving one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeReport {
    /// Pillar of the helper that fixed the node.
    pub pillar: Date,
    /// Solved node value.
    pub value: Real,
    /// Objective evaluations spent.
    pub evaluations: usize,
    /// `implied_quote - quote` at the solution.
    pub residual: Real,
}

/// Outcome of a complete bootstrap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BootstrapReport {
    /// One entry per helper, in pillar order.
    pub nodes: Vec<NodeReport>,
    /// Objective evaluations over all nodes.
    pub total_evaluations: usize,
}

impl BootstrapReport {
    /// Largest absolute residual.
    pub fn max_residual(&self) -> Real {
        self.nodes.iter().map(|n| n.residual.abs()).fold(0.0, Real::max)
    }
}

// ── Shared curve machinery ────────────────────────────────────────────────────

/// The last successfully bootstrapped nodes of a piecewise curve.
#[derive(Debug)]
pub struct CurveCache<T> {
    built: RwLock<Option<(InterpolatedCurve<T>, BootstrapReport)>>,
}

impl<T: BootstrapTraits> CurveCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            built: RwLock::new(None),
        }
    }

    pub(crate) fn store(&self, curve: InterpolatedCurve<T>, report: BootstrapReport) {
        *self.built.write().unwrap_or_else(PoisonError::into_inner) = Some((curve, report));
    }

    pub(crate) fn clear(&self) {
        *self.built.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Run `f` against the stored nodes.
    pub(crate) fn read<R>(
        &self,
        f: impl FnOnce(&InterpolatedCurve<T>, &BootstrapReport) -> Result<R>,
    ) -> Result<R> {
        let guard = self.built.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some((curve, report)) => f(curve, report),
            None => Err(Error::Evaluation("curve has not been bootstrapped".into())),
        }
    }
}

/// Inspectors shared by all bootstrapped curves.
///
/// Every inspector brings the curve up to date first, so after a quote
/// change it either reflects the new quotes or returns the bootstrap error.
pub trait PiecewiseCurve: LazyObject {
    /// Node semantics.
    type Traits: BootstrapTraits;

    /// The node store.
    fn cache(&self) -> &CurveCache<Self::Traits>;

    /// Lifecycle state, without triggering a rebuild.
    fn state(&self) -> CurveState {
        if self.is_calculated() {
            CurveState::Built
        } else {
            CurveState::UnderConstruction
        }
    }

    /// Node dates, base date first.
    fn dates(&self) -> Result<Vec<Date>> {
        self.calculate()?;
        self.cache().read(|curve, _| Ok(curve.dates().to_vec()))
    }

    /// Node times, zero first.
    fn times(&self) -> Result<Vec<Time>> {
        self.calculate()?;
        self.cache().read(|curve, _| Ok(curve.times().to_vec()))
    }

    /// Node values.
    fn data(&self) -> Result<Vec<Real>> {
        self.calculate()?;
        self.cache().read(|curve, _| Ok(curve.data().to_vec()))
    }

    /// `(date, value)` pairs.
    fn nodes(&self) -> Result<Vec<(Date, Real)>> {
        self.calculate()?;
        self.cache().read(|curve, _| Ok(curve.nodes()))
    }

    /// Solver statistics of the current build.
    fn report(&self) -> Result<BootstrapReport> {
        self.calculate()?;
        self.cache().read(|_, report| Ok(report.clone()))
    }
}

/// React to a quote notification under `policy`.
pub(crate) fn invalidate<C: LazyObject + ?Sized>(
    curve: &C,
    policy: RebuildPolicy,
    traits: &'static str,
) {
    match policy {
        RebuildPolicy::Lazy => {
            curve.update();
            tracing::debug!(traits, "quote changed, curve marked for rebuild");
        }
        RebuildPolicy::Eager => {
            tracing::debug!(traits, "quote changed, rebuilding curve");
            if let Err(e) = curve.recalculate() {
                tracing::warn!(traits, error = %e, "eager rebuild failed");
            }
        }
    }
}

// ── The bootstrap loop ────────────────────────────────────────────────────────

/// One calibration target: where the node goes and the quote to hit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pillar {
    pub(crate) date: Date,
    pub(crate) time: Time,
    pub(crate) quote: Real,
}

/// Append and solve one node per pillar.
///
/// `curve` must hold only its seed.  `implied(k, curve)` values the `k`-th
/// helper against the nodes solved so far plus the candidate.
pub(crate) fn iterative_bootstrap<T, F>(
    curve: &mut InterpolatedCurve<T>,
    pillars: &[Pillar],
    config: &BootstrapConfig,
    mut implied: F,
) -> Result<BootstrapReport>
where
    T: BootstrapTraits,
    F: FnMut(usize, &InterpolatedCurve<T>) -> Result<Real>,
{
    config.validate()?;
    let mut report = BootstrapReport::default();

    for (k, pillar) in pillars.iter().enumerate() {
        let i = k + 1;
        let failure = |e: Error| -> Error {
            let err = match e {
                Error::Evaluation(msg) => Error::Evaluation(format!(
                    "the {} instrument (pillar {}): {msg}",
                    ordinal(i),
                    pillar.date
                )),
                other => Error::Bootstrap {
                    position: k,
                    pillar: pillar.date.to_string(),
                    quote: pillar.quote,
                    reason: other.to_string(),
                },
            };
            tracing::warn!(
                traits = T::NAME,
                helper = i,
                pillar = %pillar.date,
                quote = pillar.quote,
                error = %err,
                "bootstrap failed"
            );
            err
        };

        let previous = curve.data()[k];
        curve.add_node(pillar.date, pillar.time, previous)?;
        let (guess, min, max) = {
            let (times, data) = (curve.times(), curve.data());
            (
                T::guess(i, times, data),
                T::min_value_after(i, times, data),
                T::max_value_after(i, times, data),
            )
        };
        let guess = guess.clamp(min, max);
        curve.update_value(i, guess).map_err(failure)?;

        let settings = SolverSettings {
            max_evaluations: config.max_evaluations,
            lower_bound: Some(min),
            upper_bound: Some(max),
        };
        let solution = config
            .solver
            .solve_bracketed(
                settings,
                |x| {
                    curve.update_value(i, x)?;
                    Ok(implied(k, curve)? - pillar.quote)
                },
                config.accuracy,
                guess,
                min,
                max,
            )
            .map_err(failure)?;

        curve.update_value(i, solution.root).map_err(failure)?;
        let implied_quote = implied(k, curve).map_err(failure)?;
        let residual = implied_quote - pillar.quote;
        if !within_tolerance(implied_quote, pillar.quote, config.quote_tolerance) {
            return Err(failure(Error::Convergence(format!(
                "implied quote {implied_quote} misses the market quote by {residual:e} \
                 after {} evaluations",
                solution.evaluations
            ))));
        }

        tracing::debug!(
            traits = T::NAME,
            helper = i,
            pillar = %pillar.date,
            value = solution.root,
            evaluations = solution.evaluations,
            residual,
            "node solved"
        );
        report.total_evaluations += solution.evaluations;
        report.nodes.push(NodeReport {
            pillar: pillar.date,
            value: solution.root,
            evaluations: solution.evaluations,
            residual,
        });
    }

    tracing::info!(
        traits = T::NAME,
        nodes = report.nodes.len(),
        evaluations = report.total_evaluations,
        "curve bootstrapped"
    );
    Ok(report)
}

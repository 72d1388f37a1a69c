//! Inflation indexes.
//!
//! A price index publishes one fixing per inflation period (usually a
//! month).  Fixings are stored at the start of their period; a lookup for
//! any date inside the period returns that fixing, or, for interpolated
//! indexes, blends linearly towards the next period's fixing.

use crate::index::{FixingStore, Index};
use ql_core::errors::Result;
use ql_core::Real;
use ql_time::{inflation_period, Date, Frequency, Period, TimeUnit};

/// The fixing for `date` read from `store`, or `None` when a required
/// period fixing is missing.
fn period_fixing(
    store: &FixingStore,
    frequency: Frequency,
    interpolated: bool,
    date: Date,
) -> Result<Option<Real>> {
    let (start, end) = inflation_period(date, frequency)?;
    let Some(first) = store.get(start) else {
        return Ok(None);
    };
    if !interpolated || date == start {
        return Ok(Some(first));
    }
    let next_start = end.succ()?;
    let Some(second) = store.get(next_start) else {
        return Ok(None);
    };
    let weight = (date - start) as Real / (next_start - start) as Real;
    Ok(Some(first + (second - first) * weight))
}

/// Whether the fixing observed at `date` is published as of `as_of`: every
/// period it reads must start no later than the period containing
/// `as_of - availability_lag`.
fn is_published(
    frequency: Frequency,
    interpolated: bool,
    availability_lag: Period,
    date: Date,
    as_of: Date,
) -> Result<bool> {
    let (start, end) = inflation_period(date, frequency)?;
    let needed = if interpolated && date != start { end.succ()? } else { start };
    let (last_published, _) = inflation_period(as_of.sub_period(availability_lag)?, frequency)?;
    Ok(needed <= last_published)
}

// ── ZeroInflationIndex ────────────────────────────────────────────────────────

/// A price index such as UK RPI, EU HICP or US CPI.
#[derive(Debug, Clone)]
pub struct ZeroInflationIndex {
    name: String,
    frequency: Frequency,
    availability_lag: Period,
    interpolated: bool,
    fixings: FixingStore,
}

impl ZeroInflationIndex {
    /// Create a new price index with no fixings.
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        availability_lag: Period,
        interpolated: bool,
    ) -> Self {
        Self {
            name: name.into(),
            frequency,
            availability_lag,
            interpolated,
            fixings: FixingStore::new(),
        }
    }

    /// Publication frequency (typically Monthly).
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Delay between the end of a period and publication of its fixing.
    pub fn availability_lag(&self) -> Period {
        self.availability_lag
    }

    /// Whether fixings are interpolated within a period.
    pub fn interpolated(&self) -> bool {
        self.interpolated
    }

    /// First and last day of the inflation period containing `date`.
    pub fn period(&self, date: Date) -> Result<(Date, Date)> {
        inflation_period(date, self.frequency)
    }

    /// Historical index level observed at `date`, if published.
    pub fn past_fixing(&self, date: Date) -> Result<Option<Real>> {
        period_fixing(&self.fixings, self.frequency, self.interpolated, date)
    }

    /// Whether the level observed at `date` has been published by `as_of`,
    /// given the availability lag.
    pub fn is_published(&self, date: Date, as_of: Date) -> Result<bool> {
        is_published(self.frequency, self.interpolated, self.availability_lag, date, as_of)
    }
}

impl Index for ZeroInflationIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn fixing_store(&self) -> &FixingStore {
        &self.fixings
    }

    /// Fixings apply to their whole period and are stored at its start.
    fn add_fixing(&self, date: Date, value: Real) -> Result<()> {
        let (start, _) = self.period(date)?;
        self.fixings.add(start, value)
    }
}

// ── YoYInflationIndex ─────────────────────────────────────────────────────────

/// A year-on-year inflation rate.
///
/// Either derived as `I(d) / I(d - 1Y) - 1` from a price index, or quoted
/// directly with its own fixings.
#[derive(Debug, Clone)]
pub struct YoYInflationIndex {
    name: String,
    frequency: Frequency,
    availability_lag: Period,
    interpolated: bool,
    underlying: Option<ZeroInflationIndex>,
    fixings: FixingStore,
}

impl YoYInflationIndex {
    /// Year-on-year ratio of a price index, sharing its conventions.
    pub fn ratio(underlying: ZeroInflationIndex) -> Self {
        Self {
            name: format!("YY{}", underlying.name()),
            frequency: underlying.frequency(),
            availability_lag: underlying.availability_lag(),
            interpolated: underlying.interpolated(),
            underlying: Some(underlying),
            fixings: FixingStore::new(),
        }
    }

    /// A directly quoted year-on-year rate.
    pub fn quoted(
        name: impl Into<String>,
        frequency: Frequency,
        availability_lag: Period,
        interpolated: bool,
    ) -> Self {
        Self {
            name: name.into(),
            frequency,
            availability_lag,
            interpolated,
            underlying: None,
            fixings: FixingStore::new(),
        }
    }

    /// The price index this rate is derived from, if any.
    pub fn underlying(&self) -> Option<&ZeroInflationIndex> {
        self.underlying.as_ref()
    }

    /// Publication frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Publication lag.
    pub fn availability_lag(&self) -> Period {
        self.availability_lag
    }

    /// Whether fixings are interpolated within a period.
    pub fn interpolated(&self) -> bool {
        self.interpolated
    }

    /// Historical year-on-year rate observed at `date`, if available.
    pub fn past_fixing(&self, date: Date) -> Result<Option<Real>> {
        match &self.underlying {
            Some(index) => {
                let year_ago = date.advance(-1, TimeUnit::Years)?;
                match (index.past_fixing(date)?, index.past_fixing(year_ago)?) {
                    (Some(now), Some(then)) => Ok(Some(now / then - 1.0)),
                    _ => Ok(None),
                }
            }
            None => period_fixing(&self.fixings, self.frequency, self.interpolated, date),
        }
    }

    /// Whether the rate observed at `date` has been published by `as_of`.
    pub fn is_published(&self, date: Date, as_of: Date) -> Result<bool> {
        is_published(self.frequency, self.interpolated, self.availability_lag, date, as_of)
    }
}

impl Index for YoYInflationIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn fixing_store(&self) -> &FixingStore {
        self.underlying
            .as_ref()
            .map_or(&self.fixings, |index| index.fixing_store())
    }

    fn add_fixing(&self, date: Date, value: Real) -> Result<()> {
        match &self.underlying {
            Some(index) => index.add_fixing(date, value),
            None => {
                let (start, _) = inflation_period(date, self.frequency)?;
                self.fixings.add(start, value)
            }
        }
    }
}

// ── Convenience constructors ──────────────────────────────────────────────────

/// UK Retail Price Index.
pub fn uk_rpi() -> ZeroInflationIndex {
    ZeroInflationIndex::new("UKRPI", Frequency::Monthly, Period::new(1, TimeUnit::Months), false)
}

/// Eurozone HICP ex-tobacco.
pub fn eu_hicp() -> ZeroInflationIndex {
    ZeroInflationIndex::new("EUHICPXT", Frequency::Monthly, Period::new(1, TimeUnit::Months), false)
}

/// US CPI for all urban consumers.
pub fn us_cpi() -> ZeroInflationIndex {
    ZeroInflationIndex::new("USCPI", Frequency::Monthly, Period::new(1, TimeUnit::Months), false)
}

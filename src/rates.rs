//! Rate handling: percentage normalization, annual to monthly conversion,
//! reference-rate sources and the regressive income-tax bracket applied to
//! fixed-income yield.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Converts a whole-number percentage (e.g. 12.5) into a decimal rate (0.125).
pub fn percent_to_decimal(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Normalizes an annual interest rate percentage to a monthly decimal rate.
///
/// A rate like 10.5% per year becomes its compound-equivalent monthly rate,
/// `(1 + 0.105)^(1/12) - 1`. This is the converter the presenting layer feeds
/// with a benchmark rate it fetched on its own.
pub fn normalize_annual_interest_rate(annual_percent: Decimal) -> Decimal {
    let base = Decimal::ONE + percent_to_decimal(annual_percent);
    let exponent = Decimal::ONE / dec!(12);

    base.powd(exponent) - Decimal::ONE
}

/// The period a nominal rate is quoted over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodBasis {
    #[default]
    Monthly,
    Annual,
}

/// A rate as the user typed it, plus whether income tax eats into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSpec {
    /// The rate as a percentage (e.g., 0.9 for 0.9%).
    pub nominal_rate_percent: Decimal,
    /// Whether the percentage is monthly or annual.
    #[serde(default)]
    pub period_basis: PeriodBasis,
    /// Reduce the rate by the income-tax bracket of the holding period.
    #[serde(default)]
    pub consider_income_tax: bool,
}

impl RateSpec {
    pub fn monthly(nominal_rate_percent: Decimal) -> Self {
        Self {
            nominal_rate_percent,
            period_basis: PeriodBasis::Monthly,
            consider_income_tax: false,
        }
    }

    pub fn annual(nominal_rate_percent: Decimal) -> Self {
        Self {
            nominal_rate_percent,
            period_basis: PeriodBasis::Annual,
            consider_income_tax: false,
        }
    }

    pub fn with_income_tax(mut self, consider_income_tax: bool) -> Self {
        self.consider_income_tax = consider_income_tax;
        self
    }

    /// The effective monthly rate as a decimal, before any tax adjustment.
    pub fn monthly_rate(&self) -> Decimal {
        match self.period_basis {
            PeriodBasis::Monthly => percent_to_decimal(self.nominal_rate_percent),
            PeriodBasis::Annual => normalize_annual_interest_rate(self.nominal_rate_percent),
        }
    }

    /// The monthly rate after the income-tax bracket for `periods` months.
    pub fn net_monthly_rate(&self, periods: u32) -> Decimal {
        adjust_for_tax(self.monthly_rate(), periods, self.consider_income_tax)
    }
}

/// Public reference rates a presenting layer may fetch and pass in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    /// Central bank policy rate, quoted per year.
    Selic,
    /// Interbank deposit rate, quoted per year.
    Cdi,
    /// Consumer price inflation over the last twelve months.
    Ipca,
}

/// Where a scenario's rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RateSource {
    Manual(RateSpec),
    /// An already-resolved benchmark figure; fetching it is not our job.
    Reference {
        benchmark: Benchmark,
        annual_percent: Decimal,
        #[serde(default)]
        consider_income_tax: bool,
    },
}

impl RateSource {
    pub fn resolve(&self) -> RateSpec {
        match *self {
            RateSource::Manual(spec) => spec,
            RateSource::Reference {
                annual_percent,
                consider_income_tax,
                ..
            } => RateSpec::annual(annual_percent).with_income_tax(consider_income_tax),
        }
    }
}

impl From<RateSpec> for RateSource {
    fn from(spec: RateSpec) -> Self {
        RateSource::Manual(spec)
    }
}

/// Regressive withholding-tax brackets for fixed income, by holding period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTaxBracket {
    UpToSixMonths,
    UpToOneYear,
    UpToTwoYears,
    OverTwoYears,
}

impl IncomeTaxBracket {
    pub fn for_holding_months(months: u32) -> Self {
        match months {
            0..=6 => IncomeTaxBracket::UpToSixMonths,
            7..=12 => IncomeTaxBracket::UpToOneYear,
            13..=24 => IncomeTaxBracket::UpToTwoYears,
            _ => IncomeTaxBracket::OverTwoYears,
        }
    }

    /// Share of the yield withheld as tax.
    pub fn withheld_fraction(&self) -> Decimal {
        match self {
            IncomeTaxBracket::UpToSixMonths => dec!(0.225),
            IncomeTaxBracket::UpToOneYear => dec!(0.20),
            IncomeTaxBracket::UpToTwoYears => dec!(0.175),
            IncomeTaxBracket::OverTwoYears => dec!(0.15),
        }
    }

    /// Share of the yield the investor keeps.
    pub fn retained_fraction(&self) -> Decimal {
        Decimal::ONE - self.withheld_fraction()
    }
}

/// Applies the income-tax bracket for `periods` months to a monthly rate.
///
/// `periods` stands in for how long the money stays invested. Callers
/// guarantee `periods >= 1`; the scenario evaluators check it first.
pub fn adjust_for_tax(monthly_rate: Decimal, periods: u32, consider_tax: bool) -> Decimal {
    if !consider_tax {
        return monthly_rate;
    }

    monthly_rate * IncomeTaxBracket::for_holding_months(periods).retained_fraction()
}

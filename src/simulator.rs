//! Month-by-month simulation of money that stays invested while installments
//! are being paid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CalcError, CalcResult, checked};

/// One period of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The 1-based period number.
    pub period: u32,
    /// Balance at the start of the period, on which the yield is earned.
    pub opening_balance: Decimal,
    /// Yield earned during the period.
    pub period_yield: Decimal,
    /// What left the balance this period.
    pub amount_paid: Decimal,
    /// Balance carried into the next period.
    pub closing_balance: Decimal,
}

/// Result of [`simulate_yield`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldSimulation {
    /// Sum of every period's yield.
    pub total_yield: Decimal,
    /// One row per period, in order.
    pub ledger: Vec<LedgerRow>,
}

impl YieldSimulation {
    /// Closing balance of the last period, or `None` for an empty ledger.
    pub fn closing_balance(&self) -> Option<Decimal> {
        self.ledger.last().map(|row| row.closing_balance)
    }
}

/// Result of [`simulate_reinvestment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinvestmentSimulation {
    pub total_yield: Decimal,
    /// Balance left after the last installment; negative when it ran out.
    pub final_balance: Decimal,
    pub ledger: Vec<LedgerRow>,
}

/// Overflow anywhere in a simulation is blamed on the installment count, the
/// input that stretches the balance over enough periods to leave `Decimal`.
const OVERFLOW_FIELD: &str = "installments";

fn ensure_periods(periods: u32) -> CalcResult<()> {
    if periods == 0 {
        return Err(CalcError::precondition("installments", "must be at least 1"));
    }
    Ok(())
}

/// Yield earned on the part of an installment plan not yet paid out.
///
/// The invested capital starts at the whole obligation (`periodic_payment * periods`).
/// Each period earns `monthly_rate` on its opening balance, then one payment leaves.
///
/// # Errors
///
/// Returns a precondition error if `periods` is zero and an overflow error if
/// the obligation or the accumulated yield leaves the decimal range.
pub fn simulate_yield(
    periods: u32,
    periodic_payment: Decimal,
    monthly_rate: Decimal,
) -> CalcResult<YieldSimulation> {
    ensure_periods(periods)?;
    let capital = checked(
        periodic_payment.checked_mul(Decimal::from(periods)),
        OVERFLOW_FIELD,
    )?;
    simulate_yield_from(capital, 1, periods, periodic_payment, monthly_rate)
}

/// Continues a yield simulation from an arbitrary opening balance.
///
/// Feeding the closing balance of a ledger row back in with the following
/// period number reproduces the rest of the original trajectory.
///
/// # Errors
///
/// Returns a precondition error if `periods` or `first_period` is zero, or if
/// the last period number would not fit in a `u32`. Returns an overflow error
/// if a balance leaves the decimal range.
pub fn simulate_yield_from(
    opening_balance: Decimal,
    first_period: u32,
    periods: u32,
    periodic_payment: Decimal,
    monthly_rate: Decimal,
) -> CalcResult<YieldSimulation> {
    ensure_periods(periods)?;
    if first_period == 0 {
        return Err(CalcError::precondition("first_period", "must be at least 1"));
    }
    let last_period = first_period.checked_add(periods - 1).ok_or_else(|| {
        CalcError::precondition("first_period", "leaves no room for the requested periods")
    })?;

    let mut capital = opening_balance;
    let mut total_yield = Decimal::ZERO;
    let mut ledger = Vec::with_capacity(periods as usize);

    for period in first_period..=last_period {
        let period_yield = checked(capital.checked_mul(monthly_rate), OVERFLOW_FIELD)?;
        total_yield = checked(total_yield.checked_add(period_yield), OVERFLOW_FIELD)?;
        let closing_balance = checked(capital.checked_sub(periodic_payment), OVERFLOW_FIELD)?;

        trace!(period, %capital, %period_yield, %closing_balance, "yield period");
        ledger.push(LedgerRow {
            period,
            opening_balance: capital,
            period_yield,
            amount_paid: periodic_payment,
            closing_balance,
        });
        capital = closing_balance;
    }

    Ok(YieldSimulation {
        total_yield,
        ledger,
    })
}

/// Running balance of money kept invested instead of paying upfront.
///
/// Starting from `opening_balance`, each period earns `monthly_rate` on its
/// opening balance and then pays `payment`; `upfront_payment` also leaves in
/// period 1. The balance may go negative, meaning the investment did not
/// cover the installments.
///
/// # Errors
///
/// Returns a precondition error if `periods` is zero and an overflow error if
/// the balance compounds beyond the decimal range.
pub fn simulate_reinvestment(
    opening_balance: Decimal,
    periods: u32,
    payment: Decimal,
    monthly_rate: Decimal,
    upfront_payment: Decimal,
) -> CalcResult<ReinvestmentSimulation> {
    ensure_periods(periods)?;

    let mut balance = opening_balance;
    let mut total_yield = Decimal::ZERO;
    let mut ledger = Vec::with_capacity(periods as usize);

    for period in 1..=periods {
        let period_yield = checked(balance.checked_mul(monthly_rate), OVERFLOW_FIELD)?;
        let amount_paid = if period == 1 {
            checked(payment.checked_add(upfront_payment), OVERFLOW_FIELD)?
        } else {
            payment
        };
        let grown = checked(balance.checked_add(period_yield), OVERFLOW_FIELD)?;
        let closing_balance = checked(grown.checked_sub(amount_paid), OVERFLOW_FIELD)?;
        total_yield = checked(total_yield.checked_add(period_yield), OVERFLOW_FIELD)?;

        trace!(period, %balance, %period_yield, %closing_balance, "reinvestment period");
        ledger.push(LedgerRow {
            period,
            opening_balance: balance,
            period_yield,
            amount_paid,
            closing_balance,
        });
        balance = closing_balance;
    }

    Ok(ReinvestmentSimulation {
        total_yield,
        final_balance: balance,
        ledger,
    })
}

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, checked};

/// How interest on an installment plan accrues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMode {
    Simple,
    #[default]
    Compound,
}

/// Total owed after `periods` of interest at `periodic_rate` (a decimal, not a percentage).
///
/// * `Simple`: `P * (1 + r * n)`
/// * `Compound`: `P * (1 + r)^n`
///
/// # Errors
///
/// Returns an overflow error, attributed to `installment_interest`, when the
/// accrued total no longer fits in a `Decimal`.
pub fn accrue_installment_total(
    principal: Decimal,
    periods: u32,
    periodic_rate: Decimal,
    mode: InterestMode,
) -> CalcResult<Decimal> {
    const FIELD: &str = "installment_interest";

    let factor = match mode {
        InterestMode::Simple => {
            let accrued = checked(periodic_rate.checked_mul(Decimal::from(periods)), FIELD)?;
            checked(Decimal::ONE.checked_add(accrued), FIELD)?
        }
        InterestMode::Compound => checked(
            (Decimal::ONE + periodic_rate).checked_powu(periods.into()),
            FIELD,
        )?,
    };

    checked(principal.checked_mul(factor), FIELD)
}

//! The seven purchase scenarios and the evaluator that runs them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcError, CalcResult, ValidationReason, checked};
use crate::interest::{InterestMode, accrue_installment_total};
use crate::rates::{RateSpec, percent_to_decimal};
use crate::settings::Settings;
use crate::simulator::{LedgerRow, simulate_reinvestment, simulate_yield};

/// Keys used in [`ScenarioResult::summary`].
pub mod labels {
    pub const CASH_PRICE: &str = "cash_price";
    pub const DOWN_PAYMENT: &str = "down_payment";
    pub const INSTALLMENT_TOTAL: &str = "installment_total";
    pub const MONTHLY_INSTALLMENT: &str = "monthly_installment";
    pub const TOTAL_YIELD: &str = "total_yield";
    pub const EFFECTIVE_INSTALLMENT_COST: &str = "effective_installment_cost";
    pub const FINAL_BALANCE: &str = "final_balance";
    pub const DIFFERENCE: &str = "difference";
    pub const TOTAL_A: &str = "total_a";
    pub const TOTAL_B: &str = "total_b";
    pub const ORIGINAL_AMOUNT: &str = "original_amount";
    pub const PENALTY_AMOUNT: &str = "penalty_amount";
    pub const LATE_INTEREST_AMOUNT: &str = "late_interest_amount";
    pub const CORRECTED_AMOUNT: &str = "corrected_amount";
    pub const NOMINAL_TOTAL: &str = "nominal_total";
    pub const PRESENT_VALUE: &str = "present_value";
    pub const INFLATION_LOSS: &str = "inflation_loss";
}

/// The seven comparisons the calculator offers, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    TotalWithDiscount,
    CashVsInstallments,
    DownPayment,
    TwoPlans,
    LatePayment,
    PresentValue,
    AlternativeInvestment,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 7] = [
        ScenarioKind::TotalWithDiscount,
        ScenarioKind::CashVsInstallments,
        ScenarioKind::DownPayment,
        ScenarioKind::TwoPlans,
        ScenarioKind::LatePayment,
        ScenarioKind::PresentValue,
        ScenarioKind::AlternativeInvestment,
    ];

    /// The 1-based option number shown in the calculator menu.
    pub fn code(&self) -> u8 {
        match self {
            ScenarioKind::TotalWithDiscount => 1,
            ScenarioKind::CashVsInstallments => 2,
            ScenarioKind::DownPayment => 3,
            ScenarioKind::TwoPlans => 4,
            ScenarioKind::LatePayment => 5,
            ScenarioKind::PresentValue => 6,
            ScenarioKind::AlternativeInvestment => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// Which way the comparison went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Paying upfront costs less.
    PayUpfront,
    /// Pay in installments (keeping the rest invested where applicable).
    Installment,
    /// The first of two installment plans costs less.
    OptionA,
    /// The second plan costs less, or both cost the same.
    OptionB,
}

/// Interest the seller charges on the installment plan itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentInterest {
    /// Periodic rate as a percentage.
    pub rate_percent: Decimal,
    /// Simple or compound accrual; compound when omitted.
    #[serde(default)]
    pub mode: InterestMode,
}

/// Scenario 1: a total price with an optional upfront discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalWithDiscountInput {
    /// The list price, paid in full when buying in installments.
    pub total_price: Decimal,
    /// The number of monthly installments.
    pub installments: u32,
    /// What the money not yet paid out earns meanwhile.
    pub yield_rate: RateSpec,
    /// Discount for paying upfront, as a percentage.
    #[serde(default)]
    pub cash_discount_percent: Decimal,
    /// Interest the seller adds to the installment plan, if any.
    #[serde(default)]
    pub installment_interest: Option<InstallmentInterest>,
}

/// Scenario 2: a fixed upfront price against fixed installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashVsInstallmentsInput {
    /// The price when paying everything upfront.
    pub cash_price: Decimal,
    /// The number of monthly installments.
    pub installments: u32,
    /// The amount of each installment.
    pub installment_amount: Decimal,
    /// What the money not yet paid out earns meanwhile.
    pub yield_rate: RateSpec,
}

/// Scenario 3: a down payment plus installments, reinvesting the cash price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownPaymentInput {
    /// The price when paying everything upfront; this is what gets invested.
    pub cash_price: Decimal,
    /// Paid out of the investment in the first month.
    pub down_payment: Decimal,
    /// The number of monthly installments after the down payment.
    pub installments: u32,
    /// The amount of each installment.
    pub installment_amount: Decimal,
    /// What the invested cash price earns.
    pub yield_rate: RateSpec,
}

/// Scenario 4: two installment plans, no rates involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoPlansInput {
    /// The number of installments in plan A.
    pub installments_a: u32,
    /// The amount of each installment in plan A.
    pub amount_a: Decimal,
    /// The number of installments in plan B.
    pub installments_b: u32,
    /// The amount of each installment in plan B.
    pub amount_b: Decimal,
}

/// Scenario 5: a late installment with a flat penalty and daily interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatePaymentInput {
    /// The installment as it was due.
    pub original_amount: Decimal,
    /// Days past the due date.
    pub days_late: u32,
    /// Flat late fee, as a percentage of the original amount.
    pub penalty_percent: Decimal,
    /// Interest per day late, as a percentage of the original amount.
    pub daily_interest_percent: Decimal,
}

/// Scenario 6: installments discounted by inflation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentValueInput {
    /// The number of monthly installments.
    pub installments: u32,
    /// The nominal amount of each installment.
    pub installment_amount: Decimal,
    /// Income tax does not apply to inflation; the flag is ignored here.
    pub inflation: RateSpec,
    /// When given, the present value is compared against this upfront price.
    #[serde(default)]
    pub cash_price: Option<Decimal>,
}

/// Scenario 7: invest the cash price and pay the installments out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeInvestmentInput {
    /// The price when paying everything upfront; this is what gets invested.
    pub cash_price: Decimal,
    /// The number of monthly installments.
    pub installments: u32,
    /// The amount of each installment.
    pub installment_amount: Decimal,
    /// What the invested cash price earns, before income tax.
    pub yield_rate: RateSpec,
}

/// The input record of one scenario, tagged by `scenario` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum ScenarioInput {
    TotalWithDiscount(TotalWithDiscountInput),
    CashVsInstallments(CashVsInstallmentsInput),
    DownPayment(DownPaymentInput),
    TwoPlans(TwoPlansInput),
    LatePayment(LatePaymentInput),
    PresentValue(PresentValueInput),
    AlternativeInvestment(AlternativeInvestmentInput),
}

impl ScenarioInput {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            ScenarioInput::TotalWithDiscount(_) => ScenarioKind::TotalWithDiscount,
            ScenarioInput::CashVsInstallments(_) => ScenarioKind::CashVsInstallments,
            ScenarioInput::DownPayment(_) => ScenarioKind::DownPayment,
            ScenarioInput::TwoPlans(_) => ScenarioKind::TwoPlans,
            ScenarioInput::LatePayment(_) => ScenarioKind::LatePayment,
            ScenarioInput::PresentValue(_) => ScenarioKind::PresentValue,
            ScenarioInput::AlternativeInvestment(_) => ScenarioKind::AlternativeInvestment,
        }
    }
}

/// Everything a presenting layer needs to render one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// The scenario that produced this result.
    pub kind: ScenarioKind,
    /// Monetary figures keyed by the constants in [`labels`], rounded per [`Settings`].
    pub summary: BTreeMap<String, Decimal>,
    /// Month-by-month detail; empty for the formula-only scenarios.
    pub ledger: Vec<LedgerRow>,
    /// `None` when the scenario computes a figure without comparing options.
    pub verdict: Option<Verdict>,
}

impl ScenarioResult {
    pub fn summary_value(&self, label: &str) -> Option<Decimal> {
        self.summary.get(label).copied()
    }
}

/// Runs scenarios under a given [`Settings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    settings: Settings,
}

impl Evaluator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn evaluate(&self, input: &ScenarioInput) -> CalcResult<ScenarioResult> {
        debug!(kind = ?input.kind(), "evaluating scenario");
        let result = match input {
            ScenarioInput::TotalWithDiscount(input) => self.compare_total_with_discount(input),
            ScenarioInput::CashVsInstallments(input) => self.compare_cash_with_installments(input),
            ScenarioInput::DownPayment(input) => self.compare_down_payment(input),
            ScenarioInput::TwoPlans(input) => self.compare_installment_plans(input),
            ScenarioInput::LatePayment(input) => self.late_payment_correction(input),
            ScenarioInput::PresentValue(input) => self.present_value_under_inflation(input),
            ScenarioInput::AlternativeInvestment(input) => {
                self.compare_alternative_investment(input)
            }
        };
        if let Err(err) = &result {
            debug!(kind = ?input.kind(), error = %err, "scenario rejected");
        }
        result
    }

    /// Scenario 1: discounted upfront price against the installment total
    /// minus what the unpaid balance would have earned.
    pub fn compare_total_with_discount(
        &self,
        input: &TotalWithDiscountInput,
    ) -> CalcResult<ScenarioResult> {
        ensure_installments("installments", input.installments)?;
        self.non_negative("total_price", input.total_price)?;
        self.non_negative("cash_discount_percent", input.cash_discount_percent)?;
        self.non_negative_rate("yield_rate", &input.yield_rate)?;
        if let Some(interest) = &input.installment_interest {
            self.non_negative("installment_interest", interest.rate_percent)?;
        }

        let periods = input.installments;
        let discount = percent_to_decimal(input.cash_discount_percent);
        let cash_price = checked(
            input.total_price.checked_mul(Decimal::ONE - discount),
            "cash_discount_percent",
        )?;

        let installment_total = match &input.installment_interest {
            Some(interest) => accrue_installment_total(
                input.total_price,
                periods,
                percent_to_decimal(interest.rate_percent),
                interest.mode,
            )?,
            None => input.total_price,
        };
        let monthly_installment = installment_total / Decimal::from(periods);

        let rate = input.yield_rate.net_monthly_rate(periods);
        let simulation = simulate_yield(periods, monthly_installment, rate)?;
        let effective_cost = checked(
            installment_total.checked_sub(simulation.total_yield),
            "yield_rate",
        )?;
        let difference = checked(effective_cost.checked_sub(cash_price), "total_price")?.abs();
        let verdict = upfront_if_cheaper(cash_price, effective_cost);

        debug!(
            %cash_price,
            %installment_total,
            total_yield = %simulation.total_yield,
            ?verdict,
            "total with discount"
        );

        Ok(self.result(
            ScenarioKind::TotalWithDiscount,
            &[
                (labels::CASH_PRICE, cash_price),
                (labels::INSTALLMENT_TOTAL, installment_total),
                (labels::MONTHLY_INSTALLMENT, monthly_installment),
                (labels::TOTAL_YIELD, simulation.total_yield),
                (labels::EFFECTIVE_INSTALLMENT_COST, effective_cost),
                (labels::DIFFERENCE, difference),
            ],
            simulation.ledger,
            Some(verdict),
        ))
    }

    /// Scenario 2: fixed upfront price against fixed installments net of yield.
    pub fn compare_cash_with_installments(
        &self,
        input: &CashVsInstallmentsInput,
    ) -> CalcResult<ScenarioResult> {
        ensure_installments("installments", input.installments)?;
        self.non_negative("cash_price", input.cash_price)?;
        self.non_negative("installment_amount", input.installment_amount)?;
        self.non_negative_rate("yield_rate", &input.yield_rate)?;

        let periods = input.installments;
        let installment_total = checked(
            input.installment_amount.checked_mul(Decimal::from(periods)),
            "installments",
        )?;
        let rate = input.yield_rate.net_monthly_rate(periods);
        let simulation = simulate_yield(periods, input.installment_amount, rate)?;
        let effective_cost = checked(
            installment_total.checked_sub(simulation.total_yield),
            "yield_rate",
        )?;
        let difference =
            checked(effective_cost.checked_sub(input.cash_price), "cash_price")?.abs();
        let verdict = upfront_if_cheaper(input.cash_price, effective_cost);

        debug!(
            cash_price = %input.cash_price,
            %installment_total,
            total_yield = %simulation.total_yield,
            ?verdict,
            "cash vs installments"
        );

        Ok(self.result(
            ScenarioKind::CashVsInstallments,
            &[
                (labels::CASH_PRICE, input.cash_price),
                (labels::INSTALLMENT_TOTAL, installment_total),
                (labels::TOTAL_YIELD, simulation.total_yield),
                (labels::EFFECTIVE_INSTALLMENT_COST, effective_cost),
                (labels::DIFFERENCE, difference),
            ],
            simulation.ledger,
            Some(verdict),
        ))
    }

    /// Scenario 3: keep the cash price invested, pay the down payment and
    /// installments out of it, and see whether the balance holds up.
    pub fn compare_down_payment(&self, input: &DownPaymentInput) -> CalcResult<ScenarioResult> {
        ensure_installments("installments", input.installments)?;
        self.non_negative("cash_price", input.cash_price)?;
        self.non_negative("down_payment", input.down_payment)?;
        self.non_negative("installment_amount", input.installment_amount)?;
        self.non_negative_rate("yield_rate", &input.yield_rate)?;

        let periods = input.installments;
        let installment_total = checked(
            input
                .installment_amount
                .checked_mul(Decimal::from(periods))
                .and_then(|installments| installments.checked_add(input.down_payment)),
            "installments",
        )?;
        let rate = input.yield_rate.net_monthly_rate(periods);
        let simulation = simulate_reinvestment(
            input.cash_price,
            periods,
            input.installment_amount,
            rate,
            input.down_payment,
        )?;
        let verdict = if simulation.final_balance >= Decimal::ZERO {
            Verdict::Installment
        } else {
            Verdict::PayUpfront
        };

        debug!(final_balance = %simulation.final_balance, ?verdict, "down payment");

        Ok(self.result(
            ScenarioKind::DownPayment,
            &[
                (labels::CASH_PRICE, input.cash_price),
                (labels::DOWN_PAYMENT, input.down_payment),
                (labels::INSTALLMENT_TOTAL, installment_total),
                (labels::TOTAL_YIELD, simulation.total_yield),
                (labels::FINAL_BALANCE, simulation.final_balance),
            ],
            simulation.ledger,
            Some(verdict),
        ))
    }

    /// Scenario 4: the plan with the smaller total wins; ties go to B.
    pub fn compare_installment_plans(&self, input: &TwoPlansInput) -> CalcResult<ScenarioResult> {
        ensure_installments("installments_a", input.installments_a)?;
        ensure_installments("installments_b", input.installments_b)?;
        self.non_negative("amount_a", input.amount_a)?;
        self.non_negative("amount_b", input.amount_b)?;

        let total_a = checked(
            input.amount_a.checked_mul(Decimal::from(input.installments_a)),
            "installments_a",
        )?;
        let total_b = checked(
            input.amount_b.checked_mul(Decimal::from(input.installments_b)),
            "installments_b",
        )?;
        let difference = checked(total_a.checked_sub(total_b), "amount_a")?.abs();
        let verdict = if total_a < total_b {
            Verdict::OptionA
        } else {
            Verdict::OptionB
        };

        debug!(%total_a, %total_b, ?verdict, "two plans");

        Ok(self.result(
            ScenarioKind::TwoPlans,
            &[
                (labels::TOTAL_A, total_a),
                (labels::TOTAL_B, total_b),
                (labels::DIFFERENCE, difference),
            ],
            Vec::new(),
            Some(verdict),
        ))
    }

    /// Scenario 5: `original * (1 + penalty + daily_interest * days_late)`.
    pub fn late_payment_correction(&self, input: &LatePaymentInput) -> CalcResult<ScenarioResult> {
        self.non_negative("original_amount", input.original_amount)?;
        self.non_negative("penalty_percent", input.penalty_percent)?;
        self.non_negative("daily_interest_percent", input.daily_interest_percent)?;

        let penalty = percent_to_decimal(input.penalty_percent);
        let daily_interest = percent_to_decimal(input.daily_interest_percent);
        let accrued_interest = checked(
            daily_interest.checked_mul(Decimal::from(input.days_late)),
            "days_late",
        )?;
        let penalty_amount =
            checked(input.original_amount.checked_mul(penalty), "penalty_percent")?;
        let interest_amount = checked(
            input.original_amount.checked_mul(accrued_interest),
            "days_late",
        )?;
        let corrected_amount = checked(
            input
                .original_amount
                .checked_add(penalty_amount)
                .and_then(|amount| amount.checked_add(interest_amount)),
            "original_amount",
        )?;

        debug!(days_late = input.days_late, %corrected_amount, "late payment");

        Ok(self.result(
            ScenarioKind::LatePayment,
            &[
                (labels::ORIGINAL_AMOUNT, input.original_amount),
                (labels::PENALTY_AMOUNT, penalty_amount),
                (labels::LATE_INTEREST_AMOUNT, interest_amount),
                (labels::CORRECTED_AMOUNT, corrected_amount),
            ],
            Vec::new(),
            None,
        ))
    }

    /// Scenario 6: `sum(amount / (1 + i)^k)` for k in 1..=installments.
    pub fn present_value_under_inflation(
        &self,
        input: &PresentValueInput,
    ) -> CalcResult<ScenarioResult> {
        ensure_installments("installments", input.installments)?;
        self.non_negative("installment_amount", input.installment_amount)?;
        self.non_negative_rate("inflation", &input.inflation)?;
        if let Some(cash_price) = input.cash_price {
            self.non_negative("cash_price", cash_price)?;
        }

        let growth = Decimal::ONE + input.inflation.monthly_rate();
        if growth <= Decimal::ZERO {
            return Err(CalcError::precondition("inflation", "must be greater than -100%"));
        }

        let mut discount = Decimal::ONE;
        let mut present_value = Decimal::ZERO;
        for _ in 0..input.installments {
            discount = checked(discount.checked_mul(growth), "inflation")?;
            let discounted = checked(input.installment_amount.checked_div(discount), "inflation")?;
            present_value = checked(present_value.checked_add(discounted), "installment_amount")?;
        }
        let nominal_total = checked(
            input
                .installment_amount
                .checked_mul(Decimal::from(input.installments)),
            "installments",
        )?;

        let mut summary = vec![
            (labels::NOMINAL_TOTAL, nominal_total),
            (labels::PRESENT_VALUE, present_value),
            (labels::INFLATION_LOSS, nominal_total - present_value),
        ];
        let verdict = input.cash_price.map(|cash_price| {
            summary.push((labels::CASH_PRICE, cash_price));
            upfront_if_cheaper(cash_price, present_value)
        });

        debug!(%present_value, ?verdict, "present value");

        Ok(self.result(ScenarioKind::PresentValue, &summary, Vec::new(), verdict))
    }

    /// Scenario 7: invest the cash price at the after-tax rate and pay each
    /// installment out of it; a positive leftover favours installments.
    pub fn compare_alternative_investment(
        &self,
        input: &AlternativeInvestmentInput,
    ) -> CalcResult<ScenarioResult> {
        ensure_installments("installments", input.installments)?;
        self.non_negative("cash_price", input.cash_price)?;
        self.non_negative("installment_amount", input.installment_amount)?;
        self.non_negative_rate("yield_rate", &input.yield_rate)?;

        let periods = input.installments;
        let rate = input.yield_rate.net_monthly_rate(periods);
        let simulation = simulate_reinvestment(
            input.cash_price,
            periods,
            input.installment_amount,
            rate,
            Decimal::ZERO,
        )?;
        let installment_total = checked(
            input.installment_amount.checked_mul(Decimal::from(periods)),
            "installments",
        )?;
        let verdict = if simulation.final_balance > Decimal::ZERO {
            Verdict::Installment
        } else {
            Verdict::PayUpfront
        };

        debug!(final_balance = %simulation.final_balance, ?verdict, "alternative investment");

        Ok(self.result(
            ScenarioKind::AlternativeInvestment,
            &[
                (labels::CASH_PRICE, input.cash_price),
                (labels::INSTALLMENT_TOTAL, installment_total),
                (labels::TOTAL_YIELD, simulation.total_yield),
                (labels::FINAL_BALANCE, simulation.final_balance),
            ],
            simulation.ledger,
            Some(verdict),
        ))
    }

    fn non_negative(&self, field: &str, value: Decimal) -> CalcResult<()> {
        if self.settings.reject_negative_amounts && value < Decimal::ZERO {
            return Err(CalcError::validation(field, ValidationReason::Negative));
        }
        Ok(())
    }

    fn non_negative_rate(&self, field: &str, rate: &RateSpec) -> CalcResult<()> {
        self.non_negative(field, rate.nominal_rate_percent)
    }

    fn result(
        &self,
        kind: ScenarioKind,
        summary: &[(&str, Decimal)],
        ledger: Vec<LedgerRow>,
        verdict: Option<Verdict>,
    ) -> ScenarioResult {
        let dp = self.settings.summary_decimal_places;
        ScenarioResult {
            kind,
            summary: summary
                .iter()
                .map(|(label, value)| (label.to_string(), value.round_dp(dp)))
                .collect(),
            ledger,
            verdict,
        }
    }
}

fn ensure_installments(field: &str, installments: u32) -> CalcResult<()> {
    if installments == 0 {
        return Err(CalcError::precondition(field, "must be at least 1"));
    }
    Ok(())
}

fn upfront_if_cheaper(cash_price: Decimal, installment_cost: Decimal) -> Verdict {
    if cash_price < installment_cost {
        Verdict::PayUpfront
    } else {
        Verdict::Installment
    }
}

pub fn compare_total_with_discount(input: &TotalWithDiscountInput) -> CalcResult<ScenarioResult> {
    Evaluator::default().compare_total_with_discount(input)
}

pub fn compare_cash_with_installments(
    input: &CashVsInstallmentsInput,
) -> CalcResult<ScenarioResult> {
    Evaluator::default().compare_cash_with_installments(input)
}

pub fn compare_down_payment(input: &DownPaymentInput) -> CalcResult<ScenarioResult> {
    Evaluator::default().compare_down_payment(input)
}

pub fn compare_installment_plans(input: &TwoPlansInput) -> CalcResult<ScenarioResult> {
    Evaluator::default().compare_installment_plans(input)
}

pub fn late_payment_correction(input: &LatePaymentInput) -> CalcResult<ScenarioResult> {
    Evaluator::default().late_payment_correction(input)
}

pub fn present_value_under_inflation(input: &PresentValueInput) -> CalcResult<ScenarioResult> {
    Evaluator::default().present_value_under_inflation(input)
}

pub fn compare_alternative_investment(
    input: &AlternativeInvestmentInput,
) -> CalcResult<ScenarioResult> {
    Evaluator::default().compare_alternative_investment(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_with_discount_favours_upfront() {
        let input = TotalWithDiscountInput {
            total_price: dec!(1200),
            installments: 12,
            yield_rate: RateSpec::monthly(dec!(1)),
            cash_discount_percent: dec!(10),
            installment_interest: None,
        };

        let result = compare_total_with_discount(&input).unwrap();

        // yield = 100 * 0.01 * (12 + 11 + ... + 1) = 78
        assert_eq!(result.summary_value(labels::CASH_PRICE), Some(dec!(1080.00)));
        assert_eq!(result.summary_value(labels::TOTAL_YIELD), Some(dec!(78.00)));
        assert_eq!(
            result.summary_value(labels::EFFECTIVE_INSTALLMENT_COST),
            Some(dec!(1122.00))
        );
        assert_eq!(result.ledger.len(), 12);
        assert_eq!(result.verdict, Some(Verdict::PayUpfront));
    }

    #[test]
    fn test_total_with_discount_without_discount_favours_installments() {
        let input = TotalWithDiscountInput {
            total_price: dec!(1200),
            installments: 12,
            yield_rate: RateSpec::monthly(dec!(1)).with_income_tax(true),
            cash_discount_percent: Decimal::ZERO,
            installment_interest: None,
        };

        let result = compare_total_with_discount(&input).unwrap();

        // 78 * 0.80 after tax
        assert_eq!(result.summary_value(labels::TOTAL_YIELD), Some(dec!(62.40)));
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_total_with_discount_interest_bearing_installments() {
        let input = TotalWithDiscountInput {
            total_price: dec!(1000),
            installments: 2,
            yield_rate: RateSpec::monthly(Decimal::ZERO),
            cash_discount_percent: Decimal::ZERO,
            installment_interest: Some(InstallmentInterest {
                rate_percent: dec!(10),
                mode: InterestMode::Simple,
            }),
        };

        let result = compare_total_with_discount(&input).unwrap();

        assert_eq!(result.summary_value(labels::INSTALLMENT_TOTAL), Some(dec!(1200.00)));
        assert_eq!(result.summary_value(labels::MONTHLY_INSTALLMENT), Some(dec!(600.00)));
        assert_eq!(result.verdict, Some(Verdict::PayUpfront));
    }

    #[test]
    fn test_cash_with_installments() {
        let input = CashVsInstallmentsInput {
            cash_price: dec!(290),
            installments: 3,
            installment_amount: dec!(100),
            yield_rate: RateSpec::monthly(dec!(1)),
        };

        let result = compare_cash_with_installments(&input).unwrap();

        // 300 - (3 + 2 + 1) = 294
        assert_eq!(
            result.summary_value(labels::EFFECTIVE_INSTALLMENT_COST),
            Some(dec!(294.00))
        );
        assert_eq!(result.verdict, Some(Verdict::PayUpfront));
    }

    #[test]
    fn test_down_payment_balance_holds() {
        let input = DownPaymentInput {
            cash_price: dec!(1000),
            down_payment: dec!(200),
            installments: 2,
            installment_amount: dec!(400),
            yield_rate: RateSpec::monthly(dec!(1)),
        };

        let result = compare_down_payment(&input).unwrap();

        assert_eq!(result.summary_value(labels::FINAL_BALANCE), Some(dec!(14.10)));
        assert_eq!(result.summary_value(labels::INSTALLMENT_TOTAL), Some(dec!(1000.00)));
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_down_payment_balance_runs_out() {
        let input = DownPaymentInput {
            cash_price: dec!(1000),
            down_payment: dec!(300),
            installments: 2,
            installment_amount: dec!(400),
            yield_rate: RateSpec::monthly(Decimal::ZERO),
        };

        let result = compare_down_payment(&input).unwrap();

        assert_eq!(result.summary_value(labels::FINAL_BALANCE), Some(dec!(-100.00)));
        assert_eq!(result.verdict, Some(Verdict::PayUpfront));
    }

    #[test]
    fn test_installment_plans() {
        let input = TwoPlansInput {
            installments_a: 3,
            amount_a: dec!(100),
            installments_b: 2,
            amount_b: dec!(200),
        };

        let result = compare_installment_plans(&input).unwrap();

        assert_eq!(result.summary_value(labels::TOTAL_A), Some(dec!(300)));
        assert_eq!(result.summary_value(labels::TOTAL_B), Some(dec!(400)));
        assert_eq!(result.verdict, Some(Verdict::OptionA));
        assert!(result.ledger.is_empty());
    }

    #[test]
    fn test_installment_plans_tie_goes_to_b() {
        let input = TwoPlansInput {
            installments_a: 4,
            amount_a: dec!(50),
            installments_b: 2,
            amount_b: dec!(100),
        };

        let result = compare_installment_plans(&input).unwrap();
        assert_eq!(result.verdict, Some(Verdict::OptionB));
    }

    #[test]
    fn test_late_payment_correction() {
        let input = LatePaymentInput {
            original_amount: dec!(100),
            days_late: 10,
            penalty_percent: dec!(2),
            daily_interest_percent: dec!(0.1),
        };

        let result = late_payment_correction(&input).unwrap();

        assert_eq!(result.summary_value(labels::CORRECTED_AMOUNT), Some(dec!(103.00)));
        assert_eq!(result.summary_value(labels::PENALTY_AMOUNT), Some(dec!(2.00)));
        assert_eq!(result.summary_value(labels::LATE_INTEREST_AMOUNT), Some(dec!(1.00)));
        assert_eq!(result.verdict, None);
    }

    #[test]
    fn test_present_value_under_inflation() {
        let input = PresentValueInput {
            installments: 2,
            installment_amount: dec!(100),
            inflation: RateSpec::monthly(dec!(10)),
            cash_price: None,
        };

        let result = present_value_under_inflation(&input).unwrap();

        assert_eq!(result.summary_value(labels::PRESENT_VALUE), Some(dec!(173.55)));
        assert_eq!(result.summary_value(labels::NOMINAL_TOTAL), Some(dec!(200.00)));
        assert_eq!(result.verdict, None);
    }

    #[test]
    fn test_present_value_with_cash_price() {
        let input = PresentValueInput {
            installments: 2,
            installment_amount: dec!(100),
            inflation: RateSpec::monthly(dec!(10)),
            cash_price: Some(dec!(180)),
        };

        let result = present_value_under_inflation(&input).unwrap();
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_alternative_investment() {
        let input = AlternativeInvestmentInput {
            cash_price: dec!(1000),
            installments: 10,
            installment_amount: dec!(100),
            yield_rate: RateSpec::monthly(dec!(1)),
        };

        let result = compare_alternative_investment(&input).unwrap();

        assert!(result.summary_value(labels::FINAL_BALANCE).unwrap() > Decimal::ZERO);
        assert_eq!(result.ledger.len(), 10);
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_alternative_investment_exact_zero_is_upfront() {
        let input = AlternativeInvestmentInput {
            cash_price: dec!(1000),
            installments: 10,
            installment_amount: dec!(100),
            yield_rate: RateSpec::monthly(Decimal::ZERO),
        };

        let result = compare_alternative_investment(&input).unwrap();
        assert_eq!(result.verdict, Some(Verdict::PayUpfront));
    }

    #[test]
    fn test_zero_installments_error() {
        let input = CashVsInstallmentsInput {
            cash_price: dec!(100),
            installments: 0,
            installment_amount: dec!(10),
            yield_rate: RateSpec::monthly(dec!(1)),
        };

        let err = compare_cash_with_installments(&input).unwrap_err();
        assert_eq!(
            err,
            CalcError::precondition("installments", "must be at least 1")
        );
    }

    #[test]
    fn test_negative_amount_rejected_by_default() {
        let input = TwoPlansInput {
            installments_a: 3,
            amount_a: dec!(-100),
            installments_b: 2,
            amount_b: dec!(200),
        };

        let err = compare_installment_plans(&input).unwrap_err();
        assert_eq!(err, CalcError::validation("amount_a", ValidationReason::Negative));
    }

    #[test]
    fn test_negative_amount_allowed_when_configured() {
        let evaluator = Evaluator::new(Settings {
            reject_negative_amounts: false,
            ..Settings::default()
        });
        let input = TwoPlansInput {
            installments_a: 3,
            amount_a: dec!(-100),
            installments_b: 2,
            amount_b: dec!(200),
        };

        let result = evaluator.compare_installment_plans(&input).unwrap();
        assert_eq!(result.summary_value(labels::TOTAL_A), Some(dec!(-300)));
    }

    #[test]
    fn test_evaluate_dispatches_by_kind() {
        let input = ScenarioInput::LatePayment(LatePaymentInput {
            original_amount: dec!(100),
            days_late: 0,
            penalty_percent: dec!(2),
            daily_interest_percent: dec!(0.1),
        });

        let result = Evaluator::default().evaluate(&input).unwrap();
        assert_eq!(result.kind, ScenarioKind::LatePayment);
        assert_eq!(result.summary_value(labels::CORRECTED_AMOUNT), Some(dec!(102.00)));
    }

    #[test]
    fn test_total_with_discount_tie_favours_installments() {
        let input = TotalWithDiscountInput {
            total_price: dec!(1200),
            installments: 12,
            yield_rate: RateSpec::monthly(dec!(1)),
            cash_discount_percent: dec!(6.5),
            installment_interest: None,
        };

        let result = compare_total_with_discount(&input).unwrap();

        // 1200 * 0.935 == 1200 - 78
        assert_eq!(result.summary_value(labels::CASH_PRICE), Some(dec!(1122.00)));
        assert_eq!(result.summary_value(labels::DIFFERENCE), Some(Decimal::ZERO));
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_cash_with_installments_tie_favours_installments() {
        let input = CashVsInstallmentsInput {
            cash_price: dec!(294),
            installments: 3,
            installment_amount: dec!(100),
            yield_rate: RateSpec::monthly(dec!(1)),
        };

        let result = compare_cash_with_installments(&input).unwrap();
        assert_eq!(result.verdict, Some(Verdict::Installment));
    }

    #[test]
    fn test_negative_rate_rejected_by_default() {
        let input = AlternativeInvestmentInput {
            cash_price: dec!(1000),
            installments: 10,
            installment_amount: dec!(100),
            yield_rate: RateSpec::monthly(dec!(-0.5)),
        };

        let err = compare_alternative_investment(&input).unwrap_err();
        assert_eq!(err, CalcError::validation("yield_rate", ValidationReason::Negative));

        let inflation = PresentValueInput {
            installments: 2,
            installment_amount: dec!(100),
            inflation: RateSpec::annual(dec!(-3)),
            cash_price: None,
        };
        let err = present_value_under_inflation(&inflation).unwrap_err();
        assert_eq!(err, CalcError::validation("inflation", ValidationReason::Negative));
    }

    #[test]
    fn test_compounding_installment_interest_overflow() {
        let input = TotalWithDiscountInput {
            total_price: dec!(1000),
            installments: 360,
            yield_rate: RateSpec::monthly(dec!(1)),
            cash_discount_percent: Decimal::ZERO,
            installment_interest: Some(InstallmentInterest {
                rate_percent: dec!(30),
                mode: InterestMode::Compound,
            }),
        };

        let err = compare_total_with_discount(&input).unwrap_err();
        assert_eq!(err, CalcError::overflow("installment_interest"));
    }

    #[test]
    fn test_alternative_investment_overflow() {
        let input = AlternativeInvestmentInput {
            cash_price: dec!(1000),
            installments: 300,
            installment_amount: dec!(10),
            yield_rate: RateSpec::monthly(dec!(30)),
        };

        let err = compare_alternative_investment(&input).unwrap_err();
        assert_eq!(err, CalcError::overflow("installments"));
    }

    #[test]
    fn test_present_value_discount_overflow() {
        let input = PresentValueInput {
            installments: 300,
            installment_amount: dec!(100),
            inflation: RateSpec::monthly(dec!(25)),
            cash_price: None,
        };

        let err = present_value_under_inflation(&input).unwrap_err();
        assert_eq!(err, CalcError::overflow("inflation"));
    }

    #[test]
    fn test_installment_plans_total_overflow() {
        let input = TwoPlansInput {
            installments_a: 2,
            amount_a: Decimal::MAX,
            installments_b: 1,
            amount_b: dec!(1),
        };

        let err = compare_installment_plans(&input).unwrap_err();
        assert_eq!(err, CalcError::overflow("installments_a"));
    }

    #[test]
    fn test_scenario_codes_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(ScenarioKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ScenarioKind::from_code(0), None);
        assert_eq!(ScenarioKind::from_code(8), None);
    }
}

//! Loose, form-style input.
//!
//! A presenting layer usually holds raw field values keyed by name, some
//! blank, some typed as text. This module turns such a JSON object into a
//! typed [`ScenarioInput`], reporting the first missing or malformed field by
//! name.

use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};

use crate::error::{CalcError, CalcResult, ValidationReason};
use crate::interest::InterestMode;
use crate::rates::{PeriodBasis, RateSpec};
use crate::scenarios::{
    AlternativeInvestmentInput, CashVsInstallmentsInput, DownPaymentInput, Evaluator,
    InstallmentInterest, LatePaymentInput, PresentValueInput, ScenarioInput, ScenarioKind,
    ScenarioResult, TotalWithDiscountInput, TwoPlansInput,
};

/// Field names accepted by [`ScenarioInput::from_fields`].
pub mod fields {
    pub const SCENARIO: &str = "scenario";
    pub const TOTAL_PRICE: &str = "total_price";
    pub const CASH_PRICE: &str = "cash_price";
    pub const DOWN_PAYMENT: &str = "down_payment";
    pub const INSTALLMENTS: &str = "installments";
    pub const INSTALLMENT_AMOUNT: &str = "installment_amount";
    pub const CASH_DISCOUNT_PERCENT: &str = "cash_discount_percent";
    pub const INSTALLMENT_INTEREST_PERCENT: &str = "installment_interest_percent";
    pub const INTEREST_MODE: &str = "interest_mode";
    pub const YIELD_RATE_PERCENT: &str = "yield_rate_percent";
    pub const RATE_BASIS: &str = "rate_basis";
    pub const CONSIDER_INCOME_TAX: &str = "consider_income_tax";
    pub const INSTALLMENTS_A: &str = "installments_a";
    pub const AMOUNT_A: &str = "amount_a";
    pub const INSTALLMENTS_B: &str = "installments_b";
    pub const AMOUNT_B: &str = "amount_b";
    pub const ORIGINAL_AMOUNT: &str = "original_amount";
    pub const DAYS_LATE: &str = "days_late";
    pub const PENALTY_PERCENT: &str = "penalty_percent";
    pub const DAILY_INTEREST_PERCENT: &str = "daily_interest_percent";
    pub const INFLATION_PERCENT: &str = "inflation_percent";
    pub const INFLATION_BASIS: &str = "inflation_basis";
}

/// Typed access to a map of raw field values.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The value under `name`, treating null and blank text as absent.
    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            value => Some(value),
        }
    }

    pub fn decimal(&self, name: &str) -> CalcResult<Decimal> {
        self.optional_decimal(name)?
            .ok_or_else(|| CalcError::validation(name, ValidationReason::Missing))
    }

    pub fn optional_decimal(&self, name: &str) -> CalcResult<Option<Decimal>> {
        self.present(name)
            .map(|value| {
                parse_decimal(value)
                    .ok_or_else(|| CalcError::validation(name, ValidationReason::NotNumeric))
            })
            .transpose()
    }

    /// A whole, non-negative number such as an installment count.
    pub fn count(&self, name: &str) -> CalcResult<u32> {
        let value = self.decimal(name)?;
        if !value.fract().is_zero() || value < Decimal::ZERO {
            return Err(CalcError::validation(name, ValidationReason::NotAnInteger));
        }
        value
            .to_u32()
            .ok_or_else(|| CalcError::validation(name, ValidationReason::NotAnInteger))
    }

    /// A yes/no choice; absent means no. Accepts booleans and S/N, Y/N, true/false.
    pub fn flag(&self, name: &str) -> CalcResult<bool> {
        match self.present(name) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
                "s" | "sim" | "y" | "yes" | "true" | "1" => Ok(true),
                "n" | "nao" | "não" | "no" | "false" | "0" => Ok(false),
                _ => Err(CalcError::validation(name, ValidationReason::UnknownOption)),
            },
            Some(_) => Err(CalcError::validation(name, ValidationReason::UnknownOption)),
        }
    }

    fn choice<T>(&self, name: &str, default: T, pick: impl Fn(&str) -> Option<T>) -> CalcResult<T> {
        match self.present(name) {
            None => Ok(default),
            Some(Value::String(text)) => pick(text.trim().to_lowercase().as_str())
                .ok_or_else(|| CalcError::validation(name, ValidationReason::UnknownOption)),
            Some(_) => Err(CalcError::validation(name, ValidationReason::UnknownOption)),
        }
    }

    fn period_basis(&self, name: &str) -> CalcResult<PeriodBasis> {
        self.choice(name, PeriodBasis::Monthly, |text| match text {
            "monthly" | "mensal" => Some(PeriodBasis::Monthly),
            "annual" | "anual" => Some(PeriodBasis::Annual),
            _ => None,
        })
    }

    fn interest_mode(&self, name: &str) -> CalcResult<InterestMode> {
        self.choice(name, InterestMode::default(), |text| match text {
            "simple" | "simples" => Some(InterestMode::Simple),
            "compound" | "composto" => Some(InterestMode::Compound),
            _ => None,
        })
    }

    fn yield_rate(&self) -> CalcResult<RateSpec> {
        Ok(RateSpec {
            nominal_rate_percent: self.decimal(fields::YIELD_RATE_PERCENT)?,
            period_basis: self.period_basis(fields::RATE_BASIS)?,
            consider_income_tax: self.flag(fields::CONSIDER_INCOME_TAX)?,
        })
    }

    fn scenario_kind(&self) -> CalcResult<ScenarioKind> {
        let unknown = || CalcError::validation(fields::SCENARIO, ValidationReason::UnknownScenario);
        let value = self
            .present(fields::SCENARIO)
            .ok_or_else(|| CalcError::validation(fields::SCENARIO, ValidationReason::Missing))?;

        if let Value::String(text) = value {
            let named: Result<ScenarioKind, _> =
                serde_json::from_value(Value::String(text.trim().to_string()));
            if let Ok(kind) = named {
                return Ok(kind);
            }
        }
        let code = parse_decimal(value)
            .filter(|code| code.fract().is_zero())
            .and_then(|code| code.to_u8())
            .ok_or_else(unknown)?;
        ScenarioKind::from_code(code).ok_or_else(unknown)
    }
}

/// Reads a JSON number or numeric text. Text may use a decimal comma ("12,5").
fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => {
            let text = text.trim();
            if text.contains(',') && !text.contains('.') {
                text.replace(',', ".")
            } else {
                text.to_string()
            }
        }
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

impl ScenarioInput {
    /// Builds the typed input for `kind` from raw field values.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first required field that is
    /// missing, non-numeric or not a recognised option.
    pub fn from_fields(kind: ScenarioKind, fields: &Map<String, Value>) -> CalcResult<Self> {
        let reader = FieldReader::new(fields);

        let input = match kind {
            ScenarioKind::TotalWithDiscount => {
                let installment_interest = reader
                    .optional_decimal(fields::INSTALLMENT_INTEREST_PERCENT)?
                    .map(|rate_percent| {
                        Ok::<_, CalcError>(InstallmentInterest {
                            rate_percent,
                            mode: reader.interest_mode(fields::INTEREST_MODE)?,
                        })
                    })
                    .transpose()?;
                ScenarioInput::TotalWithDiscount(TotalWithDiscountInput {
                    total_price: reader.decimal(fields::TOTAL_PRICE)?,
                    installments: reader.count(fields::INSTALLMENTS)?,
                    yield_rate: reader.yield_rate()?,
                    cash_discount_percent: reader
                        .optional_decimal(fields::CASH_DISCOUNT_PERCENT)?
                        .unwrap_or_default(),
                    installment_interest,
                })
            }
            ScenarioKind::CashVsInstallments => {
                ScenarioInput::CashVsInstallments(CashVsInstallmentsInput {
                    cash_price: reader.decimal(fields::CASH_PRICE)?,
                    installments: reader.count(fields::INSTALLMENTS)?,
                    installment_amount: reader.decimal(fields::INSTALLMENT_AMOUNT)?,
                    yield_rate: reader.yield_rate()?,
                })
            }
            ScenarioKind::DownPayment => ScenarioInput::DownPayment(DownPaymentInput {
                cash_price: reader.decimal(fields::CASH_PRICE)?,
                down_payment: reader.decimal(fields::DOWN_PAYMENT)?,
                installments: reader.count(fields::INSTALLMENTS)?,
                installment_amount: reader.decimal(fields::INSTALLMENT_AMOUNT)?,
                yield_rate: reader.yield_rate()?,
            }),
            ScenarioKind::TwoPlans => ScenarioInput::TwoPlans(TwoPlansInput {
                installments_a: reader.count(fields::INSTALLMENTS_A)?,
                amount_a: reader.decimal(fields::AMOUNT_A)?,
                installments_b: reader.count(fields::INSTALLMENTS_B)?,
                amount_b: reader.decimal(fields::AMOUNT_B)?,
            }),
            ScenarioKind::LatePayment => ScenarioInput::LatePayment(LatePaymentInput {
                original_amount: reader.decimal(fields::ORIGINAL_AMOUNT)?,
                days_late: reader.count(fields::DAYS_LATE)?,
                penalty_percent: reader.decimal(fields::PENALTY_PERCENT)?,
                daily_interest_percent: reader.decimal(fields::DAILY_INTEREST_PERCENT)?,
            }),
            ScenarioKind::PresentValue => ScenarioInput::PresentValue(PresentValueInput {
                installments: reader.count(fields::INSTALLMENTS)?,
                installment_amount: reader.decimal(fields::INSTALLMENT_AMOUNT)?,
                inflation: RateSpec {
                    nominal_rate_percent: reader.decimal(fields::INFLATION_PERCENT)?,
                    period_basis: reader.period_basis(fields::INFLATION_BASIS)?,
                    consider_income_tax: false,
                },
                cash_price: reader.optional_decimal(fields::CASH_PRICE)?,
            }),
            ScenarioKind::AlternativeInvestment => {
                ScenarioInput::AlternativeInvestment(AlternativeInvestmentInput {
                    cash_price: reader.decimal(fields::CASH_PRICE)?,
                    installments: reader.count(fields::INSTALLMENTS)?,
                    installment_amount: reader.decimal(fields::INSTALLMENT_AMOUNT)?,
                    yield_rate: reader.yield_rate()?,
                })
            }
        };

        Ok(input)
    }

    /// Like [`ScenarioInput::from_fields`], taking the kind from the `scenario`
    /// field (a menu code 1-7 or a snake_case name).
    pub fn from_json_object(fields: &Map<String, Value>) -> CalcResult<Self> {
        let kind = FieldReader::new(fields).scenario_kind()?;
        Self::from_fields(kind, fields)
    }
}

impl Evaluator {
    /// Parses a JSON object of raw field values and evaluates it.
    ///
    /// Errors carry context; the underlying [`CalcError`] can be recovered
    /// with `downcast_ref`.
    pub fn evaluate_json(&self, text: &str) -> Result<ScenarioResult, anyhow::Error> {
        let value: Value = serde_json::from_str(text).context("Input is not valid JSON")?;
        let fields = value
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Input must be a JSON object of fields."))?;

        let input =
            ScenarioInput::from_json_object(fields).context("Failed to read scenario input")?;
        let result = self
            .evaluate(&input)
            .with_context(|| format!("Failed to evaluate scenario {}", input.kind().code()))?;

        Ok(result)
    }
}

/// Evaluates a JSON object of raw field values with default settings.
pub fn evaluate_json(text: &str) -> Result<ScenarioResult, anyhow::Error> {
    Evaluator::default().evaluate_json(text)
}

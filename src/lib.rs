//! `br_installments` is a Rust library for deciding between paying upfront and
//! paying in installments in Brazil.
//!
//! The answer depends on what the money left unpaid would earn meanwhile. The
//! library models that with:
//! - **Yield simulation**: month-by-month yield on the outstanding obligation,
//!   optionally reduced by the regressive income-tax brackets (IR regressivo).
//! - **Reinvestment**: keeping the upfront price invested and paying each
//!   installment out of it.
//! - **Discounting**: the present value of installments under inflation.
//!
//! Seven scenarios build on those pieces, from "total with a cash discount" to
//! "late-payment penalty". Every function is pure: rates arrive already
//! resolved, and nothing here performs I/O.
//!
//! ## Usage
//!
//! Add `br_installments` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! br_installments = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then build a scenario input and evaluate it:
//!
//! ```rust
//! use br_installments::{
//!     CashVsInstallmentsInput, RateSpec, Verdict, compare_cash_with_installments,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = CashVsInstallmentsInput {
//!         cash_price: dec!(2_700),
//!         installments: 10,
//!         installment_amount: dec!(300),
//!         yield_rate: RateSpec::monthly(dec!(0.9)).with_income_tax(true),
//!     };
//!
//!     match compare_cash_with_installments(&input) {
//!         Ok(result) => {
//!             for (label, value) in &result.summary {
//!                 println!("{label}: {value:.2}");
//!             }
//!             assert_eq!(result.verdict, Some(Verdict::PayUpfront));
//!         }
//!         Err(e) => {
//!             eprintln!("Error evaluating scenario: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod input;
pub mod interest;
pub mod rates;
pub mod scenarios;
pub mod settings;
pub mod simulator;

pub use error::{CalcError, CalcResult, ValidationReason};
pub use input::{FieldReader, evaluate_json};
pub use interest::{InterestMode, accrue_installment_total};
pub use rates::{
    Benchmark, IncomeTaxBracket, PeriodBasis, RateSource, RateSpec, adjust_for_tax,
    normalize_annual_interest_rate, percent_to_decimal,
};
pub use scenarios::{
    AlternativeInvestmentInput, CashVsInstallmentsInput, DownPaymentInput, Evaluator,
    InstallmentInterest, LatePaymentInput, PresentValueInput, ScenarioInput, ScenarioKind,
    ScenarioResult, TotalWithDiscountInput, TwoPlansInput, Verdict, compare_alternative_investment,
    compare_cash_with_installments, compare_down_payment, compare_installment_plans,
    compare_total_with_discount, late_payment_correction, present_value_under_inflation,
};
pub use settings::Settings;
pub use simulator::{
    LedgerRow, ReinvestmentSimulation, YieldSimulation, simulate_reinvestment, simulate_yield,
    simulate_yield_from,
};

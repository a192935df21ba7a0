use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::error::{ValidationError, require_non_negative, require_percent};
use crate::core::{
    Debt, MAX_MONTHS, MAX_SOLVE_ITERATIONS, MinPaymentRule, PayoffOutcome, PayoffStrategy, SimulationConfig,
    SimulationResult, SolveConfig,
};

const MAX_DEBTS: usize = 50;
const DEFAULT_MIN_PAYMENT_PERCENT: f64 = 2.0;
const MIN_SOLVE_TOLERANCE: f64 = 1e-6;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategy {
    Snowball,
    Avalanche,
}

impl From<CliStrategy> for PayoffStrategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Snowball => PayoffStrategy::Snowball,
            CliStrategy::Avalanche => PayoffStrategy::Avalanche,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) enum ApiStrategy {
    #[serde(alias = "lowest-balance", alias = "lowestBalance")]
    Snowball,
    #[serde(alias = "highest-interest", alias = "highestInterest")]
    Avalanche,
}

impl From<ApiStrategy> for CliStrategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::Snowball => CliStrategy::Snowball,
            ApiStrategy::Avalanche => CliStrategy::Avalanche,
        }
    }
}

/// One `--debt ID:BALANCE:APR:MIN` argument. `MIN` is a fixed amount (`25`)
/// or a percentage of the balance (`2%`).
#[derive(Debug, Clone, PartialEq)]
pub struct DebtArg {
    pub id: String,
    pub balance: f64,
    pub apr: f64,
    pub min_payment: MinPaymentRule,
}

impl FromStr for DebtArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').map(str::trim).collect::<Vec<_>>();
        let [id, balance, apr, min] = parts.as_slice() else {
            return Err(format!("expected ID:BALANCE:APR:MIN, got '{s}'"));
        };
        let number = |field: &str, raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| format!("invalid {field} '{raw}' in '{s}'"))
        };
        let min_payment = match min.strip_suffix('%') {
            Some(pct) => MinPaymentRule::PercentOfBalance(number("minimum percent", pct)?),
            None => MinPaymentRule::Fixed(number("minimum payment", min)?),
        };
        Ok(DebtArg {
            id: id.to_string(),
            balance: number("balance", balance)?,
            apr: number("APR", apr)?,
            min_payment,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct PayoffArgs {
    #[arg(
        long = "debt",
        value_name = "ID:BALANCE:APR:MIN",
        required = true,
        help = "Debt to pay down; MIN is a fixed amount (25) or percent of balance (2%)"
    )]
    pub debts: Vec<DebtArg>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly payment budget; minimum payments are drawn from it first"
    )]
    pub extra: f64,
    #[arg(long, value_enum, default_value_t = CliStrategy::Avalanche)]
    pub strategy: CliStrategy,
    #[arg(long, help = "Print the full result as JSON")]
    pub json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DebtPayload {
    id: Option<String>,
    balance: f64,
    apr: f64,
    #[serde(default)]
    min_payment: Option<f64>,
    #[serde(default)]
    min_payment_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct PayoffPayload {
    debts: Vec<DebtPayload>,
    extra_payment: Option<f64>,
    strategy: Option<ApiStrategy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SolvePayload {
    debts: Vec<DebtPayload>,
    strategy: Option<ApiStrategy>,
    target_months: Option<u32>,
    search_min: Option<f64>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PayoffResponse {
    pub(super) does_not_pay_off: bool,
    #[serde(flatten)]
    pub(super) result: SimulationResult,
}

impl From<SimulationResult> for PayoffResponse {
    fn from(result: SimulationResult) -> Self {
        PayoffResponse {
            does_not_pay_off: result.outcome == PayoffOutcome::CappedAtCeiling,
            result,
        }
    }
}

fn default_payoff_args() -> PayoffArgs {
    PayoffArgs {
        debts: Vec::new(),
        extra: 0.0,
        strategy: CliStrategy::Avalanche,
        json: true,
    }
}

fn debt_arg_from_payload(index: usize, payload: DebtPayload) -> Result<DebtArg, ValidationError> {
    let min_payment = match (payload.min_payment, payload.min_payment_percent) {
        (Some(_), Some(_)) => {
            return Err(ValidationError::field(
                "minPayment",
                "and minPaymentPercent are mutually exclusive",
            ));
        }
        (Some(amount), None) => MinPaymentRule::Fixed(amount),
        (None, Some(pct)) => MinPaymentRule::PercentOfBalance(pct),
        (None, None) => MinPaymentRule::PercentOfBalance(DEFAULT_MIN_PAYMENT_PERCENT),
    };
    Ok(DebtArg {
        id: payload.id.unwrap_or_else(|| format!("debt-{}", index + 1)),
        balance: payload.balance,
        apr: payload.apr,
        min_payment,
    })
}

fn debt_args_from_payload(debts: Vec<DebtPayload>) -> Result<Vec<DebtArg>, ValidationError> {
    debts
        .into_iter()
        .enumerate()
        .map(|(i, d)| debt_arg_from_payload(i, d))
        .collect()
}

pub(super) fn payoff_args_from_payload(
    payload: PayoffPayload,
) -> Result<PayoffArgs, ValidationError> {
    let mut args = default_payoff_args();
    args.debts = debt_args_from_payload(payload.debts)?;
    if let Some(v) = payload.extra_payment {
        args.extra = v;
    }
    if let Some(v) = payload.strategy {
        args.strategy = v.into();
    }
    Ok(args)
}

fn build_debts(args: &[DebtArg]) -> Result<Vec<Debt>, ValidationError> {
    if args.is_empty() {
        return Err(ValidationError::field("debts", "must contain at least one debt"));
    }
    if args.len() > MAX_DEBTS {
        return Err(ValidationError::field(
            "debts",
            format!("must contain at most {MAX_DEBTS} debts"),
        ));
    }

    let mut seen = HashSet::new();
    let mut debts = Vec::with_capacity(args.len());
    for arg in args {
        if arg.id.trim().is_empty() {
            return Err(ValidationError::field("id", "must not be empty"));
        }
        if !seen.insert(arg.id.as_str()) {
            return Err(ValidationError::field(
                "id",
                format!("'{}' is used by more than one debt", arg.id),
            ));
        }
        require_non_negative("balance", arg.balance)?;
        require_percent("apr", arg.apr, 100.0)?;
        match arg.min_payment {
            MinPaymentRule::Fixed(amount) => require_non_negative("minPayment", amount)?,
            MinPaymentRule::PercentOfBalance(pct) => {
                require_percent("minPaymentPercent", pct, 100.0)?
            }
        }
        debts.push(Debt::new(arg.id.clone(), arg.balance, arg.apr, arg.min_payment));
    }
    Ok(debts)
}

pub fn build_config(args: &PayoffArgs) -> Result<SimulationConfig, ValidationError> {
    require_non_negative("extraPayment", args.extra)?;
    Ok(SimulationConfig {
        debts: build_debts(&args.debts)?,
        extra_payment: args.extra,
        strategy: args.strategy.into(),
    })
}

pub(super) struct SolveRequest {
    pub(super) debts: Vec<Debt>,
    pub(super) strategy: PayoffStrategy,
    pub(super) config: SolveConfig,
}

pub(super) fn solve_request_from_payload(
    payload: SolvePayload,
) -> Result<SolveRequest, ValidationError> {
    let debts = build_debts(&debt_args_from_payload(payload.debts)?)?;
    let strategy = payload
        .strategy
        .map(CliStrategy::from)
        .unwrap_or(CliStrategy::Avalanche)
        .into();
    let target_months = payload
        .target_months
        .ok_or_else(|| ValidationError::field("targetMonths", "is required"))?;
    let config = SolveConfig {
        target_months,
        search_min: payload.search_min.unwrap_or(0.0),
        search_max: payload.search_max.unwrap_or(10_000.0),
        tolerance: payload.tolerance.unwrap_or(0.01),
        max_iterations: payload.max_iterations.unwrap_or(60),
    };
    if !(1..=MAX_SOLVE_ITERATIONS).contains(&config.max_iterations) {
        return Err(ValidationError::field(
            "maxIterations",
            format!("must be between 1 and {MAX_SOLVE_ITERATIONS}"),
        ));
    }
    if !config.tolerance.is_finite() || config.tolerance < MIN_SOLVE_TOLERANCE {
        return Err(ValidationError::field(
            "tolerance",
            format!("must be >= {MIN_SOLVE_TOLERANCE}"),
        ));
    }
    Ok(SolveRequest {
        debts,
        strategy,
        config,
    })
}

/// Plain-text rendering used by the CLI.
pub fn render_summary(config: &SimulationConfig, result: &SimulationResult) -> String {
    let mut out = String::new();
    let strategy = match config.strategy {
        PayoffStrategy::Snowball => "snowball",
        PayoffStrategy::Avalanche => "avalanche",
    };
    out.push_str(&format!(
        "Strategy: {strategy} (order: {})\n",
        result.payoff_order.join(", ")
    ));
    match result.outcome {
        PayoffOutcome::PaidOff => out.push_str(&format!(
            "Debt free in {} months ({} years {} months)\n",
            result.months_to_payoff,
            result.months_to_payoff / 12,
            result.months_to_payoff % 12
        )),
        PayoffOutcome::CappedAtCeiling => out.push_str(&format!(
            "Does not pay off within {MAX_MONTHS} months; {:.2} still owed\n",
            result.remaining_balance()
        )),
    }
    out.push_str(&format!(
        "Total interest: {:.2}\nTotal paid: {:.2}\n",
        result.total_interest_paid, result.total_paid
    ));
    for (debt, month) in config.debts.iter().zip(&result.debt_payoff_months) {
        match month {
            Some(m) => out.push_str(&format!("  {:<16} paid off in month {m}\n", debt.id)),
            None if debt.balance <= 0.0 => {
                out.push_str(&format!("  {:<16} no balance\n", debt.id))
            }
            None => out.push_str(&format!("  {:<16} still open\n", debt.id)),
        }
    }
    out
}

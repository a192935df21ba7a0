use serde::Serialize;
use thiserror::Error;

use super::engine::{MAX_MONTHS, simulate_payoff};
use super::types::{Debt, PayoffOutcome, PayoffStrategy, SimulationConfig};

/// Upper bound on bisection steps; each step is a full simulation.
pub const MAX_SOLVE_ITERATIONS: u32 = 200;

#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    pub target_months: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub months_to_payoff: u32,
    pub paid_off: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub target_months: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub solved_extra_payment: Option<f64>,
    pub achieved_months: Option<u32>,
    pub achieved_total_interest: Option<f64>,
    pub iterations: Vec<SolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("target_months must be between 1 and 360")]
    TargetMonthsOutOfRange,
    #[error("search bounds must be finite and >= 0")]
    InvalidBounds,
    #[error("search_max must be greater than search_min")]
    EmptyRange,
    #[error("tolerance must be > 0")]
    InvalidTolerance,
    #[error("max_iterations must be > 0")]
    NoIterations,
    #[error("max_iterations must be at most 200")]
    TooManyIterations,
}

#[derive(Debug, Clone, Copy)]
struct CandidateEval {
    months: u32,
    total_interest: f64,
    meets_target: bool,
}

fn evaluate_candidate(
    debts: &[Debt],
    strategy: PayoffStrategy,
    target_months: u32,
    extra_payment: f64,
) -> CandidateEval {
    let result = simulate_payoff(&SimulationConfig {
        debts: debts.to_vec(),
        extra_payment,
        strategy,
    });
    CandidateEval {
        months: result.months_to_payoff,
        total_interest: result.total_interest_paid,
        meets_target: result.outcome == PayoffOutcome::PaidOff
            && result.months_to_payoff <= target_months,
    }
}

/// Smallest monthly budget (within `tolerance`) that clears every debt in at
/// most `target_months`.
pub fn solve_extra_payment(
    debts: &[Debt],
    strategy: PayoffStrategy,
    config: SolveConfig,
) -> Result<SolveResult, SolveError> {
    validate_config(config)?;

    let target = config.target_months;
    let low_eval = evaluate_candidate(debts, strategy, target, config.search_min);
    let high_eval = evaluate_candidate(debts, strategy, target, config.search_max);

    let mut iterations = Vec::new();
    let mut solved = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_eval.meets_target {
        solved = Some((config.search_min, low_eval));
        converged = true;
        feasible = true;
        message = "Already meets target at lower payment bound.".to_string();
    } else if !high_eval.meets_target {
        feasible = false;
        message = "No feasible payment found within the search bounds.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut hi_eval = high_eval;
        let mut it = 0;
        let mut stalled = false;
        while it < config.max_iterations {
            let mid = (lo + hi) * 0.5;
            if mid <= lo || mid >= hi {
                // interval is down to adjacent floats
                stalled = true;
                break;
            }
            it += 1;
            let eval = evaluate_candidate(debts, strategy, target, mid);
            iterations.push(SolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                months_to_payoff: eval.months,
                paid_off: eval.meets_target,
            });

            if eval.meets_target {
                hi = mid;
                hi_eval = eval;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                break;
            }
        }
        solved = Some((hi, hi_eval));
        feasible = true;
        message = if converged {
            "Solved required monthly payment.".to_string()
        } else if stalled {
            "Search interval cannot narrow further; returning best estimate.".to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate."
                .to_string()
        };
    }

    Ok(SolveResult {
        target_months: target,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        solved_extra_payment: solved.map(|(value, _)| value),
        achieved_months: solved.map(|(_, eval)| eval.months),
        achieved_total_interest: solved.map(|(_, eval)| eval.total_interest),
        iterations,
        converged,
        feasible,
        message,
    })
}

fn validate_config(config: SolveConfig) -> Result<(), SolveError> {
    if config.target_months == 0 || config.target_months > MAX_MONTHS {
        return Err(SolveError::TargetMonthsOutOfRange);
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() || config.search_min < 0.0
    {
        return Err(SolveError::InvalidBounds);
    }
    if config.search_max <= config.search_min {
        return Err(SolveError::EmptyRange);
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(SolveError::InvalidTolerance);
    }
    if config.max_iterations == 0 {
        return Err(SolveError::NoIterations);
    }
    if config.max_iterations > MAX_SOLVE_ITERATIONS {
        return Err(SolveError::TooManyIterations);
    }
    Ok(())
}

pub mod affordability;
pub mod amortization;
pub mod annuity;
mod engine;
pub mod pension;
pub mod social_security;
mod solver;
mod types;
pub mod va;

pub use engine::{MAX_MONTHS, MIN_PAYMENT_FLOOR, resolve_minimum_payment, simulate_payoff, strategy_order};
pub use solver::{
    MAX_SOLVE_ITERATIONS, SolveConfig, SolveError, SolveIteration, SolveResult,
    solve_extra_payment,
};
pub use types::{
    Debt, DebtMonth, MinPaymentRule, MonthlyRecord, PayoffOutcome, PayoffStrategy,
    SimulationConfig, SimulationResult,
};

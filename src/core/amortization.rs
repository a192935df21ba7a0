use serde::Serialize;

const RATE_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayoff {
    pub months: Option<u32>,
    pub total_paid: f64,
    pub total_interest: f64,
}

/// Level monthly payment that retires `principal` over `months`.
pub fn level_payment(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let n = months as f64;
    let r = annual_rate_pct / 1200.0;
    if r.abs() < RATE_EPS {
        return principal / n;
    }
    principal * r / (1.0 - (1.0 + r).powf(-n))
}

/// Present value of `months` level payments of `payment`; the inverse of
/// [`level_payment`].
pub fn present_value(payment: f64, annual_rate_pct: f64, months: u32) -> f64 {
    let n = months as f64;
    let r = annual_rate_pct / 1200.0;
    if r.abs() < RATE_EPS {
        return payment * n;
    }
    payment * (1.0 - (1.0 + r).powf(-n)) / r
}

pub fn amortization_schedule(principal: f64, annual_rate_pct: f64, months: u32) -> Vec<AmortizationRow> {
    let payment = level_payment(principal, annual_rate_pct, months);
    let r = annual_rate_pct / 1200.0;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance * r;
        let (payment, principal_part) = if month == months {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance = (balance - principal_part).max(0.0);
        if month == months {
            balance = 0.0;
        }
        rows.push(AmortizationRow {
            month,
            payment,
            interest,
            principal: principal_part,
            balance,
        });
    }
    rows
}

pub fn loan_summary(principal: f64, annual_rate_pct: f64, months: u32) -> LoanSummary {
    let schedule = amortization_schedule(principal, annual_rate_pct, months);
    let total_paid = schedule.iter().map(|r| r.payment).sum::<f64>();
    LoanSummary {
        monthly_payment: level_payment(principal, annual_rate_pct, months),
        total_paid,
        total_interest: total_paid - principal,
        schedule,
    }
}

/// Months needed to clear `balance` with a fixed monthly `payment`, or `None`
/// when the payment never outpaces interest.
pub fn months_to_payoff(balance: f64, apr: f64, payment: f64) -> Option<u32> {
    if balance <= 0.0 {
        return Some(0);
    }
    if payment <= 0.0 {
        return None;
    }
    let r = apr / 1200.0;
    if r.abs() < RATE_EPS {
        return Some((balance / payment).ceil() as u32);
    }
    if payment <= balance * r {
        return None;
    }
    let n = -(1.0 - r * balance / payment).ln() / (1.0 + r).ln();
    // Guard against n landing a hair above an integer from rounding.
    Some((n - 1e-9).ceil().max(1.0) as u32)
}

pub fn credit_card_payoff(balance: f64, apr: f64, payment: f64) -> CardPayoff {
    let Some(months) = months_to_payoff(balance, apr, payment) else {
        return CardPayoff {
            months: None,
            total_paid: 0.0,
            total_interest: 0.0,
        };
    };

    let r = apr / 1200.0;
    let mut remaining = balance.max(0.0);
    let mut total_paid = 0.0;
    for _ in 0..months {
        remaining += remaining * r;
        let paid = payment.min(remaining);
        remaining -= paid;
        total_paid += paid;
    }

    CardPayoff {
        months: Some(months),
        total_paid,
        total_interest: total_paid - balance.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn thirty_year_mortgage_payment() {
        assert_close(level_payment(200_000.0, 6.0, 360), 1_199.10, 0.01);
    }

    #[test]
    fn zero_rate_payment_is_straight_line() {
        assert_close(level_payment(12_000.0, 0.0, 12), 1_000.0, 1e-9);
        assert_close(level_payment(12_000.0, 5.0, 0), 0.0, 1e-9);
    }

    #[test]
    fn schedule_clears_balance_and_sums_principal() {
        let rows = amortization_schedule(150_000.0, 4.5, 180);
        assert_eq!(rows.len(), 180);
        assert_eq!(rows.last().map(|r| r.balance), Some(0.0));
        let principal: f64 = rows.iter().map(|r| r.principal).sum();
        assert_close(principal, 150_000.0, 1e-4);
    }

    #[test]
    fn card_payoff_matches_known_case() {
        assert_eq!(months_to_payoff(5_000.0, 19.99, 150.0), Some(50));
        assert_eq!(months_to_payoff(5_000.0, 19.99, 80.0), None);
        assert_eq!(months_to_payoff(1_200.0, 0.0, 100.0), Some(12));
        assert_eq!(months_to_payoff(0.0, 19.99, 100.0), Some(0));

        let payoff = credit_card_payoff(5_000.0, 19.99, 150.0);
        assert_eq!(payoff.months, Some(50));
        assert!(payoff.total_interest > 2_000.0 && payoff.total_interest < 2_500.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_present_value_inverts_level_payment(
            principal in 1_000u32..1_000_000,
            rate_bp in 0u32..1_500,
            months in 1u32..480
        ) {
            let rate = rate_bp as f64 / 100.0;
            let payment = level_payment(principal as f64, rate, months);
            let pv = present_value(payment, rate, months);
            prop_assert!((pv - principal as f64).abs() <= 1e-6 * principal as f64);
        }
    }
}

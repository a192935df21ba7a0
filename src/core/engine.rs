use tracing::debug;

use super::types::{
    Debt, DebtMonth, MinPaymentRule, MonthlyRecord, PayoffOutcome, PayoffStrategy,
    SimulationConfig, SimulationResult,
};

/// Floor applied to percentage-of-balance minimum payments.
pub const MIN_PAYMENT_FLOOR: f64 = 25.0;

/// Hard ceiling on simulated months (30 years).
pub const MAX_MONTHS: u32 = 360;

const BALANCE_EPS: f64 = 1e-9;

#[derive(Debug)]
struct OpenDebt<'a> {
    debt: &'a Debt,
    balance: f64,
    paid_off_month: Option<u32>,
}

impl OpenDebt<'_> {
    fn is_open(&self) -> bool {
        self.balance > 0.0
    }

    fn pay(&mut self, amount: f64) -> f64 {
        let paid = amount.min(self.balance).max(0.0);
        self.balance -= paid;
        if self.balance <= BALANCE_EPS {
            self.balance = 0.0;
        }
        paid
    }
}

pub fn resolve_minimum_payment(rule: MinPaymentRule, balance: f64) -> f64 {
    match rule {
        MinPaymentRule::Fixed(amount) => amount,
        MinPaymentRule::PercentOfBalance(percent) => {
            (balance * percent / 100.0).max(MIN_PAYMENT_FLOOR)
        }
    }
}

fn monthly_rate(apr: f64) -> f64 {
    apr / 100.0 / 12.0
}

/// Indices into `debts` in the order extra payment is allocated. Computed once
/// from the starting balances and APRs; the sort is stable so ties keep input
/// order.
pub fn strategy_order(debts: &[Debt], strategy: PayoffStrategy) -> Vec<usize> {
    let mut order = (0..debts.len()).collect::<Vec<_>>();
    match strategy {
        PayoffStrategy::Snowball => {
            order.sort_by(|&a, &b| debts[a].balance.total_cmp(&debts[b].balance));
        }
        PayoffStrategy::Avalanche => {
            order.sort_by(|&a, &b| debts[b].apr.total_cmp(&debts[a].apr));
        }
    }
    order
}

fn accrue_and_pay_minimums(open: &mut [OpenDebt<'_>], months: &mut [DebtMonth], budget: &mut f64) {
    for (state, month) in open.iter_mut().zip(months.iter_mut()) {
        if !state.is_open() {
            continue;
        }
        let interest = state.balance * monthly_rate(state.debt.apr);
        state.balance += interest;
        let minimum = resolve_minimum_payment(state.debt.min_payment, state.balance);
        let paid = state.pay(minimum);
        *budget -= paid;

        month.interest = interest;
        month.minimum_paid = paid;
    }
}

fn allocate_extra(
    open: &mut [OpenDebt<'_>],
    months: &mut [DebtMonth],
    order: &[usize],
    budget: &mut f64,
) {
    for &idx in order {
        if *budget <= 0.0 {
            break;
        }
        let state = &mut open[idx];
        if !state.is_open() {
            continue;
        }
        let paid = state.pay(*budget);
        *budget -= paid;
        months[idx].extra_paid += paid;
    }
}

fn blank_months(open: &[OpenDebt<'_>]) -> Vec<DebtMonth> {
    open.iter()
        .map(|state| DebtMonth {
            id: state.debt.id.clone(),
            interest: 0.0,
            minimum_paid: 0.0,
            extra_paid: 0.0,
            balance: state.balance,
        })
        .collect()
}

pub fn simulate_payoff(config: &SimulationConfig) -> SimulationResult {
    let order = strategy_order(&config.debts, config.strategy);
    let mut open = config
        .debts
        .iter()
        .map(|debt| OpenDebt {
            debt,
            balance: debt.balance.max(0.0),
            paid_off_month: None,
        })
        .collect::<Vec<_>>();

    let mut schedule = Vec::new();
    let mut total_interest_paid = 0.0;
    let mut total_paid = 0.0;

    let mut outcome = PayoffOutcome::PaidOff;
    let mut month_index = 0_u32;
    while open.iter().any(|s| s.is_open()) {
        if month_index >= MAX_MONTHS {
            outcome = PayoffOutcome::CappedAtCeiling;
            break;
        }

        let mut months = blank_months(&open);
        let mut budget = config.extra_payment;
        accrue_and_pay_minimums(&mut open, &mut months, &mut budget);
        allocate_extra(&mut open, &mut months, &order, &mut budget);

        let mut interest = 0.0;
        let mut paid = 0.0;
        for (state, month) in open.iter_mut().zip(months.iter_mut()) {
            month.balance = state.balance;
            interest += month.interest;
            paid += month.total_paid();
            if state.paid_off_month.is_none() && !state.is_open() && month.total_paid() > 0.0 {
                state.paid_off_month = Some(month_index + 1);
            }
        }
        total_interest_paid += interest;
        total_paid += paid;

        schedule.push(MonthlyRecord {
            month_index,
            total_principal_paid: paid - interest,
            total_interest_paid: interest,
            total_paid: paid,
            total_remaining_balance: open.iter().map(|s| s.balance).sum(),
            debts: months,
        });
        month_index += 1;
    }

    debug!(
        ?outcome,
        strategy = ?config.strategy,
        debts = config.debts.len(),
        months = schedule.len(),
        total_interest_paid,
        "payoff simulation finished"
    );

    SimulationResult {
        outcome,
        months_to_payoff: schedule.len() as u32,
        total_interest_paid,
        total_paid,
        payoff_order: order.iter().map(|&i| config.debts[i].id.clone()).collect(),
        debt_payoff_months: open.iter().map(|s| s.paid_off_month).collect(),
        schedule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amortization::months_to_payoff;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn fixed(id: &str, balance: f64, apr: f64, min: f64) -> Debt {
        Debt::new(id, balance, apr, MinPaymentRule::Fixed(min))
    }

    fn percent(id: &str, balance: f64, apr: f64, pct: f64) -> Debt {
        Debt::new(id, balance, apr, MinPaymentRule::PercentOfBalance(pct))
    }

    fn config(debts: Vec<Debt>, extra_payment: f64, strategy: PayoffStrategy) -> SimulationConfig {
        SimulationConfig {
            debts,
            extra_payment,
            strategy,
        }
    }

    fn sample_cards(strategy: PayoffStrategy) -> SimulationConfig {
        config(
            vec![
                percent("card-a", 5_000.0, 18.99, 2.0),
                percent("card-b", 3_000.0, 24.99, 3.0),
            ],
            200.0,
            strategy,
        )
    }

    #[test]
    fn fixed_minimum_is_returned_unmodified() {
        assert_approx(resolve_minimum_payment(MinPaymentRule::Fixed(40.0), 10.0), 40.0);
        assert_approx(resolve_minimum_payment(MinPaymentRule::Fixed(0.0), 500.0), 0.0);
    }

    #[test]
    fn percent_minimum_applies_floor() {
        let rule = MinPaymentRule::PercentOfBalance(2.0);
        assert_approx(resolve_minimum_payment(rule, 5_000.0), 100.0);
        assert_approx(resolve_minimum_payment(rule, 1_000.0), MIN_PAYMENT_FLOOR);
        assert_approx(resolve_minimum_payment(rule, 3.0), MIN_PAYMENT_FLOOR);
    }

    #[test]
    fn floor_larger_than_balance_only_pays_what_is_owed() {
        let result = simulate_payoff(&config(
            vec![percent("tiny", 10.0, 12.0, 2.0)],
            0.0,
            PayoffStrategy::Snowball,
        ));
        assert_eq!(result.outcome, PayoffOutcome::PaidOff);
        assert_eq!(result.months_to_payoff, 1);
        let month = &result.schedule[0].debts[0];
        assert_approx(month.interest, 0.1);
        assert_approx(month.minimum_paid, 10.1);
        assert_approx(result.total_paid, 10.1);
    }

    #[test]
    fn snowball_orders_by_starting_balance_and_avalanche_by_apr() {
        let debts = vec![
            fixed("big-high", 2_000.0, 20.0, 25.0),
            fixed("small-low", 500.0, 5.0, 25.0),
        ];
        assert_eq!(strategy_order(&debts, PayoffStrategy::Snowball), vec![1, 0]);
        assert_eq!(strategy_order(&debts, PayoffStrategy::Avalanche), vec![0, 1]);
    }

    #[test]
    fn ties_keep_input_order() {
        let debts = vec![
            fixed("first", 1_000.0, 15.0, 25.0),
            fixed("second", 1_000.0, 15.0, 25.0),
            fixed("third", 800.0, 15.0, 25.0),
        ];
        assert_eq!(
            strategy_order(&debts, PayoffStrategy::Snowball),
            vec![2, 0, 1]
        );
        assert_eq!(
            strategy_order(&debts, PayoffStrategy::Avalanche),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn no_open_debts_finishes_immediately() {
        let result = simulate_payoff(&config(
            vec![fixed("zero", 0.0, 20.0, 25.0)],
            100.0,
            PayoffStrategy::Avalanche,
        ));
        assert_eq!(result.outcome, PayoffOutcome::PaidOff);
        assert_eq!(result.months_to_payoff, 0);
        assert!(result.schedule.is_empty());
        assert_eq!(result.debt_payoff_months, vec![None]);
        assert_approx(result.remaining_balance(), 0.0);
    }

    #[test]
    fn minimums_draw_down_the_shared_budget_first() {
        let result = simulate_payoff(&config(
            vec![
                fixed("a", 1_000.0, 0.0, 30.0),
                fixed("b", 1_000.0, 0.0, 20.0),
            ],
            80.0,
            PayoffStrategy::Snowball,
        ));
        let first = &result.schedule[0];
        assert_approx(first.debts[0].minimum_paid, 30.0);
        assert_approx(first.debts[1].minimum_paid, 20.0);
        assert_approx(first.debts[0].extra_paid, 30.0);
        assert_approx(first.debts[1].extra_paid, 0.0);
        assert_approx(first.total_paid, 80.0);
    }

    #[test]
    fn avalanche_sends_all_extra_to_highest_rate_until_it_is_closed() {
        for extra in [50.0, 150.0] {
            let result = simulate_payoff(&config(
                vec![
                    fixed("high-rate", 1_000.0, 24.99, 25.0),
                    fixed("low-rate", 5_000.0, 10.0, 25.0),
                ],
                extra,
                PayoffStrategy::Avalanche,
            ));
            assert_eq!(result.payoff_order, vec!["high-rate", "low-rate"]);

            for month in &result.schedule {
                if month.debts[0].balance > 0.0 {
                    assert_approx(month.debts[1].extra_paid, 0.0);
                    assert_approx(month.debts[1].minimum_paid, 25.0);
                }
            }
        }

        let result = simulate_payoff(&config(
            vec![
                fixed("high-rate", 1_000.0, 24.99, 25.0),
                fixed("low-rate", 5_000.0, 10.0, 25.0),
            ],
            150.0,
            PayoffStrategy::Avalanche,
        ));
        assert_approx(result.schedule[0].debts[0].extra_paid, 100.0);
        let high_rate_closed = result.debt_payoff_months[0].expect("high-rate debt pays off");
        let low_rate_closed = result.debt_payoff_months[1].expect("low-rate debt pays off");
        assert!(high_rate_closed < low_rate_closed);
    }

    #[test]
    fn snowball_and_avalanche_diverge_when_smallest_balance_has_lowest_rate() {
        let debts = vec![
            fixed("small-low", 500.0, 5.0, 25.0),
            fixed("big-high", 2_000.0, 20.0, 25.0),
        ];
        let snowball = simulate_payoff(&config(debts.clone(), 300.0, PayoffStrategy::Snowball));
        let avalanche = simulate_payoff(&config(debts, 300.0, PayoffStrategy::Avalanche));

        assert_eq!(snowball.payoff_order, vec!["small-low", "big-high"]);
        assert_eq!(avalanche.payoff_order, vec!["big-high", "small-low"]);

        assert_approx(snowball.schedule[0].debts[0].extra_paid, 250.0);
        assert_approx(snowball.schedule[0].debts[1].extra_paid, 0.0);
        assert_approx(avalanche.schedule[0].debts[0].extra_paid, 0.0);
        assert_approx(avalanche.schedule[0].debts[1].extra_paid, 250.0);

        assert!(avalanche.total_interest_paid < snowball.total_interest_paid);
    }

    #[test]
    fn sample_cards_pay_off_before_ceiling() {
        let avalanche = simulate_payoff(&sample_cards(PayoffStrategy::Avalanche));
        let snowball = simulate_payoff(&sample_cards(PayoffStrategy::Snowball));

        assert_eq!(avalanche.outcome, PayoffOutcome::PaidOff);
        assert!(avalanche.months_to_payoff < MAX_MONTHS);
        assert!(avalanche.months_to_payoff > 12);
        assert!(avalanche.total_interest_paid <= snowball.total_interest_paid + EPS);
        assert_approx(avalanche.remaining_balance(), 0.0);
    }

    #[test]
    fn minimum_only_single_debt_matches_closed_form_payoff() {
        let result = simulate_payoff(&config(
            vec![fixed("card", 5_000.0, 19.99, 150.0)],
            0.0,
            PayoffStrategy::Avalanche,
        ));
        let expected = months_to_payoff(5_000.0, 19.99, 150.0).expect("amortizes");
        assert_eq!(result.outcome, PayoffOutcome::PaidOff);
        assert_eq!(result.months_to_payoff, expected);
        assert_eq!(expected, 50);
    }

    #[test]
    fn percent_minimum_only_falls_into_the_minimum_payment_trap() {
        let result = simulate_payoff(&config(
            vec![percent("card", 5_000.0, 19.99, 2.0)],
            0.0,
            PayoffStrategy::Avalanche,
        ));
        assert_eq!(result.outcome, PayoffOutcome::CappedAtCeiling);
        assert_eq!(result.months_to_payoff, MAX_MONTHS);
        assert!(result.remaining_balance() > 0.0);
        assert!(result.total_interest_paid > 2.0 * 5_000.0);
    }

    #[test]
    fn non_amortizing_configuration_stops_at_ceiling() {
        let result = simulate_payoff(&config(
            vec![fixed("growing", 10_000.0, 24.0, 25.0)],
            0.0,
            PayoffStrategy::Snowball,
        ));
        assert_eq!(result.outcome, PayoffOutcome::CappedAtCeiling);
        assert_eq!(result.schedule.len(), MAX_MONTHS as usize);
        assert_eq!(result.schedule.last().map(|m| m.month_index), Some(MAX_MONTHS - 1));
        assert!(result.remaining_balance() > 10_000.0);
        assert_eq!(result.debt_payoff_months, vec![None]);
    }

    #[test]
    fn identical_configs_give_identical_results() {
        let a = simulate_payoff(&sample_cards(PayoffStrategy::Snowball));
        let b = simulate_payoff(&sample_cards(PayoffStrategy::Snowball));
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_balances_stay_bounded_and_non_negative(
            balances in proptest::collection::vec(0u32..20_000, 1..5),
            aprs_bp in proptest::collection::vec(0u32..3_000, 5),
            mins in proptest::collection::vec(0u32..300, 5),
            use_percent in proptest::collection::vec(proptest::bool::ANY, 5),
            extra in 0u32..1_000,
            avalanche in proptest::bool::ANY,
        ) {
            let debts = balances
                .iter()
                .enumerate()
                .map(|(i, &b)| {
                    let rule = if use_percent[i] {
                        MinPaymentRule::PercentOfBalance((mins[i] % 5) as f64 + 1.0)
                    } else {
                        MinPaymentRule::Fixed(mins[i] as f64)
                    };
                    Debt::new(format!("d{i}"), b as f64, aprs_bp[i] as f64 / 100.0, rule)
                })
                .collect::<Vec<_>>();
            let strategy = if avalanche { PayoffStrategy::Avalanche } else { PayoffStrategy::Snowball };
            let result = simulate_payoff(&config(debts.clone(), extra as f64, strategy));

            prop_assert!(result.months_to_payoff <= MAX_MONTHS);
            prop_assert_eq!(result.schedule.len(), result.months_to_payoff as usize);

            let mut previous = debts.iter().map(|d| d.balance).collect::<Vec<_>>();
            for month in &result.schedule {
                for (i, row) in month.debts.iter().enumerate() {
                    prop_assert!(row.balance >= 0.0);
                    prop_assert!(row.balance <= previous[i] + row.interest + EPS);
                    if previous[i] == 0.0 {
                        prop_assert!(row.interest == 0.0 && row.total_paid() == 0.0);
                    }
                    previous[i] = row.balance;
                }
            }

            if result.outcome == PayoffOutcome::PaidOff {
                let initial: f64 = debts.iter().map(|d| d.balance).sum();
                prop_assert!((result.total_principal_paid() - initial).abs() <= 1e-6 * initial.max(1.0));
                prop_assert!((result.total_paid - result.total_interest_paid - initial).abs() <= 1e-6 * initial.max(1.0));
            } else {
                prop_assert_eq!(result.months_to_payoff, MAX_MONTHS);
                prop_assert!(result.remaining_balance() > 0.0);
            }
        }
    }
}

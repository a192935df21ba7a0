use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffStrategy {
    Snowball,
    Avalanche,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum MinPaymentRule {
    Fixed(f64),
    PercentOfBalance(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub balance: f64,
    pub apr: f64,
    pub min_payment: MinPaymentRule,
}

impl Debt {
    pub fn new(id: impl Into<String>, balance: f64, apr: f64, min_payment: MinPaymentRule) -> Self {
        Self {
            id: id.into(),
            balance,
            apr,
            min_payment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub debts: Vec<Debt>,
    pub extra_payment: f64,
    pub strategy: PayoffStrategy,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PayoffOutcome {
    PaidOff,
    CappedAtCeiling,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtMonth {
    pub id: String,
    pub interest: f64,
    pub minimum_paid: f64,
    pub extra_paid: f64,
    pub balance: f64,
}

impl DebtMonth {
    pub fn total_paid(&self) -> f64 {
        self.minimum_paid + self.extra_paid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month_index: u32,
    /// Payments minus interest accrued this month. Negative when a debt's
    /// payments did not cover its interest.
    pub total_principal_paid: f64,
    pub total_interest_paid: f64,
    pub total_paid: f64,
    pub total_remaining_balance: f64,
    pub debts: Vec<DebtMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub outcome: PayoffOutcome,
    pub months_to_payoff: u32,
    pub total_interest_paid: f64,
    pub total_paid: f64,
    pub payoff_order: Vec<String>,
    /// 1-based month in which each debt (input order) reached zero.
    pub debt_payoff_months: Vec<Option<u32>>,
    pub schedule: Vec<MonthlyRecord>,
}

impl SimulationResult {
    pub fn remaining_balance(&self) -> f64 {
        self.schedule
            .last()
            .map(|m| m.total_remaining_balance)
            .unwrap_or(0.0)
    }

    pub fn total_principal_paid(&self) -> f64 {
        self.schedule.iter().map(|m| m.total_principal_paid).sum()
    }
}

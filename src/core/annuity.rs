use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutFrequency {
    Monthly,
    Quarterly,
    Annually,
}

impl PayoutFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayoutFrequency::Monthly => 12,
            PayoutFrequency::Quarterly => 4,
            PayoutFrequency::Annually => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnnuityInputs {
    pub principal: f64,
    pub annual_return_pct: f64,
    pub payout_years: u32,
    pub frequency: PayoutFrequency,
    pub deferral_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnuityYear {
    pub year: u32,
    pub payout: f64,
    pub growth: f64,
    pub end_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnuityResult {
    pub balance_at_payout_start: f64,
    pub payment_per_period: f64,
    pub periods: u32,
    pub total_payout: f64,
    pub total_growth: f64,
    pub years: Vec<AnnuityYear>,
}

fn annuity_payment(balance: f64, period_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    let n = periods as f64;
    if period_rate.abs() < 1e-12 {
        return balance / n;
    }
    balance * period_rate / (1.0 - (1.0 + period_rate).powf(-n))
}

pub fn annuity_payout(inputs: &AnnuityInputs) -> AnnuityResult {
    let annual_rate = inputs.annual_return_pct / 100.0;
    let balance_at_payout_start =
        inputs.principal * (1.0 + annual_rate).powi(inputs.deferral_years as i32);

    let per_year = inputs.frequency.periods_per_year();
    let period_rate = annual_rate / per_year as f64;
    let periods = inputs.payout_years * per_year;
    let payment = annuity_payment(balance_at_payout_start, period_rate, periods);

    let mut years = Vec::with_capacity(inputs.payout_years as usize);
    let mut balance = balance_at_payout_start;
    for year in 1..=inputs.payout_years {
        let mut payout = 0.0;
        let mut growth = 0.0;
        for _ in 0..per_year {
            let g = balance * period_rate;
            balance += g;
            let paid = payment.min(balance);
            balance -= paid;
            payout += paid;
            growth += g;
        }
        if year == inputs.payout_years && balance.abs() < 1e-6 {
            balance = 0.0;
        }
        years.push(AnnuityYear {
            year,
            payout,
            growth,
            end_balance: balance,
        });
    }

    let total_payout = payment * periods as f64;
    AnnuityResult {
        balance_at_payout_start,
        payment_per_period: payment,
        periods,
        total_payout,
        total_growth: total_payout - inputs.principal,
        years,
    }
}

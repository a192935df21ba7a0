use serde::Serialize;

use super::amortization::{level_payment, present_value};

pub const DEFAULT_FRONT_END_RATIO: f64 = 28.0;
pub const DEFAULT_BACK_END_RATIO: f64 = 36.0;

#[derive(Debug, Clone, Copy)]
pub struct AffordabilityInputs {
    pub annual_income: f64,
    pub monthly_debts: f64,
    pub down_payment: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub property_tax_pct: f64,
    pub annual_insurance: f64,
    pub monthly_hoa: f64,
    pub front_end_ratio_pct: f64,
    pub back_end_ratio_pct: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitingRatio {
    FrontEnd,
    BackEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityResult {
    pub max_home_price: f64,
    pub loan_amount: f64,
    pub max_housing_payment: f64,
    pub monthly_principal_interest: f64,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
    pub total_monthly_payment: f64,
    pub limiting_ratio: LimitingRatio,
}

/// Largest home price whose full monthly housing cost fits inside both
/// debt-to-income limits.
///
/// Housing cost is `P&I(price - down) + price * tax/12 + insurance/12 + HOA`.
/// P&I is linear in the loan amount, so the price comes out in closed form.
pub fn house_affordability(inputs: &AffordabilityInputs) -> AffordabilityResult {
    let monthly_income = inputs.annual_income / 12.0;
    let front_limit = monthly_income * inputs.front_end_ratio_pct / 100.0;
    let back_limit = monthly_income * inputs.back_end_ratio_pct / 100.0 - inputs.monthly_debts;
    let (max_housing_payment, limiting_ratio) = if front_limit <= back_limit {
        (front_limit.max(0.0), LimitingRatio::FrontEnd)
    } else {
        (back_limit.max(0.0), LimitingRatio::BackEnd)
    };

    let months = inputs.term_years * 12;
    let monthly_insurance = inputs.annual_insurance / 12.0;
    let tax_per_dollar = inputs.property_tax_pct / 100.0 / 12.0;

    // P&I per dollar borrowed.
    let pi_per_dollar = if months == 0 {
        0.0
    } else {
        1.0 / present_value(1.0, inputs.annual_rate_pct, months)
    };

    let budget_after_fixed = max_housing_payment - monthly_insurance - inputs.monthly_hoa;
    let denom = pi_per_dollar + tax_per_dollar;
    let price = if budget_after_fixed <= 0.0 || denom <= 0.0 {
        0.0
    } else {
        (budget_after_fixed + pi_per_dollar * inputs.down_payment) / denom
    };

    // A down payment larger than the computed price means no loan is needed,
    // and the tax-only budget caps the price instead.
    let price = if price < inputs.down_payment {
        if tax_per_dollar > 0.0 {
            (budget_after_fixed.max(0.0) / tax_per_dollar).min(inputs.down_payment)
        } else {
            inputs.down_payment
        }
    } else {
        price
    };

    let loan_amount = (price - inputs.down_payment).max(0.0);
    let monthly_principal_interest = level_payment(loan_amount, inputs.annual_rate_pct, months);
    let monthly_property_tax = price * tax_per_dollar;
    let total_monthly_payment =
        monthly_principal_interest + monthly_property_tax + monthly_insurance + inputs.monthly_hoa;

    AffordabilityResult {
        max_home_price: price,
        loan_amount,
        max_housing_payment,
        monthly_principal_interest,
        monthly_property_tax,
        monthly_insurance,
        monthly_hoa: inputs.monthly_hoa,
        total_monthly_payment,
        limiting_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_inputs() -> AffordabilityInputs {
        AffordabilityInputs {
            annual_income: 120_000.0,
            monthly_debts: 500.0,
            down_payment: 60_000.0,
            annual_rate_pct: 6.5,
            term_years: 30,
            property_tax_pct: 1.2,
            annual_insurance: 1_800.0,
            monthly_hoa: 0.0,
            front_end_ratio_pct: DEFAULT_FRONT_END_RATIO,
            back_end_ratio_pct: DEFAULT_BACK_END_RATIO,
        }
    }

    #[test]
    fn payment_fills_front_end_limit() {
        let result = house_affordability(&sample_inputs());
        assert_eq!(result.limiting_ratio, LimitingRatio::FrontEnd);
        assert_close(result.max_housing_payment, 2_800.0, 1e-9);
        assert_close(result.total_monthly_payment, 2_800.0, 1e-6);
        assert_close(result.loan_amount, result.max_home_price - 60_000.0, 1e-6);
    }

    #[test]
    fn heavy_debts_switch_to_back_end_limit() {
        let mut inputs = sample_inputs();
        inputs.monthly_debts = 1_500.0;
        let result = house_affordability(&inputs);
        assert_eq!(result.limiting_ratio, LimitingRatio::BackEnd);
        assert_close(result.max_housing_payment, 2_100.0, 1e-9);
        assert_close(result.total_monthly_payment, 2_100.0, 1e-6);
    }

    #[test]
    fn debts_exceeding_back_end_limit_afford_nothing_beyond_cash() {
        let mut inputs = sample_inputs();
        inputs.monthly_debts = 10_000.0;
        inputs.down_payment = 0.0;
        let result = house_affordability(&inputs);
        assert_close(result.max_housing_payment, 0.0, 1e-9);
        assert_close(result.max_home_price, 0.0, 1e-9);
        assert_close(result.loan_amount, 0.0, 1e-9);
    }
}

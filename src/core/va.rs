use serde::Serialize;

use super::amortization::level_payment;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VaLoanType {
    Purchase,
    CashOutRefinance,
    /// Interest Rate Reduction Refinance Loan.
    Irrrl,
}

#[derive(Debug, Clone, Copy)]
pub struct VaMortgageInputs {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub loan_type: VaLoanType,
    pub first_use: bool,
    pub exempt: bool,
    pub finance_fee: bool,
    pub property_tax_pct: f64,
    pub annual_insurance: f64,
    pub monthly_hoa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaMortgageResult {
    pub base_loan_amount: f64,
    pub down_payment_pct: f64,
    pub funding_fee_rate_pct: f64,
    pub funding_fee: f64,
    pub fee_due_at_closing: f64,
    pub total_loan_amount: f64,
    pub monthly_principal_interest: f64,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
    pub total_monthly_payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
}

/// Funding fee as a percentage of the base loan amount.
pub fn funding_fee_rate(
    loan_type: VaLoanType,
    first_use: bool,
    down_payment_pct: f64,
    exempt: bool,
) -> f64 {
    if exempt {
        return 0.0;
    }
    match loan_type {
        VaLoanType::Irrrl => 0.5,
        VaLoanType::CashOutRefinance => {
            if first_use {
                2.15
            } else {
                3.3
            }
        }
        VaLoanType::Purchase => {
            if down_payment_pct >= 10.0 {
                1.25
            } else if down_payment_pct >= 5.0 {
                1.5
            } else if first_use {
                2.15
            } else {
                3.3
            }
        }
    }
}

pub fn va_mortgage(inputs: &VaMortgageInputs) -> VaMortgageResult {
    let base_loan_amount = (inputs.home_price - inputs.down_payment).max(0.0);
    let down_payment_pct = if inputs.home_price > 0.0 {
        inputs.down_payment / inputs.home_price * 100.0
    } else {
        0.0
    };
    let rate = funding_fee_rate(
        inputs.loan_type,
        inputs.first_use,
        down_payment_pct,
        inputs.exempt,
    );
    let funding_fee = base_loan_amount * rate / 100.0;
    let (total_loan_amount, fee_due_at_closing) = if inputs.finance_fee {
        (base_loan_amount + funding_fee, 0.0)
    } else {
        (base_loan_amount, funding_fee)
    };

    let months = inputs.term_years * 12;
    let monthly_principal_interest = level_payment(total_loan_amount, inputs.annual_rate_pct, months);
    let monthly_property_tax = inputs.home_price * inputs.property_tax_pct / 100.0 / 12.0;
    let monthly_insurance = inputs.annual_insurance / 12.0;
    let total_monthly_payment =
        monthly_principal_interest + monthly_property_tax + monthly_insurance + inputs.monthly_hoa;
    let total_interest = monthly_principal_interest * months as f64 - total_loan_amount;

    VaMortgageResult {
        base_loan_amount,
        down_payment_pct,
        funding_fee_rate_pct: rate,
        funding_fee,
        fee_due_at_closing,
        total_loan_amount,
        monthly_principal_interest,
        monthly_property_tax,
        monthly_insurance,
        monthly_hoa: inputs.monthly_hoa,
        total_monthly_payment,
        total_interest,
        total_cost: total_monthly_payment * months as f64 + inputs.down_payment + fee_due_at_closing,
    }
}

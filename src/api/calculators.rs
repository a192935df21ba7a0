use serde::{Deserialize, Serialize};

use super::error::{ValidationError, require_non_negative, require_percent};
use crate::core::affordability::{
    AffordabilityInputs, DEFAULT_BACK_END_RATIO, DEFAULT_FRONT_END_RATIO,
};
use crate::core::amortization::{CardPayoff, LoanSummary, credit_card_payoff, loan_summary};
use crate::core::annuity::{AnnuityInputs, PayoutFrequency};
use crate::core::pension::PensionInputs;
use crate::core::social_security::SocialSecurityInputs;
use crate::core::va::{VaLoanType, VaMortgageInputs};

const MAX_TERM_YEARS: u32 = 50;
const MAX_AGE: u32 = 120;

fn require_term(field: &'static str, years: u32) -> Result<(), ValidationError> {
    if years == 0 || years > MAX_TERM_YEARS {
        return Err(ValidationError::field(
            field,
            format!("must be between 1 and {MAX_TERM_YEARS}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct MortgagePayload {
    loan_amount: Option<f64>,
    annual_rate: Option<f64>,
    term_years: Option<u32>,
    include_schedule: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MortgageResponse {
    loan_amount: f64,
    annual_rate: f64,
    term_years: u32,
    #[serde(flatten)]
    summary: LoanSummary,
}

pub(super) fn mortgage(payload: MortgagePayload) -> Result<MortgageResponse, ValidationError> {
    let loan_amount = payload.loan_amount.unwrap_or(300_000.0);
    let annual_rate = payload.annual_rate.unwrap_or(6.5);
    let term_years = payload.term_years.unwrap_or(30);
    require_non_negative("loanAmount", loan_amount)?;
    require_percent("annualRate", annual_rate, 100.0)?;
    require_term("termYears", term_years)?;

    let mut summary = loan_summary(loan_amount, annual_rate, term_years * 12);
    if !payload.include_schedule.unwrap_or(true) {
        summary.schedule.clear();
    }
    Ok(MortgageResponse {
        loan_amount,
        annual_rate,
        term_years,
        summary,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct CreditCardPayload {
    balance: Option<f64>,
    apr: Option<f64>,
    monthly_payment: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreditCardResponse {
    does_not_pay_off: bool,
    #[serde(flatten)]
    payoff: CardPayoff,
}

pub(super) fn credit_card(
    payload: CreditCardPayload,
) -> Result<CreditCardResponse, ValidationError> {
    let balance = payload.balance.unwrap_or(5_000.0);
    let apr = payload.apr.unwrap_or(19.99);
    let monthly_payment = payload.monthly_payment.unwrap_or(200.0);
    require_non_negative("balance", balance)?;
    require_percent("apr", apr, 100.0)?;
    require_non_negative("monthlyPayment", monthly_payment)?;

    let payoff = credit_card_payoff(balance, apr, monthly_payment);
    Ok(CreditCardResponse {
        does_not_pay_off: payoff.months.is_none(),
        payoff,
    })
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) enum ApiPayoutFrequency {
    Monthly,
    Quarterly,
    #[serde(alias = "annual", alias = "yearly")]
    Annually,
}

impl From<ApiPayoutFrequency> for PayoutFrequency {
    fn from(value: ApiPayoutFrequency) -> Self {
        match value {
            ApiPayoutFrequency::Monthly => PayoutFrequency::Monthly,
            ApiPayoutFrequency::Quarterly => PayoutFrequency::Quarterly,
            ApiPayoutFrequency::Annually => PayoutFrequency::Annually,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct AnnuityPayload {
    principal: Option<f64>,
    annual_return: Option<f64>,
    payout_years: Option<u32>,
    frequency: Option<ApiPayoutFrequency>,
    deferral_years: Option<u32>,
}

pub(super) fn annuity_inputs(payload: AnnuityPayload) -> Result<AnnuityInputs, ValidationError> {
    let inputs = AnnuityInputs {
        principal: payload.principal.unwrap_or(500_000.0),
        annual_return_pct: payload.annual_return.unwrap_or(5.0),
        payout_years: payload.payout_years.unwrap_or(25),
        frequency: payload
            .frequency
            .map(PayoutFrequency::from)
            .unwrap_or(PayoutFrequency::Monthly),
        deferral_years: payload.deferral_years.unwrap_or(0),
    };
    require_non_negative("principal", inputs.principal)?;
    require_percent("annualReturn", inputs.annual_return_pct, 100.0)?;
    require_term("payoutYears", inputs.payout_years)?;
    if inputs.deferral_years > MAX_TERM_YEARS {
        return Err(ValidationError::field(
            "deferralYears",
            format!("must be <= {MAX_TERM_YEARS}"),
        ));
    }
    Ok(inputs)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct AffordabilityPayload {
    annual_income: Option<f64>,
    monthly_debts: Option<f64>,
    down_payment: Option<f64>,
    annual_rate: Option<f64>,
    term_years: Option<u32>,
    property_tax_rate: Option<f64>,
    annual_insurance: Option<f64>,
    monthly_hoa: Option<f64>,
    front_end_ratio: Option<f64>,
    back_end_ratio: Option<f64>,
}

pub(super) fn affordability_inputs(
    payload: AffordabilityPayload,
) -> Result<AffordabilityInputs, ValidationError> {
    let inputs = AffordabilityInputs {
        annual_income: payload.annual_income.unwrap_or(100_000.0),
        monthly_debts: payload.monthly_debts.unwrap_or(0.0),
        down_payment: payload.down_payment.unwrap_or(40_000.0),
        annual_rate_pct: payload.annual_rate.unwrap_or(6.5),
        term_years: payload.term_years.unwrap_or(30),
        property_tax_pct: payload.property_tax_rate.unwrap_or(1.1),
        annual_insurance: payload.annual_insurance.unwrap_or(1_500.0),
        monthly_hoa: payload.monthly_hoa.unwrap_or(0.0),
        front_end_ratio_pct: payload.front_end_ratio.unwrap_or(DEFAULT_FRONT_END_RATIO),
        back_end_ratio_pct: payload.back_end_ratio.unwrap_or(DEFAULT_BACK_END_RATIO),
    };
    require_non_negative("annualIncome", inputs.annual_income)?;
    require_non_negative("monthlyDebts", inputs.monthly_debts)?;
    require_non_negative("downPayment", inputs.down_payment)?;
    require_percent("annualRate", inputs.annual_rate_pct, 100.0)?;
    require_term("termYears", inputs.term_years)?;
    require_percent("propertyTaxRate", inputs.property_tax_pct, 100.0)?;
    require_non_negative("annualInsurance", inputs.annual_insurance)?;
    require_non_negative("monthlyHoa", inputs.monthly_hoa)?;
    require_percent("frontEndRatio", inputs.front_end_ratio_pct, 100.0)?;
    require_percent("backEndRatio", inputs.back_end_ratio_pct, 100.0)?;
    Ok(inputs)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct PensionPayload {
    final_average_salary: Option<f64>,
    years_of_service: Option<f64>,
    multiplier: Option<f64>,
    cola: Option<f64>,
    retirement_age: Option<u32>,
    end_age: Option<u32>,
    lump_sum_offer: Option<f64>,
    discount_rate: Option<f64>,
}

pub(super) fn pension_inputs(payload: PensionPayload) -> Result<PensionInputs, ValidationError> {
    let inputs = PensionInputs {
        final_average_salary: payload.final_average_salary.unwrap_or(75_000.0),
        years_of_service: payload.years_of_service.unwrap_or(25.0),
        accrual_multiplier_pct: payload.multiplier.unwrap_or(2.0),
        cola_pct: payload.cola.unwrap_or(2.0),
        retirement_age: payload.retirement_age.unwrap_or(62),
        end_age: payload.end_age.unwrap_or(90),
        lump_sum_offer: payload.lump_sum_offer,
        discount_rate_pct: payload.discount_rate.unwrap_or(5.0),
    };
    require_non_negative("finalAverageSalary", inputs.final_average_salary)?;
    require_non_negative("yearsOfService", inputs.years_of_service)?;
    require_percent("multiplier", inputs.accrual_multiplier_pct, 10.0)?;
    require_percent("cola", inputs.cola_pct, 20.0)?;
    require_percent("discountRate", inputs.discount_rate_pct, 100.0)?;
    if let Some(offer) = inputs.lump_sum_offer {
        require_non_negative("lumpSumOffer", offer)?;
    }
    if inputs.end_age <= inputs.retirement_age || inputs.end_age > MAX_AGE {
        return Err(ValidationError::field(
            "endAge",
            format!("must be > retirementAge and <= {MAX_AGE}"),
        ));
    }
    Ok(inputs)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SocialSecurityPayload {
    aime: Option<f64>,
    birth_year: Option<u32>,
    claim_age: Option<u32>,
    claim_age_months: Option<u32>,
    cola: Option<f64>,
    end_age: Option<u32>,
}

pub(super) fn social_security_inputs(
    payload: SocialSecurityPayload,
) -> Result<SocialSecurityInputs, ValidationError> {
    let inputs = SocialSecurityInputs {
        aime: payload.aime.unwrap_or(5_000.0),
        birth_year: payload.birth_year.unwrap_or(1965),
        claim_age_years: payload.claim_age.unwrap_or(67),
        claim_age_months: payload.claim_age_months.unwrap_or(0),
        cola_pct: payload.cola.unwrap_or(2.5),
        end_age: payload.end_age.unwrap_or(90),
    };
    require_non_negative("aime", inputs.aime)?;
    require_percent("cola", inputs.cola_pct, 20.0)?;
    if !(62..=70).contains(&inputs.claim_age_years) {
        return Err(ValidationError::field("claimAge", "must be between 62 and 70"));
    }
    if inputs.claim_age_months > 11 {
        return Err(ValidationError::field(
            "claimAgeMonths",
            "must be between 0 and 11",
        ));
    }
    if inputs.claim_age_years == 70 && inputs.claim_age_months > 0 {
        return Err(ValidationError::field("claimAgeMonths", "must be 0 at age 70"));
    }
    if !(1900..=2100).contains(&inputs.birth_year) {
        return Err(ValidationError::field(
            "birthYear",
            "must be between 1900 and 2100",
        ));
    }
    if inputs.end_age <= inputs.claim_age_years || inputs.end_age > MAX_AGE {
        return Err(ValidationError::field(
            "endAge",
            format!("must be > claimAge and <= {MAX_AGE}"),
        ));
    }
    Ok(inputs)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) enum ApiVaLoanType {
    Purchase,
    #[serde(alias = "cashOut", alias = "cash-out")]
    CashOutRefinance,
    #[serde(alias = "IRRRL", alias = "streamline")]
    Irrrl,
}

impl From<ApiVaLoanType> for VaLoanType {
    fn from(value: ApiVaLoanType) -> Self {
        match value {
            ApiVaLoanType::Purchase => VaLoanType::Purchase,
            ApiVaLoanType::CashOutRefinance => VaLoanType::CashOutRefinance,
            ApiVaLoanType::Irrrl => VaLoanType::Irrrl,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct VaMortgagePayload {
    home_price: Option<f64>,
    down_payment: Option<f64>,
    annual_rate: Option<f64>,
    term_years: Option<u32>,
    loan_type: Option<ApiVaLoanType>,
    first_use: Option<bool>,
    exempt: Option<bool>,
    finance_fee: Option<bool>,
    property_tax_rate: Option<f64>,
    annual_insurance: Option<f64>,
    monthly_hoa: Option<f64>,
}

pub(super) fn va_mortgage_inputs(
    payload: VaMortgagePayload,
) -> Result<VaMortgageInputs, ValidationError> {
    let inputs = VaMortgageInputs {
        home_price: payload.home_price.unwrap_or(350_000.0),
        down_payment: payload.down_payment.unwrap_or(0.0),
        annual_rate_pct: payload.annual_rate.unwrap_or(6.25),
        term_years: payload.term_years.unwrap_or(30),
        loan_type: payload
            .loan_type
            .map(VaLoanType::from)
            .unwrap_or(VaLoanType::Purchase),
        first_use: payload.first_use.unwrap_or(true),
        exempt: payload.exempt.unwrap_or(false),
        finance_fee: payload.finance_fee.unwrap_or(true),
        property_tax_pct: payload.property_tax_rate.unwrap_or(1.1),
        annual_insurance: payload.annual_insurance.unwrap_or(1_500.0),
        monthly_hoa: payload.monthly_hoa.unwrap_or(0.0),
    };
    require_non_negative("homePrice", inputs.home_price)?;
    require_non_negative("downPayment", inputs.down_payment)?;
    if inputs.down_payment > inputs.home_price {
        return Err(ValidationError::field("downPayment", "must be <= homePrice"));
    }
    require_percent("annualRate", inputs.annual_rate_pct, 100.0)?;
    require_term("termYears", inputs.term_years)?;
    require_percent("propertyTaxRate", inputs.property_tax_pct, 100.0)?;
    require_non_negative("annualInsurance", inputs.annual_insurance)?;
    require_non_negative("monthlyHoa", inputs.monthly_hoa)?;
    Ok(inputs)
}

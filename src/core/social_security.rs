use serde::Serialize;

/// 2024 PIA bend points (monthly AIME dollars).
pub const FIRST_BEND_POINT: f64 = 1_174.0;
pub const SECOND_BEND_POINT: f64 = 7_078.0;

const EARLIEST_CLAIM_MONTHS: u32 = 62 * 12;
const LATEST_CREDIT_MONTHS: u32 = 70 * 12;

#[derive(Debug, Clone, Copy)]
pub struct SocialSecurityInputs {
    pub aime: f64,
    pub birth_year: u32,
    pub claim_age_years: u32,
    pub claim_age_months: u32,
    pub cola_pct: f64,
    pub end_age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitYear {
    pub age: u32,
    pub annual_benefit: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSecurityResult {
    pub primary_insurance_amount: f64,
    pub full_retirement_age_months: u32,
    pub claim_age_months: u32,
    pub adjustment_factor: f64,
    pub monthly_benefit: f64,
    pub annual_benefit: f64,
    pub total_benefits: f64,
    pub years: Vec<BenefitYear>,
}

fn floor_to_dime(amount: f64) -> f64 {
    (amount * 10.0 + 1e-9).floor() / 10.0
}

/// Progressive bend-point formula: 90% / 32% / 15% of AIME, rounded down to
/// the dime.
pub fn primary_insurance_amount(aime: f64) -> f64 {
    let aime = aime.max(0.0);
    let first = aime.min(FIRST_BEND_POINT);
    let second = (aime.min(SECOND_BEND_POINT) - FIRST_BEND_POINT).max(0.0);
    let third = (aime - SECOND_BEND_POINT).max(0.0);
    floor_to_dime(0.90 * first + 0.32 * second + 0.15 * third)
}

/// Full retirement age in months for a given birth year.
pub fn full_retirement_age(birth_year: u32) -> u32 {
    match birth_year {
        0..=1937 => 65 * 12,
        1938..=1942 => 65 * 12 + 2 * (birth_year - 1937),
        1943..=1954 => 66 * 12,
        1955..=1959 => 66 * 12 + 2 * (birth_year - 1954),
        _ => 67 * 12,
    }
}

/// Multiplier applied to the PIA when claiming at `claim_months` (age in
/// months) against a full retirement age of `fra_months`.
pub fn claiming_adjustment(fra_months: u32, claim_months: u32) -> f64 {
    let claim_months = claim_months.clamp(EARLIEST_CLAIM_MONTHS, LATEST_CREDIT_MONTHS);
    if claim_months < fra_months {
        let early = (fra_months - claim_months) as f64;
        let first = early.min(36.0);
        let beyond = (early - 36.0).max(0.0);
        1.0 - first * (5.0 / 9.0) / 100.0 - beyond * (5.0 / 12.0) / 100.0
    } else {
        let delayed = (claim_months - fra_months) as f64;
        1.0 + delayed * (2.0 / 3.0) / 100.0
    }
}

pub fn estimate_benefit(inputs: &SocialSecurityInputs) -> SocialSecurityResult {
    let pia = primary_insurance_amount(inputs.aime);
    let fra = full_retirement_age(inputs.birth_year);
    let claim_months = (inputs.claim_age_years * 12 + inputs.claim_age_months)
        .clamp(EARLIEST_CLAIM_MONTHS, LATEST_CREDIT_MONTHS);
    let factor = claiming_adjustment(fra, claim_months);
    let monthly_benefit = floor_to_dime(pia * factor);

    let cola = inputs.cola_pct / 100.0;
    let start_age = claim_months / 12;
    // Months collected in the claiming year.
    let first_year_months = 12 - claim_months % 12;

    let mut years = Vec::new();
    let mut monthly = monthly_benefit;
    let mut cumulative = 0.0;
    for age in start_age..inputs.end_age {
        let months = if age == start_age { first_year_months } else { 12 };
        let annual = monthly * months as f64;
        cumulative += annual;
        years.push(BenefitYear {
            age,
            annual_benefit: annual,
            cumulative,
        });
        monthly *= 1.0 + cola;
    }

    SocialSecurityResult {
        primary_insurance_amount: pia,
        full_retirement_age_months: fra,
        claim_age_months: claim_months,
        adjustment_factor: factor,
        monthly_benefit,
        annual_benefit: monthly_benefit * 12.0,
        total_benefits: cumulative,
        years,
    }
}

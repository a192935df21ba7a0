use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct PensionInputs {
    pub final_average_salary: f64,
    pub years_of_service: f64,
    pub accrual_multiplier_pct: f64,
    pub cola_pct: f64,
    pub retirement_age: u32,
    pub end_age: u32,
    pub lump_sum_offer: Option<f64>,
    pub discount_rate_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionYear {
    pub age: u32,
    pub annual_benefit: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpSumComparison {
    pub offer: f64,
    pub present_value_of_annuity: f64,
    pub break_even_age: Option<u32>,
    pub annuity_is_worth_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionResult {
    pub initial_annual_benefit: f64,
    pub initial_monthly_benefit: f64,
    pub total_benefits: f64,
    pub years: Vec<PensionYear>,
    pub lump_sum: Option<LumpSumComparison>,
}

pub fn annual_benefit(salary: f64, years_of_service: f64, multiplier_pct: f64) -> f64 {
    (salary * years_of_service * multiplier_pct / 100.0).max(0.0)
}

pub fn project_pension(inputs: &PensionInputs) -> PensionResult {
    let initial = annual_benefit(
        inputs.final_average_salary,
        inputs.years_of_service,
        inputs.accrual_multiplier_pct,
    );
    let cola = inputs.cola_pct / 100.0;

    let mut years = Vec::new();
    let mut benefit = initial;
    let mut cumulative = 0.0;
    for age in inputs.retirement_age..inputs.end_age {
        cumulative += benefit;
        years.push(PensionYear {
            age,
            annual_benefit: benefit,
            cumulative,
        });
        benefit *= 1.0 + cola;
    }

    let lump_sum = inputs
        .lump_sum_offer
        .map(|offer| compare_lump_sum(offer, &years, inputs.discount_rate_pct));

    PensionResult {
        initial_annual_benefit: initial,
        initial_monthly_benefit: initial / 12.0,
        total_benefits: cumulative,
        years,
        lump_sum,
    }
}

fn compare_lump_sum(offer: f64, years: &[PensionYear], discount_rate_pct: f64) -> LumpSumComparison {
    let discount = 1.0 + discount_rate_pct / 100.0;
    let present_value_of_annuity = years
        .iter()
        .enumerate()
        .map(|(t, y)| y.annual_benefit / discount.powi(t as i32))
        .sum::<f64>();
    let break_even_age = years.iter().find(|y| y.cumulative > offer).map(|y| y.age);

    LumpSumComparison {
        offer,
        present_value_of_annuity,
        break_even_age,
        annuity_is_worth_more: present_value_of_annuity > offer,
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

    fn sample_inputs() -> PensionInputs {
        PensionInputs {
            final_average_salary: 80_000.0,
            years_of_service: 25.0,
            accrual_multiplier_pct: 2.0,
            cola_pct: 2.0,
            retirement_age: 62,
            end_age: 90,
            lump_sum_offer: None,
            discount_rate_pct: 5.0,
        }
    }

    #[test]
    fn benefit_formula_and_cola_projection() {
        let result = project_pension(&sample_inputs());
        assert_close(result.initial_annual_benefit, 40_000.0, 1e-9);
        assert_close(result.initial_monthly_benefit, 40_000.0 / 12.0, 1e-9);
        assert_eq!(result.years.len(), 28);
        assert_eq!(result.years[0].age, 62);
        assert_close(result.years[1].annual_benefit, 40_800.0, 1e-9);
        assert_close(
            result.total_benefits,
            result.years.iter().map(|y| y.annual_benefit).sum::<f64>(),
            1e-6,
        );
    }

    #[test]
    fn lump_sum_break_even_and_present_value() {
        let mut inputs = sample_inputs();
        inputs.cola_pct = 0.0;
        inputs.discount_rate_pct = 0.0;
        inputs.lump_sum_offer = Some(100_000.0);
        let result = project_pension(&inputs);
        let lump = result.lump_sum.expect("offer supplied");
        assert_eq!(lump.break_even_age, Some(64));
        assert_close(lump.present_value_of_annuity, 40_000.0 * 28.0, 1e-6);
        assert!(lump.annuity_is_worth_more);
    }

    #[test]
    fn break_even_requires_cumulative_to_exceed_offer() {
        let mut inputs = sample_inputs();
        inputs.cola_pct = 0.0;
        inputs.lump_sum_offer = Some(80_000.0);
        let lump = project_pension(&inputs).lump_sum.expect("offer supplied");
        // cumulative hits exactly 80,000 at 63
        assert_eq!(lump.break_even_age, Some(64));
    }

    #[test]
    fn empty_projection_when_end_age_not_after_retirement() {
        let mut inputs = sample_inputs();
        inputs.end_age = inputs.retirement_age;
        let result = project_pension(&inputs);
        assert!(result.years.is_empty());
        assert_close(result.total_benefits, 0.0, 1e-9);
    }
}

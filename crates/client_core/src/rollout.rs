//! Rollout view financial calculator.
//!
//! Blended labour rate from the field mix (80% reps at $22/h, 15% managers at
//! $40/h, 5% QA at $28/h) scaled to the user's hourly rate, with savings and
//! one-time cost taken from the phased rollout plan.

const REP_SHARE: f64 = 0.80;
const MANAGER_SHARE: f64 = 0.15;
const QA_SHARE: f64 = 0.05;
const REP_RATE: f64 = 22.0;
const MANAGER_RATE: f64 = 40.0;
const QA_RATE: f64 = 28.0;
const REFERENCE_RATE: f64 = 25.0;
const ANNUAL_HOURS: f64 = 40.0 * 52.0;
const PLAN_SAVINGS_MILLIONS: f64 = 7.29;
const PLAN_HEADCOUNT: f64 = 120.0;
const PLAN_RATE: f64 = 40.0;
const IMPLEMENTATION_COST_MILLIONS: f64 = 1.87;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutField {
    HourlyRate,
    FieldForce,
    AutomationRate,
}

impl RolloutField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "hourlyRate" | "hourly" => Some(Self::HourlyRate),
            "fieldForce" | "force" => Some(Self::FieldForce),
            "automationRate" | "automation" => Some(Self::AutomationRate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutInputs {
    pub hourly_rate: u32,
    pub field_force: u32,
    /// Percent, 0..=100.
    pub automation_rate: u32,
}

impl Default for RolloutInputs {
    fn default() -> Self {
        Self {
            hourly_rate: 25,
            field_force: 3500,
            automation_rate: 60,
        }
    }
}

impl RolloutInputs {
    /// Applies a raw input value; non-numeric input leaves the field unchanged.
    pub fn apply(&mut self, field: RolloutField, raw: &str) -> bool {
        let Ok(value) = raw.trim().parse::<u32>() else {
            return false;
        };
        match field {
            RolloutField::HourlyRate => self.hourly_rate = value,
            RolloutField::FieldForce => self.field_force = value,
            RolloutField::AutomationRate => self.automation_rate = value.min(100),
        }
        true
    }

    pub fn project(&self) -> RolloutProjection {
        let blended = REP_SHARE * REP_RATE + MANAGER_SHARE * MANAGER_RATE + QA_SHARE * QA_RATE;
        let adjusted_rate = f64::from(self.hourly_rate) * (blended / REFERENCE_RATE);
        let cost_base = f64::from(self.field_force) * adjusted_rate * ANNUAL_HOURS / 1_000_000.0;

        let savings_rate =
            PLAN_SAVINGS_MILLIONS / (PLAN_HEADCOUNT * PLAN_RATE * ANNUAL_HOURS / 1_000_000.0);
        let automation = f64::from(self.automation_rate) / 100.0;
        let annual_savings = cost_base * automation * savings_rate;

        let roi_months = if annual_savings > 0.0 {
            Some(IMPLEMENTATION_COST_MILLIONS / (annual_savings / 12.0))
        } else {
            None
        };

        RolloutProjection {
            cost_base_millions: cost_base,
            annual_savings_millions: annual_savings,
            roi_months,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutProjection {
    pub cost_base_millions: f64,
    pub annual_savings_millions: f64,
    /// `None` when there are no savings to pay the implementation back.
    pub roi_months: Option<f64>,
}

impl RolloutProjection {
    pub fn cost_base_display(&self) -> String {
        format!("${:.1}M", self.cost_base_millions)
    }

    pub fn savings_display(&self) -> String {
        format!("${:.1}M", self.annual_savings_millions)
    }

    pub fn roi_display(&self) -> String {
        match self.roi_months {
            Some(months) => format!("{months:.1} months"),
            None => "n/a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_projection_matches_plan_figures() {
        let projection = RolloutInputs::default().project();
        assert_eq!(projection.cost_base_display(), "$182.0M");
        assert_eq!(projection.savings_display(), "$79.7M");
        assert_eq!(projection.roi_display(), "0.3 months");
    }

    #[test]
    fn raising_automation_changes_savings() {
        let mut inputs = RolloutInputs::default();
        let before = inputs.project().savings_display();
        assert!(inputs.apply(RolloutField::AutomationRate, "90"));
        let after = inputs.project().savings_display();
        assert_ne!(before, after);
        assert_eq!(after, "$119.6M");
    }

    #[test]
    fn zero_automation_has_no_payback() {
        let mut inputs = RolloutInputs::default();
        inputs.apply(RolloutField::AutomationRate, "0");
        assert_eq!(inputs.project().roi_display(), "n/a");
    }

    #[test]
    fn rejects_non_numeric_and_caps_automation() {
        let mut inputs = RolloutInputs::default();
        assert!(!inputs.apply(RolloutField::FieldForce, "lots"));
        assert_eq!(inputs.field_force, 3500);
        inputs.apply(RolloutField::AutomationRate, "250");
        assert_eq!(inputs.automation_rate, 100);
    }
}

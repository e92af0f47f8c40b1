use serde::{Deserialize, Serialize};

/// Approval cut-off, in percent.
pub const APPROVAL_THRESHOLD_PCT: f64 = 70.0;
/// Lowest percentage still considered low risk.
pub const LOW_RISK_FLOOR_PCT: f64 = 75.0;
/// Lowest percentage still considered medium risk.
pub const MEDIUM_RISK_FLOOR_PCT: f64 = 55.0;

/// Converts an approved-class probability into the percentage the policy compares against.
pub fn probability_pct(probability: f64) -> f64 {
    probability * 100.0
}

/// Percentage rendered with one decimal place, e.g. `82.4%`.
pub fn format_pct(probability: f64) -> String {
    format!("{:.1}%", probability_pct(probability))
}

/// Decision shown to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalDecision {
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Not Approved")]
    NotApproved,
}

impl ApprovalDecision {
    pub fn from_probability(probability: f64) -> Self {
        if probability_pct(probability) >= APPROVAL_THRESHOLD_PCT {
            Self::Approved
        } else {
            Self::NotApproved
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::NotApproved => "Not Approved",
        }
    }
}

/// Three-tier risk band derived from the approval probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_probability(probability: f64) -> Self {
        let pct = probability_pct(probability);
        if pct >= LOW_RISK_FLOOR_PCT {
            Self::Low
        } else if pct >= MEDIUM_RISK_FLOOR_PCT {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

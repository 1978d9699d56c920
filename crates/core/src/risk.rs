//! Canonical risk classifier.
//!
//! An additive point system inspired by NICE NG131 screening guidance: each
//! rule that fires contributes points and a short human-readable factor
//! string, and the total maps onto a discrete tier. The rule set and
//! thresholds are a product decision; DESIGN.md records the rationale.
//!
//! The classifier is a pure function of the record and an injected
//! evaluation date. Callers (and tests) pass the date explicitly so the
//! result never depends on the wall clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intake::{Ethnicity, FamilyRelation, IntakeRecord, Symptom, YesNo};
use crate::ScreeningResult;

/// Score at or above which a record is tiered MEDIUM.
pub const MEDIUM_THRESHOLD: u32 = 3;

/// Score at or above which a record is tiered HIGH.
pub const HIGH_THRESHOLD: u32 = 6;

/// Discrete risk tier.
///
/// Ordered LOW < MEDIUM < HIGH so that tier comparisons follow score
/// comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// The uppercase label used on documents and over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the classifier: the tier, the raw score behind it, and one
/// factor string per rule that contributed points, in rule order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub score: u32,
    pub factors: Vec<String>,
}

/// Map an accumulated score onto its tier.
pub fn tier_for_score(score: u32) -> RiskTier {
    if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Classify an intake record as of the given evaluation date.
///
/// Scoring rules:
/// - age 45-49: +1; age >= 50: +2; age >= 70: +1 further
/// - any family history: +2; +1 further when father is listed or more than
///   one relation is listed
/// - Black African or Black Caribbean ethnicity: +2
/// - previous PSA result > 3.0 ng/mL: +2; >= 4.0: +2 further; >= 10.0:
///   +2 further
/// - no previous PSA test: +1 (unknown status)
/// - any real symptom: +1, or +2 when blood or pain is among them
///
/// Tiers: score >= 6 is HIGH, >= 3 is MEDIUM, otherwise LOW.
///
/// # Errors
///
/// Returns [`crate::ScreeningError::InvalidInput`] when the date of birth
/// yields an age outside the accepted range. A missing or unparseable PSA
/// value never errors here: it is absent by this point and contributes
/// nothing.
pub fn classify(record: &IntakeRecord, on: NaiveDate) -> ScreeningResult<RiskAssessment> {
    let age = record.age_on(on)?;

    let mut score = 0u32;
    let mut factors = Vec::new();

    if age >= 50 {
        score += 2;
        if age >= 70 {
            score += 1;
        }
        factors.push(format!("Age {age} increases risk"));
    } else if age >= 45 {
        score += 1;
        factors.push(format!("Age {age} may increase risk"));
    }

    if !record.family_history.is_empty() {
        score += 2;
        if record.family_history.contains(&FamilyRelation::Father)
            || record.family_history.len() > 1
        {
            score += 1;
        }
        factors.push("Family history of prostate cancer".to_string());
    }

    if matches!(
        record.ethnicity,
        Some(Ethnicity::BlackAfrican | Ethnicity::BlackCaribbean)
    ) {
        score += 2;
        factors.push("Higher risk associated with Black ethnicity".to_string());
    }

    match record.previous_psa {
        YesNo::Yes => {
            if let Some(psa) = record.last_psa_result {
                if psa > 3.0 {
                    score += 2;
                    factors.push(format!("Elevated PSA level: {psa} ng/mL"));
                }
                if psa >= 4.0 {
                    score += 2;
                }
                if psa >= 10.0 {
                    score += 2;
                }
            }
        }
        YesNo::No => {
            score += 1;
            factors.push("Unknown PSA status".to_string());
        }
    }

    if record.has_active_symptoms() {
        let red_flag = record
            .active_symptoms()
            .any(|s| matches!(s, Symptom::Blood | Symptom::Pain));
        if red_flag {
            score += 2;
            factors.push("Symptoms reported including blood or pain".to_string());
        } else {
            score += 1;
            factors.push("Present urinary symptoms".to_string());
        }
    }

    Ok(RiskAssessment {
        tier: tier_for_score(score),
        score,
        factors,
    })
}

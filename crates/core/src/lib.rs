//! # Prost Health core
//!
//! Domain model and clinical decision logic for the screening service:
//! - The intake record collected by the multi-step screening form
//! - A stepwise builder that freezes form answers into an immutable record
//! - Calendar-correct age derivation
//! - The canonical risk classifier (additive scoring against NICE NG131-inspired rules)
//!
//! **No delivery concerns**: HTTP surfaces, document layout, and PDF bytes belong in
//! `api-rest`, `ph-report`, and `ph-render-pdf`.

pub mod error;
pub mod intake;
pub mod risk;

pub use error::{ScreeningError, ScreeningResult};
pub use intake::{
    age_in_years, Ethnicity, FamilyRelation, IntakeBuilder, IntakeRecord, SafetyFlags, Symptom,
    YesNo,
};
pub use risk::{classify, tier_for_score, RiskAssessment, RiskTier};

/// Minimum accepted age at assessment time, in whole years.
pub const MIN_AGE_YEARS: u32 = 18;

/// Maximum accepted age at assessment time, in whole years.
pub const MAX_AGE_YEARS: u32 = 120;

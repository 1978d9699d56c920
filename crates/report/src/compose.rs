//! Report composition.
//!
//! [`compose`] builds the complete [`ScreeningReport`] from a frozen intake
//! record and the classifier's assessment. The section order, row labels,
//! and empty-value wording below are reproduced exactly; downstream
//! consumers (and the golden tests here) depend on them.

use chrono::{DateTime, Utc};
use ph_core::{IntakeRecord, RiskAssessment, ScreeningResult, Symptom, YesNo};

use crate::document::{Block, FooterBlock, HeaderBlock, Row, ScreeningReport, Section};
use crate::format::{
    join_tags, long_date, psa_result, yes_no, NONE_REPORTED, NOT_AVAILABLE, NOT_PROVIDED,
};
use crate::reference::ReferenceId;

/// Brand identity placed on every document.
#[derive(Clone, Debug)]
pub struct Branding {
    pub name: String,
    pub tagline: String,
    pub legal_name: String,
    pub contact_email: String,
    pub website: String,
    /// Leading token of the suggested filename.
    pub filename_prefix: String,
}

impl Default for Branding {
    fn default() -> Self {
        Branding {
            name: "Prost Health".to_string(),
            tagline: "MRI-First Prostate Screening".to_string(),
            legal_name: "Prost Health Ltd".to_string(),
            contact_email: "hello@prost.health".to_string(),
            website: "www.prost.health".to_string(),
            filename_prefix: "Prost_Health_Screening".to_string(),
        }
    }
}

/// One-line guideline citation shown under the risk badge.
const GUIDELINE_CITATION: &str =
    "Based on NICE NG131 Guidelines for prostate cancer screening eligibility";

/// Warning shown whenever any MRI safety answer is Yes.
const SAFETY_WARNING_TITLE: &str = "MRI Safety Review Required";
const SAFETY_WARNING_TEXT: &str = "One or more safety concerns have been identified. This patient \
     will require additional screening and approval from the MRI safety officer before \
     proceeding with the examination.";

/// Compose the full report document.
///
/// The composer renders the classifier's output alongside the raw and
/// derived fields; it never re-decides risk. `generated_at` and
/// `reference_id` are injected, so identical inputs compose to an identical
/// document.
///
/// # Errors
///
/// Returns [`ph_core::ScreeningError::InvalidInput`] when the record's date
/// of birth yields an out-of-range age on the generation date. No other
/// missing data errors: absent optional fields take their section's
/// "Not provided" / "N/A" / "None reported" wording.
pub fn compose(
    record: &IntakeRecord,
    assessment: &RiskAssessment,
    generated_at: DateTime<Utc>,
    reference_id: &ReferenceId,
    branding: &Branding,
) -> ScreeningResult<ScreeningReport> {
    let generated_date = generated_at.date_naive();
    let age = record.age_on(generated_date)?;

    let header = HeaderBlock {
        brand_name: branding.name.clone(),
        tagline: branding.tagline.clone(),
        contact_email: branding.contact_email.clone(),
        website: branding.website.clone(),
        title: "Screening Request Form".to_string(),
        subtitle: "Patient Assessment Summary - NICE NG131 Guidelines".to_string(),
        generated_on: long_date(generated_date),
        reference_id: reference_id.as_str().to_string(),
    };

    let footer = FooterBlock {
        generated_at: format!(
            "{} {}",
            long_date(generated_date),
            generated_at.format("%H:%M UTC")
        ),
        reference_id: reference_id.as_str().to_string(),
        brand_line: branding.legal_name.clone(),
        confidentiality: "This document is confidential".to_string(),
    };

    let sections = vec![
        patient_information(record),
        clinical_risk_assessment(assessment),
        risk_factor_assessment(record, age),
        current_symptoms(record),
        medical_history(record),
        mri_safety_screening(record),
    ];

    Ok(ScreeningReport {
        header,
        sections,
        footer,
    })
}

/// Suggested filename: `<prefix>_<First>_<Last>_<YYYY-MM-DD>.pdf`.
pub fn suggested_filename(
    record: &IntakeRecord,
    generated_on: chrono::NaiveDate,
    branding: &Branding,
) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        branding.filename_prefix,
        record.first_name.as_str(),
        record.last_name.as_str(),
        generated_on.format("%Y-%m-%d")
    )
}

fn or_not_provided(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}

fn patient_information(record: &IntakeRecord) -> Section {
    Section::new(
        "Patient Information",
        vec![Block::Rows(vec![
            Row::new(
                "Full Name",
                format!("{} {}", record.first_name, record.last_name),
            ),
            Row::new("Date of Birth", long_date(record.date_of_birth)),
            Row::new(
                "Email Address",
                or_not_provided(record.email.as_ref().map(|e| e.as_str())),
            ),
            Row::new("Phone Number", or_not_provided(record.phone.as_deref())),
            Row::new("NHS Number", or_not_provided(record.nhs_number.as_deref())),
            Row::new(
                "GP Practice",
                or_not_provided(record.gp_practice.as_deref()),
            ),
        ])],
    )
}

fn clinical_risk_assessment(assessment: &RiskAssessment) -> Section {
    let mut blocks = vec![
        Block::Badge {
            tier: assessment.tier.as_str().to_string(),
        },
        Block::Note(GUIDELINE_CITATION.to_string()),
    ];
    if !assessment.factors.is_empty() {
        blocks.push(Block::List(assessment.factors.clone()));
    }
    Section::new("Clinical Risk Assessment", blocks)
}

fn risk_factor_assessment(record: &IntakeRecord, age: u32) -> Section {
    let ethnicity = record
        .ethnicity
        .map(|e| crate::format::title_case_tag(e.as_tag()))
        .unwrap_or_else(|| NOT_PROVIDED.to_string());

    let family_history = join_tags(record.family_history.iter().map(|r| r.as_tag()))
        .unwrap_or_else(|| "No family history reported".to_string());

    Section::new(
        "Risk Factor Assessment",
        vec![Block::Rows(vec![
            Row::new("Age at Assessment", format!("{age} years")),
            Row::new("Ethnicity", ethnicity),
            Row::new("Family History of Prostate Cancer", family_history),
        ])],
    )
}

fn current_symptoms(record: &IntakeRecord) -> Section {
    // The single symptom set splits into the two rows of the rendered table:
    // urinary symptoms, and everything else (blood, pain). The literal `none`
    // tag is filtered out by `join_tags` and never displayed.
    let urinary = join_tags(
        record
            .active_symptoms()
            .filter(|s| matches!(s, Symptom::Urinary))
            .map(|s| s.as_tag()),
    )
    .unwrap_or_else(|| NONE_REPORTED.to_string());

    let other = join_tags(
        record
            .active_symptoms()
            .filter(|s| !matches!(s, Symptom::Urinary))
            .map(|s| s.as_tag()),
    )
    .unwrap_or_else(|| NONE_REPORTED.to_string());

    Section::new(
        "Current Symptoms",
        vec![Block::Rows(vec![
            Row::new("Urinary Symptoms", urinary),
            Row::new("Other Symptoms", other),
        ])],
    )
}

fn medical_history(record: &IntakeRecord) -> Section {
    let mut rows = vec![Row::new("Previous PSA Test", yes_no(record.previous_psa))];

    if record.previous_psa == YesNo::Yes {
        let value = record
            .last_psa_result
            .map(psa_result)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        rows.push(Row::new("Last PSA Result", value));
    }

    rows.push(Row::new(
        "Previous Prostate Biopsy",
        yes_no(record.previous_biopsy),
    ));
    rows.push(Row::new(
        "Current Medications",
        match record.medications.as_deref() {
            Some(m) if !m.trim().is_empty() => m.to_string(),
            _ => NONE_REPORTED.to_string(),
        },
    ));

    Section::new("Relevant Medical History", vec![Block::Rows(rows)])
}

fn mri_safety_screening(record: &IntakeRecord) -> Section {
    let safety = &record.safety;
    let mut blocks = vec![Block::Rows(vec![
        Row::new("Cardiac Pacemaker or ICD", yes_no(safety.pacemaker)),
        Row::new("Aneurysm Clips", yes_no(safety.aneurysm_clips)),
        Row::new("Cochlear Implants", yes_no(safety.implants)),
        Row::new("Metal Fragments (Eye)", yes_no(safety.eye_metal_fragments)),
        Row::new("Kidney or Renal Issues", yes_no(safety.kidney_issues)),
        Row::new("Claustrophobia", yes_no(safety.claustrophobia)),
    ])];

    if safety.any_concern() {
        blocks.push(Block::Warning {
            title: SAFETY_WARNING_TITLE.to_string(),
            text: SAFETY_WARNING_TEXT.to_string(),
        });
    }

    Section::new("MRI Safety Screening", blocks)
}

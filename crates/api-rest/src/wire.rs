//! Wire models for the screening form payload.
//!
//! The browser form submits camelCase JSON with `"yes"`/`"no"` strings and
//! kebab-case tags. This module defines that wire shape verbatim and
//! translates it into the typed domain [`IntakeRecord`]. Translation is
//! strict about *enumerated* values (an unknown tag is a client error, never
//! a silent mis-score) and lenient about *optional* ones (a malformed PSA
//! value degrades to absent with a warning).

use chrono::NaiveDate;
use ph_core::{
    Ethnicity, FamilyRelation, IntakeBuilder, IntakeRecord, SafetyFlags, ScreeningError,
    ScreeningResult, Symptom, YesNo,
};
use ph_types::{Email, NonEmptyText};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The screening form payload as the browser submits it.
///
/// Unknown fields (consent checkbox, client-side metadata) are ignored
/// rather than rejected; the form evolves independently of this API.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningFormData {
    pub first_name: String,
    pub last_name: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub nhs_number: Option<String>,
    #[serde(default)]
    pub gp_practice: Option<String>,

    /// `"yes"` or `"no"`.
    #[serde(rename = "previousPSA")]
    pub previous_psa: String,
    #[serde(default, rename = "lastPSADate")]
    pub last_psa_date: Option<String>,
    /// Free text from the form; non-numeric input degrades to absent.
    #[serde(default, rename = "lastPSAResult")]
    pub last_psa_result: Option<String>,
    /// `"yes"` or `"no"`.
    pub previous_biopsy: String,
    /// `"yes"` or `"no"`.
    #[serde(rename = "previousMRI")]
    pub previous_mri: String,
    #[serde(default)]
    pub medications: Option<String>,

    /// Relation tags: `father`, `brother`, `grandfather`, `other`.
    #[serde(default)]
    pub family_history: Vec<String>,
    /// Symptom tags: `urinary`, `blood`, `pain`, `none`.
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Ethnicity tag, e.g. `black-african`.
    #[serde(default)]
    pub ethnicity: Option<String>,

    #[serde(default)]
    pub safety_pacemaker: Option<String>,
    #[serde(default)]
    pub safety_clips: Option<String>,
    #[serde(default)]
    pub safety_implants: Option<String>,
    #[serde(default)]
    pub safety_metal: Option<String>,
    #[serde(default)]
    pub safety_kidney: Option<String>,
    #[serde(default)]
    pub safety_claustrophobia: Option<String>,
}

fn invalid(message: impl Into<String>) -> ScreeningError {
    ScreeningError::InvalidInput(message.into())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_yes_no(field: &str, value: &str) -> ScreeningResult<YesNo> {
    YesNo::from_tag(value.trim())
        .ok_or_else(|| invalid(format!("{field} must be \"yes\" or \"no\", got {value:?}")))
}

/// An absent safety answer counts as `no`; only an explicit unknown value is
/// rejected.
fn parse_safety(field: &str, value: Option<&str>) -> ScreeningResult<YesNo> {
    match non_empty(value) {
        Some(v) => parse_yes_no(field, v),
        None => Ok(YesNo::No),
    }
}

fn parse_iso_date(field: &str, value: &str) -> ScreeningResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("{field} must be an ISO date (YYYY-MM-DD), got {value:?}")))
}

impl ScreeningFormData {
    /// Translate the wire payload into a frozen [`IntakeRecord`].
    ///
    /// `on` is the submission date used for the age gate.
    ///
    /// # Errors
    ///
    /// Returns [`ScreeningError::InvalidInput`] naming the offending field
    /// when a required value is missing, an enumerated tag is unknown, or
    /// the date of birth is unusable. Optional malformed values (PSA result,
    /// PSA date) degrade to absent instead.
    pub fn into_record(self, on: NaiveDate) -> ScreeningResult<IntakeRecord> {
        let mut builder = IntakeBuilder::new()
            .first_name(
                NonEmptyText::new(&self.first_name).map_err(|_| invalid("firstName is required"))?,
            )
            .last_name(
                NonEmptyText::new(&self.last_name).map_err(|_| invalid("lastName is required"))?,
            )
            .date_of_birth(parse_iso_date("dateOfBirth", &self.date_of_birth)?)
            .previous_psa(parse_yes_no("previousPSA", &self.previous_psa)?)
            .previous_biopsy(parse_yes_no("previousBiopsy", &self.previous_biopsy)?)
            .previous_mri(parse_yes_no("previousMRI", &self.previous_mri)?)
            .safety(SafetyFlags {
                pacemaker: parse_safety("safetyPacemaker", self.safety_pacemaker.as_deref())?,
                aneurysm_clips: parse_safety("safetyClips", self.safety_clips.as_deref())?,
                implants: parse_safety("safetyImplants", self.safety_implants.as_deref())?,
                eye_metal_fragments: parse_safety("safetyMetal", self.safety_metal.as_deref())?,
                kidney_issues: parse_safety("safetyKidney", self.safety_kidney.as_deref())?,
                claustrophobia: parse_safety(
                    "safetyClaustrophobia",
                    self.safety_claustrophobia.as_deref(),
                )?,
            });

        if let Some(email) = non_empty(self.email.as_deref()) {
            builder = builder
                .email(Email::new(email).map_err(|_| invalid("email is not a valid address"))?);
        }
        if let Some(phone) = non_empty(self.phone.as_deref()) {
            builder = builder.phone(phone);
        }
        if let Some(nhs_number) = non_empty(self.nhs_number.as_deref()) {
            builder = builder.nhs_number(nhs_number);
        }
        if let Some(gp_practice) = non_empty(self.gp_practice.as_deref()) {
            builder = builder.gp_practice(gp_practice);
        }
        if let Some(medications) = non_empty(self.medications.as_deref()) {
            builder = builder.medications(medications);
        }

        // Optional clinical details degrade to absent when malformed.
        if let Some(value) = non_empty(self.last_psa_date.as_deref()) {
            match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => builder = builder.last_psa_date(date),
                Err(_) => {
                    tracing::warn!("ignoring non-ISO lastPSADate: {value:?}");
                }
            }
        }
        if let Some(value) = non_empty(self.last_psa_result.as_deref()) {
            match value.parse::<f64>() {
                Ok(result) if result.is_finite() && result >= 0.0 => {
                    builder = builder.last_psa_result(result);
                }
                _ => {
                    tracing::warn!("ignoring non-numeric lastPSAResult: {value:?}");
                }
            }
        }

        for tag in &self.family_history {
            let relation = FamilyRelation::from_tag(tag.trim())
                .ok_or_else(|| invalid(format!("familyHistory contains an unknown tag: {tag:?}")))?;
            builder = builder.add_family_relation(relation);
        }
        for tag in &self.symptoms {
            let symptom = Symptom::from_tag(tag.trim())
                .ok_or_else(|| invalid(format!("symptoms contains an unknown tag: {tag:?}")))?;
            builder = builder.add_symptom(symptom);
        }
        if let Some(tag) = non_empty(self.ethnicity.as_deref()) {
            let ethnicity = Ethnicity::from_tag(tag)
                .ok_or_else(|| invalid(format!("ethnicity is an unknown tag: {tag:?}")))?;
            builder = builder.ethnicity(ethnicity);
        }

        builder.build(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "firstName": "David",
            "lastName": "Okafor",
            "dateOfBirth": "1975-03-03",
            "previousPSA": "no",
            "previousBiopsy": "no",
            "previousMRI": "no"
        })
    }

    fn form_from(value: serde_json::Value) -> ScreeningFormData {
        serde_json::from_value(value).expect("wire payload deserializes")
    }

    #[test]
    fn browser_payload_shape_round_trips() {
        let mut payload = minimal_json();
        payload["familyHistory"] = serde_json::json!(["father"]);
        payload["symptoms"] = serde_json::json!(["urinary", "blood"]);
        payload["ethnicity"] = serde_json::json!("black-african");
        payload["safetyPacemaker"] = serde_json::json!("yes");
        // Client-side extras are tolerated.
        payload["consent"] = serde_json::json!(true);
        payload["submissionDate"] = serde_json::json!("2025-06-01T10:00:00Z");

        let record = form_from(payload)
            .into_record(date(2025, 6, 1))
            .expect("translates");
        assert_eq!(record.family_history, vec![FamilyRelation::Father]);
        assert_eq!(record.symptoms, vec![Symptom::Urinary, Symptom::Blood]);
        assert_eq!(record.ethnicity, Some(Ethnicity::BlackAfrican));
        assert!(record.safety.pacemaker.is_yes());
    }

    #[test]
    fn unknown_tags_are_rejected_not_mis_scored() {
        let mut payload = minimal_json();
        payload["ethnicity"] = serde_json::json!("martian");
        let err = form_from(payload).into_record(date(2025, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::InvalidInput(ref msg) if msg.contains("ethnicity")
        ));

        let mut payload = minimal_json();
        payload["symptoms"] = serde_json::json!(["urinary", "itching"]);
        let err = form_from(payload).into_record(date(2025, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::InvalidInput(ref msg) if msg.contains("symptoms")
        ));
    }

    #[test]
    fn malformed_psa_details_degrade_to_absent() {
        let mut payload = minimal_json();
        payload["previousPSA"] = serde_json::json!("yes");
        payload["lastPSAResult"] = serde_json::json!("four-ish");
        payload["lastPSADate"] = serde_json::json!("yesterday");

        let record = form_from(payload)
            .into_record(date(2025, 6, 1))
            .expect("translates despite malformed optionals");
        assert_eq!(record.last_psa_result, None);
        assert_eq!(record.last_psa_date, None);
    }

    #[test]
    fn missing_date_of_birth_is_a_client_error() {
        let mut payload = minimal_json();
        payload["dateOfBirth"] = serde_json::json!("");
        let err = form_from(payload).into_record(date(2025, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::InvalidInput(ref msg) if msg.contains("dateOfBirth")
        ));
    }

    #[test]
    fn absent_safety_answers_default_to_no() {
        let record = form_from(minimal_json())
            .into_record(date(2025, 6, 1))
            .expect("translates");
        assert!(!record.safety.any_concern());
    }

    #[test]
    fn blank_optional_strings_become_absent() {
        let mut payload = minimal_json();
        payload["email"] = serde_json::json!("");
        payload["phone"] = serde_json::json!("   ");
        let record = form_from(payload)
            .into_record(date(2025, 6, 1))
            .expect("translates");
        assert_eq!(record.email, None);
        assert_eq!(record.phone, None);
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut payload = minimal_json();
        payload["email"] = serde_json::json!("not-an-address");
        let err = form_from(payload).into_record(date(2025, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::InvalidInput(ref msg) if msg.contains("email")
        ));
    }
}

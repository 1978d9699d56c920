//! Screening intake record and the stepwise builder that produces it.
//!
//! The public screening form collects answers over four steps (personal
//! details, medical history, risk factors, MRI safety). [`IntakeBuilder`] is
//! the explicit, owned carrier for that accumulation: each step writes into
//! the builder, and [`IntakeBuilder::build`] freezes the answers into an
//! immutable [`IntakeRecord`] after checking the invariants the classifier
//! relies on.
//!
//! Every loosely-tagged answer ("yes"/"no" radios, kebab-case checkbox tags)
//! is a closed enum here, so a new category cannot be silently mis-scored.

use chrono::{Datelike, NaiveDate};
use ph_types::{Email, NonEmptyText};
use serde::{Deserialize, Serialize};

use crate::{ScreeningError, ScreeningResult, MAX_AGE_YEARS, MIN_AGE_YEARS};

/// Answer to a yes/no question on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Returns true for `Yes`.
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }

    /// The form tag for this answer.
    pub fn as_tag(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }

    /// Parse a form tag.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(YesNo::Yes),
            "no" => Some(YesNo::No),
            _ => None,
        }
    }
}

/// Self-reported ethnicity category offered by the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ethnicity {
    White,
    BlackAfrican,
    BlackCaribbean,
    Asian,
    Other,
}

impl Ethnicity {
    /// The kebab-case form tag for this category.
    pub fn as_tag(self) -> &'static str {
        match self {
            Ethnicity::White => "white",
            Ethnicity::BlackAfrican => "black-african",
            Ethnicity::BlackCaribbean => "black-caribbean",
            Ethnicity::Asian => "asian",
            Ethnicity::Other => "other",
        }
    }

    /// Parse a kebab-case form tag.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "white" => Some(Ethnicity::White),
            "black-african" => Some(Ethnicity::BlackAfrican),
            "black-caribbean" => Some(Ethnicity::BlackCaribbean),
            "asian" => Some(Ethnicity::Asian),
            "other" => Some(Ethnicity::Other),
            _ => None,
        }
    }
}

/// Relation tag for the family-history checkbox group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyRelation {
    Father,
    Brother,
    Grandfather,
    Other,
}

impl FamilyRelation {
    /// The form tag for this relation.
    pub fn as_tag(self) -> &'static str {
        match self {
            FamilyRelation::Father => "father",
            FamilyRelation::Brother => "brother",
            FamilyRelation::Grandfather => "grandfather",
            FamilyRelation::Other => "other",
        }
    }

    /// Parse a form tag.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "father" => Some(FamilyRelation::Father),
            "brother" => Some(FamilyRelation::Brother),
            "grandfather" => Some(FamilyRelation::Grandfather),
            "other" => Some(FamilyRelation::Other),
            _ => None,
        }
    }
}

/// Symptom tag for the current-symptoms checkbox group.
///
/// `None` is the explicit "no symptoms" answer and is mutually exclusive with
/// every other tag; [`IntakeBuilder::add_symptom`] maintains that invariant in
/// both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symptom {
    Urinary,
    Blood,
    Pain,
    None,
}

impl Symptom {
    /// The form tag for this symptom.
    pub fn as_tag(self) -> &'static str {
        match self {
            Symptom::Urinary => "urinary",
            Symptom::Blood => "blood",
            Symptom::Pain => "pain",
            Symptom::None => "none",
        }
    }

    /// Parse a form tag.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "urinary" => Some(Symptom::Urinary),
            "blood" => Some(Symptom::Blood),
            "pain" => Some(Symptom::Pain),
            "none" => Some(Symptom::None),
            _ => None,
        }
    }
}

/// The six independent MRI safety questions.
///
/// Any `Yes` answer requires MRI-safety-officer review before the exam; see
/// [`SafetyFlags::any_concern`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyFlags {
    pub pacemaker: YesNo,
    pub aneurysm_clips: YesNo,
    pub implants: YesNo,
    pub eye_metal_fragments: YesNo,
    pub kidney_issues: YesNo,
    pub claustrophobia: YesNo,
}

impl SafetyFlags {
    /// Returns true when at least one safety question was answered `Yes`.
    pub fn any_concern(&self) -> bool {
        self.pacemaker.is_yes()
            || self.aneurysm_clips.is_yes()
            || self.implants.is_yes()
            || self.eye_metal_fragments.is_yes()
            || self.kidney_issues.is_yes()
            || self.claustrophobia.is_yes()
    }
}

impl Default for SafetyFlags {
    fn default() -> Self {
        SafetyFlags {
            pacemaker: YesNo::No,
            aneurysm_clips: YesNo::No,
            implants: YesNo::No,
            eye_metal_fragments: YesNo::No,
            kidney_issues: YesNo::No,
            claustrophobia: YesNo::No,
        }
    }
}

/// A frozen screening intake record.
///
/// Built once from the form answers, passed through the classifier and the
/// report composer, then discarded. Optional fields stay `None` rather than
/// raising; the display layer maps them to its "Not provided"/"N/A"
/// conventions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub nhs_number: Option<String>,
    pub gp_practice: Option<String>,

    pub previous_psa: YesNo,
    /// Meaningful only when `previous_psa` is `Yes`; dropped at build time otherwise.
    pub last_psa_date: Option<NaiveDate>,
    /// Meaningful only when `previous_psa` is `Yes`; dropped at build time otherwise.
    pub last_psa_result: Option<f64>,
    pub previous_biopsy: YesNo,
    pub previous_mri: YesNo,
    pub medications: Option<String>,

    pub family_history: Vec<FamilyRelation>,
    pub symptoms: Vec<Symptom>,
    pub ethnicity: Option<Ethnicity>,

    pub safety: SafetyFlags,
}

impl IntakeRecord {
    /// Symptoms excluding the explicit `none` tag.
    pub fn active_symptoms(&self) -> impl Iterator<Item = Symptom> + '_ {
        self.symptoms
            .iter()
            .copied()
            .filter(|s| *s != Symptom::None)
    }

    /// Returns true when the record reports at least one real symptom.
    pub fn has_active_symptoms(&self) -> bool {
        self.active_symptoms().next().is_some()
    }

    /// Age in whole years on the given date, gated to the accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ScreeningError::InvalidInput`] when the date of birth is in
    /// the future or the derived age falls outside
    /// [`MIN_AGE_YEARS`]..=[`MAX_AGE_YEARS`].
    pub fn age_on(&self, on: NaiveDate) -> ScreeningResult<u32> {
        let age = age_in_years(self.date_of_birth, on)?;
        if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
            return Err(ScreeningError::InvalidInput(format!(
                "age must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years, got {age}"
            )));
        }
        Ok(age)
    }
}

/// Age in whole years between two calendar dates.
///
/// Uses year/month/day subtraction (a year is only counted once the birthday
/// has passed), never day-count division, so the result is exact at birthday
/// boundaries and across leap years.
///
/// # Errors
///
/// Returns [`ScreeningError::InvalidInput`] when `date_of_birth` is after `on`.
pub fn age_in_years(date_of_birth: NaiveDate, on: NaiveDate) -> ScreeningResult<u32> {
    if date_of_birth > on {
        return Err(ScreeningError::InvalidInput(
            "date of birth is in the future".into(),
        ));
    }

    let mut age = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }

    u32::try_from(age)
        .map_err(|_| ScreeningError::InvalidInput("date of birth is in the future".into()))
}

/// Accumulates form answers step by step into an [`IntakeRecord`].
///
/// The builder is a plain owned value: step transitions pass it along instead
/// of mutating ambient state. Checkbox methods keep the symptom exclusivity
/// invariant as the user toggles answers, exactly as the form does.
#[derive(Clone, Debug, Default)]
pub struct IntakeBuilder {
    first_name: Option<NonEmptyText>,
    last_name: Option<NonEmptyText>,
    date_of_birth: Option<NaiveDate>,
    email: Option<Email>,
    phone: Option<String>,
    nhs_number: Option<String>,
    gp_practice: Option<String>,

    previous_psa: Option<YesNo>,
    last_psa_date: Option<NaiveDate>,
    last_psa_result: Option<f64>,
    previous_biopsy: Option<YesNo>,
    previous_mri: Option<YesNo>,
    medications: Option<String>,

    family_history: Vec<FamilyRelation>,
    symptoms: Vec<Symptom>,
    ethnicity: Option<Ethnicity>,

    safety: SafetyFlags,
}

impl IntakeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Step 1: personal details.

    pub fn first_name(mut self, name: NonEmptyText) -> Self {
        self.first_name = Some(name);
        self
    }

    pub fn last_name(mut self, name: NonEmptyText) -> Self {
        self.last_name = Some(name);
        self
    }

    pub fn date_of_birth(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn nhs_number(mut self, nhs_number: impl Into<String>) -> Self {
        self.nhs_number = Some(nhs_number.into());
        self
    }

    pub fn gp_practice(mut self, gp_practice: impl Into<String>) -> Self {
        self.gp_practice = Some(gp_practice.into());
        self
    }

    // Step 2: medical history.

    pub fn previous_psa(mut self, answer: YesNo) -> Self {
        self.previous_psa = Some(answer);
        self
    }

    pub fn last_psa_date(mut self, date: NaiveDate) -> Self {
        self.last_psa_date = Some(date);
        self
    }

    pub fn last_psa_result(mut self, result: f64) -> Self {
        self.last_psa_result = Some(result);
        self
    }

    pub fn previous_biopsy(mut self, answer: YesNo) -> Self {
        self.previous_biopsy = Some(answer);
        self
    }

    pub fn previous_mri(mut self, answer: YesNo) -> Self {
        self.previous_mri = Some(answer);
        self
    }

    pub fn medications(mut self, medications: impl Into<String>) -> Self {
        self.medications = Some(medications.into());
        self
    }

    // Step 3: risk factors.

    /// Tick a family-history relation. Duplicates are ignored.
    pub fn add_family_relation(mut self, relation: FamilyRelation) -> Self {
        if !self.family_history.contains(&relation) {
            self.family_history.push(relation);
        }
        self
    }

    /// Tick a symptom checkbox.
    ///
    /// Selecting `none` clears every real symptom; selecting a real symptom
    /// clears `none`. Duplicates are ignored.
    pub fn add_symptom(mut self, symptom: Symptom) -> Self {
        if symptom == Symptom::None {
            self.symptoms.clear();
            self.symptoms.push(Symptom::None);
        } else {
            self.symptoms.retain(|s| *s != Symptom::None);
            if !self.symptoms.contains(&symptom) {
                self.symptoms.push(symptom);
            }
        }
        self
    }

    pub fn ethnicity(mut self, ethnicity: Ethnicity) -> Self {
        self.ethnicity = Some(ethnicity);
        self
    }

    // Step 4: MRI safety.

    pub fn safety(mut self, safety: SafetyFlags) -> Self {
        self.safety = safety;
        self
    }

    /// Freeze the accumulated answers into an immutable record.
    ///
    /// `on` is the submission date, used only to gate the derived age into
    /// the accepted range; the record keeps the raw date of birth.
    ///
    /// # Errors
    ///
    /// Returns [`ScreeningError::InvalidInput`] when a required answer is
    /// missing or the date of birth yields an out-of-range age.
    pub fn build(self, on: NaiveDate) -> ScreeningResult<IntakeRecord> {
        let first_name = self
            .first_name
            .ok_or_else(|| ScreeningError::InvalidInput("first name is required".into()))?;
        let last_name = self
            .last_name
            .ok_or_else(|| ScreeningError::InvalidInput("last name is required".into()))?;
        let date_of_birth = self
            .date_of_birth
            .ok_or_else(|| ScreeningError::InvalidInput("date of birth is required".into()))?;
        let previous_psa = self
            .previous_psa
            .ok_or_else(|| ScreeningError::InvalidInput("previous PSA answer is required".into()))?;
        let previous_biopsy = self.previous_biopsy.ok_or_else(|| {
            ScreeningError::InvalidInput("previous biopsy answer is required".into())
        })?;
        let previous_mri = self
            .previous_mri
            .ok_or_else(|| ScreeningError::InvalidInput("previous MRI answer is required".into()))?;

        // PSA details carry no meaning without a previous test.
        let (last_psa_date, last_psa_result) = if previous_psa.is_yes() {
            (self.last_psa_date, self.last_psa_result)
        } else {
            if self.last_psa_date.is_some() || self.last_psa_result.is_some() {
                tracing::warn!("dropping PSA details supplied without a previous PSA test");
            }
            (None, None)
        };

        let record = IntakeRecord {
            first_name,
            last_name,
            date_of_birth,
            email: self.email,
            phone: self.phone,
            nhs_number: self.nhs_number,
            gp_practice: self.gp_practice,
            previous_psa,
            last_psa_date,
            last_psa_result,
            previous_biopsy,
            previous_mri,
            medications: self.medications,
            family_history: self.family_history,
            symptoms: self.symptoms,
            ethnicity: self.ethnicity,
            safety: self.safety,
        };

        record.age_on(on)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn minimal_builder() -> IntakeBuilder {
        IntakeBuilder::new()
            .first_name(NonEmptyText::new("John").expect("name"))
            .last_name(NonEmptyText::new("Baker").expect("name"))
            .date_of_birth(date(1960, 6, 15))
            .previous_psa(YesNo::No)
            .previous_biopsy(YesNo::No)
            .previous_mri(YesNo::No)
    }

    #[test]
    fn age_counts_a_year_only_after_the_birthday() {
        let dob = date(1975, 3, 3);
        assert_eq!(age_in_years(dob, date(2025, 3, 2)).unwrap(), 49);
        assert_eq!(age_in_years(dob, date(2025, 3, 3)).unwrap(), 50);
        assert_eq!(age_in_years(dob, date(2025, 3, 4)).unwrap(), 50);
    }

    #[test]
    fn age_handles_leap_day_births() {
        let dob = date(1960, 2, 29);
        // In a non-leap year the birthday has not passed on 28 February.
        assert_eq!(age_in_years(dob, date(2025, 2, 28)).unwrap(), 64);
        assert_eq!(age_in_years(dob, date(2025, 3, 1)).unwrap(), 65);
    }

    #[test]
    fn age_rejects_future_date_of_birth() {
        let err = age_in_years(date(2030, 1, 1), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, ScreeningError::InvalidInput(_)));
    }

    #[test]
    fn build_rejects_out_of_range_ages() {
        let too_young = minimal_builder()
            .date_of_birth(date(2015, 1, 1))
            .build(date(2025, 1, 1));
        assert!(matches!(
            too_young,
            Err(ScreeningError::InvalidInput(ref msg)) if msg.contains("age")
        ));

        let too_old = minimal_builder()
            .date_of_birth(date(1900, 1, 1))
            .build(date(2025, 1, 1));
        assert!(matches!(too_old, Err(ScreeningError::InvalidInput(_))));
    }

    #[test]
    fn build_requires_the_radio_answers() {
        let missing_psa = IntakeBuilder::new()
            .first_name(NonEmptyText::new("John").expect("name"))
            .last_name(NonEmptyText::new("Baker").expect("name"))
            .date_of_birth(date(1960, 6, 15))
            .previous_biopsy(YesNo::No)
            .previous_mri(YesNo::No)
            .build(date(2025, 1, 1));
        assert!(matches!(
            missing_psa,
            Err(ScreeningError::InvalidInput(ref msg)) if msg.contains("PSA")
        ));
    }

    #[test]
    fn selecting_none_clears_real_symptoms_and_vice_versa() {
        let builder = IntakeBuilder::new()
            .add_symptom(Symptom::Urinary)
            .add_symptom(Symptom::Blood)
            .add_symptom(Symptom::None);
        assert_eq!(builder.symptoms, vec![Symptom::None]);

        let builder = builder.add_symptom(Symptom::Pain);
        assert_eq!(builder.symptoms, vec![Symptom::Pain]);
    }

    #[test]
    fn duplicate_checkbox_ticks_are_ignored() {
        let builder = IntakeBuilder::new()
            .add_family_relation(FamilyRelation::Father)
            .add_family_relation(FamilyRelation::Father)
            .add_symptom(Symptom::Urinary)
            .add_symptom(Symptom::Urinary);
        assert_eq!(builder.family_history, vec![FamilyRelation::Father]);
        assert_eq!(builder.symptoms, vec![Symptom::Urinary]);
    }

    #[test]
    fn psa_details_are_dropped_without_a_previous_test() {
        let record = minimal_builder()
            .last_psa_date(date(2024, 11, 1))
            .last_psa_result(4.2)
            .build(date(2025, 1, 1))
            .expect("valid record");
        assert_eq!(record.last_psa_date, None);
        assert_eq!(record.last_psa_result, None);

        let record = minimal_builder()
            .previous_psa(YesNo::Yes)
            .last_psa_date(date(2024, 11, 1))
            .last_psa_result(4.2)
            .build(date(2025, 1, 1))
            .expect("valid record");
        assert_eq!(record.last_psa_date, Some(date(2024, 11, 1)));
        assert_eq!(record.last_psa_result, Some(4.2));
    }

    #[test]
    fn safety_flags_report_any_concern() {
        let mut safety = SafetyFlags::default();
        assert!(!safety.any_concern());
        safety.claustrophobia = YesNo::Yes;
        assert!(safety.any_concern());
    }

    #[test]
    fn enum_tags_round_trip() {
        for ethnicity in [
            Ethnicity::White,
            Ethnicity::BlackAfrican,
            Ethnicity::BlackCaribbean,
            Ethnicity::Asian,
            Ethnicity::Other,
        ] {
            assert_eq!(Ethnicity::from_tag(ethnicity.as_tag()), Some(ethnicity));
        }
        for symptom in [Symptom::Urinary, Symptom::Blood, Symptom::Pain, Symptom::None] {
            assert_eq!(Symptom::from_tag(symptom.as_tag()), Some(symptom));
        }
        assert_eq!(Ethnicity::from_tag("unknown"), None);
    }
}

//! Scenario catalog.
//!
//! Every scenario asserts the behavior the form is *supposed* to have.
//! Where the live application is known to deviate, the scenario records the
//! defect in [`Scenario::known_defect`] and the harness reports a failure of
//! that scenario as an expected one.

use crate::driver::ProbeDriver;
use crate::fixtures::FormFixtures;
use crate::profile_form::{FormElement, Gender, ProfileField, ProfileFormPage};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scenario groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suite {
    /// Required fields present or missing
    MandatoryFields,
    /// Format rules of individual fields
    FieldValidation,
    /// Optional fields accepted or rejected
    OptionalFields,
    /// Labels, options, markup and feedback
    UiDefects,
}

impl Suite {
    /// Every suite in run order
    pub const ALL: [Self; 4] = [
        Self::MandatoryFields,
        Self::FieldValidation,
        Self::OptionalFields,
        Self::UiDefects,
    ];

    /// Kebab-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MandatoryFields => "mandatory-fields",
            Self::FieldValidation => "field-validation",
            Self::OptionalFields => "optional-fields",
            Self::UiDefects => "ui-defects",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mandatory" | "mandatory-fields" => Ok(Self::MandatoryFields),
            "field" | "field-validation" => Ok(Self::FieldValidation),
            "optional" | "optional-fields" => Ok(Self::OptionalFields),
            "ui" | "ui-defects" => Ok(Self::UiDefects),
            other => Err(ProbeError::config(format!("unknown suite: {other}"))),
        }
    }
}

/// Identifier of one scenario; see [`catalog`] for what each one checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// Valid mandatory fields are accepted
    AllMandatoryFieldsValid,
    /// Empty first name is rejected
    FirstNameMissing,
    /// Empty last name is rejected
    LastNameMissing,
    /// Empty password is rejected
    PasswordEmpty,
    /// LinkedIn may be left empty
    LinkedinOptional,
    /// Repeated submits report the same error
    SubmitIdempotent,
    /// Digits in the first name are rejected
    FirstNameNonAlphabetical,
    /// Symbols in the last name are rejected
    LastNameNonAlphabetical,
    /// Malformed email is rejected
    EmailInvalid,
    /// Differing confirmation is rejected
    PasswordsMismatch,
    /// LinkedIn URL without a scheme is rejected
    LinkedinUrlInvalid,
    /// Past date of birth is accepted
    DateOfBirthValid,
    /// Future date of birth is rejected
    DateOfBirthFuture,
    /// Ten-digit phone number is accepted
    PhoneNumberValid,
    /// Overlong phone number is rejected
    PhoneNumberTooLong,
    /// Phone number with letters is rejected
    PhoneNumberWithLetters,
    /// Gender radio can be selected
    GenderSelection,
    /// Page source carries no credentials
    SensitiveDataHidden,
    /// Address label is spelled correctly
    AddressLabelSpelling,
    /// Date of birth label is spaced correctly
    DateOfBirthLabelSpacing,
    /// Non-binary gender option is offered
    GenderNonBinaryOption,
    /// Date input keeps what was typed
    DateOfBirthFormat,
    /// Every text field has a placeholder
    FieldPlaceholders,
    /// Valid submission shows a success message
    SuccessMessage,
}

impl ScenarioId {
    /// Catalog entry of this scenario
    #[must_use]
    pub fn scenario(self) -> &'static Scenario {
        // the catalog is declared in enum order
        &CATALOG[self as usize]
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scenario().name)
    }
}

/// Static description of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Identifier
    pub id: ScenarioId,
    /// Kebab-case name
    pub name: &'static str,
    /// Suite the scenario belongs to
    pub suite: Suite,
    /// What is checked
    pub description: &'static str,
    /// Documented deviation of the live application, if any
    pub known_defect: Option<&'static str>,
}

const fn scenario(
    id: ScenarioId,
    name: &'static str,
    suite: Suite,
    description: &'static str,
    known_defect: Option<&'static str>,
) -> Scenario {
    Scenario {
        id,
        name,
        suite,
        description,
        known_defect,
    }
}

static CATALOG: [Scenario; 24] = [
    scenario(
        ScenarioId::AllMandatoryFieldsValid,
        "all-mandatory-fields-valid",
        Suite::MandatoryFields,
        "valid mandatory fields plus LinkedIn create the profile without error",
        None,
    ),
    scenario(
        ScenarioId::FirstNameMissing,
        "first-name-missing",
        Suite::MandatoryFields,
        "an empty first name reports the first-name-required message",
        None,
    ),
    scenario(
        ScenarioId::LastNameMissing,
        "last-name-missing",
        Suite::MandatoryFields,
        "an empty last name reports the last-name-required message",
        Some("the first-name message is shown for a missing last name"),
    ),
    scenario(
        ScenarioId::PasswordEmpty,
        "password-empty",
        Suite::MandatoryFields,
        "an empty password reports the password-required message",
        Some("\"Passwords do not match\" is shown for an empty password"),
    ),
    scenario(
        ScenarioId::LinkedinOptional,
        "linkedin-optional",
        Suite::MandatoryFields,
        "the profile is created without a LinkedIn URL",
        Some("LinkedIn URL is required although the field is optional"),
    ),
    scenario(
        ScenarioId::SubmitIdempotent,
        "submit-idempotent",
        Suite::MandatoryFields,
        "submitting the same invalid form twice reports the same message",
        None,
    ),
    scenario(
        ScenarioId::FirstNameNonAlphabetical,
        "first-name-non-alphabetical",
        Suite::FieldValidation,
        "a first name with digits reports the alphabetical-only message",
        None,
    ),
    scenario(
        ScenarioId::LastNameNonAlphabetical,
        "last-name-non-alphabetical",
        Suite::FieldValidation,
        "a last name with symbols reports the alphabetical-only message",
        None,
    ),
    scenario(
        ScenarioId::EmailInvalid,
        "email-invalid",
        Suite::FieldValidation,
        "a malformed email reports the invalid-email message",
        None,
    ),
    scenario(
        ScenarioId::PasswordsMismatch,
        "passwords-mismatch",
        Suite::FieldValidation,
        "differing password and confirmation report the mismatch message",
        None,
    ),
    scenario(
        ScenarioId::LinkedinUrlInvalid,
        "linkedin-url-invalid",
        Suite::FieldValidation,
        "a LinkedIn URL without a scheme is rejected",
        None,
    ),
    scenario(
        ScenarioId::DateOfBirthValid,
        "date-of-birth-valid",
        Suite::OptionalFields,
        "a past date of birth is accepted",
        None,
    ),
    scenario(
        ScenarioId::DateOfBirthFuture,
        "date-of-birth-future",
        Suite::OptionalFields,
        "a future date of birth is rejected",
        Some("future dates of birth are accepted"),
    ),
    scenario(
        ScenarioId::PhoneNumberValid,
        "phone-number-valid",
        Suite::OptionalFields,
        "a ten-digit phone number is accepted",
        None,
    ),
    scenario(
        ScenarioId::PhoneNumberTooLong,
        "phone-number-too-long",
        Suite::OptionalFields,
        "an eleven-digit phone number is rejected",
        None,
    ),
    scenario(
        ScenarioId::PhoneNumberWithLetters,
        "phone-number-with-letters",
        Suite::OptionalFields,
        "a phone number containing letters is rejected",
        None,
    ),
    scenario(
        ScenarioId::GenderSelection,
        "gender-selection",
        Suite::OptionalFields,
        "selecting a gender is accepted",
        None,
    ),
    scenario(
        ScenarioId::SensitiveDataHidden,
        "sensitive-data-hidden",
        Suite::UiDefects,
        "no credential is present in the page source",
        Some("a credential is only hidden with CSS"),
    ),
    scenario(
        ScenarioId::AddressLabelSpelling,
        "address-label-spelling",
        Suite::UiDefects,
        "the address label is spelled correctly",
        Some("label reads \"Address (optioal)\""),
    ),
    scenario(
        ScenarioId::DateOfBirthLabelSpacing,
        "date-of-birth-label-spacing",
        Suite::UiDefects,
        "the date of birth label is spaced correctly",
        Some("label reads \"Date ofBirth (optional)\""),
    ),
    scenario(
        ScenarioId::GenderNonBinaryOption,
        "gender-non-binary-option",
        Suite::UiDefects,
        "a non-binary gender option is offered",
        Some("the non-binary option is missing"),
    ),
    scenario(
        ScenarioId::DateOfBirthFormat,
        "date-of-birth-format",
        Suite::UiDefects,
        "the date field keeps a date typed as YYYY-MM-DD",
        Some("the date field does not accept YYYY-MM-DD input"),
    ),
    scenario(
        ScenarioId::FieldPlaceholders,
        "field-placeholders",
        Suite::UiDefects,
        "input fields carry placeholder hints",
        Some("only the date field has a placeholder"),
    ),
    scenario(
        ScenarioId::SuccessMessage,
        "success-message",
        Suite::UiDefects,
        "a valid submission shows a success message",
        Some("the page resets without any confirmation"),
    ),
];

/// Every scenario in run order
#[must_use]
pub fn catalog() -> &'static [Scenario] {
    &CATALOG
}

/// Scenario by kebab-case name
#[must_use]
pub fn find(name: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.name == name)
}

/// Fail with `what` unless `expected == actual`
pub fn expect_eq<T>(what: &str, expected: &T, actual: &T) -> ProbeResult<()>
where
    T: PartialEq + fmt::Debug + ?Sized,
{
    if expected == actual {
        Ok(())
    } else {
        Err(ProbeError::assertion(format!(
            "{what}: expected {expected:?}, got {actual:?}"
        )))
    }
}

/// Fail with `what` unless `condition` holds
pub fn expect_that(condition: bool, what: &str) -> ProbeResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ProbeError::assertion(what))
    }
}

fn valid_linkedin(fx: &FormFixtures) -> &str {
    fx.valid.linkedin_url.as_deref().unwrap_or_default()
}

/// Fill everything a valid profile needs (LinkedIn included), with one
/// field replaced by `override_value`
async fn fill_valid_except<D: ProbeDriver>(
    page: &mut ProfileFormPage<'_, D>,
    fx: &FormFixtures,
    field: ProfileField,
    override_value: &str,
) -> ProbeResult<()> {
    let v = &fx.valid;
    let linkedin = valid_linkedin(fx);
    let values = [
        (ProfileField::FirstName, v.first_name.as_str()),
        (ProfileField::LastName, v.last_name.as_str()),
        (ProfileField::Email, v.email.as_str()),
        (ProfileField::Password, v.password.as_str()),
        (ProfileField::ConfirmPassword, v.password.as_str()),
        (ProfileField::LinkedinUrl, linkedin),
    ];
    for (f, value) in values {
        let value = if f == field { override_value } else { value };
        if !value.is_empty() {
            page.fill_field(f, value).await?;
        }
    }
    Ok(())
}

/// Fill the mandatory fields, then `field` with `value`, then LinkedIn
async fn fill_mandatory_with<D: ProbeDriver>(
    page: &mut ProfileFormPage<'_, D>,
    fx: &FormFixtures,
    field: Option<(ProfileField, &str)>,
) -> ProbeResult<()> {
    let v = &fx.valid;
    page.fill_mandatory_fields(&v.first_name, &v.last_name, &v.email, &v.password)
        .await?;
    if let Some((field, value)) = field {
        page.fill_field(field, value).await?;
    }
    page.fill_linkedin_url(valid_linkedin(fx)).await
}

async fn expect_error<D: ProbeDriver>(
    page: &ProfileFormPage<'_, D>,
    expected: &str,
) -> ProbeResult<()> {
    let actual = page.get_error_message().await?;
    expect_eq("error message", expected, actual.as_str())
}

async fn expect_error_shown<D: ProbeDriver>(
    page: &ProfileFormPage<'_, D>,
    what: &str,
) -> ProbeResult<()> {
    let shown = page.is_error_message_displayed().await?;
    expect_that(shown, &format!("{what}: no error message was displayed"))
}

async fn expect_no_error<D: ProbeDriver>(page: &ProfileFormPage<'_, D>) -> ProbeResult<()> {
    if page.is_error_message_displayed().await? {
        let selector = page.selectors().get(FormElement::ErrorMessage)?;
        let text = page.interactions().get_text(selector).await?;
        return Err(ProbeError::assertion(format!(
            "expected no error message, got {text:?}"
        )));
    }
    Ok(())
}

/// Execute one scenario against a page already showing the form
pub async fn run_scenario<D: ProbeDriver>(
    id: ScenarioId,
    page: &mut ProfileFormPage<'_, D>,
    fx: &FormFixtures,
) -> ProbeResult<()> {
    let v = &fx.valid;
    let bad = &fx.invalid;
    let msg = &fx.messages;
    let ui = &fx.ui;

    match id {
        ScenarioId::AllMandatoryFieldsValid => {
            fill_mandatory_with(page, fx, None).await?;
            page.submit_form().await?;
            expect_no_error(page).await
        }
        ScenarioId::FirstNameMissing => {
            fill_valid_except(page, fx, ProfileField::FirstName, "").await?;
            page.submit_form().await?;
            expect_error(page, &msg.first_name_required).await
        }
        ScenarioId::LastNameMissing => {
            fill_valid_except(page, fx, ProfileField::LastName, "").await?;
            page.submit_form().await?;
            expect_error(page, &msg.last_name_required).await
        }
        ScenarioId::PasswordEmpty => {
            page.fill_first_name(&v.first_name).await?;
            page.fill_last_name(&v.last_name).await?;
            page.fill_email(&v.email).await?;
            page.fill_linkedin_url(valid_linkedin(fx)).await?;
            page.submit_form().await?;
            expect_error(page, &msg.password_required).await
        }
        ScenarioId::LinkedinOptional => {
            page.fill_mandatory_fields(&v.first_name, &v.last_name, &v.email, &v.password)
                .await?;
            page.submit_form().await?;
            expect_no_error(page).await
        }
        ScenarioId::SubmitIdempotent => {
            fill_valid_except(page, fx, ProfileField::FirstName, "").await?;
            page.submit_form().await?;
            let first = page.get_error_message().await?;
            page.submit_form().await?;
            let second = page.get_error_message().await?;
            expect_eq("second submission", first.as_str(), second.as_str())?;
            expect_eq("error message", msg.first_name_required.as_str(), first.as_str())
        }
        ScenarioId::FirstNameNonAlphabetical => {
            fill_valid_except(page, fx, ProfileField::FirstName, &bad.first_name_with_numbers)
                .await?;
            page.submit_form().await?;
            expect_error(page, &msg.first_name_alphabetical).await
        }
        ScenarioId::LastNameNonAlphabetical => {
            fill_valid_except(page, fx, ProfileField::LastName, &bad.last_name_with_symbols)
                .await?;
            page.submit_form().await?;
            expect_error(page, &msg.last_name_alphabetical).await
        }
        ScenarioId::EmailInvalid => {
            fill_valid_except(page, fx, ProfileField::Email, &bad.email).await?;
            page.submit_form().await?;
            expect_error(page, &msg.email_invalid).await
        }
        ScenarioId::PasswordsMismatch => {
            fill_valid_except(page, fx, ProfileField::ConfirmPassword, &bad.different_password)
                .await?;
            page.submit_form().await?;
            expect_error(page, &msg.password_mismatch).await
        }
        ScenarioId::LinkedinUrlInvalid => {
            fill_valid_except(page, fx, ProfileField::LinkedinUrl, &bad.linkedin_url).await?;
            page.submit_form().await?;
            expect_error_shown(page, "invalid LinkedIn URL").await
        }
        ScenarioId::DateOfBirthValid => {
            let dob = v.date_of_birth.as_deref().unwrap_or_default();
            fill_mandatory_with(page, fx, Some((ProfileField::DateOfBirth, dob))).await?;
            page.submit_form().await?;
            expect_no_error(page).await
        }
        ScenarioId::DateOfBirthFuture => {
            let dob = bad.future_date_of_birth.as_str();
            fill_mandatory_with(page, fx, Some((ProfileField::DateOfBirth, dob))).await?;
            page.submit_form().await?;
            expect_error_shown(page, "future date of birth").await
        }
        ScenarioId::PhoneNumberValid => {
            let phone = v.phone_number.as_deref().unwrap_or_default();
            fill_mandatory_with(page, fx, Some((ProfileField::PhoneNumber, phone))).await?;
            page.submit_form().await?;
            expect_no_error(page).await
        }
        ScenarioId::PhoneNumberTooLong => {
            let phone = bad.phone_number_too_long.as_str();
            fill_mandatory_with(page, fx, Some((ProfileField::PhoneNumber, phone))).await?;
            page.submit_form().await?;
            expect_error_shown(page, "phone number too long").await
        }
        ScenarioId::PhoneNumberWithLetters => {
            let phone = bad.phone_number_with_letters.as_str();
            fill_mandatory_with(page, fx, Some((ProfileField::PhoneNumber, phone))).await?;
            page.submit_form().await?;
            expect_error_shown(page, "phone number with letters").await
        }
        ScenarioId::GenderSelection => {
            page.fill_mandatory_fields(&v.first_name, &v.last_name, &v.email, &v.password)
                .await?;
            page.select_gender(v.gender.unwrap_or(Gender::Male)).await?;
            page.fill_linkedin_url(valid_linkedin(fx)).await?;
            page.submit_form().await?;
            expect_no_error(page).await
        }
        ScenarioId::SensitiveDataHidden => {
            let html = page.page_content().await?;
            expect_that(
                !html.contains(ui.sensitive_text.as_str()),
                &format!("page source contains {:?}", ui.sensitive_text),
            )
        }
        ScenarioId::AddressLabelSpelling => {
            let label = page.field_label(ProfileField::Address).await?;
            expect_eq("address label", ui.address_label.as_str(), label.as_str())
        }
        ScenarioId::DateOfBirthLabelSpacing => {
            let label = page.field_label(ProfileField::DateOfBirth).await?;
            expect_eq(
                "date of birth label",
                ui.date_of_birth_label.as_str(),
                label.as_str(),
            )
        }
        ScenarioId::GenderNonBinaryOption => {
            let count = page.gender_option_count(&ui.non_binary_value).await?;
            expect_eq("non-binary options", &1, &count)
        }
        ScenarioId::DateOfBirthFormat => {
            page.fill_date_of_birth(&ui.date_input_sample).await?;
            let value = page.field_value(ProfileField::DateOfBirth).await?;
            expect_eq(
                "date of birth value",
                ui.date_input_sample.as_str(),
                value.as_str(),
            )
        }
        ScenarioId::FieldPlaceholders => {
            let placeholder = page.field_placeholder(ProfileField::FirstName).await?;
            expect_that(placeholder.is_some(), "first name has no placeholder")
        }
        ScenarioId::SuccessMessage => {
            fill_mandatory_with(page, fx, None).await?;
            page.submit_form().await?;
            let count = page.success_message_count().await?;
            expect_eq("success messages", &1, &count)
        }
    }
}

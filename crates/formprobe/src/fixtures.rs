//! Form fixtures: sample values and expected messages.
//!
//! Fixtures are an immutable value handed to scenarios by reference. The
//! built-in set describes the reference profile; a YAML file can replace it
//! wholesale or in part (missing keys fall back to the built-in values).

use crate::profile_form::{Gender, ProfileData};
use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a scenario needs besides the page itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFixtures {
    /// A fully valid profile
    pub valid: ProfileData,
    /// One invalid value per validation rule
    pub invalid: InvalidValues,
    /// Messages the form is expected to show
    pub messages: ErrorMessages,
    /// Expected presentation details
    pub ui: UiExpectations,
}

impl FormFixtures {
    /// Parse fixtures from YAML
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load fixtures from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

impl Default for FormFixtures {
    fn default() -> Self {
        Self {
            valid: reference_profile(),
            invalid: InvalidValues::default(),
            messages: ErrorMessages::default(),
            ui: UiExpectations::default(),
        }
    }
}

/// The built-in valid profile
#[must_use]
pub fn reference_profile() -> ProfileData {
    ProfileData::new("John", "Smith", "john.smith@example.com", "P@ssw0rd123")
        .with_gender(Gender::Male)
        .with_date_of_birth("1990-01-01")
        .with_phone_number("1234567890")
        .with_address("123 Main St, Apt 1")
        .with_linkedin_url("https://www.linkedin.com/in/johnsmith")
        .with_github_url("https://github.com/johnsmith")
}

/// Values that each violate one validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidValues {
    /// First name containing digits
    pub first_name_with_numbers: String,
    /// Last name containing symbols
    pub last_name_with_symbols: String,
    /// Email without a domain
    pub email: String,
    /// Confirmation that differs from the valid password
    pub different_password: String,
    /// Date of birth in the future
    pub future_date_of_birth: String,
    /// Phone number with too many digits
    pub phone_number_too_long: String,
    /// Phone number containing letters
    pub phone_number_with_letters: String,
    /// LinkedIn URL without a scheme
    pub linkedin_url: String,
    /// GitHub URL without a scheme
    pub github_url: String,
}

impl Default for InvalidValues {
    fn default() -> Self {
        Self {
            first_name_with_numbers: "123John".to_string(),
            last_name_with_symbols: "Smith@#".to_string(),
            email: "john.smith@".to_string(),
            different_password: "DifferentP@ss123".to_string(),
            future_date_of_birth: "2050-01-01".to_string(),
            phone_number_too_long: "12345678901".to_string(),
            phone_number_with_letters: "123abc4567".to_string(),
            linkedin_url: "linkedin.com/johnsmith".to_string(),
            github_url: "github.com/johnsmith".to_string(),
        }
    }
}

/// Expected validation messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMessages {
    /// First name left empty
    pub first_name_required: String,
    /// First name with non-letters
    pub first_name_alphabetical: String,
    /// Last name left empty
    pub last_name_required: String,
    /// Last name with non-letters
    pub last_name_alphabetical: String,
    /// Malformed email
    pub email_invalid: String,
    /// Password left empty
    pub password_required: String,
    /// Password and confirmation differ
    pub password_mismatch: String,
    /// LinkedIn URL left empty
    pub linkedin_required: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            first_name_required: "First name must be filled out".to_string(),
            first_name_alphabetical: "First name must contain alphabetical characters only"
                .to_string(),
            last_name_required: "Last name must be filled out".to_string(),
            last_name_alphabetical: "Last name must contain alphabetical characters only"
                .to_string(),
            email_invalid: "Email must be a valid email address".to_string(),
            password_required: "Password must be filled out".to_string(),
            password_mismatch: "Passwords do not match".to_string(),
            linkedin_required: "LinkedIn URL is required".to_string(),
        }
    }
}

/// Expected labels and markup details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiExpectations {
    /// Text that must not appear anywhere in the page source
    pub sensitive_text: String,
    /// Label of the address field
    pub address_label: String,
    /// Label of the date of birth field
    pub date_of_birth_label: String,
    /// Gender option that must be offered besides the modeled ones
    pub non_binary_value: String,
    /// Date typed into the date of birth field and expected back verbatim
    pub date_input_sample: String,
}

impl Default for UiExpectations {
    fn default() -> Self {
        Self {
            sensitive_text: "admin123 - You should not see this".to_string(),
            address_label: "Address (optional)".to_string(),
            date_of_birth_label: "Date of Birth (optional)".to_string(),
            non_binary_value: "non-binary".to_string(),
            date_input_sample: "1990-01-01".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_profile() {
        let fx = FormFixtures::default();
        assert_eq!(fx.valid.first_name, "John");
        assert_eq!(fx.valid.gender, Some(Gender::Male));
        assert_eq!(fx.invalid.future_date_of_birth, "2050-01-01");
        assert_eq!(fx.messages.password_mismatch, "Passwords do not match");
        assert_eq!(fx.ui.address_label, "Address (optional)");
        assert_ne!(
            fx.messages.first_name_required,
            fx.messages.last_name_required
        );
    }

    #[test]
    fn test_partial_yaml_falls_back_to_builtin() {
        let fx = FormFixtures::from_yaml_str(
            "messages:\n  email_invalid: Please enter a valid email\n",
        )
        .unwrap();
        assert_eq!(fx.messages.email_invalid, "Please enter a valid email");
        assert_eq!(fx.messages.password_mismatch, "Passwords do not match");
        assert_eq!(fx.valid, reference_profile());
    }

    #[test]
    fn test_yaml_round_trip() {
        let fx = FormFixtures::default();
        let yaml = fx.to_yaml().unwrap();
        assert!(yaml.contains("first_name_with_numbers"));
        assert!(yaml.contains("123John"));
        assert_eq!(FormFixtures::from_yaml_str(&yaml).unwrap(), fx);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "valid:\n  first_name: Jane\n  last_name: Doe\n  email: jane@example.com\n  password: pw").unwrap();
        let fx = FormFixtures::load(file.path()).unwrap();
        assert_eq!(fx.valid.first_name, "Jane");
        // optional fields absent from the file stay absent
        assert!(fx.valid.linkedin_url.is_none());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = FormFixtures::from_yaml_str("valid: [unterminated").unwrap_err();
        assert!(matches!(err, crate::ProbeError::Yaml(_)));
    }
}

//! Profile form page object.
//!
//! [`ProfileFormPage`] exposes one semantic operation per field of the user
//! profile creation form plus the two composite fills. It owns a
//! [`ProfileSelectors`] map and delegates every browser action to
//! [`Interactions`]; it keeps no state of its own between calls.

use crate::driver::ProbeDriver;
use crate::interaction::Interactions;
use crate::locator::Selector;
use crate::page_object::{PageObject, SelectorMap};
use crate::result::ProbeResult;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Text fields of the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileField {
    /// First name (required)
    FirstName,
    /// Last name (required)
    LastName,
    /// Email (required)
    Email,
    /// Password (required)
    Password,
    /// Password confirmation (required)
    ConfirmPassword,
    /// Date of birth
    DateOfBirth,
    /// Phone number
    PhoneNumber,
    /// Postal address
    Address,
    /// LinkedIn profile URL
    LinkedinUrl,
    /// GitHub profile URL
    GithubUrl,
}

impl ProfileField {
    /// Every field in form order
    pub const ALL: [Self; 10] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
        Self::DateOfBirth,
        Self::PhoneNumber,
        Self::Address,
        Self::LinkedinUrl,
        Self::GithubUrl,
    ];

    /// DOM id of the field's input
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::DateOfBirth => "dob",
            Self::PhoneNumber => "phone",
            Self::Address => "address",
            Self::LinkedinUrl => "linkedin",
            Self::GithubUrl => "github",
        }
    }

    /// Whether the form requires this field
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(
            self,
            Self::FirstName | Self::LastName | Self::Email | Self::Password | Self::ConfirmPassword
        )
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// Logical elements of the form, the keys of [`ProfileSelectors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormElement {
    /// Input of a text field
    Field(ProfileField),
    /// `<label>` of a text field
    Label(ProfileField),
    /// All gender radio inputs
    GenderGroup,
    /// Submit control
    SubmitButton,
    /// Validation error region
    ErrorMessage,
    /// Success indicator shown after a valid submission
    SuccessMessage,
}

/// Gender options the form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    /// `male`
    Male,
    /// `female`
    Female,
    /// `prefer-not-to-say`
    PreferNotToSay,
}

impl Gender {
    /// Value attribute of the matching radio input
    #[must_use]
    pub const fn dom_value(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_value())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "prefer-not-to-say" => Ok(Self::PreferNotToSay),
            other => Err(format!("unknown gender option: {other}")),
        }
    }
}

/// Values for one profile submission.
///
/// Optional fields that are `None` or empty are left untouched by
/// [`ProfileFormPage::fill_all_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Password, also used for the confirmation field
    pub password: String,
    /// Gender selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Date of birth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// LinkedIn URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    /// GitHub URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl ProfileData {
    /// Data with only the mandatory fields set
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set gender
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Set date of birth
    #[must_use]
    pub fn with_date_of_birth(mut self, value: impl Into<String>) -> Self {
        self.date_of_birth = Some(value.into());
        self
    }

    /// Set phone number
    #[must_use]
    pub fn with_phone_number(mut self, value: impl Into<String>) -> Self {
        self.phone_number = Some(value.into());
        self
    }

    /// Set address
    #[must_use]
    pub fn with_address(mut self, value: impl Into<String>) -> Self {
        self.address = Some(value.into());
        self
    }

    /// Set LinkedIn URL
    #[must_use]
    pub fn with_linkedin_url(mut self, value: impl Into<String>) -> Self {
        self.linkedin_url = Some(value.into());
        self
    }

    /// Set GitHub URL
    #[must_use]
    pub fn with_github_url(mut self, value: impl Into<String>) -> Self {
        self.github_url = Some(value.into());
        self
    }

    /// Optional text fields that carry a non-empty value, in fill order
    #[must_use]
    pub fn present_optional_fields(&self) -> Vec<(ProfileField, &str)> {
        [
            (ProfileField::DateOfBirth, &self.date_of_birth),
            (ProfileField::PhoneNumber, &self.phone_number),
            (ProfileField::Address, &self.address),
            (ProfileField::LinkedinUrl, &self.linkedin_url),
            (ProfileField::GithubUrl, &self.github_url),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
        .collect()
    }
}

/// Selector map of the profile form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelectors {
    map: SelectorMap<FormElement>,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        let mut builder = SelectorMap::builder()
            .with_css(FormElement::GenderGroup, r#"input[name="gender"]"#)
            .with_css(FormElement::SubmitButton, r#"button[type="submit"]"#)
            .with_css(FormElement::ErrorMessage, ".error-message")
            .with_css(FormElement::SuccessMessage, ".success-message");
        for field in ProfileField::ALL {
            let id = field.dom_id();
            builder = builder
                .with_css(FormElement::Field(field), &format!("#{id}"))
                .with_css(FormElement::Label(field), &format!(r#"label[for="{id}"]"#));
        }
        Self {
            map: builder.build(),
        }
    }
}

impl ProfileSelectors {
    /// Wrap a custom map
    #[must_use]
    pub const fn from_map(map: SelectorMap<FormElement>) -> Self {
        Self { map }
    }

    /// Selector for `element`
    pub fn get(&self, element: FormElement) -> ProbeResult<&Selector> {
        self.map.get(&element)
    }

    /// Selector of the gender radio whose value is `value`
    pub fn gender_option(&self, value: &str) -> ProbeResult<Selector> {
        Ok(self
            .get(FormElement::GenderGroup)?
            .with_attribute("value", value))
    }

    /// The underlying map
    #[must_use]
    pub const fn map(&self) -> &SelectorMap<FormElement> {
        &self.map
    }
}

/// Page object for the user profile creation form.
#[derive(Debug)]
pub struct ProfileFormPage<'s, D: ProbeDriver> {
    ui: Interactions<'s, D>,
    selectors: ProfileSelectors,
}

impl<D: ProbeDriver> PageObject for ProfileFormPage<'_, D> {
    fn url_path(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "ProfileFormPage"
    }
}

impl<'s, D: ProbeDriver> ProfileFormPage<'s, D> {
    /// Bind to a live session with the default selectors and waits
    pub fn new(driver: &'s mut D) -> Self {
        Self::with_options(driver, WaitOptions::default())
    }

    /// Bind to a live session with custom wait options
    pub fn with_options(driver: &'s mut D, options: WaitOptions) -> Self {
        Self {
            ui: Interactions::with_options(driver, options),
            selectors: ProfileSelectors::default(),
        }
    }

    /// Replace the selector map
    #[must_use]
    pub fn with_selectors(mut self, selectors: ProfileSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// The selector map in use
    #[must_use]
    pub const fn selectors(&self) -> &ProfileSelectors {
        &self.selectors
    }

    /// The primitives this page delegates to
    #[must_use]
    pub const fn interactions(&self) -> &Interactions<'s, D> {
        &self.ui
    }

    /// Load the form under `base_url`
    pub async fn navigate_to_form(&mut self, base_url: &str) -> ProbeResult<()> {
        let url = self.page_url(base_url);
        debug!(page = self.page_name(), %url, "navigate_to_form");
        self.ui.navigate(&url).await
    }

    /// Fill one text field
    pub async fn fill_field(&mut self, field: ProfileField, value: &str) -> ProbeResult<()> {
        let selector = self.selectors.get(FormElement::Field(field))?;
        self.ui.fill(selector, value).await
    }

    /// Fill first name
    pub async fn fill_first_name(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::FirstName, value).await
    }

    /// Fill last name
    pub async fn fill_last_name(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::LastName, value).await
    }

    /// Fill email
    pub async fn fill_email(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::Email, value).await
    }

    /// Fill password
    pub async fn fill_password(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::Password, value).await
    }

    /// Fill password confirmation
    pub async fn fill_confirm_password(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::ConfirmPassword, value).await
    }

    /// Fill date of birth
    pub async fn fill_date_of_birth(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::DateOfBirth, value).await
    }

    /// Fill phone number
    pub async fn fill_phone_number(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::PhoneNumber, value).await
    }

    /// Fill address
    pub async fn fill_address(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::Address, value).await
    }

    /// Fill LinkedIn URL
    pub async fn fill_linkedin_url(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::LinkedinUrl, value).await
    }

    /// Fill GitHub URL
    pub async fn fill_github_url(&mut self, value: &str) -> ProbeResult<()> {
        self.fill_field(ProfileField::GithubUrl, value).await
    }

    /// Check the radio for `gender`
    pub async fn select_gender(&mut self, gender: Gender) -> ProbeResult<()> {
        let selector = self.selectors.gender_option(gender.dom_value())?;
        self.ui.check(&selector).await
    }

    /// Click the submit control
    pub async fn submit_form(&mut self) -> ProbeResult<()> {
        let selector = self.selectors.get(FormElement::SubmitButton)?;
        self.ui.click(selector).await
    }

    /// Wait for the error region and return its text.
    ///
    /// Fails with [`ProbeError::Timeout`](crate::ProbeError::Timeout) when
    /// the form reports no error within the default timeout.
    pub async fn get_error_message(&self) -> ProbeResult<String> {
        let selector = self.selectors.get(FormElement::ErrorMessage)?;
        let _ = self.ui.wait_for_visible_default(selector).await?;
        self.ui.get_text(selector).await
    }

    /// Whether the error region is visible right now
    pub async fn is_error_message_displayed(&self) -> ProbeResult<bool> {
        let selector = self.selectors.get(FormElement::ErrorMessage)?;
        self.ui.is_visible(selector).await
    }

    /// Fill the required fields, confirming the password with the same value
    pub async fn fill_mandatory_fields(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ProbeResult<()> {
        self.fill_first_name(first_name).await?;
        self.fill_last_name(last_name).await?;
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        self.fill_confirm_password(password).await
    }

    /// Fill the required fields, then every optional field `data` carries
    pub async fn fill_all_fields(&mut self, data: &ProfileData) -> ProbeResult<()> {
        self.fill_mandatory_fields(&data.first_name, &data.last_name, &data.email, &data.password)
            .await?;
        if let Some(gender) = data.gender {
            self.select_gender(gender).await?;
        }
        for (field, value) in data.present_optional_fields() {
            self.fill_field(field, value).await?;
        }
        Ok(())
    }

    /// Current value of a text field
    pub async fn field_value(&self, field: ProfileField) -> ProbeResult<String> {
        let selector = self.selectors.get(FormElement::Field(field))?;
        self.ui.input_value(selector).await
    }

    /// Rendered label text of a field
    pub async fn field_label(&self, field: ProfileField) -> ProbeResult<String> {
        let selector = self.selectors.get(FormElement::Label(field))?;
        self.ui.get_text(selector).await
    }

    /// Placeholder attribute of a field
    pub async fn field_placeholder(&self, field: ProfileField) -> ProbeResult<Option<String>> {
        let selector = self.selectors.get(FormElement::Field(field))?;
        self.ui.attribute(selector, "placeholder").await
    }

    /// Number of gender radios with the given value attribute
    pub async fn gender_option_count(&self, value: &str) -> ProbeResult<usize> {
        let selector = self.selectors.gender_option(value)?;
        self.ui.count(&selector).await
    }

    /// Number of success indicators on the page
    pub async fn success_message_count(&self) -> ProbeResult<usize> {
        let selector = self.selectors.get(FormElement::SuccessMessage)?;
        self.ui.count(selector).await
    }

    /// Serialized HTML of the page
    pub async fn page_content(&self) -> ProbeResult<String> {
        self.ui.content().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDom, MockDriver, MockElement, MockPage};
    use crate::result::ProbeError;

    const URL: &str = "http://form.test/";

    fn form_dom() -> MockDom {
        let mut dom = MockDom::new();
        for field in ProfileField::ALL {
            let id = format!("#{}", field.dom_id());
            let label = format!("label[for=\"{}\"]", field.dom_id());
            dom.insert(MockElement::input("text"), &[id.as_str()]);
            dom.insert(MockElement::text("label", field.dom_id()), &[label.as_str()]);
        }
        for gender in [Gender::Male, Gender::Female, Gender::PreferNotToSay] {
            let option = format!("input[name=\"gender\"][value=\"{gender}\"]");
            dom.insert(
                MockElement::radio("gender", gender.dom_value()),
                &["input[name=\"gender\"]", option.as_str()],
            );
        }
        dom.with(MockElement::button("Submit"), &["button[type=\"submit\"]"])
            .with(MockElement::text("div", "").hidden(), &[".error-message"])
    }

    async fn session() -> MockDriver {
        let page = MockPage::new(form_dom()).on_click("button[type=\"submit\"]", |dom| {
            if dom.value("#firstName").is_empty() {
                dom.show(".error-message", "First name must be filled out");
            }
        });
        let mut driver = MockDriver::new().with_page(URL, page);
        driver.navigate(URL).await.unwrap();
        driver
    }

    mod model_tests {
        use super::*;

        #[test]
        fn test_default_selectors() {
            let sel = ProfileSelectors::default();
            assert_eq!(
                sel.get(FormElement::Field(ProfileField::DateOfBirth))
                    .unwrap()
                    .expression(),
                "#dob"
            );
            assert_eq!(
                sel.get(FormElement::Label(ProfileField::Address))
                    .unwrap()
                    .expression(),
                "label[for=\"address\"]"
            );
            assert_eq!(
                sel.gender_option("non-binary").unwrap().expression(),
                "input[name=\"gender\"][value=\"non-binary\"]"
            );
            // ten fields, ten labels, four singletons
            assert_eq!(sel.map().len(), 24);
        }

        #[test]
        fn test_custom_map_missing_entry() {
            let sel = ProfileSelectors::from_map(SelectorMap::builder().build());
            let err = sel.get(FormElement::SubmitButton).unwrap_err();
            assert!(matches!(err, ProbeError::MissingSelector { .. }));
        }

        #[test]
        fn test_gender_parse() {
            assert_eq!("prefer-not-to-say".parse::<Gender>(), Ok(Gender::PreferNotToSay));
            assert!("non-binary".parse::<Gender>().is_err());
        }

        #[test]
        fn test_present_optional_fields_skips_empty() {
            let data = ProfileData::new("John", "Smith", "john@example.com", "pw")
                .with_phone_number("")
                .with_github_url("https://github.com/johnsmith");
            assert_eq!(
                data.present_optional_fields(),
                vec![(ProfileField::GithubUrl, "https://github.com/johnsmith")]
            );
        }

        #[test]
        fn test_profile_data_yaml_shape() {
            let data: ProfileData = serde_yaml_ng::from_str(
                "first_name: John\nlast_name: Smith\nemail: a@b.co\npassword: pw\ngender: prefer-not-to-say\n",
            )
            .unwrap();
            assert_eq!(data.gender, Some(Gender::PreferNotToSay));
            assert!(data.address.is_none());
        }

        #[test]
        fn test_mandatory_fields() {
            let mandatory: Vec<_> = ProfileField::ALL
                .into_iter()
                .filter(|f| f.is_mandatory())
                .collect();
            assert_eq!(mandatory.len(), 5);
        }
    }

    mod page_tests {
        use super::*;

        #[tokio::test]
        async fn test_fill_mandatory_order() {
            let mut driver = session().await;
            driver.clear_history();
            let mut page = ProfileFormPage::new(&mut driver);
            page.fill_mandatory_fields("John", "Smith", "john@example.com", "pw")
                .await
                .unwrap();
            assert_eq!(
                driver.history(),
                [
                    "set_value:#firstName=John",
                    "set_value:#lastName=Smith",
                    "set_value:#email=john@example.com",
                    "set_value:#password=pw",
                    "set_value:#confirmPassword=pw",
                ]
            );
        }

        #[tokio::test]
        async fn test_fill_all_fields_skips_absent() {
            let mut driver = session().await;
            driver.clear_history();
            let data = ProfileData::new("John", "Smith", "john@example.com", "pw")
                .with_gender(Gender::Female)
                .with_linkedin_url("https://www.linkedin.com/in/johnsmith");
            let mut page = ProfileFormPage::new(&mut driver);
            page.fill_all_fields(&data).await.unwrap();
            assert_eq!(driver.calls_to("set_value:#phone"), 0);
            assert_eq!(driver.calls_to("set_value:#dob"), 0);
            assert_eq!(driver.calls_to("set_value:#linkedin"), 1);
            assert_eq!(driver.dom().checked_value("gender"), Some("female"));
            assert_eq!(driver.dom().value("#address"), "");
        }

        #[tokio::test]
        async fn test_fill_is_last_value_wins() {
            let mut driver = session().await;
            let mut page = ProfileFormPage::new(&mut driver);
            page.fill_email("one@example.com").await.unwrap();
            page.fill_email("two@example.com").await.unwrap();
            assert_eq!(
                page.field_value(ProfileField::Email).await.unwrap(),
                "two@example.com"
            );
        }

        #[tokio::test]
        async fn test_error_message_after_submit() {
            let mut driver = session().await;
            let mut page = ProfileFormPage::new(&mut driver);
            assert!(!page.is_error_message_displayed().await.unwrap());
            page.submit_form().await.unwrap();
            assert!(page.is_error_message_displayed().await.unwrap());
            assert_eq!(
                page.get_error_message().await.unwrap(),
                "First name must be filled out"
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_get_error_message_times_out_without_error() {
            let mut driver = session().await;
            let mut page = ProfileFormPage::new(&mut driver);
            page.fill_first_name("John").await.unwrap();
            page.submit_form().await.unwrap();
            let err = page.get_error_message().await.unwrap_err();
            assert!(matches!(err, ProbeError::Timeout { ms: 5000, .. }));
        }

        #[tokio::test]
        async fn test_reads() {
            let mut driver = session().await;
            let page = ProfileFormPage::new(&mut driver);
            assert_eq!(page.field_label(ProfileField::Address).await.unwrap(), "address");
            assert_eq!(page.field_placeholder(ProfileField::FirstName).await.unwrap(), None);
            assert_eq!(page.gender_option_count("male").await.unwrap(), 1);
            assert_eq!(page.gender_option_count("non-binary").await.unwrap(), 0);
            assert_eq!(page.success_message_count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_navigate_to_form_joins_path() {
            let mut driver = MockDriver::new().with_page(URL, MockPage::new(form_dom()));
            let mut page = ProfileFormPage::new(&mut driver);
            page.navigate_to_form("http://form.test").await.unwrap();
            assert_eq!(page.interactions().current_url().await.unwrap(), URL);
        }
    }
}

//! Simulated profile application.
//!
//! A [`MockPage`] reproducing the profile creation form as it currently
//! behaves, defects included: LinkedIn is required, a missing last name
//! reports the first-name message, an empty password reports a mismatch,
//! future birth dates are accepted, the date input rewrites what is typed,
//! two labels are misspelled, the non-binary option and all but one
//! placeholder are missing, a credential sits in the HTML, and a valid
//! submission just resets the form without a success message.
//!
//! Used by the test suites and by `formprobe run --simulate`.

use crate::mock::{MockDom, MockDriver, MockElement, MockPage};
use crate::page_object::join_url;

/// Text hidden in the markup that must never reach users
pub const LEAKED_SECRET: &str = "admin123 - You should not see this";

const FIELDS: [(&str, &str, &str); 10] = [
    ("firstName", "text", "First Name"),
    ("lastName", "text", "Last Name"),
    ("email", "email", "Email"),
    ("password", "password", "Password"),
    ("confirmPassword", "password", "Confirm Password"),
    ("dob", "text", "Date ofBirth (optional)"),
    ("phone", "tel", "Phone Number (optional)"),
    ("address", "text", "Address (optioal)"),
    ("linkedin", "url", "LinkedIn URL (optional)"),
    ("github", "url", "GitHub URL (optional)"),
];

const GENDERS: [&str; 3] = ["male", "female", "prefer-not-to-say"];

const SUBMIT: &str = r#"button[type="submit"]"#;
const ERROR: &str = ".error-message";

/// A driver serving the simulated form at `base_url`
#[must_use]
pub fn simulated_profile_app(base_url: &str) -> MockDriver {
    MockDriver::new().with_page(join_url(base_url, "/"), simulated_profile_page())
}

/// The simulated form page
#[must_use]
pub fn simulated_profile_page() -> MockPage {
    let mut dom = MockDom::new();
    for (id, input_type, label) in FIELDS {
        let mut input = if id == "address" {
            MockElement::textarea()
        } else {
            MockElement::input(input_type)
        };
        if id == "dob" {
            input = input.with_attribute("placeholder", "DD/MM/YYYY");
        }
        let css = format!("#{id}");
        dom.insert(input, &[css.as_str()]);
        let label_css = format!(r#"label[for="{id}"]"#);
        dom.insert(
            MockElement::text("label", label).with_attribute("for", id),
            &[label_css.as_str()],
        );
    }
    for value in GENDERS {
        let option = format!(r#"input[name="gender"][value="{value}"]"#);
        dom.insert(
            MockElement::radio("gender", value),
            &[r#"input[name="gender"]"#, option.as_str()],
        );
    }
    dom.insert(MockElement::button("Submit"), &[SUBMIT]);
    dom.insert(MockElement::text("div", "").hidden(), &[ERROR]);

    MockPage::new(dom)
        .with_html(render_html())
        .on_input("#dob", reformat_date)
        .on_click(SUBMIT, submit)
}

fn render_html() -> String {
    let mut html = String::from("<!DOCTYPE html><html><body><form id=\"profileForm\">");
    for (id, input_type, label) in FIELDS {
        html.push_str(&format!(
            "<label for=\"{id}\">{label}</label><input type=\"{input_type}\" id=\"{id}\">"
        ));
    }
    for value in GENDERS {
        html.push_str(&format!(
            "<input type=\"radio\" name=\"gender\" value=\"{value}\">"
        ));
    }
    html.push_str("<button type=\"submit\">Submit</button>");
    html.push_str("<div class=\"error-message\" style=\"display:none\"></div>");
    html.push_str(&format!(
        "<div class=\"hidden-credentials\" style=\"display:none\">{LEAKED_SECRET}</div>"
    ));
    html.push_str("</form></body></html>");
    html
}

/// The date input stores `YYYY-MM-DD` as `DD/MM/YYYY`
fn reformat_date(dom: &mut MockDom) {
    if let Some(el) = dom.get_mut("#dob") {
        let reformatted = el.value.as_deref().and_then(|value| {
            let parts: Vec<&str> = value.split('-').collect();
            match parts.as_slice() {
                [year, month, day] => Some(format!("{day}/{month}/{year}")),
                _ => None,
            }
        });
        if reformatted.is_some() {
            el.value = reformatted;
        }
    }
}

fn submit(dom: &mut MockDom) {
    match validate(dom) {
        Some(message) => dom.show(ERROR, message),
        None => {
            dom.hide(ERROR);
            dom.reset_controls();
        }
    }
}

fn validate(dom: &MockDom) -> Option<&'static str> {
    let first = dom.value("#firstName");
    let last = dom.value("#lastName");
    let password = dom.value("#password");
    let phone = dom.value("#phone");
    let linkedin = dom.value("#linkedin");
    let github = dom.value("#github");

    if first.is_empty() {
        return Some("First name must be filled out");
    }
    if !is_alphabetic(first) {
        return Some("First name must contain alphabetical characters only");
    }
    if last.is_empty() {
        return Some("First name must be filled out");
    }
    if !is_alphabetic(last) {
        return Some("Last name must contain alphabetical characters only");
    }
    if !is_email(dom.value("#email")) {
        return Some("Email must be a valid email address");
    }
    if password.is_empty() || password != dom.value("#confirmPassword") {
        return Some("Passwords do not match");
    }
    if !phone.is_empty() && !(phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())) {
        return Some("Phone number must contain exactly 10 digits");
    }
    if linkedin.is_empty() {
        return Some("LinkedIn URL is required");
    }
    if !is_url(linkedin) {
        return Some("LinkedIn URL must be a valid URL");
    }
    if !github.is_empty() && !is_url(github) {
        return Some("GitHub URL must be a valid URL");
    }
    None
}

fn is_alphabetic(value: &str) -> bool {
    value.chars().all(char::is_alphabetic)
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn is_url(value: &str) -> bool {
    value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .is_some_and(|rest| rest.contains('.'))
}

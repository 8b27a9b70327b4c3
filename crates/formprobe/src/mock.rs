//! In-memory DOM driver for testing without a browser.
//!
//! [`MockDriver`] serves scripted pages keyed by URL. Each page is a flat list
//! of [`MockElement`]s, each reachable through one or more selector
//! expressions, plus optional hooks that mutate the DOM after a click or a
//! value change (a submit button that shows an error banner, an input that
//! reformats what was typed).
//! Mutating calls are recorded in a call history for verification.

use crate::driver::{ElementState, ProbeDriver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Hook run after a click or value change on a registered selector
pub type DomHook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// A scripted element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Lower-case tag name
    pub tag_name: String,
    /// `type` attribute for inputs
    pub input_type: Option<String>,
    /// `name` attribute (radio groups)
    pub name: Option<String>,
    /// Current value for form controls
    pub value: Option<String>,
    /// Rendered text
    pub text: String,
    /// Whether the element is rendered
    pub visible: bool,
    /// Whether the element is enabled
    pub enabled: bool,
    /// Whether the element is read-only
    pub readonly: bool,
    /// Checked state
    pub checked: bool,
    /// Other attributes (placeholder, for, ...)
    pub attributes: BTreeMap<String, String>,
}

impl MockElement {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            visible: true,
            enabled: true,
            ..Self::default()
        }
    }

    /// An `<input>` of the given type with an empty value
    #[must_use]
    pub fn input(input_type: &str) -> Self {
        Self {
            input_type: Some(input_type.to_string()),
            value: Some(String::new()),
            ..Self::new("input")
        }
    }

    /// A `<textarea>` with an empty value
    #[must_use]
    pub fn textarea() -> Self {
        Self {
            value: Some(String::new()),
            ..Self::new("textarea")
        }
    }

    /// A radio input in group `name` with value `value`
    #[must_use]
    pub fn radio(name: &str, value: &str) -> Self {
        Self {
            input_type: Some("radio".to_string()),
            name: Some(name.to_string()),
            value: Some(value.to_string()),
            ..Self::new("input")
        }
    }

    /// A `<button>` with text
    #[must_use]
    pub fn button(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::new("button")
        }
    }

    /// A text-bearing element such as a `<div>` or `<label>`
    #[must_use]
    pub fn text(tag_name: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::new(tag_name)
        }
    }

    /// Mark hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Mark read-only
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        let _ = self
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    fn is_toggle(&self) -> bool {
        matches!(self.input_type.as_deref(), Some("radio" | "checkbox"))
    }

    fn is_editable(&self) -> bool {
        if self.readonly {
            return false;
        }
        match self.tag_name.as_str() {
            "textarea" | "select" => true,
            "input" => !matches!(
                self.input_type.as_deref(),
                Some("radio" | "checkbox" | "submit" | "button" | "reset")
            ),
            _ => self.attributes.contains_key("contenteditable"),
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "type" => self.input_type.clone(),
            "name" => self.name.clone(),
            "value" => self.value.clone(),
            _ => self.attributes.get(name).cloned(),
        }
    }

    fn state(&self) -> ElementState {
        ElementState {
            tag_name: self.tag_name.clone(),
            visible: self.visible,
            enabled: self.enabled,
            editable: self.enabled && self.is_editable(),
            checked: self.checked,
            text: if self.visible {
                self.text.clone()
            } else {
                String::new()
            },
            value: self.value.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct MockNode {
    selectors: Vec<String>,
    element: MockElement,
}

/// Flat scripted document
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    nodes: Vec<MockNode>,
}

impl MockDom {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element reachable through each of `selectors`
    pub fn insert(&mut self, element: MockElement, selectors: &[&str]) {
        self.nodes.push(MockNode {
            selectors: selectors.iter().map(|s| (*s).to_string()).collect(),
            element,
        });
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, element: MockElement, selectors: &[&str]) -> Self {
        self.insert(element, selectors);
        self
    }

    /// First element matching `selector`
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&MockElement> {
        self.nodes
            .iter()
            .find(|n| n.selectors.iter().any(|s| s == selector))
            .map(|n| &n.element)
    }

    /// Mutable first element matching `selector`
    pub fn get_mut(&mut self, selector: &str) -> Option<&mut MockElement> {
        self.nodes
            .iter_mut()
            .find(|n| n.selectors.iter().any(|s| s == selector))
            .map(|n| &mut n.element)
    }

    /// Number of elements matching `selector`
    #[must_use]
    pub fn count(&self, selector: &str) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.selectors.iter().any(|s| s == selector))
            .count()
    }

    /// Current value of the first match, `""` when it has none
    #[must_use]
    pub fn value(&self, selector: &str) -> &str {
        self.get(selector)
            .and_then(|e| e.value.as_deref())
            .unwrap_or_default()
    }

    /// Value of the checked radio in group `name`
    #[must_use]
    pub fn checked_value(&self, name: &str) -> Option<&str> {
        self.nodes
            .iter()
            .map(|n| &n.element)
            .find(|e| e.checked && e.name.as_deref() == Some(name))
            .and_then(|e| e.value.as_deref())
    }

    /// Make the first match visible with the given text
    pub fn show(&mut self, selector: &str, text: &str) {
        if let Some(el) = self.get_mut(selector) {
            el.visible = true;
            el.text = text.to_string();
        }
    }

    /// Hide the first match
    pub fn hide(&mut self, selector: &str) {
        if let Some(el) = self.get_mut(selector) {
            el.visible = false;
        }
    }

    /// Reset every form control to its empty state
    pub fn reset_controls(&mut self) {
        for node in &mut self.nodes {
            let el = &mut node.element;
            if el.is_toggle() {
                el.checked = false;
            } else if el.value.is_some() {
                el.value = Some(String::new());
            }
        }
    }

    fn click(&mut self, index: usize) {
        let (group, toggle_type) = {
            let el = &self.nodes[index].element;
            (el.name.clone(), el.input_type.clone())
        };
        if toggle_type.as_deref() == Some("radio") {
            for node in &mut self.nodes {
                let el = &mut node.element;
                if el.input_type.as_deref() == Some("radio") && el.name == group {
                    el.checked = false;
                }
            }
            self.nodes[index].element.checked = true;
        } else if toggle_type.as_deref() == Some("checkbox") {
            let el = &mut self.nodes[index].element;
            el.checked = !el.checked;
        }
    }

    fn position(&self, selector: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.selectors.iter().any(|s| s == selector))
    }
}

/// A scripted page: document, raw HTML and DOM hooks
#[derive(Clone, Default)]
pub struct MockPage {
    /// The document
    pub dom: MockDom,
    /// What `content()` returns
    pub html: String,
    click_hooks: HashMap<String, DomHook>,
    input_hooks: HashMap<String, DomHook>,
}

impl fmt::Debug for MockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPage")
            .field("dom", &self.dom)
            .field("html_len", &self.html.len())
            .field("click_hooks", &self.click_hooks.keys().collect::<Vec<_>>())
            .field("input_hooks", &self.input_hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MockPage {
    /// Create a page from a document
    #[must_use]
    pub fn new(dom: MockDom) -> Self {
        Self {
            dom,
            ..Self::default()
        }
    }

    /// Set the raw HTML returned by `content()`
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Run `hook` after every click on `selector`
    #[must_use]
    pub fn on_click(
        mut self,
        selector: &str,
        hook: impl Fn(&mut MockDom) + Send + Sync + 'static,
    ) -> Self {
        let _ = self.click_hooks.insert(selector.to_string(), Arc::new(hook));
        self
    }

    /// Run `hook` after every value change on `selector`
    #[must_use]
    pub fn on_input(
        mut self,
        selector: &str,
        hook: impl Fn(&mut MockDom) + Send + Sync + 'static,
    ) -> Self {
        let _ = self.input_hooks.insert(selector.to_string(), Arc::new(hook));
        self
    }
}

/// Mock driver for unit testing
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Pages served by URL
    pages: HashMap<String, MockPage>,
    /// The loaded page
    page: MockPage,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl MockDriver {
    /// Create new mock driver on an empty `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_url: "about:blank".to_string(),
            ..Self::default()
        }
    }

    /// Serve `page` at `url`
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, page: MockPage) -> Self {
        let _ = self.pages.insert(url.into(), page);
        self
    }

    /// The loaded document
    #[must_use]
    pub fn dom(&self) -> &MockDom {
        &self.page.dom
    }

    /// Mutable access to the loaded document
    pub fn dom_mut(&mut self) -> &mut MockDom {
        &mut self.page.dom
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Number of recorded calls starting with `prefix`
    #[must_use]
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.call_history
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Forget recorded calls
    pub fn clear_history(&mut self) {
        self.call_history.clear();
    }
}

#[async_trait]
impl ProbeDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.call_history.push(format!("navigate:{url}"));
        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| ProbeError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_REFUSED".to_string(),
            })?;
        self.page = page;
        self.current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.current_url.clone())
    }

    async fn element_state(&self, selector: &Selector) -> ProbeResult<Option<ElementState>> {
        Ok(self
            .page
            .dom
            .get(selector.expression())
            .map(MockElement::state))
    }

    async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
        Ok(self.page.dom.count(selector.expression()))
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> ProbeResult<Option<String>> {
        self.page
            .dom
            .get(selector.expression())
            .map(|e| e.attribute(name))
            .ok_or_else(|| ProbeError::not_found(selector.to_string()))
    }

    async fn set_value(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        self.call_history
            .push(format!("set_value:{}={value}", selector.expression()));
        let el = self
            .page
            .dom
            .get_mut(selector.expression())
            .ok_or_else(|| ProbeError::not_found(selector.to_string()))?;
        el.value = Some(value.to_string());
        if let Some(hook) = self.page.input_hooks.get(selector.expression()).cloned() {
            hook(&mut self.page.dom);
        }
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        self.call_history
            .push(format!("click:{}", selector.expression()));
        let index = self
            .page
            .dom
            .position(selector.expression())
            .ok_or_else(|| ProbeError::not_found(selector.to_string()))?;
        self.page.dom.click(index);
        if let Some(hook) = self.page.click_hooks.get(selector.expression()).cloned() {
            hook(&mut self.page.dom);
        }
        Ok(())
    }

    async fn content(&self) -> ProbeResult<String> {
        Ok(self.page.html.clone())
    }
}

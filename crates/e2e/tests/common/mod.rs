//! Scripted in-memory browser used by the integration tests
//!
//! `FakeSession` keeps a map of locator -> element state. Clicking an element
//! runs its effects against the page, which is enough to model the login and
//! PIM flows without a real browser.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use orangehrm_e2e::browser::{Element, Key, Locator, Session, WaitCondition};
use orangehrm_e2e::pages::{login, pim};
use orangehrm_e2e::runner::SessionFactory;
use orangehrm_e2e::{E2eError, E2eResult};

pub type ElementHandle = Arc<Mutex<ElementState>>;
pub type PageHandle = Arc<Mutex<PageState>>;

/// Side effect of clicking an element
#[derive(Clone)]
pub enum Effect {
    SetTitle(String),
    Show(Locator),
    Custom(Arc<dyn Fn(&mut PageState) + Send + Sync>),
}

#[derive(Default)]
pub struct ElementState {
    pub text: String,
    pub value: Option<String>,
    pub visible: bool,
    pub enabled: bool,
    pub selected: bool,
    pub fail_click: bool,

    /// Custom dropdown entries; ArrowDown advances and wraps
    pub options: Vec<String>,
    pub option_index: usize,

    pub on_click: Vec<Effect>,
    pub children: HashMap<Locator, ElementHandle>,

    pub clicks: usize,
    pub clears: usize,
    pub typed: Vec<String>,
    pub keys: Vec<Key>,
}

impl ElementState {
    pub fn visible() -> Self {
        Self {
            visible: true,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self.option_index = 0;
        self.text = self.options.first().cloned().unwrap_or_default();
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.fail_click = true;
        self
    }

    pub fn on_click(mut self, effect: Effect) -> Self {
        self.on_click.push(effect);
        self
    }

    pub fn with_child(mut self, locator: &Locator, child: ElementState) -> Self {
        self.children
            .insert(locator.clone(), Arc::new(Mutex::new(child)));
        self
    }

    /// Number of calls that changed the field content
    pub fn mutations(&self) -> usize {
        self.clears + self.typed.len()
    }
}

#[derive(Default)]
pub struct PageState {
    pub title: String,
    pub visited: Vec<String>,
    pub elements: HashMap<Locator, ElementHandle>,
    pub screenshots: Vec<PathBuf>,
    pub quit: bool,
}

impl PageState {
    pub fn element(&self, locator: &Locator) -> Option<ElementHandle> {
        self.elements.get(locator).cloned()
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::SetTitle(title) => self.title = title.clone(),
            Effect::Show(locator) => {
                if let Some(element) = self.element(locator) {
                    element.lock().visible = true;
                }
            }
            Effect::Custom(f) => f(self),
        }
    }
}

pub struct FakeSession {
    page: PageHandle,
    poll: Duration,
}

impl FakeSession {
    pub fn new(title: &str) -> Self {
        Self {
            page: Arc::new(Mutex::new(PageState {
                title: title.to_string(),
                ..Default::default()
            })),
            poll: Duration::from_millis(5),
        }
    }

    pub fn page(&self) -> PageHandle {
        self.page.clone()
    }

    pub fn add(&self, locator: &Locator, element: ElementState) -> ElementHandle {
        let handle = Arc::new(Mutex::new(element));
        self.page
            .lock()
            .elements
            .insert(locator.clone(), handle.clone());
        handle
    }

    pub fn element(&self, locator: &Locator) -> ElementHandle {
        self.page
            .lock()
            .element(locator)
            .unwrap_or_else(|| panic!("no element registered for {locator}"))
    }

    fn check_open(&self) -> E2eResult<()> {
        if self.page.lock().quit {
            return Err(E2eError::AssertionFailed("session already quit".to_string()));
        }
        Ok(())
    }

    fn satisfied(&self, locator: &Locator, condition: WaitCondition) -> Option<ElementHandle> {
        let element = self.page.lock().element(locator)?;
        let ok = {
            let state = element.lock();
            match condition {
                WaitCondition::Present => true,
                WaitCondition::Visible => state.visible,
                WaitCondition::Clickable => state.visible && state.enabled,
            }
        };
        ok.then_some(element)
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.check_open()?;
        self.page.lock().visited.push(url.to_string());
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        self.check_open()?;
        Ok(self.page.lock().title.clone())
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> E2eResult<Box<dyn Element>> {
        self.check_open()?;
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(state) = self.satisfied(locator, condition) {
                return Ok(Box::new(FakeElement {
                    page: self.page.clone(),
                    state,
                }));
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    what: format!("{} to be {}", locator, condition.as_str()),
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    async fn save_screenshot(&self, path: &Path) -> E2eResult<()> {
        self.check_open()?;
        std::fs::write(path, b"\x89PNG\r\n\x1a\nfake")?;
        self.page.lock().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        self.check_open()?;
        self.page.lock().quit = true;
        Ok(())
    }
}

pub struct FakeElement {
    page: PageHandle,
    state: ElementHandle,
}

#[async_trait]
impl Element for FakeElement {
    async fn text(&self) -> E2eResult<String> {
        Ok(self.state.lock().text.clone())
    }

    async fn value(&self) -> E2eResult<Option<String>> {
        Ok(self.state.lock().value.clone())
    }

    async fn clear(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.value = Some(String::new());
        state.clears += 1;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        let mut value = state.value.take().unwrap_or_default();
        value.push_str(text);
        state.value = Some(value);
        state.typed.push(text.to_string());
        Ok(())
    }

    async fn press(&self, key: Key) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.keys.push(key);
        if key == Key::ArrowDown && !state.options.is_empty() {
            state.option_index = (state.option_index + 1) % state.options.len();
            state.text = state.options[state.option_index].clone();
        }
        Ok(())
    }

    async fn click(&self) -> E2eResult<()> {
        let effects = {
            let mut state = self.state.lock();
            if state.fail_click {
                return Err(E2eError::AssertionFailed(
                    "element click intercepted".to_string(),
                ));
            }
            state.clicks += 1;
            state.on_click.clone()
        };

        let mut page = self.page.lock();
        for effect in &effects {
            page.apply(effect);
        }
        Ok(())
    }

    async fn is_selected(&self) -> E2eResult<bool> {
        Ok(self.state.lock().selected)
    }

    async fn find(&self, locator: &Locator) -> E2eResult<Box<dyn Element>> {
        let child = self.state.lock().children.get(locator).cloned();
        match child {
            Some(state) => Ok(Box::new(FakeElement {
                page: self.page.clone(),
                state,
            })),
            None => Err(E2eError::AssertionFailed(format!("no child {}", locator))),
        }
    }
}

pub const VALID_USER: &str = "Admin";
pub const VALID_PASSWORD: &str = "admin123";

/// Messages the fake application puts in its success toast
#[derive(Clone)]
pub struct DemoApp {
    pub error_text: String,
    pub saved_toast: String,
    pub updated_toast: String,
    pub deleted_toast: String,
    pub employee_row_clickable: bool,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self {
            error_text: "Invalid credentials".to_string(),
            saved_toast: "Successfully Saved".to_string(),
            updated_toast: "Successfully Updated".to_string(),
            deleted_toast: "Successfully Deleted".to_string(),
            employee_row_clickable: true,
        }
    }
}

fn show_toast(message: String) -> Effect {
    Effect::Custom(Arc::new(move |page: &mut PageState| {
        if let Some(toast) = page.element(&pim::SUCCESS_TOAST) {
            let mut toast = toast.lock();
            toast.visible = true;
            if let Some(text) = toast.children.get(&*pim::TOAST_MESSAGE) {
                text.lock().text = message.clone();
            }
        }
    }))
}

impl DemoApp {
    /// A fresh page with the login form, the PIM list and both employee forms
    pub fn session(&self) -> FakeSession {
        let session = FakeSession::new("");

        let username = session.add(&login::USERNAME_FIELD, ElementState::visible());
        let password = session.add(&login::PASSWORD_FIELD, ElementState::visible());
        session.add(
            &login::ERROR_ALERT,
            ElementState::hidden().with_text(&self.error_text),
        );
        session.add(
            &pim::SUCCESS_TOAST,
            ElementState::hidden().with_child(&pim::TOAST_MESSAGE, ElementState::visible()),
        );

        // Login and the Add Employee form share the submit selector.
        let saved = show_toast(self.saved_toast.clone());
        let submit = Effect::Custom(Arc::new(move |page: &mut PageState| {
            if page.title.contains("OrangeHRM") {
                page.apply(&saved);
                return;
            }
            let user = username.lock().value.clone().unwrap_or_default();
            let pass = password.lock().value.clone().unwrap_or_default();
            if user == VALID_USER && pass == VALID_PASSWORD {
                page.title = "OrangeHRM".to_string();
            } else {
                page.apply(&Effect::Show((*login::ERROR_ALERT).clone()));
            }
        }));
        session.add(&login::SUBMIT_BUTTON, ElementState::visible().on_click(submit));

        session.add(&pim::PIM_MENU, ElementState::visible());
        session.add(&pim::ADD_EMPLOYEE_LINK, ElementState::visible());
        for locator in [
            &*pim::FIRST_NAME,
            &*pim::MIDDLE_NAME,
            &*pim::LAST_NAME,
            &*pim::EMPLOYEE_ID,
            &*pim::LICENSE_NUMBER,
            &*pim::LICENSE_EXPIRY_DATE,
            &*pim::DATE_OF_BIRTH,
        ] {
            session.add(locator, ElementState::visible().with_value(""));
        }
        session.add(&pim::FILE_INPUT, ElementState::hidden());
        session.add(
            &pim::NATIONALITY_DROPDOWN,
            ElementState::visible().with_options(&["-- Select --", "Afghan", "Albanian", "Indian"]),
        );
        session.add(
            &pim::MARITAL_STATUS_DROPDOWN,
            ElementState::visible().with_options(&["-- Select --", "Single", "Married", "Other"]),
        );
        session.add(&pim::GENDER_MALE, ElementState::visible());
        session.add(&pim::GENDER_FEMALE, ElementState::visible());
        session.add(
            &pim::PERSONAL_DETAILS_SAVE,
            ElementState::visible().on_click(show_toast(self.updated_toast.clone())),
        );

        let row = ElementState::visible();
        let row = if self.employee_row_clickable {
            row
        } else {
            row.failing_click()
        };
        session.add(&pim::FIRST_EMPLOYEE_ROW, row);
        session.add(&pim::FIRST_ROW_CHECKBOX, ElementState::visible());
        session.add(&pim::DELETE_SELECTED, ElementState::visible());
        session.add(
            &pim::CONFIRM_DELETE,
            ElementState::visible().on_click(show_toast(self.deleted_toast.clone())),
        );

        session
    }
}

/// Hands out fresh demo sessions and remembers them for inspection
pub struct DemoFactory {
    pub app: DemoApp,
    pub pages: Mutex<Vec<PageHandle>>,
    pub fail_open: bool,
    opened: AtomicUsize,
}

impl DemoFactory {
    pub fn new(app: DemoApp) -> Self {
        Self {
            app,
            pages: Mutex::new(Vec::new()),
            fail_open: false,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn all_quit(&self) -> bool {
        self.pages.lock().iter().all(|p| p.lock().quit)
    }
}

#[async_trait]
impl SessionFactory for DemoFactory {
    async fn open(&self) -> E2eResult<Box<dyn Session>> {
        if self.fail_open {
            return Err(E2eError::DriverStartup("no driver in tests".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let session = self.app.session();
        self.pages.lock().push(session.page());
        Ok(Box::new(session))
    }
}

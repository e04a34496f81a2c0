//! Suite configuration
//!
//! Values the scenarios need from the environment (URLs, wait
//! timeouts, file paths, form values) are resolved here at setup time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// Browser to request from the WebDriver endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }

    /// Default driver executable for this browser
    pub fn driver_binary(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chromedriver",
            BrowserKind::Firefox => "geckodriver",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(E2eError::Config(format!("unsupported browser: {}", other))),
        }
    }
}

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Application entry URL
    pub base_url: String,

    /// Remote WebDriver endpoint. When unset a local driver is spawned.
    pub webdriver_url: Option<String>,

    /// Driver executable used when spawning locally
    pub driver_binary: Option<PathBuf>,

    pub browser: BrowserKind,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,

    /// Bounded wait used by the login page
    pub login_timeout_secs: u64,

    /// Bounded wait used by the PIM page
    pub pim_timeout_secs: u64,

    /// Poll interval for bounded waits
    pub poll_interval_ms: u64,

    /// Maximum ArrowDown presses when searching a custom dropdown
    pub dropdown_max_steps: usize,

    /// CSV file with `username,password,expected` rows
    pub credentials_path: PathBuf,

    pub screenshot_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Image uploaded as the employee profile photo
    pub profile_image_path: PathBuf,

    pub employee: EmployeeDefaults,

    /// Substring of the document title that marks an authenticated session
    pub logged_in_title_marker: String,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub webdriver_url: Option<String>,
    pub driver_binary: Option<PathBuf>,
    pub browser: Option<String>,
    pub headless: Option<bool>,
    pub credentials_path: Option<PathBuf>,
    pub screenshot_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Fixed values used by the edit-employee flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeDefaults {
    pub license_expiry_date: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub marital_status: String,
    pub gender: String,
}

impl Default for EmployeeDefaults {
    fn default() -> Self {
        Self {
            license_expiry_date: "2024-10-30".to_string(),
            date_of_birth: "2002-01-01".to_string(),
            nationality: "Indian".to_string(),
            marital_status: "Single".to_string(),
            gender: "female".to_string(),
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opensource-demo.orangehrmlive.com/".to_string(),
            webdriver_url: None,
            driver_binary: None,
            browser: BrowserKind::Chrome,
            headless: true,
            window_width: 1366,
            window_height: 900,
            login_timeout_secs: 10,
            pim_timeout_secs: 20,
            poll_interval_ms: 250,
            dropdown_max_steps: 250,
            credentials_path: PathBuf::from("data/login_data.csv"),
            screenshot_dir: PathBuf::from("screenshots"),
            output_dir: PathBuf::from("test-results"),
            profile_image_path: PathBuf::from("data/profileimage.jpeg"),
            employee: EmployeeDefaults::default(),
            logged_in_title_marker: "OrangeHRM".to_string(),
        }
    }
}

impl SuiteConfig {
    /// Load configuration from a TOML file, falling back to defaults when absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// File values, then `ORANGEHRM_*` variables, then command-line flags
    pub fn resolve(path: &Path, overrides: &ConfigOverrides) -> E2eResult<Self> {
        Self::resolve_with(path, |key| std::env::var(key).ok(), overrides)
    }

    fn resolve_with<F>(path: &Path, get: F, overrides: &ConfigOverrides) -> E2eResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_vars(get)?;
        config.apply_overrides(overrides)?;
        Ok(config)
    }

    /// Apply command-line values; unset fields keep the current value
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> E2eResult<()> {
        if let Some(url) = &overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(url) = &overrides.webdriver_url {
            self.webdriver_url = Some(url.clone());
        }
        if let Some(path) = &overrides.driver_binary {
            self.driver_binary = Some(path.clone());
        }
        if let Some(browser) = &overrides.browser {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = overrides.headless {
            self.headless = headless;
        }
        if let Some(path) = &overrides.credentials_path {
            self.credentials_path = path.clone();
        }
        if let Some(dir) = &overrides.screenshot_dir {
            self.screenshot_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        self.validate()
    }

    /// Apply `ORANGEHRM_*` overrides looked up through `get`
    fn apply_vars<F>(&mut self, get: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get("ORANGEHRM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = get("ORANGEHRM_WEBDRIVER_URL") {
            self.webdriver_url = Some(url);
        }
        if let Some(browser) = get("ORANGEHRM_BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = get("ORANGEHRM_HEADLESS") {
            self.headless = parse_bool(&headless)?;
        }
        if let Some(path) = get("ORANGEHRM_CREDENTIALS") {
            self.credentials_path = PathBuf::from(path);
        }
        if let Some(path) = get("ORANGEHRM_PROFILE_IMAGE") {
            self.profile_image_path = PathBuf::from(path);
        }
        self.validate()
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(E2eError::Config("base_url must not be empty".to_string()));
        }
        if self.login_timeout_secs == 0 || self.pim_timeout_secs == 0 {
            return Err(E2eError::Config("timeouts must be at least one second".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(E2eError::Config("poll_interval_ms must be positive".to_string()));
        }
        if self.dropdown_max_steps == 0 {
            return Err(E2eError::Config("dropdown_max_steps must be positive".to_string()));
        }
        Ok(())
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn pim_timeout(&self) -> Duration {
        Duration::from_secs(self.pim_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_bool(value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(E2eError::Config(format!("expected a boolean, got '{}'", other))),
    }
}

//! Test runner that owns the driver process and one browser session per scenario

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::browser::Session;
use crate::config::SuiteConfig;
use crate::credentials::CredentialSet;
use crate::driver::{DriverConfig, DriverHandle};
use crate::error::E2eResult;
use crate::scenarios::{Scenario, ScenarioContext};
use crate::screenshot::{self, Screenshot};
use crate::webdriver::WebDriverSession;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub screenshots: Vec<Screenshot>,
    pub error: Option<String>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Process exit code for a run: 0 all passed, 1 scenario failures, 2 setup error
pub fn exit_code(outcome: &E2eResult<bool>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Opens a fresh browser session for each scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> E2eResult<Box<dyn Session>>;
}

/// Sessions backed by a WebDriver endpoint
pub struct WebDriverFactory {
    url: String,
    config: SuiteConfig,
}

impl WebDriverFactory {
    pub fn new(url: impl Into<String>, config: SuiteConfig) -> Self {
        Self {
            url: url.into(),
            config,
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    async fn open(&self) -> E2eResult<Box<dyn Session>> {
        let session = WebDriverSession::connect(&self.url, &self.config).await?;
        Ok(Box::new(session))
    }
}

/// Main E2E test runner
pub struct TestRunner {
    config: SuiteConfig,
    driver_config: DriverConfig,

    /// Locally spawned driver (if any)
    driver: Option<DriverHandle>,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config: config.suite,
            driver_config: config.driver,
            driver: None,
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// WebDriver URL to use, spawning a local driver when none is configured
    pub async fn start_driver(&mut self) -> E2eResult<String> {
        if let Some(url) = &self.config.webdriver_url {
            return Ok(url.clone());
        }
        if let Some(driver) = &self.driver {
            return Ok(driver.url().to_string());
        }

        let driver = DriverHandle::spawn(self.driver_config.clone()).await?;
        let url = driver.url().to_string();
        self.driver = Some(driver);
        Ok(url)
    }

    pub fn stop_driver(&mut self) -> E2eResult<()> {
        if let Some(mut driver) = self.driver.take() {
            driver.stop()?;
        }
        Ok(())
    }

    /// Scenarios selected by name or tag; all of them when neither is given
    pub fn select(name: Option<&str>, tag: Option<&str>) -> E2eResult<Vec<Scenario>> {
        if let Some(name) = name {
            return Ok(vec![name.parse()?]);
        }
        Ok(Scenario::ALL
            .into_iter()
            .filter(|s| tag.map_or(true, |t| s.has_tag(t)))
            .collect())
    }

    /// Run scenarios against real browser sessions
    pub async fn run(&mut self, scenarios: &[Scenario]) -> E2eResult<TestSuiteResult> {
        let credentials = CredentialSet::load(&self.config.credentials_path)?;
        let url = self.start_driver().await?;
        let factory = WebDriverFactory::new(url, self.config.clone());
        self.run_with(&factory, &credentials, scenarios).await
    }

    /// Run scenarios sequentially with sessions from `factory`
    pub async fn run_with(
        &self,
        factory: &dyn SessionFactory,
        credentials: &CredentialSet,
        scenarios: &[Scenario],
    ) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(factory, credentials, *scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Acquire a session, run one scenario, always release the session
    pub async fn run_scenario(
        &self,
        factory: &dyn SessionFactory,
        credentials: &CredentialSet,
        scenario: Scenario,
    ) -> TestResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario);

        let session = match factory.open().await {
            Ok(session) => session,
            Err(e) => {
                return TestResult {
                    name: scenario.name().to_string(),
                    success: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    screenshots: vec![],
                    error: Some(format!("could not open browser session: {}", e)),
                }
            }
        };

        let ctx = ScenarioContext {
            session: &*session,
            config: &self.config,
            credentials,
        };

        let outcome = async {
            session.goto(&self.config.base_url).await?;
            scenario.run(&ctx).await
        }
        .await;

        let mut screenshots = Vec::new();
        let error = match outcome {
            Ok(shots) => {
                screenshots = shots;
                None
            }
            Err(e) => {
                let prefix = format!("failure_{}", scenario.name());
                match screenshot::capture(&*session, &self.config.screenshot_dir, &prefix).await {
                    Ok(shot) => screenshots.push(shot),
                    Err(shot_err) => warn!("Failure screenshot not captured: {}", shot_err),
                }
                Some(e.to_string())
            }
        };

        if let Err(e) = session.quit().await {
            warn!("Failed to quit session for {}: {}", scenario, e);
        }

        TestResult {
            name: scenario.name().to_string(),
            success: error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            screenshots,
            error,
        }
    }

    /// Write results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_driver();
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub suite: SuiteConfig,
    pub driver: DriverConfig,
}

impl RunnerConfig {
    /// Driver settings derived from the suite (binary matches the browser)
    pub fn from_suite(suite: SuiteConfig) -> Self {
        let binary_path = suite
            .driver_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(suite.browser.driver_binary()));
        Self {
            driver: DriverConfig {
                binary_path,
                ..Default::default()
            },
            suite,
        }
    }
}

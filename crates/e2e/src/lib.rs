//! OrangeHRM UI regression suite
//!
//! Page objects and scenarios for the OrangeHRM login and PIM screens,
//! driven through WebDriver:
//! - Spawns (or connects to) a WebDriver endpoint
//! - Opens one browser session per scenario and always releases it
//! - Drives the login and PIM page objects with bounded waits
//! - Captures timestamped screenshots and writes JSON results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TestRunner                               │
//! │    ├── start_driver() -> DriverHandle (chromedriver)        │
//! │    ├── SessionFactory::open() -> Box<dyn Session>           │
//! │    ├── Scenario::run(&ScenarioContext)                      │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page objects (LoginPage, PimPage)                          │
//! │    └── &dyn Session / Box<dyn Element>                      │
//! │          └── WebDriverSession (thirtyfour)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod config;
pub mod credentials;
pub mod data;
pub mod driver;
pub mod error;
pub mod pages;
pub mod runner;
pub mod scenarios;
pub mod screenshot;
pub mod webdriver;

pub use browser::{Element, Key, Locator, Session, WaitCondition};
pub use config::SuiteConfig;
pub use credentials::{CredentialRow, CredentialSet, Expectation};
pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use scenarios::Scenario;

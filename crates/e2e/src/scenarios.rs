//! Regression scenarios
//!
//! Each scenario is a fixed script against one fresh browser session. The
//! runner owns the session lifecycle; scenarios only drive page objects and
//! check one post-condition.
//!
//! `EditEmployee` and `DeleteEmployee` need at least one employee to exist in
//! the target application. The suite does not create it for them.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::browser::Session;
use crate::config::SuiteConfig;
use crate::credentials::{CredentialSet, Expectation};
use crate::data::EmployeeRecord;
use crate::error::{E2eError, E2eResult};
use crate::pages::{LoginPage, PimPage};
use crate::screenshot::{self, Screenshot};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Everything a scenario may touch
pub struct ScenarioContext<'a> {
    pub session: &'a dyn Session,
    pub config: &'a SuiteConfig,
    pub credentials: &'a CredentialSet,
}

impl<'a> ScenarioContext<'a> {
    fn login_page(&self) -> LoginPage<'a> {
        LoginPage::new(self.session, self.config.login_timeout())
            .with_title_marker(self.config.logged_in_title_marker.clone())
    }

    fn pim_page(&self) -> PimPage<'a> {
        PimPage::new(self.session, self.config.pim_timeout())
            .with_dropdown_max_steps(self.config.dropdown_max_steps)
    }

    async fn screenshot(&self, prefix: &str) -> E2eResult<Screenshot> {
        screenshot::capture(self.session, &self.config.screenshot_dir, prefix).await
    }

    /// Log in with the first row expected to pass
    async fn login_as_valid_user(&self) -> E2eResult<()> {
        let row = self.credentials.first(Expectation::Pass)?;
        self.login_page().login(&row.username, &row.password).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    LoginWithValidCredentials,
    LoginWithInvalidCredentials,
    AddEmployee,
    EditEmployee,
    DeleteEmployee,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::LoginWithValidCredentials,
        Scenario::LoginWithInvalidCredentials,
        Scenario::AddEmployee,
        Scenario::EditEmployee,
        Scenario::DeleteEmployee,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::LoginWithValidCredentials => "login_with_valid_credentials",
            Scenario::LoginWithInvalidCredentials => "login_with_invalid_credentials",
            Scenario::AddEmployee => "add_employee",
            Scenario::EditEmployee => "edit_employee",
            Scenario::DeleteEmployee => "delete_employee",
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Scenario::LoginWithValidCredentials => &["login", "smoke"],
            Scenario::LoginWithInvalidCredentials => &["login"],
            Scenario::AddEmployee => &["pim", "smoke"],
            Scenario::EditEmployee => &["pim"],
            Scenario::DeleteEmployee => &["pim"],
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| *t == tag)
    }

    pub async fn run(&self, ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
        match self {
            Scenario::LoginWithValidCredentials => login_with_valid_credentials(ctx).await,
            Scenario::LoginWithInvalidCredentials => login_with_invalid_credentials(ctx).await,
            Scenario::AddEmployee => add_employee(ctx).await,
            Scenario::EditEmployee => edit_employee(ctx).await,
            Scenario::DeleteEmployee => delete_employee(ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| E2eError::ScenarioNotFound(s.to_string()))
    }
}

fn ensure_toast_contains(message: &str, expected: &str) -> E2eResult<()> {
    if message.to_lowercase().contains(expected) {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(format!(
            "expected toast containing '{}', got '{}'",
            expected, message
        )))
    }
}

pub async fn login_with_valid_credentials(ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
    let row = ctx.credentials.first(Expectation::Pass)?;
    info!("Logging in with username: {}", row.username);

    let login = ctx.login_page();
    login.login(&row.username, &row.password).await?;

    if !login.is_logged_in().await? {
        return Err(E2eError::AssertionFailed(format!(
            "login failed for {}",
            row.username
        )));
    }
    info!("Login successful");

    Ok(vec![ctx.screenshot("login_success").await?])
}

pub async fn login_with_invalid_credentials(ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
    let row = ctx.credentials.first(Expectation::Fail)?;
    info!("Attempting login with invalid username: {}", row.username);

    let login = ctx.login_page();
    login.login(&row.username, &row.password).await?;

    let message = login.error_message().await?;
    if message != INVALID_CREDENTIALS_MESSAGE {
        return Err(E2eError::AssertionFailed(format!(
            "unexpected error message: '{}'",
            message
        )));
    }

    Ok(vec![ctx.screenshot("invalid_credentials").await?])
}

pub async fn add_employee(ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
    let record = EmployeeRecord::generated(&ctx.config.employee);

    ctx.login_as_valid_user().await?;

    let pim = ctx.pim_page();
    pim.navigate_to_pim().await?;
    pim.click_add_employee().await?;
    pim.enter_employee_details(&record.name, &record.employee_id)
        .await?;
    pim.upload_employee_image(&ctx.config.profile_image_path)
        .await?;
    pim.click_save().await?;

    let toast = pim.get_toast_message().await?;
    let shot = ctx.screenshot("employee_added_success").await?;
    ensure_toast_contains(&toast, "successfully saved")?;

    Ok(vec![shot])
}

pub async fn edit_employee(ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
    let record = EmployeeRecord::generated(&ctx.config.employee);
    info!("New license number: {}", record.license_number);

    ctx.login_as_valid_user().await?;

    let pim = ctx.pim_page();
    pim.navigate_to_pim().await?;
    if !pim.select_first_employee().await? {
        warn!("Continuing without an opened employee record");
    }

    pim.edit_employee_details(&record).await?;
    pim.click_save_personal_details().await?;

    let toast = pim.get_toast_message().await?;
    let shot = ctx.screenshot("employee_edit_success").await?;
    ensure_toast_contains(&toast, "successfully updated")?;

    Ok(vec![shot])
}

pub async fn delete_employee(ctx: &ScenarioContext<'_>) -> E2eResult<Vec<Screenshot>> {
    ctx.login_as_valid_user().await?;

    let pim = ctx.pim_page();
    pim.navigate_to_pim().await?;
    pim.delete_first_employee().await?;

    let toast = pim.get_toast_message().await?;
    let shot = ctx.screenshot("employee_delete_success").await?;
    ensure_toast_contains(&toast, "successfully deleted")?;

    Ok(vec![shot])
}

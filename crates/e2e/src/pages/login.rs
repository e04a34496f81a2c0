//! Login screen

use std::time::Duration;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::browser::{Locator, Session, WaitCondition};
use crate::error::E2eResult;

pub static USERNAME_FIELD: Lazy<Locator> = Lazy::new(|| Locator::name("username"));
pub static PASSWORD_FIELD: Lazy<Locator> = Lazy::new(|| Locator::name("password"));
pub static SUBMIT_BUTTON: Lazy<Locator> = Lazy::new(|| Locator::xpath("//button[@type='submit']"));
pub static ERROR_ALERT: Lazy<Locator> = Lazy::new(|| Locator::class_name("oxd-alert-content-text"));

/// Page object for the login form
pub struct LoginPage<'a> {
    session: &'a dyn Session,
    timeout: Duration,
    title_marker: String,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a dyn Session, timeout: Duration) -> Self {
        Self {
            session,
            timeout,
            title_marker: "OrangeHRM".to_string(),
        }
    }

    /// Title substring that marks an authenticated page
    pub fn with_title_marker(mut self, marker: impl Into<String>) -> Self {
        self.title_marker = marker.into();
        self
    }

    /// Fill the credentials and submit
    pub async fn login(&self, username: &str, password: &str) -> E2eResult<()> {
        let username_field = self
            .session
            .wait_for(&USERNAME_FIELD, WaitCondition::Visible, self.timeout)
            .await?;
        username_field.write_text(username).await?;
        info!("Entered username: {}", username);

        let password_field = self
            .session
            .wait_for(&PASSWORD_FIELD, WaitCondition::Visible, self.timeout)
            .await?;
        password_field.write_text(password).await?;
        debug!("Entered password");

        let submit = self
            .session
            .wait_for(&SUBMIT_BUTTON, WaitCondition::Clickable, self.timeout)
            .await?;
        submit.click().await?;
        info!("Clicked the login button");

        Ok(())
    }

    /// Whether the current document title carries the authenticated marker
    pub async fn is_logged_in(&self) -> E2eResult<bool> {
        let title = self.session.title().await?;
        debug!("Current page title: {}", title);
        Ok(title.contains(&self.title_marker))
    }

    /// Text of the login error alert
    pub async fn error_message(&self) -> E2eResult<String> {
        let alert = self
            .session
            .wait_for(&ERROR_ALERT, WaitCondition::Visible, self.timeout)
            .await?;
        let text = alert.text().await?;
        info!("Received error message: {}", text);
        Ok(text)
    }
}

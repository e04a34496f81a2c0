//! PIM (Personnel Information Management) screens
//!
//! Covers the employee list, the Add Employee form and the Personal Details
//! form of an existing employee. All state lives in the application; the page
//! object only holds the session and its wait budget.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::browser::{Element, Key, Locator, Session, WaitCondition};
use crate::data::{EmployeeRecord, PersonName};
use crate::error::{E2eError, E2eResult};

pub static PIM_MENU: Lazy<Locator> = Lazy::new(|| Locator::xpath("//span[text()='PIM']"));
pub static ADD_EMPLOYEE_LINK: Lazy<Locator> =
    Lazy::new(|| Locator::xpath("//a[normalize-space()='Add Employee']"));

pub static FIRST_NAME: Lazy<Locator> = Lazy::new(|| Locator::name("firstName"));
pub static MIDDLE_NAME: Lazy<Locator> = Lazy::new(|| Locator::name("middleName"));
pub static LAST_NAME: Lazy<Locator> = Lazy::new(|| Locator::name("lastName"));
pub static EMPLOYEE_ID: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(
        "//label[text()='Employee Id']/ancestor::div[contains(@class, 'oxd-input-group')]//input",
    )
});
pub static LICENSE_NUMBER: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(
        "//label[text()=\"Driver's License Number\"]/parent::div/following-sibling::div/input",
    )
});
pub static LICENSE_EXPIRY_DATE: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath("//label[text()='License Expiry Date']/parent::div/following-sibling::div//input")
});
pub static DATE_OF_BIRTH: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath("//label[text()='Date of Birth']/parent::div/following-sibling::div//input")
});

pub static NATIONALITY_DROPDOWN: Lazy<Locator> = Lazy::new(|| {
    Locator::css(
        ".orangehrm-edit-employee-content .orangehrm-vertical-padding:nth-of-type(1) \
         .oxd-grid-item--gutters:nth-of-type(1) [tabindex]",
    )
});
pub static MARITAL_STATUS_DROPDOWN: Lazy<Locator> = Lazy::new(|| {
    Locator::css(".orangehrm-edit-employee-content .oxd-grid-item--gutters:nth-of-type(2) [tabindex]")
});
pub static GENDER_MALE: Lazy<Locator> = Lazy::new(|| {
    Locator::css(".--gender-grouped-field .oxd-input-field-bottom-space:nth-of-type(1) label")
});
pub static GENDER_FEMALE: Lazy<Locator> = Lazy::new(|| {
    Locator::css(".--gender-grouped-field .oxd-input-field-bottom-space:nth-of-type(2) label")
});

pub static FILE_INPUT: Lazy<Locator> = Lazy::new(|| Locator::xpath("//input[@type='file']"));

/// Submit button of the Add Employee form
pub static SAVE_BUTTON: Lazy<Locator> = Lazy::new(|| Locator::xpath("//button[@type='submit']"));

/// Save button of the first section of the Personal Details form
pub static PERSONAL_DETAILS_SAVE: Lazy<Locator> = Lazy::new(|| {
    Locator::css(
        ".orangehrm-edit-employee-content .orangehrm-vertical-padding:nth-of-type(1) \
         .oxd-button--secondary",
    )
});

pub static SUCCESS_TOAST: Lazy<Locator> =
    Lazy::new(|| Locator::xpath("//div[contains(@class, 'oxd-toast-content--success')]"));
pub static TOAST_MESSAGE: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(".//p[contains(@class, 'oxd-text--p oxd-text--toast-message')]")
});

pub static FIRST_EMPLOYEE_ROW: Lazy<Locator> =
    Lazy::new(|| Locator::xpath("//div[@role='table']/div[2]/div[1]/div[1]"));
pub static FIRST_ROW_CHECKBOX: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(
        "//div[@role='table']/div[@role='rowgroup']/div[1]/div[1]/div[1]/div[1]/div[1]/label[1]",
    )
});
pub static DELETE_SELECTED: Lazy<Locator> = Lazy::new(|| Locator::css(".oxd-button--label-danger"));
pub static CONFIRM_DELETE: Lazy<Locator> = Lazy::new(|| {
    Locator::css(
        "button[class='oxd-button oxd-button--medium oxd-button--label-danger orangehrm-button-margin']",
    )
});

const DEFAULT_DROPDOWN_MAX_STEPS: usize = 250;

/// Gender radio options, in on-screen order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn locator(&self) -> &'static Locator {
        match self {
            Gender::Male => &GENDER_MALE,
            Gender::Female => &GENDER_FEMALE,
        }
    }
}

impl FromStr for Gender {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("male") {
            Ok(Gender::Male)
        } else if s.eq_ignore_ascii_case("female") {
            Ok(Gender::Female)
        } else {
            Err(E2eError::Config(format!("unknown gender: {}", s)))
        }
    }
}

/// Page object for the PIM module
pub struct PimPage<'a> {
    session: &'a dyn Session,
    timeout: Duration,
    dropdown_max_steps: usize,
}

impl<'a> PimPage<'a> {
    pub fn new(session: &'a dyn Session, timeout: Duration) -> Self {
        Self {
            session,
            timeout,
            dropdown_max_steps: DEFAULT_DROPDOWN_MAX_STEPS,
        }
    }

    pub fn with_dropdown_max_steps(mut self, steps: usize) -> Self {
        self.dropdown_max_steps = steps;
        self
    }

    async fn wait(&self, locator: &Locator, condition: WaitCondition) -> E2eResult<Box<dyn Element>> {
        self.session.wait_for(locator, condition, self.timeout).await
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.wait(locator, WaitCondition::Clickable).await?.click().await
    }

    pub async fn navigate_to_pim(&self) -> E2eResult<()> {
        self.click(&PIM_MENU).await?;
        info!("Opened the PIM module");
        Ok(())
    }

    pub async fn click_add_employee(&self) -> E2eResult<()> {
        self.click(&ADD_EMPLOYEE_LINK).await?;
        info!("Opened the Add Employee form");
        Ok(())
    }

    /// Clear and type the name fields and the employee id
    pub async fn enter_employee_details(&self, name: &PersonName, employee_id: &str) -> E2eResult<()> {
        info!(
            "Entering employee details: {} {} {} ({})",
            name.first, name.middle, name.last, employee_id
        );

        let fields = [
            (&*FIRST_NAME, name.first.as_str()),
            (&*MIDDLE_NAME, name.middle.as_str()),
            (&*LAST_NAME, name.last.as_str()),
            (&*EMPLOYEE_ID, employee_id),
        ];
        for (locator, value) in fields {
            let field = self.wait(locator, WaitCondition::Visible).await?;
            field.write_text(value).await?;
            debug!("Entered '{}' into {}", value, locator);
        }
        Ok(())
    }

    /// Write `text` only when the field holds something else.
    ///
    /// Returns whether the field was modified.
    pub async fn clear_and_enter_text(
        &self,
        locator: &Locator,
        text: &str,
        field_name: &str,
    ) -> E2eResult<bool> {
        let field = self.wait(locator, WaitCondition::Visible).await?;
        let current = field.value().await?.unwrap_or_default();

        if current == text {
            debug!("No change needed for {}: already '{}'", field_name, current);
            return Ok(false);
        }

        field.write_text(text).await?;
        info!("Entered '{}' in {}", text, field_name);
        Ok(true)
    }

    pub async fn upload_employee_image(&self, image_path: &Path) -> E2eResult<()> {
        let absolute = tokio::fs::canonicalize(image_path).await.map_err(|e| {
            E2eError::Config(format!(
                "profile image {} is not readable: {}",
                image_path.display(),
                e
            ))
        })?;

        let input = self.wait(&FILE_INPUT, WaitCondition::Present).await?;
        input.send_keys(&absolute.to_string_lossy()).await?;
        info!("Image uploaded from: {}", absolute.display());
        Ok(())
    }

    /// Submit the Add Employee form
    pub async fn click_save(&self) -> E2eResult<()> {
        self.click(&SAVE_BUTTON).await?;
        info!("Save button clicked");
        Ok(())
    }

    /// Submit the Personal Details section of an existing employee
    pub async fn click_save_personal_details(&self) -> E2eResult<()> {
        let button = self.wait(&PERSONAL_DETAILS_SAVE, WaitCondition::Visible).await?;
        button.click().await?;
        info!("Personal details save button clicked");
        Ok(())
    }

    /// Text of the success toast
    pub async fn get_toast_message(&self) -> E2eResult<String> {
        let toast = self.wait(&SUCCESS_TOAST, WaitCondition::Visible).await?;
        let message = toast.find(&TOAST_MESSAGE).await?.text().await?;
        info!("Toast message is: {}", message);
        Ok(message)
    }

    /// Open the first employee of the list.
    ///
    /// A failure is logged and reported as `false`; it is not retried.
    pub async fn select_first_employee(&self) -> E2eResult<bool> {
        let clicked = async {
            let row = self.wait(&FIRST_EMPLOYEE_ROW, WaitCondition::Visible).await?;
            row.click().await
        }
        .await;

        match clicked {
            Ok(()) => {
                info!("Selected the first employee");
                Ok(true)
            }
            Err(e) => {
                warn!("Error selecting the first employee: {}", e);
                Ok(false)
            }
        }
    }

    pub async fn select_marital_status(&self, status: &str) -> E2eResult<()> {
        self.select_from_dropdown(&MARITAL_STATUS_DROPDOWN, "marital status", status)
            .await
    }

    pub async fn select_nationality(&self, nationality: &str) -> E2eResult<()> {
        self.select_from_dropdown(&NATIONALITY_DROPDOWN, "nationality", nationality)
            .await
    }

    /// Walk a custom dropdown with ArrowDown until it displays `target`, then
    /// confirm with Enter. Gives up after `dropdown_max_steps` presses.
    async fn select_from_dropdown(&self, locator: &Locator, field: &str, target: &str) -> E2eResult<()> {
        let dropdown = self.wait(locator, WaitCondition::Visible).await?;
        dropdown.click().await?;

        let mut presses = 0;
        loop {
            let displayed = dropdown.text().await?;
            if displayed.trim() == target {
                dropdown.press(Key::Enter).await?;
                info!("Selected {}: '{}' after {} step(s)", field, target, presses);
                return Ok(());
            }
            if presses == self.dropdown_max_steps {
                return Err(E2eError::OptionNotFound {
                    field: field.to_string(),
                    target: target.to_string(),
                    attempts: presses,
                });
            }
            dropdown.press(Key::ArrowDown).await?;
            presses += 1;
        }
    }

    pub async fn select_gender(&self, gender: Gender) -> E2eResult<()> {
        let option = self.wait(gender.locator(), WaitCondition::Visible).await?;
        option.click().await?;
        info!("Selected gender: {:?}", gender);
        Ok(())
    }

    /// Fill the Personal Details form from `record`
    pub async fn edit_employee_details(&self, record: &EmployeeRecord) -> E2eResult<()> {
        let gender: Gender = record.gender.parse()?;

        self.enter_employee_details(&record.name, &record.employee_id)
            .await?;
        self.clear_and_enter_text(&LICENSE_NUMBER, &record.license_number, "Driver's License Number")
            .await?;
        self.clear_and_enter_text(
            &LICENSE_EXPIRY_DATE,
            &record.license_expiry_date,
            "License Expiry Date",
        )
        .await?;
        self.clear_and_enter_text(&DATE_OF_BIRTH, &record.date_of_birth, "Date of Birth")
            .await?;
        self.select_nationality(&record.nationality).await?;
        self.select_marital_status(&record.marital_status).await?;
        self.select_gender(gender).await
    }

    /// Tick the first row, delete it and confirm
    pub async fn delete_first_employee(&self) -> E2eResult<()> {
        let checkbox = self.wait(&FIRST_ROW_CHECKBOX, WaitCondition::Clickable).await?;
        if !checkbox.is_selected().await? {
            checkbox.click().await?;
        }
        info!("Employee checkbox selected");

        self.click(&DELETE_SELECTED).await?;
        info!("Delete Selected button clicked");

        self.click(&CONFIRM_DELETE).await?;
        info!("Confirmed deletion");
        Ok(())
    }
}

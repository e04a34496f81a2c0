//! Random employee data for form input variation

use rand::Rng;

use crate::config::EmployeeDefaults;

const FIRST_NAMES: [&str; 8] = ["Alice", "Bob", "Charlie", "David", "Eva", "Fay", "Grace", "Hank"];
const MIDDLE_NAMES: [&str; 8] = ["James", "Marie", "Lee", "Ray", "Louise", "Rose", "Jude", "Lynn"];
const LAST_NAMES: [&str; 8] = [
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson",
];

const EMPLOYEE_ID_DIGITS: usize = 3;

/// First, middle and last name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

pub fn random_name() -> PersonName {
    random_name_with(&mut rand::thread_rng())
}

pub fn random_name_with<R: Rng + ?Sized>(rng: &mut R) -> PersonName {
    PersonName {
        first: pick(&FIRST_NAMES, rng),
        middle: pick(&MIDDLE_NAMES, rng),
        last: pick(&LAST_NAMES, rng),
    }
}

fn pick<R: Rng + ?Sized, const N: usize>(list: &[&'static str; N], rng: &mut R) -> String {
    list[rng.gen_range(0..N)].to_string()
}

/// Three decimal digits, leading zeros allowed
pub fn random_employee_id() -> String {
    random_employee_id_with(&mut rand::thread_rng())
}

pub fn random_employee_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..EMPLOYEE_ID_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// `DL` followed by an employee id
pub fn random_license_number() -> String {
    random_license_number_with(&mut rand::thread_rng())
}

pub fn random_license_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("DL{}", random_employee_id_with(rng))
}

/// Input for the add and edit employee forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub name: PersonName,
    pub employee_id: String,
    pub license_number: String,
    pub license_expiry_date: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub marital_status: String,
    pub gender: String,
}

impl EmployeeRecord {
    /// Fresh random name, id and license number; remaining fields from config
    pub fn generated(defaults: &EmployeeDefaults) -> Self {
        Self::generated_with(&mut rand::thread_rng(), defaults)
    }

    pub fn generated_with<R: Rng + ?Sized>(rng: &mut R, defaults: &EmployeeDefaults) -> Self {
        Self {
            name: random_name_with(rng),
            employee_id: random_employee_id_with(rng),
            license_number: random_license_number_with(rng),
            license_expiry_date: defaults.license_expiry_date.clone(),
            date_of_birth: defaults.date_of_birth.clone(),
            nationality: defaults.nationality.clone(),
            marital_status: defaults.marital_status.clone(),
            gender: defaults.gender.clone(),
        }
    }
}

//! Page objects for the OrangeHRM screens under test

pub mod login;
pub mod pim;

pub use login::LoginPage;
pub use pim::{Gender, PimPage};

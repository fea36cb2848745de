// src/booking/mod.rs
//
// Five-step booking wizard: services, date/time, account, contact, confirmation.

pub mod render;
pub mod slots;
pub mod validation;
pub mod wizard;

pub use render::render;
pub use validation::ContactForm;
pub use wizard::{Account, AccountOutcome, Step, Wizard};

pub mod biometric;
pub mod pin_setup;
pub mod unlock;

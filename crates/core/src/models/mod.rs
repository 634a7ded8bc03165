pub mod bank;
pub mod calendar;
pub mod credential;
pub mod export;
pub mod investment;

pub mod calc;
pub mod countries;
pub mod dashboard;
pub mod setup;
pub mod ui;
pub mod watch;

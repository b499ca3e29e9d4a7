pub mod employee;
pub mod export;
pub mod timesheet;

// Handlers module - API endpoint handlers

pub mod auth_check;
pub mod bug_report;
pub mod forward;
pub mod share;

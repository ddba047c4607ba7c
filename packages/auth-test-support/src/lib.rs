//! Test helpers shared by the jwt-auth unit and integration suites.

pub mod logging;
pub mod problem_details;

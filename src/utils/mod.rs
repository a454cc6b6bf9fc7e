pub mod error;
pub mod interactive;
pub mod output;

pub use error::{AppError, AppResult, report_error};
pub use output::{OutputStyle, print_empty_result, print_success, print_warning};

pub mod report_view_handlers;
pub mod report_view_models;

pub mod project_view_handlers;
pub mod project_view_models;

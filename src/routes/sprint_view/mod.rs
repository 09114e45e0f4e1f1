pub mod sprint_view_handlers;
pub mod sprint_view_models;

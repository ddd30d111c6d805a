pub mod app;
pub mod autocomplete;
pub mod form;
pub mod ui;

pub mod browser;
pub mod dialog;
pub mod status_bar;
pub mod tables;

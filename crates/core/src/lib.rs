pub mod allowlist;
pub mod api;
pub mod assets;
pub mod error;
pub mod form;
pub mod gallery;
pub mod i18n;
pub mod locale;
pub mod markup;
pub mod options;
pub mod organizers;
pub mod payload;
pub mod record;
pub mod resource;
pub mod route;
pub mod session;
pub mod types;
pub mod views;

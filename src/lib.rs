// TODO: surface ValidateReport through the api facade

pub mod api;
pub mod catalog;
pub mod store;

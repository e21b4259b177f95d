// Entry points for the invitation front end.

pub mod invite_api;
pub mod simple;

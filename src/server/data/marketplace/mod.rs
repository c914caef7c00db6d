//! Repositories of the marketplace catalog and its per-societe installations and ratings.

pub mod installation;
pub mod module;
pub mod rating;

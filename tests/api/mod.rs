mod admin;
mod client;
mod health;
mod marketplace;
mod material;
mod projet;
mod tenancy;

pub use super::client::Entity as Client;
pub use super::marketplace_module::Entity as MarketplaceModule;
pub use super::material::Entity as Material;
pub use super::material_movement::Entity as MaterialMovement;
pub use super::module_installation::Entity as ModuleInstallation;
pub use super::module_rating::Entity as ModuleRating;
pub use super::projet::Entity as Projet;
pub use super::societe::Entity as Societe;
pub use super::system_parameter::Entity as SystemParameter;

//! Database model type aliases for test utilities.

pub type SocieteModel = entity::societe::Model;
pub type ClientModel = entity::client::Model;
pub type ProjetModel = entity::projet::Model;
pub type MaterialModel = entity::material::Model;
pub type MovementModel = entity::material_movement::Model;
pub type ModuleModel = entity::marketplace_module::Model;
pub type InstallationModel = entity::module_installation::Model;
pub type ParameterModel = entity::system_parameter::Model;

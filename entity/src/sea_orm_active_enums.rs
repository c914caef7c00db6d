use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocieteStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "SUSPENDED")]
    Suspended,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    #[sea_orm(string_value = "STRING")]
    String,
    #[sea_orm(string_value = "NUMBER")]
    Number,
    #[sea_orm(string_value = "BOOLEAN")]
    Boolean,
    #[sea_orm(string_value = "JSON")]
    Json,
    #[sea_orm(string_value = "ENUM")]
    Enum,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleCategory {
    #[sea_orm(string_value = "HR")]
    Hr,
    #[sea_orm(string_value = "PROCUREMENT")]
    Procurement,
    #[sea_orm(string_value = "ANALYTICS")]
    Analytics,
    #[sea_orm(string_value = "INTEGRATION")]
    Integration,
    #[sea_orm(string_value = "QUALITY")]
    Quality,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
    #[sea_orm(string_value = "FINANCE")]
    Finance,
    #[sea_orm(string_value = "PRODUCTION")]
    Production,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "DEPRECATED")]
    Deprecated,
    #[sea_orm(string_value = "DISABLED")]
    Disabled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "INSTALLING")]
    Installing,
    #[sea_orm(string_value = "INSTALLED")]
    Installed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "UNINSTALLING")]
    Uninstalling,
    #[sea_orm(string_value = "UNINSTALLED")]
    Uninstalled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    #[sea_orm(string_value = "CLIENT")]
    Client,
    #[sea_orm(string_value = "FOURNISSEUR")]
    Fournisseur,
    #[sea_orm(string_value = "MIXTE")]
    Mixte,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    #[sea_orm(string_value = "PROSPECT")]
    Prospect,
    #[sea_orm(string_value = "ACTIF")]
    Actif,
    #[sea_orm(string_value = "INACTIF")]
    Inactif,
    #[sea_orm(string_value = "SUSPENDU")]
    Suspendu,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjetStatut {
    #[sea_orm(string_value = "DEVIS")]
    Devis,
    #[sea_orm(string_value = "EN_ATTENTE")]
    EnAttente,
    #[sea_orm(string_value = "ACCEPTE")]
    Accepte,
    #[sea_orm(string_value = "EN_COURS")]
    EnCours,
    #[sea_orm(string_value = "TERMINE")]
    Termine,
    #[sea_orm(string_value = "ANNULE")]
    Annule,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjetPriorite {
    #[sea_orm(string_value = "BASSE")]
    Basse,
    #[sea_orm(string_value = "NORMALE")]
    Normale,
    #[sea_orm(string_value = "HAUTE")]
    Haute,
    #[sea_orm(string_value = "URGENTE")]
    Urgente,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialType {
    #[sea_orm(string_value = "ACIER")]
    Acier,
    #[sea_orm(string_value = "INOX")]
    Inox,
    #[sea_orm(string_value = "ALUMINIUM")]
    Aluminium,
    #[sea_orm(string_value = "CUIVRE")]
    Cuivre,
    #[sea_orm(string_value = "FONTE")]
    Fonte,
    #[sea_orm(string_value = "BRONZE")]
    Bronze,
    #[sea_orm(string_value = "LAITON")]
    Laiton,
    #[sea_orm(string_value = "PLASTIQUE")]
    Plastique,
    #[sea_orm(string_value = "COMPOSITE")]
    Composite,
    #[sea_orm(string_value = "AUTRE")]
    Autre,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialShape {
    #[sea_orm(string_value = "PLAQUE")]
    Plaque,
    #[sea_orm(string_value = "TUBE")]
    Tube,
    #[sea_orm(string_value = "BARRE")]
    Barre,
    #[sea_orm(string_value = "PROFILE")]
    Profile,
    #[sea_orm(string_value = "TOLE")]
    Tole,
    #[sea_orm(string_value = "FIL")]
    Fil,
    #[sea_orm(string_value = "ROND")]
    Rond,
    #[sea_orm(string_value = "CARRE")]
    Carre,
    #[sea_orm(string_value = "RECTANGLE")]
    Rectangle,
    #[sea_orm(string_value = "CORNIERE")]
    Corniere,
    #[sea_orm(string_value = "U")]
    U,
    #[sea_orm(string_value = "T")]
    T,
    #[sea_orm(string_value = "AUTRE")]
    Autre,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialStatus {
    #[sea_orm(string_value = "ACTIF")]
    Actif,
    #[sea_orm(string_value = "INACTIF")]
    Inactif,
    #[sea_orm(string_value = "OBSOLETE")]
    Obsolete,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    #[sea_orm(string_value = "ENTREE")]
    Entree,
    #[sea_orm(string_value = "SORTIE")]
    Sortie,
    #[sea_orm(string_value = "TRANSFERT")]
    Transfert,
    #[sea_orm(string_value = "AJUSTEMENT")]
    Ajustement,
    #[sea_orm(string_value = "INVENTAIRE")]
    Inventaire,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementStatus {
    #[sea_orm(string_value = "BROUILLON")]
    Brouillon,
    #[sea_orm(string_value = "VALIDE")]
    Valide,
    #[sea_orm(string_value = "ANNULE")]
    Annule,
}

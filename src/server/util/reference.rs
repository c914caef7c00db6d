//! Generators for human-readable codes and references.
//!
//! Sequences come from counting existing rows, so callers must retry with the next
//! sequence number when the generated value is already taken.

use chrono::{Datelike, NaiveDate};
use entity::sea_orm_active_enums::{ClientType, MaterialShape, MaterialType, MovementType};

/// `CLI000001`, `FOU000001` or `MIX000001`
pub fn client_code(client_type: ClientType, sequence: u64) -> String {
    let prefix = match client_type {
        ClientType::Client => "CLI",
        ClientType::Fournisseur => "FOU",
        ClientType::Mixte => "MIX",
    };

    format!("{}{:06}", prefix, sequence)
}

/// `PRJ-2025-0001`
pub fn projet_reference(year: i32, sequence: u64) -> String {
    format!("PRJ-{}-{:04}", year, sequence)
}

/// `AC-PL-000001`
pub fn material_reference(material_type: MaterialType, forme: MaterialShape, sequence: u64) -> String {
    format!(
        "{}-{}-{:06}",
        material_type_prefix(material_type),
        forme_prefix(forme),
        sequence
    )
}

/// `MVT-E-20251201-0001`
pub fn movement_reference(movement_type: MovementType, date: NaiveDate, sequence: u64) -> String {
    let prefix = match movement_type {
        MovementType::Entree => "E",
        MovementType::Sortie => "S",
        MovementType::Transfert => "T",
        MovementType::Ajustement => "A",
        MovementType::Inventaire => "I",
    };

    format!(
        "MVT-{}-{:04}{:02}{:02}-{:04}",
        prefix,
        date.year(),
        date.month(),
        date.day(),
        sequence
    )
}

fn material_type_prefix(material_type: MaterialType) -> &'static str {
    match material_type {
        MaterialType::Acier => "AC",
        MaterialType::Inox => "IN",
        MaterialType::Aluminium => "AL",
        MaterialType::Cuivre => "CU",
        MaterialType::Fonte => "FO",
        MaterialType::Bronze => "BR",
        MaterialType::Laiton => "LA",
        MaterialType::Plastique => "PL",
        MaterialType::Composite => "CO",
        MaterialType::Autre => "AU",
    }
}

fn forme_prefix(forme: MaterialShape) -> &'static str {
    match forme {
        MaterialShape::Plaque => "PL",
        MaterialShape::Tube => "TB",
        MaterialShape::Barre => "BR",
        MaterialShape::Profile => "PR",
        MaterialShape::Tole => "TL",
        MaterialShape::Fil => "FI",
        MaterialShape::Rond => "RD",
        MaterialShape::Carre => "CA",
        MaterialShape::Rectangle => "RE",
        MaterialShape::Corniere => "CN",
        MaterialShape::U => "U",
        MaterialShape::T => "T",
        MaterialShape::Autre => "AU",
    }
}

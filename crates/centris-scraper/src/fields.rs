//! Output field names

pub const ID: &str = "ID";
pub const URL: &str = "url";
pub const PROPERTY_TYPE: &str = "Type de propriété";
pub const ADDRESS: &str = "Adresse";
pub const CITY: &str = "Ville";
pub const PRICE: &str = "Prix";
pub const ROOMS: &str = "Nombre de pièces";
pub const BEDROOMS: &str = "Nombre de chambres";
pub const BATHROOMS: &str = "Nombre de salles de bain";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const WALKSCORE: &str = "Walkscore";
pub const DESCRIPTION: &str = "Description";

pub mod financial {
    //! Integer fields read from the financial details tables

    pub const LAND_ASSESSMENT: &str = "Évaluation terrain";
    pub const BUILDING_ASSESSMENT: &str = "Évaluation bâtiment";
    pub const MUNICIPAL_TAXES: &str = "Taxes municipales";
    pub const SCHOOL_TAXES: &str = "Taxes scolaires";
    pub const CONDO_FEES: &str = "Frais de copropriété";
}

/// Characteristic titles that always get a column, even when a listing lacks them
pub const CHARACTERISTICS: [&str; 23] = [
    "Type de copropriété",
    "Superficie nette",
    "Superficie brute",
    "Année de construction",
    "Stationnement total",
    "Date d’emménagement",
    "Caractéristiques additionnelles",
    "Foyer / Poêle",
    "Piscine",
    "Superficie du terrain",
    "Style de bâtiment",
    "Revenus bruts potentiels",
    "Unité principale",
    "Nombre d’unités",
    "Unités résidentielles",
    "Stationnement exclus du prix",
    "Superficie habitable",
    "Superficie du bâtiment (au sol)",
    "Superficie commerciale disponible",
    "Utilisation de la propriété",
    "Étage",
    "Accessibilité",
    "Zonage",
];

pub fn photo(slot: usize) -> String {
    format!("photo_{}", slot + 1)
}

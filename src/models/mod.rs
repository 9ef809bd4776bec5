pub mod annulation;
pub mod datetime;
pub mod enums;
pub mod filters;
pub mod log_entry;
pub mod patient;
pub mod praticien;
pub mod rappel;
pub mod rendez_vous;
pub mod statistiques;
pub mod user;

pub use annulation::{Annulation, AnnulationResolution, NewAnnulation};
pub use enums::{
    CivilitePatient, CivilitePraticien, Role, StatutAnnulation, StatutRdv, TypeRappel,
};
pub use log_entry::LogEntry;
pub use patient::Patient;
pub use praticien::{Horaire, Indisponibilite, Praticien};
pub use rappel::Rappel;
pub use rendez_vous::{RendezVous, RendezVousPayload};
pub use statistiques::{RdvParPraticien, RdvParSpecialite, Statistiques};
pub use user::{ProfileRef, User};

/// Opaque backend identifier.
pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

//! Client-side form checks, run before any network call.
//!
//! Every validator returns the request body on success or a `FieldErrors`
//! map whose messages are shown inline next to the offending inputs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;

use crate::models::{CivilitePatient, CivilitePraticien, Id, RendezVousPayload, Role, User};

/// Key for messages not tied to one input.
pub const NON_FIELD: &str = "non_field_errors";

pub const MOTIF_MIN_CHARS: usize = 5;
pub const RPPS_MAX_CHARS: usize = 11;

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const MSG_PHONE: &str =
    "Le numéro de téléphone doit être au format: '+999999999'. Jusqu'à 15 chiffres autorisés.";
const MSG_EMAIL: &str = "Adresse email invalide";
const MSG_CIVILITE: &str = "Veuillez sélectionner une civilité";

// ═══════════════════════════════════════════════════════════
// FieldErrors
// ═══════════════════════════════════════════════════════════

/// Field name → message, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message not attached to any input.
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(NON_FIELD, message);
        errors
    }

    /// First message for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    fn check_phone(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !PHONE.is_match(value) {
            self.insert(field, MSG_PHONE);
        }
    }

    fn check_email(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !EMAIL.is_match(value) {
            self.insert(field, MSG_EMAIL);
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            if field == NON_FIELD {
                f.write_str(message)?;
            } else {
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (k, v) in iter {
            errors.insert(k, v);
        }
        errors
    }
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}

// ═══════════════════════════════════════════════════════════
// Appointment and cancellation
// ═══════════════════════════════════════════════════════════

/// Create-appointment form as filled in by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRendezVous {
    pub praticien_id: Option<Id>,
    /// Ignored for patients: their own profile is used.
    pub patient_id: Option<Id>,
    pub date_heure: Option<DateTime<Utc>>,
    pub motif: String,
    pub notes: String,
}

impl NewRendezVous {
    pub fn validate(&self, actor: &User, now: DateTime<Utc>) -> Result<RendezVousPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.praticien_id.is_none() {
            errors.insert("praticien_id", "Veuillez sélectionner un praticien");
        }

        let patient_id = if actor.has_role(Role::Patient) {
            let own = actor.patient_id();
            if own.is_none() {
                errors.insert("patient_id", "Profil patient introuvable");
            }
            own
        } else {
            if self.patient_id.is_none() {
                errors.insert("patient_id", "Veuillez sélectionner un patient");
            }
            self.patient_id
        };

        match self.date_heure {
            None => errors.insert("date_heure", "Veuillez sélectionner une date et heure"),
            Some(when) if when <= now => errors.insert("date_heure", "La date doit être dans le futur"),
            Some(_) => {}
        }

        let motif = self.motif.trim();
        if motif.chars().count() < MOTIF_MIN_CHARS {
            errors.insert("motif", "Le motif doit contenir au moins 5 caractères");
        }

        match (self.praticien_id, patient_id, self.date_heure, errors.is_empty()) {
            (Some(praticien_id), Some(patient_id), Some(date_heure), true) => Ok(RendezVousPayload {
                patient_id,
                praticien_id,
                date_heure,
                motif: motif.to_string(),
                notes: self.notes.trim().to_string(),
                statut: None,
            }),
            _ => Err(errors),
        }
    }
}

/// Reason for a cancellation request; blank is refused.
pub fn validate_cancellation_motif(motif: &str) -> Result<String, FieldErrors> {
    let motif = motif.trim();
    if motif.is_empty() {
        let mut errors = FieldErrors::new();
        errors.insert("motif", "Veuillez indiquer un motif d'annulation");
        return Err(errors);
    }
    Ok(motif.to_string())
}

// ═══════════════════════════════════════════════════════════
// Account forms
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Nom d'utilisateur obligatoire");
        if self.password.is_empty() {
            errors.insert("password", "Mot de passe obligatoire");
        }
        errors.into_result()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Patient create/edit form (staff side).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientForm {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub civilite: Option<CivilitePatient>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub adresse: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_naissance: Option<NaiveDate>,
}

impl PatientForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.civilite.is_none() {
            errors.insert("civilite", MSG_CIVILITE);
        }
        errors.require("first_name", &self.first_name, "Prénom obligatoire");
        errors.require("last_name", &self.last_name, "Nom obligatoire");
        errors.require("telephone", &self.telephone, "Téléphone obligatoire");
        errors.require("adresse", &self.adresse, "Adresse obligatoire");
        errors.check_phone("telephone", &self.telephone);
        errors.check_email("email", &self.email);
        errors.into_result()
    }
}

/// Practitioner create/edit form (admin only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PraticienForm {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub civilite: Option<CivilitePraticien>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub specialite: String,
    pub numero_rpps: String,
    pub actif: bool,
}

impl Default for PraticienForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            civilite: Some(CivilitePraticien::Dr),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            telephone: String::new(),
            specialite: String::new(),
            numero_rpps: String::new(),
            actif: true,
        }
    }
}

impl PraticienForm {
    /// Account credentials are only asked for on creation.
    pub fn validate(&self, mode: FormMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if mode == FormMode::Create {
            errors.require("username", &self.username, "Nom d'utilisateur obligatoire");
            if self.password.is_empty() {
                errors.insert("password", "Mot de passe obligatoire");
            }
        }
        if self.civilite.is_none() {
            errors.insert("civilite", MSG_CIVILITE);
        }
        errors.require("first_name", &self.first_name, "Prénom obligatoire");
        errors.require("last_name", &self.last_name, "Nom obligatoire");
        errors.require("email", &self.email, "Email obligatoire");
        errors.require("specialite", &self.specialite, "Spécialité obligatoire");
        errors.require("telephone", &self.telephone, "Téléphone obligatoire");
        errors.check_email("email", &self.email);
        errors.check_phone("telephone", &self.telephone);
        if self.numero_rpps.trim().chars().count() > RPPS_MAX_CHARS {
            errors.insert("numero_rpps", "Le numéro RPPS ne peut pas dépasser 11 caractères");
        }
        errors.into_result()
    }
}

/// Self-service patient sign-up.
#[derive(Clone, PartialEq, Serialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password2: String,
    pub civilite: Option<CivilitePatient>,
    pub telephone: String,
    pub adresse: String,
    pub date_naissance: Option<NaiveDate>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            password2: String::new(),
            civilite: Some(CivilitePatient::M),
            telephone: String::new(),
            adresse: String::new(),
            date_naissance: None,
        }
    }
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Nom d'utilisateur obligatoire");
        errors.require("email", &self.email, "Email obligatoire");
        errors.require("first_name", &self.first_name, "Prénom obligatoire");
        errors.require("last_name", &self.last_name, "Nom obligatoire");
        if self.password.is_empty() {
            errors.insert("password", "Mot de passe obligatoire");
        }
        if self.password != self.password2 {
            errors.insert("password2", "Les mots de passe ne correspondent pas");
        }
        if self.civilite.is_none() {
            errors.insert("civilite", MSG_CIVILITE);
        }
        errors.require("telephone", &self.telephone, "Téléphone obligatoire");
        errors.require("adresse", &self.adresse, "Adresse obligatoire");
        if self.date_naissance.is_none() {
            errors.insert("date_naissance", "Date de naissance obligatoire");
        }
        errors.check_email("email", &self.email);
        errors.check_phone("telephone", &self.telephone);
        errors.into_result()
    }
}

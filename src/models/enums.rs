use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form is the string literal, for serde and for query params alike.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Role {
    Admin => "admin",
    Praticien => "praticien",
    Patient => "patient",
});

str_enum!(StatutRdv {
    EnAttente => "en_attente",
    Confirme => "confirme",
    Annule => "annule",
    Termine => "termine",
    Absence => "absence",
});

str_enum!(StatutAnnulation {
    EnAttente => "en_attente",
    Acceptee => "acceptee",
    Refusee => "refusee",
});

str_enum!(CivilitePraticien {
    M => "M",
    Mme => "Mme",
    Dr => "Dr",
    Pr => "Pr",
});

str_enum!(CivilitePatient {
    M => "M",
    Mme => "Mme",
    Mlle => "Mlle",
});

str_enum!(TypeRappel {
    Avant24h => "24h",
    Avant48h => "48h",
    Email => "email",
    Sms => "sms",
    Notification => "notification",
});

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::Praticien => "Praticien",
            Self::Patient => "Patient",
        }
    }

    /// Admin and practitioners act on appointments on behalf of patients.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Praticien)
    }
}

impl StatutRdv {
    pub fn label(&self) -> &'static str {
        match self {
            Self::EnAttente => "En attente",
            Self::Confirme => "Confirmé",
            Self::Annule => "Annulé",
            Self::Termine => "Terminé",
            Self::Absence => "Absence",
        }
    }
}

impl StatutAnnulation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::EnAttente => "En attente",
            Self::Acceptee => "Acceptée",
            Self::Refusee => "Refusée",
        }
    }
}

impl TypeRappel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Avant24h => "24 heures avant",
            Self::Avant48h => "48 heures avant",
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::Notification => "Notification",
        }
    }
}

//! Screen controllers.
//!
//! Each controller owns the data it last fetched successfully plus the notice
//! left by the last failure. Mutations ask `Dialogs::confirm` first, then call
//! the backend, then refetch; displayed data is never patched locally.

pub mod annulations;
pub mod dashboard;
pub mod logs;
pub mod patients;
pub mod praticiens;
pub mod rappels;
pub mod rendez_vous;
pub mod statistiques;

use crate::error::{Error, Notice};
use crate::models::{RendezVous, Role, StatutRdv, User};

pub use annulations::AnnulationsView;
pub use dashboard::{DashboardSummary, DashboardView};
pub use logs::{ActionCategory, LogsView};
pub use patients::{PatientDetail, PatientDetailView, PatientFormView, PatientsView};
pub use praticiens::{PraticienFormView, PraticienPlanning, PraticienPlanningView, PraticiensView};
pub use rappels::{RappelCounters, RappelsView};
pub use rendez_vous::{RendezVousCreateView, RendezVousDetailView, RendezVousListView};
pub use statistiques::StatistiquesView;

/// Blocking yes/no prompt shown before state-changing actions.
pub trait Dialogs: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Result of a user-initiated action that went through a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The dialog was dismissed; nothing was sent.
    Declined,
}

/// Per-screen state: last good data, loading flag, last failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen<T> {
    data: Option<T>,
    loading: bool,
    notice: Option<Notice>,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            notice: None,
        }
    }
}

impl<T> Screen<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    /// Replace the data on success; on failure keep it and record a notice.
    pub(crate) fn settle(&mut self, result: Result<T, Error>, fallback: &str) -> Result<(), Error> {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.notice = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e, fallback)),
        }
    }

    /// Record the notice for `err` and hand it back to the caller.
    pub(crate) fn fail(&mut self, err: Error, fallback: &str) -> Error {
        self.loading = false;
        let notice = err.notice_or(fallback);
        tracing::debug!(error = %err, notice = %notice.message(), "screen action failed");
        self.notice = Some(notice);
        err
    }
}

/// Per-status tallies shown beside an appointment history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub en_attente: usize,
    pub confirme: usize,
    pub annule: usize,
    pub termine: usize,
    pub absence: usize,
}

impl StatusCounts {
    pub fn of(list: &[RendezVous]) -> Self {
        list.iter().fold(Self::default(), |mut counts, rdv| {
            counts.total += 1;
            match rdv.statut {
                StatutRdv::EnAttente => counts.en_attente += 1,
                StatutRdv::Confirme => counts.confirme += 1,
                StatutRdv::Annule => counts.annule += 1,
                StatutRdv::Termine => counts.termine += 1,
                StatutRdv::Absence => counts.absence += 1,
            }
            counts
        })
    }
}

pub(crate) fn actor_role(user: Option<&User>) -> Option<Role> {
    user.and_then(|u| u.role)
}

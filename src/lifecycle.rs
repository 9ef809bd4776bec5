//! Appointment lifecycle and cancellation workflow.
//!
//! The client only decides which transitions a role may *request*; the
//! backend commits them. Every (state, role, action) precondition lives here
//! so screens never carry their own boolean gates.
//!
//! ```text
//! en_attente ──confirm──▶ confirme ──complete──▶ termine
//!     │                      ├──mark absent──▶ absence
//!     └──────(accepted cancellation)──────▶ annule
//! ```

use crate::models::{Annulation, Role, StatutAnnulation, StatutRdv};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("{action} is not available to role {role:?}")]
    RoleNotAllowed {
        action: &'static str,
        role: Option<Role>,
    },
    #[error("{action} is not possible from status {from}")]
    InvalidState {
        action: &'static str,
        from: &'static str,
    },
}

// ═══════════════════════════════════════════════════════════
// Appointment state graph
// ═══════════════════════════════════════════════════════════

impl StatutRdv {
    /// Statuses reachable in one step.
    pub fn valid_transitions(&self) -> &'static [StatutRdv] {
        match self {
            StatutRdv::EnAttente => &[StatutRdv::Confirme, StatutRdv::Annule],
            StatutRdv::Confirme => &[StatutRdv::Annule, StatutRdv::Termine, StatutRdv::Absence],
            StatutRdv::Annule | StatutRdv::Termine | StatutRdv::Absence => &[],
        }
    }

    pub fn can_transition_to(&self, next: StatutRdv) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdvAction {
    Confirm,
    /// Creates a pending cancellation request; the status does not move.
    RequestCancellation,
    Complete,
    MarkAbsent,
}

impl RdvAction {
    pub const ALL: &'static [RdvAction] = &[
        RdvAction::Confirm,
        RdvAction::RequestCancellation,
        RdvAction::Complete,
        RdvAction::MarkAbsent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RdvAction::Confirm => "confirm",
            RdvAction::RequestCancellation => "request_cancellation",
            RdvAction::Complete => "complete",
            RdvAction::MarkAbsent => "mark_absent",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            RdvAction::Confirm => "Confirmer le rendez-vous",
            RdvAction::RequestCancellation => "Demander l'annulation",
            RdvAction::Complete => "Marquer comme terminé",
            RdvAction::MarkAbsent => "Marquer comme absent",
        }
    }

    /// Confirmation prompt shown before the action is sent.
    pub fn prompt(&self) -> &'static str {
        match self {
            RdvAction::Confirm => "Confirmer ce rendez-vous ?",
            RdvAction::RequestCancellation => "Envoyer la demande d'annulation ?",
            RdvAction::Complete => "Marquer ce rendez-vous comme terminé ?",
            RdvAction::MarkAbsent => "Marquer le patient comme absent ?",
        }
    }

    fn roles(&self) -> &'static [Role] {
        match self {
            RdvAction::RequestCancellation => &[Role::Patient],
            RdvAction::Confirm | RdvAction::Complete | RdvAction::MarkAbsent => {
                &[Role::Admin, Role::Praticien]
            }
        }
    }

    fn from_statuses(&self) -> &'static [StatutRdv] {
        match self {
            RdvAction::Confirm => &[StatutRdv::EnAttente],
            RdvAction::RequestCancellation => &[StatutRdv::EnAttente, StatutRdv::Confirme],
            RdvAction::Complete | RdvAction::MarkAbsent => &[StatutRdv::Confirme],
        }
    }
}

/// Status the backend is asked to reach, or why the request is refused.
pub fn apply_transition(
    current: StatutRdv,
    action: RdvAction,
    role: Option<Role>,
) -> Result<StatutRdv, Rejected> {
    if !role.is_some_and(|r| action.roles().contains(&r)) {
        return Err(Rejected::RoleNotAllowed {
            action: action.as_str(),
            role,
        });
    }
    if !action.from_statuses().contains(&current) {
        return Err(Rejected::InvalidState {
            action: action.as_str(),
            from: current.as_str(),
        });
    }
    let next = match action {
        RdvAction::Confirm => StatutRdv::Confirme,
        RdvAction::RequestCancellation => current,
        RdvAction::Complete => StatutRdv::Termine,
        RdvAction::MarkAbsent => StatutRdv::Absence,
    };
    debug_assert!(next == current || current.can_transition_to(next));
    Ok(next)
}

/// Actions the interface may expose for this appointment and role.
pub fn available_actions(current: StatutRdv, role: Option<Role>) -> Vec<RdvAction> {
    RdvAction::ALL
        .iter()
        .copied()
        .filter(|a| apply_transition(current, *a, role).is_ok())
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Cancellation requests
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnulationDecision {
    Accept,
    Refuse,
}

impl AnnulationDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnulationDecision::Accept => "accepter",
            AnnulationDecision::Refuse => "refuser",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            AnnulationDecision::Accept => "Accepter cette demande d'annulation ?",
            AnnulationDecision::Refuse => "Refuser cette demande d'annulation ?",
        }
    }
}

/// Status the request moves to. Accepting does not touch the appointment
/// here; the backend cascades it to `annule` and the client refetches.
pub fn resolve_cancellation(
    current: StatutAnnulation,
    decision: AnnulationDecision,
    role: Option<Role>,
) -> Result<StatutAnnulation, Rejected> {
    if !matches!(role, Some(Role::Admin | Role::Praticien)) {
        return Err(Rejected::RoleNotAllowed {
            action: decision.as_str(),
            role,
        });
    }
    if current != StatutAnnulation::EnAttente {
        return Err(Rejected::InvalidState {
            action: decision.as_str(),
            from: current.as_str(),
        });
    }
    Ok(match decision {
        AnnulationDecision::Accept => StatutAnnulation::Acceptee,
        AnnulationDecision::Refuse => StatutAnnulation::Refusee,
    })
}

/// Whether accept/refuse buttons are shown for this request.
pub fn can_resolve(annulation: &Annulation, role: Option<Role>) -> bool {
    resolve_cancellation(annulation.statut, AnnulationDecision::Accept, role).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    const ROLES: [Option<Role>; 4] = [
        None,
        Some(Role::Admin),
        Some(Role::Praticien),
        Some(Role::Patient),
    ];

    #[test]
    fn state_graph() {
        assert!(StatutRdv::EnAttente.can_transition_to(StatutRdv::Confirme));
        assert!(StatutRdv::EnAttente.can_transition_to(StatutRdv::Annule));
        assert!(!StatutRdv::EnAttente.can_transition_to(StatutRdv::Termine));
        assert!(StatutRdv::Confirme.can_transition_to(StatutRdv::Absence));
        for terminal in [StatutRdv::Annule, StatutRdv::Termine, StatutRdv::Absence] {
            assert!(terminal.is_terminal());
            assert!(StatutRdv::ALL.iter().all(|s| !terminal.can_transition_to(*s)));
        }
    }

    #[test]
    fn every_state_role_action_triple() {
        let staff = |r: Option<Role>| matches!(r, Some(Role::Admin | Role::Praticien));
        for &statut in StatutRdv::ALL {
            for role in ROLES {
                for &action in RdvAction::ALL {
                    let expected = match action {
                        RdvAction::Confirm => (staff(role) && statut == StatutRdv::EnAttente)
                            .then_some(StatutRdv::Confirme),
                        RdvAction::RequestCancellation => (role == Some(Role::Patient)
                            && matches!(statut, StatutRdv::EnAttente | StatutRdv::Confirme))
                        .then_some(statut),
                        RdvAction::Complete => (staff(role) && statut == StatutRdv::Confirme)
                            .then_some(StatutRdv::Termine),
                        RdvAction::MarkAbsent => (staff(role) && statut == StatutRdv::Confirme)
                            .then_some(StatutRdv::Absence),
                    };
                    assert_eq!(
                        apply_transition(statut, action, role).ok(),
                        expected,
                        "{statut} {role:?} {action:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn confirm_exposed_iff_staff_and_pending() {
        for &statut in StatutRdv::ALL {
            for role in ROLES {
                let exposed = available_actions(statut, role).contains(&RdvAction::Confirm);
                let expected = matches!(role, Some(Role::Admin | Role::Praticien))
                    && statut == StatutRdv::EnAttente;
                assert_eq!(exposed, expected, "{statut} {role:?}");
            }
        }
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(
            apply_transition(StatutRdv::EnAttente, RdvAction::Confirm, Some(Role::Patient)),
            Err(Rejected::RoleNotAllowed {
                action: "confirm",
                role: Some(Role::Patient)
            })
        );
        assert_eq!(
            apply_transition(StatutRdv::Termine, RdvAction::Confirm, Some(Role::Admin)),
            Err(Rejected::InvalidState {
                action: "confirm",
                from: "termine"
            })
        );
    }

    #[test]
    fn patient_actions() {
        assert_eq!(
            available_actions(StatutRdv::Confirme, Some(Role::Patient)),
            vec![RdvAction::RequestCancellation]
        );
        assert!(available_actions(StatutRdv::Annule, Some(Role::Patient)).is_empty());
    }

    #[test]
    fn resolution_rules() {
        use AnnulationDecision::*;
        let staff = Some(Role::Praticien);
        assert_eq!(
            resolve_cancellation(StatutAnnulation::EnAttente, Accept, staff),
            Ok(StatutAnnulation::Acceptee)
        );
        assert_eq!(
            resolve_cancellation(StatutAnnulation::EnAttente, Refuse, Some(Role::Admin)),
            Ok(StatutAnnulation::Refusee)
        );
        assert!(matches!(
            resolve_cancellation(StatutAnnulation::Acceptee, Refuse, staff),
            Err(Rejected::InvalidState { .. })
        ));
        assert!(matches!(
            resolve_cancellation(StatutAnnulation::EnAttente, Accept, Some(Role::Patient)),
            Err(Rejected::RoleNotAllowed { .. })
        ));
        assert!(resolve_cancellation(StatutAnnulation::EnAttente, Accept, None).is_err());
    }

    #[test]
    fn resolve_buttons_gate() {
        let pending = fixtures::annulation(1, 5, StatutAnnulation::EnAttente);
        let refused = fixtures::annulation(2, 5, StatutAnnulation::Refusee);
        assert!(can_resolve(&pending, Some(Role::Admin)));
        assert!(!can_resolve(&pending, Some(Role::Patient)));
        assert!(!can_resolve(&refused, Some(Role::Praticien)));
    }
}

//! Shared test helpers: record fixtures and an in-process mock backend.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;

use crate::config::ClientConfig;

pub mod fixtures {
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    use crate::models::*;

    pub fn user(id: Id, role: Role) -> User {
        let value = match role {
            Role::Admin => json!({
                "id": id, "username": "admin", "email": "admin@rdv.local",
                "first_name": "Alice", "last_name": "Martin", "role": "admin"
            }),
            Role::Praticien => json!({
                "id": id, "username": "jdupont", "email": "jd@rdv.local",
                "first_name": "Jean", "last_name": "Dupont", "role": "praticien",
                "praticien_profile": {"id": 3, "specialite": "Cardiologie"}
            }),
            Role::Patient => json!({
                "id": id, "username": "mcurie", "email": "mc@rdv.local",
                "first_name": "Marie", "last_name": "Curie", "role": "patient",
                "patient_profile": {"id": 11}
            }),
        };
        serde_json::from_value(value).unwrap()
    }

    pub fn praticien(id: Id, first: &str, last: &str, specialite: &str) -> Praticien {
        serde_json::from_value(json!({
            "id": id,
            "user": {
                "id": 100 + id, "username": last.to_lowercase(), "email": "",
                "first_name": first, "last_name": last, "role": "praticien"
            },
            "civilite": "Dr",
            "specialite": specialite,
            "numero_rpps": "10003456789",
            "telephone": "0145678900",
            "actif": true
        }))
        .unwrap()
    }

    pub fn patient(id: Id, first: &str, last: &str) -> Patient {
        serde_json::from_value(json!({
            "id": id,
            "user": {
                "id": 200 + id, "username": last.to_lowercase(), "email": "",
                "first_name": first, "last_name": last, "role": "patient"
            },
            "civilite": "Mme",
            "telephone": "0612345678",
            "adresse": "1 rue Pierre et Marie Curie, Paris",
            "date_naissance": "1990-06-15",
            "age": 36
        }))
        .unwrap()
    }

    pub fn rdv(id: Id, statut: StatutRdv, date_heure: DateTime<Utc>) -> RendezVous {
        RendezVous {
            id,
            patient: patient(11, "Marie", "Curie"),
            praticien: praticien(3, "Jean", "Dupont", "Cardiologie"),
            date_heure,
            motif: "Consultation de contrôle".into(),
            statut,
            notes: String::new(),
            date_creation: Some(date_heure - Duration::days(10)),
            date_modification: None,
            statut_display: Some(statut.label().into()),
            is_passe: None,
        }
    }

    pub fn annulation(id: Id, rdv_id: Id, statut: StatutAnnulation) -> Annulation {
        let now = Utc::now();
        Annulation {
            id,
            rdv: rdv(rdv_id, StatutRdv::Confirme, now + Duration::days(2)),
            motif: "Empêchement professionnel".into(),
            statut,
            date_demande: now - Duration::hours(1),
            date_traitement: None,
            statut_display: Some(statut.label().into()),
        }
    }

    pub fn rappel(id: Id, type_rappel: TypeRappel, prevue: DateTime<Utc>) -> Rappel {
        Rappel {
            id,
            rdv: Some(rdv(40 + id, StatutRdv::Confirme, prevue + Duration::days(1))),
            type_rappel,
            envoye: false,
            date_envoi_prevue: prevue,
            date_envoi_effectif: None,
            type_rappel_display: Some(type_rappel.label().into()),
        }
    }

    pub fn log(id: Id, action: &str, details: &str) -> LogEntry {
        LogEntry {
            id,
            date: Utc::now(),
            user: None,
            user_display: "Alice Martin".into(),
            action: action.into(),
            details: details.into(),
            table_cible: "RendezVous".into(),
            cible_id: None,
            ip_address: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Mock backend
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to `/api`, e.g. `/rendez-vous/5/`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Canned = HashMap<(Method, String), VecDeque<(StatusCode, Value)>>;

#[derive(Default)]
struct Backend {
    canned: Mutex<Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Real HTTP server on `127.0.0.1:0` answering with canned JSON.
///
/// Responses queued for the same route are served in order; the last one
/// repeats. Unregistered routes answer 404.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<Backend>,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Backend::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            addr,
            state,
            server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_base_url(&self.base_url())
            .unwrap()
            .without_persistence()
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.state
            .canned
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back((StatusCode::from_u16(status).unwrap(), body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = {
        let mut canned = state.canned.lock().unwrap();
        canned.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };
    match reply {
        Some((status, Value::Null)) => status.into_response(),
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Pas trouvé."})),
        )
            .into_response(),
    }
}

// ═══════════════════════════════════════════════════════════
// Client and dialog doubles
// ═══════════════════════════════════════════════════════════

/// Client signed in as a fixture user of `role`, starting on `start`.
pub fn signed_in(
    backend: &MockBackend,
    role: crate::models::Role,
    start: crate::navigation::Route,
) -> (
    crate::api::ApiClient,
    Arc<crate::session::SessionState>,
    Arc<crate::navigation::History>,
) {
    let session = Arc::new(crate::session::SessionState::in_memory());
    session.establish(crate::session::AuthToken::new("tok"), fixtures::user(1, role));
    let history = Arc::new(crate::navigation::History::new(start));
    let client =
        crate::api::ApiClient::new(&backend.config(), session.clone(), history.clone()).unwrap();
    (client, session, history)
}

/// Answers every prompt the same way and remembers what was asked.
pub struct ScriptedDialogs {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl crate::views::Dialogs for ScriptedDialogs {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

//! In-process fake Entity Store for client integration tests.
//!
//! Holds entities in memory behind a mutex, counts every request it
//! receives, and serves the subset of the REST surface the client uses.
//! The schedule of an edict is stored and returned in reverse display
//! order so the client's sorting is exercised.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, RawQuery, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tower_http::trace::TraceLayer;

use tcc_client::{ApiClient, ClientConfig};
use tcc_core::auth::TokenAuthContext;
use tcc_core::board::Board;
use tcc_core::models::course::{Course, Organ};
use tcc_core::models::edict::Edict;
use tcc_core::models::user::{Info, Sex, TeacherProfile};
use tcc_core::models::work::{Version, Work};
use tcc_core::roles::Role;
use tcc_core::schedule::{PhaseName, SchedulePhase};
use tcc_core::work_status::{state_machine, WorkStatus};

/* --------------------------------------------------------------------------
Store state
-------------------------------------------------------------------------- */

#[derive(Default)]
pub struct Data {
    pub works: HashMap<String, Work>,
    pub edicts: HashMap<String, Edict>,
    pub courses: HashMap<String, Course>,
    pub organs: HashMap<String, Organ>,
    pub users: Vec<Info>,
    pub uploads: Vec<String>,
    /// Raw query strings of password reset requests.
    pub reset_queries: Vec<String>,
    pub reset_emails: Vec<String>,
}

pub struct StoreState {
    pub data: Mutex<Data>,
    requests: AtomicUsize,
    last_authorization: Mutex<Option<String>>,
}

/// Handle to a running fake store.
#[derive(Clone)]
pub struct FakeStore {
    pub addr: SocketAddr,
    pub state: Arc<StoreState>,
}

impl FakeStore {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let state = Arc::new(StoreState {
            data: Mutex::new(seed()),
            requests: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
        });

        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.url())).unwrap()
    }

    /// Requests served so far.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    pub fn insert_work(&self, work: Work) -> String {
        let id = work.id.clone().unwrap_or_else(new_id);
        let mut data = self.state.data.lock().unwrap();
        data.works.insert(id.clone(), Work { id: Some(id.clone()), ..work });
        id
    }

    pub fn work(&self, id: &str) -> Option<Work> {
        self.state.data.lock().unwrap().works.get(id).cloned()
    }

    pub fn organ(&self, id: &str) -> Option<Organ> {
        self.state.data.lock().unwrap().organs.get(id).cloned()
    }

    pub fn user(&self, id: &str) -> Option<Info> {
        let data = self.state.data.lock().unwrap();
        data.users.iter().find(|u| u.id() == Some(id)).cloned()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/* --------------------------------------------------------------------------
Fixtures
-------------------------------------------------------------------------- */

pub const COURSE_ID: &str = "course-cs";
pub const EDICT_ID: &str = "edict-2026-2";
/// Seeded with [`ADVISOR`] as its only member.
pub const ORGAN_ID: &str = "organ-dcomp";

/// Profile id and account id of each seeded user.
pub const ADVISOR: (&str, &str) = ("t1", "acc-t1");
pub const EXAMINER_A: (&str, &str) = ("t2", "acc-t2");
pub const EXAMINER_B: (&str, &str) = ("t3", "acc-t3");
pub const EXTERNAL: (&str, &str) = ("x1", "acc-x1");
pub const COORDINATOR: (&str, &str) = ("t9", "acc-t9");
pub const STUDENT: (&str, &str) = ("s1", "acc-s1");

pub fn info(id: &str, auth_id: &str, role: Role) -> Info {
    Info {
        id: Some(id.to_string()),
        auth_id: auth_id.to_string(),
        name: format!("User {id}"),
        cpf: "000.000.000-00".into(),
        birth_date: Utc.with_ymd_and_hms(1985, 6, 15, 0, 0, 0).unwrap(),
        sex: Sex::NotToSay,
        role: Some(role),
        is_active: Some(true),
        student: None,
        teacher: (role == Role::Teacher).then(|| TeacherProfile {
            siape: format!("siape-{id}"),
            area: "Computing".into(),
        }),
        external: None,
    }
}

/// A fully dated schedule starting `days` from now.
pub fn complete_schedule(days: i64) -> Vec<SchedulePhase> {
    let base = Utc::now() + Duration::days(days);
    PhaseName::ORDER
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let start = base + Duration::days(30 * i as i64);
            SchedulePhase::dated(name, start, start + Duration::days(20))
        })
        .collect()
}

pub fn pending_work(coadvisor: Option<&str>) -> Work {
    Work {
        id: None,
        title: "Consistent hashing for edge caches".into(),
        r#abstract: "We study cache placement.".into(),
        keywords: "cache, hashing".into(),
        advisor: ADVISOR.0.into(),
        coadvisor: coadvisor.map(str::to_string),
        request_form: "https://files.test/request.pdf".into(),
        student: STUDENT.0.into(),
        edict_id: EDICT_ID.into(),
        ..Work::default()
    }
}

fn seed() -> Data {
    let mut data = Data {
        users: vec![
            info(ADVISOR.0, ADVISOR.1, Role::Teacher),
            info(EXAMINER_A.0, EXAMINER_A.1, Role::Teacher),
            info(EXAMINER_B.0, EXAMINER_B.1, Role::Teacher),
            info(EXTERNAL.0, EXTERNAL.1, Role::External),
            info(COORDINATOR.0, COORDINATOR.1, Role::Teacher),
            info(STUDENT.0, STUDENT.1, Role::Student),
        ],
        ..Data::default()
    };
    data.courses.insert(
        COURSE_ID.into(),
        Course {
            id: Some(COURSE_ID.into()),
            name: "Computer Science".into(),
            acronym: "CS".into(),
            coordinator: COORDINATOR.0.into(),
            tcc_coordinator: COORDINATOR.0.into(),
            organs: Vec::new(),
            edicts: Vec::new(),
        },
    );
    data.organs.insert(
        ORGAN_ID.into(),
        Organ {
            id: Some(ORGAN_ID.into()),
            name: "Computing Department".into(),
            acronym: "DCOMP".into(),
            description: String::new(),
            teachers: vec![ADVISOR.0.into()],
            course_id: COURSE_ID.into(),
        },
    );
    let now = Utc::now();
    data.edicts.insert(
        EDICT_ID.into(),
        Edict {
            id: Some(EDICT_ID.into()),
            name: "2026.2".into(),
            description: String::new(),
            start_date: now,
            end_date: now + Duration::days(180),
            course_id: COURSE_ID.into(),
            schedule: stored_order(complete_schedule(1)),
            works: Vec::new(),
        },
    );
    data
}

/// Storage order differs from display order.
fn stored_order(mut schedule: Vec<SchedulePhase>) -> Vec<SchedulePhase> {
    schedule.reverse();
    schedule
}

/// Bearer token for `account_id`, signed with a key the client never sees.
pub fn token_for(account_id: &str, role: Role) -> String {
    encode(
        &Header::default(),
        &json!({
            "nameid": account_id,
            "role": role.as_str(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        }),
        &EncodingKey::from_secret(b"fake-store-signing-key"),
    )
    .unwrap()
}

pub fn auth_for(account_id: &str, role: Role) -> TokenAuthContext {
    TokenAuthContext::from_token(token_for(account_id, role)).unwrap()
}

/* --------------------------------------------------------------------------
Router
-------------------------------------------------------------------------- */

type Shared = Arc<StoreState>;

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/authentication/login", post(login))
        .route("/api/authentication/forgot-password", get(forgot_password))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/auth/{auth_id}", get(user_by_auth_id))
        .route("/api/users/{id}/activate", patch(activate_user))
        .route("/api/users/{id}/deactivate", patch(deactivate_user))
        .route("/api/course/{id}", get(get_course))
        .route("/api/organ/{id}", get(get_organ))
        .route(
            "/api/organ/{id}/member/{teacher_id}",
            post(add_organ_member).delete(remove_organ_member),
        )
        .route("/api/course/{course_id}/edict", post(create_edict))
        .route("/api/edict/{id}", get(get_edict).put(update_edict))
        .route("/api/work", get(list_works).post(create_work))
        .route("/api/work/{id}", get(get_work).put(update_work).delete(delete_work))
        .route("/api/work/{id}/status/{code}", put(change_status))
        .route("/api/work/{id}/version", post(add_version))
        .route("/api/work/{id}/board", post(add_board))
        .route("/api/work/{id}/report", get(report))
        .route("/api/board/{work_id}", put(update_board))
        .route("/api/files", post(upload))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn count_requests(State(state): State<Shared>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let auth = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_authorization.lock().unwrap() = auth;
    next.run(request).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn login(Json(body): Json<serde_json::Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"].as_str() == Some("secret") {
        Json(json!({ "token": token_for(email, Role::Admin) })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

async fn forgot_password(
    State(state): State<Shared>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    let mut data = state.data.lock().unwrap();
    data.reset_queries.push(raw.unwrap_or_default());
    match params.get("email") {
        Some(email) => {
            data.reset_emails.push(email.clone());
            StatusCode::NO_CONTENT
        }
        None => StatusCode::BAD_REQUEST,
    }
}

async fn list_users(State(state): State<Shared>) -> Json<Vec<Info>> {
    Json(state.data.lock().unwrap().users.clone())
}

async fn create_user(State(state): State<Shared>, Json(mut info): Json<Info>) -> Json<Info> {
    info.id = Some(new_id());
    state.data.lock().unwrap().users.push(info.clone());
    Json(info)
}

async fn user_by_auth_id(State(state): State<Shared>, Path(auth_id): Path<String>) -> Response {
    let data = state.data.lock().unwrap();
    match data.users.iter().find(|u| u.auth_id == auth_id) {
        Some(info) => Json(info.clone()).into_response(),
        None => not_found(),
    }
}

async fn activate_user(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    set_active(&state, &id, true)
}

async fn deactivate_user(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    set_active(&state, &id, false)
}

fn set_active(state: &StoreState, id: &str, active: bool) -> StatusCode {
    let mut data = state.data.lock().unwrap();
    match data.users.iter_mut().find(|u| u.id() == Some(id)) {
        Some(info) => {
            info.is_active = Some(active);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn get_organ(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.data.lock().unwrap().organs.get(&id) {
        Some(organ) => Json(organ.clone()).into_response(),
        None => not_found(),
    }
}

async fn add_organ_member(
    State(state): State<Shared>,
    Path((id, teacher_id)): Path<(String, String)>,
) -> StatusCode {
    let mut data = state.data.lock().unwrap();
    let Some(organ) = data.organs.get_mut(&id) else {
        return StatusCode::NOT_FOUND;
    };
    if organ.has_member(&teacher_id) {
        return StatusCode::CONFLICT;
    }
    organ.teachers.push(teacher_id);
    StatusCode::NO_CONTENT
}

async fn remove_organ_member(
    State(state): State<Shared>,
    Path((id, teacher_id)): Path<(String, String)>,
) -> StatusCode {
    let mut data = state.data.lock().unwrap();
    let Some(organ) = data.organs.get_mut(&id) else {
        return StatusCode::NOT_FOUND;
    };
    let before = organ.teachers.len();
    organ.teachers.retain(|t| *t != teacher_id);
    if organ.teachers.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn get_course(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.data.lock().unwrap().courses.get(&id) {
        Some(course) => Json(course.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_edict(
    State(state): State<Shared>,
    Path(course_id): Path<String>,
    Json(mut edict): Json<Edict>,
) -> Json<Edict> {
    let id = new_id();
    edict.id = Some(id.clone());
    edict.course_id = course_id;
    edict.schedule = stored_order(edict.schedule);
    state.data.lock().unwrap().edicts.insert(id, edict.clone());
    Json(edict)
}

async fn get_edict(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.data.lock().unwrap().edicts.get(&id) {
        Some(edict) => Json(edict.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_edict(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut edict): Json<Edict>,
) -> Response {
    let mut data = state.data.lock().unwrap();
    if !data.edicts.contains_key(&id) {
        return not_found();
    }
    edict.id = Some(id.clone());
    edict.schedule = stored_order(edict.schedule);
    data.edicts.insert(id, edict.clone());
    Json(edict).into_response()
}

async fn list_works(State(state): State<Shared>) -> Json<Vec<Work>> {
    Json(state.data.lock().unwrap().works.values().cloned().collect())
}

async fn create_work(State(state): State<Shared>, Json(mut work): Json<Work>) -> Json<Work> {
    let id = new_id();
    work.id = Some(id.clone());
    state.data.lock().unwrap().works.insert(id, work.clone());
    Json(work)
}

async fn get_work(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.data.lock().unwrap().works.get(&id) {
        Some(work) => Json(work.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_work(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut work): Json<Work>,
) -> Response {
    let mut data = state.data.lock().unwrap();
    if !data.works.contains_key(&id) {
        return not_found();
    }
    work.id = Some(id.clone());
    data.works.insert(id, work.clone());
    Json(work).into_response()
}

async fn delete_work(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    match state.data.lock().unwrap().works.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// The store re-checks the transition table on its side.
async fn change_status(State(state): State<Shared>, Path((id, code)): Path<(String, i16)>) -> Response {
    let Ok(to) = WorkStatus::try_from(code) else {
        return (StatusCode::BAD_REQUEST, "unknown status").into_response();
    };
    let mut data = state.data.lock().unwrap();
    let Some(work) = data.works.get_mut(&id) else {
        return not_found();
    };
    match state_machine::validate_transition(work.status, to) {
        Ok(()) => {
            work.status = to;
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn add_version(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut version): Json<Version>,
) -> Response {
    let mut data = state.data.lock().unwrap();
    let Some(work) = data.works.get_mut(&id) else {
        return not_found();
    };
    version.id = Some(new_id());
    work.versions.push(version.clone());
    Json(version).into_response()
}

async fn add_board(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut board): Json<Board>,
) -> Response {
    let mut data = state.data.lock().unwrap();
    let Some(work) = data.works.get_mut(&id) else {
        return not_found();
    };
    if work.board.is_some() {
        return (StatusCode::CONFLICT, "board exists").into_response();
    }
    board.id = Some(new_id());
    board.work_id = Some(id);
    work.board = Some(board.clone());
    Json(board).into_response()
}

async fn update_board(
    State(state): State<Shared>,
    Path(work_id): Path<String>,
    Json(board): Json<Board>,
) -> Response {
    let mut data = state.data.lock().unwrap();
    let Some(work) = data.works.get_mut(&work_id) else {
        return not_found();
    };
    work.board = Some(board.clone());
    Json(board).into_response()
}

async fn report(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.data.lock().unwrap().works.get(&id) {
        Some(work) => format!("REPORT {}", work.title).into_response(),
        None => not_found(),
    }
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("inputFile") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let Ok(bytes) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        let uri = format!("https://files.test/{}/{name}", new_id());
        state.data.lock().unwrap().uploads.push(uri.clone());
        return Json(json!({
            "content": null,
            "contentType": content_type,
            "name": name,
            "size": bytes.len(),
            "uri": uri,
        }))
        .into_response();
    }
    (StatusCode::BAD_REQUEST, "missing inputFile").into_response()
}

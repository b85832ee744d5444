//! JSON API over in-memory tournaments.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Engine tunables: SCHEDULER_ATTEMPTS, GROUP_OVERFLOW_MARGIN, DEFAULT_COURT_CAPACITY.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tennis_tournament_web::{
    assign_playoff_time, clear_group_result, clear_playoff_result, edit_group_result,
    edit_playoff_result, entrants_from_csv, generate_bracket, reassign_match_slot,
    record_group_result, record_playoff_result, reset_group_stage, start_group_stage,
    time_slots_from_csv, BracketSlotId, EngineConfig, Entrant, GroupId, GroupSizeConfig, MatchId,
    MatchOutcome, ServerConfig, TimeSlot, TimeSlotId, Tournament, TournamentError, TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "Tournament".to_string()
}

#[derive(Deserialize)]
struct FormGroupsBody {
    /// Group sizes per category, e.g. `{"B": {"3": 2}}`.
    categories: BTreeMap<String, GroupSizeConfig>,
}

#[derive(Deserialize)]
struct MatchSlotBody {
    slot: Option<TimeSlotId>,
}

#[derive(Deserialize)]
struct PlayoffTimeBody {
    slot: TimeSlotId,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct GroupPath {
    id: TournamentId,
    group_id: GroupId,
}

#[derive(Deserialize)]
struct CategoryPath {
    id: TournamentId,
    category: String,
}

#[derive(Deserialize)]
struct BracketSlotPath {
    id: TournamentId,
    slot_id: BracketSlotId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

/// Run `f` as one transaction on tournament `id`: on success the change is
/// kept and the tournament returned, on error nothing changes.
fn mutate<T>(
    state: &AppState,
    id: TournamentId,
    f: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.transaction(f) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => {
            log::warn!("Tournament {}: {}", id, e);
            bad_request(e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-tournament-web",
    })
}

/// Create a new tournament in Setup.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_else(default_name);
    let tournament = Tournament::new(name);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

/// Get a tournament by id. Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Replace the group-stage time slots (Setup only).
#[put("/api/tournaments/{id}/time-slots")]
async fn api_set_time_slots(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<Vec<TimeSlot>>,
) -> HttpResponse {
    let slots = body.into_inner();
    mutate(&state, path.id, |t| t.set_time_slots(slots))
}

/// Same as above from CSV text: `id,date,weekday,start,capacity`.
#[post("/api/tournaments/{id}/time-slots/csv")]
async fn api_import_time_slots(
    state: AppState,
    engine: Data<EngineConfig>,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let slots = match time_slots_from_csv(body.as_bytes(), engine.default_capacity) {
        Ok(slots) => slots,
        Err(e) => return bad_request(e),
    };
    mutate(&state, path.id, |t| t.set_time_slots(slots))
}

/// Replace the entrants (Setup only).
#[put("/api/tournaments/{id}/entrants")]
async fn api_set_entrants(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<Vec<Entrant>>,
) -> HttpResponse {
    let entrants = body
        .into_inner()
        .into_iter()
        .map(|e| Entrant::new(e.id, e.name, e.category, e.slots))
        .collect();
    mutate(&state, path.id, |t| t.set_entrants(entrants))
}

/// Same as above from CSV text: `id,name,category,slots` with `;` between slot ids.
#[post("/api/tournaments/{id}/entrants/csv")]
async fn api_import_entrants(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let entrants = match entrants_from_csv(body.as_bytes()) {
        Ok(entrants) => entrants,
        Err(e) => return bad_request(e),
    };
    mutate(&state, path.id, |t| t.set_entrants(entrants))
}

/// Add or replace a playoff slot (any state).
#[post("/api/tournaments/{id}/playoff-slots")]
async fn api_add_playoff_slot(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TimeSlot>,
) -> HttpResponse {
    let slot = body.into_inner();
    mutate(&state, path.id, |t| {
        t.add_playoff_slot(slot);
        Ok(())
    })
}

/// Form groups and schedule their matches (Setup -> GroupStage).
#[post("/api/tournaments/{id}/groups/form")]
async fn api_form_groups(
    state: AppState,
    engine: Data<EngineConfig>,
    path: Path<TournamentPath>,
    body: Json<FormGroupsBody>,
) -> HttpResponse {
    let configs = body.into_inner().categories;
    mutate(&state, path.id, |t| start_group_stage(t, &configs, &engine))
}

/// Drop groups and matches (GroupStage -> Setup), only before any bracket.
#[delete("/api/tournaments/{id}/groups")]
async fn api_reset_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, reset_group_stage)
}

/// Move a group match to another slot, or unschedule it with `null`.
#[put("/api/tournaments/{id}/matches/{match_id}/slot")]
async fn api_reassign_slot(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchSlotBody>,
) -> HttpResponse {
    let match_id = path.match_id;
    mutate(&state, path.id, |t| reassign_match_slot(t, match_id, body.slot))
}

#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchOutcome>,
) -> HttpResponse {
    let (match_id, outcome) = (path.match_id, body.into_inner());
    mutate(&state, path.id, |t| record_group_result(t, match_id, outcome))
}

#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_edit_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchOutcome>,
) -> HttpResponse {
    let (match_id, outcome) = (path.match_id, body.into_inner());
    mutate(&state, path.id, |t| edit_group_result(t, match_id, outcome))
}

#[delete("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_clear_result(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let match_id = path.match_id;
    mutate(&state, path.id, |t| clear_group_result(t, match_id))
}

/// Current table of one group.
#[get("/api/tournaments/{id}/groups/{group_id}/standings")]
async fn api_group_standings(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.tournament.standings.get(&path.group_id) {
        Some(table) => HttpResponse::Ok().json(table),
        None => bad_request(TournamentError::GroupNotFound(path.group_id)),
    }
}

/// Build the bracket of one category from its standings.
#[post("/api/tournaments/{id}/brackets/{category}")]
async fn api_generate_bracket(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    let category = path.category.clone();
    mutate(&state, path.id, |t| generate_bracket(t, &category))
}

/// Set (or move) the playoff time of a bracket slot.
#[put("/api/tournaments/{id}/brackets/slots/{slot_id}/time")]
async fn api_playoff_time(
    state: AppState,
    path: Path<BracketSlotPath>,
    body: Json<PlayoffTimeBody>,
) -> HttpResponse {
    let slot_id = path.slot_id;
    mutate(&state, path.id, |t| assign_playoff_time(t, slot_id, body.slot))
}

#[post("/api/tournaments/{id}/brackets/slots/{slot_id}/result")]
async fn api_record_playoff_result(
    state: AppState,
    path: Path<BracketSlotPath>,
    body: Json<MatchOutcome>,
) -> HttpResponse {
    let (slot_id, outcome) = (path.slot_id, body.into_inner());
    mutate(&state, path.id, |t| record_playoff_result(t, slot_id, outcome))
}

#[put("/api/tournaments/{id}/brackets/slots/{slot_id}/result")]
async fn api_edit_playoff_result(
    state: AppState,
    path: Path<BracketSlotPath>,
    body: Json<MatchOutcome>,
) -> HttpResponse {
    let (slot_id, outcome) = (path.slot_id, body.into_inner());
    mutate(&state, path.id, |t| edit_playoff_result(t, slot_id, outcome))
}

#[delete("/api/tournaments/{id}/brackets/slots/{slot_id}/result")]
async fn api_clear_playoff_result(state: AppState, path: Path<BracketSlotPath>) -> HttpResponse {
    let slot_id = path.slot_id;
    mutate(&state, path.id, |t| clear_playoff_result(t, slot_id))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let engine = EngineConfig::from_env();
    log::info!("Starting server at http://{}:{}", server.host, server.port);
    log::info!(
        "Engine: {} attempts, overflow margin {}, {} courts per slot by default",
        engine.attempts,
        engine.overflow_margin,
        engine.default_capacity
    );

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let engine = Data::new(engine);

    // Every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(engine.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_time_slots)
            .service(api_import_time_slots)
            .service(api_set_entrants)
            .service(api_import_entrants)
            .service(api_add_playoff_slot)
            .service(api_form_groups)
            .service(api_reset_groups)
            .service(api_reassign_slot)
            .service(api_record_result)
            .service(api_edit_result)
            .service(api_clear_result)
            .service(api_group_standings)
            .service(api_generate_bracket)
            .service(api_playoff_time)
            .service(api_record_playoff_result)
            .service(api_edit_playoff_result)
            .service(api_clear_playoff_result)
    })
    .bind(server.bind_addr())?
    .run()
    .await
}

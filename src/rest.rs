use std::sync::Arc;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::{Engine, EngineError};
use crate::model::Stay;
use crate::observability;

type SharedEngine = web::Data<Arc<Engine>>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Map the engine taxonomy onto HTTP statuses. Business outcomes stay
/// distinguishable: absent entities are 404, an occupied or inverted stay is
/// 409, oversized input is 400, and only infrastructure failure is 5xx.
fn error_response(e: &EngineError) -> HttpResponse {
    let body = ErrorBody { error: e.to_string() };
    match e {
        EngineError::RoomNotFound(_)
        | EngineError::UserNotFound(_)
        | EngineError::BookingNotFound(_)
        | EngineError::CodeNotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::RoomUnavailable(_) => HttpResponse::Conflict().json(body),
        EngineError::LimitExceeded(_) => HttpResponse::BadRequest().json(body),
        EngineError::StoreUnavailable(_) => HttpResponse::ServiceUnavailable().json(body),
    }
}

fn record(op: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(observability::REQUESTS_TOTAL, "op" => op, "status" => status)
        .increment(1);
    metrics::histogram!(observability::REQUEST_DURATION_SECONDS, "op" => op)
        .record(start.elapsed().as_secs_f64());
}

fn respond<T: Serialize>(
    op: &'static str,
    start: Instant,
    result: Result<T, EngineError>,
) -> HttpResponse {
    record(op, start, result.is_ok());
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            tracing::debug!("{op} failed: {e}");
            error_response(&e)
        }
    }
}

fn respond_created<T: Serialize>(
    op: &'static str,
    start: Instant,
    result: Result<T, EngineError>,
) -> HttpResponse {
    record(op, start, result.is_ok());
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(e) => {
            tracing::debug!("{op} failed: {e}");
            error_response(&e)
        }
    }
}

fn parse_id(raw: &str) -> Result<Ulid, HttpResponse> {
    Ulid::from_string(raw).map_err(|_| {
        HttpResponse::BadRequest().json(ErrorBody {
            error: format!("malformed id: {raw}"),
        })
    })
}

// ── Rooms ────────────────────────────────────────────────

#[derive(Deserialize)]
struct AddRoomRequest {
    room_type: String,
    price_per_night: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    photo_url: String,
}

async fn add_room(engine: SharedEngine, body: web::Json<AddRoomRequest>) -> HttpResponse {
    let start = Instant::now();
    let req = body.into_inner();
    let result = engine
        .add_room(req.room_type, req.price_per_night, req.description, req.photo_url)
        .await;
    respond_created("add_room", start, result)
}

async fn list_rooms(engine: SharedEngine) -> HttpResponse {
    let start = Instant::now();
    respond("list_rooms", start, engine.list_rooms().await)
}

async fn get_room(engine: SharedEngine, path: web::Path<String>) -> HttpResponse {
    let start = Instant::now();
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond("get_room", start, engine.get_room(id).await)
}

async fn room_types(engine: SharedEngine) -> HttpResponse {
    let start = Instant::now();
    respond("room_types", start, engine.room_types().await)
}

#[derive(Deserialize)]
struct AvailabilityQuery {
    check_in: NaiveDate,
    check_out: NaiveDate,
    #[serde(default)]
    room_type: String,
}

async fn find_available(
    engine: SharedEngine,
    query: web::Query<AvailabilityQuery>,
) -> HttpResponse {
    let start = Instant::now();
    let result = engine
        .find_available(query.check_in, query.check_out, &query.room_type)
        .await;
    respond("find_available", start, result)
}

async fn find_all_available(engine: SharedEngine) -> HttpResponse {
    let start = Instant::now();
    respond("find_all_available", start, engine.find_all_available().await)
}

// ── Users ────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterUserRequest {
    name: String,
    email: String,
    #[serde(default)]
    phone: String,
}

async fn register_user(
    engine: SharedEngine,
    body: web::Json<RegisterUserRequest>,
) -> HttpResponse {
    let start = Instant::now();
    let req = body.into_inner();
    let result = engine.register_user(req.name, req.email, req.phone).await;
    respond_created("register_user", start, result)
}

async fn user_bookings(engine: SharedEngine, path: web::Path<String>) -> HttpResponse {
    let start = Instant::now();
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond("user_bookings", start, engine.bookings_for_user(id).await)
}

// ── Bookings ─────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateBookingRequest {
    room_id: Ulid,
    user_id: Ulid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    #[serde(default = "one")]
    adults: u32,
    #[serde(default)]
    children: u32,
}

fn one() -> u32 {
    1
}

async fn create_booking(
    engine: SharedEngine,
    body: web::Json<CreateBookingRequest>,
) -> HttpResponse {
    let start = Instant::now();
    let req = body.into_inner();
    // Struct literal on purpose: an inverted range must reach the engine's
    // validation, which rejects it as a business outcome.
    let stay = Stay {
        check_in: req.check_in,
        check_out: req.check_out,
    };
    let result = engine
        .create_booking(req.room_id, req.user_id, stay, req.adults, req.children)
        .await;
    respond_created("create_booking", start, result)
}

async fn list_bookings(engine: SharedEngine) -> HttpResponse {
    let start = Instant::now();
    respond("list_bookings", start, engine.list_bookings().await)
}

async fn get_booking(engine: SharedEngine, path: web::Path<String>) -> HttpResponse {
    let start = Instant::now();
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond("get_booking", start, engine.get_booking(id).await)
}

async fn by_confirmation_code(engine: SharedEngine, path: web::Path<String>) -> HttpResponse {
    let start = Instant::now();
    let result = engine.find_by_confirmation_code(&path).await;
    respond("find_by_confirmation_code", start, result)
}

async fn cancel_booking(engine: SharedEngine, path: web::Path<String>) -> HttpResponse {
    let start = Instant::now();
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let result = engine
        .cancel_booking(id)
        .await
        .map(|room_id| serde_json::json!({ "cancelled": id, "room_id": room_id }));
    respond("cancel_booking", start, result)
}

// ── Routes ───────────────────────────────────────────────

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .route("", web::post().to(add_room))
            .route("", web::get().to(list_rooms))
            .route("/types", web::get().to(room_types))
            .route("/available", web::get().to(find_available))
            .route("/available/all", web::get().to(find_all_available))
            .route("/{id}", web::get().to(get_room)),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(register_user))
            .route("/{id}/bookings", web::get().to(user_bookings)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/confirmation/{code}", web::get().to(by_confirmation_code))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}", web::delete().to(cancel_booking)),
    );
}

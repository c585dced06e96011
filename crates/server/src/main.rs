// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use marquee_api::{
    AddMovieRequest, AddScreenRequest, ApiError, AvailabilityResponse, BookTicketRequest,
    BookTicketResponse, BookingSummary, BoxOffice, BoxOfficeConfig, CancelTicketRequest,
    CancelTicketResponse, DEFAULT_DATA_DIR, DepositRequest, DiscrepancyResponse, MovieResponse,
    ScreenResponse, SeatHolderResponse, SeatMapResponse, SetScreenStatusRequest, WalletResponse,
    WalletTransactionResponse,
};
use marquee_domain::Money;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Marquee Server - HTTP server for the Marquee box office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the screens, movies, bookings and wallet files.
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Balance credited to a wallet the first time it is used
    #[arg(long, default_value = "1000")]
    starting_balance: Money,

    /// Ignore the seat snapshot and rebuild seats from the booking log
    #[arg(long)]
    no_snapshot: bool,
}

/// Application state shared across handlers.
///
/// Every request holds the lock for its whole operation, so bookings and
/// cancellations never interleave.
#[derive(Clone)]
struct AppState {
    /// The box office over the data directory.
    box_office: Arc<Mutex<BoxOffice>>,
}

/// API request for cancelling a booking. The booking id is in the path.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelBookingApiRequest {
    /// The customer cancelling.
    user_id: String,
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    /// The customer.
    user_id: String,
    /// Only bookings that still hold seats.
    #[serde(default)]
    active: bool,
}

/// API request for adding a showtime to a screen.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddShowtimeApiRequest {
    /// The showtime, `HH:MM`.
    showtime: String,
}

/// API request for changing a screen's status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ScreenStatusApiRequest {
    /// `Active`, `Maintenance` or `Inactive`.
    status: String,
}

/// API request for changing a movie's price.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct MoviePriceApiRequest {
    /// The new per-seat price.
    price: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::PaymentRequired { .. } => StatusCode::PAYMENT_REQUIRED,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for GET `/movies`.
async fn handle_list_movies(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<MovieResponse>> {
    let office = app_state.box_office.lock().await;
    Json(office.movies())
}

/// Handler for GET `/screens`.
async fn handle_list_screens(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<ScreenResponse>> {
    let office = app_state.box_office.lock().await;
    Json(office.screens())
}

/// Handler for GET `/screens/{screen_id}/showtimes/{showtime}/seats`.
async fn handle_get_seat_map(
    AxumState(app_state): AxumState<AppState>,
    Path((screen_id, showtime)): Path<(String, String)>,
) -> Result<Json<SeatMapResponse>, HttpError> {
    let office = app_state.box_office.lock().await;
    Ok(Json(office.seat_map_view(&screen_id, &showtime)?))
}

/// Handler for GET `/screens/{screen_id}/showtimes/{showtime}/holders`.
async fn handle_get_seat_holders(
    AxumState(app_state): AxumState<AppState>,
    Path((screen_id, showtime)): Path<(String, String)>,
) -> Result<Json<Vec<SeatHolderResponse>>, HttpError> {
    let office = app_state.box_office.lock().await;
    Ok(Json(office.booked_seat_details(&screen_id, &showtime)?))
}

/// Handler for GET `/availability`.
async fn handle_get_availability(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<AvailabilityResponse>> {
    let office = app_state.box_office.lock().await;
    Json(office.available_seat_counts())
}

/// Handler for POST `/bookings`.
async fn handle_book_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BookTicketRequest>,
) -> Result<Json<BookTicketResponse>, HttpError> {
    info!(
        user_id = %req.user_id,
        movie_id = req.movie_id,
        showtime = %req.showtime,
        seats = req.seats.len(),
        "Handling book_ticket request"
    );
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.book_ticket(&req)?))
}

/// Handler for POST `/bookings/{booking_id}/cancel`.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    Json(req): Json<CancelBookingApiRequest>,
) -> Result<Json<CancelTicketResponse>, HttpError> {
    info!(user_id = %req.user_id, booking_id = %booking_id, "Handling cancel_booking request");
    let request: CancelTicketRequest = CancelTicketRequest {
        user_id: req.user_id,
        booking_id,
    };
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.cancel_ticket(&request)?))
}

/// Handler for GET `/bookings?user_id=`.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingSummary>>, HttpError> {
    let office = app_state.box_office.lock().await;
    let bookings: Vec<BookingSummary> = if query.active {
        office.active_bookings_for(&query.user_id)?
    } else {
        office.bookings_for(&query.user_id)?
    };
    Ok(Json(bookings))
}

/// Handler for GET `/wallet/{user_id}`.
async fn handle_get_wallet(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<WalletResponse>, HttpError> {
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.wallet_balance(&user_id)?))
}

/// Handler for GET `/wallet/{user_id}/history`.
async fn handle_get_wallet_history(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<WalletTransactionResponse>>, HttpError> {
    let office = app_state.box_office.lock().await;
    Ok(Json(office.wallet_history(&user_id)?))
}

/// Handler for POST `/wallet/{user_id}/deposit`.
async fn handle_deposit(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<WalletResponse>, HttpError> {
    info!(user_id = %user_id, amount = %req.amount, "Handling deposit request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.deposit(&user_id, &req)?))
}

/// Handler for GET `/discrepancies`.
async fn handle_list_discrepancies(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<DiscrepancyResponse>>, HttpError> {
    let office = app_state.box_office.lock().await;
    Ok(Json(office.discrepancies()?))
}

/// Handler for POST `/screens`.
async fn handle_add_screen(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddScreenRequest>,
) -> Result<Json<ScreenResponse>, HttpError> {
    info!(
        screen_id = %req.screen_id,
        rows = req.rows,
        cols = req.cols,
        "Handling add_screen request"
    );
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.add_screen(&req)?))
}

/// Handler for POST `/screens/{screen_id}/showtimes`.
async fn handle_add_showtime(
    AxumState(app_state): AxumState<AppState>,
    Path(screen_id): Path<String>,
    Json(req): Json<AddShowtimeApiRequest>,
) -> Result<Json<ScreenResponse>, HttpError> {
    info!(screen_id = %screen_id, showtime = %req.showtime, "Handling add_showtime request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.add_showtime(&screen_id, &req.showtime)?))
}

/// Handler for POST `/screens/{screen_id}/status`.
async fn handle_set_screen_status(
    AxumState(app_state): AxumState<AppState>,
    Path(screen_id): Path<String>,
    Json(req): Json<ScreenStatusApiRequest>,
) -> Result<Json<ScreenResponse>, HttpError> {
    info!(screen_id = %screen_id, status = %req.status, "Handling set_screen_status request");
    let request: SetScreenStatusRequest = SetScreenStatusRequest {
        screen_id,
        status: req.status,
    };
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.set_screen_status(&request)?))
}

/// Handler for POST `/movies`.
async fn handle_add_movie(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddMovieRequest>,
) -> Result<Json<MovieResponse>, HttpError> {
    info!(title = %req.title, screen_id = %req.screen_id, "Handling add_movie request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.add_movie(&req)?))
}

/// Handler for POST `/movies/{movie_id}/activate`.
async fn handle_activate_movie(
    AxumState(app_state): AxumState<AppState>,
    Path(movie_id): Path<u32>,
) -> Result<Json<MovieResponse>, HttpError> {
    info!(movie_id, "Handling activate_movie request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.activate_movie(movie_id)?))
}

/// Handler for POST `/movies/{movie_id}/deactivate`.
async fn handle_deactivate_movie(
    AxumState(app_state): AxumState<AppState>,
    Path(movie_id): Path<u32>,
) -> Result<Json<MovieResponse>, HttpError> {
    info!(movie_id, "Handling deactivate_movie request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.deactivate_movie(movie_id)?))
}

/// Handler for POST `/movies/{movie_id}/price`.
async fn handle_set_movie_price(
    AxumState(app_state): AxumState<AppState>,
    Path(movie_id): Path<u32>,
    Json(req): Json<MoviePriceApiRequest>,
) -> Result<Json<MovieResponse>, HttpError> {
    info!(movie_id, price = %req.price, "Handling set_movie_price request");
    let mut office = app_state.box_office.lock().await;
    Ok(Json(office.set_movie_price(movie_id, &req.price)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/movies", get(handle_list_movies))
        .route("/movies", post(handle_add_movie))
        .route("/movies/{movie_id}/activate", post(handle_activate_movie))
        .route("/movies/{movie_id}/deactivate", post(handle_deactivate_movie))
        .route("/movies/{movie_id}/price", post(handle_set_movie_price))
        .route("/screens", get(handle_list_screens))
        .route("/screens", post(handle_add_screen))
        .route("/screens/{screen_id}/showtimes", post(handle_add_showtime))
        .route("/screens/{screen_id}/status", post(handle_set_screen_status))
        .route(
            "/screens/{screen_id}/showtimes/{showtime}/seats",
            get(handle_get_seat_map),
        )
        .route(
            "/screens/{screen_id}/showtimes/{showtime}/holders",
            get(handle_get_seat_holders),
        )
        .route("/availability", get(handle_get_availability))
        .route("/bookings", post(handle_book_ticket))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings/{booking_id}/cancel", post(handle_cancel_booking))
        .route("/wallet/{user_id}", get(handle_get_wallet))
        .route("/wallet/{user_id}/history", get(handle_get_wallet_history))
        .route("/wallet/{user_id}/deposit", post(handle_deposit))
        .route("/discrepancies", get(handle_list_discrepancies))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Marquee Server");

    let config: BoxOfficeConfig = BoxOfficeConfig {
        data_dir: args.data_dir,
        starting_balance: args.starting_balance,
        use_snapshot: !args.no_snapshot,
    };
    info!(data_dir = %config.data_dir.display(), "Opening box office");
    let box_office: BoxOffice = BoxOffice::open(config)?;

    let app_state: AppState = AppState {
        box_office: Arc::new(Mutex::new(box_office)),
    };
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

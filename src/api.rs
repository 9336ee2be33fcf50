use actix_web::{http::header::LOCATION, web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::AuthenticatedUser;
use crate::cloud::CloudFunctions;
use crate::db::Database;
use crate::error::AppError;
use crate::models::car::{CarMake, CarModel, NewCarMake, NewCarModel};
use crate::models::dealer::Dealer;
use crate::models::review::{Review, ReviewSubmission};
use crate::pipeline::ReviewPipeline;
use crate::sentiment::SentimentClient;

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub db: Database,
    pub cloud: CloudFunctions,
    pub reviews: ReviewPipeline<CloudFunctions, SentimentClient>,
}

impl AppState {
    pub fn new(db: Database, cloud: CloudFunctions, classifier: SentimentClient) -> Self {
        Self {
            db,
            reviews: ReviewPipeline::new(cloud.clone(), classifier),
            cloud,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DealershipsContext {
    pub dealerships: Vec<Dealer>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DealerDetailsContext {
    pub dealer: Option<Dealer>,
    pub reviews: Vec<Review>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddReviewContext {
    pub dealer: Option<Dealer>,
    pub cars: Vec<CarModel>,
}

/// Context for the static pages.
#[derive(Serialize, Debug)]
pub struct PageContext {
    pub page: &'static str,
}

/// Fields posted by the add-review form.
#[derive(Deserialize, Debug)]
pub struct ReviewForm {
    pub car: String, // catalog model id, parsed by the handler
    pub content: String,
    pub purchasecheck: Option<String>,
    #[serde(default)]
    pub purchasedate: String,
}

pub async fn get_dealerships(state: web::Data<AppState>) -> HttpResponse {
    let dealerships = state.cloud.get_dealers().await;
    info!("[API] Rendering {} dealerships", dealerships.len());
    HttpResponse::Ok().json(DealershipsContext { dealerships })
}

pub async fn get_dealer_details(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let dealer_id = path.into_inner();
    let dealer = state.cloud.get_dealer(dealer_id).await;
    let reviews = state.reviews.enrich(dealer_id).await;
    info!(
        "[API] Dealer {} details: found={}, {} reviews",
        dealer_id,
        dealer.is_some(),
        reviews.len()
    );
    HttpResponse::Ok().json(DealerDetailsContext { dealer, reviews })
}

pub async fn add_review_form(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let dealer_id = path.into_inner();
    let dealer = state.cloud.get_dealer(dealer_id).await;
    let cars = state.db.list_models().await.unwrap_or_else(|err| {
        warn!("[API] Car list unavailable: {:?}", err);
        Vec::new()
    });
    HttpResponse::Ok().json(AddReviewContext { dealer, cars })
}

pub async fn add_review(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    user: AuthenticatedUser,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    let dealer_id = path.into_inner();
    let form = form.into_inner();

    let car_id: i64 = match form.car.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            warn!("[API] Rejecting review with car id {:?}", form.car);
            return Err(AppError::InvalidCar(form.car));
        }
    };
    let car = state
        .db
        .get_model(car_id)
        .await?
        .ok_or(AppError::InvalidCar(form.car))?;

    let submission = ReviewSubmission::new(
        &user.username,
        dealer_id,
        form.content,
        form.purchasecheck.as_deref() == Some("on"),
        form.purchasedate,
        &car,
        Utc::now(),
    );

    match state.cloud.post_review(&submission).await {
        Ok(status) if status.is_success() => {
            info!("[API] Review by {} saved for dealer {}", user.username, dealer_id)
        }
        Ok(status) => error!(
            "[API] Review by {} for dealer {} rejected: HTTP {}",
            user.username, dealer_id, status
        ),
        Err(err) => error!(
            "[API] Review by {} for dealer {} not sent: {}",
            user.username, dealer_id, err
        ),
    }

    Ok(HttpResponse::SeeOther()
        .insert_header((LOCATION, format!("/dealer/{dealer_id}")))
        .finish())
}

pub async fn list_makes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let makes: Vec<CarMake> = state.db.list_makes().await?;
    Ok(HttpResponse::Ok().json(makes))
}

pub async fn create_make(
    state: web::Data<AppState>,
    make: web::Json<NewCarMake>,
) -> Result<HttpResponse, AppError> {
    let make = state.db.insert_make(&make).await?;
    Ok(HttpResponse::Created().json(make))
}

pub async fn list_models(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let models = state.db.list_models().await?;
    Ok(HttpResponse::Ok().json(models))
}

pub async fn create_model(
    state: web::Data<AppState>,
    model: web::Json<NewCarModel>,
) -> Result<HttpResponse, AppError> {
    match state.db.insert_model(&model).await? {
        Some(model) => Ok(HttpResponse::Created().json(model)),
        None => Err(AppError::BadRequest(format!(
            "unknown make {}",
            model.make_id
        ))),
    }
}

pub async fn about() -> HttpResponse {
    HttpResponse::Ok().json(PageContext { page: "about" })
}

pub async fn contact() -> HttpResponse {
    HttpResponse::Ok().json(PageContext { page: "contact" })
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/about", web::get().to(about))
        .route("/contact", web::get().to(contact))
        .route("/dealerships", web::get().to(get_dealerships))
        .route("/dealer/{id}", web::get().to(get_dealer_details))
        .route("/dealer/{id}/review", web::get().to(add_review_form))
        .route("/dealer/{id}/review", web::post().to(add_review))
        .service(
            web::scope("/api")
                .route("/makes", web::get().to(list_makes)) // GET /api/makes
                .route("/makes", web::post().to(create_make)) // POST /api/makes
                .route("/models", web::get().to(list_models)) // GET /api/models
                .route("/models", web::post().to(create_model)), // POST /api/models
        );
}

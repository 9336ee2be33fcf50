//! Stand-in for the dealer/review cloud functions and the sentiment service,
//! served by a real `HttpServer` on an ephemeral localhost port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::{json, Value};

use dealer_reviews::api::AppState;
use dealer_reviews::cloud::CloudFunctions;
use dealer_reviews::config::{Endpoints, SentimentConfig};
use dealer_reviews::db::Database;
use dealer_reviews::remote::RemoteClient;
use dealer_reviews::sentiment::{SentimentClient, MODEL_HEADER};

pub const TEST_MODEL: &str = "sentiment_test_model";

/// How the stub answers a classification request for a given text.
#[derive(Clone, Debug)]
pub enum SentimentReply {
    Label(&'static str, f64),
    Status(u16),
}

#[derive(Default)]
pub struct StubData {
    pub dealers: Vec<Value>,
    pub reviews: Vec<Value>,
    pub dealer_status: Option<u16>,
    pub post_status: Option<u16>,
    pub sentiment: HashMap<String, SentimentReply>,
    pub posted: Mutex<Vec<(Option<i64>, Value)>>,
    pub sentiment_requests: Mutex<Vec<SeenClassification>>,
}

#[derive(Clone, Debug)]
pub struct SeenClassification {
    pub text: String,
    pub model: Option<String>,
    pub authorization: Option<String>,
}

pub struct CloudStub {
    pub base_url: String,
    pub data: web::Data<StubData>,
}

impl CloudStub {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            dealers_url: self.url("/dealerships/get"),
            reviews_url: self.url("/api/get_reviews"),
            post_review_url: self.url("/api/post_review"),
        }
    }

    pub fn sentiment_config(&self) -> SentimentConfig {
        SentimentConfig {
            url: self.url("/sentiment"),
            model: TEST_MODEL.to_string(),
            api_key: None,
        }
    }

    pub fn remote(&self) -> RemoteClient {
        RemoteClient::new(Duration::from_secs(5)).unwrap()
    }

    pub fn cloud(&self) -> CloudFunctions {
        CloudFunctions::new(self.remote(), self.endpoints())
    }

    pub fn classifier(&self) -> SentimentClient {
        SentimentClient::new(self.sentiment_config(), Duration::from_secs(5)).unwrap()
    }

    /// Application state wired to this stub and a fresh in-memory catalog.
    pub async fn app_state(&self) -> AppState {
        let db = Database::open(":memory:").unwrap();
        db.create_schema().await.unwrap();
        AppState::new(db, self.cloud(), self.classifier())
    }

    pub fn posted(&self) -> Vec<(Option<i64>, Value)> {
        self.data.posted.lock().unwrap().clone()
    }

    pub fn sentiment_requests(&self) -> Vec<SeenClassification> {
        self.data.sentiment_requests.lock().unwrap().clone()
    }
}

pub async fn spawn(data: StubData) -> CloudStub {
    let data = web::Data::new(data);
    let app_data = data.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .route("/dealerships/get", web::get().to(dealers))
            .route("/api/get_reviews", web::get().to(reviews))
            .route("/api/post_review", web::post().to(post_review))
            .route("/sentiment", web::post().to(classify))
            .route("/not-a-list", web::get().to(not_a_list))
            .route("/garbage", web::get().to(garbage))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    CloudStub {
        base_url: format!("http://{addr}"),
        data,
    }
}

pub fn dealer(id: i64, full_name: &str, st: &str) -> Value {
    json!({
        "_id": format!("doc-{id}"),
        "_rev": "1-abc",
        "id": id,
        "full_name": full_name,
        "short_name": full_name.split_whitespace().next().unwrap_or(full_name),
        "address": format!("{id} Main Street"),
        "city": "Springfield",
        "state": "Somewhere",
        "st": st,
        "zip": "12345",
        "lat": 39.78,
        "long": -89.65
    })
}

pub fn review(id: i64, dealership: i64, text: &str) -> Value {
    json!({
        "id": id,
        "dealership": dealership,
        "name": format!("Reviewer {id}"),
        "review": text,
        "purchase": true,
        "purchase_date": "07/11/2020",
        "car_make": "Audi",
        "car_model": "A6",
        "car_year": 2010
    })
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<i64>,
}

fn status(code: u16) -> HttpResponse {
    HttpResponse::build(StatusCode::from_u16(code).unwrap()).body("stub failure")
}

async fn dealers(data: web::Data<StubData>, query: web::Query<IdQuery>) -> HttpResponse {
    if let Some(code) = data.dealer_status {
        return status(code);
    }
    let list: Vec<Value> = match query.id {
        Some(id) => data
            .dealers
            .iter()
            .filter(|d| d["id"] == id)
            .cloned()
            .collect(),
        None => data.dealers.clone(),
    };
    HttpResponse::Ok().json(list)
}

// records without a dealership are served to every dealer so malformed input reaches the client
async fn reviews(data: web::Data<StubData>, query: web::Query<IdQuery>) -> HttpResponse {
    let list: Vec<Value> = match query.id {
        Some(id) => data
            .reviews
            .iter()
            .filter(|r| r["dealership"] == id || r.get("dealership").is_none())
            .cloned()
            .collect(),
        None => data.reviews.clone(),
    };
    HttpResponse::Ok().json(list)
}

async fn post_review(
    data: web::Data<StubData>,
    query: web::Query<IdQuery>,
    body: web::Json<Value>,
) -> HttpResponse {
    data.posted
        .lock()
        .unwrap()
        .push((query.id, body.into_inner()));
    match data.post_status {
        Some(code) => status(code),
        None => HttpResponse::Ok().json(json!({ "ok": true })),
    }
}

async fn classify(
    data: web::Data<StubData>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let text = body["raw_document"]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    data.sentiment_requests
        .lock()
        .unwrap()
        .push(SeenClassification {
            text: text.clone(),
            model: header(MODEL_HEADER),
            authorization: header("authorization"),
        });

    match data.sentiment.get(&text) {
        Some(SentimentReply::Status(code)) => status(*code),
        Some(SentimentReply::Label(label, score)) => HttpResponse::Ok().json(json!({
            "documentSentiment": { "label": label, "score": score }
        })),
        None => HttpResponse::Ok().json(json!({
            "documentSentiment": { "label": "SENT_NEUTRAL", "score": 0.0 }
        })),
    }
}

async fn not_a_list() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "dealers": [] }))
}

async fn garbage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body("{not json")
}

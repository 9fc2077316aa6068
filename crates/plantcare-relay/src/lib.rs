//! Identification relay for PlantCare
//!
//! A stateless HTTP endpoint that accepts a base64 image, forwards it to
//! Plant.id with the server-held key and returns the normalized result.
//! Keeping the key here means clients never ship it.

use std::convert::Infallible;
use std::sync::Arc;

use base64::Engine;
use plantcare_identify::types::{
    RelayErrorBody, RelayRequest, CODE_INVALID_REQUEST, CODE_LOW_CONFIDENCE, CODE_UPSTREAM_ERROR,
};
use plantcare_identify::{IdentificationClient, IdentifyError, ImageUpload};
use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const DEFAULT_FILE_NAME: &str = "image.jpg";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Shared, immutable server state.
pub struct RelayState {
    client: IdentificationClient,
}

impl RelayState {
    pub fn new(client: IdentificationClient) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// All relay routes, with JSON error replies for rejected requests.
pub fn routes(
    state: Arc<RelayState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
            })
        });

    let identify = warp::path!("api" / "identify-plant")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<RelayRequest>())
        .and(with_state(state))
        .and_then(handle_identify);

    health
        .or(identify)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_state(
    state: Arc<RelayState>,
) -> impl Filter<Extract = (Arc<RelayState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_identify(
    request: RelayRequest,
    state: Arc<RelayState>,
) -> Result<Response, Infallible> {
    let bytes = match decode_image(&request.image) {
        Some(bytes) => bytes,
        None => {
            tracing::warn!("Rejected request with missing or invalid image data");
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                CODE_INVALID_REQUEST,
                "Field 'image' must contain base64-encoded image data",
                None,
            ));
        }
    };

    let upload = ImageUpload::new(
        request
            .file_name
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        request
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        bytes,
    );

    match state.client.identify(&upload).await {
        Ok(identification) => {
            tracing::info!(species = %identification.species, "Identification relayed");
            Ok(warp::reply::json(&identification).into_response())
        }
        Err(e) => {
            tracing::error!("Identification failed: {}", e);
            Ok(identify_error_reply(&e))
        }
    }
}

/// Decode the image field. A `data:<type>;base64,` prefix is accepted.
fn decode_image(image: &str) -> Option<Vec<u8>> {
    let image = image.trim();
    let payload = match image.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => image,
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()
        .filter(|bytes| !bytes.is_empty())
}

fn identify_error_reply(err: &IdentifyError) -> Response {
    match err {
        IdentifyError::UnsupportedFormat(_) => error_reply(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_REQUEST,
            &err.to_string(),
            None,
        ),
        IdentifyError::LowConfidence { probability } => error_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            CODE_LOW_CONFIDENCE,
            &err.to_string(),
            Some(*probability),
        ),
        IdentifyError::Service { .. } | IdentifyError::Network(_) => error_reply(
            StatusCode::BAD_GATEWAY,
            CODE_UPSTREAM_ERROR,
            &err.to_string(),
            None,
        ),
    }
}

fn error_reply(status: StatusCode, code: &str, message: &str, probability: Option<f64>) -> Response {
    let body = RelayErrorBody {
        error: message.to_string(),
        code: code.to_string(),
        probability,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, CODE_INVALID_REQUEST, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            CODE_INVALID_REQUEST,
            "Image too large".to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            CODE_INVALID_REQUEST,
            "Content-Length required".to_string(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            CODE_INVALID_REQUEST,
            "Expected a JSON body".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method not allowed".to_string(),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        )
    };

    Ok(error_reply(status, code, &message, None))
}

//! Route definitions and the JSON request/response contract.
//!
//! Every failure is reported inside the payload as
//! `{"success": false, "error": "..."}` with HTTP 200 — clients key off the
//! `success` flag, not the status code.

use actix_web::{get, post, web, HttpResponse, Responder};
use base64::Engine;
use serde::{Deserialize, Serialize};

use agelens_core::detection::domain::face_detection::FaceDetection;
use agelens_core::shared::constants::MAX_DETECT_DIMENSION;
use agelens_core::shared::frame::Frame;

use crate::state::AppState;

#[derive(Deserialize)]
struct DetectRequest {
    /// Data-URL (`data:image/...;base64,<data>`) or plain base64.
    image: String,
}

#[derive(Serialize)]
struct FaceDto {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    confidence: f32,
    gender: String,
    gender_confidence: f32,
    age: u32,
    age_confidence: f32,
    timestamp: String,
}

impl From<&FaceDetection> for FaceDto {
    fn from(d: &FaceDetection) -> Self {
        Self {
            x1: d.bounding_box.x1,
            y1: d.bounding_box.y1,
            x2: d.bounding_box.x2,
            y2: d.bounding_box.y2,
            confidence: d.face_confidence,
            gender: d.gender.to_string(),
            gender_confidence: d.gender_confidence,
            age: d.age,
            age_confidence: d.age_confidence,
            timestamp: d.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    faces: Option<Vec<FaceDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn success(faces: Vec<FaceDto>) -> Self {
        Self {
            success: true,
            faces: Some(faces),
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            faces: None,
            error: Some(message),
        }
    }
}

/// Minimal capture page posting webcam stills to the detect endpoint.
#[get("/")]
pub async fn index() -> impl Responder {
    let resp = r#"<!DOCTYPE html>
<html>
<head>
<title>AgeLens</title>
</head>
<body>
<div class="container">
    <h3>Face age &amp; gender detection</h3>
    <video id="video" autoplay playsinline width="480"></video>
    <pre id="result"></pre>
    <script>
    const video = document.getElementById('video');
    const result = document.getElementById('result');
    navigator.mediaDevices.getUserMedia({ video: true }).then(s => { video.srcObject = s; });
    setInterval(async () => {
        if (!video.videoWidth) return;
        const canvas = document.createElement('canvas');
        canvas.width = video.videoWidth;
        canvas.height = video.videoHeight;
        canvas.getContext('2d').drawImage(video, 0, 0);
        const resp = await fetch('/api/detect', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ image: canvas.toDataURL('image/jpeg') })
        });
        result.textContent = JSON.stringify(await resp.json(), null, 2);
    }, 1000);
    </script>
</div>
</body>
</html>
"#;
    HttpResponse::Ok().content_type("text/html").body(resp)
}

/// Detect faces in a base64-encoded image.
#[post("/detect")]
pub async fn detect(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let result = web::block(move || process_detect(&state, &body)).await;

    let response = match result {
        Ok(Ok(faces)) => ApiResponse::success(faces),
        Ok(Err(message)) => {
            log::warn!("Detect request failed: {message}");
            ApiResponse::failure(message)
        }
        Err(e) => {
            log::error!("Detect worker failed: {e}");
            ApiResponse::failure(e.to_string())
        }
    };
    HttpResponse::Ok().json(response)
}

/// The retained detection history, oldest first.
#[get("/history")]
pub async fn history(state: web::Data<AppState>) -> HttpResponse {
    let faces = state.history.snapshot().iter().map(FaceDto::from).collect();
    HttpResponse::Ok().json(ApiResponse::success(faces))
}

/// Catch-all for unsupported methods/paths under `/api`.
pub async fn invalid_method() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::failure("Invalid request method".into()))
}

/// Whole-request pipeline: decode → analyze → record. Runs on a blocking
/// worker thread; any error fails the request wholesale (a single bad face
/// crop is dropped inside the pipeline instead).
fn process_detect(state: &AppState, body: &[u8]) -> Result<Vec<FaceDto>, String> {
    let request: DetectRequest =
        serde_json::from_slice(body).map_err(|e| format!("invalid request body: {e}"))?;

    let frame = decode_image_payload(&request.image)?;

    let detections = {
        let mut pipeline = state
            .pipeline
            .lock()
            .map_err(|_| "pipeline lock poisoned".to_string())?;
        pipeline
            .execute_bounded(&frame, MAX_DETECT_DIMENSION)
            .map_err(|e| e.to_string())?
    };

    state.history.extend(detections.iter().cloned());
    Ok(detections.iter().map(FaceDto::from).collect())
}

/// Strips an optional data-URL prefix, base64-decodes, and decodes the image
/// into an RGB frame.
fn decode_image_payload(payload: &str) -> Result<Frame, String> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| format!("invalid base64 image data: {e}"))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("could not decode image: {e}"))?
        .into_rgb8();

    Ok(Frame::new(img.as_raw().clone(), img.width(), img.height(), 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, App};
    use agelens_core::detection::domain::attribute_classifier::{
        AttributeClassifier, AttributeProbabilities,
    };
    use agelens_core::detection::domain::face_localizer::{FaceLocalizer, RawFace};
    use agelens_core::detection::domain::gender::Gender;
    use agelens_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
    use agelens_core::shared::bounding_box::BoundingBox;
    use chrono::Utc;

    // --- Stubs ---

    struct StubLocalizer {
        faces: Vec<RawFace>,
    }

    impl FaceLocalizer for StubLocalizer {
        fn localize(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<RawFace>, Box<dyn std::error::Error>> {
            Ok(self.faces.clone())
        }
    }

    struct StubClassifier;

    impl AttributeClassifier for StubClassifier {
        fn classify(
            &mut self,
            _crop: &Frame,
        ) -> Result<AttributeProbabilities, Box<dyn std::error::Error>> {
            Ok(AttributeProbabilities {
                gender: [0.9, 0.1],
                age: [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            })
        }
    }

    fn stub_state(faces: Vec<RawFace>) -> web::Data<AppState> {
        let pipeline = AnalyzeFrameUseCase::new(
            Box::new(StubLocalizer { faces }),
            Box::new(StubClassifier),
        );
        web::Data::new(AppState::new(pipeline))
    }

    fn png_data_url(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 120, 120]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        format!("data:image/png;base64,{encoded}")
    }

    // --- decode_image_payload ---

    #[test]
    fn test_decode_image_payload_with_data_url() {
        let frame = decode_image_payload(&png_data_url(32, 24)).unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 24);
    }

    #[test]
    fn test_decode_image_payload_plain_base64() {
        let url = png_data_url(8, 8);
        let (_, plain) = url.split_once(',').unwrap();
        assert!(decode_image_payload(plain).is_ok());
    }

    #[test]
    fn test_decode_image_payload_invalid_base64() {
        let err = decode_image_payload("data:image/png;base64,!!notbase64!!").unwrap_err();
        assert!(err.contains("base64"));
    }

    #[test]
    fn test_decode_image_payload_not_an_image() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert!(decode_image_payload(&encoded).is_err());
    }

    // --- DTO ---

    #[test]
    fn test_face_dto_fields() {
        let detection = FaceDetection {
            bounding_box: BoundingBox { x1: 1, y1: 2, x2: 30, y2: 40 },
            face_confidence: 0.95,
            gender: Gender::Female,
            gender_confidence: 0.8,
            age: 29,
            age_confidence: 0.6,
            age_bucket: 4,
            timestamp: Utc::now(),
        };
        let dto = FaceDto::from(&detection);
        assert_eq!((dto.x1, dto.y1, dto.x2, dto.y2), (1, 2, 30, 40));
        assert_eq!(dto.gender, "Female");
        assert_eq!(dto.age, 29);
        // ISO-8601 timestamp
        assert!(dto.timestamp.contains('T'));
    }

    // --- Endpoint contract ---

    #[actix_web::test]
    async fn test_detect_single_face() {
        let app = actix_test::init_service(
            App::new()
                .app_data(stub_state(vec![RawFace {
                    bbox: BoundingBox { x1: 10, y1: 10, x2: 50, y2: 50 },
                    confidence: 0.92,
                }]))
                .service(web::scope("/api").service(detect)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/detect")
            .set_json(serde_json::json!({ "image": png_data_url(100, 100) }))
            .to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["success"], true);
        let faces = resp["faces"].as_array().unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0]["gender"], "Male");
        assert_eq!(faces[0]["age"], 29);
        let age = faces[0]["age"].as_u64().unwrap();
        assert!(age <= 100);
    }

    #[actix_web::test]
    async fn test_detect_no_faces_is_success() {
        let app = actix_test::init_service(
            App::new()
                .app_data(stub_state(vec![]))
                .service(web::scope("/api").service(detect)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/detect")
            .set_json(serde_json::json!({ "image": png_data_url(64, 64) }))
            .to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["success"], true);
        assert!(resp["faces"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_json_reports_payload_error() {
        let app = actix_test::init_service(
            App::new()
                .app_data(stub_state(vec![]))
                .service(web::scope("/api").service(detect)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/detect")
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        // Errors ride in the payload, not the status code
        assert!(resp.status().is_success());
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_base64_reports_error() {
        let app = actix_test::init_service(
            App::new()
                .app_data(stub_state(vec![]))
                .service(web::scope("/api").service(detect)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/detect")
            .set_json(serde_json::json!({ "image": "data:image/png;base64,@@@" }))
            .to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["success"], false);
        assert!(resp["error"].as_str().unwrap().contains("base64"));
    }

    #[actix_web::test]
    async fn test_non_post_method_rejected_in_payload() {
        let app = actix_test::init_service(
            App::new().app_data(stub_state(vec![])).service(
                web::scope("/api")
                    .service(detect)
                    .default_service(web::route().to(invalid_method)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/detect").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request method");
    }

    #[actix_web::test]
    async fn test_history_accumulates_detections() {
        let state = stub_state(vec![RawFace {
            bbox: BoundingBox { x1: 5, y1: 5, x2: 40, y2: 40 },
            confidence: 0.9,
        }]);
        let app = actix_test::init_service(
            App::new().app_data(state.clone()).service(
                web::scope("/api").service(detect).service(history),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = actix_test::TestRequest::post()
                .uri("/api/detect")
                .set_json(serde_json::json!({ "image": png_data_url(80, 80) }))
                .to_request();
            let _: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        }

        let req = actix_test::TestRequest::get().uri("/api/history").to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["success"], true);
        assert_eq!(resp["faces"].as_array().unwrap().len(), 2);
    }
}

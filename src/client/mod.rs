// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP client for the measurement backend.
//!
//! All geometry is computed server-side. Calls are blocking and are made
//! from worker threads, never from the UI thread.

pub mod multipart;
pub mod wire;

use crate::config::AppConfig;
use crate::measure::{CalculationRequest, CalculationResult};
use crate::models::{DistanceRatioResult, FrameContext, FrameDetails, FrameSource, Measurements};
use multipart::MultipartForm;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::time::Duration;

/// Attempts beyond the first made by the health check.
const HEALTH_RETRIES: u32 = 2;
/// Timeout of the first health check attempt, doubled on each retry.
const HEALTH_BASE_TIMEOUT: Duration = Duration::from_secs(5);
const HEALTH_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Errors talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("backend returned HTTP {code}: {message}")]
    Status { code: u16, message: String },
    #[error("could not reach backend: {0}")]
    Transport(String),
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for ClientError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, response) => ClientError::Status {
                code,
                message: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}

/// Connection to the measurement backend.
#[derive(Clone)]
pub struct BackendClient {
    agent: ureq::Agent,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.backend_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run a geometry calculation.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult, ClientError> {
        match request {
            CalculationRequest::Angle { points } => {
                let response: wire::AngleResponse =
                    self.post_json("measure/angle", &wire::PointsBody { points })?;
                Ok(CalculationResult::Angle(response.angle))
            }
            CalculationRequest::Area { points, method } => {
                let response: wire::AreaResponse =
                    self.post_json("measure/area", &wire::AreaBody { points, method })?;
                log::debug!(
                    "Area {} px² (perimeter {:?}, method {:?}, {:?} points)",
                    response.area_pixels,
                    response.perimeter_pixels,
                    response.method,
                    response.point_count
                );
                Ok(CalculationResult::Area(response.area_pixels))
            }
            CalculationRequest::Distance { points } => {
                let response: wire::DistanceResponse =
                    self.post_json("measure/distance", &wire::PointsBody { points })?;
                Ok(CalculationResult::Distance(response.distance))
            }
            CalculationRequest::DistanceRatio { horizontal, vertical } => {
                let response: DistanceRatioResult = self.post_json(
                    "measure/distance-ratio",
                    &wire::DistanceRatioBody {
                        horizontal_points: horizontal,
                        vertical_points: vertical,
                    },
                )?;
                Ok(CalculationResult::DistanceRatio(response))
            }
        }
    }

    /// Save the measurements of a frame to the backend session.
    ///
    /// Locally captured frames upload their image with the measurements.
    pub fn save_frame(
        &self,
        frame: &FrameContext,
        measurements: &Measurements,
    ) -> Result<(), ClientError> {
        let response = match &frame.source {
            FrameSource::Backend => self
                .agent
                .post(&self.url("session/save-measured-frame"))
                .send_json(wire::SaveFrameBody {
                    timestamp: frame.timestamp,
                    frame_idx: frame.frame_idx,
                    measurements,
                    override_existing: frame.override_existing,
                })?,
            FrameSource::Canvas { image } => {
                let measurements_json = serde_json::to_string(measurements)
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                let (mime, extension) = crate::io::media::image_kind(image);

                let mut form = MultipartForm::new()
                    .text("timestamp", &frame.timestamp.to_string())
                    .text("frame_idx", &frame.frame_idx.to_string())
                    .text("measurements", &measurements_json)
                    .text("override_existing", &frame.override_existing.to_string());
                if let Some(name) = &frame.custom_name {
                    form = form.text("custom_name", name);
                }
                let filename = format!("frame_{}.{}", frame.frame_idx, extension);
                let (content_type, body) = form
                    .file("canvas_image", &filename, mime, image)
                    .finish();

                self.agent
                    .post(&self.url("session/save-canvas-frame"))
                    .set("Content-Type", &content_type)
                    .send_bytes(&body)?
            }
        };

        // Only success matters; the body just echoes the stored frame
        let echo = response.into_string().unwrap_or_default();
        log::debug!("Save response: {}", echo);
        Ok(())
    }

    /// Capture a frame of the session video. Returns the encoded image.
    pub fn capture_frame(&self, timestamp: f64, frame_idx: u64) -> Result<Vec<u8>, ClientError> {
        let response = self
            .agent
            .get(&self.url("frame-capture/"))
            .query("timestamp", &timestamp.to_string())
            .query("frame_idx", &frame_idx.to_string())
            .call()?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(bytes)
    }

    /// Fetch a saved frame with its measurements and formulas.
    pub fn frame_details(&self, frame_id: &str) -> Result<FrameDetails, ClientError> {
        let response = self
            .agent
            .get(&self.url(&format!("session/frame-details/{}", frame_id)))
            .call()?;
        response
            .into_json()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Check whether the backend is up, retrying with growing timeouts.
    pub fn check_health(&self) -> bool {
        let timeouts = health_timeouts();
        for (attempt, timeout) in timeouts.iter().enumerate() {
            let result = self.agent.get(&self.url("api/test")).timeout(*timeout).call();
            match result {
                Ok(_) => return true,
                Err(e) => {
                    log::warn!("Backend health check attempt {} failed: {}", attempt + 1, e);
                    if attempt + 1 < timeouts.len() {
                        std::thread::sleep(HEALTH_RETRY_PAUSE);
                    }
                }
            }
        }
        false
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let response = self.agent.post(&self.url(path)).send_json(body)?;
        response
            .into_json()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Timeout of each health check attempt.
fn health_timeouts() -> Vec<Duration> {
    (0..=HEALTH_RETRIES)
        .map(|attempt| HEALTH_BASE_TIMEOUT * 2u32.pow(attempt))
        .collect()
}

/// Message shown when the backend cannot be reached.
pub fn backend_unavailable_message() -> &'static str {
    "Backend service is not running. Please start the application and try again."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use std::io::Write;
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    /// Serve a single HTTP response and hand back the raw request.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (url, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(url: &str) -> BackendClient {
        BackendClient::new(url, Duration::from_secs(5))
    }

    #[test]
    fn test_url_joining() {
        let client = client("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/measure/angle"), "http://localhost:8000/measure/angle");
        assert_eq!(client.url("api/test"), "http://localhost:8000/api/test");
    }

    #[test]
    fn test_health_timeouts_double() {
        assert_eq!(
            health_timeouts(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(20)
            ]
        );
    }

    #[test]
    fn test_angle_calculation_round_trip() {
        let (url, server) = serve_once("200 OK", r#"{"angle": 90.0}"#);
        let request = CalculationRequest::Angle {
            points: vec![Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(50.0, 50.0)],
        };

        let result = client(&url).calculate(&request).unwrap();
        let raw = server.join().unwrap();

        assert_eq!(result, CalculationResult::Angle(90.0));
        assert!(raw.starts_with("POST /measure/angle "));
        assert!(raw.contains(r#"{"points":[[10.0,10.0],[50.0,10.0],[50.0,50.0]]}"#));
    }

    #[test]
    fn test_area_keeps_area_pixels() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"area_pixels": 50.0, "perimeter_pixels": 34.1, "method": "scikit_image", "point_count": 3}"#,
        );
        let request = CalculationRequest::Area {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            method: "scikit".to_string(),
        };

        let result = client(&url).calculate(&request).unwrap();
        let raw = server.join().unwrap();

        assert_eq!(result, CalculationResult::Area(50.0));
        assert!(raw.contains(r#""method":"scikit""#));
    }

    #[test]
    fn test_error_status_is_reported() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#);
        let request = CalculationRequest::Distance {
            points: vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
        };

        let error = client(&url).calculate(&request).unwrap_err();
        server.join().unwrap();

        match error {
            ClientError::Status { code, message } => {
                assert_eq!(code, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_response_is_decode_error() {
        let (url, server) = serve_once("200 OK", r#"{"distance": "far"}"#);
        let request = CalculationRequest::Distance {
            points: vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
        };

        let error = client(&url).calculate(&request).unwrap_err();
        server.join().unwrap();

        assert!(matches!(error, ClientError::Decode(_)));
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = client(&format!("http://127.0.0.1:{}", port));

        let error = client.frame_details("missing").unwrap_err();
        assert!(matches!(error, ClientError::Transport(_)));
    }

    #[test]
    fn test_save_backend_frame_posts_json() {
        let (url, server) = serve_once("200 OK", r#"{"frame_id": "abc"}"#);
        let mut frame = FrameContext::new(42, 1.5, FrameSource::Backend);
        frame.override_existing = true;
        let measurements = Measurements {
            angle_a: Some(30.0),
            ..Default::default()
        };

        client(&url).save_frame(&frame, &measurements).unwrap();
        let raw = server.join().unwrap();

        assert!(raw.starts_with("POST /session/save-measured-frame "));
        assert!(raw.contains(r#""frame_idx":42"#));
        assert!(raw.contains(r#""override_existing":true"#));
        assert!(raw.contains(r#""angle_a":30.0"#));
    }

    #[test]
    fn test_save_canvas_frame_uploads_image() {
        let (url, server) = serve_once("200 OK", r#"{"frame_id": "abc"}"#);
        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbaImage::from_raw(1, 1, vec![255, 0, 0, 255])
            .unwrap()
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        let png = png.into_inner();
        let mut frame = FrameContext::new(7, 0.25, FrameSource::Canvas { image: png });
        frame.custom_name = Some("Rest".to_string());

        client(&url)
            .save_frame(&frame, &Measurements::default())
            .unwrap();
        let raw = server.join().unwrap();

        assert!(raw.starts_with("POST /session/save-canvas-frame "));
        assert!(raw.contains("multipart/form-data; boundary="));
        assert!(raw.contains("name=\"custom_name\"\r\n\r\nRest"));
        assert!(raw.contains("filename=\"frame_7.png\"\r\nContent-Type: image/png"));
    }

    #[test]
    fn test_capture_frame_query() {
        let (url, server) = serve_once("200 OK", "imagebytes");

        let bytes = client(&url).capture_frame(2.5, 75).unwrap();
        let raw = server.join().unwrap();

        assert_eq!(bytes, b"imagebytes");
        assert!(raw.starts_with("GET /frame-capture/?timestamp=2.5&frame_idx=75 "));
    }
}

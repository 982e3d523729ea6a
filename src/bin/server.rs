use std::net::SocketAddr;

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use base64::Engine;
use glam::Vec2;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use sketchbook::Timing;
use sketchbook::config::{DungeonParams, ScrollParams};
use sketchbook::dungeon::Cell;

#[derive(Deserialize)]
struct DungeonRequest {
    seed: Option<u64>,
    #[serde(flatten)]
    params: DungeonParams,
}

#[derive(Serialize)]
struct DungeonResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
    carved: usize,
}

#[derive(Serialize)]
struct ScrollResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
    p0: Vec2,
    p1: Vec2,
    control_len: f32,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("request failed: {}", self.message);
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn timing_entries(timings: &[Timing]) -> Vec<TimingEntry> {
    timings
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect()
}

async fn dungeon_handler(Json(req): Json<DungeonRequest>) -> Result<Json<DungeonResponse>, ApiError> {
    let seed = req.seed.unwrap_or(42);
    let params = req.params;

    let response = tokio::task::spawn_blocking(move || {
        let (sketch, timings) = sketchbook::generate_dungeon(seed, &params);

        let grid = &sketch.dungeon.grid;
        let cells = (0..grid.h)
            .map(|y| grid.data[y * grid.w..(y + 1) * grid.w].to_vec())
            .collect();

        let layers = vec![Layer {
            name: "dungeon".into(),
            data_url: encode_png(&sketch.rgba, sketch.w, sketch.h).map_err(ApiError::internal)?,
        }];

        Ok::<_, ApiError>(DungeonResponse {
            layers,
            timings: timing_entries(&timings),
            width: sketch.w,
            height: sketch.h,
            cells,
            carved: sketch.walk.carved,
        })
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(Json(response))
}

async fn scroll_handler(Json(params): Json<ScrollParams>) -> Result<Json<ScrollResponse>, ApiError> {
    let response = tokio::task::spawn_blocking(move || {
        let (sketch, timings) = sketchbook::generate_scroll(&params).map_err(|e| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        })?;

        let layers = vec![Layer {
            name: "scroll".into(),
            data_url: encode_png(&sketch.rgba, sketch.w, sketch.h).map_err(ApiError::internal)?,
        }];

        let junction = sketch.path.junction;
        Ok::<_, ApiError>(ScrollResponse {
            layers,
            timings: timing_entries(&timings),
            width: sketch.w,
            height: sketch.h,
            p0: junction.p0,
            p1: junction.p1,
            control_len: junction.control_len,
        })
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(Json(response))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = Router::new()
        .route("/api/dungeon", post(dungeon_handler))
        .route("/api/scroll", post(scroll_handler))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    log::info!("sketchbook server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

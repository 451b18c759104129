//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Extension, Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::middleware::RequestId;
use super::types::*;
use crate::core::scanner::WalletScanner;
use crate::models::errors::ErrorCode;
use crate::models::types::ScanResult;
use crate::utils::constants::APP_VERSION;

type ErrorResponse = (StatusCode, Json<ApiResponse<()>>);

/// Shared application state
pub struct AppState {
    pub scanner: WalletScanner,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(scanner: WalletScanner) -> Self {
        Self {
            scanner,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start), request_id))
}

// ============================================
// Wallet Deep Scan
// ============================================

/// Unreadable body or invalid address → 400; every other outcome is a 200 with a possibly degraded result
pub async fn scan_wallet(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Result<Json<WalletScanRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ScanResult>>, ErrorResponse> {
    let start = Instant::now();
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("🚫 [{}] Rejected scan body: {}", request_id, rejection.body_text());
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    ApiError::bad_request(rejection.body_text()),
                    elapsed_ms(start),
                    request_id,
                )),
            ));
        }
    };
    info!("📥 [{}] Scan request for {}", request_id, req.address.trim());

    match state.scanner.scan(&req.address, req.chain.as_deref()).await {
        Ok(result) => Ok(Json(ApiResponse::success(result, elapsed_ms(start), request_id))),
        Err(e) => {
            let status = StatusCode::from_u16(e.code.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if e.code == ErrorCode::InvalidAddress {
                warn!("🚫 [{}] {}", request_id, e);
            } else {
                error!("❌ [{}] Scan failed: {}", request_id, e);
            }
            Err((
                status,
                Json(ApiResponse::error(ApiError::from(&e), elapsed_ms(start), request_id)),
            ))
        }
    }
}

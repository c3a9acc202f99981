//! Dashboard, sales, and profit-report routes.

use axum::{Json, extract::State};

use crate::db::StatsRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{DashboardStats, ProfitReport, SalesStats};
use crate::state::AppState;

/// GET /api/dashboard
///
/// # Errors
///
/// 500 on database failure.
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let stats = StatsRepository::new(state.pool()).dashboard().await?;
    Ok(Json(stats))
}

/// GET /api/sales
///
/// # Errors
///
/// 500 on database failure.
pub async fn sales(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<SalesStats>> {
    let stats = StatsRepository::new(state.pool()).sales().await?;
    Ok(Json(stats))
}

/// GET /api/reports
///
/// # Errors
///
/// 500 on database failure.
pub async fn reports(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ProfitReport>> {
    let report = StatsRepository::new(state.pool()).profit_report().await?;
    Ok(Json(report))
}

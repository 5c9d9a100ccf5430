use crate::board::build_board;
use crate::errors::AppError;
use crate::models::{Board, PageviewsResponse};
use crate::pageviews::{load_pageviews, report_month};
use crate::state::AppState;
use crate::storage::{load_issues, read_data_file};
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let (records, pageviews) = tokio::join!(
        load_issues(&state.data_dir),
        load_pageviews(&state.data_dir)
    );
    let board = build_board(&records?);
    let month = report_month(Utc::now().date_naive());
    Ok(Html(render_index(&month, &pageviews, &board)))
}

pub async fn get_issues(State(state): State<AppState>) -> Result<Json<Board>, AppError> {
    let records = load_issues(&state.data_dir).await?;
    Ok(Json(build_board(&records)))
}

pub async fn get_pageviews(State(state): State<AppState>) -> Json<PageviewsResponse> {
    Json(load_pageviews(&state.data_dir).await)
}

pub async fn data_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = read_data_file(&state.data_dir, &filename).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}

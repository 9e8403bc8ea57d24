use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::templates::{self, Notice};
use crate::upload::MAX_UPLOAD_BYTES;
use crate::AppState;

/// Потолок всего тела запроса к админке: файл плюс остальные поля формы
pub const MAX_ADMIN_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn routes(path: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(path, get(login_form).post(submit).fallback(super::not_found))
        .layer(DefaultBodyLimit::max(MAX_ADMIN_BODY_BYTES))
}

/* ---------- extractor ---------- */

/// Файл из поля `csvfile`. Лишние байты сверх потолка не храним.
#[derive(Debug)]
pub enum CsvPart {
    Data(Vec<u8>),
    TooLarge,
}

/// POST на путь админки: либо вход (urlencoded), либо загрузка (multipart)
#[derive(Debug, Default)]
pub struct AdminSubmission {
    pub password: Option<String>,
    pub csv: Option<CsvPart>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    password: Option<String>,
}

// Ошибку чтения тела показываем на странице входа: пароль проверить нельзя
fn body_rejection(status: StatusCode) -> Response {
    let err = if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge
    } else {
        AppError::InvalidPassword
    };
    warn!("Unreadable admin form ({}): {}", status, err);
    Html(templates::admin_login_page(Some(&Notice::danger(err.to_string())))).into_response()
}

impl<S> FromRequest<S> for AdminSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status()))?;
            let form: LoginForm = serde_urlencoded::from_bytes(&body).unwrap_or_default();
            return Ok(Self { password: form.password, csv: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| body_rejection(e.status()))?;

        let mut submission = Self::default();
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| body_rejection(e.status()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("password") if submission.password.is_none() => {
                    let text = field.text().await.map_err(|e| body_rejection(e.status()))?;
                    submission.password = Some(text);
                }
                Some("csvfile") if submission.csv.is_none() => {
                    let mut data = Vec::new();
                    let mut too_large = false;
                    // Дочитываем поле до конца: пароль может идти после файла
                    while let Some(chunk) = field.chunk().await.map_err(|e| body_rejection(e.status()))? {
                        if too_large {
                            continue;
                        }
                        if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                            too_large = true;
                            data = Vec::new();
                        } else {
                            data.extend_from_slice(&chunk);
                        }
                    }
                    submission.csv = Some(if too_large { CsvPart::TooLarge } else { CsvPart::Data(data) });
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}

/* ---------- handlers ---------- */

// GET /<admin>
async fn login_form() -> Html<String> {
    Html(templates::admin_login_page(None))
}

// POST /<admin>
async fn submit(State(state): State<Arc<AppState>>, submission: AdminSubmission) -> Html<String> {
    let admin = &state.config.admin;

    // Пароль проверяется на каждом запросе, сессий нет
    if submission.password.as_deref() != Some(admin.password.as_str()) {
        warn!("Rejected admin request: invalid password");
        let notice = Notice::danger(AppError::InvalidPassword.to_string());
        return Html(templates::admin_login_page(Some(&notice)));
    }

    let path = admin.path();
    let Some(csv) = submission.csv else {
        return Html(templates::admin_upload_page(None, &path));
    };

    let notice = match replace_seats(&state, csv).await {
        Ok(count) => Notice::success(format!("Successfully uploaded {} records", count)),
        Err(AppError::Store(e)) => {
            error!("Seat replacement failed: {:?}", e);
            Notice::danger(format!("Error processing file: {}", AppError::Store(e)))
        }
        Err(e) => {
            warn!("Upload rejected: {}", e);
            Notice::danger(format!("Error: {}", e))
        }
    };

    Html(templates::admin_upload_page(Some(&notice), &path))
}

async fn replace_seats(state: &AppState, csv: CsvPart) -> AppResult<u64> {
    match csv {
        CsvPart::TooLarge => Err(AppError::FileTooLarge),
        CsvPart::Data(bytes) => state.uploads.process(&bytes).await,
    }
}

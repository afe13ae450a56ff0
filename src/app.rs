use axum::{
    Router,
    body::Bytes,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{Html, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::convert::{self, RenderMode};
use crate::mailer::Mailer;

const ATTACHMENT_FILENAME: &str = "table_image.jpeg";
const ATTACHMENT_MIME: &str = "image/jpeg";
const DEFAULT_BODY: &str = "Here is the image generated from the Excel file.";

pub struct AppState {
    mailer: Mailer,
}

#[derive(Serialize)]
struct ApiError {
    status: String,
    message: Option<String>,
}

/// Everything the upload form submits
#[derive(Default)]
struct UploadForm {
    file: Vec<u8>,
    email_to: String,
    user_name: String,
    email_body: String,
    image_type: String,
}

pub async fn run(addr: &str, mailer: Mailer) -> Result<(), Box<dyn std::error::Error>> {
    // Setup app state
    let app_state = Arc::new(AppState { mailer });

    // Build router
    let app = Router::new()
        .route("/", get(serve_upload_form))
        .route("/upload", post(handle_upload))
        .route("/api/render", post(api_render))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_upload_form() -> Html<String> {
    upload_page(None)
}

/// Re-render the upload form, optionally with an error banner
fn upload_page(error: Option<&str>) -> Html<String> {
    let page = include_str!("./static/upload.html");
    let banner = match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape_html(message)),
        None => String::new(),
    };
    Html(page.replace("<!--error-->", &banner))
}

// Parse errors can carry text taken from the uploaded file, so anything
// interpolated into the banner is escaped first.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Handle a form submission: parse the upload, render the selected image
/// and mail it to the recipient
async fn handle_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Html<String> {
    let form = collect_form(multipart).await;

    if form.file.is_empty() {
        return upload_page(Some("Please choose a spreadsheet file to upload."));
    }
    if form.email_to.is_empty() {
        return upload_page(Some("Please provide a recipient email address."));
    }

    let mode = RenderMode::from_form_value(&form.image_type);

    let image = match convert::render_spreadsheet(&form.file, mode) {
        Ok(image) => image,
        Err(e) => {
            log::error!("conversion failed: {:?}", e);
            return upload_page(Some(&e.user_message()));
        }
    };

    let subject = format!("Spreadsheet report - {}", form.user_name);
    let body = if form.email_body.is_empty() {
        DEFAULT_BODY.to_string()
    } else {
        form.email_body
    };

    match state.mailer.send_image(
        &form.email_to,
        &subject,
        &body,
        image.bytes,
        ATTACHMENT_FILENAME,
        ATTACHMENT_MIME,
    ) {
        Ok(()) => Html(include_str!("./static/success.html").to_string()),
        Err(e) => {
            log::error!("mail delivery failed: {:?}", e);
            upload_page(Some(&format!("An unexpected error occurred: {}", e)))
        }
    }
}

/// Render an upload directly to a JPEG response, without mailing it
///
/// Accepts the same multipart `file` field plus an optional `mode` field.
/// Failures come back as a JSON body with the user-facing message.
async fn api_render(multipart: Multipart) -> Response {
    let form = collect_form(multipart).await;

    if form.file.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file data received");
    }

    let mode = RenderMode::from_form_value(&form.image_type);

    match convert::render_spreadsheet(&form.file, mode) {
        Ok(image) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, ATTACHMENT_MIME)
            .body(axum::body::Body::from(Bytes::from(image.bytes)))
            .unwrap(),
        Err(e) => {
            log::error!("render failed: {:?}", e);
            let status = match e {
                crate::error::ConvertError::MissingColumns(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, &e.user_message())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_string(&ApiError {
                status: "error".to_string(),
                message: Some(message.to_string()),
            })
            .unwrap(),
        ))
        .unwrap()
}

/// Pull the known fields out of the multipart form data
async fn collect_form(mut multipart: Multipart) -> UploadForm {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => form.file = field.bytes().await.unwrap_or_default().to_vec(),
            "email_to" => form.email_to = field.text().await.unwrap_or_default(),
            "user_name" => form.user_name = field.text().await.unwrap_or_default(),
            "email_body" => form.email_body = field.text().await.unwrap_or_default(),
            "image_type" | "mode" => form.image_type = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    form
}

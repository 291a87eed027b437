use moon::actix_web::error::{InternalError, JsonPayloadError};
use moon::actix_web::{HttpRequest, HttpResponse, web};
use moon::*;
use shared::{DownMsg, LOG_ENDPOINT, LogRecord, LogResponse, UpMsg};

mod config;
mod log_file;

use config::{CONFIG_FILE_PATH, load_config};
use log_file::{LogFile, LogFileError};

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Valve Schematic Control")
        .index_by_robots(false)
}

static LOG_FILE: Lazy<LogFile> = Lazy::new(|| {
    let config = load_config(CONFIG_FILE_PATH);
    log::info!("Activity log file: {}", config.log_file.display());
    LogFile::new(config.log_file)
});

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);

    let down_msg = match req.up_msg {
        UpMsg::AppendLog(record) => match append_record(&record).await {
            Ok(()) => DownMsg::LogAppended,
            Err(error) => DownMsg::LogFileError(error.to_string()),
        },
        UpMsg::TruncateLog => match truncate_log().await {
            Ok(()) => DownMsg::LogTruncated,
            Err(error) => DownMsg::LogFileError(error.to_string()),
        },
    };
    send_down_msg(down_msg, session_id, cor_id).await;
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        log::debug!("Session is gone, dropping {msg:?}");
    }
}

async fn append_record(record: &LogRecord) -> Result<(), LogFileError> {
    LOG_FILE.append(record).await.inspect_err(|error| log::error!("{error}"))
}

async fn truncate_log() -> Result<(), LogFileError> {
    LOG_FILE.truncate().await.inspect_err(|error| log::error!("{error}"))
}

// ===== HTTP ENDPOINT =====

fn log_response(result: Result<(), LogFileError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(LogResponse::ok()),
        Err(error) => HttpResponse::InternalServerError().json(LogResponse::failed(error)),
    }
}

async fn append_log_route(record: web::Json<LogRecord>) -> HttpResponse {
    log_response(append_record(&record).await)
}

async fn truncate_log_route() -> HttpResponse {
    log_response(truncate_log().await)
}

/// Malformed bodies answer in the same JSON shape as write failures.
fn malformed_body(error: JsonPayloadError, _request: &HttpRequest) -> moon::actix_web::Error {
    let response = HttpResponse::InternalServerError().json(LogResponse::failed(&error));
    InternalError::from_response(error, response).into()
}

fn log_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(malformed_body);
    cfg.service(
        web::resource(LOG_ENDPOINT)
            .app_data(json_config)
            .route(web::post().to(append_log_route))
            .route(web::delete().to(truncate_log_route)),
    );
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, log_routes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use moon::actix_web::body::to_bytes;
    use moon::actix_web::http::StatusCode;
    use moon::actix_web::test::TestRequest;
    use std::path::PathBuf;

    async fn body(response: HttpResponse) -> LogResponse {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn successful_write_answers_ok() {
        let response = log_response(Ok(()));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, LogResponse::ok());
    }

    #[tokio::test]
    async fn failed_write_answers_500_with_message() {
        let error = LogFileError::Write {
            path: PathBuf::from("valve-log.txt"),
            source: std::io::Error::other("disk full"),
        };
        let response = log_response(Err(error));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body(response).await;
        assert!(!body.success);
        assert_eq!(
            body.error.as_deref(),
            Some("failed to write log file 'valve-log.txt': disk full")
        );
    }

    #[tokio::test]
    async fn malformed_body_answers_500_in_log_response_shape() {
        let request = TestRequest::default().to_http_request();
        let error = malformed_body(JsonPayloadError::ContentType, &request);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body(response).await;
        assert!(!body.success);
        assert!(body.error.is_some());
    }
}

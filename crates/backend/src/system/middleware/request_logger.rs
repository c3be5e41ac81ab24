use axum::body::to_bytes;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};

use crate::shared::format::format_number;
use crate::system::state::SharedState;

/// Middleware для логирования HTTP запросов
///
/// Выводит в консоль:
/// - Timestamp (в смещении из `[server] utc_offset_hours`)
/// - Длительность (ms)
/// - Размер ответа (форматированный)
/// - Статус код, метод и путь
pub async fn request_logger(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let offset = Duration::hours(i64::from(state.config.server.utc_offset_hours));

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            let timestamp = Utc::now() + offset;
            println!(
                "\x1b[33m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
                timestamp.format("%H:%M:%S"),
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                uri.path()
            );
            tracing::warn!("Failed to buffer response body for {}: {}", uri.path(), e);
            return Response::from_parts(parts, Body::default());
        }
    };

    let timestamp = Utc::now() + offset;
    // голубой для 2xx, коричневый для остальных
    let color_code = if parts.status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        timestamp.format("%H:%M:%S"),
        start.elapsed().as_millis(),
        format_number(bytes.len()),
        parts.status.as_u16(),
        method,
        uri.path()
    );

    Response::from_parts(parts, Body::from(bytes))
}

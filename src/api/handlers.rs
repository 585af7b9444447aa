//! Route handlers.
//!
//! Handlers read or mutate collaborator state through `AppState`, then write
//! exactly one JSON response into the context. Client-visible failures are
//! raised as `ApiError` and rendered by the error-boundary step.

use axum::http::{HeaderValue, StatusCode};
use chrono::Utc;
use futures_util::StreamExt;
use serde_json::json;

use crate::api::types::{BroadcastRequest, DashboardResponse, StartDemoRequest, UpdateDemoRequest};
use crate::broadcast::BroadcastEvent;
use crate::error::ApiError;
use crate::http::context::RequestContext;
use crate::http::server::AppState;
use crate::routing::router::HandlerFuture;

pub fn health<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        ctx.json(
            StatusCode::OK,
            &json!({
                "status": "ok",
                "message": format!("classroom bridge for {} is running", state.config.classroom.class_name),
            }),
        )
    })
}

pub fn progress<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let student_id = state.records.get_or_create_student_id();
        match state.records.load_student_data(&student_id) {
            Some(record) => ctx.json(StatusCode::OK, &record),
            None => ctx.json(StatusCode::OK, &json!({})),
        }
    })
}

pub fn teacher_students<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move { ctx.json(StatusCode::OK, &state.records.all_student_stats()) })
}

pub fn class_stats<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move { ctx.json(StatusCode::OK, &state.records.class_stats()) })
}

pub fn warnings<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move { ctx.json(StatusCode::OK, &state.records.early_warnings()) })
}

pub fn dashboard<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let response = DashboardResponse {
            class_stats: state.records.class_stats(),
            students: state.records.all_student_stats(),
            warnings: state.records.early_warnings(),
            last_updated: Utc::now(),
        };
        ctx.json(StatusCode::OK, &response)
    })
}

pub fn teacher_broadcast<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let payload: BroadcastRequest = ctx.json_body()?;

        let delivered = state.hub.publish(&BroadcastEvent::TeacherBroadcast {
            message: payload.message.clone(),
            message_type: payload.message_type.clone(),
        });

        if payload.message_type == "urgent" {
            state.notifier.notify(&payload.message, true);
        }

        ctx.json(
            StatusCode::OK,
            &json!({ "success": true, "recipientCount": delivered }),
        )
    })
}

pub fn prompt_catalog<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move { ctx.json(StatusCode::OK, &state.prompts.catalog()) })
}

pub fn prompt_by_type<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let prompt_type = ctx.param("type").unwrap_or_default().to_string();
        match state.prompts.prompt(&prompt_type) {
            Some(content) => ctx.json(
                StatusCode::OK,
                &json!({ "type": prompt_type, "content": content }),
            ),
            None => Err(ApiError::NotFound(format!(
                "Unknown prompt type: {prompt_type}"
            ))),
        }
    })
}

pub fn adaptive_prompts<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let raw = ctx.param("yearLevel").unwrap_or_default().to_string();
        let year_level: u32 = raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid year level: {raw}")))?;

        match state.prompts.adaptive_prompts(year_level) {
            Some(prompts) => ctx.json(
                StatusCode::OK,
                &json!({ "yearLevel": year_level, "prompts": prompts }),
            ),
            None => Err(ApiError::NotFound(format!(
                "No adaptive prompts for year level {year_level}"
            ))),
        }
    })
}

pub fn live_demo_start<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let payload: StartDemoRequest = ctx.json_body()?;
        let demo_state = state.live_demo.start(payload.title, payload.language);
        ctx.json(
            StatusCode::OK,
            &json!({ "success": true, "state": demo_state }),
        )
    })
}

pub fn live_demo_stop<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        state.live_demo.stop();
        ctx.json(StatusCode::OK, &json!({ "success": true }))
    })
}

pub fn live_demo_state<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move { ctx.json(StatusCode::OK, &state.live_demo.state()) })
}

pub fn live_demo_update<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let payload: UpdateDemoRequest = ctx.json_body()?;
        state.live_demo.update(payload.code)?;
        ctx.json(StatusCode::OK, &json!({ "success": true }))
    })
}

/// The persistent one-way broadcast channel: an SSE stream that stays open
/// until the client disconnects. Dropping the stream unsubscribes from the
/// hub.
pub fn subscribe_events<'a>(state: &'a AppState, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
    Box::pin(async move {
        let subscription = state.hub.subscribe();
        let frames = subscription
            .into_frame_stream()
            .map(Ok::<_, std::convert::Infallible>)
            .boxed();

        ctx.insert_response_header(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        );
        ctx.stream(HeaderValue::from_static("text/event-stream"), frames);
        Ok(())
    })
}

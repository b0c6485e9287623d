//! Dialogflow ES fulfillment webhook.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use storebot_chat::{replies::clarification, Intent};

use super::AppState;
use crate::middleware::RequestId;

pub(super) const INVALID_REQUEST_TEXT: &str = "⚠️ Invalid request.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookRequest {
    #[serde(default)]
    query_result: QueryResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    #[serde(default)]
    query_text: String,
    #[serde(default)]
    intent: IntentRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentRef {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookResponse {
    fulfillment_text: String,
    fulfillment_messages: [FulfillmentMessage; 1],
    source: &'static str,
}

#[derive(Debug, Serialize)]
struct FulfillmentMessage {
    text: FulfillmentText,
}

#[derive(Debug, Serialize)]
struct FulfillmentText {
    text: [String; 1],
}

impl WebhookResponse {
    fn new(answer: String) -> Self {
        Self {
            fulfillment_messages: [FulfillmentMessage {
                text: FulfillmentText {
                    text: [answer.clone()],
                },
            }],
            fulfillment_text: answer,
            source: "webhook",
        }
    }
}

pub(super) async fn fulfill(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "invalid webhook body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "fulfillmentText": INVALID_REQUEST_TEXT })),
            )
                .into_response();
        }
    };

    let query = request.query_result.query_text;
    let intent_name = request.query_result.intent.display_name;
    tracing::info!(
        request_id = %req_id.0,
        intent = %intent_name,
        query = %query,
        "webhook query"
    );

    let engine = &state.engine;
    let answer = match engine
        .respond(Intent::from_display_name(&intent_name), &query)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "chat engine failed");
            clarification(engine.language_of(&query)).to_string()
        }
    };

    tracing::debug!(request_id = %req_id.0, answer = %answer, "webhook reply");
    Json(WebhookResponse::new(answer)).into_response()
}

pub(super) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Only POST allowed" })),
    )
        .into_response()
}

//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! Every connection gets its own learner id unless messages carry `learnerId`.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic;
use crate::state::AppState;
use crate::util::learner_or;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "lean_trainer", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let connection_learner = Uuid::new_v4().to_string();
  info!(target: "lean_trainer", learner = %connection_learner, "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "lean_trainer", kind = incoming.kind(), code_len = ?incoming.code_len(), "WS received");
            handle_client_ws(incoming, &state, &connection_learner).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "lean_trainer", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "lean_trainer", learner = %connection_learner, "WebSocket disconnected");
}

#[instrument(level = "info", skip(msg, state), fields(kind = msg.kind(), code_len = ?msg.code_len()))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, connection_learner: &str) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Submit { exercise_id, code, learner_id } => {
      let learner = learner_or(learner_id.as_deref(), connection_learner);
      match logic::submit_exercise(state, learner, &exercise_id, &code).await {
        Ok(result) => {
          info!(target: "grader", exercise = %exercise_id, %learner, success = result.report.success, "WS submit evaluated");
          ServerWsMessage::SubmitResult { result }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Run { code } => ServerWsMessage::RunResult { report: logic::run_code(state, &code) },

    ClientWsMessage::Hint { exercise_id, index } => match logic::hint(state, &exercise_id, index) {
      Ok(hint) => ServerWsMessage::Hint { hint },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Solution { exercise_id } => match logic::reveal_solution(state, &exercise_id) {
      Ok(solution) => ServerWsMessage::Solution { solution },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Progress { learner_id } => {
      let learner = learner_or(learner_id.as_deref(), connection_learner);
      ServerWsMessage::Progress { progress: logic::progress_for(state, learner).await }
    }
  }
}

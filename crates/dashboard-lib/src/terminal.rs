//! Simulated pod terminal over a websocket
//!
//! Frames are JSON envelopes `{"event": ..., "data": {...}}`. The only
//! inbound event is `terminal_command` with `{pod, command}`; every inbound
//! frame gets exactly one `terminal_output` reply with `{output}`. Nothing
//! is executed: output is scripted from the pod name and command.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::gate::{CommandGate, CommandToken, RejectionReason};
use crate::observability::{DashboardMetrics, StructuredLogger};

/// Outbound queue depth per connection
const OUTBOUND_BUFFER: usize = 32;

/// Canned listing for `ls`
const LS_OUTPUT: &str = "file1.txt file2.log\n";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalCommand {
    #[serde(default)]
    pub pod: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalOutput {
    pub output: String,
}

/// Client to server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    TerminalCommand(TerminalCommand),
}

/// Server to client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    TerminalOutput(TerminalOutput),
}

impl ServerEvent {
    pub fn output(text: impl Into<String>) -> Self {
        ServerEvent::TerminalOutput(TerminalOutput {
            output: text.into(),
        })
    }

    pub fn text(&self) -> &str {
        match self {
            ServerEvent::TerminalOutput(out) => &out.output,
        }
    }
}

/// Scripted output for a command that passed the gate
pub fn render_output(token: &CommandToken) -> String {
    let mut output = format!("$ {}\nExecuting in pod {}\n", token.raw, token.pod);
    if token.token == "ls" {
        output.push_str(LS_OUTPUT);
    } else {
        output.push_str("Command executed\n");
    }
    output
}

/// Text shown to the client when the gate refuses a command
pub fn render_rejection(gate: &CommandGate, reason: &RejectionReason) -> String {
    match reason {
        RejectionReason::EmptyInput => "Error: Missing pod name or command".to_string(),
        RejectionReason::DisallowedCommand(_) => format!(
            "Error: Command not allowed. Allowed commands: {}",
            gate.allowed_list()
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    AwaitingCommand,
    Disconnected,
}

/// Per-connection terminal handler
///
/// Pure request/response over events; the socket pump in [`serve_socket`]
/// does the I/O.
pub struct TerminalSession {
    id: u64,
    state: SessionState,
    gate: CommandGate,
    logger: StructuredLogger,
    metrics: DashboardMetrics,
}

impl TerminalSession {
    pub fn new(id: u64, logger: StructuredLogger, metrics: DashboardMetrics) -> Self {
        Self {
            id,
            state: SessionState::Connected,
            gate: CommandGate::new(),
            logger,
            metrics,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Log the connection and start accepting commands
    pub fn connect(&mut self) {
        self.logger.log_client_connected(self.id);
        self.state = SessionState::AwaitingCommand;
    }

    pub fn disconnect(&mut self) {
        if self.state != SessionState::Disconnected {
            self.logger.log_client_disconnected(self.id);
            self.state = SessionState::Disconnected;
        }
    }

    /// Handle one raw text frame
    ///
    /// Frames that do not parse still get an error reply; the connection
    /// stays open. Returns `None` once disconnected.
    pub fn handle_text(&mut self, text: &str) -> Option<ServerEvent> {
        if self.state == SessionState::Disconnected {
            return None;
        }

        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.handle(event),
            Err(e) => {
                debug!(session_id = self.id, error = %e, "Malformed terminal frame");
                self.metrics.inc_terminal_command("invalid");
                Some(ServerEvent::output(format!("Error: {}", e)))
            }
        }
    }

    pub fn handle(&mut self, event: ClientEvent) -> Option<ServerEvent> {
        if self.state == SessionState::Disconnected {
            return None;
        }

        match event {
            ClientEvent::TerminalCommand(request) => Some(self.run_command(request)),
        }
    }

    fn run_command(&mut self, request: TerminalCommand) -> ServerEvent {
        let pod = request.pod.unwrap_or_default();
        let command = request.command.unwrap_or_default();

        match self.gate.validate(&pod, &command) {
            Ok(token) => {
                self.metrics.inc_terminal_command("executed");
                self.logger
                    .log_terminal_command(self.id, &pod, &command, "executed");
                ServerEvent::output(render_output(&token))
            }
            Err(reason) => {
                self.metrics.inc_terminal_command("rejected");
                self.logger
                    .log_terminal_command(self.id, &pod, &command, "rejected");
                ServerEvent::output(render_rejection(&self.gate, &reason))
            }
        }
    }
}

/// Drive a session over a websocket until the client goes away
///
/// Replies go through a per-connection channel to a writer task, so the
/// reader never blocks on a slow client socket.
pub async fn serve_socket(socket: WebSocket, mut session: TerminalSession) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER);
    let session_id = session.id();

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(session_id, error = %e, "Failed to encode terminal event");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    session.connect();

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Some(reply) = session.handle_text(&text) {
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(session_id, error = %e, "Websocket read failed");
                break;
            }
        }
    }

    session.disconnect();
    drop(tx);
    if let Err(e) = writer.await {
        warn!(session_id, error = %e, "Terminal writer task failed");
    }
}

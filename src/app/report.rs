use std::io::{self, Stdout, Write};

use serde_json::json;

use crate::command::ActionId;
use crate::error::{AppError, AppResult};
use crate::event::AppEvent;
use crate::nav::NavEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Writes application events as lines. Lines end in `\r\n` because the
/// terminal is in raw mode while the loop runs.
pub struct Reporter<W: Write> {
    format: ReportFormat,
    out: W,
}

impl Reporter<Stdout> {
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(format: ReportFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn emit_all(&mut self, events: &[AppEvent]) -> AppResult<()> {
        for event in events {
            if let Some(line) = format_event(self.format, event)? {
                write!(self.out, "{line}\r\n")?;
            }
        }
        if !events.is_empty() {
            self.out.flush()?;
        }
        Ok(())
    }

    /// Free-form text for humans; dropped in JSON mode.
    pub fn note(&mut self, message: &str) -> AppResult<()> {
        if self.format == ReportFormat::Text {
            write!(self.out, "{message}\r\n")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders one event, or `None` for events the format leaves out. Text
/// output skips the per-tick command record.
pub fn format_event(format: ReportFormat, event: &AppEvent) -> AppResult<Option<String>> {
    match format {
        ReportFormat::Text => Ok(format_text(event)),
        ReportFormat::Json => format_json(event).map(Some),
    }
}

fn format_text(event: &AppEvent) -> Option<String> {
    let line = match event {
        AppEvent::SessionChanged { active: true } => "session active".to_string(),
        AppEvent::SessionChanged { active: false } => "session inactive".to_string(),
        AppEvent::Nav(NavEvent::BoundsChanged { bounds }) if bounds.is_empty() => {
            "bounds hidden".to_string()
        }
        AppEvent::Nav(NavEvent::BoundsChanged { bounds }) => format!(
            "bounds {},{} {}x{}",
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height()
        ),
        AppEvent::Nav(NavEvent::MotionStarted) => "motion started".to_string(),
        AppEvent::Nav(NavEvent::MotionStopped) => "motion stopped".to_string(),
        AppEvent::Nav(NavEvent::CommandExecuted {
            id: ActionId::MotionTick,
            ..
        }) => return None,
        AppEvent::Nav(NavEvent::CommandExecuted { id, outcome }) => {
            format!("{} {}", id.as_str(), outcome.as_str())
        }
    };
    Some(line)
}

fn format_json(event: &AppEvent) -> AppResult<String> {
    let encoded = match event {
        AppEvent::SessionChanged { active } => {
            serde_json::to_string(&json!({ "event": "session-changed", "active": active }))
        }
        AppEvent::Nav(event) => serde_json::to_string(event),
    };
    encoded.map_err(|err| AppError::io_with_context(err.into(), "failed to encode event"))
}

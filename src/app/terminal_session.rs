use std::io::{self, Stdout};

use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};
use tracing::warn;

use crate::error::AppResult;

/// Raw-mode terminal for the lifetime of the loop. Key-release reporting is
/// requested when the terminal supports it; without it, manual motion only
/// stops on another command.
pub(crate) struct TerminalSession {
    stdout: Stdout,
    enhanced: bool,
    active: bool,
}

impl TerminalSession {
    pub(crate) fn enter() -> AppResult<Self> {
        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if enhanced
            && let Err(err) = execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )
        {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        if !enhanced {
            warn!("terminal does not report key releases; release-to-stop motion is unavailable");
        }

        Ok(Self {
            stdout,
            enhanced,
            active: true,
        })
    }

    pub(crate) fn supports_key_release(&self) -> bool {
        self.enhanced
    }

    pub(crate) fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        if self.enhanced {
            execute!(self.stdout, PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        self.active = false;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

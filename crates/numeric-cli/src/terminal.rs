use std::{
    io::{self, Write as _},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, ClearType},
};
use numeric_search::{
    cancel::Cancellation,
    solver::{ProgressReporter, SearchStatus},
};

/// Watches the keyboard for a stop request while the search runs.
///
/// Puts the terminal in raw mode so single key presses are seen without
/// waiting for Enter. Raw mode is restored by [`KeyWatcher::cleanup`] or on drop.
pub(crate) struct KeyWatcher {
    disabled: bool,
    stopped: bool,
}

impl KeyWatcher {
    pub(crate) fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            disabled: false,
            stopped: false,
        })
    }

    pub(crate) fn cleanup(mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        self.disabled = true;
        Ok(())
    }

    #[expect(clippy::unused_self)]
    fn try_read(&mut self) -> io::Result<Option<KeyEvent>> {
        while event::poll(Duration::from_millis(0))? {
            if let Some(event) = event::read()?.as_key_event()
                && event.kind == KeyEventKind::Press
            {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

fn is_stop_key(event: &KeyEvent) -> bool {
    match event.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl Cancellation for KeyWatcher {
    fn is_cancelled(&mut self) -> bool {
        while !self.stopped {
            match self.try_read() {
                Ok(Some(event)) => self.stopped = is_stop_key(&event),
                Ok(None) => break,
                // Esc can no longer arrive.
                Err(_) => self.stopped = true,
            }
        }
        self.stopped
    }
}

impl Drop for KeyWatcher {
    fn drop(&mut self) {
        if !self.disabled {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Rewrites a single status line on stderr.
#[derive(Debug, Default)]
pub(crate) struct StatusDisplay {
    started: bool,
}

impl StatusDisplay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Moves past the status line so later output starts on a fresh line.
    pub(crate) fn finish(self) {
        if self.started {
            let mut stderr = io::stderr().lock();
            let _ = queue!(stderr, Print("\r\n"));
            let _ = stderr.flush();
        }
    }
}

pub(crate) fn format_status(status: &SearchStatus) -> String {
    format!(
        "Generation: {}  Successes: {}  Fitness: {}  Size: {}",
        status.generation, status.successes, status.fitness, status.size
    )
}

impl ProgressReporter for StatusDisplay {
    fn report(&mut self, status: &SearchStatus) {
        self.started = true;
        let mut stderr = io::stderr().lock();
        // Best effort: a failed status write must not stop the search.
        let _ = queue!(
            stderr,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(format_status(status)),
        );
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_keys() {
        assert!(is_stop_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_stop_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_stop_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
        assert!(!is_stop_key(&KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_format_status() {
        let status = SearchStatus {
            generation: 20_000,
            successes: 7,
            fitness: 883.0,
            size: 3,
        };
        assert_eq!(
            format_status(&status),
            "Generation: 20000  Successes: 7  Fitness: 883  Size: 3"
        );
    }
}

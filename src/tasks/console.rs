//! Console countdown renderer

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, time::sleep};
use tracing::{debug, info};

use crate::{
    clock::Clock,
    display::{CountdownDisplay, DisplayStatus, FlipBoard},
};

/// Turns display frames into log lines, one per committed change
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    board: FlipBoard,
    last_line: Option<(String, DisplayStatus)>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame at `now`; returns a line when the committed view changed
    pub fn render(&mut self, frame: &CountdownDisplay, now: i64) -> Option<String> {
        self.board.update(&frame.text(), now);
        self.board.tick(now);

        let line = (self.board.shown(), frame.status);
        if self.last_line.as_ref() == Some(&line) {
            return None;
        }
        let text = format!("{} [{}]", line.0, line.1.label());
        self.last_line = Some(line);
        Some(text)
    }

    /// Milliseconds until the next pending flip completes
    pub fn next_flip_in(&self, now: i64) -> Option<i64> {
        self.board.next_deadline().map(|deadline| (deadline - now).max(0))
    }
}

/// Log the main countdown as it changes, with flip-card timing
pub async fn console_countdown_task<C: Clock>(mut frames: watch::Receiver<CountdownDisplay>, clock: Arc<C>) {
    info!("Starting console countdown");
    let mut renderer = ConsoleRenderer::new();

    loop {
        let frame = frames.borrow_and_update().clone();
        let now = clock.now_ms();
        if let Some(line) = renderer.render(&frame, now) {
            info!("{}", line);
        }

        let flip_wait = renderer.next_flip_in(now);
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    debug!("Display closed, console countdown stopped");
                    break;
                }
            }
            _ = sleep(Duration::from_millis(flip_wait.unwrap_or(0) as u64)), if flip_wait.is_some() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_renders_immediately() {
        let mut renderer = ConsoleRenderer::new();
        let line = renderer.render(&CountdownDisplay::new(false, 86_400_000), 0);
        assert_eq!(line.as_deref(), Some("24:00:00 [Ready]"));
        assert_eq!(renderer.render(&CountdownDisplay::new(false, 86_400_000), 10), None);
    }

    #[test]
    fn digit_changes_wait_for_the_flip() {
        let mut renderer = ConsoleRenderer::new();
        renderer.render(&CountdownDisplay::new(true, 10_000), 0);

        let frame = CountdownDisplay::new(true, 9_000);
        assert_eq!(renderer.render(&frame, 1_000), None);
        assert_eq!(renderer.next_flip_in(1_000), Some(600));
        assert_eq!(renderer.render(&frame, 1_600).as_deref(), Some("00:00:09 [Running]"));
        assert_eq!(renderer.next_flip_in(1_600), None);
    }

    #[test]
    fn status_change_renders_without_digit_change() {
        let mut renderer = ConsoleRenderer::new();
        renderer.render(&CountdownDisplay::new(true, 30_000), 0);
        let line = renderer.render(&CountdownDisplay::new(false, 30_000), 5);
        assert_eq!(line.as_deref(), Some("00:00:30 [Paused]"));
    }
}

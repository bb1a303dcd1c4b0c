//! "Thinking" indicator shown while waiting for the first reply token.
//!
//! The indicator runs on its own task and redraws a single line with
//! carriage returns. Stopping it is a two-phase handshake: the requester sends
//! a stop request and then waits for the task to acknowledge that it has
//! replaced the animation with the bare assistant label. Once [`StopSignal::stop`]
//! returns, the task writes nothing else, so reply text printed afterwards can
//! never be interleaved with an animation frame.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::ui::console::Console;

pub const DEFAULT_LABEL: &str = "Doubao: ";
pub const DEFAULT_THINKING_TEXT: &str = "thinking";
pub const DEFAULT_FRAMES: &[&str] = &[".", "..", "...", "...."];
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Something that can be asked to stop and waited on until it has.
#[async_trait]
pub trait StopSignal: Send {
    /// Request a stop and wait for the acknowledgement. Calling this again
    /// after the first stop returns immediately.
    async fn stop(&mut self);
}

#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub label: String,
    pub thinking_text: String,
    pub frames: Vec<String>,
    pub interval: Duration,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            thinking_text: DEFAULT_THINKING_TEXT.to_string(),
            frames: DEFAULT_FRAMES.iter().map(|f| f.to_string()).collect(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl IndicatorConfig {
    fn widest_frame(&self) -> usize {
        self.frames.iter().map(|f| f.width()).max().unwrap_or(0)
    }

    fn frame_line(&self, tick: usize) -> String {
        let frame = if self.frames.is_empty() {
            ""
        } else {
            self.frames[tick % self.frames.len()].as_str()
        };
        let padding = self.widest_frame().saturating_sub(frame.width());
        format!(
            "\r{}{}{}{}",
            self.label,
            self.thinking_text,
            frame,
            " ".repeat(padding)
        )
    }

    /// Blank out the animated suffix and leave the cursor after the label.
    fn stopped_line(&self) -> String {
        let suffix_width = self.thinking_text.width() + self.widest_frame();
        format!(
            "\r{}{}\r{}",
            self.label,
            " ".repeat(suffix_width),
            self.label
        )
    }
}

pub struct ThinkingIndicator {
    stop_tx: Option<oneshot::Sender<()>>,
    stopped_rx: Option<oneshot::Receiver<()>>,
    task: Option<JoinHandle<()>>,
}

impl ThinkingIndicator {
    /// Spawn the indicator task. Must be called from inside a tokio runtime.
    pub fn start(console: Console, config: IndicatorConfig) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();
        let task = tokio::spawn(animate(console, config, stop_rx, stopped_tx));

        Self {
            stop_tx: Some(stop_tx),
            stopped_rx: Some(stopped_rx),
            task: Some(task),
        }
    }

    /// Stop the animation (if still running) and join the task.
    pub async fn shutdown(mut self) {
        self.stop().await;
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("thinking indicator task failed: {err}");
            }
        }
    }
}

#[async_trait]
impl StopSignal for ThinkingIndicator {
    async fn stop(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            return;
        };

        // The task may already be gone; the acknowledgement channel then
        // resolves with an error instead of blocking.
        let _ = stop_tx.send(());
        if let Some(stopped_rx) = self.stopped_rx.take() {
            if stopped_rx.await.is_err() {
                debug!("thinking indicator exited without acknowledging stop");
            }
        }
    }
}

async fn animate(
    console: Console,
    config: IndicatorConfig,
    mut stop_rx: oneshot::Receiver<()>,
    stopped_tx: oneshot::Sender<()>,
) {
    if let Err(err) = console.print("\n") {
        debug!("failed to write thinking indicator: {err}");
    }

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                if let Err(err) = console.print(&config.frame_line(tick)) {
                    debug!("failed to write thinking indicator: {err}");
                }
                tick = tick.wrapping_add(1);
            }
        }
    }

    if let Err(err) = console.print(&config.stopped_line()) {
        debug!("failed to clear thinking indicator: {err}");
    }
    let _ = stopped_tx.send(());
}

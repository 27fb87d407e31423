//! Live preview for Markdown documents
//!
//! - `render.rs` - comrak HTML rendering and the preview block model
//! - `scheduler.rs` - quiet-period throttle for re-rendering
//! - `panel.rs` - egui drawing of preview blocks

mod panel;
mod render;
mod scheduler;

pub use panel::show_preview;
pub use render::render_html;

use render::{render_blocks, PreviewBlock};
use scheduler::PreviewScheduler;

use std::time::{Duration, Instant};

use log::debug;

/// Rendered preview plus its throttle.
#[derive(Debug, Default)]
pub struct Preview {
    scheduler: PreviewScheduler,
    blocks: Vec<PreviewBlock>,
}

impl Preview {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            scheduler: PreviewScheduler::from_millis(delay_ms),
            blocks: Vec::new(),
        }
    }

    pub fn set_delay(&mut self, delay_ms: u64) {
        self.scheduler.set_delay(Duration::from_millis(delay_ms));
    }

    pub fn blocks(&self) -> &[PreviewBlock] {
        &self.blocks
    }

    /// Note an edit; the preview refreshes after the quiet period.
    pub fn mark_changed(&mut self, now: Instant) {
        self.scheduler.mark_changed(now);
    }

    /// Render right away, skipping the throttle (document opened, preview
    /// toggled on).
    pub fn refresh(&mut self, markdown: &str) {
        self.blocks = render_blocks(markdown);
        debug!("Preview rendered: {} blocks", self.blocks.len());
    }

    /// Re-render when due. Returns the time until the next check is useful,
    /// if a render is still pending.
    pub fn update(&mut self, markdown: &str, now: Instant) -> Option<Duration> {
        if self.scheduler.take_due(now) {
            self.refresh(markdown);
        }
        self.scheduler.remaining(now)
    }
}

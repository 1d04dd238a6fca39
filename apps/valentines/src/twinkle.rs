//! Ambient twinkle: random heart pairs fade in, hold, and fade back out.
//!
//! Fade-outs are deferred tasks. They hold only the heart position and look
//! the cells up again when they fire, because by then the pointer or the
//! layout may have claimed them. Once every cell of a pair has been taken,
//! its fade-out is cancelled so it can never land on a later twinkle.

use std::collections::HashMap;

use lovegrid_engine::{Cell, DeferredQueue, Easing, FadeState, PatchBuffer, PatchSource, Rng, TaskId};

use crate::config::TwinkleConfig;
use crate::lattice::HeartPos;
use crate::layout::{CellMetrics, Viewport};
use crate::visibility::VisibilityStore;

const EASING: Easing = Easing::SineInOut;

/// Heart pairs whose every cell lies fully inside a viewport-sized window at
/// the grid origin. The grid offset plays no part.
pub fn visible_hearts(
    hearts: &[HeartPos],
    glyph_len: u32,
    viewport: &Viewport,
    metrics: &CellMetrics,
) -> Vec<HeartPos> {
    if !metrics.is_measured() {
        return Vec::new();
    }
    let (right, bottom) = (viewport.width, viewport.height);

    hearts
        .iter()
        .copied()
        .filter(|h| {
            let x0 = h.col as f32 * metrics.width;
            let x1 = (h.col + glyph_len) as f32 * metrics.width;
            let y0 = h.row as f32 * metrics.height;
            let y1 = (h.row + 1) as f32 * metrics.height;
            x0 >= 0.0 && x1 <= right && y0 >= 0.0 && y1 <= bottom
        })
        .collect()
}

pub struct TwinkleScheduler {
    config: TwinkleConfig,
    glyph_len: u32,
    fades: FadeState<Cell>,
    fade_outs: DeferredQueue<HeartPos>,
    /// Pending fade-out of each lit pair.
    pending: HashMap<HeartPos, TaskId>,
    /// Lit cell to the pair that lit it.
    owners: HashMap<Cell, HeartPos>,
    eligible: Vec<HeartPos>,
    /// Seconds between triggers; only meaningful while running.
    interval: f32,
    accumulator: f32,
    running: bool,
}

impl TwinkleScheduler {
    pub fn new(config: TwinkleConfig, glyph_len: u32) -> Self {
        Self {
            config,
            glyph_len,
            fades: FadeState::new(),
            fade_outs: DeferredQueue::new(),
            pending: HashMap::new(),
            owners: HashMap::new(),
            eligible: Vec::new(),
            interval: 0.0,
            accumulator: 0.0,
            running: false,
        }
    }

    /// Stop, then start over for a new viewport. Does nothing beyond the stop
    /// when metrics are unknown or no pair is visible.
    pub fn restart(
        &mut self,
        hearts: &[HeartPos],
        viewport: &Viewport,
        metrics: &CellMetrics,
        narrow: bool,
        patches: &mut PatchBuffer,
    ) {
        self.stop(patches);

        self.eligible = visible_hearts(hearts, self.glyph_len, viewport, metrics);
        if self.eligible.is_empty() {
            log::debug!("twinkle idle: no visible heart pairs");
            return;
        }

        let density = if narrow {
            self.config.narrow_density
        } else {
            self.config.wide_density
        };
        let active = ((self.eligible.len() as f32 * density).floor() as usize).max(1);
        self.interval = self.config.cycle_secs() / active as f32;
        self.running = self.interval > 0.0;
        log::debug!(
            "twinkle restarted: {} eligible, {} active, every {:.3}s",
            self.eligible.len(),
            active,
            self.interval
        );
    }

    /// Cancel every pending fade-out and hide whatever is still lit.
    pub fn stop(&mut self, patches: &mut PatchBuffer) {
        self.fade_outs.cancel_all();
        self.pending.clear();
        self.owners.clear();
        for cell in self.fades.clear() {
            patches.set(cell, 0.0, PatchSource::Twinkle);
        }
        self.eligible.clear();
        self.running = false;
        self.interval = 0.0;
        self.accumulator = 0.0;
    }

    /// Start one twinkle on a random eligible pair. Returns false without
    /// touching anything when the pair is reserved, revealed, or already lit.
    pub fn trigger(&mut self, rng: &mut Rng, store: &VisibilityStore) -> bool {
        if self.eligible.is_empty() {
            return false;
        }
        let heart = self.eligible[rng.next_int(self.eligible.len() as u32) as usize];
        let busy = heart.cells(self.glyph_len).any(|cell| {
            store.is_reserved(cell) || store.is_revealed(cell) || self.fades.contains(cell)
        });
        if busy {
            return false;
        }

        for cell in heart.cells(self.glyph_len) {
            self.fades.fade_to(cell, 1.0, self.config.fade_in_secs, EASING);
            self.owners.insert(cell, heart);
        }
        let task = self
            .fade_outs
            .schedule(self.config.fade_in_secs + self.config.hold_secs, heart);
        self.pending.insert(heart, task);
        true
    }

    /// One fixed step: fire due fade-outs, trigger new twinkles, advance fades.
    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut Rng,
        store: &VisibilityStore,
        patches: &mut PatchBuffer,
    ) {
        for heart in self.fade_outs.advance(dt) {
            self.pending.remove(&heart);
            for cell in heart.cells(self.glyph_len) {
                if self.owners.get(&cell) == Some(&heart) {
                    self.owners.remove(&cell);
                }
                if store.is_revealed(cell) || store.is_reserved(cell) || !self.fades.contains(cell) {
                    continue;
                }
                self.fades.fade_to(cell, 0.0, self.config.fade_out_secs, EASING);
            }
        }

        if self.running {
            self.accumulator += dt;
            while self.accumulator >= self.interval {
                self.accumulator -= self.interval;
                self.trigger(rng, store);
            }
        }

        self.fades.tick(dt, |cell, alpha| {
            patches.set(cell, alpha, PatchSource::Twinkle);
        });
    }

    /// Hand a cell over to the pointer. Returns true if it was twinkling.
    pub fn release(&mut self, cell: Cell) -> bool {
        self.disown(cell);
        self.fades.cancel(cell).is_some()
    }

    /// Forget which pair lit `cell`; cancel that pair's fade-out once none of
    /// its cells is left.
    fn disown(&mut self, cell: Cell) {
        let Some(heart) = self.owners.remove(&cell) else {
            return;
        };
        let still_lit = heart
            .cells(self.glyph_len)
            .any(|c| self.owners.get(&c) == Some(&heart));
        if still_lit {
            return;
        }
        if let Some(task) = self.pending.remove(&heart) {
            self.fade_outs.cancel(task);
        }
    }

    /// Drop and hide twinkles on cells that just became reserved.
    pub fn hide_reserved(&mut self, store: &VisibilityStore, patches: &mut PatchBuffer) -> usize {
        let covered: Vec<Cell> = self.fades.keys().filter(|&c| store.is_reserved(c)).collect();
        for &cell in &covered {
            self.disown(cell);
            self.fades.cancel(cell);
            patches.set(cell, 0.0, PatchSource::Reserved);
        }
        covered.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    /// Cells currently owned by a fade (rising, held or falling).
    pub fn lit_count(&self) -> usize {
        self.fades.len()
    }

    /// Sorted cells currently owned by a fade.
    pub fn lit_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.fades.keys().collect();
        cells.sort();
        cells
    }

    pub fn pending_fade_outs(&self) -> usize {
        self.fade_outs.len()
    }

    pub fn alpha(&self, cell: Cell) -> Option<f32> {
        self.fades.value(cell)
    }
}

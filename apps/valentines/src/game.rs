use glam::Vec2;
use lovegrid_engine::*;

use crate::config::GridConfig;
use crate::lattice::GridModel;
use crate::layout::{compute_layout, wrap_lines, wrap_width, CellMetrics, Layout, Viewport};
use crate::messages::{parse_route, share_url, MessageCatalog, MessageDeck, Route};
use crate::overlay::{OverlayState, ShareConfirm};
use crate::pointer::{PointerReveal, RevealDiff};
use crate::twinkle::TwinkleScheduler;
use crate::visibility::VisibilityStore;

// Game event kinds (Rust → host)
const EVENT_UI_CHANGED: f32 = 1.0;
const EVENT_SHARE_READY: f32 = 2.0;

// Custom event kinds (host → Rust)
const CUSTOM_NEW_MESSAGE: u32 = 1;
const CUSTOM_SHARE: u32 = 2;
const CUSTOM_CLIPBOARD_RESULT: u32 = 3;

// Named resources accepted by `load_data`
const DATA_MESSAGES: &str = "messages";
const DATA_CONFIG: &str = "config";

/// One visitor session: the glyph grid, its overlay and every trigger that
/// changes which glyphs are visible.
pub struct ValentineGrid {
    config: GridConfig,
    model: GridModel,
    store: VisibilityStore,
    pointer: PointerReveal,
    twinkle: TwinkleScheduler,
    catalog: Option<MessageCatalog>,
    deck: MessageDeck,
    route: Route,
    origin: String,
    viewport: Viewport,
    metrics: Option<CellMetrics>,
    layout: Option<Layout>,
    share_url: Option<String>,
    confirm: ShareConfirm,
}

impl ValentineGrid {
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    pub fn with_config(config: GridConfig) -> Self {
        let model = GridModel::build(config.rows, config.cols, &config.pattern);
        Self {
            pointer: PointerReveal::new(config.reveal_radius),
            twinkle: TwinkleScheduler::new(config.twinkle.clone(), model.glyph_len()),
            model,
            config,
            store: VisibilityStore::new(),
            catalog: None,
            deck: MessageDeck::default(),
            route: Route::default(),
            origin: String::new(),
            viewport: Viewport::default(),
            metrics: None,
            layout: None,
            share_url: None,
            confirm: ShareConfirm::default(),
        }
    }

    /// Metrics, but only once the viewport is known as well.
    fn measured(&self) -> Option<CellMetrics> {
        let viewport_known = self.viewport.width > 0.0 && self.viewport.height > 0.0;
        self.metrics.filter(|m| m.is_measured() && viewport_known)
    }

    fn ui_changed(ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::with_value(EVENT_UI_CHANGED, 0.0));
    }

    /// Swap in a new configuration. Everything derived from it is rebuilt
    /// and the current viewport is laid out again.
    fn apply_config(&mut self, ctx: &mut EngineContext, config: GridConfig) {
        self.twinkle.stop(&mut ctx.patches);
        for cell in self.store.clear_revealed() {
            ctx.patches.set_visible(cell, false, PatchSource::Pointer);
        }
        // The old footprint may not even fit the new dimensions
        self.store = VisibilityStore::new();
        self.layout = None;
        self.model = GridModel::build(config.rows, config.cols, &config.pattern);
        self.pointer = PointerReveal::new(config.reveal_radius);
        self.twinkle = TwinkleScheduler::new(config.twinkle.clone(), self.model.glyph_len());
        self.config = config;
        log::info!(
            "config applied: {}x{} \"{}\"",
            self.config.rows,
            self.config.cols,
            self.config.pattern
        );
        self.relayout(ctx);
        self.restart_twinkle(ctx);
    }

    /// Build the deck for the current route from the loaded catalog.
    fn select_messages(&mut self, ctx: &mut EngineContext) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let messages = catalog.select(self.route.section.as_deref()).to_vec();
        self.deck = MessageDeck::new(messages);
        if self.deck.is_empty() {
            log::warn!("message collection {:?} is empty", self.route.section);
        }
        let total = self.deck.len();
        if let Some(message) = self.deck.start(self.route.deep_link.as_deref(), &mut ctx.rng) {
            log::info!("showing message {} of {}", message.id, total);
        }
        self.message_changed(ctx);
    }

    fn message_changed(&mut self, ctx: &mut EngineContext) {
        self.share_url = None;
        self.confirm = ShareConfirm::default();
        for cell in self.store.clear_revealed() {
            ctx.patches.set_visible(cell, false, PatchSource::Pointer);
        }
        self.relayout(ctx);
        Self::ui_changed(ctx);
    }

    /// Re-wrap the current message and replace the reserved set. Cells the
    /// new layout covers are hidden, whichever trigger had lit them.
    fn relayout(&mut self, ctx: &mut EngineContext) {
        let Some(metrics) = self.measured() else {
            return;
        };
        let width = wrap_width(&self.viewport, &metrics, &self.config);
        let lines = self
            .deck
            .current()
            .map(|m| wrap_lines(&m.text, width))
            .unwrap_or_default();
        let layout = compute_layout(&lines, &metrics, &self.viewport, &self.config);

        for cell in self.store.replace_reserved(layout.reserved.clone()) {
            ctx.patches.set_visible(cell, false, PatchSource::Reserved);
        }
        self.twinkle.hide_reserved(&self.store, &mut ctx.patches);
        log::debug!(
            "layout: {} lines from row {}, {} reserved cells",
            layout.lines.len(),
            layout.start_row,
            layout.reserved.len()
        );
        self.layout = Some(layout);
        Self::ui_changed(ctx);
    }

    fn restart_twinkle(&mut self, ctx: &mut EngineContext) {
        let Some(metrics) = self.measured() else {
            self.twinkle.stop(&mut ctx.patches);
            return;
        };
        let narrow = self.config.is_narrow(self.viewport.width);
        self.twinkle
            .restart(self.model.hearts(), &self.viewport, &metrics, narrow, &mut ctx.patches);
    }

    fn apply_reveal(&mut self, ctx: &mut EngineContext, diff: RevealDiff) {
        for cell in diff.hidden {
            ctx.patches.set_visible(cell, false, PatchSource::Pointer);
        }
        for cell in diff.shown {
            // Pointer wins over any twinkle on the same cell
            self.twinkle.release(cell);
            ctx.patches.set_visible(cell, true, PatchSource::Pointer);
        }
    }

    fn pointer_at(&mut self, ctx: &mut EngineContext, x: f32, y: f32) {
        let Some(metrics) = self.measured() else {
            return;
        };
        let diff = self.pointer.pointer_moved(
            Vec2::new(x, y),
            &self.viewport,
            &metrics,
            self.model.rows(),
            self.model.cols(),
            &mut self.store,
        );
        self.apply_reveal(ctx, diff);
    }

    fn share(&mut self, ctx: &mut EngineContext) {
        let Some(message) = self.deck.current() else {
            return;
        };
        let id = message.id;
        self.share_url = Some(share_url(&self.origin, &self.route.base, id));
        ctx.emit_event(GameEvent::with_value(EVENT_SHARE_READY, id as f32));
        Self::ui_changed(ctx);
    }

    fn overlay(&self) -> OverlayState {
        match self.deck.current() {
            Some(message) => OverlayState::build(
                message,
                self.layout.as_ref().zip(self.metrics.as_ref()),
                &self.config.layout,
                self.confirm.is_active(),
                self.share_url.clone(),
            ),
            None => OverlayState::loading(),
        }
    }
}

impl Default for ValentineGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ValentineGrid {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            // Room for every cell to change in one frame
            max_patches: self.config.cell_count(),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut EngineContext) {
        log::info!(
            "valentine grid initialized: {}x{}, {} heart positions",
            self.model.rows(),
            self.model.cols(),
            self.model.hearts().len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Viewport { width, height, offset_x, offset_y } => {
                    self.viewport = Viewport { width, height, offset_x, offset_y };
                    self.relayout(ctx);
                    self.restart_twinkle(ctx);
                }
                InputEvent::CellMetrics { width, height } => {
                    let metrics = CellMetrics { width, height };
                    if !metrics.is_measured() {
                        log::debug!("ignoring unmeasured cell metrics {}x{}", width, height);
                        continue;
                    }
                    self.metrics = Some(metrics);
                    self.relayout(ctx);
                    self.restart_twinkle(ctx);
                }
                InputEvent::PointerMove { x, y } | InputEvent::PointerUp { x, y } => {
                    self.pointer_at(ctx, x, y);
                }
                InputEvent::TouchEnd => {
                    let diff = self.pointer.touch_ended(&mut self.store);
                    self.apply_reveal(ctx, diff);
                }
                InputEvent::Custom { kind, a, .. } => match kind {
                    CUSTOM_NEW_MESSAGE => {
                        if let Some(message) = self.deck.request_next(&mut ctx.rng) {
                            log::debug!("next message {}", message.id);
                            self.message_changed(ctx);
                        }
                    }
                    CUSTOM_SHARE => self.share(ctx),
                    CUSTOM_CLIPBOARD_RESULT => {
                        if a >= 0.5 {
                            self.confirm.activate(self.config.share_confirm_secs);
                            Self::ui_changed(ctx);
                        } else {
                            log::debug!("clipboard write failed");
                        }
                    }
                    other => log::debug!("unknown custom event {}", other),
                },
            }
        }

        let dt = ctx.dt();
        self.twinkle
            .update(dt, &mut ctx.rng, &self.store, &mut ctx.patches);
        if self.confirm.tick(dt) {
            Self::ui_changed(ctx);
        }
    }

    fn load_data(&mut self, ctx: &mut EngineContext, name: &str, json: &str) {
        match name {
            DATA_MESSAGES => match MessageCatalog::from_json(json) {
                Ok(catalog) => {
                    log::info!("messages loaded: {:?}", catalog.names().collect::<Vec<_>>());
                    self.catalog = Some(catalog);
                    self.select_messages(ctx);
                }
                Err(e) => log::warn!("failed to parse messages: {}", e),
            },
            DATA_CONFIG => match GridConfig::from_json(json) {
                Ok(config) => self.apply_config(ctx, config),
                Err(e) => log::warn!("config rejected, keeping current grid: {}", e),
            },
            other => log::warn!("unknown data resource {:?}", other),
        }
    }

    fn set_location(&mut self, ctx: &mut EngineContext, location: &Location) {
        self.route = parse_route(location);
        self.origin = location.origin.clone();
        log::debug!("route: {:?}", self.route);
        self.select_messages(ctx);
    }

    fn query(&self, key: &str) -> Option<String> {
        match key {
            "ui" => match self.overlay().to_json() {
                Ok(json) => Some(json),
                Err(e) => {
                    log::warn!("failed to serialize overlay: {}", e);
                    None
                }
            },
            "lattice" => Some(self.model.lattice().to_text()),
            _ => None,
        }
    }

    fn shutdown(&mut self, ctx: &mut EngineContext) {
        self.twinkle.stop(&mut ctx.patches);
        self.store.clear_revealed();
        log::info!("valentine grid shut down");
    }
}

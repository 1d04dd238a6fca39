// extensions/fade.rs
//
// Fade system: eased opacity transitions keyed by any copyable id
// (grid cells in practice). Decoupled from how values are displayed:
// `tick` hands every changed value to a callback.
//
// Usage:
//   let mut fades = FadeState::new();
//   fades.fade_to(cell, 1.0, 0.8, Easing::SineInOut);
//   fades.tick(dt, |cell, alpha| patches.set(cell, alpha, PatchSource::Twinkle));

use std::collections::HashMap;
use std::hash::Hash;

use super::easing::{ease, Easing};

/// A single opacity transition.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time.
    pub elapsed: f32,
    pub easing: Easing,
    /// Last value handed out.
    value: f32,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
            value: from,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Owns every in-flight or held fade.
///
/// A fade that completes at a positive value stays in the set as "held"
/// until something fades it to zero or cancels it. A fade that completes
/// at zero is removed.
#[derive(Debug)]
pub struct FadeState<K> {
    fades: HashMap<K, Fade>,
}

impl<K: Copy + Eq + Hash> FadeState<K> {
    pub fn new() -> Self {
        Self {
            fades: HashMap::new(),
        }
    }

    /// Start a fade with an explicit starting value, replacing any existing one.
    pub fn start(&mut self, key: K, from: f32, to: f32, duration: f32, easing: Easing) {
        self.fades.insert(key, Fade::new(from, to, duration, easing));
    }

    /// Fade from the key's current value (zero when absent) to `to`.
    pub fn fade_to(&mut self, key: K, to: f32, duration: f32, easing: Easing) {
        let from = self.value(key).unwrap_or(0.0);
        self.start(key, from, to, duration, easing);
    }

    /// Current value of a key, if the fade system owns it.
    pub fn value(&self, key: K) -> Option<f32> {
        self.fades.get(&key).map(Fade::value)
    }

    pub fn contains(&self, key: K) -> bool {
        self.fades.contains_key(&key)
    }

    pub fn get(&self, key: K) -> Option<&Fade> {
        self.fades.get(&key)
    }

    /// Stop animating a key and release it. Returns its last value.
    pub fn cancel(&mut self, key: K) -> Option<f32> {
        self.fades.remove(&key).map(|f| f.value)
    }

    /// Release every key. Returns the keys that were owned.
    pub fn clear(&mut self) -> Vec<K> {
        self.fades.drain().map(|(k, _)| k).collect()
    }

    /// Advance all running fades and report each new value through `apply`.
    /// Held fades are not reported again. Returns how many fades reached
    /// zero and were released this tick.
    pub fn tick(&mut self, dt: f32, mut apply: impl FnMut(K, f32)) -> usize {
        let mut finished = Vec::new();

        for (&key, fade) in self.fades.iter_mut() {
            if fade.is_complete() && fade.elapsed > 0.0 {
                continue;
            }

            fade.elapsed += dt;
            fade.value = ease(fade.from, fade.to, fade.progress(), fade.easing);
            apply(key, fade.value);

            if fade.is_complete() && fade.to <= 0.0 {
                finished.push(key);
            }
        }

        for key in &finished {
            self.fades.remove(key);
        }
        finished.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.fades.keys().copied()
    }

    /// Number of owned keys (running or held).
    pub fn len(&self) -> usize {
        self.fades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fades.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for FadeState<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed timestep accumulator.
/// Keeps timers and fades advancing at a steady rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // Cap so a backgrounded tab does not replay minutes of timers at once
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Handle to a scheduled task, usable for targeted cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug)]
struct Pending<T> {
    id: TaskId,
    due: f32,
    task: T,
}

/// Deferred-task queue driven by engine time.
///
/// Tasks are plain values; firing a task means handing it back to the owner,
/// which must re-validate whatever state the task refers to. Dropping or
/// calling `cancel_all` discards every outstanding task at once.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    now: f32,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `task` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay.max(0.0),
            task,
        });
        id
    }

    /// Advance the clock and return every task now due, earliest first.
    /// Tasks with equal due time keep their scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<Pending<T>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Cancel a single task. Returns true if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Seconds elapsed since the queue was created.
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

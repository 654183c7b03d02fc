use std::collections::HashMap;
use std::time::Instant;

/// Per-frame observability hooks for the frame processor.
///
/// Keeps timing and counting out of the processing code so callers decide
/// whether anything is recorded at all.
pub trait PipelineLogger: Send {
    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces found).
    fn metric(&mut self, name: &str, value: f64);

    /// Called once per processed frame with its end-to-end duration.
    fn frame_completed(&mut self, index: usize, duration_ms: f64);

    /// Emit an end-of-stream summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn frame_completed(&mut self, _index: usize, _duration_ms: f64) {}
}

/// Running aggregate of one stage or metric; constant size however many
/// frames are recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageStats {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl StageStats {
    pub fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates stage timings and metrics, and counts frames that took
/// longer than the display's frame interval.
pub struct FrameBudgetLogger {
    budget_ms: f64,
    timings: HashMap<String, StageStats>,
    metrics: HashMap<String, StageStats>,
    start_time: Instant,
    frames: usize,
    over_budget: usize,
}

impl FrameBudgetLogger {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
            over_budget: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn over_budget(&self) -> usize {
        self.over_budget
    }

    pub fn timings_for(&self, stage: &str) -> Option<StageStats> {
        self.timings.get(stage).copied()
    }

    /// Returns the formatted summary, or `None` if no frame was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Stream summary ({} frames, {:.1}s total):",
            self.frames,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stats = &self.timings[stage];
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let stats = &self.metrics[name];
            lines.push(format!("  {name}: avg {:.1}  max {:.1}", stats.mean(), stats.max));
        }

        lines.push(format!(
            "  Over budget ({:.1}ms): {} of {} frames",
            self.budget_ms, self.over_budget, self.frames
        ));
        if elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl PipelineLogger for FrameBudgetLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        match self.timings.get_mut(stage) {
            Some(stats) => stats.record(duration_ms),
            None => {
                let mut stats = StageStats::default();
                stats.record(duration_ms);
                self.timings.insert(stage.to_string(), stats);
            }
        }
    }

    fn metric(&mut self, name: &str, value: f64) {
        match self.metrics.get_mut(name) {
            Some(stats) => stats.record(value),
            None => {
                let mut stats = StageStats::default();
                stats.record(value);
                self.metrics.insert(name.to_string(), stats);
            }
        }
    }

    fn frame_completed(&mut self, index: usize, duration_ms: f64) {
        self.frames += 1;
        if duration_ms > self.budget_ms {
            self.over_budget += 1;
            log::debug!(
                "Frame {index} took {duration_ms:.1}ms (budget {:.1}ms)",
                self.budget_ms
            );
        }
    }

    fn summary(&self) {
        if let Some(s) = self.summary_string() {
            log::info!("{s}");
        }
    }
}

//! Rolling window of cluster-wide averages
//!
//! Keeps the last [`HISTORY_CAPACITY`] snapshot aggregates with FIFO
//! eviction. Points are stored whole, so the timestamp, CPU and memory
//! series can never drift apart in length.

use std::collections::VecDeque;

use crate::models::HistorySeries;

/// Number of points kept in the window
pub const HISTORY_CAPACITY: usize = 12;

/// One aggregate sample
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    /// `HH:MM` label in UTC
    pub label: String,
    pub avg_cpu: f64,
    pub avg_memory: f64,
}

/// Fixed-capacity rolling window of history points
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a point and evict from the front down to capacity
    pub fn append(&mut self, label: impl Into<String>, avg_cpu: f64, avg_memory: f64) {
        self.points.push_back(HistoryPoint {
            label: label.into(),
            avg_cpu,
            avg_memory,
        });

        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended point
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// Current window split into parallel series, oldest first
    pub fn snapshot(&self) -> HistorySeries {
        let mut series = HistorySeries {
            timestamps: Vec::with_capacity(self.points.len()),
            cpu: Vec::with_capacity(self.points.len()),
            memory: Vec::with_capacity(self.points.len()),
        };

        for point in &self.points {
            series.timestamps.push(point.label.clone());
            series.cpu.push(point.avg_cpu);
            series.memory.push(point.avg_memory);
        }

        series
    }
}

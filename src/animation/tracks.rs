use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

/// Frames scanned linearly from the cached index before falling back to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the keyframe interval of the last lookup, so forward playback samples in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    /// Time of the last keyframe.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sampling. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let index = self.times.partition_point(|&t| t <= time).saturating_sub(1);
        Some(self.sample_at_frame(index, time))
    }

    /// Sampling with a cursor; the cursor is updated to the interval that contains `time`.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let len = self.times.len();
        if len == 1 {
            return Some(self.values[0]);
        }

        let start = cursor.last_index.min(len - 1);
        let scanned = if time >= self.times[start] {
            (start..(start + MAX_SCAN_OFFSET).min(len - 1))
                .find(|&i| time < self.times[i + 1])
                .or_else(|| (start + MAX_SCAN_OFFSET >= len - 1).then_some(len - 1))
        } else {
            (start.saturating_sub(MAX_SCAN_OFFSET)..start)
                .rev()
                .find(|&i| time >= self.times[i])
        };

        let index = scanned.unwrap_or_else(|| {
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let last = self.values.len().min(self.times.len()) - 1;
        if index >= last {
            return self.values[last];
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let span = t1 - t0;
        let t = if span > 1e-6 {
            ((time - t0) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self.interpolation {
            InterpolationMode::Step => self.values[index],
            InterpolationMode::Linear => {
                T::interpolate_linear(self.values[index], self.values[index + 1], t)
            }
        }
    }
}

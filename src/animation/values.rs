use glam::{Quat, Vec3};

/// Values that tracks can hold and the mixer can blend.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}

/// Running weighted blend of several samples.
///
/// Each new sample is folded in with `weight / accumulated_weight`, which yields the
/// weighted average for lerp and a good approximation of it for slerp.
#[derive(Debug, Clone, Copy)]
pub struct WeightedBlend<T: Interpolatable> {
    value: T,
    weight: f32,
}

impl<T: Interpolatable> WeightedBlend<T> {
    #[must_use]
    pub fn new(value: T, weight: f32) -> Self {
        Self { value, weight }
    }

    pub fn accumulate(&mut self, value: T, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        self.weight += weight;
        self.value = T::interpolate_linear(self.value, value, weight / self.weight);
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Resolves the blend; when the accumulated weight is below 1 the remainder
    /// comes from `rest`.
    #[must_use]
    pub fn resolve(&self, rest: T) -> T {
        if self.weight >= 1.0 {
            self.value
        } else {
            T::interpolate_linear(rest, self.value, self.weight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_of_equal_weights_is_average() {
        let mut blend = WeightedBlend::new(0.0_f32, 0.5);
        blend.accumulate(10.0, 0.5);
        assert!((blend.resolve(100.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn partial_weight_falls_back_to_rest() {
        let blend = WeightedBlend::new(Vec3::splat(10.0), 0.25);
        let v = blend.resolve(Vec3::ZERO);
        assert!((v.x - 2.5).abs() < 1e-5);
    }
}

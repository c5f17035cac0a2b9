use rand::Rng;
use stage_schema::{MultiTargets, StageDefinition, Target};

use crate::time::{secs_to_millis, Millis};

/// Targets fixed for the lifetime of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    /// Headline target; also the reference for the auto-stop limit.
    pub target_ms: Millis,
    /// Ascending lap targets of a multi-target stage.
    pub laps: Option<Vec<Millis>>,
}

pub fn resolve<R: Rng + ?Sized>(stage: &StageDefinition, rng: &mut R) -> ResolvedTargets {
    let target_ms = match stage.target {
        Target::Fixed(secs) => secs_to_millis(secs),
        Target::Random { min, max } => secs_to_millis(f64::from(draw_whole_seconds(min, max, rng))),
    };

    let laps = stage.multi.as_ref().map(|multi| {
        let secs = match multi {
            MultiTargets::Explicit(list) => list.clone(),
            MultiTargets::Random => generate_multi_targets(rng),
        };
        let mut laps: Vec<Millis> = secs.into_iter().map(secs_to_millis).collect();
        laps.sort_unstable();
        laps
    });

    ResolvedTargets { target_ms, laps }
}

pub fn draw_whole_seconds<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> u32 {
    rng.gen_range(min..=max)
}

/// 5..=12 targets, each `(k + 10) * 0.5` for `k` in `0..110`, ascending.
pub fn generate_multi_targets<R: Rng + ?Sized>(rng: &mut R) -> Vec<f64> {
    let count = rng.gen_range(5..=12);
    let mut targets: Vec<f64> = (0..count)
        .map(|_| f64::from(rng.gen_range(0u32..110) + 10) * 0.5)
        .collect();
    targets.sort_by(f64::total_cmp);
    targets
}

use anyhow::{anyhow, bail};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stage_schema::{MissionCatalog, StageCatalog, StageId};
use timer_core::progress::{MemoryStorage, ProgressStore};
use timer_core::time::clock::{Clock, ManualClock, SystemClock};
use timer_core::time::secs_to_millis;
use timer_core::{GameConfig, GameSession, Tick};
use tracing::debug;

use crate::report;

/// Replays stop times against a stage on a hand-driven clock. Progress lives
/// in memory only, so the gate sees a fresh player.
pub fn run_simulation(
    stages: StageCatalog,
    missions: MissionCatalog,
    config: GameConfig,
    stage_id: StageId,
    stops: &[f64],
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let clock = ManualClock::new(SystemClock::new().today());
    let mut session = GameSession::new(
        stages,
        missions,
        config,
        ProgressStore::open(Box::new(MemoryStorage::new())),
        Box::new(clock.clone()),
        StdRng::seed_from_u64(seed.unwrap_or(0)),
    );

    let view = session
        .start_attempt(stage_id)
        .ok_or_else(|| anyhow!("stage {stage_id} is unknown or locked"))?;
    report::print_view(&view);
    session.begin()?;

    let mut laps_done = 0;
    for &stop in stops {
        if !(stop.is_finite() && stop >= 0.0) {
            bail!("stop time must be non-negative, got {stop}");
        }
        // Scripted stops are whole milliseconds
        clock.set_ms(secs_to_millis(stop) as f64);
        debug!(stop, "simulated stop");

        let result = match session.tick() {
            Ok(Tick::AutoStopped(outcome)) => {
                println!("auto-stopped");
                Ok(outcome)
            }
            Ok(_) => session.stop_attempt(),
            Err(e) => Err(e),
        };
        if report::settle(result, &mut laps_done)? {
            return Ok(());
        }
    }

    bail!("stop times ran out before the attempt finished")
}

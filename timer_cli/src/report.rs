use timer_core::gameplay::judge::Judgment;
use timer_core::{AttemptReport, AttemptView, GameSession, SessionError, StopOutcome};

pub fn print_view(view: &AttemptView) {
    println!(
        "{} target={:.3} margin={}",
        view.name, view.target, view.margin
    );
    if !view.laps.is_empty() {
        let laps: Vec<String> = view.laps.iter().map(|t| format!("{t:.3}")).collect();
        println!("laps={}", laps.join(","));
    }
    if let Some(hide) = view.hide_after {
        println!("display hides after {hide}s");
    }
}

pub fn print_lap(index: usize, lap: &Judgment) {
    println!(
        "lap {index}: target={:.3} stopped={:.3} diff={:.3} {}",
        lap.target_secs(),
        lap.stopped_secs(),
        lap.diff_secs(),
        if lap.success { "ok" } else { "miss" }
    );
}

pub fn print_report(report: &AttemptReport) {
    let verdict = &report.verdict;
    println!(
        "result: {} diff={:.3} stopped={:.3}",
        if verdict.success { "CLEAR" } else { "FAIL" },
        verdict.diff,
        verdict.stopped
    );
    println!(
        "plays={} combo={} max_combo={}",
        report.combo.total_plays, report.combo.current_combo, report.combo.max_combo
    );
    for id in &report.newly_completed {
        println!("mission completed: {id}");
    }
    if report.retry_suggested {
        println!("try again");
    }
    if let Some(next) = report.next_stage {
        println!("next: {next}");
    }
}

/// Prints what a stop produced. `Ok(true)` once the attempt is over.
///
/// A result that could not be saved is still shown; the write error goes to
/// stderr and the game carries on.
pub fn settle(result: Result<StopOutcome, SessionError>, laps_done: &mut usize) -> anyhow::Result<bool> {
    match result {
        Ok(StopOutcome::Lap(lap)) => {
            *laps_done += 1;
            print_lap(*laps_done, &lap);
            Ok(false)
        }
        Ok(StopOutcome::Finished(report)) => {
            print_laps(&report, *laps_done);
            print_report(&report);
            Ok(true)
        }
        Err(SessionError::Persist { report, source }) => {
            print_laps(&report, *laps_done);
            print_report(&report);
            eprintln!("warning: result not saved: {source}");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

// The final lap is only printed with the report.
fn print_laps(report: &AttemptReport, already_printed: usize) {
    for (i, lap) in report.verdict.laps.iter().enumerate().skip(already_printed) {
        print_lap(i + 1, lap);
    }
}

pub fn print_missions(session: &GameSession, all: bool) {
    for status in session.mission_progress() {
        let mark = if status.completed { "x" } else { " " };
        if !status.visible && !all {
            println!("[{mark}] ???");
            continue;
        }
        let title = status.title.as_deref().unwrap_or("");
        println!(
            "[{mark}] {} {} {}/{} {}",
            status.id, status.kind, status.current.min(status.target), status.target, title
        );
    }
    match session.medal() {
        Some(medal) => println!("medal={}", medal.name()),
        None => println!("medal=none"),
    }
}

pub fn print_gate(session: &GameSession) {
    let progress = session.query_progress();
    for stage in session.stages().iter() {
        let state = if session.is_playable(stage.id) { "open" } else { "locked" };
        let best = progress
            .best_diff(stage.id)
            .map(|d| format!(" best={d:.3}"))
            .unwrap_or_default();
        let section = if stage.is_exam {
            let p = session.section_progress(stage.id);
            format!(" section={}/{}", p.cleared, p.total)
        } else {
            String::new()
        };
        println!("{:>3} {} {state}{best}{section}", stage.id, stage.display_name());
    }
}

pub fn print_skins(session: &GameSession) {
    let current = session.current_skin();
    for skin in session.unlocked_skins() {
        let mark = if skin.id == current { "*" } else { " " };
        println!("{mark} {}", skin.id);
    }
}

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    stages: PathBuf,
    #[arg(long)]
    missions: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let stages = stage_loader::load_stages_from_path(&args.stages)?;
    println!("stages={}", stages.len());
    println!("groups={}", stages.groups().len());
    println!("exams={}", stages.exams().count());
    for stage in stages.iter() {
        println!(
            "{:>3} group={} target={} margin={}{}",
            stage.id,
            stage.group,
            stage.target.nominal_secs(),
            stage.margin,
            if stage.is_multi() { " multi" } else { "" }
        );
    }

    if let Some(path) = args.missions {
        let missions = stage_loader::load_missions_from_path(path)?;
        println!("missions={}", missions.len());
    }
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use piebot_opponent::search::alphabeta::SearchLimits;
use piebot_opponent::selfplay::{play_game, write_records, SelfPlayParams};
use piebot_opponent::Difficulty;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "piebot-selfplay", about = "Play the opponent against itself across difficulties")]
struct Args {
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long, default_value_t = 120)]
    max_plies: usize,
    #[arg(long, default_value = "intermediate")]
    white: Difficulty,
    #[arg(long, default_value = "easy")]
    black: Difficulty,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long)]
    movetime_ms: Option<u64>,
    #[arg(long)]
    max_nodes: Option<u64>,
    /// Write JSON-lines game records here
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        white: a.white,
        black: a.black,
        seed: a.seed,
        limits: SearchLimits { max_nodes: a.max_nodes, movetime_ms: a.movetime_ms },
    };
    eprintln!("Playing {} games: {} (white) vs {} (black), max {} plies", a.games, a.white, a.black, a.max_plies);

    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games [{elapsed_precise}] {msg}")?);
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut records = Vec::with_capacity(params.games);
    let (mut white_wins, mut black_wins, mut draws) = (0usize, 0usize, 0usize);
    for _ in 0..params.games {
        let rec = play_game(&params, &mut rng);
        match rec.result {
            1 => white_wins += 1,
            -1 => black_wins += 1,
            _ => draws += 1,
        }
        pb.set_message(format!("+{} ={} -{}", white_wins, draws, black_wins));
        pb.inc(1);
        records.push(rec);
    }
    pb.finish();

    eprintln!("White {} / Draw {} / Black {}", white_wins, draws, black_wins);
    if let Some(out) = a.out {
        write_records(&records, &out).with_context(|| format!("writing {}", out.display()))?;
        eprintln!("Wrote {} records to {}", records.len(), out.display());
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use cozy_chess::{Color, Piece, Square};
use piebot_opponent::search::alphabeta::SearchLimits;
use piebot_opponent::{Difficulty, EngineConfig, Game, GameStatus, Position};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against the PieBot opponent", long_about = None)]
struct Args {
    /// Engine strength: easy, intermediate or hard
    #[arg(long, default_value = "intermediate")]
    difficulty: Difficulty,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "b")]
    color: String,

    /// JSON engine config overriding the built-in difficulty record
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for opening selection (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Wall-clock budget per engine move in milliseconds
    #[arg(long)]
    movetime_ms: Option<u64>,

    /// Node budget per engine move
    #[arg(long)]
    max_nodes: Option<u64>,

    /// Starting FEN position (disables the opening book)
    #[arg(long)]
    fen: Option<String>,

    /// Print search statistics
    #[arg(long)]
    verbose: bool,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

fn print_board(pos: &Position) {
    println!();
    for r in (0..8).rev() {
        print!("{} ", r + 1);
        for f in 0..8 {
            let c = match pos.piece_at(Square::index(r * 8 + f)) {
                Some((piece, color)) => {
                    let c = piece_char(piece);
                    if color == Color::White { c.to_ascii_uppercase() } else { c }
                }
                None => '.',
            };
            print!("{} ", c);
        }
        println!();
    }
    println!("  a b c d e f g h");
    println!("{}", pos.fen());
}

fn print_result(status: GameStatus, pos: &Position) {
    if status.checkmate {
        let winner = if pos.side_to_move() == Color::White { "Black" } else { "White" };
        println!("\nCheckmate! {} wins!", winner);
    } else if status.stalemate {
        println!("\nGame is a stalemate!");
    } else if status.draw {
        println!("\nGame is a draw!");
    }
}

// Ok(None) means the player asked to quit.
fn get_human_move(game: &mut Game) -> Result<Option<GameStatus>> {
    loop {
        print!("Enter your move (e.g., e7e5): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 { return Ok(None); }
        let input = input.trim();
        if input == "quit" { return Ok(None); }

        match game.play_opponent(input) {
            Ok(status) => return Ok(Some(status)),
            Err(e) => println!("{e}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human_color = parse_color(&args.color)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::for_difficulty(args.difficulty),
    };
    if args.movetime_ms.is_some() || args.max_nodes.is_some() {
        config = config.with_limits(SearchLimits { max_nodes: args.max_nodes, movetime_ms: args.movetime_ms });
    }

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(config, fen)?,
        None => {
            let mut rng = match args.seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_entropy(),
            };
            Game::new(config, &mut rng)
        }
    };
    println!("Difficulty: {} | Opening: {}", game.config().difficulty, game.opening().name);

    loop {
        let status = game.status();
        if status.game_over {
            print_board(game.position());
            print_result(status, game.position());
            break;
        }

        let to_move = game.position().side_to_move();
        println!("\n{}'s turn", if to_move == Color::White { "White" } else { "Black" });
        print_board(game.position());

        if to_move == human_color {
            if get_human_move(&mut game)?.is_none() {
                println!("Thanks for playing!");
                break;
            }
            continue;
        }

        let start_time = Instant::now();
        let turn = game.play_ai_turn();
        let elapsed = start_time.elapsed();
        match turn.uci {
            Some(uci) => {
                println!("Computer plays: {}", uci);
                if args.verbose {
                    println!(
                        "source: {:?}, score: {:?}, nodes: {}, elapsed: {:.2}s",
                        turn.source, turn.score, turn.nodes, elapsed.as_secs_f32()
                    );
                }
                if turn.status.check && !turn.status.checkmate { println!("Check!"); }
            }
            None => {
                println!("No legal moves available!");
                break;
            }
        }
    }

    Ok(())
}

//! Twenty48 Chain Driver
//!
//! Plays a game against an in-memory ledger, exactly as a client would
//! against the real one, then re-verifies the recorded history by replay.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use twenty48::{
    config::DemoConfig,
    core::seed::seed_for,
    game::{canonical_result, is_game_over, start_position, Move},
    ledger::GameLedger,
    proof::{verify_transcript, GameTranscript},
    Board, GameId, FIRST_PLAYABLE_MOVE, OPENING_MOVES, VERSION,
};

/// Preferred move order for the demo player (keep tiles in the bottom-left).
const PREFERENCE: [Move; 4] = [Move::Left, Move::Down, Move::Right, Move::Up];

fn main() -> Result<()> {
    let config = DemoConfig::from_env().context("reading configuration")?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Twenty48 Chain v{}", VERSION);

    let id = config.game_id();
    info!("Player: {}", config.player);
    info!("Game ID: {}", id);

    let mut ledger = GameLedger::in_memory();
    let transcript = play_demo(&mut ledger, id, config.moves)?;

    info!("=== Final Board ===");
    for line in transcript.final_board().to_string().lines() {
        info!("{}", line);
    }
    info!(
        "Moves: {}, highest tile: {}",
        transcript.total_moves(),
        1u32 << transcript.final_board().highest_exponent()
    );
    info!("History hash: {}", hex::encode(transcript.history_hash()));

    // Verify the history independently of the ledger
    info!("=== Verifying History ===");
    let result = verify_transcript(&transcript);
    if !result.valid {
        bail!("replay verification failed: {:?}", result.error);
    }
    if Some(result.final_board) != ledger.latest_board(&id) {
        bail!("replayed board differs from ledger board");
    }
    info!("REPLAY VERIFIED: {} moves", result.moves_verified);

    Ok(())
}

/// Open a game and play up to `moves` moves after the opening.
fn play_demo(ledger: &mut GameLedger, id: GameId, moves: u32) -> Result<GameTranscript> {
    let caller = id.principal();

    let start = start_position(&seed_for(&id, 0)).context("building start position")?;
    let mut boards = [start; OPENING_MOVES + 1];
    let mut opening_moves = [Move::Left; OPENING_MOVES];
    for k in 0..OPENING_MOVES {
        let (mv, next) = choose_move(boards[k], &id, k as u64 + 1)
            .context("opening has no legal move")?;
        opening_moves[k] = mv;
        boards[k + 1] = next;
    }

    ledger.start_game(caller, id, boards, opening_moves)?;
    let mut transcript = GameTranscript::new(id, boards, opening_moves);

    let mut board = boards[OPENING_MOVES];
    for n in 0..moves as u64 {
        let move_number = FIRST_PLAYABLE_MOVE + n;
        let Some((mv, next)) = choose_move(board, &id, move_number) else {
            info!("Game over after move {}", move_number - 1);
            break;
        };

        ledger.play(caller, id, mv, next)?;
        transcript.push(mv, next);
        board = next;

        if is_game_over(board) {
            info!("Game over after move {}", move_number);
            break;
        }
    }

    Ok(transcript)
}

/// First legal move in preference order, with its canonical result.
fn choose_move(board: Board, id: &GameId, move_number: u64) -> Option<(Move, Board)> {
    let seed = seed_for(id, move_number);
    PREFERENCE
        .into_iter()
        .find_map(|mv| canonical_result(board, mv, &seed).ok().map(|next| (mv, next)))
}

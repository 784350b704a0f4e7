use super::{draw_with_shuffle, history_table, print_outcome};
use anyhow::Result;
use clap::Args;
use prizedraw_core::{export_history, import_participants, AnimationConfig, DrawConfig};
use prizedraw_engine::{DrawController, DrawSession};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Participant CSV file (header: name,note,code)
    pub participants: PathBuf,
    /// Prize to hand out, repeat for several (cycled in order)
    #[arg(short, long = "prize", required = true)]
    pub prizes: Vec<String>,
    /// Winners per round
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
    /// Number of rounds to draw
    #[arg(short, long, default_value_t = 1)]
    pub rounds: u32,
    /// Write the winners history to this CSV file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
    /// Skip the shuffle display
    #[arg(long)]
    pub no_animation: bool,
}

pub async fn run_draw(args: DrawArgs, config: &DrawConfig) -> Result<()> {
    let participants = import_participants(&args.participants).await?;
    println!(
        "Loaded {} participants from {}",
        participants.len(),
        args.participants.display()
    );

    let mut session = DrawSession::with_default_winner_count(config.default_winner_count);
    session.load_participants(participants)?;
    for prize in &args.prizes {
        session.add_prize(prize)?;
    }
    session.set_winner_count(args.count.unwrap_or(config.default_winner_count))?;

    let animation = if args.no_animation {
        AnimationConfig::instant()
    } else {
        config.animation.clone()
    };
    tracing::debug!(
        "Drawing {} round(s) with {} frame(s) of shuffle",
        args.rounds,
        animation.frames
    );
    let controller = DrawController::new(session, animation);

    for round in 1..=args.rounds {
        println!();
        println!("Round {}/{}", round, args.rounds);
        println!("═══════════════════════════════════");

        let outcome = draw_with_shuffle(&controller).await?;
        print_outcome(&outcome);

        controller.with_session(|session| session.finish_round())?;
    }

    let history = controller.with_session(|session| session.history().to_vec());
    let remaining = controller.with_session(|session| session.eligible().len());

    println!();
    println!("Winners history ({} total, {} still eligible):", history.len(), remaining);
    println!("{}", history_table(&history));

    if let Some(path) = args.export {
        export_history(&history, &path).await?;
        println!("History exported to {}", path.display());
    }

    Ok(())
}

use super::thanks::print_message;
use super::{draw_with_shuffle, history_table, participants_table, print_outcome, write_sample};
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use prizedraw_core::{export_history, import_participants, DrawConfig, GeminiClient};
use prizedraw_engine::{DrawController, DrawSession};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Import,
    AddPrize,
    RemovePrize,
    SetWinnerCount,
    Draw,
    ShowParticipants,
    ShowHistory,
    Export,
    Thanks,
    Sample,
    Reset,
    Quit,
}

const MENU: [(MenuAction, &str); 12] = [
    (MenuAction::Import, "Import participants (CSV)"),
    (MenuAction::AddPrize, "Add prize"),
    (MenuAction::RemovePrize, "Remove prize"),
    (MenuAction::SetWinnerCount, "Set number of winners per draw"),
    (MenuAction::Draw, "Draw winners"),
    (MenuAction::ShowParticipants, "Show participants"),
    (MenuAction::ShowHistory, "Show winners history"),
    (MenuAction::Export, "Export winners history (CSV)"),
    (MenuAction::Thanks, "Generate thank-you message"),
    (MenuAction::Sample, "Write sample participant CSV"),
    (MenuAction::Reset, "Reset session"),
    (MenuAction::Quit, "Quit"),
];

/// Interactive drawing session, one menu action at a time
pub async fn run_session(
    participants: Option<PathBuf>,
    config: &DrawConfig,
    data_dir: &Path,
) -> Result<()> {
    let session = DrawSession::with_default_winner_count(config.default_winner_count);
    let controller = DrawController::new(session, config.animation.clone());

    if let Some(path) = participants {
        if let Err(e) = import(&controller, &path).await {
            eprintln!("Error: {:#}", e);
        }
    }

    let labels: Vec<&str> = MENU.iter().map(|(_, label)| *label).collect();

    loop {
        print_status(&controller);

        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;
        let action = MENU[choice].0;

        if action == MenuAction::Quit {
            break;
        }

        if let Err(e) = handle_action(action, &controller, config, data_dir).await {
            eprintln!("Error: {:#}", e);
        }
    }

    Ok(())
}

fn print_status(controller: &DrawController) {
    controller.with_session(|session| {
        println!();
        println!("═══════════════════════════════════");
        println!(
            "Participants: {} ({} eligible)",
            session.participants().len(),
            session.eligible().len()
        );
        if session.prizes().is_empty() {
            println!("Prizes: none");
        } else {
            println!("Prizes: {}", session.prizes().join(", "));
        }
        println!("Winners per draw: {}", session.winner_count());
        println!("Winners so far: {}", session.history().len());
        println!("═══════════════════════════════════");
    });
}

async fn import(controller: &DrawController, path: &Path) -> Result<()> {
    let participants = import_participants(path).await?;
    let count = participants.len();
    controller.with_session(|session| session.load_participants(participants))?;
    println!("Imported {} participants from {}", count, path.display());
    Ok(())
}

async fn handle_action(
    action: MenuAction,
    controller: &DrawController,
    config: &DrawConfig,
    data_dir: &Path,
) -> Result<()> {
    match action {
        MenuAction::Import => {
            let path: String = Input::new()
                .with_prompt("Participant CSV file")
                .interact_text()?;
            import(controller, Path::new(path.trim())).await?;
        }

        MenuAction::AddPrize => {
            let prize: String = Input::new()
                .with_prompt("Prize name (e.g. Bike, TV)")
                .interact_text()?;
            controller.with_session(|session| session.add_prize(&prize))?;
        }

        MenuAction::RemovePrize => {
            let prizes = controller.with_session(|session| session.prizes().to_vec());
            if prizes.is_empty() {
                println!("No prizes to remove.");
                return Ok(());
            }

            let index = Select::new()
                .with_prompt("Remove which prize?")
                .items(&prizes)
                .interact()?;
            let removed = controller.with_session(|session| session.remove_prize(index))?;
            println!("Removed '{}'", removed);
        }

        MenuAction::SetWinnerCount => {
            let current = controller.with_session(|session| session.winner_count());
            let count: usize = Input::new()
                .with_prompt("Winners per draw")
                .default(current)
                .interact_text()?;
            controller.with_session(|session| session.set_winner_count(count))?;
        }

        MenuAction::Draw => {
            let outcome = draw_with_shuffle(controller).await?;
            print_outcome(&outcome);
            controller.with_session(|session| session.finish_round())?;
        }

        MenuAction::ShowParticipants => {
            controller.with_session(|session| {
                if session.participants().is_empty() {
                    println!("No participants imported.");
                } else {
                    println!(
                        "{}",
                        participants_table(session.participants(), session.eligible())
                    );
                }
            });
        }

        MenuAction::ShowHistory => {
            let history = controller.with_session(|session| session.history().to_vec());
            if history.is_empty() {
                println!("No winners yet.");
            } else {
                println!("{}", history_table(&history));
            }
        }

        MenuAction::Export => {
            let default_path = data_dir.join("winners.csv");
            let path: String = Input::new()
                .with_prompt("Export to")
                .default(default_path.display().to_string())
                .interact_text()?;
            let path = PathBuf::from(path.trim());

            let history = controller.with_session(|session| session.history().to_vec());
            export_history(&history, &path).await?;
            println!("Exported {} winners to {}", history.len(), path.display());
        }

        MenuAction::Thanks => {
            let client = GeminiClient::new(config.thanks.clone())?;
            println!("Generating thank-you message...");
            match controller.generate_thanks(&client).await? {
                Some(message) => print_message(&message),
                None => println!("Session was reset in the meantime, message discarded."),
            }
        }

        MenuAction::Sample => {
            let path: String = Input::new()
                .with_prompt("Write sample to")
                .default("participants_sample.csv".to_string())
                .interact_text()?;
            write_sample(Some(Path::new(path.trim()))).await?;
        }

        MenuAction::Reset => {
            let confirm = Confirm::new()
                .with_prompt("Clear participants, prizes and winners history?")
                .default(false)
                .interact()?;

            if confirm {
                controller.reset();
                println!("Session reset.");
            } else {
                println!("Reset cancelled.");
            }
        }

        MenuAction::Quit => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ends_with_quit() {
        assert_eq!(MENU.last().map(|(action, _)| *action), Some(MenuAction::Quit));
    }

    #[tokio::test]
    async fn test_import_loads_into_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        tokio::fs::write(&path, "name,note,code\nAlice,a,A1\nBob,b,B2\n")
            .await
            .unwrap();

        let controller = DrawController::new(DrawSession::new(), Default::default());
        import(&controller, &path).await.unwrap();

        assert_eq!(controller.with_session(|s| s.eligible().len()), 2);
    }
}

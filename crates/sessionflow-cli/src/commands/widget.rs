use clap::Subcommand;
use sessionflow_core::storage::Database;
use sessionflow_core::{WidgetPosition, WidgetState};

#[derive(Subcommand)]
pub enum WidgetAction {
    /// Print the persisted widget state as JSON
    Show,
    /// Save the widget screen position
    SetPosition { x: i32, y: i32 },
    /// Forget the saved position
    ClearPosition,
    /// Add an extension preset (minutes)
    PresetAdd { minutes: u32 },
    /// Remove an extension preset (minutes)
    PresetRemove { minutes: u32 },
}

pub fn run(action: WidgetAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    let mut state = WidgetState::load(&db);

    match action {
        WidgetAction::Show => {
            println!("{}", serde_json::to_string_pretty(&state)?);
            return Ok(());
        }
        WidgetAction::SetPosition { x, y } => {
            state.position = Some(WidgetPosition { x, y });
        }
        WidgetAction::ClearPosition => {
            state.position = None;
        }
        WidgetAction::PresetAdd { minutes } => {
            state.add_preset(minutes);
        }
        WidgetAction::PresetRemove { minutes } => {
            if !state.remove_preset(minutes) {
                return Err(
                    "preset not removed: unknown value or the last remaining preset".into(),
                );
            }
        }
    }

    state.save(&mut db)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

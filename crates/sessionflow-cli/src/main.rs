use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sessionflow-cli", version, about = "Sessionflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session countdown control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Guided breathing exercises
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Timer widget state (position, extension presets)
    Widget {
        #[command(subcommand)]
        action: commands::widget::WidgetAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Widget { action } => commands::widget::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};

mod cli;

use cli::draw::DrawArgs;
use cli::eval::EvalArgs;
use cli::generate::GenerateArgs;
use cli::train::TrainArgs;

#[derive(Parser)]
#[command(
    name = "recognizer",
    version,
    about = "Stroke recognizer: rebuild circle/line programs from raster images",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Training options used when no subcommand is given
    #[command(flatten)]
    train: TrainArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Train the recognizer on synthetic (program, trace) pairs
    Train(TrainArgs),
    /// Report jointly-correct accuracy of a checkpoint on an example set
    Eval(EvalArgs),
    /// Greedily decode target images into stroke programs
    #[command(alias = "test")]
    Draw(DrawArgs),
    /// Write random programs and their per-stroke traces
    Generate(GenerateArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => cli::train::cmd_train(cli.train),
        Some(Command::Train(args)) => cli::train::cmd_train(args),
        Some(Command::Eval(args)) => cli::eval::cmd_eval(args),
        Some(Command::Draw(args)) => cli::draw::cmd_draw(args),
        Some(Command::Generate(args)) => cli::generate::cmd_generate(args),
    }
}

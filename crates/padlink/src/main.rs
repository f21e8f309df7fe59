use clap::{Parser, Subcommand};
use padlink::ipc::{self, SocketPath};
use padlink::pad::{self, PadCommand};

#[derive(Parser, Debug)]
#[command(name = "padlink", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket the wheel daemon listens on. The daemon's config file is not
    /// read here: if `wheel.socket_path` was changed there, pass the same
    /// path or export it through the same environment override.
    #[arg(
        short = 's',
        long,
        env = ipc::SOCKET_PATH_ENV,
        default_value = ipc::DEFAULT_SOCKET_PATH
    )]
    socket: String,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Switch to the next category tab
    NextCategory,
    /// Switch to the previous category tab
    PreviousCategory,
    /// Cycle the highlighted segment forward
    NextOption,
    /// Cycle the highlighted segment backward
    PreviousOption,
    /// List connected gamepads
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let socket = SocketPath::new(cli.socket);

    let cmd = match cli.command {
        Commands::NextCategory => PadCommand::NextCategory,
        Commands::PreviousCategory => PadCommand::PreviousCategory,
        Commands::NextOption => PadCommand::NextOption,
        Commands::PreviousOption => PadCommand::PreviousOption,
        Commands::List => return list_gamepads(),
    };

    log::debug!("Sending '{}' to {}", cmd, socket);
    ipc::send_command(&socket, cmd)?;
    Ok(())
}

fn list_gamepads() -> anyhow::Result<()> {
    let pads = pad::connected_gamepads()?;
    if pads.is_empty() {
        anyhow::bail!("No gamepads connected.");
    }
    for (i, name) in pads.iter().enumerate() {
        println!("{}: {}", i, name);
    }
    Ok(())
}

use clap::Parser;
use hexscrew::cli::commands::{build, completions, config, install, sizes};
use hexscrew::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Sizes(cmd) => sizes::run(cmd, &global),
        Commands::Build(args) => build::run(args, &global),
        Commands::Install(args) => install::run_install(args, &global),
        Commands::Uninstall(args) => install::run_uninstall(args, &global),
        Commands::Status(args) => install::run_status(args, &global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hexscrew={}", default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

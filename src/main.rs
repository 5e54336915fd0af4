use clap::Parser;
use miette::Result;
use plancache::cli::helpers::discover_workspace;
use plancache::cli::{Cli, Commands, GlobalOpts};
use plancache::core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for diagnostics
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
    init_tracing(&global);

    match cli.command {
        Commands::Init(args) => plancache::cli::commands::init::run(args, &global),
        Commands::Capture(args) => plancache::cli::commands::capture::run(args, &global),
        Commands::List(args) => plancache::cli::commands::list::run(args, &global),
        Commands::Search(args) => plancache::cli::commands::search::run(args, &global),
        Commands::Fav(cmd) => plancache::cli::commands::fav::run(cmd, &global),
        Commands::Recent(cmd) => plancache::cli::commands::recent::run(cmd, &global),
        Commands::Cache(cmd) => plancache::cli::commands::cache::run(cmd, &global),
        Commands::Config(cmd) => plancache::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => plancache::cli::commands::completions::run(args),
    }
}

/// RUST_LOG wins, then PLANCACHE_LOG / config `log_level`, then --verbose
fn init_tracing(global: &GlobalOpts) {
    let workspace = discover_workspace(global).ok();
    let (config, issues) = Config::load_checked(workspace.as_ref());

    let fallback = config.log_level.unwrap_or_else(|| {
        if global.verbose {
            "plancache=debug".to_string()
        } else {
            "warn".to_string()
        }
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Config is read before the subscriber exists, so report skipped files now
    for issue in issues {
        tracing::warn!(path = %issue.path.display(), error = %issue.message, "ignoring unreadable config");
    }
}

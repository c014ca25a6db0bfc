use clap::Parser;
use miette::Result;
use tradedesk::cli::commands::{completions, init, orders, rfq};
use tradedesk::cli::{init_logging, Cli, Commands, LogConfig};
use tradedesk::core::Config;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
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
    init_logging(&LogConfig::from_verbosity(cli.global.verbose, cli.global.quiet));
    let config = Config::load();

    match cli.command {
        Commands::Init(args) => init::run(args, &cli.global, &config),
        Commands::Orders(cmd) => orders::run(cmd, &cli.global, &config),
        Commands::Rfq(cmd) => rfq::run(cmd, &cli.global, &config),
        Commands::Completions(args) => completions::run(args),
    }
}

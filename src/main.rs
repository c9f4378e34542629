use clap::Parser;
use miette::Result;
use tpm::cli::helpers::load_config;
use tpm::cli::{commands, Cli, Commands};
use tpm::core::logging::init_tracing;

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

    let config = load_config(&cli.global)?;
    init_tracing(&config.log, cli.global.verbose, cli.global.log_json);

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Inst(cmd) => commands::inst::run(cmd, &cli.global),
        Commands::Insp(cmd) => commands::insp::run(cmd, &cli.global),
        Commands::Batch(cmd) => commands::batch::run(cmd, &cli.global),
        Commands::Scan(args) => commands::scan::run(args, &cli.global, &config),
        Commands::Summary(args) => commands::summary::run(args, &cli.global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use skelprefs::ProvisionConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            file,
            queries,
            get,
            output,
        } => commands::show(file.as_deref(), &queries, get.as_deref(), output),
        Commands::Check { file } => commands::check(&file),
        Commands::Render { file } => commands::render_file(file.as_deref()),
        Commands::Install {
            home,
            source,
            profile,
            overwrite,
            no_verify,
            no_register,
        } => commands::install(&commands::InstallArgs {
            home,
            source,
            config: ProvisionConfig {
                profile_name: profile,
                overwrite,
                verify: !no_verify,
                register_profile: !no_register,
            },
        }),
        Commands::CopySkel {
            skel,
            home,
            overwrite,
        } => commands::copy_skel(&skel, &home, overwrite),
        Commands::Profiles { home } => commands::profiles(&home),
    }
}

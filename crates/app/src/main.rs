use std::io::BufRead;

use anyhow::Context;
use clap::Parser;

use waypoint_app::{AppContext, Cli, Command, run};
use waypoint_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { mut command } = Cli::parse();
    waypoint_observability::init();

    if let Command::Login { secret, .. } = &mut command {
        if secret.is_none() {
            eprint!("secret (input is echoed): ");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read secret from stdin")?;
            *secret = Some(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let mut ctx = AppContext::from_config(&config).context("failed to set up directory client")?;
    ctx.session_mut().initialize();

    let output = run(&mut ctx, command).await?;
    println!("{output}");
    Ok(())
}

//! The `waypoint` command set.

use std::fmt::Write as _;

use anyhow::Context;
use clap::{Parser, Subcommand};

use waypoint_auth::{Access, AccessDecision, Landing, landing_for, sign_in};
use waypoint_console::{AdminConsole, ConsoleError, RecordForm};
use waypoint_core::{RecordId, Role};
use waypoint_infra::{SessionSlot, UserDirectory};

use crate::context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "waypoint", about = "Sign in to the user directory and manage its records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show who is signed in
    Status,
    /// Sign in and print where to go next
    Login {
        /// 11-digit identifier, punctuation optional
        identifier: String,
        /// Prompted for on stdin when omitted; the prompt echoes what is typed
        #[arg(long, env = "WAYPOINT_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
    /// Forget the persisted session
    Logout,
    /// List user records, or change them (admins only)
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum UsersAction {
    /// Create a record; without --secret one is derived from role and identifier
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        identifier: String,
        /// helper, operator, supervisor, manager or administrator
        #[arg(long)]
        role: Role,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        secret: Option<String>,
        #[arg(long)]
        admin: bool,
    },
    /// Change the given fields of a record
    Edit {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        identifier: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        secret: Option<String>,
        #[arg(long, value_name = "true|false")]
        admin: Option<bool>,
    },
    /// Delete a record; the last admin is kept
    Delete { id: RecordId },
}

/// Run one command against an initialised context; returns what to print.
pub async fn run<D, S>(ctx: &mut AppContext<D, S>, command: Command) -> anyhow::Result<String>
where
    D: UserDirectory,
    S: SessionSlot,
{
    match command {
        Command::Status => Ok(status(ctx)),
        Command::Login { identifier, secret } => {
            let secret = secret.unwrap_or_default();
            let landing = sign_in(ctx.session_mut(), &identifier, &secret).await?;
            let name = ctx
                .session()
                .principal()
                .map(|p| p.display_name.clone())
                .unwrap_or_default();
            Ok(match landing {
                Landing::AdminConsole => format!("Signed in as {name}. Run `waypoint users` to manage records."),
                Landing::Redirect(url) => format!("Signed in as {name}. Continue at {url}"),
            })
        }
        Command::Logout => {
            ctx.session_mut().logout();
            Ok("Signed out.".to_string())
        }
        Command::Users { action } => {
            let mut console = ctx.open_console().map_err(console_error)?;
            console
                .refresh()
                .await
                .context("could not load user records")?;

            match action {
                None => Ok(listing(&console)),
                Some(action) => manage(&mut console, action).await,
            }
        }
    }
}

fn console_error(err: ConsoleError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn listing<D: UserDirectory>(console: &AdminConsole<D>) -> String {
    let mut out = format!("{} user(s)\n", console.len());
    for row in console.views() {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.id,
            row.display_name,
            row.identifier,
            row.role,
            row.masked_secret,
            row.kind,
            row.destination_url,
            row.created_on,
        );
    }
    out
}

async fn manage<D: UserDirectory>(
    console: &mut AdminConsole<D>,
    action: UsersAction,
) -> anyhow::Result<String> {
    match action {
        UsersAction::Add {
            name,
            identifier,
            role,
            destination,
            secret,
            admin,
        } => {
            let mut form = RecordForm::create();
            form.set_display_name(name);
            form.set_identifier(&identifier);
            form.set_role(role);
            form.set_destination_url(destination);
            form.set_admin(admin);
            if let Some(secret) = secret {
                form.set_secret(secret);
            }

            let created = console.create(form.draft()).await.map_err(console_error)?;
            let mut out = format!(
                "Created {} ({}) with id {}.",
                created.display_name, created.identifier, created.id
            );
            if let Some(hint) = form.auto_secret_hint() {
                let _ = write!(out, "\nSecret set to the {hint}: {}", created.secret);
            }
            Ok(out)
        }
        UsersAction::Edit {
            id,
            name,
            identifier,
            role,
            destination,
            secret,
            admin,
        } => {
            let record = console
                .get(id)
                .cloned()
                .ok_or(ConsoleError::NotFound(id))
                .map_err(console_error)?;

            let mut form = RecordForm::edit(&record);
            if let Some(name) = name {
                form.set_display_name(name);
            }
            if let Some(identifier) = identifier {
                form.set_identifier(&identifier);
            }
            if let Some(role) = role {
                form.set_role(role);
            }
            if let Some(destination) = destination {
                form.set_destination_url(destination);
            }
            if let Some(secret) = secret {
                form.set_secret(secret);
            }
            if let Some(admin) = admin {
                form.set_admin(admin);
            }

            let updated = console.update(id, form.draft()).await.map_err(console_error)?;
            Ok(format!("Updated {} ({}).", updated.display_name, updated.identifier))
        }
        UsersAction::Delete { id } => {
            let name = console
                .get(id)
                .map(|r| r.display_name.clone())
                .ok_or(ConsoleError::NotFound(id))
                .map_err(console_error)?;
            console.delete(id).await.map_err(console_error)?;
            Ok(format!("Deleted {name}."))
        }
    }
}

fn status<D, S>(ctx: &AppContext<D, S>) -> String
where
    D: UserDirectory,
    S: SessionSlot,
{
    let session = ctx.session();
    match (session.check(Access::Authenticated), session.principal()) {
        (AccessDecision::Granted, Some(principal)) => match landing_for(principal) {
            Landing::AdminConsole => format!("Signed in as {} (admin).", principal.display_name),
            Landing::Redirect(url) => format!("Signed in as {}. Destination: {url}", principal.display_name),
        },
        (AccessDecision::Pending, _) => "Session is still loading.".to_string(),
        _ => "Not signed in.".to_string(),
    }
}

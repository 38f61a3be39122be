//! A menu-driven generator session.

use anyhow::Context;
use dialoguer::theme::ColorfulTheme;

use passgen::breach::{self, PwnedPasswords};
use passgen::config::Config;
use passgen::session::Credential;
use passgen::{IndexSource, Secret, Session};

use crate::ProgError;

const MENU: &[&str] = &["Generate", "Switch mode", "Copy", "Export", "Quit"];

pub(crate) fn run(config: &Config) -> Result<(), ProgError> {
    let mut session = Session::new(
        rand::thread_rng(),
        config.character_policy(),
        config.passphrase_policy()?,
    )
    .on_expiry(|| eprintln!("\nExpired 🔒"));

    show(&session.generate()?, config.leak_check);
    loop {
        let selection = dialoguer::Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Mode: {}", session.mode()))
            .items(MENU)
            .default(0)
            .interact_opt()
            .context("failed to query your selection")?;
        let outcome = match selection {
            Some(0) => session
                .generate()
                .map(|credential| show(&credential, config.leak_check))
                .map_err(ProgError::from),
            Some(1) => {
                let mode = session.mode().toggled();
                session
                    .switch_mode(mode)
                    .map(|credential| show(&credential, config.leak_check))
                    .map_err(ProgError::from)
            }
            Some(2) => valid_credential(&session, "copy").and_then(|credential| {
                crate::clipboard::copy(credential.secret())?;
                Ok(())
            }),
            Some(3) => export(config, &session),
            _ => break,
        };
        // Mistakes inside the menu are reported, not fatal.
        if let Err(err) = outcome {
            eprintln!("{err}");
        }
    }
    Ok(())
}

fn show(credential: &Credential, leak_check: bool) {
    println!("{}", credential.secret().as_str());
    if let Some(strength) = credential.strength() {
        eprintln!("{}", crate::meter::render(strength));
        if leak_check {
            spawn_leak_check(credential.secret().clone());
        }
    }
}

fn spawn_leak_check(secret: Secret) {
    let lookup = match PwnedPasswords::new() {
        Ok(lookup) => lookup,
        Err(err) => {
            tracing::warn!(error = %err, "leak check failed (offline?)");
            return;
        }
    };
    // Not joined: the warning shows up whenever the answer arrives.
    breach::spawn_check(lookup, secret, |result| match result {
        Ok(report) if report.found => eprintln!("\n{}", crate::meter::breach_warning(&report)),
        Ok(_) => (),
        Err(err) => tracing::warn!(error = %err, "leak check failed (offline?)"),
    });
}

fn valid_credential<S: IndexSource>(
    session: &Session<S>,
    action: &'static str,
) -> Result<Credential, ProgError> {
    match session.current() {
        Some(credential) => Ok(credential),
        None if session.is_expired() => Err(ProgError::Expired),
        None => Err(ProgError::NothingGenerated(action)),
    }
}

fn export<S: IndexSource>(config: &Config, session: &Session<S>) -> Result<(), ProgError> {
    valid_credential(session, "export")?;
    let key = Secret::from(
        rpassword::prompt_password("Set an encryption key (don't forget it!): ")
            .context("failed to read key from TTY")?,
    );
    if key.as_str().is_empty() {
        return Err(ProgError::ExportAborted);
    }
    let confirm_key = Secret::from(
        rpassword::prompt_password("              Confirm the key: ")
            .context("failed to read key from TTY")?,
    );
    if key != confirm_key {
        return Err(ProgError::KeysDidntMatch);
    }
    // The password may have expired while the key was being typed.
    let credential = valid_credential(session, "export")?;
    passgen::export::write_export(&config.export_file, credential.secret(), &key)?;
    eprintln!(
        "Encrypted export written to {}",
        config.export_file.display()
    );
    Ok(())
}

use crate::cli::{CliContext, ListFormat};
use crate::core::store::AdminPin;
use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::{Confirm, Password};
use std::io::BufRead;
use zeroize::Zeroizing;

pub fn run_bootstrap(ctx: &CliContext) -> Result<()> {
    let admin_name = ctx.store.config().admin_name.clone();
    println!("No personnel found in {}", ctx.paths.root.display());
    if !confirm(ctx, "Create the personnel store now?")? {
        println!("Aborting");
        return Ok(());
    }

    let pin: Zeroizing<String> = if ctx.admin_pin_stdin {
        read_stdin_line("new admin PIN")?
    } else {
        Zeroizing::new(
            Password::new()
                .with_prompt(format!("Enter the new {} PIN", admin_name))
                .with_confirmation("Repeat the PIN", "PINs do not match")
                .interact()
                .context("read admin PIN from prompt")?,
        )
    };

    ctx.store.create(&admin_name, &pin, AdminPin::Bootstrap)?;
    println!("Added {}; going to quit now", admin_name);
    Ok(())
}

pub fn run_add(ctx: &CliContext, name: &str, pin: String) -> Result<()> {
    let pin = Zeroizing::new(pin);
    if !confirm_change(ctx, name, true)? {
        println!("Aborting");
        return Ok(());
    }
    let admin_pin = read_admin_pin(ctx)?;
    ctx.store.create(name, &pin, AdminPin::Pin(&admin_pin))?;
    println!("Personnel added: {}", name);
    Ok(())
}

pub fn run_update(ctx: &CliContext, name: &str, pin: String) -> Result<()> {
    let pin = Zeroizing::new(pin);
    if !confirm_change(ctx, name, true)? {
        println!("Aborting");
        return Ok(());
    }
    let admin_pin = read_admin_pin(ctx)?;
    ctx.store.update(name, &pin, AdminPin::Pin(&admin_pin))?;
    println!("Personnel updated: {}", name);
    Ok(())
}

pub fn run_remove(ctx: &CliContext, name: &str) -> Result<()> {
    if !confirm_change(ctx, name, false)? {
        println!("Aborting");
        return Ok(());
    }
    if name == ctx.store.config().admin_name
        && !confirm(
            ctx,
            "This is the administrator record. Without it no further changes are possible. Remove anyway?",
        )?
    {
        println!("Aborting");
        return Ok(());
    }
    let admin_pin = read_admin_pin(ctx)?;
    ctx.store.remove(name, AdminPin::Pin(&admin_pin))?;
    println!("Personnel removed: {}", name);
    Ok(())
}

pub fn run_list(ctx: &CliContext, format: ListFormat) -> Result<()> {
    let names = ctx.store.list_names()?;

    match format {
        ListFormat::Plain => {
            for name in &names {
                println!("{}", name);
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&names).context("serialize list")?;
            println!("{}", json);
        }
        ListFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Role").add_attribute(Attribute::Bold),
            ]);
            let admin_name = &ctx.store.config().admin_name;
            for (idx, name) in names.iter().enumerate() {
                let role = if name == admin_name { "admin" } else { "-" };
                table.add_row(vec![(idx + 1).to_string(), name.clone(), role.to_string()]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

pub fn run_check(ctx: &CliContext) -> Result<()> {
    let problems = ctx.store.verify()?;
    println!("Check: {}", ctx.paths);

    if problems.is_empty() {
        let count = ctx.store.list_names()?.len();
        println!("  [PASS] listing matches record file ({} personnel)", count);
        return Ok(());
    }

    for problem in &problems {
        println!("  [FAIL] {}", problem);
    }
    bail!("{} problem(s) found; run --repair", problems.len());
}

pub fn run_repair(ctx: &CliContext) -> Result<()> {
    let admin_pin = read_admin_pin(ctx)?;
    ctx.store.rebuild_listing(AdminPin::Pin(&admin_pin))?;
    println!("Listing rebuilt from {}", ctx.store.config().records_path.display());
    Ok(())
}

pub fn run_reset(ctx: &CliContext) -> Result<()> {
    if !confirm(ctx, "Erase all personnel information?")? {
        println!("Aborting");
        return Ok(());
    }
    ctx.store.reset()?;
    println!("Personnel store erased");
    Ok(())
}

/// Show what is about to change. The PIN itself is never echoed.
fn confirm_change(ctx: &CliContext, name: &str, with_pin: bool) -> Result<bool> {
    println!("Please confirm:");
    println!("Personnel: {}", name);
    if with_pin {
        println!("PIN: ****");
    }
    confirm(ctx, "Proceed?")
}

fn confirm(ctx: &CliContext, prompt: &str) -> Result<bool> {
    if ctx.assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("read confirmation")
}

fn read_admin_pin(ctx: &CliContext) -> Result<Zeroizing<String>> {
    if ctx.admin_pin_stdin {
        return read_stdin_line("admin PIN");
    }
    Ok(Zeroizing::new(
        Password::new()
            .with_prompt("Please enter admin PIN")
            .allow_empty_password(true)
            .interact()
            .context("read admin PIN from prompt")?,
    ))
}

fn read_stdin_line(what: &str) -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    std::io::stdin()
        .lock()
        .read_line(&mut buf)
        .with_context(|| format!("read {} from stdin", what))?;
    Ok(Zeroizing::new(
        buf.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

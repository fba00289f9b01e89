use anyhow::Result;
use console::style;
use jobhawk_core::session::SessionStore;

/// Summarize the saved session artifact. Cookie values are never printed.
pub fn show() -> Result<()> {
    let store = SessionStore::new(super::state_dir()?);

    let Some(cookies) = store.load()? else {
        println!("No saved session ({})", store.path().display());
        return Ok(());
    };

    println!(
        "\n{}",
        style(format!("Saved session: {}", store.path().display())).bold()
    );
    println!("  {} cookies\n", cookies.len());

    for cookie in &cookies {
        println!(
            "  {:<30} {}",
            cookie.name,
            style(&cookie.domain).dim()
        );
    }
    println!();

    Ok(())
}

/// Delete the saved session artifact. Safe to run when none exists.
pub fn clear() -> Result<()> {
    let store = SessionStore::new(super::state_dir()?);

    if store.load()?.is_none() {
        println!("No saved session to clear.");
        return Ok(());
    }

    store.clear()?;
    println!("{} Session cleared", style("✅").green());

    Ok(())
}

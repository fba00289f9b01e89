use anyhow::Result;
use jobhawk_browser::{Credentials, Pacer, Runner, RunnerConfig};
use jobhawk_core::listing::SearchParams;
use jobhawk_core::report::ReportWriter;
use jobhawk_core::site::SiteProfile;
use std::path::PathBuf;

pub struct ScrapeArgs {
    pub title: String,
    pub location: String,
    pub site: String,
    pub max_items: usize,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub profile: Option<String>,
    pub output_dir: PathBuf,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn execute(args: ScrapeArgs) -> Result<()> {
    // Everything that can fail cheaply is checked before Chrome comes up.
    let site = SiteProfile::by_id(&args.site)?;

    let credentials = match (args.email, args.password) {
        (Some(email), Some(password)) => Credentials::new(email, password),
        _ => anyhow::bail!(
            "Missing credentials. Set JOBHAWK_EMAIL and JOBHAWK_PASSWORD (or pass --email/--password)."
        ),
    };

    let state_dir = super::state_dir()?;
    let profile_dir = args
        .profile
        .as_ref()
        .map(|name| state_dir.join("profiles").join(name));

    if let Some(ref dir) = profile_dir {
        println!("📁 Using profile: {}", dir.display());
    } else {
        println!("📁 Using temporary profile");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        println!("🚀 Launching Chrome...");
        let mut runner = Runner::open(RunnerConfig {
            site: site.clone(),
            state_dir,
            headless: args.headless,
            chrome_path: args.chrome_path,
            profile_dir,
            pacer: Pacer::human(),
        })
        .await?;

        println!(
            "🔍 Scraping {} for '{}' in '{}'...",
            site.id, args.title, args.location
        );

        let params = SearchParams::new(&args.title, &args.location);
        let outcome = runner.run(&params, &credentials, args.max_items).await;

        // The browser session is released on every exit path.
        runner.close().await;

        let report = outcome?;

        if report.is_empty() {
            println!("No listings extracted, no result file written.");
            if report.skipped > 0 {
                println!("   ({} cards skipped)", report.skipped);
            }
            return Ok(());
        }

        let writer = ReportWriter::new(&args.output_dir);
        let path = writer.write(&site.id, &report)?;

        use console::style;
        println!(
            "\n{} Scraped {} listings ({} skipped)",
            style("✅").green(),
            style(report.len()).bold(),
            report.skipped
        );
        if let Some(path) = path {
            println!("💾 Saved results to {}", path.display());
        }

        Ok(())
    });

    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}

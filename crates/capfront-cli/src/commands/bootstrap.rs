use anyhow::Result;
use capfront_core::config::ClientConfig;

use super::utils::build_app;

pub async fn run(config: ClientConfig) -> Result<()> {
    let app = build_app(config)?;

    let report = match app.bootstrap.run().await {
        Ok(report) => report,
        Err(e) => anyhow::bail!("{} ({})", e.user_facing(), e),
    };

    println!("Logged in as {}", report.admin);
    if !report.registry_complete {
        println!("Warning: the registry is incomplete");
    }

    let registry = app.registry.snapshot().await;
    println!("\nTemplates ({}):", registry.templates.len());
    for template in &registry.templates {
        println!(
            "  {:>4}  {}  [{}]",
            template.id, template.name, template.state
        );
    }

    println!("\nUsers ({}):", registry.users.len());
    for user in &registry.users {
        println!(
            "  {:>4}  {}{}  simulation {}",
            user.id,
            user.username,
            if user.is_superuser { " (admin)" } else { "" },
            user.current_simulation
        );
    }
    println!("\n{} placeholder sessions created", report.placeholders);

    Ok(())
}

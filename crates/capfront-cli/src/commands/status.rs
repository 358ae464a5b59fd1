use anyhow::Result;
use capfront_core::config::ClientConfig;

use super::utils::build_app;

pub async fn run(config: ClientConfig, username: &str, password: &str) -> Result<()> {
    let app = build_app(config)?;

    let outcome = match app.auth.login(username, password).await {
        Ok(outcome) => outcome,
        Err(e) => anyhow::bail!("{} ({})", e.user_facing(), e),
    };

    let page = app.page(username).await;
    let snapshot = &page.snapshot;

    println!("User:        {}", page.username);
    println!("State:       {}", page.state);
    println!(
        "Simulation:  {} ({})",
        page.current_simulation_id,
        page.simulation().name
    );
    println!("Message:     {}", outcome.message.text);
    if let Some(synced) = page.last_synced_at {
        println!("Synced at:   {}", synced.to_rfc3339());
    }

    println!();
    println!("simulations     {}", snapshot.simulations.len());
    println!("commodities     {}", snapshot.commodities.len());
    println!("industries      {}", snapshot.industries.len());
    println!("classes         {}", snapshot.classes.len());
    println!("stocks          {}", snapshot.stocks.len());
    println!("traces          {}", snapshot.traces.len());

    for industry in &snapshot.industries {
        println!(
            "  {} produces {} (money stock {})",
            industry.name,
            snapshot.industry_output_commodity(industry).name,
            snapshot.industry_money_stock(industry).size
        );
    }

    Ok(())
}

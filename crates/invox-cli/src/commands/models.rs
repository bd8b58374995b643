//! Models command - list selectable completion models.

use console::style;

use super::config;

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = config::load(config_path)?;
    let active = config.api.model.as_str();

    println!("{}", style("Models").bold());
    println!();

    for model in config.api.model_choices() {
        if model == active {
            println!("  {} {} {}", style("●").green(), style(model).cyan().bold(), style("(active)").dim());
        } else {
            println!("  {} {}", style("○").dim(), model);
        }
    }

    println!();
    println!("Endpoint: {}", config.api.base_url);
    println!();
    println!("Select a model with --model, the MODEL environment variable,");
    println!("or 'invox config set api.model <name>'.");

    Ok(())
}

use log::error;
use recipe_harvest::{harvest_site, Site};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    // Usage: recipe-harvest <site> <count>
    let args: Vec<String> = env::args().collect();
    let (Some(site), Some(count)) = (args.get(1), args.get(2)) else {
        eprintln!("Usage: recipe-harvest <budgetbytes|food.com|foodnetwork> <count>");
        process::exit(2);
    };

    let site: Site = match site.parse() {
        Ok(site) => site,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };
    let count: usize = match count.parse() {
        Ok(count) => count,
        Err(_) => {
            eprintln!("Count must be a non-negative number, got {count}");
            process::exit(2);
        }
    };

    match harvest_site(site, count).await {
        Ok(recipes) => match serde_json::to_string_pretty(&recipes) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Could not serialize recipes: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Harvest failed: {}", e);
            process::exit(1);
        }
    }
}

//! Market Cache CLI - one-shot queries against the marketplace API
//!
//! Stand-in for the chat front-end: drives the cache and lookup contracts
//! and prints plain text.

use clap::Parser;
use market_cache::{
    with_deadline, Config, ItemEntry, MarketCache, MarketClient, Order, OrderSide, Translations,
    INTERACTIVE_TIMEOUT,
};

/// Marketplace price lookups - categories, order books and item search
#[derive(Parser, Debug)]
#[command(name = "market_cache")]
#[command(version, about, long_about = None)]
struct Args {
    /// List all market categories
    #[arg(long)]
    categories: bool,

    /// List items and best prices for a category
    #[arg(long)]
    category: Option<String>,

    /// Show order details for an item (display name or identifier)
    #[arg(long)]
    item: Option<String>,

    /// With --item: bypass the cache and fetch fresh data
    #[arg(long, default_value_t = false)]
    fresh: bool,

    /// Search items across the whole catalog
    #[arg(long)]
    search: Option<String>,

    /// Path to the item translation file
    #[arg(short, long, default_value = "item-translations.json")]
    translations: String,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let translations = match Translations::load(&args.translations) {
        Ok(translations) => translations,
        Err(e) => {
            log::warn!(
                "translation table unavailable ({}), falling back to raw identifiers",
                e
            );
            Translations::default()
        }
    };

    let client = MarketClient::new(config);
    let cache = MarketCache::new(client.clone());

    if args.categories {
        list_categories(&cache).await;
    } else if let Some(category) = args.category.as_deref() {
        list_category(&cache, &translations, category).await;
    } else if let Some(query) = args.search.as_deref() {
        search(&cache, &translations, query).await;
    } else if let Some(item) = args.item.as_deref() {
        show_item(&cache, &client, &translations, item, args.fresh).await;
    } else {
        eprintln!("nothing to do; try --categories, --category, --item or --search");
        std::process::exit(2);
    }
}

async fn list_categories(cache: &MarketCache) {
    let categories = cache.categories().await;
    if categories.is_empty() {
        println!("no categories available");
        return;
    }
    for category in categories {
        println!("{}", category);
    }
}

async fn list_category(cache: &MarketCache, translations: &Translations, category: &str) {
    let ids = cache.items_for_category(category).await;
    if ids.is_empty() {
        println!("no items found in category '{}'", category);
        return;
    }
    println!("{} items in '{}':", ids.len(), category);
    for item_id in &ids {
        if let Some(entry) = cache.item(item_id).await {
            println!(
                "  {:<32} buy {:>12}  sell {:>12}",
                translations.display_name(item_id),
                format_price(entry.best_order(OrderSide::Buy)),
                format_price(entry.best_order(OrderSide::Sell)),
            );
        }
    }
}

async fn show_item(
    cache: &MarketCache,
    client: &MarketClient,
    translations: &Translations,
    name: &str,
    fresh: bool,
) {
    let item_id = translations.reverse_lookup(name);
    let entry: Option<ItemEntry> = if fresh {
        match client.fetch_all_items().await {
            Ok(mut all_items) => all_items.remove(item_id),
            Err(e) => {
                log::warn!("fresh item fetch failed: {}", e);
                None
            }
        }
    } else {
        cache.full_catalog().await.remove(item_id)
    };

    let entry = match entry {
        Some(entry) => entry,
        None => {
            println!("item '{}' not found", name);
            return;
        }
    };

    println!("item:     {}", translations.display_name(item_id));
    println!("category: {}", entry.category);
    print_side("buy", entry.best_order(OrderSide::Buy));
    print_side("sell", entry.best_order(OrderSide::Sell));
}

async fn search(cache: &MarketCache, translations: &Translations, query: &str) {
    let catalog = with_deadline(INTERACTIVE_TIMEOUT, cache.full_catalog()).await;
    let mut ids: Vec<&str> = catalog.keys().map(String::as_str).collect();
    ids.sort_unstable();

    let suggestions = translations.rank_candidates(query, ids);
    if suggestions.is_empty() {
        println!("no matches for '{}'", query);
        return;
    }
    for suggestion in suggestions {
        println!("{} ({})", suggestion.display_name, suggestion.item_id);
    }
}

fn format_price(order: Option<&Order>) -> String {
    match order {
        Some(order) => format!("{} $", order.price),
        None => "N/A".to_string(),
    }
}

fn print_side(label: &str, order: Option<&Order>) {
    match order {
        Some(order) => println!(
            "{:<9} {} $ ({} active orders)",
            format!("{}:", label),
            order.price,
            order.active_orders
        ),
        None => println!("{:<9} N/A", format!("{}:", label)),
    }
}

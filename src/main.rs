use rental_finder::feed::{FeedPhase, IntersectionEvent, ScrollTrigger, Viewport};
use rental_finder::{
    Config, Feed, HealthMonitor, OffsetPaging, Rental, RentalFilters, RentalsClient,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Height of one rendered listing card
const CARD_HEIGHT: f32 = 180.0;
const VIEWPORT_HEIGHT: f32 = 900.0;
const MAX_PAGES: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Rental Finder - Latest Rental Listings");
    info!("=========================================");

    let config = Config::from_env();
    info!("Using rentals API at {}", config.api_base_url);

    let client = Arc::new(RentalsClient::new(&config)?);
    let health = HealthMonitor::spawn(client.clone(), config.health_interval);

    let mut feed = Feed::new(OffsetPaging::new(client), config.page_size);
    let mut trigger = ScrollTrigger::new();
    let mut viewport = Viewport::new(0.0, VIEWPORT_HEIGHT);
    let mut printed = 0;

    feed.load_initial(RentalFilters::default()).await;

    loop {
        if let Some(error) = feed.error() {
            warn!("⚠️  {}", error);
        }
        printed = print_new(feed.items(), printed);

        if feed.page() >= MAX_PAGES {
            info!("Stopping after {} pages", MAX_PAGES);
            break;
        }

        // Re-render: the sentinel is now the last card
        trigger.attach(feed.last_item_id(), feed.status());
        let Some(last_id) = feed.last_item_id().map(str::to_string) else {
            break;
        };
        let last_top = (feed.items().len() - 1) as f32 * CARD_HEIGHT;

        // Scroll down until the last card comes within the margin
        let fired = loop {
            let visible = viewport.intersects(last_top, last_top + CARD_HEIGHT);
            let event = IntersectionEvent::new(last_id.as_str(), visible);
            if trigger.observe(&event, feed.status()) {
                break true;
            }
            if visible {
                break false;
            }
            viewport.scroll_by(VIEWPORT_HEIGHT / 2.0);
        };
        if !fired {
            break;
        }

        feed.load_more().await;
        if let Some(error) = feed.error() {
            warn!("⚠️  {} (keeping {} rentals)", error, feed.items().len());
            break;
        }
    }

    match feed.phase() {
        FeedPhase::Empty => println!("No rentals found. Check back later for new listings."),
        FeedPhase::Listing if !feed.has_more() => {
            println!("You've reached the end of the listings")
        }
        _ => {}
    }

    info!("✅ Showed {} rentals", feed.items().len());
    info!("API status: {}", health.state().label());

    trigger.release();
    health.stop();

    Ok(())
}

/// Print the rentals after the first `already` ones; returns the new count
fn print_new(rentals: &[Rental], already: usize) -> usize {
    for (i, rental) in rentals.iter().enumerate().skip(already) {
        println!("{}. {} (€{}/month)", i + 1, rental.location, rental.price);
        println!("   {}", rental.property_type_label());
        if let Some(bedrooms) = rental.num_bedrooms {
            println!("   {} bed{}", bedrooms, if bedrooms > 1 { "s" } else { "" });
        }
        if !rental.tenant_preference.is_empty() && rental.tenant_preference != "indifferente" {
            println!("   For: {}", rental.tenant_preference_label());
        }
        if !rental.summary.is_empty() {
            println!("   {}", rental.summary);
        }
        if rental.has_commute_info() {
            println!("   Commute {}", rental.commute_summary());
        }
        if let Some(posted) = rental.posted_at() {
            println!("   Posted: {}", posted.format("%B %-d, %Y %H:%M"));
        }
        if let Some(phone) = &rental.telephone {
            println!("   Tel: {}", phone);
        }
        println!("   ID: {}", rental.id);
        println!();
    }
    rentals.len()
}

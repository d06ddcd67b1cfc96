use std::io::{self, Read};

use clap::{Args, Parser, Subcommand};
use listing::api::{ListingApi, ScanRequest, is_valid_upc, parse_batch};
use listing::category::marketplace_category_id;
use listing::condition::CONDITIONS;
use listing::market::MarketWindow;
use listing::registry;
use listing::suggestion::HIGH_CONFIDENCE;
use listing::template::template_key;
use listing::{ListingSession, SubmitError};
use scanlist::config::{DEFAULT_API_URL, DEFAULT_CONNECT_TIMEOUT_SECS};
use scanlist::draft::{DraftOptions, build_draft, parse_key_value};
use scanlist::{CliError, Config, HttpBackend, Timeouts};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "scanlist", about = "Scan products and create marketplace listings")]
struct Cli {
    #[arg(long, env = "SCANLIST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "SCANLIST_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    #[arg(long, env = "SCANLIST_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Log requests and decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categories with category-specific fields, and their marketplace ids.
    Categories,
    /// Category-specific fields for a category.
    Fields { category: String },
    /// Item condition ids.
    Conditions,
    /// Look up one UPC.
    Scan {
        upc: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Look up many UPCs, one `upc[,quantity]` per line.
    Batch {
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// Item specifics for a category name or marketplace id.
    Aspects { category: String },
    /// Recommended values for one aspect.
    Values { category: String, aspect: String },
    /// AI suggestions for a category's item specifics.
    Suggest(SuggestArgs),
    /// Details of an existing listing.
    Similar { item_id: String },
    /// Raw description template for a category.
    Template { category: String },
    /// Sold-listing research for a UPC.
    Market {
        upc: String,
        /// 30, 90 or 365.
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Build a listing and submit it.
    Create(CreateArgs),
}

#[derive(Args, Debug)]
struct SuggestArgs {
    category: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    upc: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Ask for a single aspect instead of all of them.
    #[arg(long)]
    aspect: Option<String>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Seed the listing from a UPC scan.
    #[arg(long)]
    upc: Option<String>,
    #[arg(long)]
    quantity: Option<u32>,
    /// Copy details from an existing listing.
    #[arg(long)]
    similar: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    category_id: Option<String>,
    #[arg(long)]
    condition: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long = "image")]
    images: Vec<String>,
    /// Category field, `name=value`. Repeatable.
    #[arg(long = "field", value_parser = parse_key_value)]
    fields: Vec<(String, String)>,
    /// Item specific, `name=value`. Repeatable.
    #[arg(long = "aspect", value_parser = parse_key_value)]
    aspects: Vec<(String, String)>,
    /// Fill empty item specifics from AI suggestions.
    #[arg(long)]
    auto_fill: bool,
    #[arg(long, default_value_t = HIGH_CONFIDENCE)]
    min_confidence: f64,
    /// Render the category's description template into the description.
    #[arg(long)]
    fill_description: bool,
    /// Print the payload instead of submitting it.
    #[arg(long)]
    dry_run: bool,
}

impl From<CreateArgs> for DraftOptions {
    fn from(args: CreateArgs) -> Self {
        Self {
            upc: args.upc,
            quantity: args.quantity,
            similar: args.similar,
            title: args.title,
            description: args.description,
            category: args.category,
            category_id: args.category_id,
            condition_id: args.condition,
            price: args.price,
            images: args.images,
            fields: args.fields,
            aspects: args.aspects,
            auto_fill: args.auto_fill.then_some(args.min_confidence),
            fill_description: args.fill_description,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN })
        .init();

    let timeouts = Timeouts { request_secs: cli.request_timeout_secs, connect_secs: cli.connect_timeout_secs };
    let config = Config::new(&cli.api_url, timeouts)?;

    match cli.command {
        Command::Categories => {
            run_categories();
            Ok(())
        }
        Command::Fields { category } => run_fields(&category),
        Command::Conditions => {
            run_conditions();
            Ok(())
        }
        command => {
            let api = HttpBackend::new(config)?;
            tracing::debug!(api_url = %api.config().api_url, "backend configured");
            run_remote(&api, command).await
        }
    }
}

// =============================================================================
// OFFLINE COMMANDS
// =============================================================================

fn run_categories() {
    for name in registry::categories() {
        println!("{:<8} {name}", marketplace_category_id(name));
    }
}

fn run_fields(category: &str) -> Result<(), CliError> {
    let fields = registry::fields_for(category);
    if fields.is_empty() {
        return Err(CliError::UnknownCategory(category.to_owned()));
    }
    print_json(&fields)
}

fn run_conditions() {
    for condition in CONDITIONS {
        println!("{:<6} {:<28} {}", condition.id, condition.label, condition.description);
    }
}

// =============================================================================
// BACKEND COMMANDS
// =============================================================================

async fn run_remote(api: &HttpBackend, command: Command) -> Result<(), CliError> {
    match command {
        Command::Scan { upc, quantity } => {
            if !is_valid_upc(&upc) {
                return Err(CliError::InvalidUpc(upc));
            }
            let product = api.scan_upc(&ScanRequest::new(upc, quantity)).await?;
            print_json(&product)
        }
        Command::Batch { input } => run_batch(api, &input).await,
        Command::Aspects { category } => {
            let groups = listing::aspect::fetch_item_specifics(api, category_id(&category)).await?;
            print_json(&groups)
        }
        Command::Values { category, aspect } => {
            let values = api.fetch_aspect_values(category_id(&category), &aspect).await?;
            print_json(&values)
        }
        Command::Suggest(args) => run_suggest(api, args).await,
        Command::Similar { item_id } => print_json(&api.fetch_listing(&item_id).await?),
        Command::Template { category } => {
            let key = template_key(&category).ok_or(CliError::NoTemplate(category))?;
            println!("{}", api.fetch_template(key).await?);
            Ok(())
        }
        Command::Market { upc, days } => run_market(api, &upc, days).await,
        Command::Create(args) => run_create(api, args).await,
        Command::Categories | Command::Fields { .. } | Command::Conditions => Ok(()),
    }
}

async fn run_batch(api: &HttpBackend, input: &str) -> Result<(), CliError> {
    let text = read_input(input)?;
    let (requests, rejected) = parse_batch(&text);
    for line in &rejected {
        tracing::warn!(%line, "skipping invalid UPC");
    }
    if requests.is_empty() {
        return Err(CliError::EmptyBatch);
    }

    let results = api.scan_batch(&requests).await?;
    for item in &results {
        match &item.result {
            Ok(product) => println!("{}\t{}", item.upc, product.title),
            Err(message) => println!("{}\terror: {message}", item.upc),
        }
    }
    Ok(())
}

async fn run_market(api: &HttpBackend, upc: &str, days: u32) -> Result<(), CliError> {
    if !is_valid_upc(upc) {
        return Err(CliError::InvalidUpc(upc.to_owned()));
    }
    let window = MarketWindow::from_days(days).ok_or(CliError::InvalidWindow(days))?;
    let data = api.fetch_market_data(upc, window).await?;
    if let Some((low, high)) = data.price_range() {
        tracing::info!(low, high, window = window.label(), "suggested price range");
    }
    print_json(&data)
}

async fn run_suggest(api: &HttpBackend, args: SuggestArgs) -> Result<(), CliError> {
    let mut session = ListingSession::new();
    if registry::categories().any(|c| c == args.category) {
        session.select_category(&args.category);
    } else {
        session.set_category_id(category_id(&args.category));
    }
    session.edit(|f| {
        f.title = args.title.unwrap_or_default();
        f.upc = args.upc.unwrap_or_default();
        f.brand = args.brand.unwrap_or_default();
        f.description = args.description.unwrap_or_default();
    });

    match args.aspect {
        Some(aspect) => {
            let suggestion = session.refresh_suggestion(api, &aspect).await?;
            print_json(&suggestion)
        }
        None => {
            session.request_suggestions(api).await?;
            let mut suggestions: Vec<_> = session.suggestions().values().collect();
            suggestions.sort_by(|a, b| a.aspect_name.cmp(&b.aspect_name));
            print_json(&suggestions)
        }
    }
}

async fn run_create(api: &HttpBackend, args: CreateArgs) -> Result<(), CliError> {
    let dry_run = args.dry_run;
    let mut session = build_draft(api, &DraftOptions::from(args)).await?;

    let issues = session.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {issue}");
        }
        return Err(SubmitError::Validation(issues).into());
    }

    if dry_run {
        let payload = session.begin_submit()?;
        return print_json(&payload);
    }

    let created = session.submit(api).await?;
    print_json(&created)
}

// =============================================================================
// HELPERS
// =============================================================================

/// A registry category name maps to its marketplace id; anything else is
/// taken as an id already.
fn category_id(raw: &str) -> &str {
    if registry::categories().any(|c| c == raw) { marketplace_category_id(raw) } else { raw }
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

//! Storefront catalog CLI
//!
//! Exercises the retrieval layer against a configured catalog service,
//! falling back to the local dataset when the service is unavailable.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use storefront::{
    config,
    error::Result,
    models::{
        CategoryNode, Condition, ConditionGrade, ProductRecord, RoutingMode, SearchCriteria,
        SortDirection, SortField,
    },
    services::{CatalogBrowser, FetchOutcome, featured_first},
};

/// Storefront catalog retrieval tool
#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Catalog retrieval layer CLI")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storefront.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Always try the remote service first
    #[arg(long, global = true, conflicts_with = "force_secondary")]
    force_primary: bool,

    /// Always use the local fallback dataset
    #[arg(long, global = true)]
    force_secondary: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search products, fetching pages in order
    Search {
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long)]
        category: Option<i64>,

        #[arg(long, value_enum, default_value_t = ConditionArg::New)]
        condition: ConditionArg,

        #[arg(long, value_enum)]
        grade: Option<GradeArg>,

        #[arg(long)]
        min_price: Option<u64>,

        #[arg(long)]
        max_price: Option<u64>,

        #[arg(long, value_enum, default_value_t = SortArg::CreatedAt)]
        sort: SortArg,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Show a single product
    Detail { id: i64 },

    /// Print the category tree
    Categories {
        /// Order top-level categories featured first, then by name
        #[arg(long)]
        featured_first: bool,
    },

    /// Probe the remote service and report its health
    Probe,

    /// Validate configuration
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConditionArg {
    New,
    Used,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GradeArg {
    S,
    A,
    B,
    C,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    CreatedAt,
    Price,
    Name,
    Stock,
}

impl From<ConditionArg> for Condition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::New => Condition::New,
            ConditionArg::Used => Condition::Used,
        }
    }
}

impl From<GradeArg> for ConditionGrade {
    fn from(arg: GradeArg) -> Self {
        match arg {
            GradeArg::S => ConditionGrade::S,
            GradeArg::A => ConditionGrade::A,
            GradeArg::B => ConditionGrade::B,
            GradeArg::C => ConditionGrade::C,
        }
    }
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::CreatedAt => SortField::CreatedAt,
            SortArg::Price => SortField::Price,
            SortArg::Name => SortField::Name,
            SortArg::Stock => SortField::StockQuantity,
        }
    }
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_product(product: &ProductRecord) {
    let grade = product
        .condition_grade
        .map(|g| format!("/{}", g.as_str()))
        .unwrap_or_default();
    println!(
        "#{:<5} {:<40} {:>12.0}  {}{}  [{}]  stock {}",
        product.id,
        product.name,
        product.price,
        product.condition.as_str(),
        grade,
        product.category_name(),
        product.stock_quantity
    );
}

fn print_tree(nodes: &[CategoryNode], depth: usize) {
    for node in nodes {
        let star = if node.is_featured() { " *" } else { "" };
        println!(
            "{}{} [{}] ({}, {}){}",
            "  ".repeat(depth),
            node.name(),
            node.id(),
            node.display.icon,
            node.display.color_theme,
            star
        );
        print_tree(&node.children, depth + 1);
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(&cli.config)?;
    init_logging(cli.verbose, &config.logging.level);

    if cli.force_primary {
        config.routing.mode = RoutingMode::Primary;
    } else if cli.force_secondary {
        config.routing.mode = RoutingMode::Secondary;
    }

    log::debug!("Loaded configuration from {}", cli.config.display());

    let selector = Arc::new(config::build_selector(&config).await?);

    match cli.command {
        Command::Search {
            keyword,
            category,
            condition,
            grade,
            min_price,
            max_price,
            sort,
            asc,
            page_size,
            pages,
        } => {
            let direction = if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };
            let mut criteria = SearchCriteria::new()
                .with_condition(condition.into())
                .sorted_by(sort.into(), direction)
                .with_page_size(page_size.unwrap_or(config.catalog.default_page_size));
            if let Some(keyword) = keyword {
                criteria = criteria.with_keyword(keyword);
            }
            if let Some(category) = category {
                criteria = criteria.with_category(category);
            }
            if let Some(grade) = grade {
                criteria = criteria.with_grade(grade.into());
            }
            if min_price.is_some() || max_price.is_some() {
                criteria = criteria
                    .with_price_range(min_price.unwrap_or(0), max_price.unwrap_or(u64::MAX));
            }

            let browser = CatalogBrowser::<ProductRecord>::new(selector.clone());
            browser.set_criteria(criteria);

            for _ in 0..pages {
                match browser.fetch_next().await? {
                    FetchOutcome::Appended { has_next: true, .. } => continue,
                    _ => break,
                }
            }

            let items = browser.items();
            for product in &items {
                print_product(product);
            }

            let total = browser
                .session()
                .and_then(|session| session.total_elements())
                .unwrap_or(0);
            let more = browser
                .session()
                .is_some_and(|session| !session.is_exhausted());
            log::info!(
                "Showing {} of {} results{}",
                items.len(),
                total,
                if more { " (more available)" } else { "" }
            );
        }

        Command::Detail { id } => {
            let product = selector.get_detail(id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }

        Command::Categories {
            featured_first: reorder,
        } => {
            let records = selector.list_categories().await?;
            let forest = config::build_reconstructor(&config).build(&records);
            let forest = if reorder {
                featured_first(&forest)
            } else {
                forest
            };
            print_tree(&forest, 0);
        }

        Command::Probe => {
            let outcome = selector.probe().await;
            let snapshot = selector.health().snapshot();
            log::info!(
                "Primary health: {:?} (probed at {})",
                outcome,
                snapshot
                    .probed_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use givechain_core::config::LatencyConfig;
use givechain_core::form::{parse_amount, DonationForm, DEFAULT_AMOUNT};
use givechain_core::{
    Amount, Charity, CharityDraft, CharityFilter, Config, Donation, Operation, SocialLinks, Store,
};

//==================== Arguments ====================//

#[derive(Parser, Debug)]
#[command(
    name = "givechain",
    version,
    about = "Browse charities and donate (chain simulated in memory)"
)]
struct Cli {
    /// JSON file with latency and fault settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the simulated network delay
    #[arg(long, global = true)]
    instant: bool,

    /// Make an operation fail every time (repeatable), e.g. `make-donation`
    #[arg(long = "fail", global = true, value_name = "OP")]
    fail: Vec<Operation>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List charities, optionally filtered
    Charities {
        /// Only featured charities
        #[arg(long)]
        featured: bool,
        /// Match against name and description, ignoring case
        #[arg(long, default_value = "")]
        search: String,
        /// Exact category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one charity
    Charity { id: String },
    /// List the categories in use
    Categories,
    /// List donations, all or for one wallet
    Donations {
        /// Wallet address, compared ignoring case
        #[arg(long, value_name = "ADDRESS")]
        user: Option<String>,
    },
    /// Donate to a charity
    Donate(DonateArgs),
    /// Register a new charity (starts unverified)
    Register(RegisterArgs),
}

#[derive(Args, Debug)]
struct DonateArgs {
    #[arg(long, value_name = "ID")]
    charity: String,
    /// Whole STX
    #[arg(long, default_value_t = DEFAULT_AMOUNT, value_parser = parse_amount)]
    amount: Amount,
    /// Donor wallet address; empty when no wallet is connected
    #[arg(long, default_value = "", value_name = "ADDRESS")]
    wallet: String,
    #[arg(long, default_value = "")]
    name: String,
    /// Record the donor as "Anonymous"
    #[arg(long)]
    anonymous: bool,
    #[arg(long, default_value = "")]
    message: String,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    mission: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    website: String,
    /// Address that receives donations
    #[arg(long, value_name = "ADDRESS")]
    wallet: String,
    #[arg(long, default_value = "")]
    image_url: String,
    #[arg(long)]
    twitter: Option<String>,
    #[arg(long)]
    facebook: Option<String>,
    #[arg(long)]
    instagram: Option<String>,
}

impl From<RegisterArgs> for CharityDraft {
    fn from(args: RegisterArgs) -> Self {
        let links = SocialLinks {
            twitter: args.twitter,
            facebook: args.facebook,
            instagram: args.instagram,
        };
        CharityDraft {
            name: args.name,
            description: args.description,
            mission: args.mission,
            category: args.category,
            image_url: args.image_url,
            website: args.website,
            wallet_address: args.wallet,
            social_links: (!links.is_empty()).then_some(links),
        }
    }
}

//==================== Setup ====================//

fn init_tracing(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if cli.instant {
        config.latency = LatencyConfig::zero();
    }
    config.faults.fail.extend(cli.fail.iter().copied());
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//==================== Commands ====================//

async fn charities_cmd(
    store: &Store,
    featured: bool,
    search: String,
    category: Option<String>,
) -> Result<()> {
    let filter = CharityFilter {
        term: search,
        category,
    };
    if featured {
        store.fetch_featured_charities().await?;
        let featured: Vec<_> = store
            .registry
            .featured_charities()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        return print_json(&featured);
    }
    store.fetch_charities().await?;
    let state = store.registry.snapshot();
    print_json(&state.search(&filter))
}

async fn charity_cmd(store: &Store, id: &str) -> Result<()> {
    store.fetch_charities().await?;
    match store.registry.find(id) {
        Some(charity) => print_json(&charity),
        None => bail!("no charity with id {id}"),
    }
}

async fn categories_cmd(store: &Store) -> Result<()> {
    store.fetch_charities().await?;
    let state = store.registry.snapshot();
    print_json(&state.categories())
}

async fn donations_cmd(store: &Store, user: Option<String>) -> Result<()> {
    match user {
        Some(address) => {
            store.fetch_user_donations(&address).await?;
            print_json(&store.ledger.user_donations())
        }
        None => {
            store.fetch_donations().await?;
            print_json(&store.ledger.donations())
        }
    }
}

#[derive(Serialize)]
struct DonationReceipt {
    donation: Donation,
    charity: Charity,
}

async fn donate_cmd(store: &Store, args: DonateArgs) -> Result<()> {
    // Charity details and donation history are needed before submitting:
    // the draft copies the charity name, and history decides whether the
    // donor counts as new.
    store.fetch_charities().await?;
    store.fetch_donations().await?;
    let charity = match store.registry.find(&args.charity) {
        Some(charity) => charity,
        None => bail!("no charity with id {}", args.charity),
    };

    let form = DonationForm {
        amount: args.amount,
        donor_name: args.name,
        anonymous: args.anonymous,
        message: args.message,
    };
    let draft = form.into_draft(&charity, &args.wallet)?;
    info!(charity = %charity.name, amount = draft.amount, "submitting donation");
    let donation = store.make_donation(draft).await?;
    if donation.is_anonymous() {
        info!(id = %donation.id, "donation recorded without a donor name");
    }

    let charity = store
        .registry
        .find(&donation.charity_id)
        .context("charity vanished after donating")?;
    print_json(&DonationReceipt { donation, charity })
}

async fn register_cmd(store: &Store, args: RegisterArgs) -> Result<()> {
    let draft = CharityDraft::from(args);
    draft.validate()?;
    let charity = store.register_charity(draft).await?;
    info!(id = %charity.id, "registration submitted; the charity stays unverified until reviewed");
    print_json(&charity)
}

//==================== main ====================//

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = load_config(&cli)?;
    let store = Store::from_config(&config)?;

    match cli.command {
        Command::Charities {
            featured,
            search,
            category,
        } => charities_cmd(&store, featured, search, category).await,
        Command::Charity { id } => charity_cmd(&store, &id).await,
        Command::Categories => categories_cmd(&store).await,
        Command::Donations { user } => donations_cmd(&store, user).await,
        Command::Donate(args) => donate_cmd(&store, args).await,
        Command::Register(args) => register_cmd(&store, args).await,
    }
}

//! Paws & Co CLI - shop for pets and pet supplies from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! paws catalog products
//! paws catalog species
//! paws catalog pets --species 2
//! paws catalog pet 4
//!
//! # Fill the cart
//! paws cart add-product 12
//! paws cart set-quantity product 12 3
//! paws cart show
//!
//! # Sign in and check out
//! paws register -u an -e an@example.com --first-name An --last-name Nguyen --phone 0901234567
//! paws login -e an@example.com
//! paws checkout --address "12 Nguyen Hue, Q1" --payment bank --voucher SALE10
//!
//! # Order history
//! paws orders list
//! paws orders show 42
//!
//! # Grooming
//! paws grooming services
//! paws grooming book --service 1 --pet Milo --date 2026-10-20 --time 09:00
//! ```
//!
//! # Commands
//!
//! - `catalog` - Browse products, pets and breeds
//! - `cart` - View and change the cart
//! - `register` / `login` / `logout` / `whoami` - Manage the account and session
//! - `profile` / `password` - Account details and passwords
//! - `checkout` - Place an order for the cart
//! - `orders` - Order history
//! - `grooming` - Grooming services and appointments

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output goes to stdout, failures to stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pawshop_core::{ItemKind, OrderId, PaymentMethod, PetId, PetType, ProductId, SpeciesId};
use pawshop_storefront::config::StorefrontConfig;
use pawshop_storefront::services::ProfileChanges;
use pawshop_storefront::{AppError, Storefront};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "paws")]
#[command(author, version, about = "Paws & Co storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products and pets
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Password (read twice from stdin if omitted)
        #[arg(short, long, env = "PAWS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (read from stdin if omitted)
        #[arg(short, long, env = "PAWS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Place an order for everything in the cart
    Checkout {
        /// Shipping address
        #[arg(short, long)]
        address: String,

        /// Payment method (`cod` or `bank`)
        #[arg(short, long, default_value_t = PaymentMethod::Cod)]
        payment: PaymentMethod,

        /// Voucher code to apply
        #[arg(short, long)]
        voucher: Option<String>,

        /// Recipient name (defaults to the account name)
        #[arg(long)]
        name: Option<String>,

        /// Contact email (defaults to the account email)
        #[arg(long)]
        email: Option<String>,

        /// Contact phone number (defaults to the account phone)
        #[arg(long)]
        phone: Option<String>,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Change, forget or reset your password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Grooming services and appointments
    Grooming {
        #[command(subcommand)]
        action: GroomingAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all products
    Products,
    /// List pets for sale
    Pets {
        /// Only pets of this breed (see `catalog species`)
        #[arg(short, long)]
        species: Option<SpeciesId>,

        /// Match name or description
        #[arg(long)]
        search: Option<String>,
    },
    /// List breeds
    Species,
    /// Show one product
    Product { id: ProductId },
    /// Show one pet
    Pet { id: PetId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    AddProduct { id: ProductId },
    /// Add a pet
    AddPet { id: PetId },
    /// Remove a line (`product` or `pet`, then the id)
    Remove { kind: ItemKind, id: i32 },
    /// Change a line's quantity; zero removes it
    SetQuantity {
        kind: ItemKind,
        id: i32,
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: OrderId },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your saved profile
    Show,
    /// Change profile fields; omitted fields keep their value
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Change your password (prompts for the current and new password)
    Change {
        /// Current password (read from stdin if omitted)
        #[arg(long, env = "PAWS_PASSWORD", hide_env_values = true)]
        current: Option<String>,
    },
    /// Email yourself a reset token
    Forgot {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password with an emailed reset token
    Reset {
        #[arg(short, long)]
        token: String,
    },
}

#[derive(Subcommand)]
enum GroomingAction {
    /// Show the grooming menu and bookable times
    Services,
    /// Book an appointment
    Book {
        /// Service number from `grooming services`
        #[arg(short, long)]
        service: u8,

        /// Your pet's name
        #[arg(long)]
        pet: String,

        /// `dog`, `cat` or `other`
        #[arg(long, default_value_t = PetType::Dog)]
        pet_type: PetType,

        /// Day of the appointment (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Start time, e.g. 09:00
        #[arg(short, long, default_value = "09:00")]
        time: String,

        /// Owner name (defaults to the account name)
        #[arg(long)]
        owner: Option<String>,

        /// Contact phone (defaults to the account phone)
        #[arg(long)]
        phone: Option<String>,

        /// Anything the groomer should know
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List your appointments
    List,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pawshop_storefront=info,paws=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut storefront = Storefront::open(config)?;

    match cli.command {
        Commands::Catalog { action } => {
            let client = storefront.client();
            match action {
                CatalogAction::Products => commands::catalog::products(&client).await?,
                CatalogAction::Pets { species, search } => {
                    commands::catalog::pets(&storefront, species, search.as_deref()).await?;
                }
                CatalogAction::Species => commands::catalog::species(&client).await?,
                CatalogAction::Product { id } => commands::catalog::product(&client, id).await?,
                CatalogAction::Pet { id } => commands::catalog::pet(&client, id).await?,
            }
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(storefront.cart()),
            CartAction::AddProduct { id } => commands::cart::add_product(&mut storefront, id).await?,
            CartAction::AddPet { id } => commands::cart::add_pet(&mut storefront, id).await?,
            CartAction::Remove { kind, id } => commands::cart::remove(&mut storefront, kind, id),
            CartAction::SetQuantity { kind, id, quantity } => {
                commands::cart::set_quantity(&mut storefront, kind, id, quantity);
            }
            CartAction::Clear => commands::cart::clear(&mut storefront),
        },
        Commands::Register {
            username,
            email,
            first_name,
            last_name,
            phone,
            password,
        } => {
            let sign_up = commands::account::SignUp {
                username,
                email,
                first_name,
                last_name,
                phone,
                password,
            };
            commands::account::register(&storefront, sign_up).await?;
        }
        Commands::Login { email, password } => {
            commands::auth::login(&mut storefront, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&mut storefront)?,
        Commands::Whoami => commands::auth::whoami(&storefront),
        Commands::Checkout {
            address,
            payment,
            voucher,
            name,
            email,
            phone,
        } => {
            let overrides = commands::checkout::DetailOverrides {
                address,
                payment,
                name,
                email,
                phone,
            };
            commands::checkout::run(&mut storefront, overrides, voucher.as_deref()).await?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&mut storefront).await?,
            OrdersAction::Show { id } => commands::orders::show(&mut storefront, id).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::account::show_profile(&mut storefront).await?,
            ProfileAction::Edit {
                first_name,
                last_name,
                phone,
                avatar_url,
            } => {
                let changes = ProfileChanges {
                    first_name,
                    last_name,
                    phone_number: phone,
                    avatar_url,
                };
                commands::account::edit_profile(&mut storefront, changes).await?;
            }
        },
        Commands::Password { action } => match action {
            PasswordAction::Change { current } => {
                commands::account::change_password(&mut storefront, current).await?;
            }
            PasswordAction::Forgot { email } => {
                commands::account::forgot_password(&storefront, &email).await?;
            }
            PasswordAction::Reset { token } => {
                commands::account::reset_password(&storefront, token).await?;
            }
        },
        Commands::Grooming { action } => match action {
            GroomingAction::Services => commands::grooming::services(),
            GroomingAction::Book {
                service,
                pet,
                pet_type,
                date,
                time,
                owner,
                phone,
                note,
            } => {
                let args = commands::grooming::BookingArgs {
                    service,
                    pet,
                    pet_type,
                    date,
                    time,
                    owner,
                    phone,
                    note,
                };
                commands::grooming::book(&mut storefront, args).await?;
            }
            GroomingAction::List => commands::grooming::list(&mut storefront).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_cart_line_commands() {
        let cli = Cli::try_parse_from(["paws", "cart", "set-quantity", "pet", "4", "0"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::SetQuantity {
                    kind: ItemKind::Animal,
                    id: 4,
                    quantity: 0
                }
            })
        ));
    }

    #[test]
    fn test_checkout_payment_defaults_to_cod() {
        let cli = Cli::try_parse_from(["paws", "checkout", "--address", "12 Nguyen Hue"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Checkout {
                payment: PaymentMethod::Cod,
                voucher: None,
                ..
            })
        ));
    }

    #[test]
    fn test_parses_grooming_booking() {
        let cli = Cli::try_parse_from([
            "paws", "grooming", "book", "-s", "2", "--pet", "Mochi", "--pet-type", "cat", "-d",
            "2026-10-20",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Grooming {
                action: GroomingAction::Book {
                    service: 2,
                    pet_type: PetType::Cat,
                    ref time,
                    note: None,
                    ..
                }
            }) if time == "09:00"
        ));
        assert!(
            Cli::try_parse_from(["paws", "grooming", "book", "-s", "1", "--pet", "Milo", "-d", "20/10"])
                .is_err()
        );
    }

    #[test]
    fn test_parses_pet_filters() {
        let cli = Cli::try_parse_from(["paws", "catalog", "pets", "--species", "11"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Catalog {
                action: CatalogAction::Pets {
                    species: Some(id),
                    search: None
                }
            }) if id == SpeciesId::new(11)
        ));
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["paws", "cart", "remove", "toy", "1"]).is_err());
    }
}

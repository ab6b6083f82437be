//! GatherLove CLI - drive the platform from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in and inspect the current profile
//! gl-cli auth login -e donor@example.com -p hunter2
//! gl-cli auth me
//!
//! # Wallet
//! gl-cli wallet balance
//! gl-cli wallet top-up -a 50000 -m BANK_TRANSFER
//!
//! # Donate to a campaign
//! gl-cli donations give camp-001 -a 25000 -m "Semoga membantu"
//!
//! # Admin console
//! gl-cli admin stats
//! gl-cli admin approve camp-001
//! ```
//!
//! # Environment Variables
//!
//! - `GATHERLOVE_AUTH_URL` - Identity service base URL
//! - `GATHERLOVE_API_URL` - Core application base URL
//! - `GATHERLOVE_STATE_DIR` - Directory for the persisted session token

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gl-cli")]
#[command(author, version, about = "GatherLove command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session and account management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Wallet balance, history, and top-ups
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Browse campaigns and manage your own
    Campaigns {
        #[command(subcommand)]
        action: CampaignAction,
    },
    /// Donations
    Donations {
        #[command(subcommand)]
        action: DonationAction,
    },
    /// Admin moderation console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Platform announcements
    Announcements {
        #[command(subcommand)]
        action: AnnouncementAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and persist the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Register a new account (does not log in)
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Short bio
        #[arg(long)]
        bio: Option<String>,
    },
    /// Show the current session's profile
    Me,
    /// Edit the current session's profile
    Edit {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Short bio (at most 500 characters)
        #[arg(long)]
        bio: Option<String>,

        /// Profile picture URL
        #[arg(long)]
        picture: Option<String>,
    },
    /// Upgrade the current account to the fundraiser role
    Upgrade,
}

#[derive(Subcommand)]
enum WalletAction {
    /// Show the wallet balance
    Balance,
    /// List transactions
    Transactions {
        /// Page number (zero-based)
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Top up the wallet
    TopUp {
        /// Amount in rupiah
        #[arg(short, long)]
        amount: i64,

        /// Payment method (`BANK_TRANSFER`, `CREDIT_CARD`, `E_WALLET`)
        #[arg(short, long)]
        method: String,

        /// Phone number for e-wallet payments
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a top-up transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CampaignAction {
    /// List public campaigns
    List,
    /// Show one campaign
    Show {
        /// Campaign ID
        id: String,
    },
    /// List campaigns owned by the current fundraiser
    Mine,
    /// Create a campaign
    Create {
        /// Title shown to donors
        #[arg(short, long)]
        title: String,

        /// Long-form description
        #[arg(short, long)]
        description: String,

        /// Fundraising target in rupiah
        #[arg(short = 'a', long)]
        target: i64,

        /// First day donations are accepted (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day donations are accepted (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
    /// Edit an owned campaign
    Edit {
        /// Campaign ID
        id: String,

        /// Title shown to donors
        #[arg(short, long)]
        title: String,

        /// Long-form description
        #[arg(short, long)]
        description: String,

        /// Fundraising target in rupiah
        #[arg(short = 'a', long)]
        target: i64,

        /// First day donations are accepted (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day donations are accepted (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
    /// Attach a fund-usage proof link
    UploadProof {
        /// Campaign ID
        id: String,

        /// Proof link
        link: String,
    },
    /// Delete a campaign
    Delete {
        /// Campaign ID
        id: String,
    },
}

#[derive(Subcommand)]
enum DonationAction {
    /// List your donations
    List,
    /// Donate to a campaign
    Give {
        /// Campaign ID
        campaign_id: String,

        /// Amount in rupiah (1_000 to 10_000_000)
        #[arg(short, long)]
        amount: i64,

        /// Message to the fundraiser
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard statistics
    Stats,
    /// List campaigns in the moderation queue
    Campaigns,
    /// Approve a pending campaign
    Approve {
        /// Campaign ID
        id: String,
    },
    /// Reject a pending campaign
    Reject {
        /// Campaign ID
        id: String,

        /// Reason shown to the fundraiser
        #[arg(short, long)]
        reason: String,
    },
    /// List users
    Users {
        /// Page number (zero-based)
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Block a user
    Block {
        /// User ID
        id: String,

        /// Reason shown to the user
        #[arg(short, long)]
        reason: String,
    },
    /// Unblock a user
    Unblock {
        /// User ID
        id: String,
    },
}

#[derive(Subcommand)]
enum AnnouncementAction {
    /// List public announcements
    List,
    /// Publish an announcement (admin only)
    Create {
        /// Headline
        #[arg(short, long)]
        title: String,

        /// Body text
        #[arg(short, long)]
        content: String,
    },
    /// Remove an announcement (admin only)
    Delete {
        /// Announcement ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let client = commands::client()?;
    client.session().initialize().await?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&client, &email, &password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&client).await,
            AuthAction::Register {
                name,
                email,
                password,
                phone,
                bio,
            } => {
                commands::auth::register(&client, &name, &email, &password, phone, bio).await?;
            }
            AuthAction::Me => commands::auth::me(&client).await?,
            AuthAction::Edit {
                name,
                phone,
                bio,
                picture,
            } => {
                commands::auth::edit(&client, name, phone, bio, picture).await?;
            }
            AuthAction::Upgrade => commands::auth::upgrade(&client).await?,
        },
        Commands::Wallet { action } => match action {
            WalletAction::Balance => commands::wallet::balance(&client).await?,
            WalletAction::Transactions { page, size } => {
                commands::wallet::transactions(&client, page, size).await?;
            }
            WalletAction::TopUp {
                amount,
                method,
                phone,
            } => {
                commands::wallet::top_up(&client, amount, &method, phone.as_deref()).await?;
            }
            WalletAction::Delete { id } => {
                commands::wallet::delete_transaction(&client, &id).await?;
            }
        },
        Commands::Campaigns { action } => match action {
            CampaignAction::List => commands::campaigns::list(&client).await?,
            CampaignAction::Show { id } => commands::campaigns::show(&client, &id).await?,
            CampaignAction::Mine => commands::campaigns::mine(&client).await?,
            CampaignAction::Create {
                title,
                description,
                target,
                start,
                end,
            } => {
                commands::campaigns::create(&client, &title, &description, target, &start, &end)
                    .await?;
            }
            CampaignAction::Edit {
                id,
                title,
                description,
                target,
                start,
                end,
            } => {
                commands::campaigns::edit(&client, &id, &title, &description, target, &start, &end)
                    .await?;
            }
            CampaignAction::UploadProof { id, link } => {
                commands::campaigns::upload_proof(&client, &id, &link).await?;
            }
            CampaignAction::Delete { id } => commands::campaigns::delete(&client, &id).await?,
        },
        Commands::Donations { action } => match action {
            DonationAction::List => commands::donations::list(&client).await?,
            DonationAction::Give {
                campaign_id,
                amount,
                message,
            } => {
                commands::donations::give(&client, &campaign_id, amount, message.as_deref())
                    .await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(&client).await?,
            AdminAction::Campaigns => commands::admin::campaigns(&client).await?,
            AdminAction::Approve { id } => commands::admin::approve(&client, &id).await?,
            AdminAction::Reject { id, reason } => {
                commands::admin::reject(&client, &id, &reason).await?;
            }
            AdminAction::Users { page, size } => {
                commands::admin::users(&client, page, size).await?;
            }
            AdminAction::Block { id, reason } => {
                commands::admin::block(&client, &id, &reason).await?;
            }
            AdminAction::Unblock { id } => commands::admin::unblock(&client, &id).await?,
        },
        Commands::Announcements { action } => match action {
            AnnouncementAction::List => commands::announcements::list(&client).await?,
            AnnouncementAction::Create { title, content } => {
                commands::announcements::create(&client, &title, &content).await?;
            }
            AnnouncementAction::Delete { id } => {
                commands::announcements::delete(&client, &id).await?;
            }
        },
    }
    Ok(())
}

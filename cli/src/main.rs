use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rental_cli::{App, RentInput, ReqwestTransport, Session, DEFAULT_ORIGIN};
use rental_core::{ClientConfig, Navigation, RentalClient, Route};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rental", version, about = "Browse bikes and reserve a rental")]
struct Cli {
    /// API base URL; overrides RENTAL_API_BASE_URL. Unset means relative to --origin.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Origin used to resolve relative API requests
    #[arg(long, global = true, env = "RENTAL_ORIGIN", default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Request timeout in seconds; overrides RENTAL_API_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the landing page
    Home,
    /// List the bike catalog
    Bikes,
    /// Reserve a bike, then show the confirmation
    Rent {
        /// Bike to pre-select (as in /rent/:bikeId)
        bike_id: Option<String>,
        #[command(flatten)]
        form: RentArgs,
    },
    /// Show a rental confirmation
    Confirmation {
        /// Rental id
        id: String,
    },
    /// Open a route path such as /bikes or /rent/2
    Open {
        path: String,
        #[command(flatten)]
        form: RentArgs,
    },
}

#[derive(Args, Default)]
struct RentArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    /// Start date, YYYY-MM-DD
    #[arg(long = "start", default_value = "")]
    start_date: String,
    /// End date, YYYY-MM-DD
    #[arg(long = "end", default_value = "")]
    end_date: String,
    /// Bike to select, overriding the pre-selection
    #[arg(long)]
    bike: Option<String>,
}

impl From<RentArgs> for RentInput {
    fn from(args: RentArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            start_date: args.start_date,
            end_date: args.end_date,
            bike: args.bike,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env_with_base(cli.api_base_url.as_deref());
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, aborting in-flight requests");
            on_interrupt.cancel();
        }
    });

    let transport = ReqwestTransport::new(&cli.origin, config.timeout)?;
    let session = Session::new(RentalClient::from_config(&config), transport, cancel);

    let (start, form) = match cli.command {
        Commands::Home => (Route::Home, RentArgs::default()),
        Commands::Bikes => (Route::Bikes, RentArgs::default()),
        Commands::Rent { bike_id, form } => (Route::Rent { bike_id }, form),
        Commands::Confirmation { id } => (Route::Confirmation { id }, RentArgs::default()),
        Commands::Open { path, form } => (Route::parse(&path), form),
    };

    let app = App {
        config,
        session,
        rent_input: form.into(),
    };
    let ok = app.run(Navigation::to(start), &mut std::io::stdout()).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

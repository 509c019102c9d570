pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod export;
pub mod models;
pub mod services;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{
    BorrowedCommands, CategoryCommands, Cli, Commands, ItemCommands, NewUserArgs, UserCommands,
};
use clients::ApiError;
pub use config::Config;
use domain::BorrowForm;
use services::ServiceError;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();

    init_tracing(&config);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Init = command {
        return cli::cmd_init(cli.config.as_deref());
    }

    config.validate()?;

    let result = dispatch(command, &config, cli.token).await;

    if let Err(e) = &result
        && e.downcast_ref::<ServiceError>().is_some_and(|e| {
            matches!(
                e,
                ServiceError::NotSignedIn | ServiceError::Api(ApiError::Unauthorized)
            )
        })
    {
        eprintln!("Sign in with: chemlab login <username>");
    }

    result
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn dispatch(command: Commands, config: &Config, token: Option<String>) -> anyhow::Result<()> {
    match command {
        Commands::Init => cli::cmd_init(None),

        Commands::Health => cli::cmd_health(config).await,

        Commands::Login { username, password } => {
            let mut session = cli::offline_session(config)?;
            cli::cmd_login(&mut session, &username, password).await
        }

        Commands::Logout => {
            let mut session = cli::offline_session(config)?;
            cli::cmd_logout(&mut session).await
        }

        Commands::Whoami => cli::cmd_whoami(&cli::open_session(config, token).await?),

        Commands::Dashboard => cli::cmd_dashboard(&cli::open_session(config, token).await?).await,

        Commands::Items { command } => {
            let session = cli::open_session(config, token).await?;
            match command {
                ItemCommands::List { filter, export } => {
                    cli::cmd_item_list(config, &session, filter.into(), export).await
                }
                ItemCommands::Show { id } => cli::cmd_item_show(config, &session, id).await,
                ItemCommands::Add { fields } => cli::cmd_item_add(&session, fields).await,
                ItemCommands::Edit { id, fields } => cli::cmd_item_edit(&session, id, fields).await,
                ItemCommands::Delete { id, yes } => cli::cmd_item_delete(&session, id, yes).await,
                ItemCommands::Borrow {
                    id,
                    user,
                    quantity,
                    due,
                    notes,
                } => {
                    let form = BorrowForm {
                        item_id: id,
                        user_id: user,
                        quantity,
                        expected_return_date: due,
                        notes,
                    };
                    cli::cmd_item_borrow(&session, form).await
                }
            }
        }

        Commands::Borrowed { command } => {
            let session = cli::open_session(config, token).await?;
            match command {
                BorrowedCommands::List { filter, export } => {
                    cli::cmd_borrowed_list(config, &session, filter.into(), export).await
                }
                BorrowedCommands::Return { id, notes, yes } => {
                    cli::cmd_return(&session, id, notes, yes).await
                }
            }
        }

        Commands::Categories { command } => {
            let session = cli::open_session(config, token).await?;
            match command {
                CategoryCommands::List => cli::cmd_category_list(&session).await,
                CategoryCommands::Add { name, description } => {
                    cli::cmd_category_add(&session, name, description).await
                }
                CategoryCommands::Edit {
                    id,
                    name,
                    description,
                } => cli::cmd_category_edit(&session, id, name, description).await,
                CategoryCommands::Delete { id, yes } => {
                    cli::cmd_category_delete(&session, id, yes).await
                }
            }
        }

        Commands::Users { command } => {
            let session = cli::open_session(config, token).await?;
            match command {
                UserCommands::List => cli::cmd_user_list(&session).await,
                UserCommands::Add {
                    username,
                    email,
                    full_name,
                    student_id,
                    role,
                    password,
                } => {
                    let args = NewUserArgs {
                        username,
                        email,
                        full_name,
                        student_id,
                        role,
                        password,
                    };
                    cli::cmd_user_add(&session, args).await
                }
                UserCommands::Edit { id, fields } => {
                    cli::cmd_user_edit(&session, id, fields.into()).await
                }
                UserCommands::Activate { id } => {
                    cli::cmd_user_set_active(&session, id, true, true).await
                }
                UserCommands::Deactivate { id, yes } => {
                    cli::cmd_user_set_active(&session, id, false, yes).await
                }
            }
        }

        Commands::Reports { export } => {
            let session = cli::open_session(config, token).await?;
            cli::cmd_reports(config, &session, export).await
        }
    }
}

//! the core app
use {
    super::{
        cli::{Cli, Command, ThemeAction},
        handlers::Handlers,
        interrupt::InterruptHandler,
        logging,
    },
    crate::{config::instance::init_config, getopt, opt_and},
    clap::{CommandFactory, Parser},
    color_eyre::eyre::{Context, Result},
    tracing::info,
};

/// the chatroom app
pub struct ChatApp {
    /// the parsed command line
    cli: Cli,
    /// the logic handlers
    handlers: Handlers,
}

impl ChatApp {
    /// initialize chatroom
    ///
    /// - 1. installs the error report hooks
    /// - 2. parses the cli arguments and runs the generators, if any
    /// - 3. loads the config file
    /// - 4. sets up logging
    /// - 5. sets up the interruption handler
    ///
    /// returns `None` if there's nothing left to do after the generators ran
    ///
    /// # Errors
    ///
    /// returns an error if installing the report hooks fails
    /// returns an error if a generator fails
    /// returns an error if it fails to setup logging
    /// returns an error if it fails to setup the interrupt handler
    pub fn init() -> Result<Option<Self>> {
        color_eyre::install()?;
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::MietteHandlerOpts::new()
                    .terminal_links(true)
                    .unicode(true)
                    .context_lines(3)
                    .tab_width(4)
                    .build(),
            )
        }))?;

        let cli = Cli::parse();

        if cli.run_generators()? {
            return Ok(None);
        }

        init_config()?;
        opt_and!(logging.enable, logging::setup()?);

        let interrupt = Self::setup_interrupt_handler()?;
        let server_url = cli.server.clone().unwrap_or_else(|| getopt!(server.url));

        info!(
            "Starting {} v{} against {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            server_url
        );

        Ok(Some(Self {
            cli,
            handlers: Handlers::new(server_url, interrupt),
        }))
    }

    /// run the selected subcommand
    ///
    /// # Errors
    ///
    /// returns an error if the subcommand fails
    pub async fn run(&self) -> Result<()> {
        let Some(command) = self.cli.command.as_ref() else {
            Cli::command().print_help()?;
            return Ok(());
        };

        match command {
            Command::Themes => self.handlers.list_themes(),
            Command::Theme {
                action: ThemeAction::Set { key },
            } => self.handlers.set_theme(key),
            Command::Theme {
                action: ThemeAction::Show,
            } => self.handlers.show_theme(),
            Command::Rooms => self.handlers.list_rooms().await,
            Command::Username => self.handlers.random_username().await,
            Command::Health => self.handlers.health().await,
            Command::Chat(args) => self.handlers.chat(args).await,
        }
    }

    /// setup the interruption handler
    fn setup_interrupt_handler() -> Result<InterruptHandler> {
        let handler = InterruptHandler::new();
        let handler_clone = handler.clone();

        ctrlc::set_handler(move || {
            handler_clone.trigger();
        })
        .context("failed to set Ctrl+C handler")?;

        Ok(handler)
    }
}

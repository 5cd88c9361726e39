//! cli stuff
use {
    crate::{config::options::ChatroomCfg, utils::write_to_file},
    clap::{Args, Parser, Subcommand},
    color_eyre::eyre::Result,
    schemars::generate::SchemaSettings,
};

/// the CLI
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Chat server to talk to, overrides `server.url`
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Save instead of printing
    #[arg(long)]
    pub save: bool,

    /// Generate a JSON schemafile based on the defaults
    #[arg(short = 's', long)]
    pub gen_schema: bool,

    /// Generate the default config file
    #[arg(short = 'd', long)]
    pub gen_default: bool,

    /// Generate both the schema and the default config file
    #[arg(short = 'a', long)]
    pub gen_all: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// the subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the available themes
    Themes,

    /// Show or change the active theme
    Theme {
        /// the theme action
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// List the open rooms
    Rooms,

    /// Ask the server for a random username
    Username,

    /// Check whether the server is up
    Health,

    /// Join the chat
    Chat(ChatArgs),
}

/// theme subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeAction {
    /// Switch to another theme
    Set {
        /// the theme key, e.g. `dark`
        key: String,
    },

    /// Print the active theme's CSS variables
    Show,
}

/// arguments for `chat`
#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatArgs {
    /// The name to register with (the server picks one if left out)
    #[arg(long)]
    pub name: Option<String>,

    /// The room to join
    #[arg(long, conflicts_with = "create")]
    pub room: Option<String>,

    /// Create a new room instead of joining one
    #[arg(long)]
    pub create: bool,

    /// The room password
    #[arg(long)]
    pub password: Option<String>,
}

impl Cli {
    /// run the generator flags
    ///
    /// returns whether any generator ran, in which case there's nothing left to do
    ///
    /// # Errors
    ///
    /// returns an error if it fails to generate and/or save the json schema
    /// returns an error if it fails to generate and/or save the default config
    pub fn run_generators(&self) -> Result<bool> {
        if self.gen_schema || self.gen_all {
            Self::gen_schema(self.save)?;
        }

        if self.gen_default || self.gen_all {
            Self::gen_defaults(self.save)?;
        }

        Ok(self.gen_default || self.gen_all || self.gen_schema)
    }

    /// generate/save the config schema
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the schema to a JSON string
    /// returns an error if it fails to save the schema to `resources/chatroom.schema.json`
    pub fn gen_schema(save: bool) -> Result<()> {
        let schema_str = Self::schema()?;

        if save {
            write_to_file("resources/chatroom.schema.json", &schema_str)?;
        } else {
            println!("{}", schema_str);
        }

        Ok(())
    }

    /// the config schema as pretty json
    pub fn schema() -> Result<String> {
        let settings = SchemaSettings::draft2020_12().for_serialize();
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<ChatroomCfg>();
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// generate/save the default config file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the default config to TOML
    /// returns an error if it fails to save the default config to `resources/chatroom.default.toml`
    pub fn gen_defaults(save: bool) -> Result<()> {
        let defaults = toml::to_string_pretty(&ChatroomCfg::default())?;

        if save {
            write_to_file("resources/chatroom.default.toml", &defaults)?;
        } else {
            println!("{}", defaults);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::try_parse_from([
            "chatroom",
            "--server",
            "http://chat.example:8000",
            "chat",
            "--name",
            "alice",
            "--room",
            "1a2b3c4d",
        ])
        .unwrap();

        assert_eq!(cli.server.as_deref(), Some("http://chat.example:8000"));
        assert_eq!(
            cli.command,
            Some(Command::Chat(ChatArgs {
                name: Some("alice".to_string()),
                room: Some("1a2b3c4d".to_string()),
                create: false,
                password: None,
            }))
        );
    }

    #[test]
    fn test_room_and_create_conflict() {
        assert!(Cli::try_parse_from(["chatroom", "chat", "--room", "x", "--create"]).is_err());
    }

    #[test]
    fn test_parse_theme_set() {
        let cli = Cli::try_parse_from(["chatroom", "theme", "set", "dark"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Theme {
                action: ThemeAction::Set {
                    key: "dark".to_string()
                }
            })
        );
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = Cli::schema().unwrap();
        for section in ["server", "reconnect", "http", "theme", "logging"] {
            assert!(schema.contains(section), "missing {}", section);
        }
    }
}

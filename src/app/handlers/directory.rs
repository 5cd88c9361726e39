//! http api handling stuff
use {super::Handlers, color_eyre::eyre::Result, owo_colors::OwoColorize};

impl Handlers {
    /// print the open rooms
    pub async fn list_rooms(&self) -> Result<()> {
        let rooms = self.directory()?.fetch_rooms().await?;

        if rooms.is_empty() {
            println!("{}", "No open rooms".bright_black());
            return Ok(());
        }

        for room in rooms {
            println!("{}", room);
        }

        Ok(())
    }

    /// print a name suggested by the server
    pub async fn random_username(&self) -> Result<()> {
        let name = self.directory()?.random_username().await?;
        println!("{}", name);
        Ok(())
    }

    /// print whether the server is up
    pub async fn health(&self) -> Result<()> {
        if self.directory()?.health().await {
            println!("{} {}", self.server_url, "ok".green());
        } else {
            println!("{} {}", self.server_url, "unreachable".red());
        }

        Ok(())
    }
}

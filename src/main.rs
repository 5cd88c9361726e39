use chatroom::app::ChatApp;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let Some(app) = ChatApp::init()? else {
        return Ok(());
    };

    app.run().await
}

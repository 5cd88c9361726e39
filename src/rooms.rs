//! the chat server's plain http api
use {
    crate::{
        error::{ChatError, Result},
        models::{Health, RandomUsername, RoomList},
    },
    reqwest::Client,
    serde::de::DeserializeOwned,
    std::time::Duration,
    tracing::{debug, error, warn},
    url::Url,
};

/// settings for the http client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// request timeout
    pub timeout: Duration,
    /// connect timeout
    pub connect_timeout: Duration,
    /// the user agent to send
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

/// client for `/rooms`, `/random-username` and `/health`
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    /// the http client
    client: Client,
    /// the server base url
    base_url: Url,
}

impl RoomDirectory {
    /// make a directory client for the server at `base_url`
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self> {
        let client = Self::build_http_client(settings)?;
        Self::with_client(client, base_url)
    }

    /// make a directory client on top of an existing http client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// build an http client from the settings
    fn build_http_client(settings: &HttpSettings) -> Result<Client> {
        Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(ChatError::from)
    }

    /// the server base url
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// the url of an endpoint below the base url
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// GET an endpoint and parse its json body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("server returned {} for {}", status, url);
            return Err(ChatError::Other(format!(
                "server returned {} for {}",
                status, url
            )));
        }

        Ok(response.json::<T>().await?)
    }

    /// the ids of every open room
    ///
    /// a body without `rooms` counts as no rooms
    pub async fn fetch_rooms(&self) -> Result<Vec<String>> {
        let list: RoomList = self.get_json("rooms").await?;
        Ok(list.rooms.unwrap_or_default())
    }

    /// the ids of every open room, or nothing if the request failed
    pub async fn list_rooms(&self) -> Vec<String> {
        match self.fetch_rooms().await {
            Ok(rooms) => rooms,
            Err(e) => {
                error!(error = %e, "failed to fetch room list");
                Vec::new()
            }
        }
    }

    /// ask the server to make up a username
    pub async fn random_username(&self) -> Result<String> {
        let name: RandomUsername = self.get_json("random-username").await?;
        Ok(name.username)
    }

    /// whether the server reports itself healthy
    pub async fn health(&self) -> bool {
        match self.get_json::<Health>("health").await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                warn!(error = %e, "health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        tokio::{
            io::{AsyncReadExt, AsyncWriteExt},
            net::TcpListener,
        },
    };

    /// serve a single canned http response, returns the base url
    pub(crate) async fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = Vec::new();

            while !read.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                read.extend_from_slice(&buf[..n]);
            }

            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// a base url nothing listens on
    pub(crate) async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    }

    pub(crate) fn directory(base: &str) -> RoomDirectory {
        let client = Client::builder().no_proxy().build().unwrap();
        RoomDirectory::with_client(client, base).unwrap()
    }

    #[tokio::test]
    async fn test_list_rooms() {
        let base = serve_once("200 OK", r#"{"rooms":["1a2b3c4d","deadbeef"]}"#).await;
        assert_eq!(directory(&base).list_rooms().await, ["1a2b3c4d", "deadbeef"]);
    }

    #[tokio::test]
    async fn test_list_rooms_without_rooms_field() {
        let base = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        assert!(directory(&base).list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_rooms_malformed_body() {
        let base = serve_once("200 OK", "<html>").await;
        assert!(directory(&base).list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_rooms_server_error() {
        let base = serve_once("500 Internal Server Error", "{}").await;
        assert!(directory(&base).fetch_rooms().await.is_err());
    }

    #[tokio::test]
    async fn test_list_rooms_unreachable() {
        let base = dead_url().await;
        assert!(directory(&base).list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_random_username_and_health() {
        let base = serve_once("200 OK", r#"{"username":"zhuge"}"#).await;
        assert_eq!(directory(&base).random_username().await.unwrap(), "zhuge");

        let base = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        assert!(directory(&base).health().await);

        let base = dead_url().await;
        assert!(!directory(&base).health().await);
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let dir = directory("http://localhost:8000/api/");
        assert_eq!(
            dir.endpoint("rooms").unwrap().as_str(),
            "http://localhost:8000/api/rooms"
        );
    }
}

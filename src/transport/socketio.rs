//! socket.io client over a websocket, thin layer on top of `tokio-tungstenite`
use {
    crate::{
        error::{ChatError, Result},
        transport::{
            Connection, Connector, Inbound, ReconnectPolicy, Transport,
            packet::{self, Handshake, Packet},
        },
    },
    futures_util::{SinkExt, StreamExt, stream::SplitSink, stream::SplitStream},
    serde_json::Value,
    std::time::Duration,
    tokio::{
        net::TcpStream,
        sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
        task::JoinHandle,
        time::{Instant, sleep},
    },
    tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message},
    tracing::{debug, info, warn},
    url::Url,
};

/// the default socket.io endpoint path
pub const DEFAULT_SOCKET_PATH: &str = "/socket.io/";

/// the websocket stream
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
/// the write half of the websocket
type WsSink = SplitSink<WsStream, Message>;
/// the read half of the websocket
type WsSource = SplitStream<WsStream>;

/// opens socket.io connections over websockets
///
/// needs to be used from inside a tokio runtime
#[derive(Debug, Clone)]
pub struct SocketIoConnector {
    /// the socket.io endpoint path
    path: String,
}

impl SocketIoConnector {
    /// make a connector using the default `/socket.io/` path
    pub fn new() -> Self {
        Self::with_path(DEFAULT_SOCKET_PATH)
    }

    /// make a connector using a custom endpoint path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for SocketIoConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SocketIoConnector {
    fn connect(&mut self, url: &Url, policy: &ReconnectPolicy) -> Result<Connection> {
        let ws_url = websocket_url(url, &self.path)?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ChatError::Other(format!("no tokio runtime: {}", e)))?;

        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (inbound_tx, inbound_rx) = unbounded_channel();

        info!("connecting to {}", ws_url);
        let task = runtime.spawn(run_socket(ws_url, *policy, cmd_rx, inbound_tx));

        Ok(Connection {
            transport: Box::new(SocketIoTransport {
                cmd_tx,
                task: Some(task),
            }),
            inbound: inbound_rx,
        })
    }
}

/// build the engine.io websocket url for a server base url
///
/// `http://host:8000` becomes `ws://host:8000/socket.io/?EIO=4&transport=websocket`
pub fn websocket_url(base: &Url, path: &str) -> Result<Url> {
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ChatError::Other(format!(
                "unsupported url scheme {:?}",
                other
            )));
        }
    };

    let mut url = base.clone();
    url.set_scheme(scheme)
        .map_err(|_| ChatError::Other(format!("can't use {} over websockets", base)))?;
    url.set_path(path);
    url.set_query(Some("EIO=4&transport=websocket"));
    url.set_fragment(None);

    Ok(url)
}

/// commands from the transport handle to the socket task
#[derive(Debug)]
enum Command {
    /// send an encoded frame
    Send(String),
    /// disconnect and stop
    Close,
}

/// the outbound handle of a socket.io connection
struct SocketIoTransport {
    /// the command channel into the socket task
    cmd_tx: UnboundedSender<Command>,
    /// the socket task
    task: Option<JoinHandle<()>>,
}

impl Transport for SocketIoTransport {
    fn emit(&mut self, event: &str, payload: Option<Value>) -> Result<()> {
        let frame = packet::encode(&Packet::Event {
            name: event.to_string(),
            payload,
        });

        self.cmd_tx
            .send(Command::Send(frame))
            .map_err(|_| ChatError::ConnectionClosed)
    }

    fn close(&mut self) {
        let _ = self.cmd_tx.send(Command::Close);
        // the task winds down on its own once it sees the close
        self.task.take();
    }
}

impl Drop for SocketIoTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// how a connected session ended
#[derive(Debug)]
enum Outcome {
    /// we closed it
    Closed,
    /// the server told us to go away, no reconnect
    Kicked,
    /// the connection dropped
    Lost(String),
}

/// drive the connection until it's closed or out of retries
async fn run_socket(
    ws_url: Url,
    policy: ReconnectPolicy,
    mut commands: UnboundedReceiver<Command>,
    inbound: UnboundedSender<Inbound>,
) {
    let mut failures = 0u32;

    loop {
        let attempt = tokio::select! {
            res = handshake(&ws_url) => res,
            _ = closed(&mut commands) => {
                debug!("socket closed by client during handshake");
                return;
            }
        };

        match attempt {
            Ok((sink, source, handshake)) => {
                failures = 0;
                debug!(sid = %handshake.sid, "socket.io session established");
                let _ = inbound.send(Inbound::Connected);

                match pump(sink, source, &handshake, &mut commands, &inbound).await {
                    Outcome::Closed => {
                        debug!("socket closed by client");
                        return;
                    }
                    Outcome::Kicked => {
                        info!("server closed the session");
                        let _ = inbound.send(Inbound::Disconnected("io server disconnect".into()));
                        return;
                    }
                    Outcome::Lost(reason) => {
                        warn!("connection lost: {}", reason);
                        let _ = inbound.send(Inbound::Disconnected(reason));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to connect");
                let _ = inbound.send(Inbound::Error(e.to_string()));
            }
        }

        if !policy.enabled {
            return;
        }

        failures += 1;
        if failures > policy.attempts {
            warn!("giving up after {} reconnect attempts", policy.attempts);
            return;
        }

        debug!(
            "reconnect attempt {}/{} in {:?}",
            failures, policy.attempts, policy.delay
        );

        if !wait_for_retry(policy.delay, &mut commands).await {
            return;
        }
    }
}

/// sleep between attempts, returns `false` if the client closed meanwhile
async fn wait_for_retry(delay: Duration, commands: &mut UnboundedReceiver<Command>) -> bool {
    tokio::select! {
        _ = sleep(delay) => true,
        _ = closed(commands) => false,
    }
}

/// wait for the client to close while no session is up
///
/// frames queued in the meantime are dropped
async fn closed(commands: &mut UnboundedReceiver<Command>) {
    loop {
        match commands.recv().await {
            Some(Command::Send(frame)) => debug!("dropping {} while connecting", frame),
            Some(Command::Close) | None => return,
        }
    }
}

/// open the websocket and join the default namespace
async fn handshake(ws_url: &Url) -> Result<(WsSink, WsSource, Handshake)> {
    let (ws, _) = connect_async(ws_url.as_str()).await?;
    let (mut sink, mut source) = ws.split();

    let handshake = loop {
        match next_packet(&mut source).await? {
            Packet::Open(h) => break h,
            other => debug!("ignoring {:?} before open", other),
        }
    };

    sink.send(Message::Text(packet::encode(&Packet::Connect(None)).into()))
        .await?;

    loop {
        match next_packet(&mut source).await? {
            Packet::Connect(_) => break,
            Packet::Ping => {
                sink.send(Message::Text(packet::encode(&Packet::Pong).into()))
                    .await?;
            }
            Packet::ConnectError(data) => {
                return Err(ChatError::Handshake(format!("connect refused: {}", data)));
            }
            other => debug!("ignoring {:?} before connect", other),
        }
    }

    Ok((sink, source, handshake))
}

/// read until the next text frame and decode it
async fn next_packet(source: &mut WsSource) -> Result<Packet> {
    loop {
        match source.next().await {
            Some(Ok(Message::Text(text))) => return packet::decode(text.as_str()),
            Some(Ok(Message::Close(_))) | None => {
                return Err(ChatError::Handshake("socket closed during handshake".into()));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

/// shuttle frames both ways until the session ends
async fn pump(
    mut sink: WsSink,
    mut source: WsSource,
    handshake: &Handshake,
    commands: &mut UnboundedReceiver<Command>,
    inbound: &UnboundedSender<Inbound>,
) -> Outcome {
    let heartbeat = Duration::from_millis(handshake.ping_interval + handshake.ping_timeout);
    let deadline = sleep(heartbeat);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return Outcome::Lost("ping timeout".into()),

            cmd = commands.recv() => match cmd {
                Some(Command::Send(frame)) => {
                    if let Err(e) = sink.send(Message::Text(frame.into())).await {
                        return Outcome::Lost(e.to_string());
                    }
                }
                Some(Command::Close) | None => {
                    let _ = sink
                        .send(Message::Text(packet::encode(&Packet::Disconnect).into()))
                        .await;
                    let _ = sink.send(Message::Close(None)).await;
                    return Outcome::Closed;
                }
            },

            msg = source.next() => {
                deadline.as_mut().reset(Instant::now() + heartbeat);

                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        return Outcome::Lost("transport close".into());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Outcome::Lost(e.to_string()),
                };

                let packet = match packet::decode(text.as_str()) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "dropping undecodable frame");
                        continue;
                    }
                };

                match packet {
                    Packet::Ping => {
                        if let Err(e) = sink
                            .send(Message::Text(packet::encode(&Packet::Pong).into()))
                            .await
                        {
                            return Outcome::Lost(e.to_string());
                        }
                    }
                    Packet::Event { name, payload } => {
                        let _ = inbound.send(Inbound::Event { name, payload });
                    }
                    Packet::ConnectError(data) => {
                        let _ = inbound.send(Inbound::Error(data.to_string()));
                    }
                    Packet::Disconnect => return Outcome::Kicked,
                    Packet::Close => return Outcome::Lost("transport close".into()),
                    other => debug!("ignoring {:?}", other),
                }
            }
        }
    }
}

//! interactive chat handling stuff
use {
    super::Handlers,
    crate::{
        app::cli::ChatArgs,
        config::instance::config,
        models::{ChatMessage, MessageKind},
        session::{EventKind, SessionClient, SessionEvent},
        transport::{Connector, SocketIoConnector},
    },
    color_eyre::eyre::Result,
    owo_colors::OwoColorize,
    std::{io, thread, time::Duration},
    tokio::{
        sync::mpsc::{UnboundedReceiver, unbounded_channel},
        time::interval,
    },
    tracing::debug,
};

/// how often the interrupt flag is checked while chatting
const INTERRUPT_POLL: Duration = Duration::from_millis(200);

impl Handlers {
    /// connect, register, enter a room and relay stdin until `/quit`
    ///
    /// `/users` prints the current roster
    pub async fn chat(&self, args: &ChatArgs) -> Result<()> {
        let (socket_path, policy) = {
            let cfg = config()?;
            let path = cfg
                .server
                .as_ref()
                .and_then(|s| s.socket_path.clone())
                .unwrap_or_else(|| crate::transport::DEFAULT_SOCKET_PATH.to_string());
            (path, cfg.reconnect_policy())
        };

        let connector = SocketIoConnector::with_path(socket_path);
        let mut client = SessionClient::new(connector, self.directory()?).with_policy(policy);
        let mut events = forward_events(&mut client);

        client.init(&self.server_url)?;

        let mut lines = stdin_lines();
        chat_loop(&mut client, args, &mut events, &mut lines, || {
            self.was_interrupted()
        })
        .await;

        client.disconnect();
        Ok(())
    }
}

/// read stdin line by line on a thread of its own
///
/// a blocking stdin read can't be cancelled, so the thread is left behind
/// when the chat ends instead of holding up runtime shutdown
fn stdin_lines() -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        for line in io::stdin().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    debug!(error = %e, "stopped reading stdin");
                    break;
                }
            };

            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// relay input lines and session events until the chat is over
///
/// ends on `/quit`, when the input runs out, when the connection is gone
/// for good or when `interrupted` says so
async fn chat_loop<C: Connector>(
    client: &mut SessionClient<C>,
    args: &ChatArgs,
    events: &mut UnboundedReceiver<SessionEvent>,
    lines: &mut UnboundedReceiver<String>,
    interrupted: impl Fn() -> bool,
) {
    let mut ticker = interval(INTERRUPT_POLL);

    loop {
        tokio::select! {
            alive = client.next_event() => {
                if !alive {
                    println!("{}", "connection closed".red());
                    break;
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };

                match line.trim() {
                    "" => {}
                    "/quit" => break,
                    "/users" => client.get_room_users(|users| {
                        println!("{} {}", "in the room:".bright_black(), users.join(", "));
                    }),
                    text => client.send_message(text),
                }
            }
            _ = ticker.tick() => {
                if interrupted() {
                    break;
                }
            }
        }

        while let Ok(event) = events.try_recv() {
            if let Some(text) = render_event(&event) {
                print_event(&event, &text);
            }

            follow_up(client, args, &event);
        }
    }
}

/// subscribe to every event kind and forward the events to a channel
fn forward_events<C: Connector>(
    client: &mut SessionClient<C>,
) -> UnboundedReceiver<SessionEvent> {
    let (tx, rx) = unbounded_channel();

    for kind in EventKind::ALL {
        let tx = tx.clone();
        client.on(kind, move |event| {
            let _ = tx.send(event.clone());
        });
    }

    rx
}

/// drive the register/enter-room flow off the session's events
fn follow_up<C: Connector>(
    client: &mut SessionClient<C>,
    args: &ChatArgs,
    event: &SessionEvent,
) {
    match event {
        SessionEvent::Connect if client.username().is_none() => {
            client.register(args.name.as_deref());
        }
        SessionEvent::Registered(_) => {
            if args.create {
                client.create_room(args.password.as_deref());
            } else if let Some(room) = args.room.as_deref() {
                client.join_room(room, args.password.as_deref());
            } else {
                debug!("registered without a room to enter");
            }
        }
        _ => {}
    }
}

/// print a rendered event in a colour matching its kind
fn print_event(event: &SessionEvent, text: &str) {
    match event {
        SessionEvent::Error(_) | SessionEvent::Disconnect(_) => println!("{}", text.red()),
        SessionEvent::NewMessage(msg) if msg.kind == MessageKind::User => println!("{}", text),
        SessionEvent::ChatHistory(_) => println!("{}", text),
        _ => println!("{}", text.bright_black()),
    }
}

/// a chat message as one line
fn render_message(msg: &ChatMessage) -> String {
    match (msg.kind, msg.username.as_deref()) {
        (MessageKind::User, Some(name)) => format!("<{}> {}", name, msg.content),
        _ => format!("* {}", msg.content),
    }
}

/// an event as text for the terminal, `None` for events that aren't shown
fn render_event(event: &SessionEvent) -> Option<String> {
    let text = match event {
        SessionEvent::Connect => "connected".to_string(),
        SessionEvent::Disconnect(reason) => format!("disconnected: {}", reason),
        SessionEvent::Error(payload) => match payload.get("message").and_then(|m| m.as_str()) {
            Some(message) => format!("error: {}", message),
            None => format!("error: {}", payload),
        },
        SessionEvent::Registered(res) => {
            format!("registered as {}", res.username.as_deref().unwrap_or("?"))
        }
        SessionEvent::RoomCreated(created) => {
            format!("created room {}", created.room_id.as_deref().unwrap_or("?"))
        }
        SessionEvent::ChatHistory(messages) if messages.is_empty() => return None,
        SessionEvent::ChatHistory(messages) => messages
            .iter()
            .map(render_message)
            .collect::<Vec<_>>()
            .join("\n"),
        SessionEvent::NewMessage(msg) => render_message(msg),
        SessionEvent::UserJoined(p) | SessionEvent::UserLeft(p) => match &p.message {
            Some(msg) => render_message(msg),
            None => return None,
        },
        SessionEvent::RoomUsers(_) => return None,
    };

    Some(text)
}

use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio::sync::{mpsc, Mutex};
use rocket::{Orbit, Rocket};

/// Reports the port the server actually bound to, which matters when the
/// configured port is 0.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = mpsc::channel(1);
    (PortSaver { sender: tx }, Port::new(rx))
}

pub struct Port {
    state: Mutex<PortState>,
}

struct PortState {
    port: Option<u16>,
    rx: mpsc::Receiver<u16>,
}

impl Port {
    fn new(rx: mpsc::Receiver<u16>) -> Port {
        Port {
            state: Mutex::new(PortState { port: None, rx }),
        }
    }

    /// Waits for liftoff the first time; `None` if the server never got there.
    pub async fn get(&self) -> Option<u16> {
        let mut state = self.state.lock().await;
        if state.port.is_none() {
            state.port = state.rx.recv().await;
        }
        state.port
    }
}

pub struct PortSaver {
    sender: mpsc::Sender<u16>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Server is listening.");
        if self.sender.send(port).await.is_err() {
            tracing::warn!("Nobody is waiting for the bound port.");
        }
    }
}

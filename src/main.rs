use buttonmap_rs::backend::LogBackend;
use buttonmap_rs::controller::Controller;
use buttonmap_rs::system::config::ControllerConfig;
use buttonmap_rs::system::events::{EventChannel, EventReceiver, EventSender, RawEvent};
use embassy_executor::Spawner;
use embassy_sync::channel::Channel;
use log::{error, info, warn};

/// Events waiting for a dispatch task
static EVENTS: EventChannel = Channel::new();

type HostController = Controller<LogBackend>;

#[embassy_executor::task]
async fn dispatch_task(controller: &'static HostController, events: EventReceiver<'static>) {
    controller.run(events).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().nth(1) else {
        error!("Usage: buttonmap-rs <config.json>");
        return;
    };

    let controller = match load_controller(&path) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Failed to create controller: {:#}", e);
            return;
        }
    };
    let controller: &'static HostController = Box::leak(Box::new(controller));

    for subscription in controller.subscriptions() {
        info!("Listening to {:?}", subscription);
    }

    let sender: EventSender<'static> = EVENTS.sender();
    if let Err(e) = std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || read_events(sender))
    {
        error!("Failed to start the event reader: {}", e);
        return;
    }

    if let Err(e) = spawner.spawn(dispatch_task(controller, EVENTS.receiver())) {
        error!("Failed to start the dispatch task: {:?}", e);
    }
}

fn load_controller(path: &str) -> anyhow::Result<HostController> {
    let config = ControllerConfig::load(path)?;
    Ok(Controller::new(&config, LogBackend::new())?)
}

/// One JSON event per line, see `RawEvent`
fn read_events(sender: EventSender<'static>) {
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match RawEvent::from_json(&line) {
            Ok(event) => embassy_futures::block_on(sender.send(event)),
            Err(e) => warn!("Ignoring malformed event: {}", e),
        }
    }
    info!("stdin closed, no more events");
}

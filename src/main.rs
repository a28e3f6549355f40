//! EnvMate Firmware — Main Entry Point
//!
//! Hexagonal wiring for the ESP32 target.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  FsStore        MonotonicClock   LogEventSink                │
//! │  (FileStore)    (Clock)          (EventSink)                 │
//! │  StatusActuators                 EspMqttClient / HTTP console│
//! │  (ActuatorPort)                  (transport)                 │
//! │                                                              │
//! │  ────────────── Port Trait Boundary ─────────────────        │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            AppService (pure logic)                   │    │
//! │  │  Calibration · Log · Band tracking                   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine itself runs on a single control loop. Console requests
//! arriving on the httpd task take the device mutex, so they apply
//! between whole loop passes, never mid-ingestion.
#![deny(unused_must_use)]

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::http::server::EspHttpServer;
use esp_idf_svc::http::{Headers as _, Method};
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use envmate::adapters::actuators::StatusActuators;
use envmate::adapters::fs::FsStore;
use envmate::adapters::log_sink::LogEventSink;
use envmate::adapters::time::MonotonicClock;
use envmate::app::commands::ConsoleCommand;
use envmate::app::service::AppService;
use envmate::config::SystemConfig;
use envmate::console::{self, ConsoleReply, ConsoleRequest};
use envmate::telemetry::{self, ENV_TOPIC};

// ── Network constants (sensor node runs the SoftAP + broker) ──

const WIFI_SSID: &str = "ENVNODE";
const WIFI_PASSWORD: &str = "12345678";
const MQTT_BROKER_URL: &str = "mqtt://192.168.4.1:1883";

/// VFS mount point of the data partition.
const DATA_MOUNT: &str = "/spiffs";

// ── Device bundle behind the mutex ────────────────────────────

/// Everything the engine needs per pass. One mutex, taken once per loop
/// pass and once per console request — requests therefore land between
/// whole passes.
struct Device {
    service: AppService,
    fs: FsStore,
    clock: MonotonicClock,
    hw: StatusActuators,
    sink: LogEventSink,
}

impl Device {
    fn dispatch(&mut self, request: ConsoleRequest) -> ConsoleReply {
        console::dispatch(
            &mut self.service,
            request,
            &mut self.fs,
            &self.clock,
            &mut self.hw,
            &mut self.sink,
        )
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("EnvMate v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Mount the data partition ───────────────────────────
    mount_data_partition().context("data partition mount failed")?;

    // ── 3. Build the engine and restore durable state ─────────
    let config = SystemConfig::default();
    config.validate()?;
    let loop_interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));

    let mut device = Device {
        service: AppService::new(config),
        fs: FsStore::new(DATA_MOUNT),
        clock: MonotonicClock::new(),
        hw: StatusActuators::new(),
        sink: LogEventSink::new(),
    };
    device.service.load(&device.fs);

    // ── 4. Network + telemetry subscription ───────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = connect_wifi(sysloop, nvs)?;

    let (payload_tx, payload_rx) = mpsc::channel::<String>();
    let _mqtt = subscribe_telemetry(payload_tx)?;

    // Onboarding (QR screens) is owned by the display task; by the time
    // the network is up the user has already walked through it.
    device
        .service
        .enter_active(&mut device.hw, &mut device.sink);

    let device = Arc::new(Mutex::new(device));

    // ── 5. Remote console (JSON over HTTP; page rendering is a
    //       separate concern served elsewhere) ─────────────────
    let _server = start_console(Arc::clone(&device))?;

    // ── 6. Control loop ───────────────────────────────────────
    info!("control loop started ({loop_interval:?} per pass)");
    loop {
        {
            let mut dev = device.lock().expect("engine mutex poisoned");
            let Device {
                service,
                fs,
                clock,
                hw,
                sink,
            } = &mut *dev;

            // Ingest every payload that arrived since the last pass.
            while let Ok(payload) = payload_rx.try_recv() {
                match telemetry::parse_payload(&payload) {
                    Ok(reading) => service.ingest(reading, fs, clock, hw, sink),
                    Err(e) => log::debug!("telemetry: discarded payload ({e})"),
                }
            }

            // Single consumer of the one-shot transition flag.
            service.drain_transition(hw);
        }
        std::thread::sleep(loop_interval);
    }
}

// ── Wiring helpers ────────────────────────────────────────────

fn mount_data_partition() -> Result<()> {
    use esp_idf_svc::sys::{esp, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};

    let base_path = c"/spiffs";
    let conf = esp_vfs_spiffs_conf_t {
        base_path: base_path.as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: called once from the main task before any FsStore access.
    esp!(unsafe { esp_vfs_spiffs_register(&conf) })?;
    info!("data partition mounted at {DATA_MOUNT}");
    Ok(())
}

fn connect_wifi(
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> Result<BlockingWifi<EspWifi<'static>>> {
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: WIFI_SSID.try_into().unwrap(),
        password: WIFI_PASSWORD.try_into().unwrap(),
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;
    info!("wifi connected to {WIFI_SSID}");
    Ok(wifi)
}

fn subscribe_telemetry(payload_tx: mpsc::Sender<String>) -> Result<EspMqttClient<'static>> {
    let (mut client, mut connection) = EspMqttClient::new(
        MQTT_BROKER_URL,
        &MqttClientConfiguration {
            client_id: Some("envmate"),
            ..Default::default()
        },
    )?;

    // Pump broker events on a dedicated task; only well-formed payloads
    // on the canonical topic cross to the control loop.
    std::thread::Builder::new()
        .stack_size(6144)
        .spawn(move || {
            while let Ok(event) = connection.next() {
                if let EventPayload::Received {
                    topic: Some(topic),
                    data,
                    ..
                } = event.payload()
                {
                    if topic != ENV_TOPIC {
                        continue;
                    }
                    match core::str::from_utf8(data) {
                        Ok(payload) => {
                            if payload_tx.send(payload.to_owned()).is_err() {
                                break;
                            }
                        }
                        Err(_) => log::debug!("telemetry: non-UTF8 payload discarded"),
                    }
                }
            }
            warn!("mqtt connection task exited");
        })?;

    client.subscribe(ENV_TOPIC, QoS::AtMostOnce)?;
    info!("subscribed to {ENV_TOPIC}");
    Ok(client)
}

/// Translate a [`ConsoleReply`] into an HTTP response.
fn respond(
    req: esp_idf_svc::http::server::Request<&mut esp_idf_svc::http::server::EspHttpConnection>,
    reply: ConsoleReply,
) -> anyhow::Result<()> {
    use esp_idf_svc::io::Write as _;

    let (status, body) = match reply {
        ConsoleReply::Ok => (200, String::from("ok")),
        ConsoleReply::Snapshot(json) => (200, json),
        ConsoleReply::BadRequest(msg) => (400, msg.to_owned()),
        ConsoleReply::StorageFailed => (500, String::from("storage failed")),
    };
    let mut resp = req.into_status_response(status)?;
    resp.write_all(body.as_bytes())?;
    Ok(())
}

fn start_console(device: Arc<Mutex<Device>>) -> Result<EspHttpServer<'static>> {
    let mut server = EspHttpServer::new(&esp_idf_svc::http::server::Configuration::default())?;

    let dev = Arc::clone(&device);
    server.fn_handler("/snapshot", Method::Get, move |req| {
        let reply = dev
            .lock()
            .expect("engine mutex poisoned")
            .dispatch(ConsoleRequest::GetSnapshot);
        respond(req, reply)
    })?;

    let dev = Arc::clone(&device);
    server.fn_handler("/offset", Method::Get, move |req| {
        let reply = match query_param(req.uri(), "delta").and_then(|v| v.parse::<f32>().ok()) {
            Some(delta) => dev
                .lock()
                .expect("engine mutex poisoned")
                .dispatch(ConsoleRequest::Command(ConsoleCommand::AdjustOffset(delta))),
            None => ConsoleReply::BadRequest("delta param required"),
        };
        respond(req, reply)
    })?;

    let dev = Arc::clone(&device);
    server.fn_handler("/delete", Method::Get, move |req| {
        let reply = match query_param(req.uri(), "index").and_then(|v| v.parse::<usize>().ok()) {
            Some(index) => dev
                .lock()
                .expect("engine mutex poisoned")
                .dispatch(ConsoleRequest::Command(ConsoleCommand::DeleteLogEntry(
                    index,
                ))),
            None => ConsoleReply::BadRequest("index param required"),
        };
        respond(req, reply)
    })?;

    let dev = Arc::clone(&device);
    server.fn_handler("/clear", Method::Get, move |req| {
        let reply = dev
            .lock()
            .expect("engine mutex poisoned")
            .dispatch(ConsoleRequest::Command(ConsoleCommand::ClearLogs));
        respond(req, reply)
    })?;

    info!("console routes registered");
    Ok(server)
}

/// Extract a query parameter from a request URI.
fn query_param(uri: &str, name: &str) -> Option<String> {
    let query = uri.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name).then(|| v.to_owned())
    })
}

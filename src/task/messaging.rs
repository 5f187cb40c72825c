//! Messaging link
//!
//! Owns the WiFi bring-up and the broker session: fixed 5 s reconnect
//! backoff, last-will/birth availability, the fixed subscription set and
//! the one-shot discovery announcement after every (re)connect. The
//! session loop pumps inbound packets into the router, drains the
//! outbound queue and keeps the connection alive, all without blocking.

use cyw43::{Control, JoinOptions};
use cyw43_pio::PioSpi;
use defmt::{info, warn};
use embassy_futures::select::{select3, Either3};
use embassy_net::tcp::TcpSocket;
use embassy_net::{Ipv4Address, Stack};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_time::{Duration, Ticker, Timer};
use embedded_io_async::Write;

use crate::system::command;
use crate::system::config;
use crate::system::discovery::{self, DISCOVERY_PAYLOAD_SIZE};
use crate::system::event::{self, Events};
use crate::system::mqtt::{self, Packet, Will};
use crate::system::routing;
use crate::system::state::SYSTEM_STATE;
use crate::system::topics;

/// Fixed reconnect backoff; never retried more often than this
const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Session keepalive; pings go out at half this
const KEEPALIVE_SECS: u16 = 60;

/// Errors ending one session attempt
#[derive(Debug, defmt::Format)]
enum LinkError {
    /// Broker address failed to parse
    Config,
    Connect,
    Io,
    /// Peer closed the connection
    Closed,
    /// Broker refused the session with this return code
    Refused(u8),
    Protocol,
}

impl From<mqtt::MqttError> for LinkError {
    fn from(_: mqtt::MqttError) -> Self {
        LinkError::Protocol
    }
}

/// CYW43 radio driver task
#[embassy_executor::task]
pub async fn cyw43_driver(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack task
#[embassy_executor::task]
pub async fn net_stack(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Broker session task
#[embassy_executor::task]
pub async fn messaging(stack: Stack<'static>, mut control: Control<'static>) {
    join_wifi(&mut control).await;
    stack.wait_config_up().await;
    info!("network configured");

    let mut rx_buffer = [0u8; 2048];
    let mut tx_buffer = [0u8; 2048];
    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(KEEPALIVE_SECS as u64 + 30)));
        match session(&mut socket).await {
            Ok(()) => info!("broker closed the session"),
            Err(error) => warn!("session ended: {}", error),
        }
        socket.abort();
        event::send(Events::LinkStatus(false)).await;
        Timer::after(RECONNECT_INTERVAL).await;
    }
}

async fn join_wifi(control: &mut Control<'_>) {
    loop {
        let options = JoinOptions::new(config::WIFI_PASSWORD.as_bytes());
        match control.join(config::WIFI_SSID, options).await {
            Ok(()) => {
                info!("wifi joined");
                return;
            }
            Err(error) => {
                warn!("wifi join failed, status {}", error.status);
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    }
}

/// Runs one broker session to completion
async fn session(socket: &mut TcpSocket<'_>) -> Result<(), LinkError> {
    let address = mqtt::parse_ipv4(config::MQTT_HOST).ok_or(LinkError::Config)?;
    let endpoint = (
        Ipv4Address::new(address[0], address[1], address[2], address[3]),
        config::MQTT_PORT,
    );
    socket.connect(endpoint).await.map_err(|_| LinkError::Connect)?;

    let mut work = [0u8; 512];
    let mut acc = [0u8; 1024];
    let mut filled = 0usize;

    // CONNECT with a retained offline last-will
    let will = Will {
        topic: topics::AVAILABILITY,
        payload: topics::PAYLOAD_OFFLINE.as_bytes(),
        retain: true,
    };
    let username = (!config::MQTT_USER.is_empty()).then_some(config::MQTT_USER);
    let password = (!config::MQTT_PASSWORD.is_empty()).then_some(config::MQTT_PASSWORD);
    let len = mqtt::encode_connect(
        &mut work,
        config::DEVICE_ID,
        username,
        password,
        Some(&will),
        KEEPALIVE_SECS,
    )?;
    socket.write_all(&work[..len]).await.map_err(|_| LinkError::Io)?;
    expect_connack(socket, &mut acc, &mut filled).await?;

    // Birth: device availability, per-sensor availability
    publish(socket, &mut work, topics::AVAILABILITY, topics::PAYLOAD_ONLINE.as_bytes(), true)
        .await?;
    let sensor_online = SYSTEM_STATE.lock().await.sensor_online;
    for (channel, online) in topics::CHANNELS.iter().zip(sensor_online) {
        let payload = if online {
            topics::PAYLOAD_ONLINE
        } else {
            topics::PAYLOAD_OFFLINE
        };
        publish(socket, &mut work, channel.availability, payload.as_bytes(), true).await?;
    }

    // Full fixed topic set; retained values replay immediately after
    let len = mqtt::encode_subscribe(&mut work, 1, &topics::SUBSCRIPTIONS)?;
    socket.write_all(&work[..len]).await.map_err(|_| LinkError::Io)?;

    announce_discovery(socket, &mut work).await?;

    event::send(Events::LinkStatus(true)).await;
    info!("broker session established");

    // Pump: inbound packets, outbound queue, keepalive
    let (mut reader, mut writer) = socket.split();
    let mut ping = Ticker::every(Duration::from_secs(KEEPALIVE_SECS as u64 / 2));
    loop {
        match select3(reader.read(&mut acc[filled..]), command::wait(), ping.next()).await {
            Either3::First(read) => {
                let n = read.map_err(|_| LinkError::Io)?;
                if n == 0 {
                    return Err(LinkError::Closed);
                }
                filled += n;
                drain_packets(&mut acc, &mut filled).await?;
            }
            Either3::Second(message) => {
                let len = mqtt::encode_publish_header(
                    &mut work,
                    message.topic,
                    message.payload.len(),
                    message.retain,
                )?;
                writer.write_all(&work[..len]).await.map_err(|_| LinkError::Io)?;
                writer
                    .write_all(message.payload.as_bytes())
                    .await
                    .map_err(|_| LinkError::Io)?;
            }
            Either3::Third(_) => {
                writer.write_all(&mqtt::PINGREQ).await.map_err(|_| LinkError::Io)?;
            }
        }
    }
}

/// Reads until the CONNACK arrives and checks its return code
async fn expect_connack(
    socket: &mut TcpSocket<'_>,
    acc: &mut [u8],
    filled: &mut usize,
) -> Result<(), LinkError> {
    loop {
        match mqtt::parse_packet(&acc[..*filled]).map_err(LinkError::from)? {
            Some((Packet::ConnAck { return_code, .. }, used)) => {
                acc.copy_within(used..*filled, 0);
                *filled -= used;
                return if return_code == mqtt::CONNECT_ACCEPTED {
                    Ok(())
                } else {
                    Err(LinkError::Refused(return_code))
                };
            }
            Some((_, used)) => {
                acc.copy_within(used..*filled, 0);
                *filled -= used;
            }
            None => {
                let n = socket
                    .read(&mut acc[*filled..])
                    .await
                    .map_err(|_| LinkError::Io)?;
                if n == 0 {
                    return Err(LinkError::Closed);
                }
                *filled += n;
            }
        }
    }
}

/// Parses every complete packet in the accumulation buffer
///
/// One socket read per loop turn keeps the pump cancel-safe; partial
/// packets stay in the buffer for the next turn.
async fn drain_packets(acc: &mut [u8; 1024], filled: &mut usize) -> Result<(), LinkError> {
    loop {
        let (update, used) = match mqtt::parse_packet(&acc[..*filled]) {
            Err(_) => return Err(LinkError::Protocol),
            Ok(None) => {
                if *filled == acc.len() {
                    // a packet larger than the buffer can never complete
                    return Err(LinkError::Protocol);
                }
                return Ok(());
            }
            Ok(Some((packet, used))) => {
                let update = match packet {
                    Packet::Publish { topic, payload } => {
                        let update = routing::route(topic, payload);
                        if update.is_none() {
                            warn!("unroutable message on {}", topic);
                        }
                        update
                    }
                    _ => None,
                };
                (update, used)
            }
        };
        acc.copy_within(used..*filled, 0);
        *filled -= used;
        if let Some(update) = update {
            event::send(Events::StateUpdate(update)).await;
        }
    }
}

async fn publish(
    socket: &mut TcpSocket<'_>,
    work: &mut [u8],
    topic: &str,
    payload: &[u8],
    retain: bool,
) -> Result<(), LinkError> {
    let len = mqtt::encode_publish_header(work, topic, payload.len(), retain)?;
    socket.write_all(&work[..len]).await.map_err(|_| LinkError::Io)?;
    socket.write_all(payload).await.map_err(|_| LinkError::Io)?;
    Ok(())
}

/// One-shot capability announcement, skipped when it outgrows its buffer
async fn announce_discovery(
    socket: &mut TcpSocket<'_>,
    work: &mut [u8],
) -> Result<(), LinkError> {
    let mut document = [0u8; DISCOVERY_PAYLOAD_SIZE];
    match discovery::discovery_payload(&mut document) {
        Some(len) => {
            publish(socket, work, topics::DISCOVERY, &document[..len], true).await?;
            info!("discovery announced, {} bytes", len);
        }
        None => warn!("discovery document exceeds its buffer, skipped"),
    }
    Ok(())
}

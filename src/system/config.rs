//! Compile-time configuration
//!
//! Network credentials come from the build environment so images can be
//! produced without editing source. Topic strings live in
//! [`crate::system::topics`]; timing constants live next to the code that
//! uses them.

/// WiFi network name (`WIFI_SSID` build env var)
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(v) => v,
    None => "shed-net",
};

/// WiFi passphrase (`WIFI_PASSWORD` build env var)
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(v) => v,
    None => "",
};

/// MQTT broker IPv4 address (`MQTT_HOST` build env var)
pub const MQTT_HOST: &str = match option_env!("MQTT_HOST") {
    Some(v) => v,
    None => "192.168.0.70",
};

/// MQTT broker port
pub const MQTT_PORT: u16 = 1883;

/// Broker username, empty disables authentication (`MQTT_USER` build env var)
pub const MQTT_USER: &str = match option_env!("MQTT_USER") {
    Some(v) => v,
    None => "",
};

/// Broker password (`MQTT_PASSWORD` build env var)
pub const MQTT_PASSWORD: &str = match option_env!("MQTT_PASSWORD") {
    Some(v) => v,
    None => "",
};

/// Device identifier, used as the MQTT client id and in discovery
pub const DEVICE_ID: &str = "shed_power_monitor";

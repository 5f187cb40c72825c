//! Screen Drawing
//!
//! Draw functions over any monochrome [`DrawTarget`] sized 128x64; the
//! hardware backend is whichever display driver implements it. The UI state
//! machine never touches anything in here.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_6X10, FONT_9X18_BOLD},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use heapless::String;

use crate::system::snapshot::RenderSnapshot;
use crate::system::state::PowerChannel;
use crate::system::ui::{DisplayMode, PowerSubMode};

/// Display geometry
pub const WIDTH: i32 = 128;
pub const HEIGHT: i32 = 64;

const TITLE_CHAR_W: i32 = 9;
const TEXT_CHAR_W: i32 = 6;
const ROW_H: i32 = 10;

/// Draws one complete frame for the captured snapshot
pub fn render_frame<D>(target: &mut D, snap: &RenderSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    match snap.mode {
        DisplayMode::Overview => draw_overview(target, snap),
        DisplayMode::ChannelDetail(channel) => match snap.power_submode {
            PowerSubMode::Live => draw_channel(target, snap, channel),
            PowerSubMode::Placeholder => draw_channel_placeholder(target, channel),
        },
        DisplayMode::SensorsSummary => draw_sensors(target, snap),
        DisplayMode::LightsMenu => draw_lights_menu(target, snap),
        DisplayMode::EditMotionTimer => draw_edit_timer(target, "MOTION", snap.edit_motion_ms),
        DisplayMode::EditManualTimer => draw_edit_timer(target, "MANUAL", snap.edit_manual_ms),
    }
}

/// Formats milliseconds as HH:MM:SS
pub fn format_duration(ms: u32) -> String<12> {
    let total_secs = ms / 1000;
    let mut out = String::new();
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60
    );
    out
}

fn title_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_9X18_BOLD, BinaryColor::On)
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On)
}

fn centered(text: &str, char_width: i32) -> i32 {
    (WIDTH - text.len() as i32 * char_width).max(0) / 2
}

fn draw_title<D>(target: &mut D, title: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(
        title,
        Point::new(centered(title, TITLE_CHAR_W), 0),
        title_style(),
        Baseline::Top,
    )
    .draw(target)?;
    Line::new(Point::new(4, 18), Point::new(WIDTH - 4, 18))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;
    Ok(())
}

fn draw_row<D>(target: &mut D, y: i32, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(text, Point::new(4, y), text_style(), Baseline::Top).draw(target)?;
    Ok(())
}

fn draw_overview<D>(target: &mut D, snap: &RenderSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "POWER")?;
    if !snap.link_online {
        // offline marker, top right corner
        Text::with_baseline("!", Point::new(WIDTH - 8, 0), text_style(), Baseline::Top)
            .draw(target)?;
    }

    let labels = ["Panel", "Batt", "Load"];
    for (i, label) in labels.iter().enumerate() {
        let y = 22 + i as i32 * 14;
        let mut row: String<24> = String::new();
        if snap.sensor_online[i] {
            let reading = &snap.channels[i];
            let _ = write!(
                row,
                "{:<6}{:>6.2}V {:>6.0}mA",
                label, reading.bus_voltage_v, reading.current_ma
            );
        } else {
            let _ = write!(row, "{:<6}offline", label);
        }
        draw_row(target, y, &row)?;
    }
    Ok(())
}

fn draw_channel<D>(target: &mut D, snap: &RenderSnapshot, channel: PowerChannel) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, channel.title())?;
    let reading = &snap.channels[channel.index()];

    let mut row: String<24> = String::new();
    let _ = write!(row, "Voltage {:>8.2} V", reading.bus_voltage_v);
    draw_row(target, 22, &row)?;

    row.clear();
    let _ = write!(row, "Current {:>8.0} mA", reading.current_ma);
    draw_row(target, 32, &row)?;

    row.clear();
    let _ = write!(row, "Power   {:>8.0} mW", reading.power_mw);
    draw_row(target, 42, &row)?;

    row.clear();
    if channel == PowerChannel::Battery {
        let _ = write!(
            row,
            "Chg {:.2} Dis {:.2}Wh",
            snap.battery.charged_wh, snap.battery.discharged_wh
        );
    } else {
        let _ = write!(row, "Energy {:>7.4} Wh", reading.energy_wh);
    }
    draw_row(target, 52, &row)?;
    Ok(())
}

fn draw_channel_placeholder<D>(target: &mut D, channel: PowerChannel) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut title: String<8> = String::new();
    let _ = write!(title, "CH {}", channel.index() + 1);
    draw_title(target, &title)?;
    let text = "sub-screen";
    Text::with_baseline(
        text,
        Point::new(centered(text, TEXT_CHAR_W), 34),
        text_style(),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

fn draw_sensors<D>(target: &mut D, snap: &RenderSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "SENSORS")?;
    let mut row: String<24> = String::new();

    let _ = write!(row, "Temp  {:>7.1} C", snap.ambient.temperature_c);
    draw_row(target, 22, &row)?;

    row.clear();
    let _ = write!(row, "Hum   {:>7.1} %", snap.ambient.humidity_pct);
    draw_row(target, 32, &row)?;

    row.clear();
    let _ = write!(row, "Press {:>7.1} hPa", snap.ambient.pressure_hpa);
    draw_row(target, 42, &row)?;

    row.clear();
    let _ = write!(row, "Light {:>7.0} lx", snap.ambient.illuminance_lux);
    draw_row(target, 52, &row)?;
    Ok(())
}

fn draw_lights_menu<D>(target: &mut D, snap: &RenderSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline("LIGHTS", Point::new(2, 0), title_style(), Baseline::Top).draw(target)?;

    // light status in the title row: state and remaining time
    let mut status: String<16> = String::new();
    let state_text = if snap.light.manual_override {
        "MANUAL"
    } else if snap.light.is_on {
        "ON"
    } else {
        "OFF"
    };
    if snap.light.is_on {
        let _ = write!(
            status,
            "{} {:02}:{:02}",
            state_text,
            snap.light.remaining_secs / 60,
            snap.light.remaining_secs % 60
        );
    } else {
        let _ = write!(status, "{}", state_text);
    }
    Text::with_baseline(
        &status,
        Point::new(WIDTH - 2 - status.len() as i32 * TEXT_CHAR_W, 4),
        text_style(),
        Baseline::Top,
    )
    .draw(target)?;
    Line::new(Point::new(4, 18), Point::new(WIDTH - 4, 18))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    let items = [
        if snap.light.is_on { "Turn Off" } else { "Turn On" },
        "Motion timer",
        "Manual timer",
        "Back",
    ];
    for (i, item) in items.iter().enumerate() {
        let y = 20 + i as i32 * ROW_H;
        if i == snap.menu_selection {
            Rectangle::new(Point::new(2, y), Size::new((WIDTH - 4) as u32, ROW_H as u32))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
            Text::with_baseline(
                item,
                Point::new(6, y),
                MonoTextStyle::new(&FONT_6X10, BinaryColor::Off),
                Baseline::Top,
            )
            .draw(target)?;
        } else {
            Text::with_baseline(item, Point::new(6, y), text_style(), Baseline::Top)
                .draw(target)?;
        }
    }
    Ok(())
}

fn draw_edit_timer<D>(target: &mut D, title: &str, duration_ms: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, title)?;
    let time_text = format_duration(duration_ms);
    Text::with_baseline(
        &time_text,
        Point::new(centered(&time_text, TITLE_CHAR_W), 26),
        title_style(),
        Baseline::Top,
    )
    .draw(target)?;
    let hint = "turn adjust, press save";
    Text::with_baseline(
        hint,
        Point::new(centered(hint, TEXT_CHAR_W), 52),
        text_style(),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

use clap::Parser;
use ds18b20::{Ds18b20Builder, Resolution};
use embedded_hal::delay::DelayNs;

/// Read a DS18B20 temperature sensor through a DS2484 I2C to 1-Wire bridge
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// ROM code of the sensor in hex. Addresses the sensor by ROM instead of
    /// talking to every device on the bus
    #[arg(short, long, value_parser = parse_rom)]
    rom: Option<u64>,
    /// Conversion resolution in bits
    #[arg(long, value_parser = clap::value_parser!(u8).range(9..=12))]
    resolution: Option<u8>,
    /// Low alarm threshold in °C
    #[arg(long, allow_hyphen_values = true)]
    alarm_low: Option<f32>,
    /// High alarm threshold in °C
    #[arg(long, allow_hyphen_values = true)]
    alarm_high: Option<f32>,
    /// Reload alarm thresholds and resolution from the sensor EEPROM first
    #[arg(long)]
    restore: bool,
    /// Store alarm thresholds and resolution in the sensor EEPROM
    #[arg(long)]
    save: bool,
    /// Validate the scratchpad CRC on every read
    #[arg(long)]
    crc: bool,
    /// Start conversions on every sensor on the bus at once
    #[arg(long)]
    all: bool,
    /// Number of readings to take, 0 to run forever
    #[arg(short, long, default_value_t = 0)]
    count: u32,
}

fn parse_rom(s: &str) -> Result<u64, String> {
    let s = s.trim_start_matches("0x");
    u64::from_str_radix(s, 16).map_err(|e| e.to_string())
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Open the I2C bus
    let i2c = linux_embedded_hal::I2cdev::new(&args.path).expect("Failed to open I2C device");
    let mut delay = linux_embedded_hal::Delay;
    // Create a DS2484 instance
    let mut bus = ds2484::Ds2484Builder::default()
        .build(i2c, linux_embedded_hal::Delay)
        .expect("Failed to create DS2484 instance");
    // Create the sensor handle
    let mut sensor = Ds18b20Builder::default()
        .with_rom(args.rom.unwrap_or_default())
        .with_addressing(args.rom.is_some())
        .with_crc(args.crc)
        .build();
    if let Some(rom) = args.rom {
        let family = embedded_onewire::family_code(rom);
        if family != ds18b20::FAMILY_CODE {
            log::warn!("ROM {:016x} has family code {:#04x}, not a DS18B20", rom, family);
        }
        if !embedded_onewire::rom_crc_valid(rom) {
            log::warn!("ROM {:016x} fails its CRC check", rom);
        }
    }
    sensor
        .init(&mut bus)
        .expect("Failed to initialize DS18B20");
    if args.restore {
        sensor
            .restore_config(&mut bus)
            .expect("Failed to restore configuration");
    }
    if let Some(bits) = args.resolution {
        let resolution = Resolution::try_from(bits).expect("Resolution out of range");
        sensor
            .set_resolution(&mut bus, resolution)
            .expect("Failed to set resolution");
    }
    if args.alarm_low.is_some() || args.alarm_high.is_some() {
        let (low, high) = sensor.alarm_range().expect("Sensor not initialized");
        sensor
            .set_alarm_range(
                &mut bus,
                args.alarm_low.unwrap_or(low),
                args.alarm_high.unwrap_or(high),
            )
            .expect("Failed to set alarm range");
    }
    if args.save {
        sensor
            .save_config(&mut bus)
            .expect("Failed to save configuration");
        // EEPROM copy needs up to 10 ms of strong pullup
        delay.delay_ms(10);
    }
    let (low, high) = sensor.alarm_range().expect("Sensor not initialized");
    let period = sensor
        .conversion_period_ms()
        .expect("Sensor not initialized");
    log::info!(
        "Resolution: {} bit, alarms: [{}, {}] °C, conversion time: {} ms",
        sensor.resolution().expect("Sensor not initialized").bits(),
        low,
        high,
        period
    );
    let mut taken = 0;
    loop {
        // Trigger temperature conversion
        let started = if args.all {
            sensor.start_conversion_all(&mut bus)
        } else {
            sensor.start_conversion(&mut bus)
        };
        if let Err(e) = started {
            log::error!("Failed to start conversion: {}", e);
        } else {
            // Wait till conversion is finished
            delay.delay_ms(period as u32);
            match sensor.read_temperature(&mut bus) {
                Ok(temp) => log::info!("ROM: {:016x}, Temperature: {} °C", sensor.rom(), temp),
                Err(e) => log::error!("Failed to read temperature: {}", e),
            }
        }
        taken += 1;
        if args.count != 0 && taken >= args.count {
            break;
        }
    }
}

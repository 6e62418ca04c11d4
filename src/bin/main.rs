#![no_std]
#![no_main]

use core::panic::PanicInfo;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use mlx90615::hardware::{self, SensorBus};

const HEART_BEAT_INTERVAL_MS: u64 = 5_000;
const SAMPLE_INTERVAL_MS: u64 = 2_000;

// MLX90615 on I2C0: GPIO8(SDA), GPIO9(SCL), address 0x5B

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    hardware::halt(info)
}

esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn run_heartbeat() {
    loop {
        esp_println::println!("[HEARTBEAT] System is alive");
        Timer::after(Duration::from_millis(HEART_BEAT_INTERVAL_MS)).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("=== MLX90615 IR Thermometer ===");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    if let Err(e) = spawner.spawn(run_heartbeat()) {
        esp_println::println!("[ERROR] Failed to spawn task: {:?}", e);
    }

    let bus = match SensorBus::new(peripherals.I2C0, peripherals.GPIO8, peripherals.GPIO9) {
        Ok(bus) => bus,
        Err(e) => {
            esp_println::println!("[ERROR] I2C setup failed: {:?}", e);
            loop {
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    };
    let mut sensor = bus.mlx90615();

    loop {
        match sensor.ambient_temperature() {
            Ok(temp) => esp_println::println!("[MLX90615] Ambient: {:.2}°C", temp),
            Err(e) => esp_println::println!("[MLX90615] Ambient read error: {:?}", e),
        }
        match sensor.object_temperature() {
            Ok(temp) => esp_println::println!("[MLX90615] Object:  {:.2}°C", temp),
            Err(e) => esp_println::println!("[MLX90615] Object read error: {:?}", e),
        }

        Timer::after(Duration::from_millis(SAMPLE_INTERVAL_MS)).await;
    }
}

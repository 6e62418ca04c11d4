#![no_std]
#![no_main]

use core::panic::PanicInfo;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use mlx90615::{
    DEFAULT_ADDRESS,
    hardware::{self, SensorBus},
    raw_to_celsius,
};

const SAMPLE_COUNT: usize = 5;
const TOLERANCE: f32 = 0.001;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    hardware::halt(info)
}

esp_bootloader_esp_idf::esp_app_desc!();

#[derive(Default)]
struct TestResults {
    passed: u32,
    failed: u32,
}

impl TestResults {
    fn check(&mut self, condition: bool, test_name: &str) -> bool {
        if condition {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED", test_name);
        }
        condition
    }

    fn check_close(&mut self, value: f32, expected: f32, test_name: &str) {
        if !self.check((value - expected).abs() < TOLERANCE, test_name) {
            esp_println::println!("    got {:.3}, expected {:.3}", value, expected);
        }
    }

    fn print_summary(&self) {
        esp_println::println!("\n==========================================");
        esp_println::println!(
            "{} checks: {} passed, {} failed",
            self.passed + self.failed,
            self.passed,
            self.failed
        );
        esp_println::println!("==========================================");
    }
}

fn test_conversion(results: &mut TestResults) {
    esp_println::println!("\n[TEST] Conversion Tests");

    results.check_close(raw_to_celsius(0), -273.15, "absolute zero");
    results.check_close(raw_to_celsius(13658), 0.01, "just above freezing");
    results.check_close(raw_to_celsius(0x1234), -179.95, "0x1234");
    results.check_close(raw_to_celsius(0x8000), 382.21, "high bit kept");
}

async fn test_mlx90615_sensor<SDA, SCL>(
    results: &mut TestResults,
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: SDA,
    scl: SCL,
) where
    SDA: Into<esp_hal::gpio::AnyPin<'static>>,
    SCL: Into<esp_hal::gpio::AnyPin<'static>>,
{
    esp_println::println!("\n[TEST] MLX90615 Sensor Tests");

    let bus = match SensorBus::new(i2c0, sda, scl) {
        Ok(bus) => bus,
        Err(e) => {
            esp_println::println!("  I2C setup failed: {:?}", e);
            results.check(false, "I2C setup");
            return;
        }
    };
    results.check(true, "I2C setup at 100 kHz");

    let mut sensor = bus.mlx90615();
    results.check(sensor.address() == DEFAULT_ADDRESS, "default address is 0x5B");

    esp_println::println!("  Reading temperatures ({} samples)...", SAMPLE_COUNT);
    let mut ambient = heapless::Vec::<f32, SAMPLE_COUNT>::new();
    let mut object = heapless::Vec::<f32, SAMPLE_COUNT>::new();
    for i in 0..SAMPLE_COUNT {
        Timer::after(Duration::from_millis(100)).await;
        match (sensor.ambient_temperature(), sensor.object_temperature()) {
            (Ok(ta), Ok(to)) => {
                esp_println::println!("    Sample {}: Ta {:.2}°C To {:.2}°C", i + 1, ta, to);
                let _ = ambient.push(ta);
                let _ = object.push(to);
            }
            (Err(e), _) | (_, Err(e)) => {
                esp_println::println!("    Failed to read temperature: {:?}", e);
            }
        }
    }

    results.check(ambient.len() == SAMPLE_COUNT, "collected ambient samples");
    results.check(object.len() == SAMPLE_COUNT, "collected object samples");

    // Datasheet operating range for Ta is -40..85 °C
    for temp in ambient.iter() {
        results.check(*temp > -40.0 && *temp < 85.0, "ambient in operating range");
    }

    if ambient.len() == SAMPLE_COUNT {
        let min_temp = ambient.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max_temp = ambient.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        results.check(max_temp - min_temp < 2.0, "ambient readings stable (within 2°C)");
    }

    // No device is fitted at the MLX90614 address
    let mut ghost = bus.mlx90615_at(0x5A);
    results.check(ghost.ambient_temperature().is_err(), "missing device reports an error");
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("\n==========================================");
    esp_println::println!("=== Hardware Unit Test Runner ===");
    esp_println::println!("==========================================");

    let mut results = TestResults::default();

    test_conversion(&mut results);

    let i2c0 = peripherals.I2C0;
    let gpio8 = peripherals.GPIO8;
    let gpio9 = peripherals.GPIO9;

    // Consumes TIMG0
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    test_mlx90615_sensor(&mut results, i2c0, gpio8, gpio9).await;

    results.print_summary();

    esp_println::println!("\nTest run complete. Looping...");
    loop {
        if results.failed == 0 {
            Timer::after(Duration::from_millis(200)).await;
        } else {
            Timer::after(Duration::from_millis(1000)).await;
        }
    }
}

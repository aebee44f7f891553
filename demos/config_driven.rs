//! Example: Configuration-driven moves.
//!
//! This example demonstrates how to:
//! - Parse axis and move configuration from TOML
//! - Build a motor for a named axis
//! - Execute named moves with scaled limits
//!
//! Run with: `cargo run --example config_driven --features std`

use stepper_ramp::{
    error::{ConfigError, Error, Result},
    parse_config, StdClock, StepperMotor,
};

/// Mock pin for demonstration.
struct MockPin;

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Mock delay for demonstration.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // In real code, this would actually delay
    }
}

const CONFIG: &str = r#"
[axes.x]
max_velocity_steps_per_sec = 4000.0
acceleration_steps_per_sec2 = 8000.0
steps_per_revolution = 200
microsteps = 8

[moves.jog_forward]
axis = "x"
distance_steps = 1600

[moves.creep_back]
axis = "x"
distance_steps = -1600
velocity_percent = 25
acceleration_percent = 50
"#;

fn main() -> Result<()> {
    println!("=== Configuration-Driven Moves ===\n");

    let config = parse_config(CONFIG)?;
    println!("Axes: {:?}", config.axis_names().collect::<Vec<_>>());

    let mut motor = StepperMotor::builder()
        .step_pin(MockPin)
        .dir_pin(MockPin)
        .delay(MockDelay)
        .clock(StdClock::new())
        .from_config(&config, "x")?
        .build()?;

    for name in config.move_names() {
        let mv = config
            .move_config(name)
            .ok_or_else(|| Error::Config(ConfigError::MoveNotFound(name.try_into().unwrap_or_default())))?;

        let start = std::time::Instant::now();
        motor.execute(name, &config)?;

        println!("Move '{}':", name);
        println!("  Distance: {} steps", mv.distance.value());
        println!(
            "  Limits: {}% velocity, {}% acceleration",
            mv.velocity_percent, mv.acceleration_percent
        );
        println!("  Position now: {} steps", motor.current_position_steps());
        println!("  Took: {:.3} s", start.elapsed().as_secs_f32());
    }

    match motor.execute("park", &config) {
        Err(e) => println!("\nExpected error: {}", e),
        Ok(()) => println!("\n'park' unexpectedly succeeded"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}

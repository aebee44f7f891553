//! Basic motor control example.
//!
//! Builds a motor by hand, runs a trapezoidal and a triangular move with the blocking
//! runner, and prints what the ramp did.
//!
//! Uses mock pins and the host clock, so it runs without hardware:
//! `cargo run --example basic_motor`

use stepper_ramp::config::units::Microsteps;
use stepper_ramp::{StdClock, StepperMotor};

/// Mock delay provider for demonstration.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        // In real code, this would use a hardware timer
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Mock output pin that counts rising edges.
#[derive(Default)]
struct MockPin {
    state: bool,
    rising_edges: u64,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.state {
            self.rising_edges += 1;
        }
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

fn main() {
    println!("=== Basic Motor Control Example ===\n");

    let mut motor = StepperMotor::builder()
        .name("demo_motor")
        .step_pin(MockPin::default())
        .dir_pin(MockPin::default())
        .delay(MockDelay)
        .clock(StdClock::new())
        .steps_per_revolution(200)
        .microsteps(Microsteps::new(16).expect("valid microstep divisor"))
        .max_velocity(3200.0)
        .acceleration(6400.0)
        .build()
        .expect("Failed to build motor");

    println!("Motor created: {}", motor.name());
    println!(
        "Limits: {} steps/s, {} steps/s²",
        motor.max_velocity(),
        motor.acceleration()
    );

    // One revolution at 16x microstepping: long enough to reach full speed
    let start = std::time::Instant::now();
    motor.move_by_blocking(3200).expect("Move failed");
    println!("\n=== Trapezoidal move ===");
    println!("Position: {} steps", motor.current_position_steps());
    println!(
        "Revolutions: {:.2}",
        motor.current_position_revolutions().unwrap_or_default()
    );
    println!("Took: {:.3} s", start.elapsed().as_secs_f32());

    // Too short to reach 3200 steps/s: the ramp turns around at sqrt(a·d)
    let start = std::time::Instant::now();
    motor.move_by_blocking(-400).expect("Move failed");
    println!("\n=== Triangular move ===");
    println!("Position: {} steps", motor.current_position_steps());
    println!(
        "Peak velocity about: {:.0} steps/s",
        (motor.acceleration() * 400.0).sqrt()
    );
    println!("Took: {:.3} s", start.elapsed().as_secs_f32());

    let (step_pin, _, _, _) = motor.release();
    println!("\nSTEP pulses emitted: {}", step_pin.rising_edges);

    println!("\n=== Example Complete ===");
}

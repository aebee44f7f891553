//! Example: Sharing a main loop with other work.
//!
//! `run_once` never waits for a step, so the loop below keeps servicing a (pretend)
//! sensor between steps, and reacts to it by retargeting the move mid-flight.
//!
//! Run with: `cargo run --example cooperative_loop`

use stepper_ramp::{Result, Segment, StdClock, StepperMotor};

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

struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn main() -> Result<()> {
    println!("=== Cooperative Loop ===\n");

    let mut motor = StepperMotor::builder()
        .name("feeder")
        .step_pin(MockPin)
        .dir_pin(MockPin)
        .delay(MockDelay)
        .clock(StdClock::new())
        .max_velocity(2000.0)
        .acceleration(4000.0)
        .build()?;

    motor.move_to(5000);

    let mut polls: u64 = 0;
    let mut last_segment = motor.segment();
    let mut retargeted = false;

    while motor.is_running() {
        motor.run_once()?;
        polls += 1;

        if motor.segment() != last_segment {
            last_segment = motor.segment();
            println!(
                "{:>6} steps  {:>7.1} steps/s  {:?}",
                motor.current_position_steps(),
                motor.velocity(),
                last_segment
            );
        }

        // Pretend a sensor fired: turn back towards 1000
        if !retargeted && last_segment == Segment::Cruising && motor.current_position_steps() >= 2500 {
            retargeted = true;
            println!("sensor tripped, heading back to 1000");
            motor.move_to(1000);
        }
    }

    println!("\nFinished at {} steps", motor.current_position_steps());
    println!("Loop iterations: {} (steps are only emitted when due)", polls);
    Ok(())
}

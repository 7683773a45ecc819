#![no_std]

pub mod clock;
pub mod tm1637;

pub use clock::HardwareClock;
pub use tm1637::Tm1637;

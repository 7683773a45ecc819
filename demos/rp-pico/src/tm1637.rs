use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use sidereal_drive::SegmentDisplay;

const CMD_DATA_AUTO_INCREMENT: u8 = 0x40;
const CMD_ADDRESS_FIRST_DIGIT: u8 = 0xC0;
const CMD_DISPLAY_ON: u8 = 0x88;
const BIT_DELAY_US: u32 = 5;

/// Bit-banged TM1637 4-digit clock display
///
/// The TM1637 talks a two-wire protocol that looks like I2C without addresses,
/// sent LSB first. `dio` must be able to release the line (open-drain or an
/// `InOutPin`) so the chip can pull it low for its acknowledge bit; the
/// acknowledge itself is not checked.
pub struct Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    clk: CLK,
    dio: DIO,
    delay: D,
    brightness: u8,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    /// Create a new display driver, leaving both lines idle high
    pub fn new(mut clk: CLK, mut dio: DIO, delay: D) -> Self {
        let _ = clk.set_high();
        let _ = dio.set_high();

        Self {
            clk,
            dio,
            delay,
            brightness: 7,
        }
    }

    fn start(&mut self) {
        let _ = self.dio.set_high();
        let _ = self.clk.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        let _ = self.dio.set_low();
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn stop(&mut self) {
        let _ = self.clk.set_low();
        let _ = self.dio.set_low();
        self.delay.delay_us(BIT_DELAY_US);
        let _ = self.clk.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        let _ = self.dio.set_high();
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            let _ = self.clk.set_low();
            let _ = if byte & (1 << bit) != 0 {
                self.dio.set_high()
            } else {
                self.dio.set_low()
            };
            self.delay.delay_us(BIT_DELAY_US);
            let _ = self.clk.set_high();
            self.delay.delay_us(BIT_DELAY_US);
        }

        // Acknowledge clock with the line released
        let _ = self.clk.set_low();
        let _ = self.dio.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        let _ = self.clk.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        let _ = self.clk.set_low();
    }

    fn command(&mut self, byte: u8) {
        self.start();
        self.write_byte(byte);
        self.stop();
    }
}

impl<CLK, DIO, D> SegmentDisplay for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(7);
        self.command(CMD_DISPLAY_ON | self.brightness);
    }

    fn write_segments(&mut self, segments: &[u8; 4]) {
        self.command(CMD_DATA_AUTO_INCREMENT);

        self.start();
        self.write_byte(CMD_ADDRESS_FIRST_DIGIT);
        for &segment in segments {
            self.write_byte(segment);
        }
        self.stop();

        self.command(CMD_DISPLAY_ON | self.brightness);
    }
}

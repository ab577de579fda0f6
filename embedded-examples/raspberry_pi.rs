//! Full example code for driving an SSD1327 module over its 8-bit parallel
//! bus from a Raspberry Pi, using `linux-embedded-hal`. D0..=D7 are wired to
//! BCM 5, 6, 12, 13, 16, 19, 20 and 21; chip select to BCM 8, write strobe
//! to BCM 24, read strobe to BCM 23, D/C to BCM 25 and /RESET to BCM 27.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::{CdevPin, Delay};
use ssd1327 as oled;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut chip = Chip::new("/dev/gpiochip0")?;
    let mut output = |bcm: u32| -> Result<CdevPin, Box<dyn std::error::Error>> {
        let line = chip.get_line(bcm)?;
        Ok(CdevPin::new(line.request(
            LineRequestFlags::OUTPUT,
            1,
            "ssd1327",
        )?)?)
    };

    // The eight data lines, D0 first.
    let bus = [
        output(5)?,
        output(6)?,
        output(12)?,
        output(13)?,
        output(16)?,
        output(19)?,
        output(20)?,
        output(21)?,
    ];
    let cs = output(8)?;
    let wr = output(24)?;
    let rd = output(23)?;
    let dc = output(25)?;
    let mut res = output(27)?;

    // Hardware-reset the module before handing the pin over; the driver
    // only holds /RESET released.
    let mut delay = Delay;
    res.set_low()?;
    delay.delay_ms(10);
    res.set_high()?;

    let iface = oled::ParallelInterface::new(bus, cs, wr, rd, dc, res)?;
    let mut disp = oled::Display128x128::new(iface, oled::ProductVariant::Waveshare1in5);
    disp.init(&mut delay)?;

    // Stage a horizontal gradient over the full gray range and upload it.
    for x in 0..128u8 {
        for y in 0..128u8 {
            disp.set_pixel(x, y, x / 8)?;
        }
    }
    disp.flush()?;

    Ok(())
}

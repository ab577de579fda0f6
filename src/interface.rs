//! Bus transports that carry command and data bytes to the display controller.

use crate::error::Error;

/// A transport over which the controller receives command and data bytes.
///
/// The controller distinguishes the two with its data/command line: command
/// bytes (opcodes *and* their argument bytes, see [`crate::command`]) travel
/// in command mode, GDDRAM image bytes in data mode. Implementations drive
/// whatever signaling their bus needs; the rest of the driver only ever
/// speaks through these two operations, so transports are interchangeable.
pub trait DisplayInterface {
    /// Send one byte in command mode.
    fn send_command(&mut self, cmd: u8) -> Result<(), Error>;
    /// Send a run of bytes in data mode.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Error>;
}

pub mod parallel {
    //! 8080-style 8-bit parallel bus: eight data lines plus active-low
    //! chip-select, write-strobe, and read-strobe, a data/command select
    //! line, and the controller's active-low reset. The controller latches
    //! the data lines on the rising edge of the write strobe. This transport
    //! is write-only; the read strobe is parked at its inactive level.

    use embedded_hal::digital::{OutputPin, PinState};

    use super::DisplayInterface;
    use crate::error::Error;

    /// Control lines of the bus.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Line {
        ChipSelect,
        ReadStrobe,
        WriteStrobe,
        DataCommand,
    }

    /// One step of a byte-write transaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Step {
        /// Drive a control line to a level.
        Set(Line, PinState),
        /// Drive the eight data lines with the transfer byte.
        WriteBus,
    }

    /// The ordered pin sequence that writes one byte to the controller.
    ///
    /// Construction checks the sequence against the bus rules, so a
    /// transaction that exists is known to be sound: chip-select brackets
    /// every other edge, the data/command level settles before the
    /// write-strobe falling edge, and the data lines are driven inside the
    /// strobe-low window that ends with the latching rising edge. A sequence
    /// that breaks these rules is a bug in the driver itself and panics.
    #[derive(Clone, Copy)]
    struct Transaction {
        steps: [Step; 8],
    }

    impl Transaction {
        /// The write sequence, parameterized on the data/command level.
        fn write(mode: PinState) -> Self {
            Self::new([
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::DataCommand, mode),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::WriteBus,
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::High),
            ])
        }

        fn new(steps: [Step; 8]) -> Self {
            assert!(
                steps[0] == Step::Set(Line::ChipSelect, PinState::Low),
                "chip select must fall before any other edge"
            );
            assert!(
                steps[steps.len() - 1] == Step::Set(Line::ChipSelect, PinState::High),
                "chip select must rise after every other edge"
            );
            let selects = steps
                .iter()
                .filter(|s| matches!(s, Step::Set(Line::ChipSelect, _)))
                .count();
            assert!(
                selects == 2,
                "chip select may only toggle at the transaction boundaries"
            );

            // Walk the write strobe level through the sequence: the
            // controller latches the data lines on the rising edge, so the
            // single bus drive must sit inside the one strobe-low window,
            // and the strobe must rise again before the transaction ends.
            let mut strobe_low = false;
            let mut falling_edges = 0;
            let mut bus_drives = 0;
            let mut mode_selects = 0;
            let mut latched = false;
            for step in &steps {
                match step {
                    Step::Set(Line::WriteStrobe, PinState::Low) => {
                        strobe_low = true;
                        falling_edges += 1;
                    }
                    Step::Set(Line::WriteStrobe, PinState::High) => {
                        if strobe_low {
                            latched = true;
                        }
                        strobe_low = false;
                    }
                    Step::Set(Line::DataCommand, _) => {
                        assert!(
                            falling_edges == 0,
                            "data/command level must settle before the write strobe falls"
                        );
                        mode_selects += 1;
                    }
                    Step::WriteBus => {
                        assert!(
                            strobe_low,
                            "data lines must be driven while the write strobe is low"
                        );
                        bus_drives += 1;
                    }
                    Step::Set(..) => {}
                }
            }
            assert!(falling_edges == 1, "write strobe must fall exactly once");
            assert!(
                bus_drives == 1,
                "transaction must drive the data lines exactly once"
            );
            assert!(
                latched,
                "write strobe must rise to latch before the transaction ends"
            );
            assert!(
                mode_selects > 0,
                "transaction must select a data/command level"
            );

            Transaction { steps }
        }
    }

    /// Write-only driver for the parallel bus.
    ///
    /// `bus[0]` carries D0, the least significant bit. All pins must already
    /// be configured as push-pull outputs; construction parks the control
    /// lines at their inactive (high) levels, which also releases the
    /// controller's reset, and builds the two validated byte-write
    /// transactions (command mode and data mode) used for every transfer.
    pub struct ParallelInterface<BUS, CS, WR, RD, DC, RES> {
        bus: [BUS; 8],
        cs: CS,
        wr: WR,
        rd: RD,
        dc: DC,
        res: RES,
        command_write: Transaction,
        data_write: Transaction,
    }

    impl<BUS, CS, WR, RD, DC, RES> ParallelInterface<BUS, CS, WR, RD, DC, RES>
    where
        BUS: OutputPin,
        CS: OutputPin,
        WR: OutputPin,
        RD: OutputPin,
        DC: OutputPin,
        RES: OutputPin,
    {
        pub fn new(bus: [BUS; 8], cs: CS, wr: WR, rd: RD, dc: DC, res: RES) -> Result<Self, Error> {
            let mut iface = ParallelInterface {
                bus,
                cs,
                wr,
                rd,
                dc,
                res,
                command_write: Transaction::write(PinState::Low),
                data_write: Transaction::write(PinState::High),
            };
            iface.park_idle()?;
            Ok(iface)
        }

        /// Drive every control line to its inactive level and release reset.
        fn park_idle(&mut self) -> Result<(), Error> {
            self.dc.set_high().map_err(|_| Error::BusWrite)?;
            self.rd.set_high().map_err(|_| Error::BusWrite)?;
            self.wr.set_high().map_err(|_| Error::BusWrite)?;
            self.cs.set_high().map_err(|_| Error::BusWrite)?;
            self.res.set_high().map_err(|_| Error::BusWrite)?;
            Ok(())
        }

        fn drive(&mut self, line: Line, level: PinState) -> Result<(), Error> {
            match line {
                Line::ChipSelect => self.cs.set_state(level).map_err(|_| Error::BusWrite),
                Line::ReadStrobe => self.rd.set_state(level).map_err(|_| Error::BusWrite),
                Line::WriteStrobe => self.wr.set_state(level).map_err(|_| Error::BusWrite),
                Line::DataCommand => self.dc.set_state(level).map_err(|_| Error::BusWrite),
            }
        }

        fn write_bus(&mut self, byte: u8) -> Result<(), Error> {
            for (i, line) in self.bus.iter_mut().enumerate() {
                line.set_state(PinState::from((byte >> i) & 1 == 1))
                    .map_err(|_| Error::BusWrite)?;
            }
            Ok(())
        }

        fn run(&mut self, transaction: Transaction, byte: u8) -> Result<(), Error> {
            for step in transaction.steps {
                match step {
                    Step::Set(line, level) => self.drive(line, level)?,
                    Step::WriteBus => self.write_bus(byte)?,
                }
            }
            Ok(())
        }
    }

    impl<BUS, CS, WR, RD, DC, RES> DisplayInterface for ParallelInterface<BUS, CS, WR, RD, DC, RES>
    where
        BUS: OutputPin,
        CS: OutputPin,
        WR: OutputPin,
        RD: OutputPin,
        DC: OutputPin,
        RES: OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            let transaction = self.command_write;
            self.run(transaction, cmd)
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Error> {
            let transaction = self.data_write;
            for byte in data {
                self.run(transaction, *byte)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core::convert::Infallible;
        use embedded_hal::digital::ErrorType;
        use std::cell::RefCell;
        use std::rc::Rc;
        use std::vec::Vec;

        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        enum PinId {
            Cs,
            Wr,
            Rd,
            Dc,
            Res,
            Bit(usize),
        }

        type EventLog = Rc<RefCell<Vec<(PinId, bool)>>>;

        struct LogPin {
            id: PinId,
            log: EventLog,
        }

        impl ErrorType for LogPin {
            type Error = Infallible;
        }

        impl OutputPin for LogPin {
            fn set_low(&mut self) -> Result<(), Infallible> {
                self.log.borrow_mut().push((self.id, false));
                Ok(())
            }
            fn set_high(&mut self) -> Result<(), Infallible> {
                self.log.borrow_mut().push((self.id, true));
                Ok(())
            }
        }

        fn build(log: &EventLog) -> ParallelInterface<LogPin, LogPin, LogPin, LogPin, LogPin, LogPin> {
            let pin = |id| LogPin {
                id,
                log: Rc::clone(log),
            };
            let bus: [LogPin; 8] = core::array::from_fn(|i| pin(PinId::Bit(i)));
            ParallelInterface::new(
                bus,
                pin(PinId::Cs),
                pin(PinId::Wr),
                pin(PinId::Rd),
                pin(PinId::Dc),
                pin(PinId::Res),
            )
            .unwrap()
        }

        /// The events of one byte write, checked against the bus rules.
        fn assert_write_order(events: &[(PinId, bool)], mode: bool, byte: u8) {
            assert_eq!(events.first(), Some(&(PinId::Cs, false)));
            assert_eq!(events.last(), Some(&(PinId::Cs, true)));
            let selects = events
                .iter()
                .filter(|e| matches!(e, (PinId::Cs, _)))
                .count();
            assert_eq!(selects, 2);

            let wr_low = events.iter().position(|e| *e == (PinId::Wr, false)).unwrap();
            let wr_high = events.iter().rposition(|e| *e == (PinId::Wr, true)).unwrap();
            let mode_set = events
                .iter()
                .rposition(|e| matches!(e, (PinId::Dc, _)))
                .unwrap();
            assert_eq!(events[mode_set], (PinId::Dc, mode));
            assert!(mode_set < wr_low);

            let mut driven = [false; 8];
            for (i, event) in events.iter().enumerate() {
                if let (PinId::Bit(bit), level) = event {
                    assert!(wr_low < i && i < wr_high);
                    driven[*bit] = *level;
                }
            }
            let mut expect = [false; 8];
            for (bit, slot) in expect.iter_mut().enumerate() {
                *slot = (byte >> bit) & 1 == 1;
            }
            assert_eq!(driven, expect);
        }

        #[test]
        fn construction_parks_control_lines_high() {
            let log: EventLog = Rc::new(RefCell::new(Vec::new()));
            let _iface = build(&log);
            assert_eq!(
                *log.borrow(),
                vec![
                    (PinId::Dc, true),
                    (PinId::Rd, true),
                    (PinId::Wr, true),
                    (PinId::Cs, true),
                    (PinId::Res, true),
                ]
            );
        }

        #[test]
        fn command_write_signal_sequence() {
            let log: EventLog = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log);
            log.borrow_mut().clear();
            iface.send_command(0x81).unwrap();
            assert_eq!(
                *log.borrow(),
                vec![
                    (PinId::Cs, false),
                    (PinId::Rd, true),
                    (PinId::Wr, true),
                    (PinId::Dc, false),
                    (PinId::Wr, false),
                    (PinId::Bit(0), true),
                    (PinId::Bit(1), false),
                    (PinId::Bit(2), false),
                    (PinId::Bit(3), false),
                    (PinId::Bit(4), false),
                    (PinId::Bit(5), false),
                    (PinId::Bit(6), false),
                    (PinId::Bit(7), true),
                    (PinId::Wr, true),
                    (PinId::Cs, true),
                ]
            );
        }

        #[test]
        fn command_write_order_properties() {
            let log: EventLog = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log);
            log.borrow_mut().clear();
            iface.send_command(0xA5).unwrap();
            assert_write_order(&log.borrow(), false, 0xA5);
        }

        #[test]
        fn data_write_order_properties() {
            let log: EventLog = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log);
            log.borrow_mut().clear();
            iface.send_data(&[0x2C]).unwrap();
            assert_write_order(&log.borrow(), true, 0x2C);
        }

        #[test]
        fn data_bytes_write_one_transaction_each() {
            let log: EventLog = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log);
            log.borrow_mut().clear();
            iface.send_data(&[0xAA, 0x55]).unwrap();

            let events = log.borrow();
            let selects: Vec<usize> = events
                .iter()
                .enumerate()
                .filter(|(_, e)| matches!(e, (PinId::Cs, _)))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(selects.len(), 4);
            assert_write_order(&events[selects[0]..=selects[1]], true, 0xAA);
            assert_write_order(&events[selects[2]..=selects[3]], true, 0x55);
        }

        #[derive(Debug)]
        struct PinFault;

        impl embedded_hal::digital::Error for PinFault {
            fn kind(&self) -> embedded_hal::digital::ErrorKind {
                embedded_hal::digital::ErrorKind::Other
            }
        }

        struct BrokenPin;

        impl ErrorType for BrokenPin {
            type Error = PinFault;
        }

        impl OutputPin for BrokenPin {
            fn set_low(&mut self) -> Result<(), PinFault> {
                Err(PinFault)
            }
            fn set_high(&mut self) -> Result<(), PinFault> {
                Err(PinFault)
            }
        }

        #[test]
        fn pin_faults_surface_as_bus_write_errors() {
            let bus: [BrokenPin; 8] = core::array::from_fn(|_| BrokenPin);
            let result = ParallelInterface::new(
                bus, BrokenPin, BrokenPin, BrokenPin, BrokenPin, BrokenPin,
            );
            assert!(matches!(result, Err(Error::BusWrite)));
        }

        #[test]
        fn write_transactions_pass_validation() {
            Transaction::write(PinState::Low);
            Transaction::write(PinState::High);
        }

        #[test]
        #[should_panic(expected = "chip select must fall before any other edge")]
        fn unbracketed_transaction_panics() {
            Transaction::new([
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::DataCommand, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::WriteBus,
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::High),
            ]);
        }

        #[test]
        #[should_panic(expected = "data/command level must settle before the write strobe falls")]
        fn late_mode_select_panics() {
            Transaction::new([
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::Set(Line::DataCommand, PinState::Low),
                Step::WriteBus,
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::High),
            ]);
        }

        #[test]
        #[should_panic(expected = "data lines must be driven while the write strobe is low")]
        fn bus_drive_outside_latch_window_panics() {
            Transaction::new([
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::DataCommand, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::WriteBus,
                Step::Set(Line::ChipSelect, PinState::High),
            ]);
        }

        #[test]
        #[should_panic(expected = "data lines must be driven while the write strobe is low")]
        fn early_latch_before_bus_drive_panics() {
            // The extra rising edge inside the strobe window would latch
            // whatever happens to sit on the data lines.
            Transaction::new([
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::DataCommand, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::WriteBus,
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::High),
            ]);
        }

        #[test]
        #[should_panic(expected = "write strobe must rise to latch before the transaction ends")]
        fn unlatched_transaction_panics() {
            Transaction::new([
                Step::Set(Line::ChipSelect, PinState::Low),
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::WriteStrobe, PinState::High),
                Step::Set(Line::DataCommand, PinState::Low),
                Step::Set(Line::WriteStrobe, PinState::Low),
                Step::WriteBus,
                Step::Set(Line::ReadStrobe, PinState::High),
                Step::Set(Line::ChipSelect, PinState::High),
            ]);
        }
    }
}

pub mod spi {
    //! 4-wire SPI variant of the same command/data framing: each word is 8
    //! bits and the D/C GPIO selects the mode, low for command bytes and
    //! high for data. The 3-wire mode (a 9th bit per word in place of the
    //! GPIO) is not supported.

    use embedded_hal::digital::OutputPin;
    use embedded_hal::spi::SpiDevice;

    use super::DisplayInterface;
    use crate::error::Error;

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the display.
        spi: SPI,
        /// GPIO output connected to the D/C pin, the fourth "wire" of
        /// "4-wire" mode.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: SpiDevice,
        DC: OutputPin,
    {
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: SpiDevice,
        DC: OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            self.dc.set_low().map_err(|_| Error::BusWrite)?;
            self.spi.write(&[cmd]).map_err(|_| Error::BusWrite)?;
            self.dc.set_high().map_err(|_| Error::BusWrite)?;
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Error> {
            self.dc.set_high().map_err(|_| Error::BusWrite)?;
            self.spi.write(data).map_err(|_| Error::BusWrite)?;
            Ok(())
        }
    }

}

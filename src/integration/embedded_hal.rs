//! embedded-hal I2C Integration
//!
//! Implements [`embedded_hal::i2c::I2c`] for [`I2cMaster`], so existing
//! chip drivers written against embedded-hal run on the command/status
//! engine unchanged.
//!
//! # Transaction Framing
//!
//! A transaction resets the core once, then walks its operations:
//!
//! - a START with the address byte begins every change of direction
//!   (the first operation included); adjacent operations of the same
//!   direction share one addressing phase
//! - the last byte of a run of reads is NACKed (`ACK` command bit)
//! - the last byte of the transaction carries STOP
//! - empty operations are skipped
//!
//! # Example
//!
//! ```ignore
//! use embedded_hal::i2c::I2c;
//!
//! let mut id = [0u8; 2];
//! i2c.write_read(0x68, &[0x02], &mut id)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::constants::{ADDRESS_MASK, ADDRESS_READ_BIT};
use crate::driver::command::Command;
use crate::driver::master::I2cMaster;
use crate::error::{BusError, Error};
use crate::register::RegisterInterface;

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self.bus_error() {
            Some(BusError::ArbitrationLost) => ErrorKind::ArbitrationLoss,
            Some(BusError::NoAcknowledgeReceived) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
            }
            Some(BusError::TransactionTimeout | BusError::TransferFinishedBusStillBusy) => {
                ErrorKind::Bus
            }
            None => ErrorKind::Other,
        }
    }
}

impl<R: RegisterInterface, D: DelayNs> ErrorType for I2cMaster<R, D> {
    type Error = Error;
}

fn is_empty(operation: &Operation<'_>) -> bool {
    match operation {
        Operation::Read(buffer) => buffer.is_empty(),
        Operation::Write(bytes) => bytes.is_empty(),
    }
}

impl<R: RegisterInterface, D: DelayNs> I2c<SevenBitAddress> for I2cMaster<R, D> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let Some(last) = operations.iter().rposition(|op| !is_empty(op)) else {
            return Ok(());
        };
        let address = (address & ADDRESS_MASK as u8) << 1;

        self.reset()?;

        let mut reading = None;
        for index in 0..=last {
            // Direction of the next non-empty operation, if any
            let next_is_read = operations[index + 1..=last]
                .iter()
                .find(|op| !is_empty(op))
                .map(|op| matches!(op, Operation::Read(_)));
            let ends_transaction = index == last;

            match &mut operations[index] {
                Operation::Write(bytes) if !bytes.is_empty() => {
                    if reading != Some(false) {
                        self.send_command_and_write_data(Command::START, address)?;
                    }
                    let final_byte = bytes.len() - 1;
                    for (position, &byte) in bytes.iter().enumerate() {
                        let command = if ends_transaction && position == final_byte {
                            Command::STOP
                        } else {
                            Command::empty()
                        };
                        self.send_command_and_write_data(command, byte)?;
                    }
                    reading = Some(false);
                }
                Operation::Read(buffer) if !buffer.is_empty() => {
                    if reading != Some(true) {
                        self.send_command_and_write_data(
                            Command::START,
                            address | ADDRESS_READ_BIT,
                        )?;
                    }
                    let ends_run = next_is_read != Some(true);
                    let final_byte = buffer.len() - 1;
                    for (position, slot) in buffer.iter_mut().enumerate() {
                        let mut command = Command::empty();
                        if position == final_byte {
                            command.set(Command::ACK, ends_run);
                            command.set(Command::STOP, ends_transaction);
                        }
                        *slot = self.send_command_and_read_data(command)?;
                    }
                    reading = Some(true);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

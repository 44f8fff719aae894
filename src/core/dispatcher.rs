use crate::core::registry::Registry;
use crate::domain::model::Money;
use crate::domain::ports::Storage;
use crate::utils::error::{MarinaError, Result};
use std::io::{BufRead, Write};

pub const MENU: &str = "(I)nventory, (A)dd, (R)emove, (P)ayment, (M)onth, e(X)it : ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Inventory,
    Add,
    Remove,
    Payment,
    Month,
    Exit,
}

impl Command {
    /// 取第一個非空白字元，不分大小寫
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim_start().chars().next()?.to_ascii_uppercase() {
            'I' => Some(Command::Inventory),
            'A' => Some(Command::Add),
            'R' => Some(Command::Remove),
            'P' => Some(Command::Payment),
            'M' => Some(Command::Month),
            'X' => Some(Command::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive menu loop over a [`Registry`].
///
/// Input and output are generic so a whole session can be driven from a byte
/// buffer. End of input is treated like the exit command.
pub struct Dispatcher<S: Storage, R: BufRead, W: Write> {
    registry: Registry,
    storage: S,
    input: R,
    output: W,
}

impl<S: Storage, R: BufRead, W: Write> Dispatcher<S, R, W> {
    pub fn new(registry: Registry, storage: S, input: R, output: W) -> Self {
        Self {
            registry,
            storage,
            input,
            output,
        }
    }

    pub fn into_parts(self) -> (Registry, S, W) {
        (self.registry, self.storage, self.output)
    }

    /// Runs until exit or end of input, then saves. Only terminal I/O failures are returned.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "\n{}", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("End of input, exiting");
                break;
            };

            let flow = match Command::parse(&line) {
                Some(command) => self.dispatch(command)?,
                None => {
                    writeln!(self.output, "Invalid option.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        self.save_on_exit()
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!("Command: {:?}", command);
        match command {
            Command::Inventory => self.print_inventory().map(|_| Flow::Continue),
            Command::Add => self.add_boat(),
            Command::Remove => self.remove_boat(),
            Command::Payment => self.make_payment(),
            Command::Month => {
                let total = self.registry.apply_monthly_charge();
                tracing::debug!("Monthly charges totalling {} applied", total);
                writeln!(self.output, "Monthly charges applied.")?;
                Ok(Flow::Continue)
            }
            Command::Exit => Ok(Flow::Exit),
        }
    }

    fn print_inventory(&mut self) -> Result<()> {
        if self.registry.is_empty() {
            writeln!(self.output, "No boats in inventory.")?;
            return Ok(());
        }
        for boat in self.registry.list_sorted() {
            writeln!(self.output, "{}", boat)?;
        }
        Ok(())
    }

    fn add_boat(&mut self) -> Result<Flow> {
        // 滿了就不必再讀輸入
        if self.registry.is_full() {
            self.report(&MarinaError::CapacityExceeded {
                max: self.registry.max_boats(),
            })?;
            return Ok(Flow::Continue);
        }

        let Some(line) = self.prompt("Enter boat CSV string: ")? else {
            return Ok(Flow::Exit);
        };
        match self.registry.add(&line) {
            Ok(_) => writeln!(self.output, "Boat added.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn remove_boat(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter boat name to remove: ")? else {
            return Ok(Flow::Exit);
        };
        match self.registry.remove(&name) {
            Ok(_) => writeln!(self.output, "Boat removed.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn make_payment(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter boat name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount_text) = self.prompt("Enter payment amount: ")? else {
            return Ok(Flow::Exit);
        };

        let Some(amount) = Money::parse_decimal(&amount_text) else {
            self.report(&MarinaError::InvalidAmount {
                value: amount_text.trim().to_string(),
            })?;
            return Ok(Flow::Continue);
        };

        match self.registry.apply_payment(&name, amount) {
            Ok(balance) => writeln!(self.output, "Payment applied. New balance: ${}", balance)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn save_on_exit(&mut self) -> Result<()> {
        match self.registry.save(&self.storage) {
            Ok(count) => {
                tracing::info!("Saved {} boats to {}", count, self.storage.describe());
            }
            Err(e) => {
                tracing::error!("Failed to save to {}: {}", self.storage.describe(), e);
                writeln!(
                    self.output,
                    "Failed to save boats to {}: {}",
                    self.storage.describe(),
                    e.user_friendly_message()
                )?;
            }
        }
        Ok(())
    }

    fn report(&mut self, error: &MarinaError) -> Result<()> {
        tracing::debug!("Command failed ({:?}): {}", error.category(), error);
        writeln!(self.output, "{}", error.user_friendly_message())?;
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// One line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

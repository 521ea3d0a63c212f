/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;
use std::io::{self, BufRead, Write};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatcher::Dispatcher;
use crate::shared::DispatchError;

const PROMPT: &str = "Enter request as 'current_floor requested_floor' or type 'exit' to quit: ";
const HELP: &str = "Commands:
  <current_floor> <requested_floor>   request a ride, e.g. 'Parking 12'
  status                              show elevators and pending requests
  help                                show this text
  exit                                stop the elevator system";

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Request { origin: String, destination: String },
    Status,
    Help,
    Exit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 'current_floor requested_floor', got '{0}'")]
pub struct MalformedCommand(String);

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_command(line: &str) -> Result<Command, MalformedCommand> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        [] => Ok(Command::Empty),
        [word] if word.eq_ignore_ascii_case("exit") => Ok(Command::Exit),
        [word] if word.eq_ignore_ascii_case("status") => Ok(Command::Status),
        [word] if word.eq_ignore_ascii_case("help") => Ok(Command::Help),
        [origin, destination] => Ok(Command::Request {
            origin: origin.to_string(),
            destination: destination.to_string(),
        }),
        _ => Err(MalformedCommand(line.trim().to_string())),
    }
}

/// Reads commands until `exit` or end of input, then stops the dispatcher.
/// Bad input is reported on `output` and the loop carries on.
pub fn run<R: BufRead, W: Write>(dispatcher: &Dispatcher, input: R, mut output: W) -> io::Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        if dispatcher.is_stopped() {
            break;
        }

        match parse_command(&line?) {
            Ok(Command::Exit) => break,
            Ok(Command::Empty) => {}
            Ok(Command::Help) => writeln!(output, "{}", HELP)?,
            Ok(Command::Status) => {
                let snapshot = dispatcher.snapshot();
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => writeln!(output, "{}", json)?,
                    Err(e) => writeln!(output, "Error: {}", e)?,
                }
            }
            Ok(Command::Request {
                origin,
                destination,
            }) => match dispatcher.submit_request(&origin, &destination) {
                Ok(()) => {}
                Err(DispatchError::InvalidFloor(floor)) => writeln!(
                    output,
                    "Invalid floor '{}' entered. Please try again.",
                    floor
                )?,
                Err(e) => writeln!(output, "Error: {}. Please try again.", e)?,
            },
            Err(e) => writeln!(
                output,
                "Error: {}. Please enter the request in the correct format.",
                e
            )?,
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    info!("Console input closed");
    dispatcher.stop();
    Ok(())
}

/***************************************/
/*             Unit tests              */
/***************************************/

use std::path::PathBuf;

use crate::domain::parcel::Booking;
use crate::domain::types::{PriorityClass, ShipmentRequest, SizeClass};
use crate::error::{CliError, ParseError};
use crate::tracking::status::ParcelStatus;

pub const USAGE: &str = "\
usage:
  fwen quote <from> <to> <weight-kg> [size] [priority] [--insured] [--json]
  fwen batch <input.csv> <output.csv>
  fwen routes <from> <to>
  fwen districts
  fwen book <sender> <recipient> <from> <to> <weight-kg> [size] [priority] [--insured]
            [--type=<package-type>] [--pickup=<location>] [--deliver-to=<location>]
            [--sender-phone=<phone>] [--recipient-phone=<phone>]
  fwen track <tracking-number>
  fwen status <tracking-number> <status> <location> [description]
  fwen parcels <sender>";

const BOOKING_DETAILS: [&str; 5] = ["type", "pickup", "deliver-to", "sender-phone", "recipient-phone"];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quote {
        request: ShipmentRequest,
        json: bool,
    },
    Batch {
        input: PathBuf,
        output: PathBuf,
    },
    Routes {
        from: String,
        to: String,
    },
    Districts,
    Book {
        booking: Booking,
    },
    Track {
        tracking_number: String,
    },
    Status {
        tracking_number: String,
        status: ParcelStatus,
        location: String,
        description: Option<String>,
    },
    Parcels {
        sender: String,
    },
}

/// Parses the arguments after the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut insured = false;
    let mut json = false;
    let mut details = Vec::new();
    let mut positional = Vec::new();
    for arg in args.into_iter().map(Into::into) {
        let Some(flag) = arg.strip_prefix("--") else {
            positional.push(arg);
            continue;
        };
        match flag.split_once('=') {
            None if flag == "insured" => insured = true,
            None if flag == "json" => json = true,
            Some((key, value)) if BOOKING_DETAILS.contains(&key) => {
                details.push((key.to_string(), value.to_string()));
            }
            _ => return Err(CliError::Usage(format!("unknown flag '{arg}'\n{USAGE}"))),
        }
    }

    let Some((name, rest)) = positional.split_first() else {
        return Err(CliError::Usage(USAGE.to_string()));
    };

    if name != "book" {
        if let Some((key, _)) = details.first() {
            return Err(CliError::Usage(format!("'--{key}' only applies to book\n{USAGE}")));
        }
    }

    match name.as_str() {
        "quote" => {
            expect_between(name, rest, 3, 5)?;
            let request = shipment(&rest[0], &rest[1], &rest[2], &rest[3..], insured)?;
            Ok(Command::Quote { request, json })
        }
        "batch" => {
            expect_between(name, rest, 2, 2)?;
            Ok(Command::Batch {
                input: PathBuf::from(&rest[0]),
                output: PathBuf::from(&rest[1]),
            })
        }
        "routes" => {
            expect_between(name, rest, 2, 2)?;
            Ok(Command::Routes {
                from: rest[0].clone(),
                to: rest[1].clone(),
            })
        }
        "districts" => {
            expect_between(name, rest, 0, 0)?;
            Ok(Command::Districts)
        }
        "book" => {
            expect_between(name, rest, 5, 7)?;
            let request = shipment(&rest[2], &rest[3], &rest[4], &rest[5..], insured)?;
            if !(request.weight_kg.is_finite() && request.weight_kg > 0.0) {
                return Err(ParseError::InvalidWeight(rest[4].clone()).into());
            }

            let mut booking = Booking::new(rest[0].as_str(), rest[1].as_str(), request);
            for (key, value) in details {
                match key.as_str() {
                    "type" => booking.package_type = value,
                    "pickup" => booking.pickup_location = value,
                    "deliver-to" => booking.delivery_location = value,
                    "sender-phone" => booking.sender_phone = value,
                    _ => booking.recipient_phone = value,
                }
            }
            Ok(Command::Book { booking })
        }
        "track" => {
            expect_between(name, rest, 1, 1)?;
            Ok(Command::Track {
                tracking_number: rest[0].clone(),
            })
        }
        "status" => {
            expect_between(name, rest, 3, 4)?;
            Ok(Command::Status {
                tracking_number: rest[0].clone(),
                status: rest[1].parse()?,
                location: rest[2].clone(),
                description: rest.get(3).cloned(),
            })
        }
        "parcels" => {
            expect_between(name, rest, 1, 1)?;
            Ok(Command::Parcels {
                sender: rest[0].clone(),
            })
        }
        other => Err(CliError::Usage(format!("unknown command '{other}'\n{USAGE}"))),
    }
}

fn expect_between(name: &str, rest: &[String], min: usize, max: usize) -> Result<(), CliError> {
    if rest.len() < min || rest.len() > max {
        return Err(CliError::Usage(format!(
            "'{name}' takes {min}..={max} arguments, got {}\n{USAGE}",
            rest.len()
        )));
    }
    Ok(())
}

/// Optional trailing classes may come in either order.
fn shipment(
    from: &str,
    to: &str,
    weight: &str,
    classes: &[String],
    insured: bool,
) -> Result<ShipmentRequest, CliError> {
    let weight_kg: f64 = weight
        .parse()
        .map_err(|_| ParseError::InvalidWeight(weight.to_string()))?;

    let mut request = ShipmentRequest::new(from, to, weight_kg).with_insurance(insured);
    for class in classes {
        if let Ok(size) = class.parse::<SizeClass>() {
            request = request.with_size(size);
        } else {
            request = request.with_priority(class.parse::<PriorityClass>()?);
        }
    }
    Ok(request)
}

//! Plain-text connection list: a count line, then one `from to pipe` line
//! per connection.

use std::io::{Read, Write};

use gn_core::{PipeId, StationId};

use crate::schema::ConnectionDef;
use crate::{ProjectError, ProjectResult};

pub fn write_connections<W: Write>(mut out: W, connections: &[ConnectionDef]) -> ProjectResult<()> {
    writeln!(out, "{}", connections.len())?;
    for conn in connections {
        writeln!(out, "{} {} {}", conn.from, conn.to, conn.pipe)?;
    }
    out.flush()?;
    Ok(())
}

/// Parse a connection list. Tokens may be separated by any whitespace;
/// anything after the declared count of triples is ignored.
pub fn read_connections<R: Read>(mut input: R) -> ProjectResult<Vec<ConnectionDef>> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let count: usize = parse_token(tokens.next(), "connection count")?;
    let mut connections = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        let from: u32 = parse_token(tokens.next(), "source station")?;
        let to: u32 = parse_token(tokens.next(), "destination station")?;
        let pipe: u32 = parse_token(tokens.next(), "pipe id")?;
        connections.push(ConnectionDef {
            from: StationId::new(from),
            to: StationId::new(to),
            pipe: PipeId::new(pipe),
        });
    }
    Ok(connections)
}

fn parse_token<T: std::str::FromStr>(token: Option<&str>, what: &str) -> ProjectResult<T> {
    let token = token.ok_or_else(|| ProjectError::Legacy(format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| ProjectError::Legacy(format!("invalid {}: {:?}", what, token)))
}
